//! Loading flat directories of resumes and job profiles

use crate::error::Result;
use crate::input::file_detector::FileType;
use crate::input::manager::InputManager;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Resume,
    JobProfile,
}

/// One document as handed to the agent crew by the analyzer tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedDocument {
    #[serde(rename = "resource-file")]
    pub file_name: String,
    pub text: String,
}

/// Extract every supported file directly inside `dir`, sorted by file name.
/// A missing or unreadable directory yields no documents.
pub async fn load_documents(dir: &Path, document_type: DocumentType) -> Vec<LoadedDocument> {
    let file_names = match supported_files(dir) {
        Ok(names) => names,
        Err(e) => {
            warn!("Cannot list {:?} directory {}: {}", document_type, dir.display(), e);
            return Vec::new();
        }
    };

    let manager = InputManager::new();
    let mut documents = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        let text = manager.extract_text_or_empty(&dir.join(&file_name)).await;
        documents.push(LoadedDocument {
            file_name,
            text: text.trim().to_string(),
        });
    }

    info!("Loaded {} {:?} document(s) from {}", documents.len(), document_type, dir.display());
    documents
}

/// Resume texts keyed by file name, as consumed by enrichment.
pub async fn load_resume_texts(dir: &Path) -> BTreeMap<String, String> {
    load_documents(dir, DocumentType::Resume)
        .await
        .into_iter()
        .map(|doc| (doc.file_name, doc.text))
        .collect()
}

/// Pretty JSON array of `{"resource-file", "text"}` objects.
pub fn documents_to_json(documents: &[LoadedDocument]) -> Result<String> {
    Ok(serde_json::to_string_pretty(documents)?)
}

fn supported_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !FileType::from_path(&path).is_supported() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
