//! Normalizing coerced JSON into candidate records

use crate::error::{AgentHelperError, Result};
use crate::processing::coercer::EMPTY_ARRAY;
use crate::processing::records::{first_string, CandidateRecord};
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::OnceLock;

fn resume_pattern() -> &'static Regex {
    static RESUME: OnceLock<Regex> = OnceLock::new();
    RESUME.get_or_init(|| Regex::new(r"(?i)resume").expect("resume pattern is valid"))
}

fn cv_pattern() -> &'static Regex {
    static CV: OnceLock<Regex> = OnceLock::new();
    CV.get_or_init(|| Regex::new(r"(?i)cv").expect("cv pattern is valid"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Guess a person's name from a resume file name, e.g. `john_doe_resume.pdf` → `John Doe`.
pub fn guess_name_from_filename(file_name: &str) -> String {
    let path = Path::new(file_name);
    let base = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let without_resume = resume_pattern().replace_all(&base, "");
    let without_cv = cv_pattern().replace_all(&without_resume, "");
    let cleaned = without_cv
        .trim_matches(|c: char| matches!(c, ' ' | '-' | '_' | '.'))
        .replace(['_', '-'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        base
    } else {
        title_case(&collapsed)
    }
}

/// Uppercase every letter that follows a non-letter, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

fn skill_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl CandidateRecord {
    /// Fill the record from a raw agent object, applying the naming fallbacks.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let source_file = first_string(fields, &["resource-file", "file"])
            .unwrap_or_default()
            .to_string();

        let name = match fields.get("resource-name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ if !source_file.is_empty() => guess_name_from_filename(&source_file),
            _ => "Unknown".to_string(),
        };

        let job_title = fields
            .get("resource-job-title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let skills = fields
            .get("experties")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(skill_text).collect())
            .unwrap_or_default();

        Self {
            name,
            job_title,
            skills,
            source_file,
        }
    }
}

/// Parse coerced JSON into candidate records. Non-object elements are dropped.
pub fn try_normalize(json_text: &str) -> Result<Vec<CandidateRecord>> {
    let items = match serde_json::from_str::<Value>(json_text)? {
        Value::Array(items) => items,
        other => return Err(AgentHelperError::NotAnArray(json_kind(&other))),
    };

    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .map(CandidateRecord::from_fields)
        .collect())
}

/// Normalize coerced JSON into a candidate array; anything unusable becomes `"[]"`.
pub fn normalize(json_text: &str) -> String {
    let normalized = try_normalize(json_text)
        .and_then(|records| serde_json::to_string(&records).map_err(Into::into));

    match normalized {
        Ok(text) => text,
        Err(e) => {
            debug!("Normalization fell back to empty array: {}", e);
            EMPTY_ARRAY.to_string()
        }
    }
}
