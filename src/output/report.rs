//! Persisting coerced agent output as report files
//!
//! A report generation produces the candidate report (JSON + HTML) and, when
//! the crew answered with job matches instead of candidates, the job-match
//! report. A previously successful candidate report is never replaced by an
//! empty answer.

use crate::config::ReportPaths;
use crate::error::Result;
use crate::input::document::load_resume_texts;
use crate::output::formatter::{
    render_report_file, save_report_to_file, CandidateReportRenderer, JobMatchReportRenderer,
    ReportRenderer,
};
use crate::processing::coercer::EMPTY_ARRAY;
use crate::processing::normalizer::try_normalize;
use crate::processing::records::{is_job_match_payload, CandidateRecord};
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hook for adding detail to normalized candidates from their resume text.
pub trait Enricher: Send + Sync {
    fn enrich(
        &self,
        candidates: Vec<CandidateRecord>,
        resume_texts: &BTreeMap<String, String>,
    ) -> Vec<CandidateRecord>;
}

/// Returns candidates unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughEnricher;

impl Enricher for PassThroughEnricher {
    fn enrich(
        &self,
        candidates: Vec<CandidateRecord>,
        _resume_texts: &BTreeMap<String, String>,
    ) -> Vec<CandidateRecord> {
        candidates
    }
}

/// What happened to the candidate report JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateAction {
    Written { records: usize },
    /// Empty answer, existing non-empty report kept
    Preserved,
    /// Payload was a job-match report
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub candidate: CandidateAction,
    pub job_match_written: bool,
    /// HTML files rendered successfully
    pub rendered: Vec<PathBuf>,
}

/// Whether `json_text` may replace the report at `existing_report`.
///
/// Only an empty-array answer can be refused, and only when the existing
/// report holds more than `[]`.
pub fn should_overwrite(json_text: &str, existing_report: &Path) -> bool {
    if json_text.trim() != EMPTY_ARRAY {
        return true;
    }

    match std::fs::metadata(existing_report) {
        Ok(metadata) => metadata.len() <= 2,
        Err(_) => true,
    }
}

/// The coerced payload, when it is a job-match report.
pub fn job_match_payload(json_text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(json_text)
        .ok()
        .filter(is_job_match_payload)
}

#[derive(Clone)]
pub struct ReportWriter {
    paths: ReportPaths,
    resume_dir: PathBuf,
    enricher: Arc<dyn Enricher>,
}

impl ReportWriter {
    pub fn new(paths: ReportPaths, resume_dir: PathBuf) -> Self {
        Self {
            paths,
            resume_dir,
            enricher: Arc::new(PassThroughEnricher),
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn paths(&self) -> &ReportPaths {
        &self.paths
    }

    /// Persist one coerced agent answer and render the HTML reports. Never fails;
    /// problems are logged and reflected in the outcome.
    pub async fn persist(&self, json_text: &str) -> ReportOutcome {
        let job_matches = job_match_payload(json_text);

        let candidate = if job_matches.is_some() {
            info!("Agent returned job matches; candidate report left as is");
            CandidateAction::Skipped
        } else if should_overwrite(json_text, &self.paths.candidate_json) {
            match self.write_candidates(json_text).await {
                Ok(records) => CandidateAction::Written { records },
                Err(e) => {
                    warn!("Could not write {}: {}", self.paths.candidate_json.display(), e);
                    CandidateAction::Failed(e.to_string())
                }
            }
        } else {
            info!(
                "Agent returned no candidates; keeping existing {}",
                self.paths.candidate_json.display()
            );
            CandidateAction::Preserved
        };

        let mut rendered = Vec::new();
        self.render(
            &CandidateReportRenderer,
            &self.paths.candidate_json,
            &self.paths.candidate_html,
            &mut rendered,
        );

        let mut job_match_written = false;
        if let Some(payload) = job_matches {
            match self.write_job_matches(&payload) {
                Ok(()) => {
                    job_match_written = true;
                    self.render(
                        &JobMatchReportRenderer,
                        &self.paths.job_match_json,
                        &self.paths.job_match_html,
                        &mut rendered,
                    );
                }
                Err(e) => warn!("Could not write {}: {}", self.paths.job_match_json.display(), e),
            }
        }

        ReportOutcome {
            candidate,
            job_match_written,
            rendered,
        }
    }

    async fn write_candidates(&self, json_text: &str) -> Result<usize> {
        let candidates = match try_normalize(json_text) {
            Ok(candidates) => candidates,
            Err(e) => {
                info!("Agent output holds no candidate array ({}); writing an empty report", e);
                Vec::new()
            }
        };

        let candidates = if candidates.is_empty() {
            candidates
        } else {
            let texts = load_resume_texts(&self.resume_dir).await;
            self.enricher.enrich(candidates, &texts)
        };

        save_report_to_file(&serde_json::to_string(&candidates)?, &self.paths.candidate_json)?;
        info!(
            "Saved {} candidate(s) to {}",
            candidates.len(),
            self.paths.candidate_json.display()
        );
        Ok(candidates.len())
    }

    fn write_job_matches(&self, payload: &Value) -> Result<()> {
        save_report_to_file(&serde_json::to_string_pretty(payload)?, &self.paths.job_match_json)?;
        info!("Saved job matches to {}", self.paths.job_match_json.display());
        Ok(())
    }

    fn render(
        &self,
        renderer: &dyn ReportRenderer,
        json_path: &Path,
        html_path: &Path,
        rendered: &mut Vec<PathBuf>,
    ) {
        match render_report_file(renderer, json_path, html_path) {
            Ok(()) => rendered.push(html_path.to_path_buf()),
            Err(e) => warn!("Skipping {} HTML: {}", renderer.name(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_decision() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("resource_report.json");

        assert!(should_overwrite("[]", &report), "absent report");

        std::fs::write(&report, "[]").unwrap();
        assert!(should_overwrite("[]", &report), "two-byte report");

        std::fs::write(&report, "x".repeat(50)).unwrap();
        assert!(!should_overwrite("[]", &report));
        assert!(!should_overwrite("  []\n", &report));
        assert!(should_overwrite("[{}]", &report));
        assert!(should_overwrite("[ ]", &report));
    }

    #[test]
    fn test_job_match_payload_detection() {
        assert!(job_match_payload(r#"[{"job-file":"eng.txt","matches":[]}]"#).is_some());
        assert!(job_match_payload(r#"[{"resource-file":"jane.txt"}]"#).is_none());
        assert!(job_match_payload("[]").is_none());
    }
}
