//! End-to-end report generation against stub agent engines

use async_trait::async_trait;
use rm_agent_helper::config::ReportPaths;
use rm_agent_helper::engine::{AgentEngine, Inputs};
use rm_agent_helper::error::{AgentHelperError, Result};
use rm_agent_helper::output::report::{CandidateAction, Enricher, ReportWriter};
use rm_agent_helper::processing::{AgentResult, CandidateRecord};
use rm_agent_helper::Pipeline;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

type Answer = Box<dyn Fn() -> Result<AgentResult> + Send + Sync>;

struct StubEngine {
    answer: Answer,
    delay: Duration,
}

impl StubEngine {
    fn answering(answer: impl Fn() -> Result<AgentResult> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            answer: Box::new(answer),
            delay: Duration::ZERO,
        })
    }
}

#[async_trait]
impl AgentEngine for StubEngine {
    async fn kickoff(&self, _inputs: &Inputs) -> Result<AgentResult> {
        tokio::time::sleep(self.delay).await;
        (self.answer)()
    }

    async fn train(&self, _iterations: u32, _filename: &str, _inputs: &Inputs) -> Result<()> {
        Ok(())
    }

    async fn replay(&self, _task_id: &str) -> Result<()> {
        Ok(())
    }

    async fn test(&self, _iterations: u32, _eval_llm: &str, _inputs: &Inputs) -> Result<()> {
        Ok(())
    }
}

fn pipeline(engine: Arc<dyn AgentEngine>, root: &Path) -> Pipeline {
    let writer = ReportWriter::new(ReportPaths::in_dir(&root.join("output")), root.join("resumes"));
    Pipeline::new(engine, writer, Duration::from_secs(5))
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_raw_accessor_answer_becomes_candidate_report() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubEngine::answering(|| {
        Ok(AgentResult::from_value(json!({
            "raw": "```json\n[{\"resource-file\":\"jane.txt\"}]\n```"
        })))
    });
    let pipeline = pipeline(engine, dir.path());

    assert_eq!(pipeline.agent_json().await, r#"[{"resource-file":"jane.txt"}]"#);

    let outcome = pipeline.generate().await;
    let paths = pipeline.paths();

    assert_eq!(outcome.candidate, CandidateAction::Written { records: 1 });
    assert!(!outcome.job_match_written);
    assert_eq!(
        read(&paths.candidate_json),
        r#"[{"resource-name":"Jane","resource-job-title":"","experties":[],"resource-file":"jane.txt"}]"#
    );
    assert_eq!(outcome.rendered, vec![paths.candidate_html.clone()]);
    assert!(read(&paths.candidate_html).contains(r#"<h3 class="name">Jane</h3>"#));
}

#[tokio::test]
async fn test_job_match_answer_goes_to_job_match_report() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubEngine::answering(|| {
        Ok(AgentResult::List(vec![json!({
            "job-file": "eng.txt",
            "matches": [{"resource-name": "Jane", "percent": 87}]
        })]))
    });
    let pipeline = pipeline(engine, dir.path());

    let outcome = pipeline.generate().await;
    let paths = pipeline.paths();

    assert_eq!(outcome.candidate, CandidateAction::Skipped);
    assert!(outcome.job_match_written);
    assert!(!paths.candidate_json.exists());

    let saved = read(&paths.job_match_json);
    assert!(saved.contains("\n  {\n    \"job-file\": \"eng.txt\""));
    let parsed: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(parsed[0]["matches"][0]["percent"], 87);

    let html = read(&paths.job_match_html);
    assert!(html.contains(r#"style="width:87%""#));
    assert!(html.contains("Jane — 87%"));

    // Candidate HTML still renders, from the (absent) candidate report
    assert!(read(&paths.candidate_html).contains("No candidates found"));
}

#[tokio::test]
async fn test_empty_answer_preserves_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubEngine::answering(|| {
        Ok(AgentResult::Text("I could not find any resumes.".to_string()))
    });
    let pipeline = pipeline(engine, dir.path());
    let paths = pipeline.paths().clone();

    let previous = r#"[{"resource-name":"Bob","resource-job-title":"","experties":[],"resource-file":"b.md"}]"#;
    std::fs::create_dir_all(paths.candidate_json.parent().unwrap()).unwrap();
    std::fs::write(&paths.candidate_json, previous).unwrap();

    let outcome = pipeline.generate().await;

    assert_eq!(outcome.candidate, CandidateAction::Preserved);
    assert_eq!(read(&paths.candidate_json), previous);
    assert!(read(&paths.candidate_html).contains("Bob"));
}

#[tokio::test]
async fn test_crew_output_without_payload_preserves_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubEngine::answering(|| {
        Ok(AgentResult::from_value(json!({
            "raw": null,
            "json_dict": null,
            "tasks_output": []
        })))
    });
    let pipeline = pipeline(engine, dir.path());
    let paths = pipeline.paths().clone();

    let previous = r#"[{"resource-name":"Bob","resource-job-title":"","experties":[],"resource-file":"b.md"}]"#;
    std::fs::create_dir_all(paths.candidate_json.parent().unwrap()).unwrap();
    std::fs::write(&paths.candidate_json, previous).unwrap();

    assert_eq!(pipeline.agent_json().await, "[]");

    let outcome = pipeline.generate().await;

    assert_eq!(outcome.candidate, CandidateAction::Preserved);
    assert_eq!(read(&paths.candidate_json), previous);
}

#[tokio::test]
async fn test_engine_failure_writes_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StubEngine::answering(|| Err(AgentHelperError::Engine("crew crashed".to_string())));
    let pipeline = pipeline(engine, dir.path());

    let outcome = pipeline.generate().await;
    let paths = pipeline.paths();

    assert_eq!(outcome.candidate, CandidateAction::Written { records: 0 });
    assert_eq!(read(&paths.candidate_json), "[]");
    assert!(read(&paths.candidate_html).contains("0 candidates"));
}

#[tokio::test]
async fn test_hanging_engine_times_out_to_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(StubEngine {
        answer: Box::new(|| -> Result<AgentResult> {
            Ok(AgentResult::List(vec![json!({"resource-name": "Late"})]))
        }),
        delay: Duration::from_secs(30),
    });
    let writer = ReportWriter::new(ReportPaths::in_dir(dir.path()), dir.path().join("resumes"));
    let pipeline = Pipeline::new(engine, writer, Duration::from_millis(50));

    assert_eq!(pipeline.agent_json().await, "[]");
}

struct TitleFromResume;

impl Enricher for TitleFromResume {
    fn enrich(
        &self,
        candidates: Vec<CandidateRecord>,
        texts: &BTreeMap<String, String>,
    ) -> Vec<CandidateRecord> {
        candidates
            .into_iter()
            .map(|mut candidate| {
                if let Some(text) = texts.get(&candidate.source_file) {
                    candidate.job_title = text.lines().nth(1).unwrap_or_default().to_string();
                }
                candidate
            })
            .collect()
    }
}

#[tokio::test]
async fn test_enricher_sees_resume_texts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("resumes")).unwrap();
    std::fs::write(dir.path().join("resumes").join("jane.txt"), "Jane Roe\nStaff Engineer\n").unwrap();

    let paths = ReportPaths::in_dir(&dir.path().join("output"));
    let writer = ReportWriter::new(paths, dir.path().join("resumes"))
        .with_enricher(Arc::new(TitleFromResume));

    let outcome = writer
        .persist(r#"[{"resource-file": "jane.txt"}, {"resource-file": "ghost.txt"}]"#)
        .await;
    assert_eq!(outcome.candidate, CandidateAction::Written { records: 2 });

    let saved: Value = serde_json::from_str(&read(&writer.paths().candidate_json)).unwrap();
    assert_eq!(saved[0]["resource-job-title"], "Staff Engineer");
    assert_eq!(saved[1]["resource-job-title"], "");
    assert_eq!(saved[1]["resource-name"], "Ghost");
}

#[tokio::test]
async fn test_unwritable_output_does_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    // A file where the output directory should be
    let blocker = dir.path().join("output");
    std::fs::write(&blocker, "not a directory").unwrap();

    let writer = ReportWriter::new(ReportPaths::in_dir(&blocker), dir.path().join("resumes"));
    let outcome = writer.persist(r#"[{"resource-name": "Jane"}]"#).await;

    assert!(matches!(outcome.candidate, CandidateAction::Failed(_)));
    assert!(outcome.rendered.is_empty());
}
