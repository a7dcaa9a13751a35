//! One report generation, end to end

use crate::config::{Config, ReportPaths};
use crate::engine::{kickoff_inputs, AgentEngine};
use crate::error::AgentHelperError;
use crate::output::report::{ReportOutcome, ReportWriter};
use crate::processing::coercer::{coerce, EMPTY_ARRAY};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Kicks off the crew, coerces its answer, and hands it to the report writer.
#[derive(Clone)]
pub struct Pipeline {
    engine: Arc<dyn AgentEngine>,
    writer: ReportWriter,
    engine_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        engine: Arc<dyn AgentEngine>,
        writer: ReportWriter,
        engine_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            writer,
            engine_timeout,
        }
    }

    pub fn from_config(config: &Config, engine: Arc<dyn AgentEngine>) -> Self {
        let writer = ReportWriter::new(config.report_paths(), config.paths.resume_dir.clone());
        Self::new(engine, writer, Duration::from_secs(config.engine.timeout_secs))
    }

    pub fn paths(&self) -> &ReportPaths {
        self.writer.paths()
    }

    /// The crew's answer as JSON text; `"[]"` if the engine fails or times out.
    pub async fn agent_json(&self) -> String {
        let inputs = kickoff_inputs();
        match tokio::time::timeout(self.engine_timeout, self.engine.kickoff(&inputs)).await {
            Ok(Ok(result)) => {
                info!("Agent engine returned a {} result", result.kind());
                coerce(&result)
            }
            Ok(Err(e)) => {
                warn!("Agent engine failed: {}", e);
                EMPTY_ARRAY.to_string()
            }
            Err(_) => {
                warn!("{}", AgentHelperError::EngineTimeout(self.engine_timeout.as_secs()));
                EMPTY_ARRAY.to_string()
            }
        }
    }

    pub async fn generate(&self) -> ReportOutcome {
        let json_text = self.agent_json().await;
        let outcome = self.writer.persist(&json_text).await;
        info!("Report generation finished: {:?}", outcome.candidate);
        outcome
    }
}
