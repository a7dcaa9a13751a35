//! Agent engine boundary
//!
//! The crew that actually reads resumes and job profiles runs outside this
//! crate. Everything here is about reaching it and handing its answer back
//! untouched; making sense of that answer is the job of `processing`.

pub mod command;
pub mod http;

use crate::config::{EngineConfig, EngineKind};
use crate::error::Result;
use crate::processing::AgentResult;
use async_trait::async_trait;
use chrono::Datelike;
use serde_json::{Map, Value};
use std::sync::Arc;

pub use command::CommandEngine;
pub use http::HttpEngine;

pub type Inputs = Map<String, Value>;

/// Operations the external crew exposes. Only `kickoff` feeds the report pipeline;
/// the rest are forwarded unchanged from the CLI.
#[async_trait]
pub trait AgentEngine: Send + Sync {
    async fn kickoff(&self, inputs: &Inputs) -> Result<AgentResult>;

    async fn train(&self, iterations: u32, filename: &str, inputs: &Inputs) -> Result<()>;

    async fn replay(&self, task_id: &str) -> Result<()>;

    async fn test(&self, iterations: u32, eval_llm: &str, inputs: &Inputs) -> Result<()>;
}

pub fn build_engine(config: &EngineConfig) -> Result<Arc<dyn AgentEngine>> {
    let engine: Arc<dyn AgentEngine> = match config.kind {
        EngineKind::Command => Arc::new(CommandEngine::new(
            config.program.clone(),
            config.args.clone(),
        )),
        EngineKind::Http => Arc::new(HttpEngine::new(&config.endpoint, config.timeout_secs)?),
    };
    Ok(engine)
}

/// Inputs for a report kickoff: none.
pub fn kickoff_inputs() -> Inputs {
    Inputs::new()
}

/// Inputs for training and evaluation runs.
pub fn dated_inputs() -> Inputs {
    let mut inputs = Inputs::new();
    inputs.insert(
        "current_year".to_string(),
        Value::String(chrono::Local::now().year().to_string()),
    );
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kickoff_takes_no_inputs() {
        assert!(kickoff_inputs().is_empty());
    }

    #[test]
    fn test_dated_inputs_carry_the_year() {
        let inputs = dated_inputs();
        let year = inputs["current_year"].as_str().unwrap();
        assert_eq!(year.len(), 4);
        assert!(year.parse::<i32>().unwrap() >= 2024);
    }
}
