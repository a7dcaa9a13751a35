//! Engine reached by launching a local program

use crate::engine::{AgentEngine, Inputs};
use crate::error::{AgentHelperError, Result};
use crate::processing::AgentResult;
use anyhow::Context;
use async_trait::async_trait;
use log::{debug, info};
use std::process::Stdio;
use tokio::process::Command;

/// Environment variable carrying the JSON-encoded inputs map.
pub const INPUTS_ENV: &str = "RM_AGENT_INPUTS";

/// Runs `program [args..] <operation> [operation args..]`. Kickoff stdout is the result.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    fn command(&self, operation: &[String], inputs: Option<&Inputs>) -> Result<Command> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(operation).kill_on_drop(true);
        if let Some(inputs) = inputs {
            command.env(INPUTS_ENV, serde_json::to_string(inputs)?);
        }
        Ok(command)
    }

    /// Forward an operation with the terminal attached, for the pass-through commands.
    async fn forward(&self, operation: Vec<String>, inputs: Option<&Inputs>) -> Result<()> {
        info!("Forwarding `{}` to {}", operation.join(" "), self.program);
        let status = self
            .command(&operation, inputs)?
            .status()
            .await
            .with_context(|| format!("failed to launch {}", self.program))?;

        if status.success() {
            Ok(())
        } else {
            Err(AgentHelperError::Engine(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}

#[async_trait]
impl AgentEngine for CommandEngine {
    async fn kickoff(&self, inputs: &Inputs) -> Result<AgentResult> {
        debug!("Launching {} {:?} kickoff", self.program, self.args);
        let output = self
            .command(&["kickoff".to_string()], Some(inputs))?
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("failed to launch {}", self.program))?;

        if !output.status.success() {
            return Err(AgentHelperError::Engine(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(AgentResult::from_engine_output(&stdout))
    }

    async fn train(&self, iterations: u32, filename: &str, inputs: &Inputs) -> Result<()> {
        let operation = vec!["train".to_string(), iterations.to_string(), filename.to_string()];
        self.forward(operation, Some(inputs)).await
    }

    async fn replay(&self, task_id: &str) -> Result<()> {
        self.forward(vec!["replay".to_string(), task_id.to_string()], None).await
    }

    async fn test(&self, iterations: u32, eval_llm: &str, inputs: &Inputs) -> Result<()> {
        let operation = vec!["test".to_string(), iterations.to_string(), eval_llm.to_string()];
        self.forward(operation, Some(inputs)).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::engine::kickoff_inputs;

    fn shell(script: &str) -> CommandEngine {
        // `sh -c SCRIPT NAME kickoff`: the operation lands in $1
        CommandEngine::new(
            "sh".to_string(),
            vec!["-c".to_string(), script.to_string(), "engine".to_string()],
        )
    }

    #[tokio::test]
    async fn test_kickoff_stdout_becomes_result() {
        let engine = shell(r#"echo "[{\"op\": \"$1\", \"inputs\": $RM_AGENT_INPUTS}]""#);
        let result = engine.kickoff(&kickoff_inputs()).await.unwrap();

        match result {
            AgentResult::List(items) => {
                assert_eq!(items[0]["op"], "kickoff");
                assert!(items[0]["inputs"].as_object().unwrap().is_empty());
            }
            other => panic!("expected list, got {}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_prose_stdout_is_text() {
        let engine = shell("echo 'Final Answer: see below'");
        let result = engine.kickoff(&kickoff_inputs()).await.unwrap();
        assert!(matches!(result, AgentResult::Text(_)));
    }

    #[tokio::test]
    async fn test_failing_program_is_an_engine_error() {
        let engine = shell("echo boom >&2; exit 3");
        let err = engine.kickoff(&kickoff_inputs()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let engine = CommandEngine::new("definitely-not-a-real-program".to_string(), vec![]);
        assert!(matches!(
            engine.replay("task-1").await,
            Err(AgentHelperError::Engine(_))
        ));
    }
}
