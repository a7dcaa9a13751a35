//! Engine reached over HTTP

use crate::engine::{AgentEngine, Inputs};
use crate::error::Result;
use crate::processing::AgentResult;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// POSTs `{"inputs": {...}, ...}` to `<endpoint>/<operation>`.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: Client,
    endpoint: String,
}

impl HttpEngine {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, operation: &str) -> String {
        format!("{}/{}", self.endpoint, operation)
    }

    async fn post(&self, operation: &str, body: Value) -> Result<String> {
        let url = self.url(operation);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl AgentEngine for HttpEngine {
    async fn kickoff(&self, inputs: &Inputs) -> Result<AgentResult> {
        let body = self.post("kickoff", json!({ "inputs": inputs })).await?;
        Ok(AgentResult::from_engine_output(&body))
    }

    async fn train(&self, iterations: u32, filename: &str, inputs: &Inputs) -> Result<()> {
        let body = json!({ "n_iterations": iterations, "filename": filename, "inputs": inputs });
        let reply = self.post("train", body).await?;
        info!("Engine accepted training run: {}", reply.trim());
        Ok(())
    }

    async fn replay(&self, task_id: &str) -> Result<()> {
        let reply = self.post("replay", json!({ "task_id": task_id })).await?;
        info!("Engine accepted replay: {}", reply.trim());
        Ok(())
    }

    async fn test(&self, iterations: u32, eval_llm: &str, inputs: &Inputs) -> Result<()> {
        let body = json!({ "n_iterations": iterations, "eval_llm": eval_llm, "inputs": inputs });
        let reply = self.post("test", body).await?;
        info!("Engine accepted evaluation run: {}", reply.trim());
        Ok(())
    }
}
