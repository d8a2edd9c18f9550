use std::time::Duration;

use serde_json::Value;
use tracing::info;

use crate::error::ApiError;

const TRIGGER_TIMEOUT: Duration = Duration::from_secs(30);
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Thin client for the automation engine's webhook endpoints. Triggers are
/// fire-and-wait: the engine runs the workflow synchronously and answers
/// with its own JSON, which is passed through to the API caller.
#[derive(Clone)]
pub struct WorkflowClient {
    client: reqwest::Client,
    base_url: String,
}

impl WorkflowClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn trigger(&self, path: &str, payload: Value) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        info!("⚙️ triggering workflow {}", path);

        let response = self
            .client
            .post(&url)
            .timeout(TRIGGER_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::EngineUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::EngineFailed(format!("{}: {}", status, body)));
        }

        // Some workflows answer with an empty body; treat that as null.
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::EngineUnreachable(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::EngineFailed(format!("invalid JSON from engine: {}", e)))
    }

    /// Quick reachability probe for the health endpoint. Any HTTP answer
    /// counts as reachable, only transport failures do not.
    pub async fn reachable(&self) -> bool {
        self.client
            .get(&self.base_url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .is_ok()
    }
}
