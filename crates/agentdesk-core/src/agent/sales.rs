use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::Client;

use super::{Agent, AgentError, AgentReply, AskPayload};

/// HTTP client for the Fleetworthy sales agent service.
#[derive(Clone)]
pub struct SalesAgentClient {
    client: Client,
    endpoint: String,
}

impl SalesAgentClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn query(&self, payload: &AskPayload) -> Result<AgentReply, AgentError> {
        tracing::info!(
            endpoint = %self.endpoint,
            has_file = payload.file_data.is_some(),
            "sending question to sales agent"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| AgentError::Transport(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "sales agent returned an error status");
            return Err(AgentError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AgentError::Transport(describe(&e)))?;
        let reply: AgentReply =
            serde_json::from_slice(&body).map_err(|e| AgentError::Decode(e.to_string()))?;

        if let Some(received) = &reply.received_data {
            tracing::debug!(%received, "sales agent echoed request");
        }

        Ok(reply)
    }
}

#[async_trait]
impl Agent for SalesAgentClient {
    async fn ask(&self, payload: &AskPayload) -> Result<AgentReply, AgentError> {
        self.query(payload).await
    }
}

/// Render an error with the parts of its source chain it does not already
/// mention, so "connection refused" survives into the transcript.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
