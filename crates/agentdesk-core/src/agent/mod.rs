pub mod sales;

pub use sales::SalesAgentClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attachment::EncodedAttachment;

/// Body of one ask request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskPayload {
    pub question: String,
    pub company_website: String,
    pub company_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl AskPayload {
    pub fn new(
        question: &str,
        company_website: &str,
        company_description: &str,
        attachment: Option<EncodedAttachment>,
    ) -> Self {
        let (file_data, file_name, file_type) = match attachment {
            Some(a) => (Some(a.data), Some(a.name), Some(a.mime_type)),
            None => (None, None, None),
        };
        Self {
            question: question.trim().to_string(),
            company_website: company_website.trim().to_string(),
            company_description: company_description.trim().to_string(),
            file_data,
            file_name,
            file_type,
        }
    }
}

/// Successful response of the agent service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub message: Option<String>,
    /// Echo of what the service received; only logged.
    #[serde(default)]
    pub received_data: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("request task failed: {0}")]
    Task(String),
}

/// Anything that can answer an ask request.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn ask(&self, payload: &AskPayload) -> Result<AgentReply, AgentError>;
}
