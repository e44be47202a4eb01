//! The ask cycle: validate the visitor's inputs, send one request, record
//! the outcome.
//!
//! ```text
//! Idle -> Sending -> Idle
//! ```
//!
//! Validation and attachment encoding run synchronously inside [`begin_ask`],
//! so callers only ever see `Idle` or `Sending`. Every rejection or failure
//! stays in (or returns to) `Idle` with an explanatory agent message in the
//! transcript. Front ends that need the UI to stay responsive
//! call [`begin_ask`], run the request elsewhere, then feed the result to
//! [`complete_ask`]; everything else can use [`ask`].

use std::path::PathBuf;

use crate::agent::{Agent, AgentError, AgentReply, AskPayload};
use crate::attachment::Attachment;
use crate::state::{ChatRole, Conversation};

pub const EMPTY_QUESTION_ADVISORY: &str = "Please enter a question to ask the AI Sales Agent.";
pub const NO_RESPONSE_FALLBACK: &str = "No response from AI agent.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AskStage {
    #[default]
    Idle,
    Sending,
}

impl AskStage {
    pub fn label(&self) -> &'static str {
        match self {
            AskStage::Idle => "idle",
            AskStage::Sending => "sending",
        }
    }
}

/// Inputs of the interaction widget and the stage of its current cycle.
#[derive(Debug, Clone, Default)]
pub struct AskForm {
    pub question: String,
    pub company_website: String,
    pub company_description: String,
    pub attachment: Option<PathBuf>,
    stage: AskStage,
}

impl AskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> AskStage {
        self.stage
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.attachment = Some(path.into());
    }

    pub fn clear_file(&mut self) {
        self.attachment = None;
    }
}

/// Format the transcript entry for a failed request.
pub fn failure_message(err: &AgentError) -> String {
    format!(
        "Oops! There was an error getting a response from the AI ({}). Please try again.",
        err
    )
}

/// Run the local half of the cycle. Returns the payload to send, or `None`
/// when the ask was rejected (or a request is already in flight).
pub fn begin_ask(conversation: &mut Conversation, form: &mut AskForm) -> Option<AskPayload> {
    if conversation.is_busy() {
        tracing::debug!("ask ignored while a request is in flight");
        return None;
    }

    if form.question.trim().is_empty() {
        conversation.append_message(EMPTY_QUESTION_ADVISORY, ChatRole::Agent);
        return None;
    }

    let attachment = match form.attachment.clone() {
        Some(path) => match Attachment::from_path(&path) {
            Ok(attachment) => Some(attachment),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "attachment rejected");
                conversation.append_message(e.to_string(), ChatRole::Agent);
                form.clear_file();
                return None;
            }
        },
        None => None,
    };

    let encoded = attachment.map(|attachment| attachment.encode());

    let payload = AskPayload::new(
        &form.question,
        &form.company_website,
        &form.company_description,
        encoded,
    );

    conversation.append_message(std::mem::take(&mut form.question), ChatRole::User);
    conversation.set_busy(true);
    form.stage = AskStage::Sending;

    Some(payload)
}

/// Record the outcome of a request started by [`begin_ask`].
pub fn complete_ask(
    conversation: &mut Conversation,
    form: &mut AskForm,
    result: Result<AgentReply, AgentError>,
) {
    match result {
        Ok(reply) => {
            let text = reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());
            conversation.append_message(text, ChatRole::Agent);
        }
        Err(e) => {
            tracing::error!(error = %e, "error communicating with sales agent");
            conversation.append_message(failure_message(&e), ChatRole::Agent);
        }
    }

    conversation.set_busy(false);
    form.stage = AskStage::Idle;
}

/// A whole cycle in one call.
pub async fn ask(conversation: &mut Conversation, form: &mut AskForm, agent: &dyn Agent) {
    let Some(payload) = begin_ask(conversation, form) else {
        return;
    };
    let result = agent.ask(&payload).await;
    complete_ask(conversation, form, result);
}
