pub mod agent;
pub mod ask;
pub mod attachment;
pub mod config;
pub mod contact;
pub mod deployment;
pub mod state;

// Re-export main types for convenience
pub use agent::{Agent, AgentError, AgentReply, AskPayload, SalesAgentClient};
pub use ask::{ask, begin_ask, complete_ask, AskForm, AskStage};
pub use attachment::{Attachment, AttachmentError, DocumentKind, EncodedAttachment};
pub use config::Config;
pub use contact::{DemoRequest, DemoRequestError, CONTACT_INFO};
pub use deployment::Deployment;
pub use state::{ChatMessage, ChatRole, Conversation};
