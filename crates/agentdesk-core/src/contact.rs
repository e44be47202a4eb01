//! Contact details and the demo-request form shown beside the chat.
//!
//! The demo form has no backend: a submission is logged and the fields are
//! reset.

use thiserror::Error;

pub struct ContactInfo {
    pub phone: &'static str,
    pub email: &'static str,
    pub address: &'static str,
    pub note: &'static str,
}

pub const CONTACT_INFO: ContactInfo = ContactInfo {
    phone: "1-800-555-FLYT (3598)",
    email: "sales@fleetworthy.com",
    address: "123 Fleet St, Anytown, USA",
    note: "Feel free to reach out directly for more information!",
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DemoRequestError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
}

impl DemoRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name and email are required; company and message are optional.
    pub fn submit(&mut self) -> Result<(), DemoRequestError> {
        if self.name.trim().is_empty() {
            return Err(DemoRequestError::MissingField("Name"));
        }
        if self.email.trim().is_empty() {
            return Err(DemoRequestError::MissingField("Email"));
        }

        tracing::info!(
            name = %self.name.trim(),
            email = %self.email.trim(),
            company = %self.company.trim(),
            "demo request submitted"
        );
        *self = Self::default();
        Ok(())
    }
}
