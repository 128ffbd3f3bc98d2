//! Mailer trait, message and error types.

use async_trait::async_trait;
use thiserror::Error;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub html: String,
}

/// Errors that can occur while rendering or delivering an email.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail template error: {0}")]
    Template(#[from] askama::Error),
    #[error("Mail transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Mail provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers rendered emails.
///
/// Implementations must be thread-safe; the email worker retries failed
/// deliveries, so `send` may be called several times for one message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}
