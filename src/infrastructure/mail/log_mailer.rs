//! Mailer that only logs messages.

use super::service::{EmailMessage, MailError, Mailer};
use async_trait::async_trait;
use tracing::info;

/// Writes every message to the log instead of sending it.
///
/// Used when `MAIL_API_URL` is not configured, so confirmation links can be
/// copied from the server output during development.
#[derive(Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.html,
            "Email (log only)"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
