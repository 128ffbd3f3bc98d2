//! Email templates.

use askama::Template;

use super::service::{EmailMessage, MailError};
use crate::domain::email_event::{EmailEvent, EmailKind};

#[derive(Template)]
#[template(path = "verify_email.html")]
struct VerifyEmailTemplate<'a> {
    username: &'a str,
    link: &'a str,
}

#[derive(Template)]
#[template(path = "reset_password.html")]
struct ResetPasswordTemplate<'a> {
    username: &'a str,
    token: &'a str,
    endpoint: &'a str,
}

/// Renders email events into HTML messages.
///
/// Links are built from the public `base_url` of the service.
#[derive(Debug, Clone)]
pub struct EmailComposer {
    base_url: String,
}

impl EmailComposer {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL that confirms an email address when opened.
    pub fn confirmation_link(&self, token: &str) -> String {
        format!("{}/api/auth/confirmed_email/{}", self.base_url, token)
    }

    pub fn compose(&self, event: &EmailEvent) -> Result<EmailMessage, MailError> {
        let (subject, html) = match event.kind {
            EmailKind::Confirmation => {
                let link = self.confirmation_link(&event.token);
                let html = VerifyEmailTemplate {
                    username: &event.username,
                    link: &link,
                }
                .render()?;
                ("Confirm your email", html)
            }
            EmailKind::PasswordReset => {
                let endpoint = format!("{}/api/auth/change_password", self.base_url);
                let html = ResetPasswordTemplate {
                    username: &event.username,
                    token: &event.token,
                    endpoint: &endpoint,
                }
                .render()?;
                ("Reset your password", html)
            }
        };

        Ok(EmailMessage {
            to: event.email.clone(),
            to_name: event.username.clone(),
            subject: subject.to_string(),
            html,
        })
    }
}
