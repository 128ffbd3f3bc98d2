//! Outgoing email delivery.
//!
//! Provides a [`Mailer`] trait with two implementations:
//! - [`HttpMailer`] - Posts messages to a transactional mail HTTP API
//! - [`LogMailer`] - Logs messages instead of sending them (development)
//!
//! [`EmailComposer`] renders [`crate::domain::email_event::EmailEvent`]s into
//! HTML messages using askama templates from `templates/`.

mod http_mailer;
mod log_mailer;
mod service;
mod templates;

pub use http_mailer::HttpMailer;
pub use log_mailer::LogMailer;
pub use service::{EmailMessage, MailError, Mailer};
pub use templates::EmailComposer;
