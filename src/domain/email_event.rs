//! Outgoing email event model.

use crate::domain::entities::User;

/// Which transactional email to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    /// Link that confirms the account's email address.
    Confirmation,
    /// Token that allows choosing a new password.
    PasswordReset,
}

/// An email queued for delivery by the background worker.
///
/// Handlers push events into a bounded channel and return immediately;
/// [`crate::domain::email_worker::run_email_worker`] renders and delivers them.
/// The signed `token` is created at enqueue time, so the worker never needs
/// access to the signing key.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailEvent {
    pub kind: EmailKind,
    pub email: String,
    pub username: String,
    pub token: String,
}

impl EmailEvent {
    pub fn confirmation(user: &User, token: String) -> Self {
        Self {
            kind: EmailKind::Confirmation,
            email: user.email.clone(),
            username: user.username.clone(),
            token,
        }
    }

    pub fn password_reset(user: &User, token: String) -> Self {
        Self {
            kind: EmailKind::PasswordReset,
            email: user.email.clone(),
            username: user.username.clone(),
            token,
        }
    }
}
