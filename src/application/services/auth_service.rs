//! Registration, login and token based account flows.

use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use super::token_service::{TokenService, TokenType};
use crate::domain::email_event::EmailEvent;
use crate::domain::entities::{NewUser, User, UserRole, normalize_email};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::gravatar::gravatar_url;
use crate::utils::password::{spawn_hash_password, spawn_verify_password};

/// Access token plus the refresh token it can be renewed with.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of a request for a new confirmation email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationRequest {
    AlreadyConfirmed,
    /// Sent, or silently skipped for an unknown address.
    Requested,
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Could not validate credentials", json!({}))
}

/// Service for account lifecycle and bearer authentication.
///
/// Emails are queued on a bounded channel and delivered by
/// [`crate::domain::email_worker::run_email_worker`]; a full queue drops the
/// email instead of blocking the request.
pub struct AuthService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    tokens: Arc<TokenService>,
    cache: Arc<dyn CacheService>,
    cache_ttl: u64,
    email_sender: mpsc::Sender<EmailEvent>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(
        repository: Arc<R>,
        tokens: Arc<TokenService>,
        cache: Arc<dyn CacheService>,
        cache_ttl: u64,
        email_sender: mpsc::Sender<EmailEvent>,
    ) -> Self {
        Self {
            repository,
            tokens,
            cache,
            cache_ttl,
            email_sender,
        }
    }

    fn queue_email(&self, event: EmailEvent) {
        match self.email_sender.try_send(event) {
            Ok(()) => debug!("Email queued"),
            Err(TrySendError::Full(event)) => {
                warn!(to = %event.email, "Email queue full, dropping email");
                counter!("emails_dropped_total").increment(1);
            }
            Err(TrySendError::Closed(event)) => {
                error!(to = %event.email, "Email queue closed, dropping email");
                counter!("emails_dropped_total").increment(1);
            }
        }
    }

    /// Creates an unconfirmed account and queues the confirmation email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or username is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);
        let username = username.trim();

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Account with this email already exists",
                json!({ "email": email }),
            ));
        }

        if self.repository.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict(
                "Username is already taken",
                json!({ "username": username }),
            ));
        }

        let user = self
            .repository
            .create(NewUser {
                username: username.to_string(),
                avatar: Some(gravatar_url(&email)),
                email,
                hashed_password: spawn_hash_password(password).await?,
                confirmed: false,
                role: UserRole::User,
            })
            .await?;

        counter!("users_registered_total").increment(1);
        info!(user_id = user.id, "User registered");

        let token = self.tokens.issue(&user.email, TokenType::EmailConfirmation)?;
        self.queue_email(EmailEvent::confirmation(&user, token));

        Ok(user)
    }

    /// Checks credentials and issues a token pair.
    ///
    /// The refresh token is stored on the user; only the latest one can be
    /// used with [`Self::refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on wrong credentials or an unconfirmed email.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let email = normalize_email(email);

        let found = self.repository.find_by_email(&email).await?;
        let matches =
            spawn_verify_password(password, found.as_ref().map(|u| u.hashed_password.as_str()))
                .await?;

        let user = match found {
            Some(user) if matches => user,
            _ => {
                counter!("login_failures_total").increment(1);
                return Err(AppError::unauthorized(
                    "Incorrect email or password",
                    json!({}),
                ));
            }
        };

        if !user.confirmed {
            counter!("login_failures_total").increment(1);
            return Err(AppError::unauthorized("Email not confirmed", json!({})));
        }

        let access_token = self.tokens.issue(&user.email, TokenType::Access)?;
        let refresh_token = self.tokens.issue(&user.email, TokenType::Refresh)?;

        self.repository
            .update_refresh_token(user.id, Some(refresh_token.clone()))
            .await?;

        counter!("logins_total").increment(1);
        debug!(user_id = user.id, "User logged in");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Issues a new access token for a valid refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid, expired, not a
    /// refresh token, or no longer the one stored for the user.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let rejected = || AppError::unauthorized("Invalid or expired refresh token", json!({}));

        let claims = self
            .tokens
            .verify(refresh_token, TokenType::Refresh)
            .map_err(|e| {
                debug!(error = %e, "Refresh token rejected");
                rejected()
            })?;

        let user = self
            .repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(rejected)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            return Err(rejected());
        }

        Ok(TokenPair {
            access_token: self.tokens.issue(&user.email, TokenType::Access)?,
            refresh_token: refresh_token.to_string(),
        })
    }

    /// Resolves an access token to its user, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for invalid tokens or unknown users.
    pub async fn authenticate(&self, access_token: &str) -> Result<User, AppError> {
        let claims = self
            .tokens
            .verify(access_token, TokenType::Access)
            .map_err(|e| {
                debug!(error = %e, "Access token rejected");
                invalid_credentials()
            })?;

        if let Ok(Some(user)) = self.cache.get_user(&claims.sub).await {
            return Ok(user);
        }

        let user = self
            .repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(invalid_credentials)?;

        if let Err(e) = self.cache.set_user(&user, Some(self.cache_ttl)).await {
            warn!(error = %e, "Failed to cache user");
        }

        Ok(user)
    }

    /// Confirms the email address a confirmation token was issued for.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unprocessable`] for an invalid token
    /// - [`AppError::Validation`] if the user is gone or already confirmed
    pub async fn confirm_email(&self, token: &str) -> Result<(), AppError> {
        let claims = self
            .tokens
            .verify(token, TokenType::EmailConfirmation)
            .map_err(|_| AppError::unprocessable("Invalid email verification token", json!({})))?;

        let user = self
            .repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::bad_request("Verification error", json!({})))?;

        if user.confirmed {
            return Err(AppError::bad_request(
                "Your email is already confirmed",
                json!({}),
            ));
        }

        self.repository.confirm_email(&user.email).await?;
        let _ = self.cache.invalidate_user(&user.email).await;

        info!(user_id = user.id, "Email confirmed");
        Ok(())
    }

    /// Queues a new confirmation email.
    ///
    /// Unknown addresses get the same answer as known ones.
    pub async fn request_confirmation(&self, email: &str) -> Result<ConfirmationRequest, AppError> {
        let email = normalize_email(email);

        match self.repository.find_by_email(&email).await? {
            Some(user) if user.confirmed => Ok(ConfirmationRequest::AlreadyConfirmed),
            Some(user) => {
                let token = self.tokens.issue(&user.email, TokenType::EmailConfirmation)?;
                self.queue_email(EmailEvent::confirmation(&user, token));
                Ok(ConfirmationRequest::Requested)
            }
            None => Ok(ConfirmationRequest::Requested),
        }
    }

    /// Queues a password reset email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown email.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;

        let token = self.tokens.issue(&user.email, TokenType::PasswordReset)?;
        self.queue_email(EmailEvent::password_reset(&user, token));

        Ok(())
    }

    /// Sets a new password using a reset token.
    ///
    /// Revokes the stored refresh token, so existing sessions cannot be renewed.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unprocessable`] for an invalid token
    /// - [`AppError::Validation`] if the user no longer exists
    pub async fn change_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let claims = self
            .tokens
            .verify(token, TokenType::PasswordReset)
            .map_err(|_| AppError::unprocessable("Invalid or expired token", json!({})))?;

        let user = self
            .repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired token", json!({})))?;

        let hashed = spawn_hash_password(new_password).await?;
        self.repository.update_password(&user.email, &hashed).await?;
        let _ = self.cache.invalidate_user(&user.email).await;

        info!(user_id = user.id, "Password changed");
        Ok(())
    }
}
