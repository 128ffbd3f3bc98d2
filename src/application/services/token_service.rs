//! Issuing and verifying signed JWTs.

use anyhow::Context;
use chrono::{Duration, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// What a token may be used for.
///
/// Every token carries its type; a token is only accepted where its own
/// type is expected, so an email link can never serve as a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    EmailConfirmation,
    PasswordReset,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the user the token was issued to.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
    /// Unique token ID; two tokens issued within one second still differ.
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("expected {expected:?} token, got {actual:?}")]
    WrongType {
        expected: TokenType,
        actual: TokenType,
    },
}

/// Signs and verifies tokens with a shared HMAC secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
    email_ttl: Duration,
}

impl TokenService {
    pub fn new(
        secret: &str,
        algorithm: Algorithm,
        access_ttl: Duration,
        refresh_ttl: Duration,
        email_ttl: Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_ttl,
            refresh_ttl,
            email_ttl,
        }
    }

    /// Builds the service from the `JWT_*` and token lifetime settings.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let access_ttl = TimeDelta::try_seconds(config.jwt_expiration_seconds)
            .context("JWT_EXPIRATION_SECONDS is out of range")?;
        let refresh_ttl = TimeDelta::try_minutes(config.refresh_token_expire_minutes)
            .context("REFRESH_TOKEN_EXPIRE_MINUTES is out of range")?;
        let email_ttl = TimeDelta::try_days(config.email_token_expire_days)
            .context("EMAIL_TOKEN_EXPIRE_DAYS is out of range")?;

        Ok(Self::new(
            &config.jwt_secret,
            config.jwt_algorithm()?,
            access_ttl,
            refresh_ttl,
            email_ttl,
        ))
    }

    fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
            TokenType::EmailConfirmation | TokenType::PasswordReset => self.email_ttl,
        }
    }

    /// Issues a token of `token_type` for `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the expiry does not fit in a
    /// timestamp or signing fails.
    pub fn issue(&self, email: &str, token_type: TokenType) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl(token_type)).ok_or_else(|| {
            tracing::error!(?token_type, "Token expiry overflows");
            AppError::internal("Failed to issue token", json!({}))
        })?;
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AppError::internal("Failed to issue token", json!({}))
        })
    }

    /// Verifies signature, expiry and purpose of a token.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let validation = Validation::new(self.algorithm);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;

        if claims.token_type != expected {
            return Err(TokenError::WrongType {
                expected,
                actual: claims.token_type,
            });
        }

        Ok(claims)
    }
}
