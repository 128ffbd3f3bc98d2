//! DTOs for registration, login and email token endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::trimmed;
use crate::application::services::TokenPair;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 100))]
    pub username: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Body of `request_email` and `reset_password`.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_username_length_counts_trimmed_text() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "username": "  a  ",
            "email": " al@example.com ",
            "password": "secret"
        }))
        .unwrap();

        assert_eq!(req.username, "a");
        assert_eq!(req.email, "al@example.com");
        assert!(req.validate().unwrap_err().field_errors().contains_key("username"));
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            username: "al".to_string(),
            email: "al@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            username: "a".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_token_response_type() {
        let response = TokenResponse::from(TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["refresh_token"], "r");
    }
}
