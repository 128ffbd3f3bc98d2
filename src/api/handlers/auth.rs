//! Handlers for registration, login and email token flows.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{
    ChangePasswordRequest, EmailRequest, LoginRequest, RefreshTokenRequest, RegisterRequest,
    TokenResponse,
};
use crate::api::dto::health::MessageResponse;
use crate::api::dto::users::UserResponse;
use crate::api::extract::{ApiJson, ApiPath};
use crate::application::services::ConfirmationRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account and queues the confirmation email.
///
/// `POST /api/auth/register`
///
/// # Errors
///
/// - 400 on invalid input
/// - 409 if the email or username is taken
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `POST /api/auth/login`
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let pair = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(pair.into()))
}

/// `POST /api/auth/refresh-token`
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let pair = state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(Json(pair.into()))
}

/// Target of the link in the confirmation email.
///
/// `GET /api/auth/confirmed_email/{token}`
pub async fn confirmed_email_handler(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service.confirm_email(&token).await?;

    Ok(Json(MessageResponse::new("Email confirmed")))
}

/// `POST /api/auth/request_email`
pub async fn request_email_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<EmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    let message = match state
        .auth_service
        .request_confirmation(&payload.email)
        .await?
    {
        ConfirmationRequest::AlreadyConfirmed => "Your email is already confirmed",
        ConfirmationRequest::Requested => "Check your email for confirmation",
    };

    Ok(Json(MessageResponse::new(message)))
}

/// `POST /api/auth/reset_password`
pub async fn reset_password_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<EmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .auth_service
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(MessageResponse::new(
        "Check your email to reset your password",
    )))
}

/// `POST /api/auth/change_password`
pub async fn change_password_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .auth_service
        .change_password(&payload.token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
