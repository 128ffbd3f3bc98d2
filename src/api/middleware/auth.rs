//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::{User, UserRole};
use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <access token>
/// ```
///
/// On success the resolved [`User`] is inserted into the request extensions;
/// handlers read it with `Extension<User>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if:
/// - Authorization header is missing or malformed
/// - The token is invalid, expired or not an access token
/// - The token's user no longer exists
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/me", get(me_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Not authenticated",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(user);

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// Fails with `403 Forbidden` unless `user` holds `role` or a higher one.
pub fn require_role(user: &User, role: UserRole) -> Result<(), AppError> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Not enough permissions",
            json!({ "required_role": role }),
        ))
    }
}
