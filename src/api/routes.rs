//! API route configuration.
//!
//! Routes under `/users` and `/contacts` require Bearer token authentication
//! via [`crate::api::middleware::auth`]; `/auth` routes are public.

use crate::api::handlers::{
    change_password_handler, confirmed_email_handler, create_contact_handler,
    delete_contact_handler, get_contact_handler, list_contacts_handler, list_users_handler,
    login_handler, me_handler, refresh_token_handler, register_handler, request_email_handler,
    reset_password_handler, search_contacts_handler, upcoming_birthdays_handler,
    update_avatar_handler, update_contact_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Public account routes.
///
/// # Endpoints
///
/// - `POST /register`                 - Create an account
/// - `POST /login`                    - Exchange credentials for a token pair
/// - `POST /refresh-token`            - Rotate the token pair
/// - `GET  /confirmed_email/{token}`  - Confirm an email address
/// - `POST /request_email`            - Resend the confirmation email
/// - `POST /reset_password`           - Send a password reset token
/// - `POST /change_password`          - Set a new password with a reset token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh-token", post(refresh_token_handler))
        .route("/confirmed_email/{token}", get(confirmed_email_handler))
        .route("/request_email", post(request_email_handler))
        .route("/reset_password", post(reset_password_handler))
        .route("/change_password", post(change_password_handler))
}

/// `GET /me`, kept separate so it can carry its own rate limiter.
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me_handler))
}

/// User routes other than `/me`.
///
/// - `GET   /`        - List users (moderator or admin)
/// - `PATCH /avatar`  - Upload an avatar (admin)
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users_handler))
        .route("/avatar", patch(update_avatar_handler))
}

/// Contact routes, scoped to the authenticated user.
///
/// - `GET    /`              - List contacts
/// - `POST   /`              - Create a contact
/// - `GET    /search`        - Search by name or email
/// - `POST   /birthdays`     - Upcoming birthdays
/// - `GET    /{contact_id}`  - Fetch one contact
/// - `PUT    /{contact_id}`  - Replace a contact
/// - `DELETE /{contact_id}`  - Delete a contact
pub fn contacts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts_handler).post(create_contact_handler))
        .route("/search", get(search_contacts_handler))
        .route("/birthdays", post(upcoming_birthdays_handler))
        .route(
            "/{contact_id}",
            get(get_contact_handler)
                .put(update_contact_handler)
                .delete(delete_contact_handler),
        )
}
