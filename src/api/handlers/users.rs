//! Handlers for user endpoints.

use axum::{
    Extension, Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use serde_json::json;
use tracing::warn;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::users::UserResponse;
use crate::api::extract::ApiQuery;
use crate::api::middleware::auth::require_role;
use crate::domain::entities::{User, UserRole};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the authenticated user.
///
/// `GET /api/users/me` (rate limited)
pub async fn me_handler(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Avatar file is too large", json!({}))
    } else {
        AppError::bad_request("Invalid multipart body", json!({ "reason": e.body_text() }))
    }
}

async fn discard_avatar(state: &AppState, url: &str) {
    if let Err(e) = state.avatar_storage.remove(url).await {
        warn!(error = %e, url, "Avatar file left behind");
    }
}

/// Uploads a new avatar for the authenticated admin.
///
/// `PATCH /api/users/avatar`, multipart field `file`.
///
/// # Errors
///
/// - 403 unless the caller is an admin
/// - 400 if `file` is missing or not an image
/// - 413 if the file exceeds `MAX_AVATAR_BYTES`
pub async fn update_avatar_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>, AppError> {
    require_role(&user, UserRole::Admin)?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((content_type, bytes));
        break;
    }

    let (content_type, bytes) = upload
        .ok_or_else(|| AppError::bad_request("Missing multipart field 'file'", json!({})))?;

    if !content_type.starts_with("image/") {
        return Err(AppError::bad_request(
            "File must be an image",
            json!({ "content_type": content_type }),
        ));
    }

    if bytes.is_empty() {
        return Err(AppError::bad_request("File is empty", json!({})));
    }

    if bytes.len() > state.max_avatar_bytes {
        return Err(AppError::payload_too_large(
            "Avatar file is too large",
            json!({ "max_bytes": state.max_avatar_bytes }),
        ));
    }

    let url = state
        .avatar_storage
        .store(&user.username, &content_type, bytes.to_vec())
        .await?;

    let updated = match state.user_service.update_avatar(&user, &url).await {
        Ok(updated) => updated,
        Err(e) => {
            discard_avatar(&state, &url).await;
            return Err(e);
        }
    };

    if let Some(previous) = user.avatar.as_deref()
        && previous != url
    {
        discard_avatar(&state, previous).await;
    }

    Ok(Json(updated.into()))
}

/// Lists users.
///
/// `GET /api/users/?skip=&limit=`, moderators and admins only.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    require_role(&user, UserRole::Moderator)?;

    let (skip, limit) = params.skip_limit()?;
    let users = state.user_service.list_users(skip, limit).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use crate::api::middleware::rate_limit::ClientIp;
    use crate::domain::entities::{User, UserRole};
    use crate::error::AppError;
    use crate::test_support::{self, TestApp};
    use axum::http::{StatusCode, header};
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_me_requires_token() {
        let (server, _rx) = TestApp::default().server();

        let response = server.get("/api/users/me").await;

        response.assert_status_unauthorized();
        assert_eq!(response.header(header::WWW_AUTHENTICATE), "Bearer");
        assert_eq!(
            response.json::<Value>()["error"]["message"],
            "Not authenticated"
        );
    }

    #[tokio::test]
    async fn test_me_rejects_garbage_token() {
        let (server, _rx) = TestApp::default().server();

        let response = server
            .get("/api/users/me")
            .add_header("Authorization", "Bearer not-a-jwt")
            .await;

        response.assert_status_unauthorized();
        assert_eq!(
            response.json::<Value>()["error"]["message"],
            "Could not validate credentials"
        );
    }

    #[tokio::test]
    async fn test_me_returns_current_user() {
        let mut app = TestApp::default();
        test_support::expect_user_lookup(
            &mut app.users,
            test_support::user(3, "bob@example.com", UserRole::Moderator),
        );
        let (server, _rx) = app.server();

        let response = server
            .get("/api/users/me")
            .add_header("Authorization", test_support::bearer("bob@example.com"))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["id"], 3);
        assert_eq!(body["username"], "bob");
        assert_eq!(body["role"], "moderator");
        assert!(body.get("refresh_token").is_none());
    }

    #[tokio::test]
    async fn test_me_is_limited_to_five_requests_per_client() {
        let mut app = TestApp::default();
        test_support::expect_user_lookup(
            &mut app.users,
            test_support::user(3, "bob@example.com", UserRole::User),
        );
        let (server, _rx) = app.server_with_client_ip(Some(ClientIp::ProxyHeaders));
        let bearer = test_support::bearer("bob@example.com");

        for _ in 0..5 {
            server
                .get("/api/users/me")
                .add_header("Authorization", bearer.clone())
                .add_header("X-Forwarded-For", "203.0.113.7")
                .await
                .assert_status_ok();
        }

        server
            .get("/api/users/me")
            .add_header("Authorization", bearer.clone())
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await
            .assert_status(StatusCode::TOO_MANY_REQUESTS);

        server
            .get("/api/users/me")
            .add_header("Authorization", bearer)
            .add_header("X-Forwarded-For", "198.51.100.20")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_list_users_forbidden_for_plain_user() {
        let mut app = TestApp::default();
        test_support::expect_user_lookup(
            &mut app.users,
            test_support::user(1, "alice@example.com", UserRole::User),
        );
        let (server, _rx) = app.server();

        let response = server
            .get("/api/users")
            .add_header("Authorization", test_support::bearer("alice@example.com"))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            response.json::<Value>()["error"]["message"],
            "Not enough permissions"
        );
    }

    #[tokio::test]
    async fn test_list_users_for_moderator() {
        let mut app = TestApp::default();
        test_support::expect_user_lookup(
            &mut app.users,
            test_support::user(2, "mod@example.com", UserRole::Moderator),
        );
        app.users
            .expect_list()
            .withf(|skip, limit| *skip == 10 && *limit == 5)
            .returning(|_, _| {
                Ok(vec![
                    test_support::user(11, "a@example.com", UserRole::User),
                    test_support::user(12, "b@example.com", UserRole::Admin),
                ])
            });
        let (server, _rx) = app.server();

        let response = server
            .get("/api/users?skip=10&limit=5")
            .add_header("Authorization", test_support::bearer("mod@example.com"))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[1]["role"], "admin");
    }

    fn admin_app() -> TestApp {
        let mut app = TestApp::default();
        test_support::expect_user_lookup(
            &mut app.users,
            test_support::user(1, "admin@example.com", UserRole::Admin),
        );
        app
    }

    #[tokio::test]
    async fn test_update_avatar() {
        let mut app = admin_app();
        app.storage
            .expect_store()
            .withf(|owner, content_type, bytes| {
                owner == "admin" && content_type == "image/png" && bytes.len() == 4
            })
            .times(1)
            .returning(|_, _, _| Ok("http://localhost:8000/avatars/admin-1.png".to_string()));
        app.storage
            .expect_remove()
            .withf(|url| url.starts_with("https://www.gravatar.com/"))
            .times(1)
            .returning(|_| Ok(()));
        app.users
            .expect_update_avatar()
            .withf(|email, url| email == "admin@example.com" && url.ends_with("admin-1.png"))
            .returning(|_, url| {
                Ok(User {
                    avatar: Some(url.to_string()),
                    ..test_support::user(1, "admin@example.com", UserRole::Admin)
                })
            });
        let (server, _rx) = app.server();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0x89, b'P', b'N', b'G'])
                .file_name("me.png")
                .mime_type("image/png"),
        );

        let response = server
            .patch("/api/users/avatar")
            .add_header("Authorization", test_support::bearer("admin@example.com"))
            .multipart(form)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["avatar"],
            "http://localhost:8000/avatars/admin-1.png"
        );
    }

    #[tokio::test]
    async fn test_failed_avatar_update_removes_new_file() {
        let mut app = admin_app();
        app.storage
            .expect_store()
            .returning(|_, _, _| Ok("http://localhost:8000/avatars/admin-2.png".to_string()));
        app.users
            .expect_update_avatar()
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));
        app.storage
            .expect_remove()
            .withf(|url| url == "http://localhost:8000/avatars/admin-2.png")
            .times(1)
            .returning(|_| Ok(()));
        let (server, _rx) = app.server();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![1, 2, 3]).file_name("a.png").mime_type("image/png"),
        );

        server
            .patch("/api/users/avatar")
            .add_header("Authorization", test_support::bearer("admin@example.com"))
            .multipart(form)
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_avatar_rejects_non_image() {
        let (server, _rx) = admin_app().server();

        let form = MultipartForm::new().add_part(
            "file",
            Part::text("hello").file_name("notes.txt").mime_type("text/plain"),
        );

        let response = server
            .patch("/api/users/avatar")
            .add_header("Authorization", test_support::bearer("admin@example.com"))
            .multipart(form)
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"]["message"],
            "File must be an image"
        );
    }

    #[tokio::test]
    async fn test_update_avatar_too_large() {
        let (server, _rx) = admin_app().server();

        // test_config allows 1 MiB
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0u8; 1024 * 1024 + 1])
                .file_name("big.png")
                .mime_type("image/png"),
        );

        let response = server
            .patch("/api/users/avatar")
            .add_header("Authorization", test_support::bearer("admin@example.com"))
            .multipart(form)
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_update_avatar_requires_admin() {
        let mut app = TestApp::default();
        test_support::expect_user_lookup(
            &mut app.users,
            test_support::user(2, "mod@example.com", UserRole::Moderator),
        );
        let (server, _rx) = app.server();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![1, 2, 3]).file_name("a.png").mime_type("image/png"),
        );

        let response = server
            .patch("/api/users/avatar")
            .add_header("Authorization", test_support::bearer("mod@example.com"))
            .multipart(form)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}
