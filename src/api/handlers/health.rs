//! Handlers for the service root and health check endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, MessageResponse};
use crate::state::AppState;

/// `GET /`
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the contacts API"))
}

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1`
/// 2. **Email Queue**: Checks if the channel is open and reports free capacity
/// 3. **Cache**: Redis PING (always ok when caching is disabled)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "email_queue": { "status": "ok", "message": "Capacity: 1000" },
///     "cache": { "status": "ok", "message": "Cache reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = match state.user_service.health().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    };

    let email_queue = if state.email_sender.is_closed() {
        CheckStatus::error("Email queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.email_sender.capacity()))
    };

    let cache = if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache connection failed")
    };

    let all_healthy = database.is_ok() && email_queue.is_ok() && cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            email_queue,
            cache,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_root() {
        let (server, _rx) = TestApp::default().server();

        let response = server.get("/").await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "message": "Welcome to the contacts API" })
        );
    }

    #[tokio::test]
    async fn test_health_ok() {
        let mut app = TestApp::default();
        app.users.expect_ping().returning(|| Ok(()));
        let (server, _rx) = app.server();

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"]["database"]["status"], "ok");
        assert_eq!(body["checks"]["email_queue"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_degraded_when_database_down() {
        let mut app = TestApp::default();
        app.users
            .expect_ping()
            .returning(|| Err(AppError::internal("Database error", json!({}))));
        let (server, _rx) = app.server();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"]["database"]["status"], "error");
    }

    #[tokio::test]
    async fn test_health_degraded_when_email_queue_closed() {
        let mut app = TestApp::default();
        app.users.expect_ping().returning(|| Ok(()));
        let (server, rx) = app.server();
        drop(rx);

        let response = server.get("/health").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json::<Value>()["checks"]["email_queue"]["status"],
            "error"
        );
    }
}
