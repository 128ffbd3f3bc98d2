//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::TokenService;
use crate::config::Config;
use crate::domain::email_worker::run_email_worker;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::mail::{EmailComposer, HttpMailer, LogMailer, Mailer};
use crate::infrastructure::persistence::{PgContactRepository, PgUserRepository};
use crate::infrastructure::storage::LocalAvatarStorage;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long shutdown waits for queued emails to be delivered.
const EMAIL_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Mail transport and the background email worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let mailer: Arc<dyn Mailer> = match &config.mail_api_url {
        Some(endpoint) => Arc::new(
            HttpMailer::new(
                endpoint.clone(),
                config.mail_api_key.clone(),
                config.mail_from.clone(),
                config.mail_from_name.clone(),
            )
            .context("Failed to build mail client")?,
        ),
        None => {
            tracing::warn!("MAIL_API_URL not set, emails will only be logged");
            Arc::new(LogMailer::new())
        }
    };

    let (email_tx, email_rx) = mpsc::channel(config.mail_queue_capacity);
    let composer = EmailComposer::new(config.base_url.clone());
    let email_worker = tokio::spawn(run_email_worker(email_rx, composer, mailer));

    let pool = Arc::new(pool);
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let contacts = Arc::new(PgContactRepository::new(pool.clone()));
    let tokens = Arc::new(TokenService::from_config(&config)?);
    let avatar_storage = Arc::new(LocalAvatarStorage::new(
        &config.avatar_dir,
        config.base_url.clone(),
    ));

    let state = AppState::new(
        users,
        contacts,
        tokens,
        cache,
        avatar_storage,
        email_tx,
        &config,
    );

    let app = app_router(state, &config);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it every email sender) is gone; let the worker
    // drain what is still queued.
    match tokio::time::timeout(EMAIL_DRAIN_TIMEOUT, email_worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Email worker panicked"),
        Err(_) => tracing::warn!("Email worker did not finish in time, dropping queued emails"),
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
