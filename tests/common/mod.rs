#![allow(dead_code)]

use chrono::NaiveDate;
use contacts_api::application::services::TokenService;
use contacts_api::config::Config;
use contacts_api::domain::email_event::EmailEvent;
use contacts_api::infrastructure::cache::NullCache;
use contacts_api::infrastructure::persistence::{PgContactRepository, PgUserRepository};
use contacts_api::infrastructure::storage::LocalAvatarStorage;
use contacts_api::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn create_test_user(pool: &PgPool, username: &str, email: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (username, email, hashed_password, confirmed)
         VALUES ($1, $2, 'not-a-real-hash', TRUE)
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_contact(
    pool: &PgPool,
    user_id: i64,
    first_name: &str,
    last_name: &str,
    email: &str,
    birthday: NaiveDate,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO contacts (first_name, last_name, email, phone, birthday, user_id)
         VALUES ($1, $2, $3, '+380501234567', $4, $5)
         RETURNING id",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(birthday)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: "http://localhost:8000".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        cors_origins: vec!["*".to_string()],
        cache_ttl_seconds: 60,
        jwt_secret: "integration-secret".to_string(),
        jwt_algorithm: "HS256".to_string(),
        jwt_expiration_seconds: 900,
        refresh_token_expire_minutes: 60,
        email_token_expire_days: 1,
        mail_from: "noreply@localhost".to_string(),
        mail_from_name: "Contacts API".to_string(),
        mail_api_url: None,
        mail_api_key: None,
        mail_queue_capacity: 16,
        avatar_dir: std::env::temp_dir()
            .join("contacts-api-avatars")
            .to_string_lossy()
            .into_owned(),
        max_avatar_bytes: 1024 * 1024,
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 300,
    }
}

/// Full application state over PostgreSQL, with the email queue handed back
/// to the test instead of a worker.
pub fn create_test_state(pool: PgPool, config: &Config) -> (AppState, mpsc::Receiver<EmailEvent>) {
    let pool = Arc::new(pool);
    let (tx, rx) = mpsc::channel(config.mail_queue_capacity);

    let state = AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgContactRepository::new(pool)),
        Arc::new(TokenService::from_config(config).unwrap()),
        Arc::new(NullCache::new()),
        Arc::new(LocalAvatarStorage::new(
            &config.avatar_dir,
            config.base_url.clone(),
        )),
        tx,
        config,
    );

    (state, rx)
}
