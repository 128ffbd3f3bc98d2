//! Fixtures shared by unit tests.

use axum_test::TestServer;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::middleware::rate_limit::ClientIp;
use crate::application::services::{TokenService, TokenType};
use crate::config::test_config;
use crate::domain::email_event::EmailEvent;
use crate::domain::entities::{Contact, ContactData, User, UserRole};
use crate::domain::repositories::{MockContactRepository, MockUserRepository};
use crate::infrastructure::cache::NullCache;
use crate::infrastructure::storage::MockAvatarStorage;
use crate::routes::build_router;
use crate::state::AppState;

pub fn user(id: i64, email: &str, role: UserRole) -> User {
    User {
        id,
        username: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        hashed_password: "$argon2id$placeholder".to_string(),
        avatar: Some("https://www.gravatar.com/avatar/abc?d=identicon".to_string()),
        confirmed: true,
        role,
        refresh_token: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn contact_data(first_name: &str) -> ContactData {
    ContactData {
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        phone: "+380501234567".to_string(),
        birthday: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        description: None,
    }
}

pub fn contact(id: i64, user_id: i64, data: ContactData) -> Contact {
    Contact {
        id,
        first_name: data.first_name,
        last_name: data.last_name,
        email: data.email,
        phone: data.phone,
        birthday: data.birthday,
        description: data.description,
        user_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Mocks behind an in-process test server.
#[derive(Default)]
pub struct TestApp {
    pub users: MockUserRepository,
    pub contacts: MockContactRepository,
    pub storage: MockAvatarStorage,
}

impl TestApp {
    /// Builds the full router (without the rate limiter) over the mocks.
    ///
    /// The receiver is returned so queued emails can be inspected; dropping it
    /// closes the queue.
    pub fn server(self) -> (TestServer, mpsc::Receiver<EmailEvent>) {
        self.server_with_client_ip(None)
    }

    /// Like [`Self::server`], with the `/me` rate limiter keyed by `client_ip`.
    pub fn server_with_client_ip(
        self,
        client_ip: Option<ClientIp>,
    ) -> (TestServer, mpsc::Receiver<EmailEvent>) {
        let config = test_config();
        let tokens = Arc::new(TokenService::from_config(&config).unwrap());
        let (tx, rx) = mpsc::channel(config.mail_queue_capacity);

        let state = AppState::new(
            Arc::new(self.users),
            Arc::new(self.contacts),
            tokens,
            Arc::new(NullCache::new()),
            Arc::new(self.storage),
            tx,
            &config,
        );

        let server = TestServer::new(build_router(state, &config, client_ip)).unwrap();
        (server, rx)
    }
}

/// Token service configured like [`test_config`].
pub fn tokens() -> TokenService {
    TokenService::from_config(&test_config()).unwrap()
}

/// `Authorization` header value carrying a fresh access token for `email`.
pub fn bearer(email: &str) -> String {
    let token = tokens().issue(email, TokenType::Access).unwrap();
    format!("Bearer {}", token)
}

/// Makes `find_by_email` resolve `user` (case-insensitively) and nobody else.
pub fn expect_user_lookup(users: &mut MockUserRepository, user: User) {
    users.expect_find_by_email().returning(move |email| {
        Ok(email
            .eq_ignore_ascii_case(&user.email)
            .then(|| user.clone()))
    });
}
