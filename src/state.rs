//! Shared application state.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, ContactService, TokenService, UserService};
use crate::config::Config;
use crate::domain::email_event::EmailEvent;
use crate::domain::repositories::{ContactRepository, UserRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::storage::AvatarStorage;

/// State cloned into every request handler.
///
/// Services are held over repository trait objects, so the same state type
/// serves both PostgreSQL and test repositories.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<dyn UserRepository>>,
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub contact_service: Arc<ContactService<dyn ContactRepository>>,
    pub cache: Arc<dyn CacheService>,
    pub avatar_storage: Arc<dyn AvatarStorage>,
    pub email_sender: mpsc::Sender<EmailEvent>,
    pub max_avatar_bytes: usize,
}

impl AppState {
    /// Wires services on top of the given repositories and adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        contacts: Arc<dyn ContactRepository>,
        tokens: Arc<TokenService>,
        cache: Arc<dyn CacheService>,
        avatar_storage: Arc<dyn AvatarStorage>,
        email_sender: mpsc::Sender<EmailEvent>,
        config: &Config,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            tokens,
            cache.clone(),
            config.cache_ttl_seconds,
            email_sender.clone(),
        ));
        let user_service = Arc::new(UserService::new(users, cache.clone()));
        let contact_service = Arc::new(ContactService::new(contacts));

        Self {
            auth_service,
            user_service,
            contact_service,
            cache,
            avatar_storage,
            email_sender,
            max_avatar_bytes: config.max_avatar_bytes,
        }
    }
}
