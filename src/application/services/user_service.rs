//! User profile and administration service.

use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::{User, UserRole};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Service for user profile updates and listings.
///
/// Any change to a stored user evicts it from the cache, so the next
/// authenticated request sees the new row.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Saves a new avatar URL for `user`.
    pub async fn update_avatar(&self, user: &User, url: &str) -> Result<User, AppError> {
        let updated = self.repository.update_avatar(&user.email, url).await?;
        self.evict(&user.email).await;
        Ok(updated)
    }

    /// Changes the role of the account registered under `email`.
    pub async fn change_role(&self, email: &str, role: UserRole) -> Result<User, AppError> {
        let updated = self.repository.set_role(email, role).await?;
        self.evict(&updated.email).await;
        Ok(updated)
    }

    /// Marks an email as confirmed without the emailed link.
    pub async fn confirm_account(&self, email: &str) -> Result<(), AppError> {
        self.repository.confirm_email(email).await?;
        self.evict(email).await;
        Ok(())
    }

    async fn evict(&self, email: &str) {
        if let Err(e) = self.cache.invalidate_user(email).await {
            warn!(error = %e, %email, "Failed to invalidate cached user");
        }
    }

    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        self.repository.list(skip, limit).await
    }

    /// Checks that the database answers.
    pub async fn health(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserRole;
    use crate::domain::repositories::MockUserRepository;
    use crate::infrastructure::cache::MockCacheService;
    use crate::infrastructure::cache::NullCache;
    use crate::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_avatar_invalidates_cache() {
        let admin = test_support::user(1, "admin@example.com", UserRole::Admin);

        let mut repo = MockUserRepository::new();
        repo.expect_update_avatar()
            .withf(|email, url| email == "admin@example.com" && url == "http://x/avatars/a.png")
            .times(1)
            .returning(|_, url| {
                Ok(User {
                    avatar: Some(url.to_string()),
                    ..test_support::user(1, "admin@example.com", UserRole::Admin)
                })
            });

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate_user()
            .withf(|email| email == "admin@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repo), Arc::new(cache));

        let updated = service
            .update_avatar(&admin, "http://x/avatars/a.png")
            .await
            .unwrap();
        assert_eq!(updated.avatar.as_deref(), Some("http://x/avatars/a.png"));
    }

    #[tokio::test]
    async fn test_change_role_evicts_cached_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_set_role()
            .withf(|email, role| email == "boss@example.com" && *role == UserRole::User)
            .times(1)
            .returning(|email, role| Ok(test_support::user(3, email, role)));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate_user()
            .withf(|email| email == "boss@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repo), Arc::new(cache));

        let demoted = service
            .change_role("boss@example.com", UserRole::User)
            .await
            .unwrap();
        assert_eq!(demoted.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_confirm_account_evicts_cached_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_confirm_email()
            .withf(|email| email == "new@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate_user()
            .withf(|email| email == "new@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repo), Arc::new(cache));

        service.confirm_account("new@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_role_change_leaves_cache_alone() {
        let mut repo = MockUserRepository::new();
        repo.expect_set_role()
            .returning(|_, _| Err(AppError::not_found("User not found", json!({}))));

        let mut cache = MockCacheService::new();
        cache.expect_invalidate_user().never();

        let service = UserService::new(Arc::new(repo), Arc::new(cache));

        assert!(service.change_role("ghost@example.com", UserRole::Admin).await.is_err());
    }

    #[tokio::test]
    async fn test_list_users_passes_pagination() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .withf(|skip, limit| *skip == 10 && *limit == 5)
            .times(1)
            .returning(|_, _| {
                Ok(vec![test_support::user(
                    11,
                    "k@example.com",
                    UserRole::User,
                )])
            });

        let service = UserService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let users = service.list_users(10, 5).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 11);
    }

    #[tokio::test]
    async fn test_health_propagates_database_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_ping()
            .returning(|| Err(AppError::internal("Database error", json!({}))));

        let service = UserService::new(Arc::new(repo), Arc::new(NullCache::new()));

        assert!(service.health().await.is_err());
    }
}
