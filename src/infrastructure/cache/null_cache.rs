//! Cache that never stores anything.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::User;
use async_trait::async_trait;

/// Stand-in for [`RedisCache`](super::RedisCache) when `REDIS_URL` is unset
/// or Redis is unreachable at startup.
///
/// Every lookup misses, so authenticated requests always read the user row.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_user(&self, _email: &str) -> CacheResult<Option<User>> {
        Ok(None)
    }

    async fn set_user(&self, _user: &User, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate_user(&self, _email: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
