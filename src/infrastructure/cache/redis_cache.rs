//! Redis-backed user cache.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::{User, UserRole};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "user:";

fn user_key(email: &str) -> String {
    format!("{KEY_PREFIX}{email}")
}

/// What is stored per user. Credentials stay in Postgres: a user read back
/// from the cache has an empty `hashed_password` and no `refresh_token`.
#[derive(Debug, Serialize, Deserialize)]
struct CachedUser {
    id: i64,
    username: String,
    email: String,
    avatar: Option<String>,
    confirmed: bool,
    role: UserRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            confirmed: user.confirmed,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<CachedUser> for User {
    fn from(cached: CachedUser) -> Self {
        Self {
            id: cached.id,
            username: cached.username,
            email: cached.email,
            hashed_password: String::new(),
            avatar: cached.avatar,
            confirmed: cached.confirmed,
            role: cached.role,
            refresh_token: None,
            created_at: cached.created_at,
            updated_at: cached.updated_at,
        }
    }
}

fn encode_user(user: &User) -> serde_json::Result<String> {
    serde_json::to_string(&CachedUser::from(user))
}

fn decode_user(raw: &str) -> serde_json::Result<User> {
    serde_json::from_str::<CachedUser>(raw).map(User::from)
}

/// Users serialized as JSON under `user:<email>`.
///
/// Reads and writes fail open. A Redis error is logged and treated as a
/// miss, so requests fall back to Postgres.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Opens a managed connection and checks it with `PING`.
    ///
    /// # Errors
    ///
    /// [`CacheError::ConnectionError`] for a malformed URL, an unreachable
    /// server or a failed `PING`.
    pub async fn connect(redis_url: &str, default_ttl: u64) -> CacheResult<Self> {
        info!(
            url = %crate::config::mask_connection_string(redis_url),
            "Connecting to Redis"
        );

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::ConnectionError(format!("invalid Redis URL: {e}")))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis unreachable: {e}")))?;
        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {e}")))?;

        info!(ttl_seconds = default_ttl, "User cache enabled");
        Ok(Self { conn, default_ttl })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_user(&self, email: &str) -> CacheResult<Option<User>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(user_key(email)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%email, error = %e, "Redis GET failed");
                return Ok(None);
            }
        };

        let Some(raw) = raw else {
            debug!(%email, "user cache miss");
            return Ok(None);
        };

        match decode_user(&raw) {
            Ok(user) => {
                debug!(%email, "user cache hit");
                Ok(Some(user))
            }
            Err(e) => {
                warn!(%email, error = %e, "Dropping unreadable cache entry");
                Ok(None)
            }
        }
    }

    async fn set_user(&self, user: &User, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let payload = encode_user(user)
            .map_err(|e| CacheError::OperationError(format!("serialize user: {e}")))?;

        let mut conn = self.conn.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(user_key(&user.email), payload, ttl)
            .await
        {
            warn!(email = %user.email, error = %e, "Redis SETEX failed");
        }
        Ok(())
    }

    async fn invalidate_user(&self, email: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        match conn.del::<_, i64>(user_key(email)).await {
            Ok(0) => {}
            Ok(_) => debug!(%email, "user cache entry removed"),
            Err(e) => warn!(%email, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
