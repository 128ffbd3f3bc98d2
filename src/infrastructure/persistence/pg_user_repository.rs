//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUser, User, UserRole};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const USER_COLUMNS: &str = "id, username, email, hashed_password, avatar, confirmed, role, \
                            refresh_token, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    hashed_password: String,
    avatar: Option<String>,
    confirmed: bool,
    role: String,
    refresh_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<UserRole>().map_err(|e| {
            tracing::error!(user_id = row.id, error = %e, "Invalid role stored for user");
            AppError::internal("Database error", json!({}))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            hashed_password: row.hashed_password,
            avatar: row.avatar,
            confirmed: row.confirmed,
            role,
            refresh_token: row.refresh_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn user_not_found(email: &str) -> AppError {
    AppError::not_found("User not found", json!({ "email": email }))
}

/// PostgreSQL repository for user accounts.
///
/// Emails are compared with `LOWER()` on both sides, matching the
/// `users_email_lower_idx` unique index.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        bind: &str,
    ) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {clause}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(bind)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.fetch_one_where("username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.fetch_one_where("LOWER(email) = LOWER($1)", email).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, hashed_password, avatar, confirmed, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.hashed_password)
            .bind(&new_user.avatar)
            .bind(new_user.confirmed)
            .bind(new_user.role.as_str())
            .fetch_one(self.pool.as_ref())
            .await?;

        User::try_from(row)
    }

    async fn confirm_email(&self, email: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET confirmed = TRUE, updated_at = NOW()
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(email));
        }

        Ok(())
    }

    async fn update_avatar(&self, email: &str, url: &str) -> Result<User, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET avatar = $2, updated_at = NOW()
            WHERE LOWER(email) = LOWER($1)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| user_not_found(email))?;

        User::try_from(row)
    }

    async fn update_refresh_token(
        &self,
        user_id: i64,
        refresh_token: Option<String>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(refresh_token)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update_password(&self, email: &str, hashed_password: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET hashed_password = $2, refresh_token = NULL, updated_at = NOW()
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .bind(hashed_password)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(email));
        }

        Ok(())
    }

    async fn set_role(&self, email: &str, role: UserRole) -> Result<User, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE LOWER(email) = LOWER($1)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .bind(role.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| user_not_found(email))?;

        User::try_from(row)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
