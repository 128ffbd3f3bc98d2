//! PostgreSQL implementation of contact repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{BirthdayWindow, Contact, ContactData};
use crate::domain::repositories::ContactRepository;
use crate::error::AppError;
use crate::utils::like::contains_pattern;

const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, phone, birthday, description, \
                               user_id, created_at, updated_at";

/// `month * 100 + day` of the birthday column.
const BIRTHDAY_MD: &str =
    "(EXTRACT(MONTH FROM birthday)::int * 100 + EXTRACT(DAY FROM birthday)::int)";

#[derive(Debug, FromRow)]
struct ContactRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    birthday: NaiveDate,
    description: Option<String>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            birthday: row.birthday,
            description: row.description,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for contacts.
///
/// Every statement filters on `user_id`, so rows of other users are invisible.
pub struct PgContactRepository {
    pool: Arc<PgPool>,
}

impl PgContactRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn list(&self, user_id: i64, skip: i64, limit: i64) -> Result<Vec<Contact>, AppError> {
        let sql = format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE user_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_by_id(&self, id: i64, user_id: i64) -> Result<Option<Contact>, AppError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND user_id = $2");

        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Contact::from))
    }

    async fn create(&self, user_id: i64, data: ContactData) -> Result<Contact, AppError> {
        let sql = format!(
            r#"
            INSERT INTO contacts (first_name, last_name, email, phone, birthday, description, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CONTACT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(data.birthday)
            .bind(&data.description)
            .bind(user_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        data: ContactData,
    ) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            r#"
            UPDATE contacts
            SET first_name = $3,
                last_name = $4,
                email = $5,
                phone = $6,
                birthday = $7,
                description = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {CONTACT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(data.birthday)
            .bind(&data.description)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Contact::from))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            "DELETE FROM contacts WHERE id = $1 AND user_id = $2 RETURNING {CONTACT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Contact::from))
    }

    async fn search(
        &self,
        user_id: i64,
        text: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Contact>, AppError> {
        let sql = format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE user_id = $1
              AND (first_name ILIKE $2 ESCAPE '\'
                   OR last_name ILIKE $2 ESCAPE '\'
                   OR email ILIKE $2 ESCAPE '\')
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#
        );

        let rows = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id)
            .bind(contains_pattern(text))
            .bind(limit)
            .bind(skip)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn upcoming_birthdays(
        &self,
        user_id: i64,
        window: BirthdayWindow,
    ) -> Result<Vec<Contact>, AppError> {
        // Days after New Year sort behind December when the window wraps.
        let condition = if window.wraps_year() {
            format!("({BIRTHDAY_MD} >= $2 OR {BIRTHDAY_MD} <= $3)")
        } else {
            format!("{BIRTHDAY_MD} BETWEEN $2 AND $3")
        };

        let sql = format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE user_id = $1 AND {condition}
            ORDER BY ({BIRTHDAY_MD} < $2), {BIRTHDAY_MD}, id
            "#
        );

        let rows = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }
}
