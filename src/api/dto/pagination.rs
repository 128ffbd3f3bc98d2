//! Pagination query parameters.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// `skip`/`limit` query parameters.
///
/// Uses `serde_with` to parse numbers from query strings so the struct can be
/// `#[serde(flatten)]`ed into other query types.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub skip: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Validates and returns `(skip, limit)`.
    ///
    /// # Defaults
    ///
    /// - `skip`: 0
    /// - `limit`: 100
    ///
    /// # Validation
    ///
    /// - `skip` must be >= 0
    /// - `limit` must be between 1 and 1000
    pub fn skip_limit(&self) -> Result<(i64, i64), AppError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);

        if skip < 0 {
            return Err(AppError::bad_request(
                "skip must be greater than or equal to 0",
                json!({ "skip": skip }),
            ));
        }

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(
                format!("limit must be between 1 and {}", MAX_LIMIT),
                json!({ "limit": limit }),
            ));
        }

        Ok((skip, limit))
    }
}
