//! DTOs for contact endpoints.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use super::pagination::PaginationParams;
use super::trimmed;
use crate::domain::entities::{Contact, ContactData};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-() ]+$").expect("phone regex is valid"));

/// Accepted datetime layouts besides plain dates and RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a birthday given as a date, a naive datetime or an RFC 3339
/// timestamp. Only the date part is kept.
pub fn parse_birthday(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

fn deserialize_birthday<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_birthday(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid birthday '{}', expected YYYY-MM-DD or an ISO 8601 datetime",
            raw
        ))
    })
}

fn validate_not_in_future(birthday: &NaiveDate) -> Result<(), ValidationError> {
    if *birthday > Utc::now().date_naive() {
        return Err(ValidationError::new("future_birthday")
            .with_message("Birthday cannot be in the future".into()));
    }
    Ok(())
}

/// Body of contact create and full update.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email)]
    pub email: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        length(min = 5, max = 20),
        regex(path = *PHONE_RE, message = "Phone may only contain digits, spaces and + - ( )")
    )]
    pub phone: String,
    #[serde(deserialize_with = "deserialize_birthday")]
    #[validate(custom(function = "validate_not_in_future"))]
    pub birthday: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

impl From<ContactRequest> for ContactData {
    fn from(req: ContactRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            birthday: req.birthday,
            description: req.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone: c.phone,
            birthday: c.birthday,
            description: c.description,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// `GET /api/contacts/search` query.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    pub text: String,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// `POST /api/contacts/birthdays` body.
#[derive(Debug, Deserialize, Validate)]
pub struct BirthdaysRequest {
    #[validate(range(min = 1, max = 31))]
    pub days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn request(birthday: &str) -> serde_json::Value {
        json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "john@example.com",
            "phone": "+38 (050) 123-45-67",
            "birthday": birthday,
            "description": "college friend"
        })
    }

    #[test]
    fn test_parse_birthday_formats() {
        assert_eq!(parse_birthday("1990-05-17"), Some(d(1990, 5, 17)));
        assert_eq!(parse_birthday("1990-05-17T10:30:00"), Some(d(1990, 5, 17)));
        assert_eq!(parse_birthday("1990-05-17 10:30:00.123"), Some(d(1990, 5, 17)));
        assert_eq!(parse_birthday("1990-05-17T10:30"), Some(d(1990, 5, 17)));
        assert_eq!(parse_birthday("1990-05-17T23:00:00+02:00"), Some(d(1990, 5, 17)));
        assert_eq!(parse_birthday("1990-05-17T10:30:00Z"), Some(d(1990, 5, 17)));
        assert_eq!(parse_birthday("17.05.1990"), None);
        assert_eq!(parse_birthday("1990-02-30"), None);
    }

    #[test]
    fn test_valid_request() {
        let req: ContactRequest = serde_json::from_value(request("1990-05-17T00:00:00")).unwrap();
        assert!(req.validate().is_ok());

        let data = ContactData::from(req);
        assert_eq!(data.birthday, d(1990, 5, 17));
        assert_eq!(data.description.as_deref(), Some("college friend"));
    }

    #[test]
    fn test_description_is_optional() {
        let mut body = request("1990-05-17");
        body.as_object_mut().unwrap().remove("description");

        let req: ContactRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.description.is_none());
    }

    #[test]
    fn test_future_birthday_rejected() {
        let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();
        let req: ContactRequest =
            serde_json::from_value(request(&tomorrow.format("%Y-%m-%d").to_string())).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("birthday"));
    }

    #[test]
    fn test_today_birthday_accepted() {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let req: ContactRequest = serde_json::from_value(request(&today)).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_malformed_birthday_fails_deserialization() {
        assert!(serde_json::from_value::<ContactRequest>(request("yesterday")).is_err());
    }

    #[test]
    fn test_field_rules() {
        let mut body = request("1990-05-17");
        body["first_name"] = json!("J");
        body["email"] = json!("nope");
        body["phone"] = json!("call me maybe");
        body["description"] = json!("x".repeat(201));

        let req: ContactRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("description"));
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn test_names_are_trimmed_before_length_check() {
        let mut body = request("1990-05-17");
        body["first_name"] = json!("  J  ");
        body["last_name"] = json!("  Doe ");

        let req: ContactRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.last_name, "Doe");
        assert!(req.validate().unwrap_err().field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_blank_search_text_rejected() {
        let query: SearchQuery =
            serde_json::from_value(json!({ "text": "   " })).unwrap();
        assert_eq!(query.text, "");
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_birthdays_request_range() {
        let ok: BirthdaysRequest = serde_json::from_value(json!({ "days": 7 })).unwrap();
        assert!(ok.validate().is_ok());

        let zero: BirthdaysRequest = serde_json::from_value(json!({ "days": 0 })).unwrap();
        assert!(zero.validate().is_err());

        let big: BirthdaysRequest = serde_json::from_value(json!({ "days": 32 })).unwrap();
        assert!(big.validate().is_err());
    }
}
