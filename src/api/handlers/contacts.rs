//! Handlers for contact endpoints.
//!
//! Every handler works on the authenticated user's own contacts.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use validator::Validate;

use crate::api::dto::contacts::{BirthdaysRequest, ContactRequest, ContactResponse, SearchQuery};
use crate::api::dto::pagination::PaginationParams;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::entities::{Contact, User};
use crate::error::AppError;
use crate::state::AppState;

fn to_responses(contacts: Vec<Contact>) -> Json<Vec<ContactResponse>> {
    Json(contacts.into_iter().map(ContactResponse::from).collect())
}

/// `GET /api/contacts/?skip=&limit=`
pub async fn list_contacts_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let (skip, limit) = params.skip_limit()?;

    let contacts = state
        .contact_service
        .list_contacts(user.id, skip, limit)
        .await?;

    Ok(to_responses(contacts))
}

/// Case-insensitive search by first name, last name or email.
///
/// `GET /api/contacts/search?text=&skip=&limit=`
pub async fn search_contacts_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    query.validate()?;
    let (skip, limit) = query.pagination.skip_limit()?;

    let contacts = state
        .contact_service
        .search_contacts(user.id, &query.text, skip, limit)
        .await?;

    Ok(to_responses(contacts))
}

/// Contacts with a birthday in the next `days` days (today included).
///
/// `POST /api/contacts/birthdays`
pub async fn upcoming_birthdays_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(payload): ApiJson<BirthdaysRequest>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    payload.validate()?;

    let today = Utc::now().date_naive();
    let contacts = state
        .contact_service
        .upcoming_birthdays(user.id, today, payload.days as u32)
        .await?;

    Ok(to_responses(contacts))
}

/// `GET /api/contacts/{contact_id}`
pub async fn get_contact_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(contact_id): ApiPath<i64>,
) -> Result<Json<ContactResponse>, AppError> {
    let contact = state
        .contact_service
        .get_contact(contact_id, user.id)
        .await?;

    Ok(Json(contact.into()))
}

/// `POST /api/contacts/`
pub async fn create_contact_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(payload): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    payload.validate()?;

    let contact = state
        .contact_service
        .create_contact(user.id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(contact.into())))
}

/// Replaces every field of a contact.
///
/// `PUT /api/contacts/{contact_id}`
pub async fn update_contact_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(contact_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    payload.validate()?;

    let contact = state
        .contact_service
        .update_contact(contact_id, user.id, payload.into())
        .await?;

    Ok(Json(contact.into()))
}

/// `DELETE /api/contacts/{contact_id}`
pub async fn delete_contact_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(contact_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    state
        .contact_service
        .remove_contact(contact_id, user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
