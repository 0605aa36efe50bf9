//! User registrations to applications.

use serde_json::Value;
use uuid::Uuid;

use crate::auth::Auth;
use crate::client::Client;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::response::Outcome;

/// Registers an existing user to the application named in `body`.
pub fn register(client: &Client, user_id: Uuid, body: &Value) -> Result<Outcome, ApiError> {
    client.call(
        HttpMethod::Post,
        &format!("/api/user/registration/{user_id}"),
        &QueryParams::new(),
        Some(body),
        &Auth::Tenant,
    )
}

/// Creates a user and their registration in one request.
pub fn create_user_and_register(client: &Client, body: &Value) -> Result<Outcome, ApiError> {
    client.call(HttpMethod::Post, "/api/user/registration", &QueryParams::new(), Some(body), &Auth::Tenant)
}

pub fn get(client: &Client, user_id: Uuid, application_id: Uuid) -> Result<Outcome, ApiError> {
    client.call(
        HttpMethod::Get,
        &format!("/api/user/registration/{user_id}/{application_id}"),
        &QueryParams::new(),
        None,
        &Auth::Tenant,
    )
}

pub fn update(client: &Client, user_id: Uuid, body: &Value) -> Result<Outcome, ApiError> {
    client.call(
        HttpMethod::Put,
        &format!("/api/user/registration/{user_id}"),
        &QueryParams::new(),
        Some(body),
        &Auth::Tenant,
    )
}

/// Removes the registration. A success carries the empty-string payload.
pub fn delete(client: &Client, user_id: Uuid, application_id: Uuid) -> Result<Outcome, ApiError> {
    client.call(
        HttpMethod::Delete,
        &format!("/api/user/registration/{user_id}/{application_id}"),
        &QueryParams::new(),
        None,
        &Auth::Tenant,
    )
}
