//! User CRUD and lookup.

use serde_json::Value;
use uuid::Uuid;

use crate::auth::Auth;
use crate::client::Client;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::response::Outcome;

#[derive(Debug, Clone, Default)]
pub struct DeleteUserOptions {
    /// Permanently delete instead of deactivating.
    pub hard_delete: Option<bool>,
}

/// Creates a user. Without `user_id` the server generates one.
pub fn create(client: &Client, user_id: Option<Uuid>, body: &Value) -> Result<Outcome, ApiError> {
    let path = match user_id {
        Some(id) => format!("/api/user/{id}"),
        None => "/api/user".to_string(),
    };
    client.call(HttpMethod::Post, &path, &QueryParams::new(), Some(body), &Auth::Tenant)
}

pub fn get(client: &Client, user_id: Uuid) -> Result<Outcome, ApiError> {
    client.call(HttpMethod::Get, &format!("/api/user/{user_id}"), &QueryParams::new(), None, &Auth::Tenant)
}

pub fn get_by_login_id(client: &Client, login_id: &str) -> Result<Outcome, ApiError> {
    let query = QueryParams::new().required("loginId", login_id);
    client.call(HttpMethod::Get, "/api/user", &query, None, &Auth::Tenant)
}

pub fn get_by_email(client: &Client, email: &str) -> Result<Outcome, ApiError> {
    let query = QueryParams::new().required("email", email);
    client.call(HttpMethod::Get, "/api/user", &query, None, &Auth::Tenant)
}

/// Replaces the user.
pub fn update(client: &Client, user_id: Uuid, body: &Value) -> Result<Outcome, ApiError> {
    client.call(
        HttpMethod::Put,
        &format!("/api/user/{user_id}"),
        &QueryParams::new(),
        Some(body),
        &Auth::Tenant,
    )
}

pub fn delete(client: &Client, user_id: Uuid, options: &DeleteUserOptions) -> Result<Outcome, ApiError> {
    let query = QueryParams::new().param("hardDelete", options.hard_delete);
    client.call(HttpMethod::Delete, &format!("/api/user/{user_id}"), &query, None, &Auth::Tenant)
}

/// The user that owns `token`.
pub fn me(client: &Client, token: &str) -> Result<Outcome, ApiError> {
    client.call(HttpMethod::Get, "/api/user", &QueryParams::new(), None, &Auth::bearer(token))
}
