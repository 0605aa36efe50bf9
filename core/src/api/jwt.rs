//! JWT issue, validation and refresh-token management.
//!
//! These endpoints mix authentication conventions: `issue` takes the user's
//! access token as a Bearer credential, `validate` expects the
//! `Authorization: JWT <token>` scheme, and the refresh-token endpoints use
//! the tenant API key.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Auth;
use crate::client::Client;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::response::Outcome;

#[derive(Debug, Clone, Default)]
pub struct IssueJwtOptions {
    /// Falls back to the client's application id.
    pub application_id: Option<Uuid>,
    pub refresh_token: Option<String>,
}

/// Which refresh tokens [`revoke_refresh_tokens`] removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevokeRefreshTokens {
    User(Uuid),
    Application(Uuid),
    Token(String),
}

/// Issues a JWT for another application, using an existing access token.
pub fn issue(client: &Client, token: &str, options: &IssueJwtOptions) -> Result<Outcome, ApiError> {
    let query = QueryParams::new()
        .param("applicationId", options.application_id.or(client.application_id()))
        .param("refreshToken", options.refresh_token.as_deref());
    client.call(HttpMethod::Get, "/api/jwt/issue", &query, None, &Auth::bearer(token))
}

pub fn validate(client: &Client, token: &str) -> Result<Outcome, ApiError> {
    client.call(HttpMethod::Get, "/api/jwt/validate", &QueryParams::new(), None, &Auth::jwt(token))
}

/// Exchanges a refresh token for a new access token.
pub fn refresh(client: &Client, refresh_token: &str, token: Option<&str>) -> Result<Outcome, ApiError> {
    let mut body = json!({ "refreshToken": refresh_token });
    if let Some(token) = token {
        body["token"] = Value::String(token.to_string());
    }
    client.call(HttpMethod::Post, "/api/jwt/refresh", &QueryParams::new(), Some(&body), &Auth::Tenant)
}

pub fn refresh_tokens_for_user(client: &Client, user_id: Uuid) -> Result<Outcome, ApiError> {
    let query = QueryParams::new().required("userId", user_id);
    client.call(HttpMethod::Get, "/api/jwt/refresh", &query, None, &Auth::Tenant)
}

pub fn revoke_refresh_tokens(client: &Client, which: &RevokeRefreshTokens) -> Result<Outcome, ApiError> {
    let query = match which {
        RevokeRefreshTokens::User(id) => QueryParams::new().required("userId", *id),
        RevokeRefreshTokens::Application(id) => QueryParams::new().required("applicationId", *id),
        RevokeRefreshTokens::Token(token) => QueryParams::new().required("token", token.as_str()),
    };
    client.call(HttpMethod::Delete, "/api/jwt/refresh", &query, None, &Auth::Tenant)
}

/// Public signing keys, for all applications or a single one.
pub fn public_keys(client: &Client, application_id: Option<Uuid>) -> Result<Outcome, ApiError> {
    let query = QueryParams::new().param("applicationId", application_id);
    client.call(HttpMethod::Get, "/api/jwt/public-key", &query, None, &Auth::Tenant)
}
