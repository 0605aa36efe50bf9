//! Login and logout.

use serde_json::Value;
use uuid::Uuid;

use crate::auth::Auth;
use crate::client::Client;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::response::Outcome;

/// Query options for [`logout`].
#[derive(Debug, Clone, Default)]
pub struct LogoutOptions {
    /// Revoke every refresh token of the user, not only this one.
    pub global: Option<bool>,
    pub refresh_token: Option<String>,
}

/// Authenticates a user with a login id and password.
///
/// When the client carries an application id and `body` has no
/// `applicationId`, the client's id is added so the response includes the
/// user's registration for that application.
pub fn login(client: &Client, body: &Value) -> Result<Outcome, ApiError> {
    let body = with_application_id(client, body);
    client.call(HttpMethod::Post, "/api/login", &QueryParams::new(), Some(&body), &Auth::Tenant)
}

pub fn logout(client: &Client, options: &LogoutOptions) -> Result<Outcome, ApiError> {
    let query = QueryParams::new()
        .param("global", options.global)
        .param("refreshToken", options.refresh_token.as_deref());
    client.call(HttpMethod::Post, "/api/logout", &query, None, &Auth::Tenant)
}

/// Records a login that happened outside FusionAuth.
pub fn update_login_instant(
    client: &Client,
    user_id: Uuid,
    application_id: Option<Uuid>,
) -> Result<Outcome, ApiError> {
    let path = match application_id.or(client.application_id()) {
        Some(app) => format!("/api/login/{user_id}/{app}"),
        None => format!("/api/login/{user_id}"),
    };
    client.call(HttpMethod::Put, &path, &QueryParams::new(), None, &Auth::Tenant)
}

fn with_application_id(client: &Client, body: &Value) -> Value {
    let mut body = body.clone();
    if let (Some(app), Value::Object(map)) = (client.application_id(), &mut body) {
        map.entry("applicationId")
            .or_insert_with(|| Value::String(app.to_string()));
    }
    body
}
