//! Per-call authentication header selection.

/// Header carrying the tenant API key on every request.
pub const API_KEY_HEADER: &str = "Authorization";

/// Header carrying the tenant identifier when the client is tenant-scoped.
pub const TENANT_ID_HEADER: &str = "X-FusionAuth-TenantId";

/// How a single call authenticates, on top of the client's default headers.
///
/// This is chosen per call and never stored on the [`Client`]; the override
/// headers are merged into the request at send time.
///
/// [`Client`]: crate::client::Client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// Only the client's tenant API key (and tenant id) headers.
    #[default]
    Tenant,
    /// `Authorization: Bearer <token>` for access-token endpoints.
    Bearer(String),
    /// An arbitrary header, for endpoints with their own convention.
    Header { name: String, value: String },
}

impl Auth {
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    /// `Authorization: JWT <token>`, accepted by the JWT validation endpoint.
    pub fn jwt(token: &str) -> Self {
        Auth::Header {
            name: "Authorization".to_string(),
            value: format!("JWT {token}"),
        }
    }

    /// The headers this mode adds to a request.
    pub fn headers(&self) -> Vec<(String, String)> {
        match self {
            Auth::Tenant => Vec::new(),
            Auth::Bearer(token) => vec![("Authorization".to_string(), format!("Bearer {token}"))],
            Auth::Header { name, value } => vec![(name.clone(), value.clone())],
        }
    }
}
