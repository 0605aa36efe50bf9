//! Authenticated client and request dispatch for the FusionAuth API.
//!
//! # Design
//! `Client` is built once and never mutated. It holds the base URL, the
//! default tenant headers and a shared transport handle, so clones are cheap
//! and a single client can be used from many threads at once. Per-call
//! authentication overrides are merged into the outgoing request only; they
//! never touch `default_headers`.
//!
//! Dispatch is split the same way as everywhere else in this crate:
//! `build_request` produces an `HttpRequest` without I/O, the transport runs
//! it, and `response::normalize` turns the answer into an `Outcome`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::auth::{Auth, API_KEY_HEADER, TENANT_ID_HEADER};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryParams;
use crate::response::{normalize, Outcome};
use crate::transport::{Transport, UreqTransport};

/// Immutable, shareable FusionAuth client.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    default_headers: Vec<(String, String)>,
    application_id: Option<Uuid>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Builds a client using the default blocking transport.
    ///
    /// No network traffic happens here.
    pub fn new(base_url: &str, api_key: &str, tenant_id: Option<&str>) -> Result<Self, ApiError> {
        Self::with_transport(base_url, api_key, tenant_id, Arc::new(UreqTransport::new()))
    }

    pub fn with_transport(
        base_url: &str,
        api_key: &str,
        tenant_id: Option<&str>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ApiError::Configuration("base url must not be empty".to_string()));
        }
        let url = Url::parse(base_url)
            .map_err(|e| ApiError::Configuration(format!("invalid base url {base_url:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ApiError::Configuration(format!(
                "base url {base_url:?} must be an absolute http or https url"
            )));
        }

        let mut default_headers = vec![(API_KEY_HEADER.to_string(), api_key.to_string())];
        if let Some(tenant_id) = tenant_id {
            default_headers.push((TENANT_ID_HEADER.to_string(), tenant_id.to_string()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
            application_id: None,
            transport,
        })
    }

    /// Returns a copy of this client that fills in `applicationId` for calls
    /// that need one and were not given one explicitly.
    pub fn with_application_id(&self, application_id: Uuid) -> Self {
        Self {
            application_id: Some(application_id),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.default_headers
            .iter()
            .find(|(k, _)| k == TENANT_ID_HEADER)
            .map(|(_, v)| v.as_str())
    }

    pub fn application_id(&self) -> Option<Uuid> {
        self.application_id
    }

    /// Builds the request for `path` without sending it.
    ///
    /// `extra_headers` win over the defaults on a (case-insensitive) name
    /// collision. `Content-Type: application/json` is only added when there
    /// is a body.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        extra_headers: &[(String, String)],
    ) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        let mut headers = merge_headers(&self.default_headers, extra_headers);
        if body.is_some() && !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    /// Sends one request and returns the raw response.
    ///
    /// Any status code is a successful send; only transport failures are
    /// errors.
    pub fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        extra_headers: &[(String, String)],
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(method, path, body, extra_headers)?;
        debug!(method = %request.method, url = %request.url, "sending request");
        match self.transport.execute(&request) {
            Ok(response) => {
                debug!(status = response.status, url = %request.url, "received response");
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, method = %request.method, url = %request.url, "request failed");
                Err(e)
            }
        }
    }

    /// The single entry point used by every resource module.
    pub fn call(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
        auth: &Auth,
    ) -> Result<Outcome, ApiError> {
        let path = format!("{path}{}", query.encode());
        let raw = self.send(method, &path, body, &auth.headers())?;
        normalize(raw)
    }
}

fn merge_headers(defaults: &[(String, String)], extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged = defaults.to_vec();
    for (name, value) in extra {
        match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(entry) => *entry = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}
