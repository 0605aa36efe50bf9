//! The seam between the client and the network.
//!
//! # Design
//! The client never talks to the network itself; it hands a finished
//! `HttpRequest` to a `Transport` and gets an `HttpResponse` back. A non-2xx
//! status is a normal response here, not an error: only failures to complete
//! the round trip are reported as `ApiError::Network`. Once a status line has
//! arrived, body problems are reported against that status as
//! `ApiError::Decode`.

use std::fmt;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request/response round trip.
pub trait Transport: Send + Sync + fmt::Debug {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is built with `http_status_as_error(false)` so 4xx/5xx responses
/// come back as data for the normalizer to interpret.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Uses a caller-configured agent, e.g. one with timeouts or a proxy.
    ///
    /// The agent must have `http_status_as_error` disabled, otherwise every
    /// non-2xx answer surfaces as a network error.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match req.method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = match req.method {
                    HttpMethod::Get => self.agent.get(&req.url),
                    _ => self.agent.delete(&req.url),
                };
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &req.body {
                    Some(body) => builder.force_send_body().send(body.as_bytes()),
                    None => builder.call(),
                }
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = match req.method {
                    HttpMethod::Post => self.agent.post(&req.url),
                    _ => self.agent.put(&req.url),
                };
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| ApiError::Decode {
                status,
                body: String::new(),
                message: format!("failed to read response body: {e}"),
            })?;
        let body = body_text(status, bytes)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A 2xx body must be UTF-8 to be decoded; error bodies are kept lossily so
/// the caller still sees what the server said.
fn body_text(status: u16, bytes: Vec<u8>) -> Result<String, ApiError> {
    if !(200..300).contains(&status) {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }
    String::from_utf8(bytes).map_err(|e| ApiError::Decode {
        status,
        message: format!("response body is not valid UTF-8: {}", e.utf8_error()),
        body: String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

fn transport_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Http(e) => ApiError::InvalidRequest(e.to_string()),
        ureq::Error::BadUri(uri) => ApiError::InvalidRequest(format!("bad uri: {uri}")),
        other => ApiError::Network(other.to_string()),
    }
}
