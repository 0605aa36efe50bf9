//! Error types for the FusionAuth client.
//!
//! # Design
//! An HTTP-level failure (the server answered with a non-2xx status) is not
//! an `ApiError`: it comes back as [`Outcome::Error`] with the decoded
//! payload. `ApiError` is reserved for failures where there is no usable
//! server answer: bad construction input, a transport that never completed
//! the round trip, or a body that should have been JSON and was not.
//!
//! [`Outcome::Error`]: crate::response::Outcome::Error

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid client construction input, e.g. an empty base URL.
    #[error("invalid client configuration: {0}")]
    Configuration(String),

    /// The request never reached the server, or the response was cut off.
    #[error("network error: {0}")]
    Network(String),

    /// The transport refused to send the request (bad header value or URI).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A response body could not be read in full or decoded as the expected
    /// JSON. The server did answer, with `status`.
    #[error("failed to decode response body (HTTP {status}): {message}")]
    Decode {
        status: u16,
        body: String,
        message: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A query parameter value was an array or object.
    #[error("query parameter `{key}` must be a string, integer or boolean")]
    InvalidQueryValue { key: String },
}

impl ApiError {
    /// True when the round trip did not complete and the caller may retry.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
