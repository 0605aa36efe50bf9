//! Response normalization.
//!
//! # Design
//! Every resource call, whatever its endpoint, reduces its raw response to an
//! [`Outcome`]. The tag comes from the status class alone; the payload is the
//! decoded JSON body. Bodiless 2xx answers (delete, revoke, logout) carry the
//! empty-string sentinel so callers see one payload type everywhere.
//!
//! A 2xx body that is not JSON is a [`ApiError::Decode`], not a success with a
//! string payload: callers must be able to tell a malformed success apart.
//! Error bodies are best-effort: JSON when it parses, the raw text otherwise.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Outcome tag, derived only from the HTTP status class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Ok,
    Error,
}

/// The uniform result of a resource call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx response.
    Ok { payload: Value, raw: HttpResponse },
    /// Non-2xx response, with whatever detail the server provided.
    Error { payload: Value, raw: HttpResponse },
}

impl Outcome {
    pub fn tag(&self) -> Tag {
        match self {
            Outcome::Ok { .. } => Tag::Ok,
            Outcome::Error { .. } => Tag::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.tag() == Tag::Ok
    }

    pub fn payload(&self) -> &Value {
        match self {
            Outcome::Ok { payload, .. } | Outcome::Error { payload, .. } => payload,
        }
    }

    pub fn raw(&self) -> &HttpResponse {
        match self {
            Outcome::Ok { raw, .. } | Outcome::Error { raw, .. } => raw,
        }
    }

    pub fn status(&self) -> u16 {
        self.raw().status
    }

    pub fn into_parts(self) -> (Tag, Value, HttpResponse) {
        let tag = self.tag();
        match self {
            Outcome::Ok { payload, raw } | Outcome::Error { payload, raw } => (tag, payload, raw),
        }
    }

    /// Deserializes the payload into `T`.
    ///
    /// Works on either tag, so an error body can be read as a typed
    /// field-error structure too. A shape mismatch is a [`ApiError::Decode`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let raw = self.raw();
        serde_json::from_value(self.payload().clone()).map_err(|e| ApiError::Decode {
            status: raw.status,
            body: raw.body.clone(),
            message: e.to_string(),
        })
    }
}

/// Reduces a raw response to an [`Outcome`].
pub fn normalize(raw: HttpResponse) -> Result<Outcome, ApiError> {
    if raw.is_success() {
        if raw.body.trim().is_empty() {
            return Ok(Outcome::Ok {
                payload: Value::String(String::new()),
                raw,
            });
        }
        return match serde_json::from_str(&raw.body) {
            Ok(payload) => Ok(Outcome::Ok { payload, raw }),
            Err(e) => Err(ApiError::Decode {
                status: raw.status,
                body: raw.body,
                message: e.to_string(),
            }),
        };
    }

    let payload = serde_json::from_str(&raw.body).unwrap_or_else(|_| Value::String(raw.body.clone()));
    Ok(Outcome::Error { payload, raw })
}
