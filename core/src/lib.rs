//! Blocking client core for the FusionAuth REST API.
//!
//! # Overview
//! Every resource call funnels through one path: the query string is built
//! by [`QueryParams`], the [`Client`] merges its default tenant headers with
//! the call's [`Auth`] mode and hands an [`HttpRequest`] to its
//! [`Transport`], and the raw [`HttpResponse`] is reduced to an [`Outcome`]
//! by [`normalize`].
//!
//! # Design
//! - `Client` is immutable and `Send + Sync`; per-call auth never mutates it.
//! - HTTP failures are values (`Outcome::Error`), not errors. `ApiError`
//!   covers configuration, transport and decode failures only.
//! - Requests and responses are plain data, so everything above the
//!   transport is testable without a network.
//!
//! ```no_run
//! use fusionauth_core::{api::reports, Client, Tag};
//!
//! # fn main() -> Result<(), fusionauth_core::ApiError> {
//! let client = Client::new("http://localhost:9011", "api-key", Some("tenant-id"))?;
//! let outcome = reports::totals(&client)?;
//! if outcome.tag() == Tag::Ok {
//!     println!("{}", outcome.payload()["globalCount"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod response;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::Auth;
pub use client::Client;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{QueryParams, QueryValue};
pub use response::{normalize, Outcome, Tag};
pub use transport::{Transport, UreqTransport};
