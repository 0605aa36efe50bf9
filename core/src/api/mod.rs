//! Resource modules. Each function is one templated call into
//! [`Client::call`](crate::Client::call) and returns the normalized
//! [`Outcome`](crate::Outcome).

pub mod jwt;
pub mod login;
pub mod registrations;
pub mod reports;
pub mod users;
