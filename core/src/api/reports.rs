//! Reporting endpoints.
//!
//! Date-range reports share one base parameter set (`applicationId`,
//! `start`, `end`); endpoint-specific filters are merged over it.

use uuid::Uuid;

use crate::auth::Auth;
use crate::client::Client;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::response::Outcome;

/// Reporting window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    /// Limits the report to one application. Falls back to the client's
    /// application id; `None` on both reports across all applications.
    pub application_id: Option<Uuid>,
    pub start: i64,
    pub end: i64,
}

impl ReportRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            application_id: None,
            start,
            end,
        }
    }

    fn params(&self, client: &Client) -> QueryParams {
        QueryParams::new()
            .param("applicationId", self.application_id.or(client.application_id()))
            .required("start", self.start)
            .required("end", self.end)
    }
}

/// Extra filters for the login report.
#[derive(Debug, Clone, Default)]
pub struct LoginReportFilter {
    pub login_id: Option<String>,
    pub user_id: Option<Uuid>,
}

pub fn daily_active_users(client: &Client, range: &ReportRange) -> Result<Outcome, ApiError> {
    report(client, "daily-active-user", &range.params(client))
}

pub fn monthly_active_users(client: &Client, range: &ReportRange) -> Result<Outcome, ApiError> {
    report(client, "monthly-active-user", &range.params(client))
}

pub fn registrations(client: &Client, range: &ReportRange) -> Result<Outcome, ApiError> {
    report(client, "registration", &range.params(client))
}

pub fn logins(client: &Client, range: &ReportRange, filter: &LoginReportFilter) -> Result<Outcome, ApiError> {
    let filters = QueryParams::new()
        .param("loginId", filter.login_id.as_deref())
        .param("userId", filter.user_id);
    report(client, "login", &range.params(client).merge(&filters))
}

/// Global and per-application registration totals.
pub fn totals(client: &Client) -> Result<Outcome, ApiError> {
    report(client, "totals", &QueryParams::new())
}

fn report(client: &Client, name: &str, query: &QueryParams) -> Result<Outcome, ApiError> {
    client.call(HttpMethod::Get, &format!("/api/report/{name}"), query, None, &Auth::Tenant)
}
