//! Client configuration.
//!
//! Nothing in the client reads the environment on its own. Callers that keep
//! their settings in environment variables opt in with
//! [`ClientConfig::from_env`]; callers with a config file can embed
//! `ClientConfig` in their own `Deserialize` structs.

use serde::Deserialize;
use uuid::Uuid;

use crate::client::Client;
use crate::error::ApiError;

pub const URL_VAR: &str = "FUSIONAUTH_URL";
pub const API_KEY_VAR: &str = "FUSIONAUTH_API_KEY";
pub const TENANT_ID_VAR: &str = "FUSIONAUTH_TENANT_ID";
pub const APPLICATION_ID_VAR: &str = "FUSIONAUTH_APPLICATION_ID";

/// Settings needed to build a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub application_id: Option<Uuid>,
}

impl ClientConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            tenant_id: None,
            application_id: None,
        }
    }

    pub fn tenant_id(mut self, tenant_id: &str) -> Self {
        self.tenant_id = Some(tenant_id.to_string());
        self
    }

    pub fn application_id(mut self, application_id: Uuid) -> Self {
        self.application_id = Some(application_id);
        self
    }

    /// Reads `FUSIONAUTH_URL`, `FUSIONAUTH_API_KEY` and the optional
    /// `FUSIONAUTH_TENANT_ID` / `FUSIONAUTH_APPLICATION_ID`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Configuration(format!("{name} is not set")))
        };
        let base_url = required(URL_VAR)?;
        let api_key = required(API_KEY_VAR)?;
        let tenant_id = lookup(TENANT_ID_VAR).filter(|v| !v.is_empty());
        let application_id = lookup(APPLICATION_ID_VAR)
            .filter(|v| !v.is_empty())
            .map(|v| {
                Uuid::parse_str(&v).map_err(|e| {
                    ApiError::Configuration(format!("{APPLICATION_ID_VAR} is not a UUID: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            api_key,
            tenant_id,
            application_id,
        })
    }

    /// Builds a client with the default transport.
    pub fn build(self) -> Result<Client, ApiError> {
        let client = Client::new(&self.base_url, &self.api_key, self.tenant_id.as_deref())?;
        Ok(match self.application_id {
            Some(id) => client.with_application_id(id),
            None => client,
        })
    }
}
