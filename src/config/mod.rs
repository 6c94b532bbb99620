use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid store URL: {0}")]
    InvalidStoreUrl(String),
}

/// Runtime configuration for the integration API.
///
/// Constructed once in main and injected through axum state; handlers never
/// reach for process environment themselves. The per-request ConfigCheck is
/// `ensure_complete`, which treats an empty value the same as an absent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the hosted record store. Doubles as the token issuer.
    pub store_url: String,
    /// Elevated credential used only for integration-key lookup and touch.
    pub service_role_key: String,
    /// Public credential sent alongside the per-request user token.
    pub anon_key: String,
    /// Raw HMAC key material for short-lived token signing.
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            store_url: read_var("TASKAPI_STORE_URL")?,
            service_role_key: read_var("TASKAPI_SERVICE_ROLE_KEY")?,
            anon_key: read_var("TASKAPI_ANON_KEY")?,
            jwt_secret: read_var("TASKAPI_JWT_SECRET")?,
        };

        Url::parse(&config.store_url)
            .map_err(|_| ConfigError::InvalidStoreUrl(config.store_url.clone()))?;

        Ok(config)
    }

    /// Per-request configuration check. Any blank value means the deployment
    /// is broken and the request must fail with a generic 500.
    pub fn ensure_complete(&self) -> Result<(), ConfigError> {
        if self.store_url.trim().is_empty() {
            return Err(ConfigError::Missing("store URL"));
        }
        if self.service_role_key.trim().is_empty() {
            return Err(ConfigError::Missing("service role key"));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("anon key"));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("signing secret"));
        }
        Ok(())
    }
}

fn read_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
