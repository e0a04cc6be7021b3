use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::{Identity, DEFAULT_TOKEN_PATH};
use crate::client::{PRODUCTION_URL, SANDBOX_URL};
use crate::error::NeoError;
use crate::sca::DEFAULT_PLATFORM_DOMAIN;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeoConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub environment: Option<Environment>,
    /// Overrides the URL implied by `environment`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub platform_domain: Option<String>,
    #[serde(default)]
    pub token_path: Option<String>,
}

impl NeoConfig {
    /// Fill every unset field from `other`. Fields already set win.
    pub fn merge(&mut self, other: NeoConfig) {
        fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
            if slot.is_none() {
                *slot = value;
            }
        }
        fill(&mut self.client_id, other.client_id);
        fill(&mut self.client_secret, other.client_secret);
        fill(&mut self.environment, other.environment);
        fill(&mut self.base_url, other.base_url);
        fill(&mut self.device_id, other.device_id);
        fill(&mut self.platform_domain, other.platform_domain);
        fill(&mut self.token_path, other.token_path);
    }

    pub fn identity(&self) -> Result<Identity, NeoError> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Ok(Identity::new(id, secret))
            }
            _ => Err(NeoError::ConfigError {
                path: PathBuf::from("<config>"),
                detail: "clientId and clientSecret are required (or set NEO_CLIENT and NEO_SECRET)"
                    .into(),
            }),
        }
    }

    pub fn base_url(&self) -> String {
        match (&self.base_url, self.environment.unwrap_or_default()) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Environment::Sandbox) => SANDBOX_URL.to_string(),
            (None, Environment::Production) => PRODUCTION_URL.to_string(),
        }
    }

    pub fn token_path(&self) -> &str {
        self.token_path.as_deref().unwrap_or(DEFAULT_TOKEN_PATH)
    }

    pub fn platform_domain(&self) -> &str {
        self.platform_domain
            .as_deref()
            .unwrap_or(DEFAULT_PLATFORM_DOMAIN)
    }

    /// The configured device id, or a fresh random one.
    pub fn device_id(&self) -> String {
        self.device_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}
