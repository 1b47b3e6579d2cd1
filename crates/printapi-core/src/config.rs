//! Client configuration.
//!
//! Applications either build a [`ClientConfig`] in code or keep it in a
//! YAML document such as:
//!
//! ```yaml
//! environment: live
//! api_version: v2
//! timeout_secs: 120
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::environment::{ApiVersion, Environment};
use crate::errors::ConfigError;

/// Default timeout for API requests, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Default timeout for the OAuth token exchange, in seconds.
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 60;

/// Fixed connect timeout for every request, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Settings used to authenticate and build a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Target environment.
    pub environment: Environment,
    /// API version selecting the base path.
    #[serde(default)]
    pub api_version: ApiVersion,
    /// Replaces the environment root entirely (e.g. a local mock server).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    /// Request timeout for API calls; 0 disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Request timeout for the token exchange; 0 disables it.
    #[serde(default = "default_auth_timeout_secs")]
    pub auth_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_auth_timeout_secs() -> u64 {
    DEFAULT_AUTH_TIMEOUT_SECS
}

impl ClientConfig {
    /// Configuration for an environment with default version and timeouts.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            api_version: ApiVersion::default(),
            base_uri: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_timeout_secs: DEFAULT_AUTH_TIMEOUT_SECS,
        }
    }

    /// Parse an environment tag into a default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] for unknown tags.
    pub fn for_tag(environment: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(environment.parse()?))
    }

    /// Select the API version.
    #[must_use]
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Route all requests to `uri` instead of the environment root.
    #[must_use]
    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    /// Set the API request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Resolve the base URI that request paths are joined onto.
    ///
    /// An override is normalized to end with exactly one `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUri`] if the override is not an
    /// absolute `http` or `https` URL.
    pub fn base_uri(&self) -> Result<String, ConfigError> {
        match self.base_uri {
            Some(ref uri) => {
                let parsed =
                    Url::parse(uri).map_err(|_| ConfigError::InvalidBaseUri(uri.clone()))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::InvalidBaseUri(uri.clone()));
                }
                Ok(format!("{}/", uri.trim_end_matches('/')))
            }
            None => Ok(self.environment.base_uri(self.api_version)),
        }
    }

    /// Parse configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed YAML or unknown tags.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }
}
