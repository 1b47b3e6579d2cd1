//! Print API deployment environments and their base URIs.
//!
//! Each environment maps to a fixed host; the API version path is part of
//! the mapping so callers never hardcode `v1/` or `v2/` at call sites.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Host root of the test (sandbox) environment.
pub const TEST_ROOT: &str = "https://test.printapi.nl/";

/// Host root of the live (production) environment.
pub const LIVE_ROOT: &str = "https://live.printapi.nl/";

/// Deployment target for API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Environment {
    /// Sandbox environment; orders are never produced.
    Test,
    /// Production environment.
    Live,
}

impl Environment {
    /// Tag used in configuration and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }

    /// Host root for this environment, without a version path.
    pub fn root(self) -> &'static str {
        match self {
            Self::Test => TEST_ROOT,
            Self::Live => LIVE_ROOT,
        }
    }

    /// Versioned base URI, always ending in `/`.
    pub fn base_uri(self, version: ApiVersion) -> String {
        format!("{}{}", self.root(), version.path())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "live" => Ok(Self::Live),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Version of the REST API, selecting the path segment under the host root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ApiVersion {
    /// First-generation API.
    V1,
    /// Current API.
    #[default]
    V2,
}

impl ApiVersion {
    /// Path segment including the trailing slash.
    pub fn path(self) -> &'static str {
        match self {
            Self::V1 => "v1/",
            Self::V2 => "v2/",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_end_matches('/'))
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('/').to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            _ => Err(ConfigError::InvalidVersion(s.to_string())),
        }
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
