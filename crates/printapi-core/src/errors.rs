//! Configuration error types.

/// Errors raised while resolving or loading client configuration.
///
/// All of these are detected before any network activity.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Environment tag other than `test` or `live`.
    #[error("invalid environment {0:?}: expected \"test\" or \"live\"")]
    InvalidEnvironment(String),

    /// Unknown API version.
    #[error("invalid API version {0:?}: expected \"v1\" or \"v2\"")]
    InvalidVersion(String),

    /// Base URI override is not an absolute http(s) URL.
    #[error("invalid base URI {0:?}")]
    InvalidBaseUri(String),

    /// Failed to read config file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path of the config file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse config.
    #[error("failed to parse config: {0}")]
    Parse(String),
}
