//! API error types.

use printapi_core::ConfigError;

/// Errors raised by [`authenticate`](crate::auth::authenticate) and
/// [`Client`](crate::client::Client) requests.
///
/// Every variant except [`ApiError::ReadFile`] is a client error;
/// [`ApiError::Response`] is the specialization for replies with a
/// non-success HTTP status.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Invalid environment, version or base URI. Raised before any request.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request could not be completed (DNS, connect, timeout, ...).
    #[error("request failed [{code}]: {message}")]
    Transport {
        /// Short transport failure code, e.g. `connect` or `timeout`.
        code: &'static str,
        /// Description of the underlying failure, including its causes.
        message: String,
    },

    /// The API answered with a status outside `200..300`.
    #[error("HTTP {status}: {body}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A success response body was not valid JSON of the expected shape.
    #[error("failed to parse API response: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The local upload payload could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path of the payload file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Check if this is a client error, i.e. anything except a local
    /// upload read failure. Response errors are client errors too.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::ReadFile { .. })
    }

    /// Check if the API answered with a non-success status.
    pub fn is_response_error(&self) -> bool {
        matches!(self, Self::Response { .. })
    }

    /// Check if this is a 404 Not Found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Response { status: 404, .. })
    }

    /// Check if this is a 401 Unauthorized error.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Response { status: 401, .. })
    }

    /// Check if the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { code: "timeout", .. })
    }

    /// HTTP status of a response error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of a response error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Response { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            code: transport_code(&err),
            message: error_chain(&err),
        }
    }
}

/// Classify a transport failure into a short code.
fn transport_code(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_builder() {
        "builder"
    } else if err.is_redirect() {
        "redirect"
    } else if err.is_body() {
        "body"
    } else if err.is_decode() {
        "decode"
    } else if err.is_request() {
        "request"
    } else if err.is_status() {
        "status"
    } else {
        "unknown"
    }
}

/// Join an error with all of its sources, outermost first.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
