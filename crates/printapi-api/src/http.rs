//! HTTP transport construction.
//!
//! Every API call gets its own transport handle configured with the
//! caller's timeout and the fixed connect timeout. Idle connections are not
//! kept, so no state carries over between calls.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::trace;

use printapi_core::config::CONNECT_TIMEOUT_SECS;

/// JSON media type, sent as `Accept` on every request.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Options for constructing a transport handle.
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    /// Overall request timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl HttpClientOptions {
    /// Options with the given request timeout and the fixed connect timeout.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
        }
    }

    /// Request timeout as a duration, `None` when unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Build a reqwest client that sends `Accept: application/json` and a
/// crate User-Agent on every request.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed.
pub fn build_client(opts: &HttpClientOptions) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(concat!("printapi-rust/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(opts.connect_timeout_secs))
        .pool_max_idle_per_host(0);
    if let Some(timeout) = opts.timeout() {
        builder = builder.timeout(timeout);
    }

    trace!(
        timeout_secs = opts.timeout_secs,
        connect_timeout_secs = opts.connect_timeout_secs,
        "Building HTTP client"
    );
    builder.build()
}

/// Format an authorization header value from a bearer token.
pub fn bearer_header_value(token: &str) -> String {
    format!("Bearer {token}")
}
