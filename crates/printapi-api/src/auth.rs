//! OAuth2 client-credentials authentication.
//!
//! The token endpoint lives at `{base_uri}oauth`. Credentials travel as form
//! parameters; the token request never carries an `Authorization` header.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};

use printapi_core::ClientConfig;

use crate::client::Client;
use crate::errors::ApiError;
use crate::http::{HttpClientOptions, build_client};

/// Path of the token endpoint, relative to the base URI.
const TOKEN_PATH: &str = "oauth";

/// Grant type sent to the token endpoint.
const GRANT_TYPE: &str = "client_credentials";

/// Client ID and secret issued by Print API.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: String,
    secret: SecretString,
}

impl Credentials {
    /// Create credentials from a client ID and secret.
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// The client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// OAuth access token response.
#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    /// The access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    pub expires_in: Option<u64>,
}

/// Authenticate against an environment given by tag and return a client.
///
/// `environment` must be `"test"` or `"live"`; anything else fails before a
/// request is sent. The client targets the current API version.
///
/// # Errors
///
/// Returns [`ApiError::InvalidConfig`] for an unknown environment,
/// [`ApiError::Transport`] if the token endpoint is unreachable, and
/// [`ApiError::Response`] if it rejects the credentials.
pub async fn authenticate(
    client_id: &str,
    secret: &str,
    environment: &str,
) -> Result<Client, ApiError> {
    let config = ClientConfig::for_tag(environment)?;
    authenticate_with(&config, &Credentials::new(client_id, secret)).await
}

/// Authenticate using an explicit configuration.
///
/// The returned client uses `config.timeout_secs` for its requests; the
/// token exchange itself uses `config.auth_timeout_secs`.
///
/// # Errors
///
/// See [`authenticate`].
pub async fn authenticate_with(
    config: &ClientConfig,
    credentials: &Credentials,
) -> Result<Client, ApiError> {
    let base_uri = config.base_uri()?;
    let token = request_token(&base_uri, credentials, config.auth_timeout_secs).await?;

    let mut client = Client::new(base_uri, token);
    client.set_timeout(config.timeout_secs);
    Ok(client)
}

/// Exchange credentials for an access token.
///
/// # Errors
///
/// Returns an error on transport failure, a non-success status, or a
/// response without an `access_token`.
pub async fn request_token(
    base_uri: &str,
    credentials: &Credentials,
    timeout_secs: u64,
) -> Result<SecretString, ApiError> {
    let url = format!("{base_uri}{TOKEN_PATH}");
    let http = build_client(&HttpClientOptions::new(timeout_secs))?;

    debug!(url = %url, client_id = %credentials.client_id, "Requesting access token");
    let resp = http
        .post(&url)
        .form(&[
            ("grant_type", GRANT_TYPE),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.secret.expose_secret()),
        ])
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        warn!(status = status.as_u16(), "Token request rejected");
        return Err(ApiError::Response {
            status: status.as_u16(),
            body: text,
        });
    }

    let token: AccessTokenResponse = serde_json::from_str(&text)?;
    info!(
        token_type = token.token_type.as_deref().unwrap_or("Bearer"),
        expires_in = token.expires_in,
        "Access token obtained"
    );
    Ok(SecretString::from(token.access_token))
}
