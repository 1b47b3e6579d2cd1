//! Authenticated Print API client.
//!
//! A [`Client`] is obtained from [`authenticate`](crate::auth::authenticate)
//! and issues one HTTP exchange per call. Failures are never retried.

use std::path::Path;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use printapi_core::config::DEFAULT_TIMEOUT_SECS;

use crate::errors::ApiError;
use crate::http::{HttpClientOptions, JSON_MEDIA_TYPE, bearer_header_value, build_client};

/// Print API client bound to a base URI and bearer token.
///
/// The token is stored as a [`SecretString`] and never shows up in `Debug`
/// output or logs.
#[derive(Clone)]
pub struct Client {
    base_uri: String,
    token: SecretString,
    timeout_secs: u64,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_uri", &self.base_uri)
            .field("token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Client {
    /// `base_uri` must end with `/`.
    pub(crate) fn new(base_uri: String, token: SecretString) -> Self {
        Self {
            base_uri,
            token,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Base URI that relative request paths are joined onto.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get the bearer token this client is configured with.
    ///
    /// Callers must be careful not to log or display the returned value.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Request timeout in seconds; 0 means no timeout.
    pub fn timeout(&self) -> u64 {
        self.timeout_secs
    }

    /// Set the request timeout in seconds; 0 disables it.
    pub fn set_timeout(&mut self, secs: u64) {
        self.timeout_secs = secs;
    }

    /// Issue a GET request and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the request cannot complete,
    /// [`ApiError::Response`] on a non-success status, and
    /// [`ApiError::JsonParse`] if the body is not JSON.
    pub async fn get(&self, uri: &str, parameters: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = self.build_uri(uri, parameters);
        self.execute(Method::GET, &url, None, None).await
    }

    /// Issue a POST request with an optional JSON body.
    ///
    /// With `None` the request has no body and no `Content-Type` header.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn post(
        &self,
        uri: &str,
        content: Option<&Value>,
        parameters: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        let url = self.build_uri(uri, parameters);
        match content {
            Some(content) => {
                let body = serde_json::to_vec(content)?;
                self.execute(Method::POST, &url, Some(body), Some(JSON_MEDIA_TYPE))
                    .await
            }
            None => self.execute(Method::POST, &url, None, None).await,
        }
    }

    /// Upload a local file as the raw request body.
    ///
    /// `media_type` is sent verbatim as `Content-Type`, typically
    /// `application/pdf`, `image/jpeg` or `image/png`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ReadFile`] if the file cannot be read; otherwise
    /// see [`get`](Self::get).
    pub async fn upload(
        &self,
        uri: &str,
        file_name: impl AsRef<Path>,
        media_type: &str,
    ) -> Result<Value, ApiError> {
        let path = file_name.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::ReadFile {
                path: path.display().to_string(),
                source: e,
            })?;
        self.upload_bytes(uri, data, media_type).await
    }

    /// Upload an in-memory payload as the raw request body.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn upload_bytes(
        &self,
        uri: &str,
        data: Vec<u8>,
        media_type: &str,
    ) -> Result<Value, ApiError> {
        let url = self.build_uri(uri, &[]);
        self.execute(Method::POST, &url, Some(data), Some(media_type))
            .await
    }

    /// Build the fully-qualified request URI.
    ///
    /// Leading and trailing slashes are trimmed; the base URI is prepended
    /// unless `uri` already contains it. Parameters become a query string in
    /// the order given.
    pub fn build_uri(&self, uri: &str, parameters: &[(&str, &str)]) -> String {
        let trimmed = uri.trim_matches('/');
        let mut url = if trimmed.contains(self.base_uri.as_str()) {
            trimmed.to_string()
        } else {
            format!("{}{trimmed}", self.base_uri)
        };

        if !parameters.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(parameters)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<Value, ApiError> {
        let content_type = content_type
            .map(|ct| {
                HeaderValue::from_str(ct)
                    .map_err(|_| ApiError::InvalidConfig(format!("invalid media type {ct:?}")))
            })
            .transpose()?;

        let http = build_client(&HttpClientOptions::new(self.timeout_secs))?;

        let mut req = http
            .request(method.clone(), url)
            .header(AUTHORIZATION, bearer_header_value(self.token.expose_secret()));
        if let Some(content_type) = content_type {
            req = req.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        debug!(%method, url, "Sending request");
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!(%method, url, status = status.as_u16(), "Received response");

        if !status.is_success() {
            warn!(%method, url, status = status.as_u16(), "Request failed");
            return Err(ApiError::Response {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_body(&text)
    }
}

/// Decode a success body; an empty body yields `Value::Null`.
fn decode_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}


#[cfg(test)]
mod wiremock_tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn setup_client(server: &MockServer) -> Client {
        Client::new(format!("{}/v2/", server.uri()), "test-token".into())
    }

    #[tokio::test]
    async fn test_should_make_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/products"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .and(header("Accept", "application/json"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": "poster_a3"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let result = client
            .get("products", &[("page", "2"), ("limit", "10")])
            .await
            .unwrap();

        assert_eq!(result["results"][0]["id"], "poster_a3");
    }

    #[tokio::test]
    async fn test_should_accept_absolute_uri() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/orders/ABC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ABC"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let url = format!("{}/v2/orders/ABC", server.uri());
        let result = client.get(&url, &[]).await.unwrap();

        assert_eq!(result["id"], "ABC");
    }

    #[tokio::test]
    async fn test_should_post_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/orders"))
            .and(header("Content-Type", "application/json"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(json!({"x": 1})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "NEW"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let result = client
            .post("orders", Some(&json!({"x": 1})), &[])
            .await
            .unwrap();

        assert_eq!(result["id"], "NEW");
    }

    #[tokio::test]
    async fn test_should_post_without_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/orders/ABC/cancel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Cancelled"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let result = client.post("orders/ABC/cancel", None, &[]).await.unwrap();
        assert_eq!(result["status"], "Cancelled");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.is_empty());
        assert!(requests[0].headers.get("content-type").is_none());
        assert_eq!(
            requests[0].headers.get("authorization").unwrap(),
            "Bearer test-token"
        );
    }

    #[tokio::test]
    async fn test_should_upload_bytes_with_media_type() {
        let server = MockServer::start().await;
        let payload = b"%PDF-1.4 fake".to_vec();

        Mock::given(method("POST"))
            .and(path("/v2/files/content/ABC-1"))
            .and(header("Content-Type", "application/pdf"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_string("%PDF-1.4 fake"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uploaded": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let result = client
            .upload_bytes("/files/content/ABC-1/", payload, "application/pdf")
            .await
            .unwrap();

        assert_eq!(result["uploaded"], true);
    }

    #[tokio::test]
    async fn test_should_upload_file() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cover.png");
        std::fs::write(&file, [0x89, b'P', b'N', b'G']).unwrap();

        Mock::given(method("POST"))
            .and(path("/v2/files/content/ABC-1"))
            .and(header("Content-Type", "image/png"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        client
            .upload("files/content/ABC-1", &file, "image/png")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].body, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_should_report_unreadable_upload_file() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let client = setup_client(&server);
        let err = client
            .upload("files/content/X", dir.path().join("missing.pdf"), "application/pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::ReadFile { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_return_null_for_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/orders/ABC/confirm"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let result = client.post("orders/ABC/confirm", None, &[]).await.unwrap();
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_should_return_response_error_for_non_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/orders/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"message":"Order not found"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client.get("orders/missing", &[]).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.body(), Some(r#"{"message":"Order not found"}"#));
    }

    #[tokio::test]
    async fn test_should_not_retry_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/products"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client.get("products", &[]).await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.body(), Some("maintenance"));
    }

    #[tokio::test]
    async fn test_should_fail_on_invalid_json_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client.get("products", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::JsonParse(_)));
    }

    #[tokio::test]
    async fn test_should_time_out_slow_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut client = setup_client(&server);
        client.set_timeout(1);
        let err = client.get("slow", &[]).await.unwrap_err();

        assert!(err.is_timeout(), "unexpected error: {err}");
        assert!(!err.is_response_error());
    }

    #[tokio::test]
    async fn test_should_wait_without_timeout_when_disabled() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"done": true}))
                    .set_delay(Duration::from_millis(1500)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut client = setup_client(&server);
        client.set_timeout(0);
        let result = client.get("slow", &[]).await.unwrap();

        assert_eq!(result["done"], true);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_media_type_before_sending() {
        let server = MockServer::start().await;

        let client = setup_client(&server);
        let err = client
            .upload_bytes("files/content/X", vec![1], "image/png\r\n")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidConfig(ref m) if m.contains("media type")));
        assert!(!err.is_response_error());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_report_connection_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = Client::new(format!("http://127.0.0.1:{port}/v2/"), "T".into());
        let err = client.get("products", &[]).await.unwrap_err();

        match err {
            ApiError::Transport { code, message } => {
                assert_eq!(code, "connect");
                assert!(!message.is_empty());
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
