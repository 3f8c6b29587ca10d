//! HTTP client configuration.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::request::RequestBuilder;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout. Completion calls can be slow.
    pub request_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            user_agent: format!("spec-engine/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Build a configured HTTP client.
pub fn build_client(config: &HttpConfig) -> Result<Client, HttpError> {
    ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(HttpError::ClientBuild)
}

/// HTTP errors.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("server error: {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("client error: {status}: {body}")]
    ClientError { status: u16, body: String },
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Request(e)
        }
    }
}

/// Shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default config.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HTTP client with custom config.
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        let inner = build_client(&config)?;
        Ok(Self { inner })
    }

    /// POST a JSON body to `path` using the builder's base URL and headers.
    ///
    /// Non-success statuses are converted by [`HttpClient::check_response`].
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        request: &RequestBuilder,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, HttpError> {
        let url = request.url(path);
        tracing::debug!(url = %url, "Making POST request");
        let response = self
            .inner
            .post(&url)
            .headers(request.headers().clone())
            .json(body)
            .send()
            .await
            .map_err(HttpError::from)?;
        tracing::debug!(status = %response.status(), url = %url, "POST response");
        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    pub async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, HttpError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(HttpError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();

        if status.is_server_error() {
            Err(HttpError::ServerError {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(HttpError::ClientError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(config.user_agent.starts_with("spec-engine/"));
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_post_json_sends_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/responses")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::Json(json!({"model": "m"})))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let request = RequestBuilder::new()
            .base_url(format!("{}/v1", server.url()))
            .bearer_auth("sk-test")
            .json_content();
        let response = client
            .post_json(&request, "/responses", &json!({"model": "m"}))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_statuses_are_mapped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/limited")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;
        server
            .mock("POST", "/broken")
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;
        server
            .mock("POST", "/denied")
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let request = RequestBuilder::new().base_url(server.url());
        let body = json!({});

        match client.post_json(&request, "/limited", &body).await {
            Err(HttpError::RateLimited { retry_after }) => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)))
            }
            other => panic!("Expected RateLimited, got {other:?}"),
        }
        match client.post_json(&request, "/broken", &body).await {
            Err(HttpError::ServerError { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("Expected ServerError, got {other:?}"),
        }
        match client.post_json(&request, "/denied", &body).await {
            Err(err @ HttpError::ClientError { .. }) => {
                assert_eq!(err.to_string(), "client error: 401: bad key")
            }
            other => panic!("Expected ClientError, got {other:?}"),
        }
    }
}
