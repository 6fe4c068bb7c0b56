//! The single-attempt HTTP layer underneath the retry loop.
//!
//! A [`Transport`] sends one request and hands back whatever came over the
//! wire. It never retries and never interprets status codes; both belong to
//! the orchestrator in [`Client`](crate::Client). Swapping the transport is
//! how tests script responses without a server.

use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, StatusCode};
use url::Url;

use crate::config::Config;
use crate::metadata::RequestMetadata;
use crate::{Error, Result};

/// The unprocessed outcome of one attempt that reached the server.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// An attempt that produced no HTTP response.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server could not be reached, or the connection broke mid-exchange.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not be built or sent. Retrying will not help.
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// The underlying failure description, without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            TransportError::Connect(detail)
            | TransportError::Timeout(detail)
            | TransportError::Request(detail) => detail,
        }
    }
}

/// Executes a single HTTP request.
///
/// # Examples
///
/// A transport that always answers with the same JSON:
///
/// ```
/// use async_trait::async_trait;
/// use courtlistener::{RawResponse, RequestMetadata, Transport, TransportError};
/// use http::StatusCode;
///
/// struct Canned;
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn execute(&self, _request: &RequestMetadata) -> Result<RawResponse, TransportError> {
///         Ok(RawResponse::new(StatusCode::OK, r#"{"results": []}"#))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` once.
    async fn execute(&self, request: &RequestMetadata) -> std::result::Result<RawResponse, TransportError>;
}

/// The default [`Transport`], backed by a pooled `reqwest::Client`.
///
/// Every request carries `Authorization: Token {token}`, JSON content
/// negotiation headers and the configured `User-Agent`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds the underlying HTTP client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the token or user agent are not
    /// valid header values, or if the TLS backend fails to initialize.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Token {}", config.api_token()))
            .map_err(|e| Error::Configuration(format!("Invalid API token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(config.user_agent())
                .map_err(|e| Error::Configuration(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_ssl())
            .build()
            .map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestMetadata) -> std::result::Result<RawResponse, TransportError> {
        let mut url = resolve_url(&self.base_url, &request.path)?;
        let pairs = request.query.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let mut builder = self.client.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(classify)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Resolves a request path against the base URL.
///
/// Absolute URLs (pagination links) pass through, a leading `/` is appended
/// to the base with its trailing slash trimmed, and anything else is joined
/// beneath the base.
pub(crate) fn resolve_url(base: &Url, path: &str) -> std::result::Result<Url, TransportError> {
    let resolved = if path.starts_with("http://") || path.starts_with("https://") {
        Url::parse(path)
    } else if path.starts_with('/') {
        Url::parse(&format!("{}{}", base.as_str().trim_end_matches('/'), path))
    } else {
        base.join(path)
    };
    resolved.map_err(|e| TransportError::Request(format!("invalid URL for path '{}': {}", path, e)))
}

fn classify(error: reqwest::Error) -> TransportError {
    let detail = error.to_string();
    if error.is_timeout() {
        TransportError::Timeout(detail)
    } else if error.is_builder() || error.is_redirect() {
        TransportError::Request(detail)
    } else {
        TransportError::Connect(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.courtlistener.com/api/rest/v4/").unwrap()
    }

    #[test]
    fn test_relative_path_joins_beneath_base() {
        let url = resolve_url(&base(), "dockets/123/").unwrap();
        assert_eq!(url.as_str(), "https://www.courtlistener.com/api/rest/v4/dockets/123/");
    }

    #[test]
    fn test_leading_slash_appends_to_base() {
        let url = resolve_url(&base(), "/courts/").unwrap();
        assert_eq!(url.as_str(), "https://www.courtlistener.com/api/rest/v4/courts/");
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let next = "https://www.courtlistener.com/api/rest/v4/opinions/?cursor=abc";
        assert_eq!(resolve_url(&base(), next).unwrap().as_str(), next);
    }

    #[test]
    fn test_transport_error_detail() {
        let err = TransportError::Timeout("operation timed out".into());
        assert_eq!(err.detail(), "operation timed out");
        assert_eq!(err.to_string(), "request timed out: operation timed out");
    }
}
