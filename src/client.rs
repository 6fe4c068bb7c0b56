//! The CourtListener client and its request orchestrator.
//!
//! [`Client::request`] is the one place where a call is retried, where HTTP
//! status codes become [`Error`] variants and where bodies are decoded.
//! Everything above it (verbs, resource facades, filter sugar, pagination)
//! only builds a [`RequestMetadata`] and hands it over.

use crate::{
    cancel::CancellationToken,
    config::{
        default_user_agent, parse_base_url, Config, ConfigProvider, EnvProvider, API_TOKEN_KEY,
        BASE_URL_KEY, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY,
        DEFAULT_TIMEOUT,
    },
    endpoint::Endpoint,
    metadata::RequestMetadata,
    pagination::Paginator,
    rate_limit::{RateLimitConfig, RateLimitInfo},
    retry::{RetryOnTransient, RetryPredicate, RetryStrategy},
    transport::{HttpTransport, RawResponse, Transport, TransportError},
    Error, Params, Payload, Response, Result,
};
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// An async client for the CourtListener REST API.
///
/// Cloning is cheap and clones share the connection pool. Each call runs
/// its own retry loop; calls never share state.
///
/// # Examples
///
/// ```no_run
/// use courtlistener::{Client, Params};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), courtlistener::Error> {
/// let client = Client::builder()
///     .api_token("your-api-token")
///     .build()?;
///
/// // Resource facades
/// let dockets = client.dockets().by_court("scotus", Params::new()).await?;
/// println!("{} dockets", dockets.get("count").unwrap_or(&json!(0)));
///
/// // Raw verbs
/// let court = client.get("courts/scotus/", Params::new()).await?;
/// println!("{:?}", court.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    config: Config,
    retry_strategy: RetryStrategy,
    retry_predicate: Box<dyn RetryPredicate>,
    rate_limit_config: RateLimitConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("retry_strategy", &self.inner.retry_strategy)
            .field("rate_limit_config", &self.inner.rate_limit_config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Builds a client from `COURTLISTENER_*` environment variables and a
    /// `.env` file in the working directory, if present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no API token is found.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::new()
            .config_provider(EnvProvider::new().with_dotenv(".env"))
            .build()
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Performs one logical call: attempts, retries and error mapping.
    ///
    /// Returns the decoded body on any 2xx status. Connection failures, 5xx
    /// and 429 responses are retried according to the retry strategy; when
    /// attempts run out the last failure is returned as-is.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use courtlistener::{Client, RequestMetadata};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), courtlistener::Error> {
    /// let client = Client::builder().api_token("my-token").build()?;
    ///
    /// let metadata = RequestMetadata::new(Method::GET, "search/")
    ///     .with_query_param("q", "first amendment")
    ///     .with_query_param("type", "o");
    ///
    /// let response = client.request(metadata).await?;
    /// println!("Took {} attempt(s)", response.attempts);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request(&self, metadata: RequestMetadata) -> Result<Response<Payload>> {
        self.run(metadata, None).await
    }

    /// Like [`request`](Self::request), but stops early once `token` is
    /// cancelled, failing with [`Error::Cancelled`].
    pub async fn request_with_cancellation(
        &self,
        metadata: RequestMetadata,
        token: &CancellationToken,
    ) -> Result<Response<Payload>> {
        self.run(metadata, Some(token)).await
    }

    async fn run(
        &self,
        metadata: RequestMetadata,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response<Payload>> {
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                tracing::info!(attempt = attempt, path = %metadata.path, "Request cancelled");
                return Err(Error::Cancelled);
            }

            attempt += 1;

            tracing::debug!(
                method = %metadata.method,
                path = %metadata.path,
                attempt = attempt,
                "Executing HTTP request"
            );

            let result = match self.inner.transport.execute(&metadata).await {
                Ok(raw) => self.handle_response(raw, start_time.elapsed(), attempt),
                Err(e) => Err(transport_failure(e)),
            };

            let error = match result {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                method = %metadata.method,
                path = %metadata.path,
                "Request failed"
            );

            if !self.inner.retry_predicate.should_retry(&error, attempt) {
                return Err(error);
            }

            let Some(delay) = self.retry_delay(&error, attempt) else {
                return Err(error);
            };

            tracing::warn!(
                delay_ms = delay.as_millis(),
                attempt = attempt,
                "Retrying request after delay"
            );

            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = token.cancelled() => {
                            tracing::info!(attempt = attempt, path = %metadata.path, "Request cancelled during backoff");
                            return Err(Error::Cancelled);
                        }
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }
    }

    /// The wait before the next attempt, or `None` when attempts are used up.
    fn retry_delay(&self, error: &Error, attempt: usize) -> Option<Duration> {
        let strategy_delay = self.inner.retry_strategy.delay_for_attempt(attempt)?;

        let rate_limit = &self.inner.rate_limit_config;
        if rate_limit.enabled {
            if let Some(delay) = error.rate_limit_delay(rate_limit.max_wait) {
                tracing::info!(
                    rate_limit_delay_ms = delay.as_millis(),
                    attempt = attempt,
                    max_wait_secs = rate_limit.max_wait.as_secs(),
                    "Rate limited - waiting before retry"
                );
                return Some(delay);
            }
        }

        Some(strategy_delay)
    }

    fn handle_response(
        &self,
        raw: RawResponse,
        latency: Duration,
        attempts: usize,
    ) -> Result<Response<Payload>> {
        let RawResponse {
            status,
            headers,
            body,
        } = raw;

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = attempts,
            "Received HTTP response"
        );

        if status.is_success() {
            let payload = Payload::decode(&body);
            if !payload.is_json() && !body.is_empty() {
                tracing::debug!(status = status.as_u16(), "Response body is not JSON; returning raw text");
            }
            return Ok(Response::new(payload, body, status, headers, latency, attempts));
        }

        if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            tracing::error!(status = status.as_u16(), response = %body, "Client error (4xx)");
        } else if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), response = %body, "Server error (5xx)");
        }

        Err(classify_status(status, &headers, body))
    }

    /// GET `path` with query parameters.
    pub async fn get(&self, path: impl Into<String>, params: Params) -> Result<Response<Payload>> {
        self.request(RequestMetadata::new(Method::GET, path).with_query(params))
            .await
    }

    /// POST `body` as JSON to `path`.
    pub async fn post(&self, path: impl Into<String>, body: Value) -> Result<Response<Payload>> {
        self.request(RequestMetadata::new(Method::POST, path).with_body(body))
            .await
    }

    /// PUT `body` as JSON to `path`.
    pub async fn put(&self, path: impl Into<String>, body: Value) -> Result<Response<Payload>> {
        self.request(RequestMetadata::new(Method::PUT, path).with_body(body))
            .await
    }

    /// PATCH `path` with `body` as JSON.
    pub async fn patch(&self, path: impl Into<String>, body: Value) -> Result<Response<Payload>> {
        self.request(RequestMetadata::new(Method::PATCH, path).with_body(body))
            .await
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: impl Into<String>) -> Result<Response<Payload>> {
        self.request(RequestMetadata::new(Method::DELETE, path))
            .await
    }

    /// Checks that the API is reachable and accepts the token by listing courts.
    pub async fn test_connection(&self) -> Result<()> {
        self.get("courts/", Params::new()).await?;
        tracing::info!(base_url = %self.inner.config.base_url(), "Connection test succeeded");
        Ok(())
    }

    /// Walks every page of the list at `path`, following `next` links.
    pub fn paginate(&self, path: impl Into<String>, params: Params) -> Paginator<'_> {
        Paginator::new(self, path, params)
    }

    /// A facade for an arbitrary path segment, such as `"dockets/"`.
    ///
    /// The typed accessors (`client.dockets()`, `client.opinions()`, ...)
    /// cover every known resource; this is the escape hatch.
    pub fn endpoint(&self, segment: &'static str) -> Endpoint<'_> {
        Endpoint::new(self, segment)
    }
}

/// Maps a non-2xx status to its error. This is the only place response
/// errors are constructed.
fn classify_status(status: StatusCode, headers: &HeaderMap, body: String) -> Error {
    let code = status.as_u16();
    match code {
        401 => Error::Authentication {
            message: "Authentication failed. Please check your API token.".to_string(),
            status,
            body,
        },
        403 => Error::Authentication {
            message: "Access forbidden. Please check your API token permissions.".to_string(),
            status,
            body,
        },
        404 => Error::NotFound {
            message: "Resource not found.".to_string(),
            status,
            body,
        },
        429 => Error::RateLimit {
            message: "Rate limit exceeded. Please try again later.".to_string(),
            status,
            body,
            rate_limit_info: RateLimitInfo::from_headers(headers),
        },
        500..=599 => Error::Server {
            message: "Server error occurred. Please try again later.".to_string(),
            status,
            body,
        },
        400..=499 => Error::Api {
            message: format!("Client error {}: {}", code, body),
            status: Some(status),
            body: Some(body),
        },
        _ => Error::Api {
            message: format!("HTTP error {}: {}", code, body),
            status: Some(status),
            body: Some(body),
        },
    }
}

fn transport_failure(error: TransportError) -> Error {
    match error {
        TransportError::Connect(detail) => Error::Connection {
            message: format!("Connection error: {}", detail),
            timed_out: false,
        },
        TransportError::Timeout(detail) => Error::Connection {
            message: format!("Connection error: {}", detail),
            timed_out: true,
        },
        TransportError::Request(detail) => Error::Api {
            message: format!("Request failed: {}", detail),
            status: None,
            body: None,
        },
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Only the API token is required. Values set here take precedence over the
/// [`ConfigProvider`], which takes precedence over the defaults.
///
/// # Examples
///
/// ```no_run
/// use courtlistener::{ClientBuilder, RetryStrategy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), courtlistener::Error> {
/// let client = ClientBuilder::new()
///     .api_token("your-api-token")
///     .timeout(Duration::from_secs(60))
///     .max_retries(5)
///     .retry_delay(Duration::from_millis(500))
///     .build()?;
///
/// let aggressive = ClientBuilder::new()
///     .base_url("https://www.courtlistener.com/api/rest/v4/")?
///     .api_token("your-api-token")
///     .retry_strategy(RetryStrategy::ExponentialBackoff {
///         initial_delay: Duration::from_millis(100),
///         max_delay: Duration::from_secs(10),
///         max_retries: 6,
///         jitter: true,
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    retry_delay: Option<Duration>,
    verify_ssl: bool,
    user_agent: Option<String>,
    retry_strategy: Option<RetryStrategy>,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    rate_limit_config: RateLimitConfig,
    transport: Option<Arc<dyn Transport>>,
    config_provider: Option<Box<dyn ConfigProvider>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            timeout: None,
            max_retries: None,
            retry_delay: None,
            verify_ssl: true,
            user_agent: None,
            retry_strategy: None,
            retry_predicate: None,
            rate_limit_config: RateLimitConfig::default(),
            transport: None,
            config_provider: None,
        }
    }

    /// Sets the API base URL. Defaults to the public v4 API.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or not http(s).
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(parse_base_url(url.as_ref())?);
        Ok(self)
    }

    /// Sets the API token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the per-attempt request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the total number of attempts per call. Defaults to 3.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the linear backoff base delay. Defaults to 1 second.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Enables or disables TLS certificate verification. Defaults to `true`.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replaces the default linear backoff.
    ///
    /// When set, `max_retries` and `retry_delay` no longer shape the retry
    /// schedule; the strategy's own limits apply.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = Some(strategy);
        self
    }

    /// Sets a custom retry predicate.
    ///
    /// By default, requests are retried based on `Error::is_retryable()`.
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets how 429 responses use their rate limit headers.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use courtlistener::{Client, rate_limit::RateLimitConfig};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), courtlistener::Error> {
    /// let client = Client::builder()
    ///     .api_token("my-token")
    ///     .rate_limit_config(RateLimitConfig::honor_headers(Duration::from_secs(60)))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = config;
        self
    }

    /// Replaces the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Supplies values for anything not set explicitly.
    pub fn config_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.config_provider = Some(Box::new(provider));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no API token was provided, a
    /// setting is out of range or the HTTP client cannot be created. No
    /// request is made.
    pub fn build(self) -> Result<Client> {
        let provided = self
            .config_provider
            .map(|provider| provider.values())
            .unwrap_or_default();

        let api_token = self
            .api_token
            .or_else(|| provided.get(API_TOKEN_KEY).cloned())
            .unwrap_or_default();

        let base_url = match self.base_url {
            Some(url) => url,
            None => match provided.get(BASE_URL_KEY).filter(|v| !v.trim().is_empty()) {
                Some(raw) => parse_base_url(raw)?,
                None => parse_base_url(DEFAULT_BASE_URL)?,
            },
        };

        let config = Config::new(
            base_url,
            api_token,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
            self.verify_ssl,
            self.user_agent.unwrap_or_else(default_user_agent),
        )?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&config)?),
        };

        let shadowed = self.max_retries.is_some() || self.retry_delay.is_some();
        if self.retry_strategy.is_some() && shadowed {
            tracing::warn!(
                max_retries = ?self.max_retries,
                retry_delay = ?self.retry_delay,
                "max_retries and retry_delay are ignored because a retry strategy was set"
            );
        }

        let retry_strategy = self.retry_strategy.unwrap_or(RetryStrategy::Linear {
            delay: config.retry_delay(),
            max_retries: config.max_retries(),
        });

        let retry_predicate = self
            .retry_predicate
            .unwrap_or_else(|| Box::new(RetryOnTransient));

        tracing::debug!(config = ?config, "Built CourtListener client");

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                config,
                retry_strategy,
                retry_predicate,
                rate_limit_config: self.rate_limit_config,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
