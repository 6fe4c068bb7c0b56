//! Error types for CourtListener API calls.
//!
//! Every failure a call can produce is one [`Error`] variant. The variants are
//! the taxonomy callers match on; [`Error::kind`] flattens them into the
//! payload-free [`ErrorKind`] when only the category matters.
//!
//! Errors carrying an HTTP status are produced exclusively by the request
//! orchestrator in [`Client`](crate::Client). The builder produces
//! [`Error::Configuration`].

use http::StatusCode;

use crate::rate_limit::RateLimitInfo;

/// The main error type for CourtListener API calls.
///
/// # Examples
///
/// ```no_run
/// use courtlistener::{Client, Error, Params};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().api_token("my-token").build()?;
///
/// match client.dockets().get(4214664, Params::new()).await {
///     Ok(response) => println!("Docket: {:?}", response.data),
///     Err(Error::NotFound { .. }) => eprintln!("No such docket"),
///     Err(Error::Authentication { message, .. }) => eprintln!("Auth: {}", message),
///     Err(e) if e.is_retryable() => eprintln!("Gave up after retries: {}", e),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API rejected the credentials (401) or the token lacks permission (403).
    #[error("{message}")]
    Authentication {
        /// Human readable description
        message: String,
        /// The HTTP status code (401 or 403)
        status: StatusCode,
        /// The raw response body
        body: String,
    },

    /// The requested resource does not exist (404).
    #[error("{message}")]
    NotFound {
        /// Human readable description
        message: String,
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
    },

    /// The API throttled the caller (429) and retries were exhausted.
    ///
    /// `rate_limit_info` holds whatever `Retry-After` / `X-RateLimit-*`
    /// headers the response carried.
    #[error("{message}")]
    RateLimit {
        /// Human readable description
        message: String,
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// Rate limit information parsed from headers
        rate_limit_info: Option<RateLimitInfo>,
    },

    /// The server failed (5xx) on every attempt.
    #[error("{message}")]
    Server {
        /// Human readable description
        message: String,
        /// The HTTP status code of the last attempt
        status: StatusCode,
        /// The raw response body of the last attempt
        body: String,
    },

    /// The server could not be reached on any attempt.
    ///
    /// `timed_out` distinguishes an expired request timeout from a refused
    /// or failed connection.
    #[error("{message}")]
    Connection {
        /// Human readable description, including the transport's detail
        message: String,
        /// Whether the failure was a request timeout
        timed_out: bool,
    },

    /// Any other failure: an unmapped 4xx, a non-2xx outside the known
    /// ranges, a request that could not be sent at all, or a request
    /// descriptor with an invalid header.
    #[error("{message}")]
    Api {
        /// Human readable description; includes status and body when present
        message: String,
        /// The HTTP status code, if a response was received
        status: Option<StatusCode>,
        /// The raw response body, if a response was received
        body: Option<String>,
    },

    /// The client was misconfigured. Raised while building, before any
    /// network activity.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The call was cancelled through a [`CancellationToken`](crate::CancellationToken).
    #[error("Request cancelled")]
    Cancelled,
}

/// The category of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Authentication`].
    Authentication,
    /// See [`Error::NotFound`].
    NotFound,
    /// See [`Error::RateLimit`].
    RateLimit,
    /// See [`Error::Server`].
    Server,
    /// See [`Error::Connection`].
    Connection,
    /// See [`Error::Api`].
    Api,
    /// See [`Error::Configuration`].
    Configuration,
    /// See [`Error::Cancelled`].
    Cancelled,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Server { .. } => ErrorKind::Server,
            Error::Connection { .. } => ErrorKind::Connection,
            Error::Api { .. } => ErrorKind::Api,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    ///
    /// Connection failures, 5xx responses and 429 responses are retryable.
    /// Everything else is final.
    ///
    /// # Examples
    ///
    /// ```
    /// use courtlistener::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Server {
    ///     message: "Server error occurred. Please try again later.".to_string(),
    ///     status: StatusCode::BAD_GATEWAY,
    ///     body: String::new(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::NotFound {
    ///     message: "Resource not found.".to_string(),
    ///     status: StatusCode::NOT_FOUND,
    ///     body: String::new(),
    /// };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. } | Error::Server { .. } | Error::RateLimit { .. }
        )
    }

    /// Returns the human readable message, without any prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Authentication { message, .. }
            | Error::NotFound { message, .. }
            | Error::RateLimit { message, .. }
            | Error::Server { message, .. }
            | Error::Connection { message, .. }
            | Error::Api { message, .. } => message.clone(),
            Error::Configuration(message) => message.clone(),
            Error::Cancelled => "Request cancelled".to_string(),
        }
    }

    /// Returns the HTTP status code if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Authentication { status, .. }
            | Error::NotFound { status, .. }
            | Error::RateLimit { status, .. }
            | Error::Server { status, .. } => Some(*status),
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the raw response body if a response was received.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Authentication { body, .. }
            | Error::NotFound { body, .. }
            | Error::RateLimit { body, .. }
            | Error::Server { body, .. } => Some(body),
            Error::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Returns rate limit information if available.
    ///
    /// Only [`Error::RateLimit`] carries it, and only when the response had
    /// recognised headers.
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Error::RateLimit {
                rate_limit_info, ..
            } => rate_limit_info.as_ref(),
            _ => None,
        }
    }

    /// Returns the recommended delay from rate limit information, capped
    /// by `max_wait`.
    pub fn rate_limit_delay(&self, max_wait: std::time::Duration) -> Option<std::time::Duration> {
        self.rate_limit_info()?.delay(max_wait)
    }
}

/// A specialized `Result` type for CourtListener API calls.
pub type Result<T> = std::result::Result<T, Error>;
