//! Rate limit header parsing.
//!
//! Every 429 response has its rate limit headers parsed into a
//! [`RateLimitInfo`] attached to [`Error::RateLimit`](crate::Error::RateLimit).
//! Whether the retry loop *waits* on those headers is governed by
//! [`RateLimitConfig`], which is off by default so the linear retry policy
//! applies to 429 responses like any other transient failure.

use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Rate limit data parsed from response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// When the rate limit window resets (`X-RateLimit-Reset` or `RateLimit-Reset`).
    pub reset_at: Option<SystemTime>,

    /// How long the server asked the client to wait (`Retry-After`).
    pub retry_after: Option<Duration>,

    /// Requests remaining in the current window (`X-RateLimit-Remaining`).
    pub remaining: Option<u64>,
}

impl RateLimitInfo {
    /// Parses rate limit headers, returning `None` when none are present.
    ///
    /// `Retry-After` may be delay-seconds or an HTTP date; reset headers are
    /// Unix timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use courtlistener::rate_limit::RateLimitInfo;
    /// use http::HeaderMap;
    /// use std::time::Duration;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("retry-after", "60".parse().unwrap());
    ///
    /// let info = RateLimitInfo::from_headers(&headers).unwrap();
    /// assert_eq!(info.retry_after, Some(Duration::from_secs(60)));
    ///
    /// assert!(RateLimitInfo::from_headers(&HeaderMap::new()).is_none());
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let info = Self {
            reset_at: parse_reset(headers),
            retry_after: parse_retry_after(headers),
            remaining: header_str(headers, "x-ratelimit-remaining").and_then(|v| v.parse().ok()),
        };

        if info.reset_at.is_none() && info.retry_after.is_none() && info.remaining.is_none() {
            None
        } else {
            Some(info)
        }
    }

    /// Returns how long to wait before the next attempt, capped at `max_wait`.
    ///
    /// Prefers `retry_after`; falls back to the time remaining until
    /// `reset_at`. Returns `None` when neither yields a wait.
    pub fn delay(&self, max_wait: Duration) -> Option<Duration> {
        if let Some(retry_after) = self.retry_after {
            return Some(retry_after.min(max_wait));
        }

        let until_reset = self.reset_at?.duration_since(SystemTime::now()).ok()?;
        Some(until_reset.min(max_wait))
    }
}

/// Controls whether 429 responses wait on their rate limit headers.
///
/// # Examples
///
/// ```
/// use courtlistener::rate_limit::RateLimitConfig;
/// use std::time::Duration;
///
/// let config = RateLimitConfig::honor_headers(Duration::from_secs(120));
/// assert!(config.enabled);
/// assert!(!RateLimitConfig::default().enabled);
/// ```
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// When `true`, a 429 with usable headers waits the advertised time
    /// instead of the retry strategy's delay.
    pub enabled: bool,

    /// Upper bound on a header-derived wait.
    pub max_wait: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl RateLimitConfig {
    /// Waits on `Retry-After` / reset headers, never longer than `max_wait`.
    pub fn honor_headers(max_wait: Duration) -> Self {
        Self {
            enabled: true,
            max_wait,
        }
    }

    /// Ignores rate limit headers when scheduling retries.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_wait: Duration::from_secs(300),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = header_str(headers, "retry-after")?.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date = httpdate::parse_http_date(value).ok()?;
    Some(date.duration_since(SystemTime::now()).unwrap_or(Duration::ZERO))
}

fn parse_reset(headers: &HeaderMap) -> Option<SystemTime> {
    ["x-ratelimit-reset", "ratelimit-reset"]
        .iter()
        .find_map(|name| header_str(headers, name)?.trim().parse::<u64>().ok())
        .map(|timestamp| UNIX_EPOCH + Duration::from_secs(timestamp))
}
