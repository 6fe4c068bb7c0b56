//! Client configuration and the sources it can be read from.
//!
//! A [`Config`] is assembled once by [`ClientBuilder::build`](crate::ClientBuilder::build)
//! and never changes afterwards. Values set explicitly on the builder win;
//! anything left unset is looked up in the builder's [`ConfigProvider`], and
//! whatever is still missing falls back to the defaults below.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::{Error, Result};

/// The public CourtListener REST API, version 4.
pub const DEFAULT_BASE_URL: &str = "https://www.courtlistener.com/api/rest/v4/";

/// Provider key holding the API token.
pub const API_TOKEN_KEY: &str = "COURTLISTENER_API_TOKEN";

/// Provider key holding an alternative base URL.
pub const BASE_URL_KEY: &str = "COURTLISTENER_BASE_URL";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_MAX_RETRIES: usize = 3;
pub(crate) const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// The `User-Agent` sent when none is configured.
pub fn default_user_agent() -> String {
    format!("courtlistener-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Validated, immutable client settings.
///
/// The `Debug` output shows only the first eight characters of the token.
#[derive(Clone)]
pub struct Config {
    base_url: Url,
    api_token: String,
    timeout: Duration,
    max_retries: usize,
    retry_delay: Duration,
    verify_ssl: bool,
    user_agent: String,
}

impl Config {
    /// Validates the settings and normalizes the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the token is empty, the timeout
    /// is zero, `max_retries` is zero or the base URL is not http(s).
    pub(crate) fn new(
        base_url: Url,
        api_token: String,
        timeout: Duration,
        max_retries: usize,
        retry_delay: Duration,
        verify_ssl: bool,
        user_agent: String,
    ) -> Result<Self> {
        if api_token.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "API token is required. Set {} or call ClientBuilder::api_token.",
                API_TOKEN_KEY
            )));
        }
        if timeout.is_zero() {
            return Err(Error::Configuration(
                "Timeout must be greater than 0".to_string(),
            ));
        }
        if max_retries == 0 {
            return Err(Error::Configuration(
                "Max retries must allow at least one attempt".to_string(),
            ));
        }

        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_token,
            timeout,
            max_retries,
            retry_delay,
            verify_ssl,
            user_agent,
        })
    }

    /// The base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The API token sent as `Authorization: Token {token}`.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// The per-attempt request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The total number of attempts per call.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// The linear backoff base delay.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Whether TLS certificates are verified.
    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// The `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = (self.api_token.chars().count() / 2).min(8);
        let visible: String = self.api_token.chars().take(shown).collect();
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &format_args!("{}...", visible))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("verify_ssl", &self.verify_ssl)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Parses a base URL and appends the trailing `/` relative joins need.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::Configuration(format!("Invalid base URL '{}': {}", raw, e)))?;
    normalize_base_url(url)
}

fn normalize_base_url(mut url: Url) -> Result<Url> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Configuration(format!(
            "Base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// A source of configuration values, consulted once when a client is built.
///
/// Keys are [`API_TOKEN_KEY`] and [`BASE_URL_KEY`]; unknown keys are ignored.
///
/// # Examples
///
/// ```
/// use courtlistener::{Client, StaticProvider};
///
/// let provider = StaticProvider::new([("COURTLISTENER_API_TOKEN", "abc123")]);
/// let client = Client::builder().config_provider(provider).build().unwrap();
/// assert_eq!(client.config().api_token(), "abc123");
/// ```
pub trait ConfigProvider: Send + Sync {
    /// Returns every value this provider knows about.
    fn values(&self) -> HashMap<String, String>;
}

/// Reads configuration from the process environment, optionally layered on
/// top of a `.env` file.
///
/// The `.env` file is parsed without touching the process environment, and
/// real environment variables win over file entries.
#[derive(Debug, Clone, Default)]
pub struct EnvProvider {
    dotenv_path: Option<PathBuf>,
}

impl EnvProvider {
    /// Reads the process environment only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also reads the given `.env` file. A missing file is not an error.
    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }
}

impl ConfigProvider for EnvProvider {
    fn values(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();

        if let Some(path) = &self.dotenv_path {
            match dotenvy::from_path_iter(path) {
                Ok(entries) => {
                    for entry in entries {
                        match entry {
                            Ok((key, value)) => {
                                values.insert(key, value);
                            }
                            Err(e) => {
                                tracing::warn!(path = %path.display(), error = %e, "Skipping malformed .env line");
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "No .env file loaded");
                }
            }
        }

        for key in [API_TOKEN_KEY, BASE_URL_KEY] {
            if let Ok(value) = std::env::var(key) {
                values.insert(key.to_string(), value);
            }
        }

        values
    }
}

/// A fixed set of values, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    values: HashMap<String, String>,
}

impl StaticProvider {
    /// Creates a provider returning exactly `values`.
    pub fn new<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigProvider for StaticProvider {
    fn values(&self) -> HashMap<String, String> {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with_token(token: &str) -> Result<Config> {
        Config::new(
            parse_base_url(DEFAULT_BASE_URL)?,
            token.to_string(),
            DEFAULT_TIMEOUT,
            DEFAULT_MAX_RETRIES,
            DEFAULT_RETRY_DELAY,
            true,
            default_user_agent(),
        )
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = config_with_token("   ").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains(API_TOKEN_KEY));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = config_with_token("0123456789abcdefghij").unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("01234567..."));
        assert!(!debug.contains("89abcdef"));
    }

    #[test]
    fn test_debug_masks_short_tokens() {
        let debug = format!("{:?}", config_with_token("abc123").unwrap());
        assert!(debug.contains("api_token: abc..."), "{}", debug);
        assert!(!debug.contains("abc123"));

        let debug = format!("{:?}", config_with_token("x").unwrap());
        assert!(debug.contains("api_token: ..."), "{}", debug);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("http://localhost:8080/api/rest/v4").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/rest/v4/");
        assert_eq!(url.join("dockets/").unwrap().path(), "/api/rest/v4/dockets/");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("ftp://example.com/"),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_timeout_and_attempts_rejected() {
        let base = parse_base_url(DEFAULT_BASE_URL).unwrap();
        let zero_timeout = Config::new(
            base.clone(),
            "token".into(),
            Duration::ZERO,
            3,
            DEFAULT_RETRY_DELAY,
            true,
            default_user_agent(),
        );
        assert!(matches!(zero_timeout, Err(Error::Configuration(_))));

        let zero_attempts = Config::new(
            base,
            "token".into(),
            DEFAULT_TIMEOUT,
            0,
            DEFAULT_RETRY_DELAY,
            true,
            default_user_agent(),
        );
        assert!(matches!(zero_attempts, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_env_provider_reads_dotenv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "COURTLISTENER_TEST_ONLY_KEY=from-file").unwrap();
        writeln!(file, "# comment").unwrap();

        let values = EnvProvider::new().with_dotenv(file.path()).values();
        assert_eq!(
            values.get("COURTLISTENER_TEST_ONLY_KEY").map(String::as_str),
            Some("from-file")
        );
        assert!(std::env::var("COURTLISTENER_TEST_ONLY_KEY").is_err());
    }

    #[test]
    fn test_env_provider_missing_file_is_empty() {
        let values = EnvProvider::new()
            .with_dotenv("/nonexistent/courtlistener/.env")
            .values();
        assert!(!values.contains_key("COURTLISTENER_TEST_ONLY_KEY"));
    }
}
