//! Retry strategies and predicates for transient failures.
//!
//! The strategy decides *how long* to wait and *whether attempts remain*;
//! the predicate decides *whether an error is worth another attempt*. The
//! client's default is [`RetryStrategy::Linear`] with one second of base
//! delay and three attempts, combined with [`RetryOnTransient`].

use crate::Error;
use rand::Rng;
use std::time::Duration;

/// Defines how long to wait between attempts and how many attempts to make.
///
/// `max_retries` counts *total* attempts, including the first one.
///
/// # Examples
///
/// ```
/// use courtlistener::RetryStrategy;
/// use std::time::Duration;
///
/// // Linear backoff: 1s after the first failure, 2s after the second, then give up.
/// let linear = RetryStrategy::Linear {
///     delay: Duration::from_secs(1),
///     max_retries: 3,
/// };
/// assert_eq!(linear.delay_for_attempt(1), Some(Duration::from_secs(1)));
/// assert_eq!(linear.delay_for_attempt(2), Some(Duration::from_secs(2)));
/// assert_eq!(linear.delay_for_attempt(3), None);
///
/// // Exponential backoff with jitter: up to 100ms, 200ms, 400ms...
/// let exponential = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_millis(100),
///     max_delay: Duration::from_secs(30),
///     max_retries: 5,
///     jitter: true,
/// };
/// assert_eq!(exponential.max_attempts(), Some(5));
/// ```
#[derive(Debug, Clone)]
pub enum RetryStrategy {
    /// Make a single attempt.
    None,

    /// Wait `delay * attempt` after failed attempt number `attempt`.
    Linear {
        /// The base delay, multiplied by the attempt number.
        delay: Duration,
        /// The total number of attempts.
        max_retries: usize,
    },

    /// Wait `initial_delay * 2^(attempt - 1)`, capped at `max_delay`.
    ///
    /// Optional jitter scales each delay by a random factor in `[0.5, 1.0]`.
    ExponentialBackoff {
        /// The delay after the first failed attempt.
        initial_delay: Duration,
        /// The maximum delay between attempts.
        max_delay: Duration,
        /// The total number of attempts.
        max_retries: usize,
        /// Whether to add random jitter to delays.
        jitter: bool,
    },

    /// Custom retry logic.
    ///
    /// Takes the number of the attempt that just failed (starting from 1)
    /// and returns `Some(delay)` to try again after the delay, or `None` to
    /// stop.
    Custom {
        /// Function that determines the delay after a failed attempt.
        delay_fn: fn(attempt: usize) -> Option<Duration>,
    },
}

impl Default for RetryStrategy {
    fn default() -> Self {
        RetryStrategy::Linear {
            delay: Duration::from_secs(1),
            max_retries: 3,
        }
    }
}

impl RetryStrategy {
    /// Returns the delay to wait after failed attempt `attempt`, or `None`
    /// if no attempts remain.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The number of the attempt that just failed (1-indexed)
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::Linear { delay, max_retries } => {
                if attempt >= *max_retries {
                    return None;
                }
                let factor = u32::try_from(attempt).unwrap_or(u32::MAX);
                Some(delay.saturating_mul(factor))
            }
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_retries,
                jitter,
            } => {
                if attempt >= *max_retries {
                    return None;
                }

                let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                let multiplier = 2u32.saturating_pow(exponent);
                let delay = initial_delay.saturating_mul(multiplier).min(*max_delay);

                if *jitter {
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    Some(delay.mul_f64(jitter_factor))
                } else {
                    Some(delay)
                }
            }
            RetryStrategy::Custom { delay_fn } => delay_fn(attempt),
        }
    }

    /// Returns the total number of attempts, if the strategy bounds it.
    pub fn max_attempts(&self) -> Option<usize> {
        match self {
            RetryStrategy::None => Some(1),
            RetryStrategy::Linear { max_retries, .. } => Some(*max_retries),
            RetryStrategy::ExponentialBackoff { max_retries, .. } => Some(*max_retries),
            RetryStrategy::Custom { .. } => None,
        }
    }
}

/// Decides whether a failed attempt should be retried.
///
/// # Examples
///
/// ```
/// use courtlistener::{Error, RetryPredicate};
///
/// /// Retries server errors only; 429 and connection failures surface at once.
/// struct ServerErrorsOnly;
///
/// impl RetryPredicate for ServerErrorsOnly {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         matches!(error, Error::Server { .. })
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the call should be attempted again.
    ///
    /// # Arguments
    ///
    /// * `error` - The error the attempt produced
    /// * `attempt` - The attempt number (1-indexed)
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retries connection failures, server errors and rate limiting.
///
/// Delegates to [`Error::is_retryable`]. This is the client default.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTransient;

impl RetryPredicate for RetryOnTransient {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retries only when the server could not be reached.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnConnectionError;

impl RetryPredicate for RetryOnConnectionError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Connection { .. })
    }
}

/// Never retries.
#[derive(Debug, Clone, Copy)]
pub struct NeverRetry;

impl RetryPredicate for NeverRetry {
    fn should_retry(&self, _error: &Error, _attempt: usize) -> bool {
        false
    }
}
