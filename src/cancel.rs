//! Cooperative cancellation for in-flight calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// A cloneable handle that aborts a call's retry loop.
///
/// The client checks the token before every attempt and races it against
/// every backoff delay. A cancelled call fails with
/// [`Error::Cancelled`](crate::Error::Cancelled). An attempt already on the
/// wire is allowed to finish; cancellation takes effect at the next
/// checkpoint.
///
/// # Examples
///
/// ```no_run
/// use courtlistener::{CancellationToken, Client, RequestMetadata};
/// use http::Method;
///
/// # async fn example() -> Result<(), courtlistener::Error> {
/// let client = Client::builder().api_token("my-token").build()?;
/// let token = CancellationToken::new();
///
/// let canceller = token.clone();
/// tokio::spawn(async move {
///     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
///     canceller.cancel();
/// });
///
/// let metadata = RequestMetadata::new(Method::GET, "dockets/");
/// let result = client.request_with_cancellation(metadata, &token).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels every call observing this token or one of its clones.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel is not missed.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
