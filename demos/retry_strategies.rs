//! Example demonstrating retry configuration.
//!
//! This example shows how to:
//! - Tune the default linear backoff
//! - Switch to exponential backoff or disable retries
//! - Restrict retries with a predicate
//! - Honor `Retry-After` headers when rate limited
//! - Cancel a call that is waiting to retry
//!
//! Run with: `cargo run --example retry_strategies`

use courtlistener::rate_limit::RateLimitConfig;
use courtlistener::retry::RetryOnConnectionError;
use courtlistener::{CancellationToken, Client, Error, Params, RetryStrategy};
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing to see retry attempts
    tracing_subscriber::fmt()
        .with_env_filter("courtlistener=info,retry_strategies=info")
        .init();

    println!("=== Linear Backoff (default) ===");
    println!("Delays: 500ms, 1000ms, 1500ms, 2000ms");
    let linear = Client::builder()
        .max_retries(5)
        .retry_delay(Duration::from_millis(500))
        .config_provider(courtlistener::EnvProvider::new())
        .build()?;
    let start = Instant::now();
    match linear.courts().get("scotus", Params::new()).await {
        Ok(response) => println!("Fetched after {} attempt(s)", response.attempts),
        Err(e) => println!("Failed: {}", e),
    }
    println!("Total time: {:?}", start.elapsed());
    println!();

    println!("=== Exponential Backoff Strategy ===");
    let exponential = Client::builder()
        .config_provider(courtlistener::EnvProvider::new())
        .retry_strategy(RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            max_retries: 4,
            jitter: true,
        })
        .build()?;
    match exponential.judges().list(Params::new()).await {
        Ok(response) => println!("Status {} in {:?}", response.status, response.latency),
        Err(e) => println!("Failed: {}", e),
    }
    println!();

    println!("=== No Retries ===");
    let once = Client::builder()
        .config_provider(courtlistener::EnvProvider::new())
        .retry_strategy(RetryStrategy::None)
        .build()?;
    match once.get("nonexistent/", Params::new()).await {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Failed immediately: {}", e),
    }
    println!();

    println!("=== Connection Errors Only ===");
    let picky = Client::builder()
        .config_provider(courtlistener::EnvProvider::new())
        .retry_predicate(Box::new(RetryOnConnectionError))
        .build()?;
    match picky.search().list(Params::from([("q", "qualified immunity")])).await {
        Ok(response) => println!("Search answered in {:?}", response.latency),
        Err(e) => println!("Failed without retrying server errors: {}", e),
    }
    println!();

    println!("=== Honoring Rate Limit Headers ===");
    let polite = Client::builder()
        .config_provider(courtlistener::EnvProvider::new())
        .rate_limit_config(RateLimitConfig::honor_headers(Duration::from_secs(30)))
        .build()?;
    match polite.opinions().recent(5, Params::new()).await {
        Ok(response) => println!("Recent opinions fetched: {:?}", response.results().map(Vec::len)),
        Err(Error::RateLimit { rate_limit_info, .. }) => {
            println!("Still throttled: {:?}", rate_limit_info)
        }
        Err(e) => println!("Failed: {}", e),
    }
    println!();

    println!("=== Cancellation ===");
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });
    let metadata = courtlistener::RequestMetadata::new(http::Method::GET, "dockets/");
    match linear.request_with_cancellation(metadata, &token).await {
        Ok(response) => println!("Finished before cancellation: {}", response.status),
        Err(Error::Cancelled) => println!("Cancelled"),
        Err(e) => println!("Failed: {}", e),
    }

    Ok(())
}
