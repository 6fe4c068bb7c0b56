//! Example demonstrating error handling.
//!
//! This example shows how to:
//! - Match on the error variants
//! - Access the status and raw body of a failed call
//! - Check if errors are retryable
//! - Recognise configuration and connection failures
//!
//! Run with: `cargo run --example error_handling`

use courtlistener::{Client, Error, ErrorKind, Params};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("courtlistener=info")
        .init();

    println!("=== Example 1: Missing Token ===");
    match Client::builder().api_token("").build() {
        Ok(_) => println!("Unexpected success"),
        Err(Error::Configuration(message)) => println!("Configuration error: {}", message),
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    let client = Client::from_env()?;

    println!("=== Example 2: Not Found ===");
    match client.dockets().get(999_999_999_999u64, Params::new()).await {
        Ok(response) => println!("Success: {:?}", response.data),
        Err(Error::NotFound { message, status, body }) => {
            println!("{}", message);
            println!("  Status: {}", status);
            println!("  Raw response: {}", body);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Bad Credentials ===");
    let bad_client = Client::builder()
        .api_token("0000000000000000000000000000000000000000")
        .build()?;
    match bad_client.alerts().list(Params::new()).await {
        Ok(_) => println!("Unexpected success"),
        Err(e) if e.kind() == ErrorKind::Authentication => {
            println!("{}", e.message());
            println!("  Status: {:?}", e.status());
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 4: Unreachable Host ===");
    let offline = Client::builder()
        .base_url("https://this-domain-does-not-exist-12345.com/api/rest/v4/")?
        .api_token("placeholder-token")
        .retry_delay(Duration::from_millis(100))
        .build()?;
    match offline.courts().list(Params::new()).await {
        Ok(_) => println!("Unexpected success"),
        Err(Error::Connection { message, timed_out }) => {
            println!("{}", message);
            println!("  Timed out: {}", timed_out);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 5: Using Error Methods ===");
    if let Err(e) = client.get("no-such-resource/", Params::new()).await {
        println!("Error occurred: {}", e);
        println!("  Kind: {:?}", e.kind());

        if e.is_retryable() {
            println!("  This error is retryable (5xx, 429 or connection failure)");
        } else {
            println!("  This error is NOT retryable");
        }

        if let Some(raw) = e.raw_response() {
            println!("  Raw response available: {} bytes", raw.len());
        }
        if let Some(info) = e.rate_limit_info() {
            println!("  Retry after: {:?}", info.retry_after);
        }
    }

    Ok(())
}
