//! # courtlistener - An async client for the CourtListener REST API
//!
//! CourtListener publishes US court dockets, opinions, judges, oral argument
//! audio and financial disclosures. This crate wraps its v4 REST API with
//! token authentication, linear-backoff retries on transient failures, a
//! typed error taxonomy and lenient response decoding.
//!
//! ## Quick Start
//!
//! ```no_run
//! use courtlistener::{filters, Client, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), courtlistener::Error> {
//!     // Reads COURTLISTENER_API_TOKEN from the environment or a .env file
//!     let client = Client::from_env()?;
//!
//!     // Supreme Court opinions from 2023
//!     let params = filters::combine([
//!         filters::exact("scotus", "court"),
//!         filters::date_range(Some("2023-01-01"), Some("2023-12-31"), "date_filed"),
//!     ]);
//!     let opinions = client.opinions().list(params).await?;
//!     println!("{} opinions", opinions.get("count").unwrap_or(&0.into()));
//!
//!     // A single docket
//!     let docket = client.dockets().get(4214664, Params::new()).await?;
//!     println!("Case: {:?}", docket.get("case_name"));
//!     println!("Request took {:?}", docket.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **39 resource facades** - `client.dockets()`, `client.judges()`, ... generated from one table
//! - **Typed errors** - Authentication, not-found, rate limit, server and connection failures are distinct variants
//! - **Retries** - Linear backoff by default; exponential, custom or none on request
//! - **Lenient decoding** - Bodies that are not JSON come back as text instead of failing
//! - **Pagination** - Follow `next` links page by page or collect everything
//! - **Filters and validators** - Helpers for the API's Django-style query parameters
//! - **Structured logging** - Every attempt, response and retry is traced with `tracing`
//!
//! ## Error Handling
//!
//! ```no_run
//! use courtlistener::{Client, Error, Params};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().api_token("token").build()?;
//! match client.courts().get("scotus", Params::new()).await {
//!     Ok(response) => println!("Court: {:?}", response.get("full_name")),
//!     Err(Error::Authentication { message, status, .. }) => {
//!         eprintln!("{} ({})", message, status);
//!     }
//!     Err(Error::RateLimit { rate_limit_info, .. }) => {
//!         eprintln!("Throttled; retry after {:?}", rate_limit_info.and_then(|i| i.retry_after));
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Retry Strategies
//!
//! ```no_run
//! use courtlistener::{Client, RetryStrategy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), courtlistener::Error> {
//! let client = Client::builder()
//!     .api_token("token")
//!     .retry_strategy(RetryStrategy::ExponentialBackoff {
//!         initial_delay: Duration::from_millis(250),
//!         max_delay: Duration::from_secs(30),
//!         max_retries: 5,
//!         jitter: true,
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod cancel;
mod client;
pub mod config;
mod endpoint;
mod error;
pub mod filters;
pub mod metadata;
pub mod pagination;
mod params;
pub mod rate_limit;
pub mod resources;
mod response;
pub mod retry;
pub mod transport;
pub mod validators;

pub use cancel::CancellationToken;
pub use client::{Client, ClientBuilder};
pub use config::{Config, ConfigProvider, EnvProvider, StaticProvider};
pub use endpoint::Endpoint;
pub use error::{Error, ErrorKind, Result};
pub use filters::SortDirection;
pub use metadata::RequestMetadata;
pub use pagination::{Page, PageInfo, Paginator};
pub use params::Params;
pub use resources::RESOURCES;
pub use response::{Payload, Record, Response};
pub use retry::{RetryPredicate, RetryStrategy};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
