//! Basic example: list, fetch and page through CourtListener records.
//!
//! This example shows how to:
//! - Create a client from `COURTLISTENER_API_TOKEN` (environment or `.env`)
//! - List records with filter helpers
//! - Fetch a single record and read response metadata
//! - Follow pagination across several pages
//!
//! Run with: `cargo run --example basic_usage`

use courtlistener::{filters, Client, Error, Page, Params, SortDirection};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("courtlistener=debug,basic_usage=info")
        .init();

    let client = Client::from_env()?;
    client.test_connection().await?;
    println!("Connected to {}", client.config().base_url());
    println!();

    println!("=== Listing Opinions ===");
    let params = filters::combine([
        filters::exact("scotus", "court"),
        filters::date_range(Some("2023-01-01"), Some("2023-12-31"), "date_filed"),
        filters::order_by("date_filed", SortDirection::Desc),
    ]);
    let response = client.opinions().list(params).await?;
    if let Some(page) = Page::from_payload(&response.data) {
        println!("Count: {:?}", page.count);
        for opinion in page.records().take(5) {
            println!("  {:?} {:?}", opinion.get("id"), opinion.get("absolute_url"));
        }
    }
    println!("Status: {}, latency: {:?}", response.status, response.latency);
    println!();

    println!("=== Fetching a Single Docket ===");
    let docket = client.dockets().get(4214664, Params::new()).await?;
    println!("Case name: {:?}", docket.get("case_name"));
    println!("Court: {:?}", docket.get("court_id"));
    println!();

    println!("=== Filter Shortcuts ===");
    let ninth_circuit = client
        .dockets()
        .by_court("ca9", Params::from([("order_by", "-date_modified")]))
        .await?;
    println!(
        "Ninth Circuit dockets on this page: {}",
        ninth_circuit.results().map_or(0, Vec::len)
    );
    println!();

    println!("=== Pagination ===");
    let mut pages = client
        .courts()
        .paginate(Params::from([("jurisdiction", "F")]));
    let mut seen = 0;
    while let Some(page) = pages.next_page().await? {
        seen += page.results.len();
        println!("  page of {} (running total {})", page.results.len(), seen);
        if seen >= 60 {
            break;
        }
    }

    Ok(())
}
