//! Lists every active offer and a per-offer click report for the first week of 2024.
//!
//! Run with tracing enabled:
//! ```sh
//! HASOFFERS_NETWORK_ID=demo HASOFFERS_NETWORK_TOKEN=NET... \
//!     RUST_LOG=debug,hyper_util=off,hyper=off,reqwest=off,rustls=off \
//!     cargo run --example find_all --features tracing
//! ```

use std::time::Duration;

use hasoffers_client_sdk::types::request::SortDirection;
use hasoffers_client_sdk::types::{FindAllRequest, Offer, StatsRequest};
use hasoffers_client_sdk::{Client, Config, Query};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let network_id = std::env::var("HASOFFERS_NETWORK_ID")?;
    let network_token = std::env::var("HASOFFERS_NETWORK_TOKEN")?;

    let config = Config::builder()
        .paging_limit(500)
        .deadline(Duration::from_secs(120))
        .build();
    let client = Client::new(network_id, network_token, config)?;

    let request = FindAllRequest::builder()
        .filters(Query::new().with("status", "active"))
        .fields(vec!["id".to_owned(), "name".to_owned(), "default_payout".to_owned()])
        .sort(vec![("name".to_owned(), SortDirection::Asc)])
        .build();

    match client.offers().find_all::<Offer, _>(&request).await {
        Ok(offers) => {
            info!(count = offers.len(), "active offers");
            for offer in &offers {
                info!(id = %offer.id, name = ?offer.name, payout = ?offer.default_payout);
            }
        }
        Err(e) => error!(error = %e, "listing offers failed"),
    }

    let stats = StatsRequest::builder()
        .fields(vec!["Stat.offer_id".to_owned(), "Stat.clicks".to_owned()])
        .groups(vec!["Stat.offer_id".to_owned()])
        .filters(Query::new().with("Stat.date", serde_json::json!({
            "conditional": "BETWEEN",
            "values": ["2024-01-01", "2024-01-07"]
        })))
        .build();

    match client.reports().get_stats::<Value, _>(&stats).await {
        Ok(rows) => {
            for row in rows {
                info!(offer_id = %row["offer_id"], clicks = %row["clicks"]);
            }
        }
        Err(e) => error!(error = %e, "click report failed"),
    }

    Ok(())
}
