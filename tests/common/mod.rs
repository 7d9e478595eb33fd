#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(unused, reason = "Not every test binary uses every helper")]

use std::time::Duration;

use hasoffers_client_sdk::{Client, Config};
use httpmock::MockServer;
use serde_json::{Value, json};

pub const API_PATH: &str = "/Apiv3/json";
pub const NETWORK_ID: &str = "demo";
pub const NETWORK_TOKEN: &str = "NETd3m0t0k3nAAAAAAAAAAAAAAAAAAAA";

/// Client pointed at `server` with no pause between pages.
pub fn client(server: &MockServer) -> anyhow::Result<Client> {
    let config = Config::builder()
        .api_endpoint(server.url(API_PATH))
        .paging_delay(Duration::ZERO)
        .build();

    Ok(Client::new(NETWORK_ID, NETWORK_TOKEN, config)?)
}

/// Client pointed at `server` with explicit timing settings.
pub fn client_with_timing(
    server: &MockServer,
    paging_delay: Duration,
    request_timeout: Duration,
    deadline: Option<Duration>,
) -> anyhow::Result<Client> {
    let config = Config::builder()
        .api_endpoint(server.url(API_PATH))
        .paging_delay(paging_delay)
        .request_timeout(request_timeout)
        .maybe_deadline(deadline)
        .build();

    Ok(Client::new(NETWORK_ID, NETWORK_TOKEN, config)?)
}

/// Wraps one page of a paged method in the API's response envelope.
#[must_use]
pub fn page(page: u32, page_count: u32, data: Value) -> Value {
    json!({
        "request": { "Target": "Offer", "Method": "findAll" },
        "response": {
            "status": 1,
            "httpStatus": 200,
            "data": {
                "page": page,
                "current": 1,
                "count": 3,
                "pageCount": page_count.to_string(),
                "data": data
            },
            "errors": []
        }
    })
}

/// Wraps `data` in the envelope of a non-paged method.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({
        "response": {
            "status": 1,
            "httpStatus": 200,
            "data": data,
            "errors": []
        }
    })
}

#[must_use]
pub fn offer(id: u32, name: &str) -> Value {
    json!({
        id.to_string(): {
            "Offer": {
                "id": id.to_string(),
                "name": name,
                "status": "active",
                "default_payout": "1.50000",
                "require_approval": "0"
            }
        }
    })
}
