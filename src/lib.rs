#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod client;
pub mod error;
pub mod pager;
pub mod query;
pub mod resource;
pub(crate) mod serde_helpers;
pub mod types;

use std::time::Duration;

use reqwest::Request;
use serde_json::Value;

pub use crate::client::{Client, Config, Transport};
use crate::error::Error;
pub use crate::pager::{MAX_PAGES, PageData};
pub use crate::query::{Query, ToQuery};
pub use crate::resource::{Controller, Resource};

pub type Result<T> = std::result::Result<T, Error>;

/// Default Apiv3 JSON endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://api.hasoffers.com/Apiv3/json";

/// Default number of records requested per page
pub const DEFAULT_PAGING_LIMIT: u32 = 1000;

/// Default wait between two page requests of one paged fetch
pub const DEFAULT_PAGING_DELAY: Duration = Duration::from_millis(750);

/// Default timeout applied to every individual HTTP call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Value sent as the `Version` parameter on every call
pub const API_VERSION: &str = "3";

/// Executes a single API call and unwraps the `{ "response": { "data": ... } }` envelope.
///
/// Returns `Ok(None)` when the body decodes but carries no `response.data`, which callers
/// treat as an empty result rather than a failure.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request(client: &reqwest::Client, request: Request) -> Result<Option<Value>> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let mut body = response.json::<Value>().await?;

    #[cfg(feature = "tracing")]
    if let Some(errors) = body
        .pointer("/response/errors")
        .filter(|errors| errors.as_array().is_some_and(|list| !list.is_empty()))
    {
        tracing::warn!(method = %method, path = %path, errors = %errors, "API reported errors");
    }

    let data = body
        .pointer_mut("/response/data")
        .map(Value::take)
        .filter(|data| !data.is_null());

    #[cfg(feature = "tracing")]
    if data.is_none() {
        tracing::debug!(method = %method, path = %path, "API response carried no data");
    }

    Ok(data)
}
