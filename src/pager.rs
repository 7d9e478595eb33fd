//! Sequential page aggregation.
//!
//! Paged HTTP methods answer with `{ "page", "pageCount", "data" }` inside the response
//! envelope. [`paged_request`] walks those pages in ascending order, one at a time with a
//! fixed pause between calls, and merges every page's `data` into a single [`PageData`].

use std::time::Duration;

use serde_json::{Map, Value};
#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::Result;
use crate::client::Transport;
use crate::error::Error;
use crate::query::{Query, deep_merge};

/// Hard ceiling on pages fetched by one [`paged_request`], whatever `pageCount` claims.
pub const MAX_PAGES: u32 = 100;

/// Merged `data` of every page seen so far.
///
/// The variant is fixed by the first page. Later pages must have the same shape.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum PageData {
    /// Pages carried lists; items are concatenated in page order.
    Sequence(Vec<Value>),
    /// Pages carried objects keyed by record id; they are deep-merged, later pages win.
    Mapping(Map<String, Value>),
}

impl PageData {
    fn first(data: Value, page: u32) -> Result<Self> {
        match data {
            Value::Array(items) => Ok(PageData::Sequence(items)),
            Value::Object(entries) => Ok(PageData::Mapping(entries)),
            _ => Err(Error::unexpected_data_type(page)),
        }
    }

    fn merge(&mut self, data: Value, page: u32) -> Result<()> {
        match (self, data) {
            (PageData::Sequence(items), Value::Array(more)) => items.extend(more),
            (PageData::Mapping(entries), Value::Object(more)) => deep_merge(entries, more),
            _ => return Err(Error::unexpected_data_type(page)),
        }

        Ok(())
    }

    /// Number of top-level items or entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            PageData::Sequence(items) => items.len(),
            PageData::Mapping(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<PageData> for Value {
    fn from(data: PageData) -> Self {
        match data {
            PageData::Sequence(items) => Value::Array(items),
            PageData::Mapping(entries) => Value::Object(entries),
        }
    }
}

/// Fetches `target`/`method` page by page and merges the results.
///
/// `limit` is sent as the page size and `page` counts up from 1. After each page the
/// server's `pageCount` decides whether to continue: a missing, non-numeric or zero count,
/// or one not above the current page, ends the walk. Otherwise the next page is requested
/// after `delay`. At most [`MAX_PAGES`] pages are fetched.
///
/// A page without any payload is not a failure: it ends the walk and the pages merged
/// before it are returned. `Ok(None)` means not even the first page carried data.
///
/// # Errors
///
/// The first transport error is returned as-is and everything merged so far is dropped.
/// A page whose `data` is neither a list nor an object, or whose shape differs from the
/// first page, yields a [`crate::error::Kind::Shape`] error.
pub async fn paged_request<T: Transport + ?Sized>(
    transport: &T,
    target: &str,
    method: &str,
    mut query: Query,
    limit: u32,
    delay: Duration,
) -> Result<Option<PageData>> {
    query.insert("limit", limit);

    let mut merged: Option<PageData> = None;

    for page in 1..=MAX_PAGES {
        query.insert("page", page);

        let Some(mut payload) = transport.request(target, method, query.clone()).await? else {
            #[cfg(feature = "tracing")]
            debug!(target_controller = target, method, page, "empty page, stopping");
            break;
        };

        let data = payload.get_mut("data").map(Value::take).unwrap_or_default();
        merged = Some(match merged.take() {
            Some(mut so_far) => {
                so_far.merge(data, page)?;
                so_far
            }
            None => PageData::first(data, page)?,
        });

        let page_count = page_count(&payload);

        #[cfg(feature = "tracing")]
        debug!(target_controller = target, method, page, page_count, "merged page");

        if page_count <= page {
            break;
        }

        if page == MAX_PAGES {
            #[cfg(feature = "tracing")]
            warn!(
                target_controller = target,
                method,
                page_count,
                "stopping at {MAX_PAGES} pages, remaining pages were not fetched"
            );
            break;
        }

        tokio::time::sleep(delay).await;
    }

    Ok(merged)
}

/// Server-reported total pages. Sent as a string or a number, integral or not; anything
/// else counts as 0. Values beyond `u32` saturate.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "float to int casts saturate and negatives map to 0"
)]
fn page_count(payload: &Value) -> u32 {
    let count = match payload.get("pageCount") {
        Some(Value::Number(count)) => count.as_f64(),
        Some(Value::String(count)) => count.trim().parse::<f64>().ok(),
        _ => None,
    };

    count.filter(|count| count.is_finite()).map_or(0, |count| count as u32)
}
