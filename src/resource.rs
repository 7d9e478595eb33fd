//! Per-controller facades over the paged fetch.
//!
//! HasOffers wraps every record twice: `findAll` answers with
//! `{"150": {"Offer": {...}}}`, keyed by record id and then by model name, and
//! `Report.getStats` answers with rows like `[{"Stat": {...}}]`. The facades here fetch all
//! pages, strip both wrappers and hand back the bare records.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::client::Client;
use crate::error::Error;
use crate::pager::PageData;
use crate::query::{Query, ToQuery};
use crate::{Result, serde_helpers};

const FIND_ALL: &str = "findAll";
const GET_STATS: &str = "getStats";

/// A remote controller (`Target`) and the model name its records are wrapped in.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    pub target: &'static str,
    pub model: &'static str,
}

impl Controller {
    pub const OFFER: Controller = Controller::new("Offer", "Offer");
    pub const AFFILIATE: Controller = Controller::new("Affiliate", "Affiliate");
    pub const ADVERTISER: Controller = Controller::new("Advertiser", "Advertiser");
    pub const CONVERSION: Controller = Controller::new("Conversion", "Conversion");
    pub const REPORT: Controller = Controller::new("Report", "Stat");

    #[must_use]
    pub const fn new(target: &'static str, model: &'static str) -> Self {
        Self { target, model }
    }
}

/// Facade over one [`Controller`], obtained from [`Client::resource`] or one of its
/// shorthands such as [`Client::offers`].
///
/// Every method pages through the full result set with the client's configuration,
/// unwraps the records and deserializes each into `T`. Use [`serde_json::Value`] as `T`
/// for untyped records.
#[derive(Debug, Clone, Copy)]
pub struct Resource<'client> {
    client: &'client Client,
    controller: Controller,
}

impl<'client> Resource<'client> {
    pub(crate) fn new(client: &'client Client, controller: Controller) -> Self {
        Self { client, controller }
    }

    #[must_use]
    pub fn controller(&self) -> Controller {
        self.controller
    }

    /// Lists every record matching `request` (`findAll`).
    ///
    /// # Errors
    ///
    /// Returns an error if `request` does not serialize to an object, the paged fetch
    /// fails, or a record does not deserialize into `T`.
    pub async fn find_all<T: DeserializeOwned, Q: ToQuery + ?Sized>(
        &self,
        request: &Q,
    ) -> Result<Vec<T>> {
        self.fetch(FIND_ALL, request.to_query()?).await
    }

    /// Looks up one record by id through `findAll` with an `id` filter. Other filters in
    /// `request` still apply.
    ///
    /// # Errors
    ///
    /// See [`Self::find_all`].
    pub async fn find_by_id<T: DeserializeOwned, I: Into<Value>, Q: ToQuery + ?Sized>(
        &self,
        id: I,
        request: &Q,
    ) -> Result<Option<T>> {
        let mut query = request.to_query()?;
        query.merge(Query::new().with("filters", json!({ "id": id.into() })));

        let mut records = self.fetch(FIND_ALL, query).await?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.swap_remove(0)))
        }
    }

    /// Lists the records with the given ids through `findAll` with an `id` list filter.
    ///
    /// # Errors
    ///
    /// Returns a validation error without calling the API if `ids` is empty, otherwise see
    /// [`Self::find_all`].
    pub async fn find_by_ids<T, I, V, Q>(&self, ids: I, request: &Q) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
        Q: ToQuery + ?Sized,
    {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(Error::validation("at least one id is required"));
        }

        let mut query = request.to_query()?;
        query.merge(Query::new().with("filters", json!({ "id": ids })));

        self.fetch(FIND_ALL, query).await
    }

    /// Runs a `getStats` report and returns its rows.
    ///
    /// # Errors
    ///
    /// See [`Self::find_all`].
    pub async fn get_stats<T: DeserializeOwned, Q: ToQuery + ?Sized>(
        &self,
        request: &Q,
    ) -> Result<Vec<T>> {
        self.fetch(GET_STATS, request.to_query()?).await
    }

    async fn fetch<T: DeserializeOwned>(&self, method: &str, query: Query) -> Result<Vec<T>> {
        let Some(data) = self
            .client
            .paged_request(self.controller.target, method, query)
            .await?
        else {
            return Ok(Vec::new());
        };

        normalize(data, self.controller.model)
            .into_iter()
            .map(serde_helpers::deserialize_with_warnings)
            .collect()
    }
}

/// Strips the id and model wrappers from merged page data.
///
/// Keyed entries (`{"150": {"Offer": {...}}}`) and list entries (`[{"Offer": {...}}]` or
/// `[{"150": {"Offer": {...}}}]`) both yield the inner `{...}`. Entries without `model`
/// are dropped.
#[must_use]
pub fn normalize(data: PageData, model: &str) -> Vec<Value> {
    match data {
        PageData::Mapping(entries) => entries
            .into_iter()
            .filter_map(|(_id, entry)| unwrap_model(entry, model))
            .collect(),
        PageData::Sequence(entries) => entries
            .into_iter()
            .flat_map(|entry| unwrap_list_entry(entry, model))
            .collect(),
    }
}

fn unwrap_model(entry: Value, model: &str) -> Option<Value> {
    match entry {
        Value::Object(mut wrapper) => wrapper.shift_remove(model).filter(|inner| !inner.is_null()),
        _ => None,
    }
}

fn unwrap_list_entry(entry: Value, model: &str) -> Vec<Value> {
    let Value::Object(mut wrapper) = entry else {
        return Vec::new();
    };

    if let Some(inner) = wrapper.shift_remove(model) {
        return if inner.is_null() { Vec::new() } else { vec![inner] };
    }

    wrapper
        .into_iter()
        .filter_map(|(_id, entry)| unwrap_model(entry, model))
        .collect()
}
