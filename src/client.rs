//! Authenticated HTTP client for the HasOffers API.
//!
//! # Example
//!
//! ```no_run
//! use hasoffers_client_sdk::{Client, Config, Query};
//! use serde_json::Value;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("demo", "NETd3m0t0k3n", Config::default())?;
//!
//! let offers: Vec<Value> = client.offers().find_all(&Query::new()).await?;
//! println!("{} offers", offers.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::pager::{self, PageData};
use crate::query::Query;
use crate::resource::{Controller, Resource};
use crate::{
    API_VERSION, DEFAULT_API_ENDPOINT, DEFAULT_PAGING_DELAY, DEFAULT_PAGING_LIMIT,
    DEFAULT_REQUEST_TIMEOUT, Result,
};

/// A single call against a `Target`/`Method` pair of the API.
///
/// [`Client`] is the HTTP implementation. The pager only needs this trait, so paging can
/// be driven by any source of pages.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs exactly one call and returns the `response.data` payload, if any.
    async fn request(&self, target: &str, method: &str, query: Query) -> Result<Option<Value>>;
}

/// Configuration for [`Client`]
#[derive(Clone, Debug, Builder)]
#[non_exhaustive]
pub struct Config {
    /// Base URL calls are sent to. Defaults to [`DEFAULT_API_ENDPOINT`].
    #[builder(into, default = DEFAULT_API_ENDPOINT.to_owned())]
    api_endpoint: String,
    /// Records requested per page. Defaults to [`DEFAULT_PAGING_LIMIT`].
    #[builder(default = DEFAULT_PAGING_LIMIT)]
    paging_limit: u32,
    /// Wait between two pages of one paged fetch. Defaults to [`DEFAULT_PAGING_DELAY`].
    #[builder(default = DEFAULT_PAGING_DELAY)]
    paging_delay: Duration,
    /// Timeout for each individual HTTP call. Defaults to [`DEFAULT_REQUEST_TIMEOUT`].
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    request_timeout: Duration,
    /// Upper bound on the whole paged fetch, delays included. Unbounded when unset.
    deadline: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Config {
    #[must_use]
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    #[must_use]
    pub fn paging_limit(&self) -> u32 {
        self.paging_limit
    }

    #[must_use]
    pub fn paging_delay(&self) -> Duration {
        self.paging_delay
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

/// Client for the HasOffers Apiv3 JSON API.
///
/// Cloning is cheap and clones share one connection pool. Every call carries the network
/// id and token supplied at construction.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: Config,
    /// The [`Url`] against which `client` is making requests.
    endpoint: Url,
    network_id: String,
    network_token: SecretString,
    /// The inner [`ReqwestClient`] used to make requests to `endpoint`.
    client: ReqwestClient,
}

impl Client {
    /// Creates a new client for the given network.
    ///
    /// # Errors
    ///
    /// Returns an error if the network id or token is empty, the endpoint URL is invalid,
    /// or the HTTP client fails to build.
    pub fn new<I: Into<String>, T: Into<String>>(
        network_id: I,
        network_token: T,
        config: Config,
    ) -> Result<Client> {
        let network_id = network_id.into();
        let network_token = network_token.into();

        if network_id.is_empty() {
            return Err(Error::validation("network id must not be empty"));
        }
        if network_token.is_empty() {
            return Err(Error::validation("network token must not be empty"));
        }

        let mut headers = HeaderMap::new();

        headers.insert(
            "User-Agent",
            HeaderValue::from_static("hasoffers_client_sdk"),
        );
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        let client = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                endpoint: Url::parse(&config.api_endpoint)?,
                config,
                network_id,
                network_token: SecretString::from(network_token),
                client,
            }),
        })
    }

    /// Returns the endpoint URL for the client.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[must_use]
    pub fn network_id(&self) -> &str {
        &self.inner.network_id
    }

    /// Issues one call to `target`/`method`.
    ///
    /// Credentials, target, method and [`API_VERSION`] are added to `query`, overriding any
    /// caller-supplied value under the same key. Returns `Ok(None)` when the response
    /// carries no `response.data`.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` or `method` is empty, the call fails, the API answers
    /// with a non-2xx status, or the body is not JSON.
    pub async fn request(
        &self,
        target: &str,
        method: &str,
        mut query: Query,
    ) -> Result<Option<Value>> {
        if target.is_empty() || method.is_empty() {
            return Err(Error::validation("target and method must not be empty"));
        }

        query.insert("NetworkId", self.inner.network_id.as_str());
        query.insert(
            "NetworkToken",
            self.inner.network_token.expose_secret(),
        );
        query.insert("Target", target);
        query.insert("Method", method);
        query.insert("Version", API_VERSION);

        let mut url = self.inner.endpoint.clone();
        url.set_query(Some(&query.to_query_string()));

        let request = self.inner.client.request(Method::GET, url).build()?;

        crate::request(&self.inner.client, request).await
    }

    /// Fetches every page of `target`/`method` and merges them, using the configured page
    /// size, inter-page delay and deadline.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error, a [`crate::error::Kind::Shape`] error if a
    /// page's data has an unexpected shape, or a [`crate::error::Kind::Timeout`] error if
    /// the configured deadline elapses.
    pub async fn paged_request(
        &self,
        target: &str,
        method: &str,
        query: Query,
    ) -> Result<Option<PageData>> {
        let config = &self.inner.config;
        let fetch = pager::paged_request(
            self,
            target,
            method,
            query,
            config.paging_limit,
            config.paging_delay,
        );

        match config.deadline {
            Some(deadline) => tokio::time::timeout(deadline, fetch)
                .await
                .map_err(|_elapsed| Error::deadline_exceeded(deadline))?,
            None => fetch.await,
        }
    }

    /// Returns the facade for an arbitrary controller.
    #[must_use]
    pub fn resource(&self, controller: Controller) -> Resource<'_> {
        Resource::new(self, controller)
    }

    /// `Offer` controller
    #[must_use]
    pub fn offers(&self) -> Resource<'_> {
        self.resource(Controller::OFFER)
    }

    /// `Affiliate` controller
    #[must_use]
    pub fn affiliates(&self) -> Resource<'_> {
        self.resource(Controller::AFFILIATE)
    }

    /// `Advertiser` controller
    #[must_use]
    pub fn advertisers(&self) -> Resource<'_> {
        self.resource(Controller::ADVERTISER)
    }

    /// `Conversion` controller
    #[must_use]
    pub fn conversions(&self) -> Resource<'_> {
        self.resource(Controller::CONVERSION)
    }

    /// `Report` controller, whose rows are `Stat` records
    #[must_use]
    pub fn reports(&self) -> Resource<'_> {
        self.resource(Controller::REPORT)
    }
}

#[allow(
    clippy::same_name_method,
    reason = "The inherent method saves callers from importing Transport"
)]
#[async_trait]
impl Transport for Client {
    async fn request(&self, target: &str, method: &str, query: Query) -> Result<Option<Value>> {
        Client::request(self, target, method, query).await
    }
}
