//! HTTP client for the radio backend.
//!
//! The backend contract is fixed and external:
//!
//! - `GET /api/stations/clean` — full catalog, fetched once at startup.
//! - `GET /api/stations/search?query=<text>&limit=<n>` — server-side search.
//! - `GET /api/stream/<url-encoded origin URL>` — stream proxy.  The client
//!   never addresses a station's origin stream directly; the proxy exists to
//!   satisfy cross-origin policy and is treated as an opaque URL transform.

use radio_model::config::Config;
use radio_model::error::ClientError;
use radio_model::station::{Station, StationCatalog};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info};

use crate::search::SearchBackend;

const USER_AGENT: &str = "global-radio-client/0.1";

/// Shared backend client.  Cheap to clone — the inner `reqwest::Client`
/// pools connections.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    search_limit: usize,
}

impl ApiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let base = Url::parse(&config.backend.base_url)?;
        if base.cannot_be_a_base() {
            anyhow::bail!("backend base_url is not a usable base: {}", base);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_millis(config.backend.connect_timeout_ms))
            .timeout(Duration::from_millis(config.backend.request_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base,
            search_limit: config.backend.search_limit,
        })
    }

    /// Fetch the full catalog.  Called once at startup; the core never
    /// retries on its own.
    pub async fn fetch_catalog(&self) -> Result<StationCatalog, ClientError> {
        let url = self.endpoint(&["api", "stations", "clean"]);
        debug!("fetching station catalog from {}", url);

        let stations: Vec<Station> = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ClientError::CatalogFetchFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| ClientError::CatalogFetchFailed(e.to_string()))?;

        info!("catalog loaded: {} stations", stations.len());
        Ok(StationCatalog::new(stations))
    }

    pub fn stream_proxy(&self) -> StreamProxy {
        StreamProxy {
            base: self.base.clone(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .pop_if_empty()
            .extend(segments);
        url
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint(&["api", "stations", "search"]);
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("limit", &self.search_limit.to_string());
        url
    }
}

impl SearchBackend for ApiClient {
    fn search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<Station>>> + Send {
        let url = self.search_url(query);
        let http = self.http.clone();
        async move {
            let stations = http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Station>>()
                .await?;
            Ok(stations)
        }
    }
}

/// Derives the playable proxy address for a station.
///
/// The origin stream URL travels as a single percent-encoded path segment;
/// the backend unquotes it before opening the upstream connection.
#[derive(Debug, Clone)]
pub struct StreamProxy {
    base: Url,
}

impl StreamProxy {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            anyhow::bail!("proxy base URL is not a usable base: {}", base);
        }
        Ok(Self { base })
    }

    pub fn playable_url(&self, station: &Station) -> String {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .pop_if_empty()
            .extend(["api", "stream", station.stream_url.as_str()]);
        url.to_string()
    }
}
