//! Debounced, cancellable search pipeline.
//!
//! Keystrokes go in through [`SearchOrchestrator::set_query`]; the currently
//! displayed station list comes out through [`SearchOrchestrator::snapshot`].
//! Between the two sits a debounce timer (the only cancellable unit — a
//! newer keystroke aborts a pending timer outright) and a monotonic request
//! token that gates every state write, so a slow response for an old query
//! can never overwrite the result of a newer one.
//!
//! Transport failures never escape: a failed server-side search degrades to
//! filtering the full catalog locally, with the same token gate applied.

use radio_model::error::ClientError;
use radio_model::station::{Station, StationCatalog};
use regex::Regex;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

/// Monotonic token source.  A response is applied only while its token is
/// still the most recently issued one.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

fn mint_token() -> u64 {
    NEXT_TOKEN.fetch_add(1, Ordering::SeqCst)
}

/// Server-side search seam.  Implemented by [`crate::api::ApiClient`]; tests
/// substitute programmable fakes.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(&self, query: &str)
        -> impl Future<Output = anyhow::Result<Vec<Station>>> + Send;
}

impl<B: SearchBackend> SearchBackend for Arc<B> {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Station>>> + Send {
        (**self).search(query)
    }
}

/// What a subscriber sees: the latest applied query, its station list, and
/// a revision counter bumped on every change.  Serializable so a rendering
/// layer can consume snapshots as JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState {
    pub query: String,
    pub stations: Vec<Station>,
    pub rev: u64,
}

struct Shared<B> {
    backend: B,
    catalog: Arc<StationCatalog>,
    debounce: Duration,
    /// Token of the most recently issued request.
    in_flight: AtomicU64,
    state: RwLock<SearchState>,
}

pub struct SearchOrchestrator<B: SearchBackend> {
    shared: Arc<Shared<B>>,
    /// Abort handle for the pending debounce timer, if any.
    pending: Mutex<Option<AbortHandle>>,
}

impl<B: SearchBackend> SearchOrchestrator<B> {
    pub fn new(backend: B, catalog: Arc<StationCatalog>, debounce: Duration) -> Self {
        let initial = SearchState {
            query: String::new(),
            stations: catalog.stations().to_vec(),
            rev: 1,
        };
        Self {
            shared: Arc::new(Shared {
                backend,
                catalog,
                debounce,
                in_flight: AtomicU64::new(0),
                state: RwLock::new(initial),
            }),
            pending: Mutex::new(None),
        }
    }

    pub async fn snapshot(&self) -> SearchState {
        self.shared.state.read().await.clone()
    }

    /// Called on every keystroke.  Schedules, rather than performs,
    /// evaluation; never blocks and never errors.
    pub async fn set_query(&self, text: &str) {
        let text = text.trim();

        if text.is_empty() {
            self.cancel_pending();
            // Mint a token no request carries, so anything still in flight
            // is stale by the time it lands.
            self.shared.in_flight.store(mint_token(), Ordering::SeqCst);

            let mut state = self.shared.state.write().await;
            state.query.clear();
            state.stations = self.shared.catalog.stations().to_vec();
            state.rev += 1;
            return;
        }

        let shared = Arc::clone(&self.shared);
        let query = text.to_string();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            let token = mint_token();
            shared.in_flight.store(token, Ordering::SeqCst);
            // Once issued, transport is never cancelled — a superseded
            // request runs to completion and is discarded by its token.
            tokio::spawn(run_query(Arc::clone(&shared), query, token));
        });

        let mut pending = self.pending.lock().expect("pending timer lock poisoned");
        if let Some(previous) = pending.replace(timer.abort_handle()) {
            previous.abort();
        }
    }

    fn cancel_pending(&self) {
        if let Some(timer) = self
            .pending
            .lock()
            .expect("pending timer lock poisoned")
            .take()
        {
            timer.abort();
        }
    }
}

async fn run_query<B: SearchBackend>(shared: Arc<Shared<B>>, query: String, token: u64) {
    let stations = match shared.backend.search(&query).await {
        Ok(stations) => stations,
        Err(err) => {
            let err = ClientError::SearchTransportFailed(err.to_string());
            debug!("{err}; filtering the catalog locally for {query:?}");
            filter_catalog(shared.catalog.stations(), &query)
        }
    };

    let mut state = shared.state.write().await;
    if shared.in_flight.load(Ordering::SeqCst) != token {
        trace!("discarding stale search response for {query:?}");
        return;
    }
    state.query = query;
    state.stations = stations;
    state.rev += 1;
}

/// Leading numeric portion of a dial-position query ("92.3", "101 FM",
/// "880 khz"), if the whole query looks like one.
fn frequency_digits(query: &str) -> Option<String> {
    let re = Regex::new(r"(?i)^\s*(\d{2,3}(?:\.\d+)?)\s*(?:fm|am|khz|mhz)?\s*$")
        .expect("frequency pattern is valid");
    re.captures(query).map(|caps| caps[1].to_string())
}

/// Client-side fallback filter over the full catalog.
///
/// Dial-position queries match on station name only — country and tags are
/// deliberately not consulted, even when that suppresses text matches
/// containing numbers.  Everything else is a case-insensitive substring
/// match over name, country, or tags.
pub fn filter_catalog(stations: &[Station], query: &str) -> Vec<Station> {
    if let Some(digits) = frequency_digits(query) {
        return stations
            .iter()
            .filter(|s| s.name.contains(&digits))
            .cloned()
            .collect();
    }

    let query = query.to_lowercase();
    stations
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&query)
                || s.country.to_lowercase().contains(&query)
                || s.tags.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}
