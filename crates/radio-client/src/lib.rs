//! Headless client core for the Global Radio backend.
//!
//! Three pieces, loosely coupled through station identity:
//!
//! - [`api::ApiClient`] — catalog fetch, server-side search, and the
//!   stream-proxy URL transform against the backend's fixed HTTP contract.
//! - [`search::SearchOrchestrator`] — debounced, cancellable query pipeline
//!   with stale-response discard and silent local fallback.
//! - [`playback::PlaybackSession`] — single-active-stream state machine over
//!   an external [`playback::AudioOutput`] primitive.
//!
//! Rendering is somebody else's job: a UI layer observes snapshots and
//! session state, it never participates in the invariants.

pub mod api;
pub mod playback;
pub mod search;

pub use radio_model::config::Config;
pub use radio_model::error::ClientError;
pub use radio_model::station::{Station, StationCatalog};
