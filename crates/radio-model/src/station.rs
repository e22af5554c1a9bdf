use serde::{Deserialize, Serialize};

/// One broadcast source as delivered by the backend.
///
/// Stations are immutable for the life of a session: the catalog fetch
/// creates them and nothing on the client mutates them afterwards.
/// `id` is the sole identity key — two `Station` values are equal iff their
/// ids are equal, regardless of name or stream URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Opaque unique identifier, stable across requests.
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    /// Origin stream locator.  Opaque — never parsed, never fetched
    /// directly; always forwarded through the backend proxy.
    #[serde(rename = "url")]
    pub stream_url: String,
    #[serde(default)]
    pub country: String,
    /// Display language; the backend uses "Unknown" as a sentinel.
    #[serde(default = "unknown_language")]
    pub language: String,
    /// Comma-separated genre/category string; first element is the
    /// primary genre.
    #[serde(default)]
    pub tags: String,
    /// Stream bitrate in kbps; 0 means unknown quality.
    #[serde(default)]
    pub bitrate: u32,
    /// Popularity count from the upstream directory.
    #[serde(default)]
    pub votes: u32,
}

fn unknown_language() -> String {
    "Unknown".to_string()
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Station {
    /// First element of the comma-separated tags string, if any.
    pub fn primary_genre(&self) -> Option<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .find(|t| !t.is_empty())
    }

    pub fn is_bitrate_known(&self) -> bool {
        self.bitrate > 0
    }
}

/// The full, unfiltered set of stations fetched once at startup.
///
/// Read-only after construction — it is the baseline for search reset and
/// for client-side fallback filtering.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }
}
