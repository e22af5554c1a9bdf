//! End-to-end flow over fakes: degraded search feeding station selection
//! and playback, the way a UI event loop would drive the core.

use radio_client::api::StreamProxy;
use radio_client::playback::{AudioOutput, PlaybackSession, PlaybackState};
use radio_client::search::{SearchBackend, SearchOrchestrator};
use radio_client::{Station, StationCatalog};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

fn station(id: &str, name: &str, country: &str, tags: &str) -> Station {
    Station {
        id: id.to_string(),
        name: name.to_string(),
        stream_url: format!("http://streams.example/{id}"),
        country: country.to_string(),
        language: "Unknown".to_string(),
        tags: tags.to_string(),
        bitrate: 192,
        votes: 100,
    }
}

/// Backend with the network cable pulled — every request fails, which
/// forces the orchestrator onto its local fallback path.
struct OfflineBackend;

impl SearchBackend for OfflineBackend {
    fn search(
        &self,
        _query: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Station>>> + Send {
        async { anyhow::bail!("connection refused") }
    }
}

#[derive(Default)]
struct RecordingOutput {
    active: bool,
    playing: bool,
    volume: Option<f32>,
}

impl AudioOutput for RecordingOutput {
    async fn set_source(&mut self, _url: &str) -> anyhow::Result<()> {
        assert!(!self.active, "two resources active at once");
        self.active = true;
        Ok(())
    }

    async fn play(&mut self) -> anyhow::Result<()> {
        self.playing = true;
        Ok(())
    }

    async fn pause(&mut self) {
        self.playing = false;
    }

    async fn release(&mut self) {
        self.active = false;
        self.playing = false;
    }

    async fn set_volume(&mut self, level: f32) {
        self.volume = Some(level);
    }
}

#[tokio::test(start_paused = true)]
async fn test_degraded_search_still_feeds_playback() {
    let catalog = Arc::new(StationCatalog::new(vec![
        station("1", "Jazz24", "USA", "jazz,smooth"),
        station("2", "Global News Network", "UK", "news"),
        station("3", "Radio 92.3", "Germany", "pop"),
    ]));

    let orchestrator = SearchOrchestrator::new(
        OfflineBackend,
        Arc::clone(&catalog),
        Duration::from_millis(500),
    );

    // Type "jazz", wait out the debounce: the server is unreachable, so the
    // result must come from local filtering — never an error, never empty.
    orchestrator.set_query("jazz").await;
    tokio::time::sleep(Duration::from_millis(600)).await;

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.query, "jazz");
    assert_eq!(snapshot.stations.len(), 1);
    let picked = snapshot.stations[0].clone();
    assert_eq!(picked.id, "1");

    // Select the found station and play it through the proxy.
    let proxy = StreamProxy::new("http://127.0.0.1:8001").unwrap();
    let mut session = PlaybackSession::new(RecordingOutput::default(), proxy, 0.5);

    session.select(&picked).await.unwrap();
    assert!(session.state().is_playing());
    assert_eq!(session.current_station(), Some(&picked));

    // Clearing the query restores the catalog; switching stations swaps
    // the single output resource.
    orchestrator.set_query("").await;
    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.stations.len(), catalog.len());

    let other = snapshot.stations[1].clone();
    session.select(&other).await.unwrap();
    assert_eq!(session.current_station(), Some(&other));
    assert!(session.state().is_playing());

    session.stop().await;
    assert_eq!(*session.state(), PlaybackState::Idle);
}
