//! Playback session — single-owner state machine over an external audio
//! output primitive.
//!
//! The session guarantees that at most one output resource is ever held:
//! every path that acquires a resource releases the previous one first,
//! including all failure paths.  Volume and mute are session-wide and are
//! re-applied on every acquisition.
//!
//! All methods take `&mut self` and fully resolve their release/acquire
//! sequence before returning, so a host event loop calling them in order
//! can never overlap two acquisitions.

use radio_model::error::ClientError;
use radio_model::station::Station;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::StreamProxy;

/// External audio capability — the session's only means of producing sound.
/// Implementations wrap a platform media element or player process.
#[allow(async_fn_in_trait)]
pub trait AudioOutput {
    /// Acquire the output resource and point it at `url`.
    async fn set_source(&mut self, url: &str) -> anyhow::Result<()>;
    /// Start or resume playback.
    async fn play(&mut self) -> anyhow::Result<()>;
    /// Pause without releasing the resource.
    async fn pause(&mut self);
    /// Stop and detach.  Must be safe to call when nothing is held.
    async fn release(&mut self);
    async fn set_volume(&mut self, level: f32);
}

/// `ended`/`error` notifications from the output, delivered by the host
/// event loop via [`PlaybackSession::handle_output_event`].
#[derive(Debug, Clone)]
pub enum OutputEvent {
    Ended,
    Error(String),
}

/// Serializable so a rendering layer can mirror the session state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(Station),
    Paused(Station),
}

impl PlaybackState {
    pub fn station(&self) -> Option<&Station> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Playing(s) | PlaybackState::Paused(s) => Some(s),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing(_))
    }
}

pub struct PlaybackSession<O: AudioOutput> {
    output: O,
    proxy: StreamProxy,
    state: PlaybackState,
    /// Stored level, 0.0–1.0.  Muting does not alter it.
    volume: f32,
    muted: bool,
}

impl<O: AudioOutput> PlaybackSession<O> {
    pub fn new(output: O, proxy: StreamProxy, default_volume: f32) -> Self {
        Self {
            output,
            proxy,
            state: PlaybackState::Idle,
            volume: default_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_station(&self) -> Option<&Station> {
        self.state.station()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Single entry point for play/pause/switch.
    ///
    /// Selecting the current station toggles play/pause (resume keeps the
    /// acquired resource); selecting a different one releases the old
    /// resource and acquires the new.
    pub async fn select(&mut self, station: &Station) -> Result<(), ClientError> {
        match &self.state {
            PlaybackState::Playing(current) if current.id == station.id => {
                self.output.pause().await;
                self.state = PlaybackState::Paused(station.clone());
                info!("paused {}", station.name);
                Ok(())
            }
            PlaybackState::Paused(current) if current.id == station.id => {
                if let Err(err) = self.output.play().await {
                    return Err(self.fail(station, err).await);
                }
                self.state = PlaybackState::Playing(station.clone());
                info!("resumed {}", station.name);
                Ok(())
            }
            _ => self.start(station).await,
        }
    }

    /// Explicit stop: release the resource and go idle.
    pub async fn stop(&mut self) {
        if self.state != PlaybackState::Idle {
            self.output.release().await;
            self.state = PlaybackState::Idle;
            info!("playback stopped");
        }
    }

    pub async fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        self.apply_volume().await;
    }

    /// Muting zeroes the applied level; the stored level survives so that
    /// unmuting restores exactly the prior setting.
    pub async fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume().await;
    }

    pub async fn toggle_mute(&mut self) {
        let muted = !self.muted;
        self.set_muted(muted).await;
    }

    /// Feed an `ended`/`error` event from the output primitive.
    ///
    /// Errors terminate the session attempt — the state resets to idle and
    /// the failure is returned so the consumer can surface it.
    pub async fn handle_output_event(&mut self, event: OutputEvent) -> Result<(), ClientError> {
        match event {
            OutputEvent::Ended => {
                if self.state != PlaybackState::Idle {
                    info!("stream ended");
                    self.output.release().await;
                    self.state = PlaybackState::Idle;
                }
                Ok(())
            }
            OutputEvent::Error(reason) => {
                let station = match self.state.station() {
                    Some(s) => s.clone(),
                    // Nothing held — a stale event from an already
                    // released resource.
                    None => return Ok(()),
                };
                Err(self.fail(&station, anyhow::anyhow!(reason)).await)
            }
        }
    }

    async fn start(&mut self, station: &Station) -> Result<(), ClientError> {
        // Release before acquire — never two resources active, even
        // transiently.
        self.output.release().await;
        self.state = PlaybackState::Idle;

        let url = self.proxy.playable_url(station);
        info!("tuning {} via {}", station.name, url);
        if let Err(err) = self.acquire(&url).await {
            return Err(self.fail(station, err).await);
        }
        self.state = PlaybackState::Playing(station.clone());
        Ok(())
    }

    async fn acquire(&mut self, url: &str) -> anyhow::Result<()> {
        self.output.set_source(url).await?;
        let level = self.effective_volume();
        self.output.set_volume(level).await;
        self.output.play().await?;
        Ok(())
    }

    async fn fail(&mut self, station: &Station, err: anyhow::Error) -> ClientError {
        self.output.release().await;
        self.state = PlaybackState::Idle;
        let err = ClientError::PlaybackFailed {
            station: station.name.clone(),
            reason: err.to_string(),
        };
        warn!("{err}");
        err
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    async fn apply_volume(&mut self) {
        if self.state != PlaybackState::Idle {
            let level = self.effective_volume();
            self.output.set_volume(level).await;
        }
    }
}
