use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;
use tracing::info;

use crate::error::{EnsembleError, Result};

/// Owns the audio payload once the core's job is done
///
/// `load` happens during assignment, well before the play instant; `start`
/// fires exactly when the synchronized sleep elapses. The core only ever
/// reads `is_playing` to keep the process alive until playback finishes.
#[async_trait]
pub trait PlaybackSink: Send {
    /// Load a combined payload for later playback
    ///
    /// # Errors
    ///
    /// Returns `Playback` if the payload cannot be prepared
    async fn load(&mut self, payload: Bytes) -> Result<()>;

    /// Begin playback of the loaded payload
    ///
    /// # Errors
    ///
    /// Returns `Playback` if nothing is loaded or the device fails
    async fn start(&mut self) -> Result<()>;

    /// Whether playback is still in progress
    fn is_playing(&self) -> bool;
}

/// Sink that logs instead of playing
///
/// Reports "playing" for a fixed duration after `start`, so drivers that
/// wait for playback to finish behave realistically without an audio stack.
#[derive(Debug)]
pub struct NullSink {
    loaded: Option<Bytes>,
    started_at: Option<Instant>,
    play_duration: Duration,
}

impl NullSink {
    /// Create a sink that pretends to play for `play_duration`
    #[must_use]
    pub fn new(play_duration: Duration) -> Self {
        Self {
            loaded: None,
            started_at: None,
            play_duration,
        }
    }

    /// Size of the loaded payload, if any
    #[must_use]
    pub fn loaded_len(&self) -> Option<usize> {
        self.loaded.as_ref().map(Bytes::len)
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl PlaybackSink for NullSink {
    async fn load(&mut self, payload: Bytes) -> Result<()> {
        info!(bytes = payload.len(), "payload loaded");
        self.loaded = Some(payload);
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(EnsembleError::Playback {
                message: "start called with no payload loaded".to_string(),
            });
        }
        info!("playback started");
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.started_at
            .is_some_and(|at| at.elapsed() < self.play_duration)
    }
}
