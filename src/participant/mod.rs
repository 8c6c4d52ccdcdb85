//! Participant role: receive tracks, sync the clock, start on time
//!
//! A participant never starts playback on a failed or stale sync; every
//! error on the way to the play instant is fatal to this unit, on the
//! principle that no start beats a mistimed one.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{EnsembleError, Result};
use crate::net::{FramedTcpStream, READY_ACK, SCHEDULE_ACK};
use crate::playback::PlaybackSink;
use crate::timesync::{MicroTimestamp, SyncProber};
use crate::types::ParticipantConfig;

/// How often to poll the sink while playback runs
const PLAYING_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The client role of a session
#[derive(Debug)]
pub struct Participant {
    config: ParticipantConfig,
}

impl Participant {
    /// Create a participant from config
    #[must_use]
    pub fn new(config: ParticipantConfig) -> Self {
        Self { config }
    }

    /// Run one full session: assignment, sync, timed start, playback
    ///
    /// Returns once the sink reports playback finished.
    ///
    /// # Errors
    ///
    /// Any transport, protocol, sync or scheduling failure is fatal; the
    /// sink is never started late
    pub async fn run(self, sink: &mut dyn PlaybackSink) -> Result<()> {
        let mut stream = FramedTcpStream::connect(self.config.coordinator_addr).await?;
        info!(coordinator = %self.config.coordinator_addr, "connected");

        stream.send(&self.config.track_count.to_be_bytes()).await?;
        let payload = stream.recv().await?;
        info!(bytes = payload.len(), "payload received");

        sink.load(payload).await?;
        stream.send(READY_ACK).await?;
        debug!("readiness sent");

        // Sync while the coordinator is still collecting other clients; the
        // play-time frame just queues on the stream until we read it.
        let prober = SyncProber::new(
            self.config.sync_addr,
            self.config.probe_attempts,
            self.config.probe_timeout,
        );
        let estimate = prober.best_estimate(self.config.sync_rounds).await?;
        info!(
            offset = estimate.offset_micros,
            ping = estimate.ping_micros,
            "clock offset estimated"
        );

        let frame = stream.recv().await?;
        let play_time =
            MicroTimestamp::decode(&frame).ok_or_else(|| EnsembleError::ProtocolViolation {
                expected: "8-byte play time".to_string(),
                actual: format!("{}-byte frame", frame.len()),
            })?;
        stream.send(SCHEDULE_ACK).await?;
        stream.shutdown().await?;

        // The schedule is in the coordinator's clock frame; subtracting our
        // offset lands it in ours.
        let local_play_time = play_time.offset_by(-estimate.offset_micros);
        let now = MicroTimestamp::now();
        let sleep_micros = local_play_time.diff_micros(&now);
        if sleep_micros <= 0 {
            return Err(EnsembleError::ScheduleInPast {
                lateness: Duration::from_micros(sleep_micros.unsigned_abs()),
            });
        }

        info!(sleep_micros, "waiting for play instant");
        tokio::time::sleep(Duration::from_micros(sleep_micros.unsigned_abs())).await;

        sink.start().await?;
        while sink.is_playing() {
            tokio::time::sleep(PLAYING_POLL_INTERVAL).await;
        }
        info!("playback finished");
        Ok(())
    }
}
