//! Coordinator role: assign tracks, collect readiness, schedule the start
//!
//! Drives one session through `LOADING → ACCEPTING → ALL_ASSIGNED →
//! SCHEDULING → SYNCING → DONE`. Per-client failures while accepting are
//! isolated; any failure while pushing the play schedule aborts the whole
//! session, because a start that only some clients honor is worse than no
//! start at all.

mod assignment;

pub use assignment::TrackPool;

use std::net::SocketAddr;

use futures::future::try_join_all;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::error::{EnsembleError, Result};
use crate::net::{FramedTcpStream, READY_ACK, SCHEDULE_ACK};
use crate::playback::{PayloadCombiner, TrackSource};
use crate::timesync::MicroTimestamp;
use crate::types::{Assignment, CoordinatorConfig};

/// One connected, readiness-acknowledged client awaiting its schedule
#[derive(Debug)]
struct SyncTarget {
    stream: FramedTcpStream,
    peer: SocketAddr,
    assignment: Assignment,
}

/// What a completed session looked like
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// The play instant that was distributed, in the coordinator's clock
    pub play_time: MicroTimestamp,
    /// Per-client assignments, in connection order
    pub assignments: Vec<Assignment>,
}

/// The server role of a session
#[derive(Debug)]
pub struct Coordinator {
    config: CoordinatorConfig,
    listener: TcpListener,
}

impl Coordinator {
    /// Bind the coordinator's TCP listener
    ///
    /// # Errors
    ///
    /// Returns `Network` if the bind fails
    pub async fn bind(config: CoordinatorConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        Ok(Self { config, listener })
    }

    /// The bound listener address (useful when binding port 0)
    ///
    /// # Errors
    ///
    /// Returns `Network` if the socket has no local address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run one full session and tear down
    ///
    /// # Errors
    ///
    /// Returns the startup error if the source yields no tracks, or a
    /// sync-phase error if any client breaks the scheduling handshake
    pub async fn run(
        self,
        source: &dyn TrackSource,
        combiner: &dyn PayloadCombiner,
    ) -> Result<SessionSummary> {
        // LOADING
        let tracks = source.load().await?;
        info!(tracks = tracks.len(), "tracks loaded");

        let mut pool = TrackPool::new(tracks);
        if self.config.randomize {
            pool.shuffle(self.config.shuffle_seed);
        }

        // ACCEPTING
        info!(addr = %self.local_addr()?, "accepting participants");
        let mut clients: Vec<SyncTarget> = Vec::new();
        while !pool.is_empty() {
            let (stream, peer) = self.listener.accept().await?;
            info!(%peer, remaining = pool.remaining(), "participant connected");

            match serve_client(FramedTcpStream::new(stream), peer, &mut pool, combiner).await {
                Ok(target) => clients.push(target),
                // Isolated to this client; its slice of the pool is spent
                // either way, so the accept loop keeps going.
                Err(e) => warn!(%peer, error = %e, "dropping participant"),
            }
        }
        info!(clients = clients.len(), "all tracks assigned");

        // SCHEDULING
        let play_time = MicroTimestamp::now().after(self.config.sync_margin);
        info!(
            micros = play_time.as_micros(),
            margin = ?self.config.sync_margin,
            "play schedule computed"
        );

        // SYNCING: every client gets the identical play_time, concurrently
        // so no client's handshake eats into another's margin. Any failure
        // here kills the session; simultaneity cannot be partial.
        let mut clients = try_join_all(
            clients
                .into_iter()
                .map(|target| sync_client(target, play_time)),
        )
        .await?;

        // DONE
        let mut assignments = Vec::with_capacity(clients.len());
        for target in &mut clients {
            if let Err(e) = target.stream.shutdown().await {
                debug!(peer = %target.peer, error = %e, "close failed");
            }
            assignments.push(target.assignment.clone());
        }
        let bytes_sent: usize = assignments.iter().map(|a| a.payload_len).sum();
        info!(clients = assignments.len(), bytes_sent, "session complete");

        Ok(SessionSummary {
            play_time,
            assignments,
        })
    }
}

/// Serve one accepted connection: request, payload, readiness
async fn serve_client(
    mut stream: FramedTcpStream,
    peer: SocketAddr,
    pool: &mut TrackPool,
    combiner: &dyn PayloadCombiner,
) -> Result<SyncTarget> {
    let request = stream.recv().await?;
    let count_bytes: [u8; 4] = match request[..].try_into() {
        Ok(bytes) => bytes,
        Err(_) => {
            return Err(EnsembleError::ProtocolViolation {
                expected: "4-byte track count".to_string(),
                actual: format!("{}-byte frame", request.len()),
            });
        }
    };
    let requested = u32::from_be_bytes(count_bytes);

    // Over-requesting is served with the remainder, possibly nothing.
    let taken = pool.take(requested);
    if taken.len() != requested as usize {
        warn!(%peer, requested, served = taken.len(), "request exceeded remaining tracks");
    }

    let payload = combiner.combine(&taken);
    let assignment = Assignment {
        peer,
        track_names: taken.iter().map(|t| t.name.clone()).collect(),
        payload_len: payload.len(),
    };
    stream.send(&payload).await?;
    info!(%peer, tracks = assignment.track_names.len(), bytes = payload.len(), "payload sent");

    let ready = stream.recv().await?;
    if ready[..] != *READY_ACK {
        return Err(EnsembleError::ProtocolViolation {
            expected: String::from_utf8_lossy(READY_ACK).into_owned(),
            actual: String::from_utf8_lossy(&ready).into_owned(),
        });
    }
    info!(%peer, "participant ready");

    Ok(SyncTarget {
        stream,
        peer,
        assignment,
    })
}

/// Push the play schedule to one client and require its acknowledgement
async fn sync_client(mut target: SyncTarget, play_time: MicroTimestamp) -> Result<SyncTarget> {
    debug!(peer = %target.peer, "sending play schedule");
    target.stream.send(&play_time.encode()).await?;

    let ack = target.stream.recv().await?;
    if ack[..] != *SCHEDULE_ACK {
        return Err(EnsembleError::ProtocolViolation {
            expected: String::from_utf8_lossy(SCHEDULE_ACK).into_owned(),
            actual: String::from_utf8_lossy(&ack).into_owned(),
        });
    }
    info!(peer = %target.peer, "schedule acknowledged");
    Ok(target)
}

#[cfg(test)]
mod tests;
