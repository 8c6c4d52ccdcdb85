use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::timestamp::MicroTimestamp;
use super::PROBE_SENTINEL;
use crate::error::{EnsembleError, Result};

/// The four timestamps captured around one probe exchange
///
/// `t0`/`t3` come from the prober's clock, `t1`/`t2` from the responder's.
/// The responder reports a single instant for both receive and send, so
/// `t1 == t2` on the wire.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSample {
    /// Prober's send time
    pub t0: MicroTimestamp,
    /// Responder's receive time
    pub t1: MicroTimestamp,
    /// Responder's send time
    pub t2: MicroTimestamp,
    /// Prober's receive time
    pub t3: MicroTimestamp,
}

impl ProbeSample {
    /// Clock offset in microseconds: `((t1 - t0) + (t2 - t3)) / 2`
    ///
    /// Adding the offset to the prober's clock approximates the responder's.
    /// Unbiased only when the path delay is symmetric, which is why samples
    /// are ranked by round-trip delay.
    #[must_use]
    pub fn offset_micros(&self) -> i64 {
        (self.t1.diff_micros(&self.t0) + self.t2.diff_micros(&self.t3)) / 2
    }

    /// Round-trip delay in microseconds: `(t3 - t0) - (t2 - t1)`
    #[must_use]
    pub fn round_trip_micros(&self) -> i64 {
        self.t3.diff_micros(&self.t0) - self.t2.diff_micros(&self.t1)
    }
}

/// Best offset estimate from a sync round
#[derive(Debug, Clone, Copy)]
pub struct SyncEstimate {
    /// Estimated clock offset (responder minus prober), microseconds
    pub offset_micros: i64,
    /// Round-trip delay of the chosen sample, microseconds
    pub ping_micros: i64,
}

impl SyncEstimate {
    /// Pick the estimate from the sample with the smallest round-trip delay
    ///
    /// Minimum delay, not minimum offset magnitude: low delay means little
    /// queuing and jitter, which is the condition under which the offset
    /// formula's symmetry assumption holds.
    #[must_use]
    pub fn from_samples(samples: &[ProbeSample]) -> Option<Self> {
        samples
            .iter()
            .min_by_key(|s| s.round_trip_micros())
            .map(|best| Self {
                offset_micros: best.offset_micros(),
                ping_micros: best.round_trip_micros(),
            })
    }
}

/// Issues probe rounds against a [`SyncResponder`](super::SyncResponder)
///
/// Every attempt runs on its own freshly bound socket. The probe wire
/// format carries no sequence number, so a reply cannot be matched to its
/// probe by content; a straggler reply to a timed-out attempt would
/// otherwise sit in the receive queue and be taken as the next attempt's
/// answer, skewing the offset by roughly one timeout while showing a tiny
/// round trip — exactly the sample the min-ping policy would then pick. A
/// fresh port per attempt makes such stragglers undeliverable instead.
#[derive(Debug)]
pub struct SyncProber {
    target: SocketAddr,
    attempts: u32,
    timeout: Duration,
}

impl SyncProber {
    /// Create a prober aimed at the given responder
    #[must_use]
    pub fn new(target: SocketAddr, attempts: u32, probe_timeout: Duration) -> Self {
        Self {
            target,
            attempts,
            timeout: probe_timeout,
        }
    }

    /// Run one sync round: N probes, best sample wins
    ///
    /// Timed-out probes are dropped from the sample set, together with any
    /// reply of theirs that turns up later.
    ///
    /// # Errors
    ///
    /// Returns `SyncFailed` if every probe in the round times out, or
    /// `Network` on socket failure
    pub async fn sync_round(&self) -> Result<SyncEstimate> {
        let mut samples = Vec::with_capacity(self.attempts as usize);

        for attempt in 0..self.attempts {
            let socket = self.bind_probe_socket().await?;

            let t0 = MicroTimestamp::now();
            socket.send_to(&[PROBE_SENTINEL], self.target).await?;

            let responder_time = match timeout(self.timeout, self.await_reply(&socket)).await {
                Ok(reply) => reply?,
                // The socket drops here, so a late reply to this probe has
                // nowhere to land.
                Err(_) => {
                    debug!(attempt, "probe timed out");
                    continue;
                }
            };
            let t3 = MicroTimestamp::now();

            let sample = ProbeSample {
                t0,
                t1: responder_time,
                t2: responder_time,
                t3,
            };
            trace!(
                attempt,
                offset = sample.offset_micros(),
                ping = sample.round_trip_micros(),
                "probe sample"
            );
            samples.push(sample);
        }

        SyncEstimate::from_samples(&samples).ok_or(EnsembleError::SyncFailed {
            attempts: self.attempts,
        })
    }

    /// Run several full rounds and keep the one with the lowest ping
    ///
    /// One unlucky round (a transient queue somewhere) should not decide
    /// the offset used for scheduling.
    ///
    /// # Errors
    ///
    /// Fails as soon as any round fails; a participant must not schedule
    /// playback off a partial sync
    pub async fn best_estimate(&self, rounds: u32) -> Result<SyncEstimate> {
        let mut best: Option<SyncEstimate> = None;

        for round in 0..rounds.max(1) {
            let estimate = self.sync_round().await?;
            debug!(
                round,
                offset = estimate.offset_micros,
                ping = estimate.ping_micros,
                "sync round complete"
            );
            best = match best {
                Some(current) if current.ping_micros <= estimate.ping_micros => Some(current),
                _ => Some(estimate),
            };
        }

        best.ok_or(EnsembleError::SyncFailed {
            attempts: self.attempts,
        })
    }

    /// Bind the one-shot socket a single probe attempt runs on
    async fn bind_probe_socket(&self) -> Result<UdpSocket> {
        let bind_addr: SocketAddr = if self.target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        Ok(UdpSocket::bind(bind_addr).await?)
    }

    /// Wait for an 8-byte reply from the responder's host, skipping
    /// datagrams from anyone else.
    async fn await_reply(&self, socket: &UdpSocket) -> Result<MicroTimestamp> {
        let mut buf = [0u8; 16];
        loop {
            let (len, sender) = socket.recv_from(&mut buf).await?;
            if sender.ip() != self.target.ip() {
                trace!(%sender, "ignoring datagram from unexpected host");
                continue;
            }
            if let Some(ts) = MicroTimestamp::decode(&buf[..len]) {
                return Ok(ts);
            }
            trace!(%sender, len, "ignoring malformed probe reply");
        }
    }
}
