use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::{debug, info, trace, warn};

use super::timestamp::MicroTimestamp;
use super::PROBE_SENTINEL;
use crate::error::Result;

/// Connectionless clock-sync responder
///
/// Answers every sentinel probe datagram with the current wall-clock time
/// as 8 big-endian bytes. Holds no per-client state; runs until the process
/// exits.
#[derive(Debug)]
pub struct SyncResponder {
    socket: UdpSocket,
}

impl SyncResponder {
    /// Bind the responder's UDP endpoint
    ///
    /// # Errors
    ///
    /// Returns `Network` if the bind fails
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self { socket })
    }

    /// The bound local address (useful when binding port 0)
    ///
    /// # Errors
    ///
    /// Returns `Network` if the socket has no local address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Serve probes until the task is dropped
    ///
    /// A malformed datagram or a failed send is logged and skipped; one bad
    /// probe must not take the responder down. The loop itself never
    /// returns `Ok`.
    ///
    /// # Errors
    ///
    /// Currently never returns; the signature leaves room for a fatal
    /// socket error to surface
    pub async fn run(self) -> Result<()> {
        info!(addr = %self.socket.local_addr()?, "clock-sync responder running");
        // 2 bytes so an oversized probe is distinguishable from the sentinel
        let mut buf = [0u8; 2];

        loop {
            let (len, sender) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "probe receive failed");
                    continue;
                }
            };

            if len != 1 || buf[0] != PROBE_SENTINEL {
                trace!(%sender, len, "ignoring non-probe datagram");
                continue;
            }

            let now = MicroTimestamp::now();
            if let Err(e) = self.socket.send_to(&now.encode(), sender).await {
                warn!(%sender, error = %e, "probe reply failed");
                continue;
            }
            debug!(%sender, micros = now.as_micros(), "answered probe");
        }
    }
}
