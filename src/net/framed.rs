use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{EnsembleError, Result};

/// Upper bound on a single frame's payload
///
/// The wire format itself has no limit; this cap keeps a misbehaving peer
/// from making us allocate 4 GiB off a forged length prefix.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// A byte stream that speaks length-prefixed frames
///
/// Generic over the underlying stream so tests can run against in-memory
/// duplex pipes; production code uses [`FramedTcpStream`].
#[derive(Debug)]
pub struct FramedStream<S> {
    stream: S,
    closed: bool,
}

/// Frame transport over a TCP connection
pub type FramedTcpStream = FramedStream<TcpStream>;

impl FramedTcpStream {
    /// Connect to a remote frame endpoint
    ///
    /// # Errors
    ///
    /// Returns `Network` if the TCP connect fails
    pub async fn connect(addr: std::net::SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// The peer's remote address
    ///
    /// # Errors
    ///
    /// Returns `Network` if the socket has no peer (already closed)
    pub fn peer_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> FramedStream<S> {
    /// Wrap an established stream
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            closed: false,
        }
    }

    /// Send one frame
    ///
    /// Writes the 4-byte big-endian length prefix followed by the payload
    /// and flushes. Taking `&mut self` serializes concurrent senders, so a
    /// frame is never interleaved with another.
    ///
    /// # Errors
    ///
    /// Returns `FrameTooLarge` if the payload exceeds [`MAX_FRAME_LEN`],
    /// or `Network` on I/O failure
    pub async fn send(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_FRAME_LEN {
            return Err(EnsembleError::FrameTooLarge {
                size: payload.len(),
                max: MAX_FRAME_LEN,
            });
        }

        #[allow(clippy::cast_possible_truncation, reason = "len checked against MAX_FRAME_LEN")]
        let len = payload.len() as u32;
        self.stream.write_all(&len.to_be_bytes()).await?;
        self.stream.write_all(payload).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Receive one frame
    ///
    /// Reads exactly 4 prefix bytes, then exactly the announced payload
    /// length, looping over partial reads. Never returns a partial frame.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionClosed` if the peer closes before the frame
    /// completes, `FrameTooLarge` for an oversized prefix, or `Network`
    /// on other I/O failure
    pub async fn recv(&mut self) -> Result<Bytes> {
        let mut prefix = [0u8; 4];
        read_exact_or_closed(&mut self.stream, &mut prefix, 4).await?;

        let len = u32::from_be_bytes(prefix) as usize;
        if len > MAX_FRAME_LEN {
            return Err(EnsembleError::FrameTooLarge {
                size: len,
                max: MAX_FRAME_LEN,
            });
        }

        let mut payload = BytesMut::zeroed(len);
        read_exact_or_closed(&mut self.stream, &mut payload, len).await?;
        Ok(payload.freeze())
    }

    /// Close the connection
    ///
    /// Idempotent; a second call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Network` if the shutdown itself fails
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.stream.shutdown().await?;
        Ok(())
    }
}

/// `read_exact` that reports a mid-frame peer close as `ConnectionClosed`
/// rather than a bare EOF, so callers can tell "peer hung up early" apart
/// from other I/O failures.
async fn read_exact_or_closed<S: AsyncRead + Unpin>(
    stream: &mut S,
    buf: &mut [u8],
    expected: usize,
) -> Result<()> {
    let mut received = 0;
    while received < expected {
        let n = stream.read(&mut buf[received..]).await?;
        if n == 0 {
            return Err(EnsembleError::ConnectionClosed { received, expected });
        }
        received += n;
    }
    Ok(())
}
