use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during an ensemble session
#[derive(Debug, Error)]
pub enum EnsembleError {
    // ===== Startup Errors =====
    /// No tracks were found at the configured source
    #[error("no tracks found in {path}")]
    NoTracks {
        /// Location that was searched
        path: String,
    },

    /// Track source could not be read
    #[error("track source error: {message}")]
    TrackSource {
        /// Description of the failure
        message: String,
        /// The underlying source of the error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Transport Errors =====
    /// Peer closed the connection before a frame completed
    #[error("connection closed mid-frame after {received} of {expected} bytes")]
    ConnectionClosed {
        /// Bytes received before the close
        received: usize,
        /// Bytes the frame header promised
        expected: usize,
    },

    /// Frame exceeds the transport's size cap
    #[error("frame of {size} bytes exceeds cap of {max}")]
    FrameTooLarge {
        /// Size of the offending frame
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// Network I/O error
    #[error("network error: {0}")]
    Network(#[from] io::Error),

    // ===== Protocol Errors =====
    /// Peer sent something other than the expected literal
    #[error("protocol violation: expected {expected:?}, got {actual:?}")]
    ProtocolViolation {
        /// The literal that was expected
        expected: String,
        /// What the peer actually sent
        actual: String,
    },

    // ===== Clock Sync Errors =====
    /// Every probe attempt in a sync round timed out
    #[error("clock sync failed: no responder reply in {attempts} attempts")]
    SyncFailed {
        /// Number of probes sent
        attempts: u32,
    },

    /// The computed play instant is not in the future
    #[error("play schedule already {lateness:?} in the past")]
    ScheduleInPast {
        /// How far behind the schedule the local clock is
        lateness: Duration,
    },

    // ===== Playback Errors =====
    /// Playback sink rejected the payload or failed to start
    #[error("playback error: {message}")]
    Playback {
        /// Description of the error
        message: String,
    },
}

impl EnsembleError {
    /// Check if this error must abort the whole session rather than one client
    ///
    /// During the sync phase a single misbehaving client breaks the
    /// simultaneity guarantee for everyone, so the coordinator treats these
    /// as session-fatal.
    #[must_use]
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoTracks { .. }
                | Self::TrackSource { .. }
                | Self::ProtocolViolation { .. }
                | Self::ScheduleInPast { .. }
        )
    }

    /// Check if this error indicates the peer went away
    #[must_use]
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::ConnectionClosed { .. } | Self::Network(_))
    }
}

/// Result type alias for ensemble operations
pub type Result<T> = std::result::Result<T, EnsembleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EnsembleError::NoTracks {
            path: "/srv/tracks".to_string(),
        };
        assert_eq!(err.to_string(), "no tracks found in /srv/tracks");
    }

    #[test]
    fn test_error_is_session_fatal() {
        let err = EnsembleError::ProtocolViolation {
            expected: "OK".to_string(),
            actual: "NO".to_string(),
        };
        assert!(err.is_session_fatal());

        let err = EnsembleError::ConnectionClosed {
            received: 3,
            expected: 8,
        };
        assert!(!err.is_session_fatal());
    }

    #[test]
    fn test_error_is_connection_lost() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err: EnsembleError = io_err.into();
        assert!(err.is_connection_lost());
        assert!(!err.is_session_fatal());
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EnsembleError>();
    }
}
