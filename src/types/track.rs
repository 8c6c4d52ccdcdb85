use std::net::SocketAddr;

use bytes::Bytes;

/// One playable unit of the performance
///
/// Immutable once loaded. Owned by the coordinator's track pool until
/// assigned; a track is never assigned twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Source-assigned name, unique within a session
    pub name: String,
    /// Raw payload bytes
    pub data: Bytes,
}

impl Track {
    /// Create a track from a name and raw bytes
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Payload size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Record of what one connected client received
///
/// Created when the client's request is served; immutable thereafter.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// The client's remote address
    pub peer: SocketAddr,
    /// Names of the tracks delivered, in delivery order
    pub track_names: Vec<String>,
    /// Total combined payload size in bytes
    pub payload_len: usize,
}
