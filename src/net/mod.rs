//! Length-prefixed frame transport
//!
//! Every control message between coordinator and participant travels as a
//! frame: a 4-byte big-endian length followed by that many payload bytes.

mod framed;

pub use framed::{FramedStream, FramedTcpStream, MAX_FRAME_LEN};

/// Readiness acknowledgement a participant sends after loading its payload
pub const READY_ACK: &[u8] = b"READY";

/// Acknowledgement a participant sends after receiving the play schedule
pub const SCHEDULE_ACK: &[u8] = b"OK";
