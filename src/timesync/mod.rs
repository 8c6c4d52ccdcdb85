//! Clock synchronization over UDP
//!
//! Implements an NTP-like probe exchange: a prober stamps its send and
//! receive times around a single-byte probe, the responder echoes its own
//! wall-clock time, and the prober derives its clock offset and round-trip
//! delay from the four timestamps. The responder reports one instant for
//! both its receive and send time; responder-side processing is deliberately
//! collapsed into the model and must stay that way for wire compatibility.

mod prober;
mod responder;
mod timestamp;

pub use prober::{ProbeSample, SyncEstimate, SyncProber};
pub use responder::SyncResponder;
pub use timestamp::MicroTimestamp;

/// Single-byte probe sentinel; any other datagram is ignored
pub const PROBE_SENTINEL: u8 = b'S';

#[cfg(test)]
mod tests;
