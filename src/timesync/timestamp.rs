use std::time::{Duration, SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, ByteOrder};

/// Wall-clock timestamp with microsecond resolution
///
/// Microseconds since the Unix epoch, truncated (`floor(unix_seconds *
/// 10^6)`), carried on the wire as 8 big-endian bytes. This is the encoding
/// for both probe responses and the play schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MicroTimestamp(u64);

impl MicroTimestamp {
    /// Encoded size in bytes
    pub const WIRE_SIZE: usize = 8;

    /// Capture the current wall-clock time
    #[must_use]
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "micros since 1970 fit in u64 for the next 500k years"
        )]
        Self(since_epoch.as_micros() as u64)
    }

    /// Create from raw microseconds since the Unix epoch
    #[must_use]
    pub fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Raw microseconds since the Unix epoch
    #[must_use]
    pub fn as_micros(&self) -> u64 {
        self.0
    }

    /// Encode to 8 big-endian bytes
    #[must_use]
    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut buf = [0u8; Self::WIRE_SIZE];
        BigEndian::write_u64(&mut buf, self.0);
        buf
    }

    /// Decode from 8 big-endian bytes
    ///
    /// Returns `None` if the buffer is not exactly 8 bytes.
    #[must_use]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() != Self::WIRE_SIZE {
            return None;
        }
        Some(Self(BigEndian::read_u64(buf)))
    }

    /// Signed difference `self - other` in microseconds
    #[must_use]
    #[allow(clippy::cast_possible_wrap, reason = "realistic timestamps are far below i64::MAX")]
    pub fn diff_micros(&self, other: &Self) -> i64 {
        self.0 as i64 - other.0 as i64
    }

    /// Shift by a signed microsecond offset, saturating at zero
    #[must_use]
    pub fn offset_by(&self, offset_micros: i64) -> Self {
        Self(self.0.saturating_add_signed(offset_micros))
    }

    /// Timestamp a duration into the future from `self`
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "sync margins are seconds, not half a million years"
    )]
    pub fn after(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_micros() as u64))
    }
}
