use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::types::Track;

/// The coordinator's set of not-yet-assigned tracks
///
/// Tracks leave the pool exactly once, in stable front-to-back order, so
/// the takes across a session always partition the original set. The
/// optional shuffle reorders the pool once, before any take, and changes
/// which tracks go where but never how many times each is handed out.
#[derive(Debug)]
pub struct TrackPool {
    unassigned: Vec<Track>,
}

impl TrackPool {
    /// Create a pool owning the given tracks
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { unassigned: tracks }
    }

    /// Shuffle the pool once; `seed` pins the permutation for tests
    pub fn shuffle(&mut self, seed: Option<u64>) {
        match seed {
            Some(seed) => self.unassigned.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => self.unassigned.shuffle(&mut rand::thread_rng()),
        }
        debug!(tracks = self.unassigned.len(), "track order shuffled");
    }

    /// Take up to `count` tracks off the front of the pool
    ///
    /// Serving fewer than requested (down to zero) is the caller's problem
    /// to surface; the pool never blocks and never double-assigns.
    pub fn take(&mut self, count: u32) -> Vec<Track> {
        let n = (count as usize).min(self.unassigned.len());
        self.unassigned.drain(..n).collect()
    }

    /// Number of tracks still unassigned
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.unassigned.len()
    }

    /// Whether every track has been assigned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unassigned.is_empty()
    }
}
