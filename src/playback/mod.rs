//! External collaborators: track sources, payload combination, playback
//!
//! The coordination core treats these as opaque seams. A track source maps
//! track identities to immutable bytes, a combiner folds an assignment into
//! one deliverable blob, and a sink owns everything that happens to the
//! payload after the synchronized start fires.

mod combiner;
mod sink;
mod source;

pub use combiner::{ConcatCombiner, PayloadCombiner};
pub use sink::{NullSink, PlaybackSink};
pub use source::{DirTrackSource, StaticTrackSource, TrackSource};

#[cfg(test)]
mod tests;
