//! # ensemble
//!
//! Coordinate independent playback clients so they all start at the same
//! real-world instant, despite unsynchronized clocks and jittery networks.
//!
//! A coordinator hands each connecting participant a disjoint slice of the
//! performance, collects readiness, then broadcasts one absolute play
//! instant. Each participant estimates its clock offset against the
//! coordinator's UDP responder and converts that instant into a local
//! sleep before starting playback.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ensemble::{Coordinator, CoordinatorConfig, SyncResponder};
//! use ensemble::playback::{ConcatCombiner, DirTrackSource};
//!
//! # async fn example() -> Result<(), ensemble::EnsembleError> {
//! let config = CoordinatorConfig::default();
//!
//! // The clock-sync responder runs alongside the coordinator.
//! let responder = SyncResponder::bind(config.sync_bind_addr).await?;
//! tokio::spawn(responder.run());
//!
//! let coordinator = Coordinator::bind(config).await?;
//! let source = DirTrackSource::new("./tracks", "mid");
//! let summary = coordinator.run(&source, &ConcatCombiner).await?;
//! println!("started {} clients", summary.assignments.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Roles**: [`Coordinator`] and [`Participant`] drive a full session
//! - **Protocol**: [`net`] frame transport and [`timesync`] clock sync
//! - **Seams**: [`playback`] traits for track sources and audio output

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Core types
pub mod types;

pub mod coordinator;
pub mod net;
pub mod participant;
pub mod playback;
pub mod timesync;

// Re-exports
pub use coordinator::{Coordinator, SessionSummary, TrackPool};
pub use error::EnsembleError;
pub use net::FramedTcpStream;
pub use participant::Participant;
pub use timesync::{MicroTimestamp, SyncEstimate, SyncProber, SyncResponder};
pub use types::{Assignment, CoordinatorConfig, ParticipantConfig, Track};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::playback::{ConcatCombiner, DirTrackSource, NullSink, PlaybackSink, TrackSource};
    pub use crate::{
        Coordinator, CoordinatorConfig, EnsembleError, MicroTimestamp, Participant,
        ParticipantConfig, SyncProber, SyncResponder, Track,
    };
}
