//! Core types

mod config;
mod track;

pub use config::{
    CoordinatorConfig, CoordinatorConfigBuilder, ParticipantConfig, ParticipantConfigBuilder,
};
pub use track::{Assignment, Track};
