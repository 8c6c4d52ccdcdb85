//! Participant binary entry point
//!
//! Connects to a coordinator, receives a track payload, synchronizes the
//! local clock, and starts playback at the common instant. `--units N`
//! runs N independent participant units, each with its own connection and
//! its own sync round, for machines that play several tracks at once.
//!
//! # Usage
//!
//! ```bash
//! ensemble-participant --coordinator 192.168.1.10:7777 --tracks 1 --units 2
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use ensemble::playback::NullSink;
use ensemble::{Participant, ParticipantConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Ensemble participant
///
/// Plays its assigned slice of the performance in sync with every other
/// participant.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Coordinator's TCP address
    #[arg(long, default_value = "127.0.0.1:7777", env = "ENSEMBLE_COORDINATOR")]
    coordinator: SocketAddr,

    /// Coordinator's UDP clock-sync address (defaults to the TCP address)
    #[arg(long, env = "ENSEMBLE_SYNC")]
    sync: Option<SocketAddr>,

    /// Tracks to request per unit
    #[arg(long, default_value_t = 1)]
    tracks: u32,

    /// Independent participant units to run on this machine
    #[arg(long, default_value_t = 1)]
    units: u32,

    /// Seconds the null sink pretends to play for
    #[arg(long, default_value_t = 2)]
    play_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = ParticipantConfig::builder()
        .coordinator_addr(args.coordinator)
        .sync_addr(args.sync.unwrap_or(args.coordinator))
        .track_count(args.tracks)
        .build();

    // Shared-nothing fan-out: every unit owns its connection, prober and
    // sleep; only the coordinator's play_time ties them together.
    let mut units = Vec::with_capacity(args.units as usize);
    for unit in 0..args.units.max(1) {
        let config = config.clone();
        let play_duration = Duration::from_secs(args.play_secs);
        units.push(tokio::spawn(async move {
            let mut sink = NullSink::new(play_duration);
            let result = Participant::new(config).run(&mut sink).await;
            (unit, result)
        }));
    }

    let mut failed = false;
    for unit in units {
        match unit.await {
            Ok((unit, Ok(()))) => info!(unit, "unit finished"),
            Ok((unit, Err(e))) => {
                error!(unit, error = %e, "unit failed");
                failed = true;
            }
            Err(e) => {
                error!(error = %e, "unit panicked");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
