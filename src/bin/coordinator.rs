//! Coordinator binary entry point
//!
//! Distributes a directory of tracks across connecting participants, runs
//! the clock-sync responder alongside, and pushes one common play instant.
//!
//! # Usage
//!
//! ```bash
//! ensemble-coordinator --tracks-dir ./midi --sync-margin-secs 10 --randomize
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use ensemble::playback::{ConcatCombiner, DirTrackSource};
use ensemble::{Coordinator, CoordinatorConfig, SyncResponder};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Ensemble coordinator
///
/// Serves tracks to participants over TCP, answers clock-sync probes over
/// UDP, and schedules the simultaneous start.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TCP address to accept participants on
    #[arg(long, default_value = "0.0.0.0:7777", env = "ENSEMBLE_BIND")]
    bind: SocketAddr,

    /// UDP address for the clock-sync responder
    #[arg(long, default_value = "0.0.0.0:7777", env = "ENSEMBLE_SYNC_BIND")]
    sync_bind: SocketAddr,

    /// Directory holding the track files
    #[arg(long, default_value = "./tracks", env = "ENSEMBLE_TRACKS_DIR")]
    tracks_dir: std::path::PathBuf,

    /// File extension of the track files
    #[arg(long, default_value = "mid")]
    extension: String,

    /// Seconds between assignment completion and the play instant
    #[arg(long, default_value_t = 10)]
    sync_margin_secs: u64,

    /// Shuffle which tracks go to which participant
    #[arg(long)]
    randomize: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = CoordinatorConfig::builder()
        .bind_addr(args.bind)
        .sync_bind_addr(args.sync_bind)
        .sync_margin(Duration::from_secs(args.sync_margin_secs))
        .randomize(args.randomize)
        .build();

    let responder = match SyncResponder::bind(config.sync_bind_addr).await {
        Ok(responder) => responder,
        Err(e) => {
            error!(error = %e, "cannot bind clock-sync responder");
            return ExitCode::FAILURE;
        }
    };
    let responder_task = tokio::spawn(responder.run());

    let source = DirTrackSource::new(args.tracks_dir, args.extension);
    let result = match Coordinator::bind(config).await {
        Ok(coordinator) => coordinator.run(&source, &ConcatCombiner).await,
        Err(e) => Err(e),
    };
    responder_task.abort();

    match result {
        Ok(summary) => {
            info!(
                clients = summary.assignments.len(),
                play_micros = summary.play_time.as_micros(),
                "session complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
    }
}
