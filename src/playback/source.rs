use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use crate::error::{EnsembleError, Result};
use crate::types::Track;

/// Enumerates and reads the tracks a coordinator distributes
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Load every track into memory
    ///
    /// # Errors
    ///
    /// Returns `NoTracks` when there is nothing to distribute, or
    /// `TrackSource` when the underlying source cannot be read
    async fn load(&self) -> Result<Vec<Track>>;
}

/// Track source backed by a directory of files
///
/// Every regular file matching the configured extension becomes one track,
/// in file-name order so repeated runs assign stably.
#[derive(Debug, Clone)]
pub struct DirTrackSource {
    root: PathBuf,
    extension: String,
}

impl DirTrackSource {
    /// Create a source reading `*.{extension}` files under `root`
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }
}

#[async_trait]
impl TrackSource for DirTrackSource {
    async fn load(&self) -> Result<Vec<Track>> {
        info!(path = %self.root.display(), extension = %self.extension, "loading tracks");

        let mut entries =
            tokio::fs::read_dir(&self.root)
                .await
                .map_err(|e| EnsembleError::TrackSource {
                    message: format!("cannot read {}", self.root.display()),
                    source: Some(Box::new(e)),
                })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            EnsembleError::TrackSource {
                message: format!("cannot enumerate {}", self.root.display()),
                source: Some(Box::new(e)),
            }
        })? {
            let path = entry.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension.as_str()))
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut tracks = Vec::with_capacity(paths.len());
        for path in paths {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|e| EnsembleError::TrackSource {
                    message: format!("cannot read {}", path.display()),
                    source: Some(Box::new(e)),
                })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(%name, bytes = data.len(), "loaded track");
            tracks.push(Track::new(name, data));
        }

        if tracks.is_empty() {
            return Err(EnsembleError::NoTracks {
                path: self.root.display().to_string(),
            });
        }
        Ok(tracks)
    }
}

/// In-memory track source, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct StaticTrackSource {
    tracks: Vec<Track>,
}

impl StaticTrackSource {
    /// Create from pre-built tracks
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Create from `(name, bytes)` pairs
    pub fn from_pairs<N, B>(pairs: impl IntoIterator<Item = (N, B)>) -> Self
    where
        N: Into<String>,
        B: Into<Bytes>,
    {
        Self {
            tracks: pairs
                .into_iter()
                .map(|(name, data)| Track::new(name, data))
                .collect(),
        }
    }
}

#[async_trait]
impl TrackSource for StaticTrackSource {
    async fn load(&self) -> Result<Vec<Track>> {
        if self.tracks.is_empty() {
            return Err(EnsembleError::NoTracks {
                path: "<static>".to_string(),
            });
        }
        Ok(self.tracks.clone())
    }
}
