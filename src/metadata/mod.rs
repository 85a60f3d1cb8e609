use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{PlacementError, Result};
use crate::topology::MetadataSnapshot;

mod kafka;

pub use self::kafka::{snapshot_from_response, KafkaMetadataProvider};

/// Source of a point-in-time view of cluster metadata.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch(&self) -> Result<MetadataSnapshot>;
}

/// Reads a snapshot previously captured as JSON.
#[derive(Debug, Clone)]
pub struct SnapshotFileProvider {
    path: PathBuf,
}

impl SnapshotFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetadataProvider for SnapshotFileProvider {
    #[tracing::instrument]
    async fn fetch(&self) -> Result<MetadataSnapshot> {
        let raw = tokio::fs::read(&self.path).await?;
        let snapshot = serde_json::from_slice(&raw).map_err(|e| PlacementError::Snapshot {
            path: self.path.display().to_string(),
            error_msg: e.to_string(),
        })?;
        tracing::debug!("loaded snapshot");
        Ok(snapshot)
    }
}

/// Writes `snapshot` as pretty JSON, in the format [`SnapshotFileProvider`] reads.
pub async fn write_snapshot(path: impl Into<PathBuf>, snapshot: &MetadataSnapshot) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot).map_err(std::io::Error::from)?;
    tokio::fs::write(path.into(), json).await?;
    Ok(())
}
