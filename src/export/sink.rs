//! Artifact delivery
//!
//! Encoders only produce bytes; an [`ArtifactSink`] decides where they go.
//! [`DirectorySink`] saves files, [`MemorySink`] keeps them for inspection.

use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{ExportError, Result};

use super::Artifact;

/// Terminal "save this artifact" step of an export
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Deliver one artifact
    ///
    /// # Arguments
    /// * `artifact` - Encoded bytes plus target filename
    ///
    /// # Returns
    /// * `Result<()>` - Error when delivery failed; nothing partial remains
    async fn deliver(&self, artifact: &Artifact) -> Result<()>;
}

/// Saves artifacts as files in a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of an artifact in this directory
    pub fn path_for(&self, artifact: &Artifact) -> PathBuf {
        self.dir.join(&artifact.filename)
    }

    fn delivery_error(artifact: &Artifact, err: impl std::fmt::Display) -> ExportError {
        ExportError::DeliveryFailed {
            filename: artifact.filename.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, artifact: &Artifact) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(Self::delivery_error(
                artifact,
                format!("Directory does not exist: {}", self.dir.display()),
            )
            .into());
        }

        let mut components = Path::new(&artifact.filename).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name {
            return Err(Self::delivery_error(
                artifact,
                "Filename must not contain path separators",
            )
            .into());
        }

        // Write beside the target, then rename, so a failed write never
        // leaves a truncated artifact under the final name.
        let target = self.path_for(artifact);
        let partial = self.dir.join(format!("{}.part", artifact.filename));

        if let Err(e) = tokio::fs::write(&partial, &artifact.bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(Self::delivery_error(artifact, e).into());
        }
        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            warn!("Removing partial artifact {}", partial.display());
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(Self::delivery_error(artifact, e).into());
        }

        debug!(
            "Saved {} ({} bytes)",
            target.display(),
            artifact.bytes.len()
        );
        Ok(())
    }
}

/// Keeps delivered artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<Artifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts delivered so far, oldest first
    pub fn delivered(&self) -> Vec<Artifact> {
        self.delivered
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn deliver(&self, artifact: &Artifact) -> Result<()> {
        let mut guard = self
            .delivered
            .lock()
            .map_err(|e| ExportError::DeliveryFailed {
                filename: artifact.filename.clone(),
                message: e.to_string(),
            })?;
        guard.push(artifact.clone());
        Ok(())
    }
}
