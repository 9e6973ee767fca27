// src/writers.rs

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ProbeError;

/// Destination for emitted candidate containers. The pipeline only produces
/// bytes; where they land is the sink's concern.
#[async_trait]
pub trait ContainerSink: Send + Sync {
    /// Writes one named container. The handle is released on every exit
    /// path; a failure is fatal to this single write only.
    async fn write(&self, file_name: &str, data: Vec<u8>) -> Result<PathBuf, ProbeError>;
}

/// Sink backed by a local directory, created on first write.
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContainerSink for DirectorySink {
    async fn write(&self, file_name: &str, data: Vec<u8>) -> Result<PathBuf, ProbeError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ProbeError::IoFailure {
                context: format!("creating output directory {}", self.root.display()),
                source: e,
            })?;

        let path = self.root.join(file_name);
        let byte_count = data.len();
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ProbeError::from_io(e, "writing container to", &path))?;

        info!(path = %path.display(), bytes = byte_count, "Aday konteyner diske yazıldı.");
        Ok(path)
    }
}
