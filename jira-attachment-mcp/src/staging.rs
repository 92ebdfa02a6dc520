//! Local staging directory for attachment bytes
//!
//! Every file moving between JIRA and the local machine passes through a
//! single flat directory (`./tmp` by default). Files are keyed by their bare
//! filename; there is no manifest and no per-file metadata.

use crate::error::{JiraMcpError, JiraMcpResult};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Flat directory holding downloaded and to-be-uploaded files
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the staging area lives in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the staging directory if it does not exist yet
    pub async fn ensure(&self) -> JiraMcpResult<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            JiraMcpError::staging(format!(
                "Failed to create staging directory '{}': {}",
                self.root.display(),
                e
            ))
        })
    }

    /// Path a file with the given name is staged at.
    ///
    /// Only bare filenames are accepted so that nothing is ever written
    /// outside the staging directory.
    pub fn path_for(&self, filename: &str) -> JiraMcpResult<PathBuf> {
        if filename.trim().is_empty() {
            return Err(JiraMcpError::invalid_param(
                "filename",
                "Filename cannot be empty",
            ));
        }

        // `components()` ignores a trailing separator, so check for one first
        let has_separator = filename.contains(['/', '\\']);
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !has_separator => Ok(self.root.join(filename)),
            _ => Err(JiraMcpError::invalid_param(
                "filename",
                format!(
                    "'{}' is not a plain filename; paths and '..' are not allowed",
                    filename
                ),
            )),
        }
    }

    /// Write bytes under `filename`, replacing any existing file
    pub async fn write(&self, filename: &str, bytes: &[u8]) -> JiraMcpResult<PathBuf> {
        let path = self.path_for(filename)?;
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            JiraMcpError::staging(format!("Failed to write '{}': {}", path.display(), e))
        })?;
        debug!("Staged {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Read a staged file, failing with `LocalFileMissing` if it is absent
    pub async fn read(&self, filename: &str) -> JiraMcpResult<Vec<u8>> {
        let path = self.path_for(filename)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(JiraMcpError::local_file_missing(path));
        }

        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(JiraMcpError::local_file_missing(path));
        }

        tokio::fs::read(&path).await.map_err(|e| {
            JiraMcpError::staging(format!("Failed to read '{}': {}", path.display(), e))
        })
    }

    /// Names of the regular files in the staging directory, sorted.
    ///
    /// Returns `None` when the directory does not exist.
    pub async fn list_files(&self) -> JiraMcpResult<Option<Vec<String>>> {
        if !tokio::fs::try_exists(&self.root).await.unwrap_or(false) {
            return Ok(None);
        }

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();

        Ok(Some(files))
    }
}
