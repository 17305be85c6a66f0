/// Flat-file dataset storage
///
/// The dataset is a single UTF-8 JSON array of raw profile records. Readers load
/// it fresh on every call; there is no cache. Ingestion replaces it wholesale.
use crate::{
    error::{DirectoryError, DirectoryResult},
    metrics,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Dataset file handle
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temporary file a snapshot is staged in
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "dataset".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read and parse the full dataset
    ///
    /// Individual records are not checked here; malformed entries are the query
    /// engine's concern. A missing file or anything but a JSON array is an error.
    pub async fn load(&self) -> DirectoryResult<Vec<Value>> {
        let result = self.read_records().await;
        metrics::record_dataset_load(result.is_ok());
        result
    }

    async fn read_records(&self) -> DirectoryResult<Vec<Value>> {
        let contents = fs::read_to_string(&self.path).await.map_err(|e| {
            DirectoryError::DatasetLoad(format!(
                "Failed to read dataset {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            DirectoryError::DatasetLoad(format!(
                "Failed to parse dataset {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Replace the dataset with `records`
    ///
    /// The snapshot is written to a sibling temp file and renamed over the
    /// dataset, so concurrent readers see either the old or the new file.
    pub async fn write_snapshot(&self, records: &[Value]) -> DirectoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    DirectoryError::Internal(format!("Failed to create data directory: {}", e))
                })?;
            }
        }

        let body = serde_json::to_vec_pretty(records)?;
        let staging = self.staging_path();

        fs::write(&staging, body).await.map_err(|e| {
            DirectoryError::Internal(format!(
                "Failed to write snapshot {}: {}",
                staging.display(),
                e
            ))
        })?;
        fs::rename(&staging, &self.path).await.map_err(|e| {
            DirectoryError::Internal(format!(
                "Failed to move snapshot into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}
