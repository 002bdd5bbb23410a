use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;

use idex_core::constants::DEFAULT_RESULT_BASENAME;
use idex_core::ExtractionResult;

use crate::traits::{ResultStore, StorageError, StorageResult};

/// Writes each result as pretty-printed JSON to
/// `{output_dir}/{stem}_{YYYYMMDD_HHMMSS}.json`.
///
/// `stem` is the original filename without its extension. Two results for the
/// same filename within one second share a path; the later one wins.
#[derive(Debug, Clone)]
pub struct LocalResultStore {
    output_dir: PathBuf,
}

impl LocalResultStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn path_for(&self, original_filename: Option<&str>) -> PathBuf {
        let stem = original_filename
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(DEFAULT_RESULT_BASENAME);
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        self.output_dir.join(format!("{}_{}.json", stem, timestamp))
    }
}

#[async_trait]
impl ResultStore for LocalResultStore {
    async fn save(&self, result: &ExtractionResult) -> StorageResult<PathBuf> {
        fs::create_dir_all(&self.output_dir).await?;

        let path = self.path_for(result.metadata().original_filename.as_deref());
        let body = serde_json::to_vec_pretty(result)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        fs::write(&path, body).await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Saved extraction result");
        Ok(path)
    }
}
