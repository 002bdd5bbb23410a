//! Upload staging
//!
//! Uploaded images are written to the upload folder under a random name so the
//! extraction pipeline can read them back by path. Staged files are removed
//! after processing only when the service is configured to do so.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use idex_core::Config;

use crate::traits::{StorageError, StorageResult};

/// An upload written to the staging folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub path: PathBuf,
    pub original_filename: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct UploadStaging {
    upload_dir: PathBuf,
    allowed_extensions: Vec<String>,
    max_file_size: usize,
    delete_after: bool,
}

impl UploadStaging {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        allowed_extensions: Vec<String>,
        max_file_size: usize,
        delete_after: bool,
    ) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            allowed_extensions,
            max_file_size,
            delete_after,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.extraction.upload_folder,
            config.extraction.allowed_extensions.clone(),
            config.extraction.max_file_size_bytes,
            config.extraction.delete_uploaded_files,
        )
    }

    /// Lowercased extension of `filename` if it is allowed.
    pub fn check_extension(&self, filename: &str) -> StorageResult<String> {
        let extension = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        };

        if extension.is_empty() || !self.allowed_extensions.contains(&extension) {
            return Err(StorageError::UnsupportedFileType {
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    pub fn check_size(&self, size: usize) -> StorageResult<()> {
        if size > self.max_file_size {
            return Err(StorageError::FileTooLarge {
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate an upload and write it to `{upload_dir}/{uuid}.{ext}`.
    pub async fn stage(&self, filename: Option<&str>, data: &[u8]) -> StorageResult<StagedUpload> {
        let filename = filename
            .filter(|name| !name.trim().is_empty())
            .ok_or(StorageError::MissingFilename)?;
        let extension = self.check_extension(filename)?;
        self.check_size(data.len())?;

        fs::create_dir_all(&self.upload_dir).await?;
        let path = self
            .upload_dir
            .join(format!("{}.{}", Uuid::new_v4(), extension));

        if let Err(e) = fs::write(&path, data).await {
            let _ = fs::remove_file(&path).await;
            return Err(StorageError::WriteFailed(format!(
                "{}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!(
            filename = %filename,
            path = %path.display(),
            size = data.len(),
            "Staged upload"
        );

        Ok(StagedUpload {
            path,
            original_filename: filename.to_string(),
            size: data.len() as u64,
        })
    }

    /// Remove a staged file when uploads are configured to be deleted.
    pub async fn cleanup(&self, staged: &StagedUpload) {
        if !self.delete_after {
            return;
        }

        match fs::remove_file(&staged.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %staged.path.display(),
                    error = %e,
                    "Failed to delete staged upload"
                );
            }
        }
    }

    pub async fn cleanup_all(&self, staged: &[StagedUpload]) {
        for upload in staged {
            self.cleanup(upload).await;
        }
    }
}

/// Create the given directories if they do not exist yet.
pub async fn ensure_directories(dirs: &[&Path]) -> StorageResult<()> {
    for dir in dirs {
        fs::create_dir_all(dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staging(dir: &Path, delete_after: bool) -> UploadStaging {
        UploadStaging::new(
            dir,
            vec!["jpg".into(), "jpeg".into(), "png".into(), "pdf".into()],
            16,
            delete_after,
        )
    }

    #[tokio::test]
    async fn test_stage_writes_uuid_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = staging(dir.path(), false);

        let staged = staging.stage(Some("Card.PNG"), b"png-bytes").await.unwrap();

        assert_eq!(staged.original_filename, "Card.PNG");
        assert_eq!(staged.size, 9);
        assert_eq!(staged.path.extension().and_then(|e| e.to_str()), Some("png"));
        let stem = staged.path.file_stem().unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(stem).is_ok());
        assert_eq!(std::fs::read(&staged.path).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_stage_rejects_bad_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let staging = staging(dir.path(), false);

        assert!(matches!(
            staging.stage(None, b"x").await,
            Err(StorageError::MissingFilename)
        ));
        assert!(matches!(
            staging.stage(Some("notes.txt"), b"x").await,
            Err(StorageError::UnsupportedFileType { .. })
        ));
        assert!(matches!(
            staging.stage(Some("noextension"), b"x").await,
            Err(StorageError::UnsupportedFileType { .. })
        ));
        assert!(matches!(
            staging.stage(Some("big.jpg"), &[0u8; 17]).await,
            Err(StorageError::FileTooLarge { max: 16 })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_respects_delete_flag() {
        let dir = tempfile::tempdir().unwrap();

        let keep = staging(dir.path(), false);
        let kept = keep.stage(Some("a.jpg"), b"a").await.unwrap();
        keep.cleanup(&kept).await;
        assert!(kept.path.exists());

        let delete = staging(dir.path(), true);
        let removed = delete.stage(Some("b.jpg"), b"b").await.unwrap();
        delete.cleanup(&removed).await;
        assert!(!removed.path.exists());
        // Second cleanup of a missing file is silent
        delete.cleanup(&removed).await;
    }

    #[tokio::test]
    async fn test_ensure_directories_creates_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("data/uploads");
        let outputs = dir.path().join("data/outputs");

        ensure_directories(&[uploads.as_path(), outputs.as_path()]).await.unwrap();

        assert!(uploads.is_dir());
        assert!(outputs.is_dir());
    }
}
