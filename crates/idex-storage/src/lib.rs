//! idex Storage Library
//!
//! Local filesystem concerns of the extraction service: staging uploaded images
//! under the upload folder, and persisting successful extraction results as JSON
//! under the output folder.

pub mod results;
pub mod staging;
pub mod traits;

pub use results::LocalResultStore;
pub use staging::{ensure_directories, StagedUpload, UploadStaging};
pub use traits::{ResultStore, StorageError, StorageResult};
