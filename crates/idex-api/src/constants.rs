//! API constants
//!
//! Route paths are built from the versioned prefix in `idex_core::constants`.

pub use idex_core::constants::API_V1_PREFIX;

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Path of the interactive API docs
pub const DOCS_PATH: &str = "/docs";

/// Multipart field carrying the single upload
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying batch uploads (repeated)
pub const FILES_FIELD: &str = "files";

/// Multipart field naming the document type
pub const DOCUMENT_TYPE_FIELD: &str = "document_type";

/// Extra request-body allowance on top of the file payloads, for multipart framing
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
