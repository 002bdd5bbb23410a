//! Shared constants.

/// Versioned prefix for all extraction routes.
pub const API_V1_PREFIX: &str = "/api/v1";

/// Hard ceiling on documents per batch request.
pub const MAX_BATCH_SIZE: usize = 50;

/// Number of characters of unparseable model output kept in a parse error.
pub const PARSE_PREVIEW_CHARS: usize = 500;

/// Model identifier reported when no model name is configured.
pub const DEFAULT_MODEL_VERSION: &str = "moondream-station";

/// Basename used for persisted results whose upload had no filename.
pub const DEFAULT_RESULT_BASENAME: &str = "extraction";
