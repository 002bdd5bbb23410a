//! Data models for the application
//!
//! Document types, the typed field records recovered from model output, and the
//! per-document and per-batch result envelopes.

mod batch;
mod document;
mod extraction;

pub use batch::*;
pub use document::*;
pub use extraction::*;
