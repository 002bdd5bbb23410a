//! idex Services Layer
//!
//! Business logic of the extraction service: the single-document pipeline
//! ([`DocumentExtractor`]) and the batch orchestrator ([`BatchOrchestrator`]) that
//! fans documents out over it. Thin HTTP and CLI handling stays in the binaries.

pub mod batch;
pub mod extractor;

pub use batch::{BatchItem, BatchMode, BatchOrchestrator};
pub use extractor::DocumentExtractor;
