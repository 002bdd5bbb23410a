//! Vision-language model access.
//!
//! [`VisionModel`] is the capability the extraction pipeline depends on: answer a
//! question about an image. [`MoondreamClient`] implements it against a Moondream
//! Station HTTP endpoint.

mod media_type;
mod moondream;
mod model;

#[cfg(any(test, feature = "test-utils"))]
mod scripted;

pub use media_type::detect_media_type;
pub use model::{VisionError, VisionModel};
pub use moondream::MoondreamClient;

#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedVisionModel;
