//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application: loading the artifact bundle,
//! normalizing form input, running the pipeline and presenting the result.

mod bundle;
pub mod normalizer;
mod pipeline;
mod presenter;

pub use bundle::ArtifactBundle;
pub use normalizer::NormalizeError;
pub use pipeline::{InferencePipeline, PredictError};
pub use presenter::{Presentation, LOAD_FAILED, MODEL_UNAVAILABLE};
