//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and its collaborators (fitted components,
//! artifact storage).

mod artifact_store;
mod stages;

pub use artifact_store::ArtifactStore;
pub use stages::{Classifier, FeatureScaler, FeatureTransformer, LabelDecoder};
