//! # Obesilens
//!
//! Obesity-category prediction from eating-habit and physical-condition
//! survey answers, using a trained scikit-learn pipeline exported to JSON.
//!
//! This crate provides:
//! - Loading of the five-artifact bundle, checked as one unit
//! - Normalization of form answers into the trained vocabulary
//! - The fixed Transform, Scale, Classify, Decode inference chain
//! - Terminal UI mirroring the survey form
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (vocabularies, records, categories, errors)
//! - `ports`: Trait definitions for fitted stages and artifact storage
//! - `adapters`: Concrete implementations (scikit-learn JSON, filesystem)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{ArtifactBundle, InferencePipeline, Presentation};
pub use domain::{PredictionResult, RawRecord, SeverityTier, WeightCategory};

/// Result type for Obesilens operations
pub type Result<T> = std::result::Result<T, ObesilensError>;

/// Main error type for Obesilens
#[derive(Debug, thiserror::Error)]
pub enum ObesilensError {
    #[error(transparent)]
    MissingArtifact(#[from] domain::MissingArtifactError),

    #[error(transparent)]
    Unmapped(#[from] domain::UnmappedValueError),

    #[error("Invalid input: {0}")]
    Normalize(#[from] application::NormalizeError),

    #[error(transparent)]
    Inference(#[from] domain::InferenceError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] adapters::ManifestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<application::PredictError> for ObesilensError {
    fn from(e: application::PredictError) -> Self {
        match e {
            application::PredictError::Normalize(application::NormalizeError::Unmapped(e)) => {
                Self::Unmapped(e)
            }
            application::PredictError::Normalize(e) => Self::Normalize(e),
            application::PredictError::Inference(e) => Self::Inference(e),
        }
    }
}

/// Load the bundle from a directory and predict one record.
///
/// # Errors
/// Returns error if the bundle cannot be loaded or the record is rejected.
pub fn predict_once(
    artifact_dir: &std::path::Path,
    require_manifest: bool,
    raw: &RawRecord,
) -> Result<PredictionResult> {
    let store = adapters::DirectoryStore::new(artifact_dir);
    let bundle = ArtifactBundle::load(&store, require_manifest)?;
    let pipeline = InferencePipeline::new(std::sync::Arc::new(bundle));
    Ok(pipeline.predict_raw(raw)?)
}
