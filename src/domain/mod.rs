//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. The closed vocabularies,
//! the canonical column set and the category table live here so that every
//! other layer agrees on them by construction.

mod artifact;
mod category;
mod record;
mod stage;
mod vocabulary;

pub use artifact::{ArtifactKind, MissingArtifactError, MissingReason};
pub use category::{PredictionResult, SeverityTier, WeightCategory};
pub use record::{Column, FeatureRecord, FeatureValue, NormalizedRow, RawRecord};
pub use stage::{InferenceError, Stage, StageFault};
pub use vocabulary::{Answer, Frequency, Gender, Transport, UnmappedValueError, Vocabulary};
