//! Artifact identities and load-failure types.

use std::fmt;

/// The five durable artifacts that make up one trained bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Transformer,
    Scaler,
    Classifier,
    LabelEncoder,
    FeatureColumns,
    /// Optional digest list; never part of [`ArtifactKind::ALL`].
    Manifest,
}

impl ArtifactKind {
    /// Load order, also the order the bundle fingerprint hashes in.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Transformer,
        ArtifactKind::Scaler,
        ArtifactKind::Classifier,
        ArtifactKind::LabelEncoder,
        ArtifactKind::FeatureColumns,
    ];

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Transformer => "transformer.json",
            Self::Scaler => "scaler.json",
            Self::Classifier => "model.json",
            Self::LabelEncoder => "encoder.json",
            Self::FeatureColumns => "feature_columns.json",
            Self::Manifest => "manifest.json",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transformer => "feature transformer",
            Self::Scaler => "feature scaler",
            Self::Classifier => "classifier",
            Self::LabelEncoder => "label encoder",
            Self::FeatureColumns => "feature columns",
            Self::Manifest => "bundle manifest",
        };
        f.write_str(name)
    }
}

/// Why an artifact could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    /// No file at the expected location
    NotFound,
    /// Present but could not be read
    Unreadable(String),
    /// Present but does not deserialize, or fails its digest
    Corrupt(String),
    /// Deserializes but does not fit the rest of the bundle
    Incompatible(String),
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Unreadable(e) => write!(f, "unreadable: {e}"),
            Self::Corrupt(e) => write!(f, "corrupt: {e}"),
            Self::Incompatible(e) => write!(f, "incompatible: {e}"),
        }
    }
}

/// The bundle could not be loaded as a whole.
///
/// Inference is unavailable until the artifacts are fixed and the process restarted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing artifact {artifact} ({}): {reason}", artifact.file_name())]
pub struct MissingArtifactError {
    pub artifact: ArtifactKind,
    pub reason: MissingReason,
}

impl MissingArtifactError {
    pub fn not_found(artifact: ArtifactKind) -> Self {
        Self {
            artifact,
            reason: MissingReason::NotFound,
        }
    }

    pub fn unreadable(artifact: ArtifactKind, detail: impl Into<String>) -> Self {
        Self {
            artifact,
            reason: MissingReason::Unreadable(detail.into()),
        }
    }

    pub fn corrupt(artifact: ArtifactKind, detail: impl Into<String>) -> Self {
        Self {
            artifact,
            reason: MissingReason::Corrupt(detail.into()),
        }
    }

    pub fn incompatible(artifact: ArtifactKind, detail: impl Into<String>) -> Self {
        Self {
            artifact,
            reason: MissingReason::Incompatible(detail.into()),
        }
    }
}
