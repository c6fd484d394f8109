//! Pipeline stages and their failures.

use std::fmt;

/// The four inference stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Transform,
    Scale,
    Classify,
    Decode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform => write!(f, "transform"),
            Self::Scale => write!(f, "scale"),
            Self::Classify => write!(f, "classify"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

/// A fitted component rejected its input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageFault {
    #[error("Expected {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Column order mismatch at position {position}: expected {expected:?}, got {got:?}")]
    ColumnMismatch {
        position: usize,
        expected: String,
        got: String,
    },

    #[error("Unknown category {value:?} in column {column}")]
    UnknownCategory { column: String, value: String },

    #[error("Column {column} expects a {expected} value")]
    WrongValueKind {
        column: String,
        expected: &'static str,
    },

    #[error("Non-finite value at feature {index}")]
    NonFinite { index: usize },

    #[error("Class index {index} out of range for {n_classes} classes")]
    ClassOutOfRange { index: usize, n_classes: usize },

    #[error("Label {0:?} is not a known weight category")]
    UnknownLabel(String),
}

/// A single request failed inside the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Inference failed at {stage} stage: {fault}")]
pub struct InferenceError {
    pub stage: Stage,
    #[source]
    pub fault: StageFault,
}

impl InferenceError {
    pub fn new(stage: Stage, fault: StageFault) -> Self {
        Self { stage, fault }
    }
}
