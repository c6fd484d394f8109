//! Prediction result types.
//!
//! Represents the decoded output of the obesity-category pipeline.

use serde::{Deserialize, Serialize};

/// Weight-status categories known to the trained label encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightCategory {
    InsufficientWeight,
    NormalWeight,
    OverweightLevelI,
    OverweightLevelII,
    ObesityTypeI,
    ObesityTypeII,
    ObesityTypeIII,
}

impl WeightCategory {
    pub const ALL: [WeightCategory; 7] = [
        WeightCategory::InsufficientWeight,
        WeightCategory::NormalWeight,
        WeightCategory::OverweightLevelI,
        WeightCategory::OverweightLevelII,
        WeightCategory::ObesityTypeI,
        WeightCategory::ObesityTypeII,
        WeightCategory::ObesityTypeIII,
    ];

    /// Label string as stored in the label encoder.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InsufficientWeight => "Insufficient_Weight",
            Self::NormalWeight => "Normal_Weight",
            Self::OverweightLevelI => "Overweight_Level_I",
            Self::OverweightLevelII => "Overweight_Level_II",
            Self::ObesityTypeI => "Obesity_Type_I",
            Self::ObesityTypeII => "Obesity_Type_II",
            Self::ObesityTypeIII => "Obesity_Type_III",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// Label with underscores rendered as spaces.
    #[must_use]
    pub fn display_name(self) -> String {
        self.label().replace('_', " ")
    }

    /// Severity tier bound to this label.
    #[must_use]
    pub fn tier(self) -> SeverityTier {
        match self {
            Self::InsufficientWeight | Self::NormalWeight => SeverityTier::Informational,
            Self::OverweightLevelI | Self::OverweightLevelII => SeverityTier::Cautionary,
            Self::ObesityTypeI | Self::ObesityTypeII | Self::ObesityTypeIII => SeverityTier::Alert,
        }
    }

    /// Short qualifier shown next to the category.
    #[must_use]
    pub fn qualifier(self) -> &'static str {
        match self {
            Self::InsufficientWeight => "Berat Badan Kurang",
            Self::NormalWeight => "Berat Badan Ideal",
            Self::OverweightLevelI | Self::OverweightLevelII => "Kelebihan Berat Badan",
            Self::ObesityTypeI | Self::ObesityTypeII | Self::ObesityTypeIII => "Obesitas",
        }
    }
}

impl std::fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity tier used to colour and word the result.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    /// Insufficient or normal weight
    Informational,
    /// Overweight levels
    Cautionary,
    /// Obesity types
    Alert,
}

impl SeverityTier {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Informational => "Informational - no weight-related concern flagged",
            Self::Cautionary => "Cautionary - lifestyle review recommended",
            Self::Alert => "Alert - healthier lifestyle strongly advised",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Informational => (16, 185, 129), // Emerald (#10B981)
            Self::Cautionary => (251, 191, 36),    // Amber (#FBBF24)
            Self::Alert => (244, 63, 94),          // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Informational => write!(f, "INFO"),
            Self::Cautionary => write!(f, "WARNING"),
            Self::Alert => write!(f, "ALERT"),
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Decoded category
    pub category: WeightCategory,

    /// Class index emitted by the classifier before decoding
    pub class_index: usize,
}

impl PredictionResult {
    #[must_use]
    pub fn new(category: WeightCategory, class_index: usize) -> Self {
        Self {
            category,
            class_index,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.category.label()
    }

    #[must_use]
    pub fn tier(&self) -> SeverityTier {
        self.category.tier()
    }
}
