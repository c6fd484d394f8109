//! Result presenter: turns a decoded category into user-facing wording.

use crate::domain::{PredictionResult, SeverityTier, WeightCategory};

/// Shown when the bundle could not be loaded at startup.
pub const LOAD_FAILED: &str =
    "File model tidak ditemukan atau rusak. Pastikan semua artefak model berada di direktori yang benar.";

/// Shown when a prediction is requested without a loaded bundle.
pub const MODEL_UNAVAILABLE: &str = "Model tidak berhasil dimuat, proses tidak dapat dilanjutkan.";

const ADVICE: &str = "Disarankan untuk menjaga pola hidup yang lebih sehat.";

/// Wording and tier for one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub category: WeightCategory,
    pub tier: SeverityTier,
    /// Category with underscores rendered as spaces
    pub title: String,
    pub message: String,
    /// Lifestyle advice, only for the alert tier
    pub advice: Option<&'static str>,
}

impl Presentation {
    #[must_use]
    pub fn of(category: WeightCategory) -> Self {
        let title = category.display_name();
        let message = format!(
            "Berdasarkan analisis, Anda tergolong dalam kategori: {title} ({}).",
            category.qualifier()
        );
        let tier = category.tier();
        Self {
            category,
            tier,
            title,
            message,
            advice: (tier == SeverityTier::Alert).then_some(ADVICE),
        }
    }

    /// Present a label string straight from the label encoder.
    ///
    /// Returns `None` for labels outside the known categories.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        WeightCategory::from_label(label).map(Self::of)
    }
}

impl From<&PredictionResult> for Presentation {
    fn from(result: &PredictionResult) -> Self {
        Self::of(result.category)
    }
}
