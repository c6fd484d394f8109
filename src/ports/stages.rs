//! Stage ports: Traits for the four fitted pipeline components.
//!
//! These traits abstract the fitted artifacts (exported scikit-learn
//! components) from the pipeline. All methods take `&self`: a fitted
//! component is never mutated by inference.

use crate::domain::{NormalizedRow, StageFault};

/// Fitted feature transformer (categorical encoding, column selection).
pub trait FeatureTransformer: Send + Sync {
    /// Columns the transformer was fitted on, in fitted order.
    fn feature_names_in(&self) -> &[String];

    /// Width of the encoded vector.
    fn n_features_out(&self) -> usize;

    /// Categories fitted for `column`, if that column is categorically encoded.
    fn encoded_categories(&self, column: &str) -> Option<&[String]>;

    /// Encode one row.
    ///
    /// # Errors
    /// Returns a [`StageFault`] on column mismatch or an unseen category.
    fn transform(&self, row: &NormalizedRow) -> Result<Vec<f64>, StageFault>;
}

/// Fitted numeric scaler.
pub trait FeatureScaler: Send + Sync {
    fn n_features(&self) -> usize;

    /// Scale one encoded vector.
    ///
    /// # Errors
    /// Returns a [`StageFault`] on width mismatch or non-finite output.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, StageFault>;
}

/// Fitted classifier emitting an encoded class index.
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    fn n_classes(&self) -> usize;

    /// Predict the class index of one scaled vector.
    ///
    /// # Errors
    /// Returns a [`StageFault`] on width mismatch or non-finite input.
    fn predict(&self, features: &[f64]) -> Result<usize, StageFault>;
}

/// Fitted label encoder, used in the inverse direction only.
pub trait LabelDecoder: Send + Sync {
    /// Class labels indexed by encoded class.
    fn classes(&self) -> &[String];

    /// Recover the label of an encoded class.
    ///
    /// # Errors
    /// Returns [`StageFault::ClassOutOfRange`] for an index outside the fitted classes.
    fn inverse_transform(&self, index: usize) -> Result<&str, StageFault>;
}
