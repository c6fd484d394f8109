//! Inference pipeline: Transform, Scale, Classify, Decode.
//!
//! Every request runs all four stages in that order against one shared
//! bundle. A stage failure ends the request with the stage named; nothing is
//! retried or defaulted.

use std::sync::Arc;

use super::bundle::ArtifactBundle;
use super::normalizer::{self, NormalizeError};
use crate::domain::{
    FeatureRecord, InferenceError, NormalizedRow, PredictionResult, RawRecord, Stage, StageFault,
    WeightCategory,
};

/// Either half of a request failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Stateless predictor over a shared bundle.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    bundle: Arc<ArtifactBundle>,
}

impl InferencePipeline {
    pub fn new(bundle: Arc<ArtifactBundle>) -> Self {
        Self { bundle }
    }

    #[must_use]
    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Lay a record out in the bundle's canonical column order.
    ///
    /// # Errors
    /// Returns error if the bundle names a column the record does not have.
    pub fn normalized_row(&self, record: &FeatureRecord) -> Result<NormalizedRow, NormalizeError> {
        normalizer::project(record, self.bundle.feature_columns())
    }

    /// Run the four stages on a row already in canonical order.
    ///
    /// # Errors
    /// Returns [`InferenceError`] naming the stage that rejected the row.
    pub fn predict_row(&self, row: &NormalizedRow) -> Result<PredictionResult, InferenceError> {
        let bundle = &self.bundle;
        let at = |stage: Stage| move |fault: StageFault| InferenceError::new(stage, fault);

        let encoded = bundle.transformer().transform(row).map_err(at(Stage::Transform))?;
        tracing::debug!("{}: {} features", Stage::Transform, encoded.len());

        let scaled = bundle.scaler().transform(&encoded).map_err(at(Stage::Scale))?;
        tracing::debug!("{}: {} features", Stage::Scale, scaled.len());

        let class_index = bundle.classifier().predict(&scaled).map_err(at(Stage::Classify))?;
        tracing::debug!("{}: class index {class_index}", Stage::Classify);

        let label = bundle
            .decoder()
            .inverse_transform(class_index)
            .map_err(at(Stage::Decode))?;
        let category = WeightCategory::from_label(label)
            .ok_or_else(|| at(Stage::Decode)(StageFault::UnknownLabel(label.to_string())))?;
        tracing::debug!("{}: {label}", Stage::Decode);

        Ok(PredictionResult::new(category, class_index))
    }

    /// Predict from a normalized record.
    ///
    /// # Errors
    /// Returns error if projection or any stage fails.
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictError> {
        let row = self.normalized_row(record)?;
        let result = self.predict_row(&row).map_err(|e| {
            tracing::warn!("Prediction failed at {} stage", e.stage);
            tracing::debug!("Prediction failure detail: {e}");
            e
        })?;
        tracing::info!(
            "Prediction: {} ({})",
            result.category.label(),
            result.tier()
        );
        Ok(result)
    }

    /// Normalize form input, then predict.
    ///
    /// # Errors
    /// Returns error if normalization or any stage fails.
    pub fn predict_raw(&self, raw: &RawRecord) -> Result<PredictionResult, PredictError> {
        let record = normalizer::normalize(raw).map_err(|e| {
            tracing::warn!("Rejected form input: {}", e.redacted());
            tracing::debug!("Rejected form input detail: {e}");
            e
        })?;
        self.predict(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::bundle::tests::sample_bundle;
    use crate::domain::{Column, FeatureValue, SeverityTier};
    use crate::ports::{Classifier, FeatureScaler, FeatureTransformer, LabelDecoder};

    fn sample_pipeline() -> InferencePipeline {
        InferencePipeline::new(Arc::new(sample_bundle()))
    }

    fn high_risk() -> RawRecord {
        RawRecord {
            family_history: "yes".into(),
            favc: "yes".into(),
            fcvc: 1,
            ncp: 1,
            faf: 0,
            tue: 0,
            ..base()
        }
    }

    fn low_risk() -> RawRecord {
        RawRecord {
            family_history: "no".into(),
            favc: "no".into(),
            fcvc: 3,
            ncp: 3,
            faf: 3,
            ..base()
        }
    }

    fn base() -> RawRecord {
        RawRecord {
            gender: "Laki-laki".into(),
            caec: "Kadang-kadang".into(),
            smoke: "no".into(),
            ch2o: 2,
            scc: "no".into(),
            tue: 0,
            calc: "Tidak".into(),
            mtrans: "Transportasi Umum".into(),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_sample_bundle_predictions() {
        let pipeline = sample_pipeline();

        let high = pipeline.predict_raw(&high_risk()).unwrap();
        assert_eq!(high.category, WeightCategory::ObesityTypeII);
        assert_eq!(high.tier(), SeverityTier::Alert);

        let low = pipeline.predict_raw(&low_risk()).unwrap();
        assert_eq!(low.category, WeightCategory::InsufficientWeight);

        let default = pipeline.predict_raw(&RawRecord::default()).unwrap();
        assert_eq!(default.category, WeightCategory::OverweightLevelII);
        assert_eq!(default.label(), "Overweight_Level_II");
    }

    #[test]
    fn test_risk_factors_raise_tier() {
        let pipeline = sample_pipeline();
        let high = pipeline.predict_raw(&high_risk()).unwrap();
        let low = pipeline.predict_raw(&low_risk()).unwrap();
        assert!(high.tier() > low.tier());
    }

    #[test]
    fn test_prediction_is_idempotent() {
        let pipeline = sample_pipeline();
        let record = normalizer::normalize(&high_risk()).unwrap();
        let first = pipeline.predict(&record).unwrap();
        for _ in 0..5 {
            assert_eq!(pipeline.predict(&record).unwrap(), first);
        }

        // A second pipeline over the same bundle agrees.
        let other = InferencePipeline::new(Arc::new(sample_bundle()));
        assert_eq!(other.predict(&record).unwrap(), first);
    }

    #[test]
    fn test_row_follows_bundle_column_order() {
        let pipeline = sample_pipeline();
        let record = normalizer::normalize(&RawRecord::default()).unwrap();
        let row = pipeline.normalized_row(&record).unwrap();
        assert_eq!(row.columns(), pipeline.bundle().feature_columns());
    }

    #[test]
    fn test_every_display_value_is_fitted() {
        // Each selectable wording reaches the classifier without a transform fault.
        use crate::domain::{Frequency, Gender, Transport, Vocabulary};

        let pipeline = sample_pipeline();
        let mut records = Vec::new();
        for g in Gender::ALL {
            records.push(RawRecord {
                gender: g.display().into(),
                ..RawRecord::default()
            });
        }
        for f in Frequency::ALL {
            records.push(RawRecord {
                caec: f.display().into(),
                ..RawRecord::default()
            });
            records.push(RawRecord {
                calc: f.display().into(),
                ..RawRecord::default()
            });
        }
        for t in Transport::ALL {
            records.push(RawRecord {
                mtrans: t.display().into(),
                ..RawRecord::default()
            });
        }
        for raw in &records {
            let result = pipeline.predict_raw(raw).expect("all display values predict");
            assert!(WeightCategory::ALL.contains(&result.category));
        }
    }

    #[test]
    fn test_unmapped_value_never_reaches_pipeline() {
        let pipeline = sample_pipeline();
        let raw = RawRecord {
            caec: "Jarang".into(),
            ..RawRecord::default()
        };
        assert!(matches!(
            pipeline.predict_raw(&raw),
            Err(PredictError::Normalize(NormalizeError::Unmapped(_)))
        ));
    }

    #[test]
    fn test_transform_stage_reports_bad_row() {
        let pipeline = sample_pipeline();
        let record = normalizer::normalize(&RawRecord::default()).unwrap();
        let row = pipeline.normalized_row(&record).unwrap();

        let mut values = row.values().to_vec();
        let gender = row.columns().iter().position(|c| c == "Gender").unwrap();
        values[gender] = FeatureValue::category("Other");
        let bad = NormalizedRow::new(row.columns().to_vec(), values).unwrap();

        let err = pipeline.predict_row(&bad).unwrap_err();
        assert_eq!(err.stage, Stage::Transform);
        assert!(matches!(err.fault, StageFault::UnknownCategory { .. }));
    }

    // Fixture stages: one feature per column, identity scaler, a classifier
    // that always emits the same index.
    struct PassthroughTransformer(Vec<String>, Vec<Vec<String>>);

    impl FeatureTransformer for PassthroughTransformer {
        fn feature_names_in(&self) -> &[String] {
            &self.0
        }
        fn n_features_out(&self) -> usize {
            1
        }
        fn encoded_categories(&self, column: &str) -> Option<&[String]> {
            let i = self.0.iter().position(|c| c == column)?;
            Column::from_name(column)?.training_vocabulary()?;
            Some(&self.1[i])
        }
        fn transform(&self, _row: &NormalizedRow) -> Result<Vec<f64>, StageFault> {
            Ok(vec![0.0])
        }
    }

    struct Identity;

    impl FeatureScaler for Identity {
        fn n_features(&self) -> usize {
            1
        }
        fn transform(&self, features: &[f64]) -> Result<Vec<f64>, StageFault> {
            Ok(features.to_vec())
        }
    }

    struct Fixed(usize, usize);

    impl Classifier for Fixed {
        fn n_features(&self) -> usize {
            1
        }
        fn n_classes(&self) -> usize {
            self.1
        }
        fn predict(&self, _features: &[f64]) -> Result<usize, StageFault> {
            Ok(self.0)
        }
    }

    struct Labels(Vec<String>);

    impl LabelDecoder for Labels {
        fn classes(&self) -> &[String] {
            &self.0
        }
        fn inverse_transform(&self, index: usize) -> Result<&str, StageFault> {
            self.0.get(index).map(String::as_str).ok_or(StageFault::ClassOutOfRange {
                index,
                n_classes: self.0.len(),
            })
        }
    }

    fn fixture_pipeline(index: usize, classes: &[&str]) -> InferencePipeline {
        let columns: Vec<String> = Column::ALL.iter().map(|c| c.name().to_string()).collect();
        let vocab = Column::ALL
            .iter()
            .map(|c| {
                c.training_vocabulary()
                    .unwrap_or_default()
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .collect();
        let bundle = ArtifactBundle::from_parts(
            Box::new(PassthroughTransformer(columns.clone(), vocab)),
            Box::new(Identity),
            Box::new(Fixed(index, classes.len())),
            Box::new(Labels(classes.iter().map(|c| c.to_string()).collect())),
            columns,
        )
        .expect("fixture bundle is consistent");
        InferencePipeline::new(Arc::new(bundle))
    }

    #[test]
    fn test_fixture_bundle_decodes() {
        let pipeline = fixture_pipeline(1, &["Normal_Weight", "Obesity_Type_III"]);
        let result = pipeline.predict_raw(&RawRecord::default()).unwrap();
        assert_eq!(result, PredictionResult::new(WeightCategory::ObesityTypeIII, 1));
        assert!(pipeline.bundle().fingerprint().is_none());
    }

    #[test]
    fn test_decode_stage_rejects_out_of_range_class() {
        let pipeline = fixture_pipeline(2, &["Normal_Weight", "Obesity_Type_III"]);
        let err = pipeline.predict_raw(&RawRecord::default()).unwrap_err();
        assert_eq!(
            err,
            PredictError::Inference(InferenceError::new(
                Stage::Decode,
                StageFault::ClassOutOfRange {
                    index: 2,
                    n_classes: 2
                }
            ))
        );
    }
}
