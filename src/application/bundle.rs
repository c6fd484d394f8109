//! Artifact bundle: the five trained artifacts, loaded and checked as one unit.
//!
//! A bundle is either loaded completely or not at all. Beyond each artifact
//! parsing on its own, the loader checks that the artifacts fit together
//! (column lists, vector widths, class vocabularies), so a bundle assembled
//! from two different training runs fails at startup instead of producing
//! quietly wrong predictions.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::adapters::manifest::{BundleManifest, ManifestError};
use crate::adapters::sklearn::{
    ColumnTransformer, ExportedClassifier, ExportedColumnTransformer, LabelEncoder,
    SklearnClassifier, StandardScaler,
};
use crate::domain::{ArtifactKind, Column, MissingArtifactError, WeightCategory};
use crate::ports::{ArtifactStore, Classifier, FeatureScaler, FeatureTransformer, LabelDecoder};

/// Immutable set of fitted components plus the canonical column order.
pub struct ArtifactBundle {
    transformer: Box<dyn FeatureTransformer>,
    scaler: Box<dyn FeatureScaler>,
    classifier: Box<dyn Classifier>,
    decoder: Box<dyn LabelDecoder>,
    feature_columns: Vec<String>,
    fingerprint: Option<String>,
}

impl std::fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("feature_columns", &self.feature_columns)
            .field("n_features_out", &self.transformer.n_features_out())
            .field("classes", &self.decoder.classes())
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

impl ArtifactBundle {
    /// Load all five artifacts from `store`.
    ///
    /// If the store carries a `manifest.json`, every artifact must match its
    /// recorded digest. With `require_manifest`, a missing manifest fails the
    /// load.
    ///
    /// # Errors
    /// Returns [`MissingArtifactError`] naming the first artifact that is
    /// absent, unreadable, corrupt or incompatible with the others.
    pub fn load(
        store: &dyn ArtifactStore,
        require_manifest: bool,
    ) -> Result<Self, MissingArtifactError> {
        tracing::info!("Loading artifact bundle from {}", store.location());

        let manifest = BundleManifest::load(store).map_err(|e| match e {
            ManifestError::Unreadable { detail, .. } => {
                MissingArtifactError::unreadable(ArtifactKind::Manifest, detail)
            }
            other => MissingArtifactError::corrupt(ArtifactKind::Manifest, other.to_string()),
        })?;
        match &manifest {
            Some(m) => {
                tracing::info!("Verifying bundle against manifest ({} files)", m.files.len());
            }
            None if require_manifest => {
                tracing::error!("manifest.json required but not present");
                return Err(MissingArtifactError::not_found(ArtifactKind::Manifest));
            }
            None => tracing::warn!("No manifest.json; artifact digests not verified"),
        }

        let mut hasher = Sha256::new();
        let mut read = |kind: ArtifactKind| -> Result<Vec<u8>, MissingArtifactError> {
            let bytes = read_artifact(store, kind)?;
            if let Some(m) = &manifest {
                m.verify(kind.file_name(), &bytes)
                    .map_err(|e| MissingArtifactError::corrupt(kind, e.to_string()))?;
            }
            hasher.update(kind.file_name().as_bytes());
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(&bytes);
            Ok(bytes)
        };

        let transformer_bytes = read(ArtifactKind::Transformer)?;
        let scaler_bytes = read(ArtifactKind::Scaler)?;
        let classifier_bytes = read(ArtifactKind::Classifier)?;
        let encoder_bytes = read(ArtifactKind::LabelEncoder)?;
        let columns_bytes = read(ArtifactKind::FeatureColumns)?;

        let export: ExportedColumnTransformer =
            parse(ArtifactKind::Transformer, &transformer_bytes)?;
        let transformer = ColumnTransformer::from_export(export)
            .map_err(|e| MissingArtifactError::corrupt(ArtifactKind::Transformer, e))?;

        let scaler: StandardScaler = parse(ArtifactKind::Scaler, &scaler_bytes)?;
        scaler
            .validate()
            .map_err(|e| MissingArtifactError::corrupt(ArtifactKind::Scaler, e))?;

        let export: ExportedClassifier = parse(ArtifactKind::Classifier, &classifier_bytes)?;
        let classifier = SklearnClassifier::from_export(export)
            .map_err(|e| MissingArtifactError::corrupt(ArtifactKind::Classifier, e))?;

        let encoder: LabelEncoder = parse(ArtifactKind::LabelEncoder, &encoder_bytes)?;
        encoder
            .validate()
            .map_err(|e| MissingArtifactError::corrupt(ArtifactKind::LabelEncoder, e))?;

        let feature_columns: Vec<String> = parse(ArtifactKind::FeatureColumns, &columns_bytes)?;

        let mut bundle = Self::from_parts(
            Box::new(transformer),
            Box::new(scaler),
            Box::new(classifier),
            Box::new(encoder),
            feature_columns,
        )?;

        let digest = hasher.finalize();
        bundle.fingerprint = Some(digest.iter().map(|b| format!("{b:02x}")).collect());

        tracing::info!(
            "Artifact bundle loaded: {} columns, {} encoded features, {} classes, fingerprint {}",
            bundle.feature_columns.len(),
            bundle.transformer.n_features_out(),
            bundle.decoder.classes().len(),
            bundle.short_fingerprint().unwrap_or("-"),
        );
        Ok(bundle)
    }

    /// Assemble a bundle from already-built components.
    ///
    /// Runs the same compatibility checks as [`ArtifactBundle::load`]. The
    /// resulting bundle has no fingerprint.
    ///
    /// # Errors
    /// Returns [`MissingArtifactError`] with reason `Incompatible` if the parts
    /// do not fit together.
    pub fn from_parts(
        transformer: Box<dyn FeatureTransformer>,
        scaler: Box<dyn FeatureScaler>,
        classifier: Box<dyn Classifier>,
        decoder: Box<dyn LabelDecoder>,
        feature_columns: Vec<String>,
    ) -> Result<Self, MissingArtifactError> {
        let bundle = Self {
            transformer,
            scaler,
            classifier,
            decoder,
            feature_columns,
            fingerprint: None,
        };
        bundle.check_compatibility().map_err(|e| {
            tracing::error!("Artifact bundle rejected: {e}");
            e
        })?;
        Ok(bundle)
    }

    fn check_compatibility(&self) -> Result<(), MissingArtifactError> {
        use ArtifactKind as K;

        // Column list covers the record exactly once per column.
        if self.feature_columns.len() != Column::ALL.len() {
            return Err(MissingArtifactError::incompatible(
                K::FeatureColumns,
                format!(
                    "expected {} columns, found {}",
                    Column::ALL.len(),
                    self.feature_columns.len()
                ),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.feature_columns {
            let column = Column::from_name(name).ok_or_else(|| {
                MissingArtifactError::incompatible(
                    K::FeatureColumns,
                    format!("unknown column {name:?}"),
                )
            })?;
            if !seen.insert(column) {
                return Err(MissingArtifactError::incompatible(
                    K::FeatureColumns,
                    format!("column {name:?} listed twice"),
                ));
            }
        }

        if self.transformer.feature_names_in() != self.feature_columns.as_slice() {
            return Err(MissingArtifactError::incompatible(
                K::Transformer,
                "fitted input columns differ from feature_columns",
            ));
        }

        // Numeric and yes/no columns reach the transformer as numbers, so an
        // encoder over one of them could never accept a request.
        for column in Column::ALL {
            if column.training_vocabulary().is_none()
                && self.transformer.encoded_categories(column.name()).is_some()
            {
                return Err(MissingArtifactError::incompatible(
                    K::Transformer,
                    format!("numeric column {column} is categorically encoded"),
                ));
            }
        }

        let width = self.transformer.n_features_out();
        if self.scaler.n_features() != width {
            return Err(MissingArtifactError::incompatible(
                K::Scaler,
                format!(
                    "scaler expects {} features, transformer emits {width}",
                    self.scaler.n_features()
                ),
            ));
        }
        if self.classifier.n_features() != width {
            return Err(MissingArtifactError::incompatible(
                K::Classifier,
                format!(
                    "classifier expects {} features, scaler emits {width}",
                    self.classifier.n_features()
                ),
            ));
        }

        let classes = self.decoder.classes();
        if self.classifier.n_classes() != classes.len() {
            return Err(MissingArtifactError::incompatible(
                K::LabelEncoder,
                format!(
                    "classifier has {} classes, label encoder has {}",
                    self.classifier.n_classes(),
                    classes.len()
                ),
            ));
        }
        if let Some(unknown) = classes.iter().find(|c| WeightCategory::from_label(c).is_none()) {
            return Err(MissingArtifactError::incompatible(
                K::LabelEncoder,
                format!("unknown weight category {unknown:?}"),
            ));
        }

        // Every token the normalizer can emit must have been seen in training.
        for column in Column::ALL {
            let Some(tokens) = column.training_vocabulary() else {
                continue;
            };
            let fitted = self.transformer.encoded_categories(column.name()).ok_or_else(|| {
                MissingArtifactError::incompatible(
                    K::Transformer,
                    format!("categorical column {column} is not encoded"),
                )
            })?;
            if let Some(missing) = tokens
                .iter()
                .find(|t| !fitted.iter().any(|f| f.as_str() == **t))
            {
                return Err(MissingArtifactError::incompatible(
                    K::Transformer,
                    format!("column {column} was not fitted on category {missing:?}"),
                ));
            }
        }

        Ok(())
    }

    pub fn transformer(&self) -> &dyn FeatureTransformer {
        self.transformer.as_ref()
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn decoder(&self) -> &dyn LabelDecoder {
        self.decoder.as_ref()
    }

    /// Canonical column order handed to the transformer.
    #[must_use]
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Categories the label encoder can decode to, in class-index order.
    #[must_use]
    pub fn categories(&self) -> Vec<WeightCategory> {
        self.decoder
            .classes()
            .iter()
            .filter_map(|c| WeightCategory::from_label(c))
            .collect()
    }

    /// SHA-256 over the five artifacts, for bundles loaded from a store.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// First 12 hex digits of the fingerprint.
    #[must_use]
    pub fn short_fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref().map(|f| &f[..f.len().min(12)])
    }
}

fn read_artifact(
    store: &dyn ArtifactStore,
    kind: ArtifactKind,
) -> Result<Vec<u8>, MissingArtifactError> {
    match store.read(kind.file_name()) {
        Ok(Some(bytes)) => Ok(bytes),
        Ok(None) => {
            tracing::error!(
                "Artifact {} not found in {}",
                kind.file_name(),
                store.location()
            );
            Err(MissingArtifactError::not_found(kind))
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {e}", kind.file_name());
            Err(MissingArtifactError::unreadable(kind, e.to_string()))
        }
    }
}

fn parse<T: DeserializeOwned>(kind: ArtifactKind, bytes: &[u8]) -> Result<T, MissingArtifactError> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::error!("Failed to parse {}: {e}", kind.file_name());
        MissingArtifactError::corrupt(kind, e.to_string())
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;

    use super::*;
    use crate::adapters::manifest::MANIFEST_FILE;
    use crate::adapters::{DirectoryStore, MemoryStore};
    use crate::domain::MissingReason;

    pub(crate) fn sample_store() -> DirectoryStore {
        DirectoryStore::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts"))
    }

    pub(crate) fn sample_bundle() -> ArtifactBundle {
        ArtifactBundle::load(&sample_store(), true).expect("sample bundle loads")
    }

    fn sample_files() -> MemoryStore {
        let mut names: Vec<&str> = ArtifactKind::ALL.iter().map(|k| k.file_name()).collect();
        names.push(MANIFEST_FILE);
        MemoryStore::snapshot(&sample_store(), &names).expect("snapshot")
    }

    fn without_manifest() -> MemoryStore {
        let mut store = sample_files();
        store.remove(MANIFEST_FILE);
        store
    }

    #[test]
    fn test_load_sample_bundle() {
        let bundle = sample_bundle();
        assert_eq!(bundle.feature_columns().len(), 13);
        assert_eq!(bundle.categories().len(), 7);
        assert_eq!(bundle.transformer().n_features_out(), 24);
        assert_eq!(bundle.fingerprint().map(str::len), Some(64));
        assert_eq!(bundle.short_fingerprint().map(str::len), Some(12));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = ArtifactBundle::load(&sample_files(), true).unwrap();
        let b = ArtifactBundle::load(&sample_store(), false).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_each_missing_artifact_fails_whole_load() {
        for kind in ArtifactKind::ALL {
            let mut store = without_manifest();
            store.remove(kind.file_name());
            let err = ArtifactBundle::load(&store, false).unwrap_err();
            assert_eq!(err, MissingArtifactError::not_found(kind));
        }
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirectoryStore::new(dir.path().join("nope"));
        let err = ArtifactBundle::load(&store, false).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Transformer);
        assert_eq!(err.reason, MissingReason::NotFound);
    }

    #[test]
    fn test_corrupt_artifact_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        for kind in ArtifactKind::ALL {
            let bytes = sample_store().read(kind.file_name()).unwrap().unwrap();
            std::fs::write(dir.path().join(kind.file_name()), bytes).unwrap();
        }
        std::fs::write(dir.path().join("scaler.json"), b"{\"mean\": [1.0,").unwrap();

        let err = ArtifactBundle::load(&DirectoryStore::new(dir.path()), false).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Scaler);
        assert!(matches!(err.reason, MissingReason::Corrupt(_)));
    }

    #[test]
    fn test_manifest_digest_mismatch() {
        let store = sample_files().with("encoder.json", r#"{"classes":["Normal_Weight"]}"#);
        let err = ArtifactBundle::load(&store, false).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::LabelEncoder);
        assert!(matches!(err.reason, MissingReason::Corrupt(ref d) if d.contains("hash mismatch")));
    }

    #[test]
    fn test_required_manifest() {
        let err = ArtifactBundle::load(&without_manifest(), true).unwrap_err();
        assert_eq!(err, MissingArtifactError::not_found(ArtifactKind::Manifest));
        ArtifactBundle::load(&without_manifest(), false).expect("manifest optional");
    }

    #[test]
    fn test_class_count_mismatch() {
        let store = without_manifest().with(
            "encoder.json",
            r#"{"classes":["Insufficient_Weight","Normal_Weight"]}"#,
        );
        let err = ArtifactBundle::load(&store, false).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::LabelEncoder);
        assert!(matches!(err.reason, MissingReason::Incompatible(_)));
    }

    #[test]
    fn test_unknown_class_label() {
        let store = without_manifest().with(
            "encoder.json",
            r#"{"classes":["Insufficient_Weight","Normal_Weight","Obesity_Type_I","Obesity_Type_II","Obesity_Type_III","Overweight_Level_I","Obese"]}"#,
        );
        let err = ArtifactBundle::load(&store, false).unwrap_err();
        assert!(matches!(err.reason, MissingReason::Incompatible(ref d) if d.contains("Obese")));
    }

    #[test]
    fn test_feature_columns_must_match_transformer() {
        let mut columns: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        columns.swap(0, 1);
        let store = without_manifest().with(
            "feature_columns.json",
            serde_json::to_vec(&columns).unwrap(),
        );
        let err = ArtifactBundle::load(&store, false).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Transformer);
        assert!(matches!(err.reason, MissingReason::Incompatible(_)));
    }

    #[test]
    fn test_encoder_over_numeric_column_fails_load() {
        let transformer = r#"{
            "feature_names_in": ["Gender", "family_history_with_overweight", "FAVC", "FCVC", "NCP", "CAEC", "SMOKE", "CH2O", "SCC", "FAF", "TUE", "CALC", "MTRANS"],
            "encoders": [{
                "kind": "one_hot",
                "name": "categorical",
                "columns": ["Gender", "CAEC", "CALC", "MTRANS", "FCVC"],
                "categories": [
                    ["Female", "Male"],
                    ["Always", "Frequently", "Sometimes", "no"],
                    ["Always", "Frequently", "Sometimes", "no"],
                    ["Automobile", "Bike", "Motorbike", "Public_Transportation", "Walking"],
                    ["1", "2", "3"]
                ]
            }],
            "remainder": "passthrough"
        }"#;
        let store = without_manifest().with("transformer.json", transformer);
        let err = ArtifactBundle::load(&store, false).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Transformer);
        assert!(matches!(err.reason, MissingReason::Incompatible(ref d) if d.contains("FCVC")));
    }

    #[test]
    fn test_feature_columns_must_cover_record() {
        let mut columns: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        columns[12] = "Age";
        let store = without_manifest().with(
            "feature_columns.json",
            serde_json::to_vec(&columns).unwrap(),
        );
        let err = ArtifactBundle::load(&store, false).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::FeatureColumns);
    }
}
