//! Classifiers exported from scikit-learn.
//!
//! Two families are supported: linear models (`LogisticRegression`,
//! `LinearSVC`, ...) exported as `coef_`/`intercept_`, and tree ensembles
//! (`RandomForestClassifier`) exported as the raw `tree_` arrays of every
//! estimator.

use serde::{Deserialize, Serialize};

use crate::domain::StageFault;
use crate::ports::Classifier;

/// Leaf marker used by scikit-learn in `children_left`/`children_right`.
const TREE_LEAF: i64 = -1;

/// One fitted decision tree in scikit-learn array form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, `n_nodes x n_classes`.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n_nodes = self.children_left.len();
        if n_nodes == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n_nodes
            || self.feature.len() != n_nodes
            || self.threshold.len() != n_nodes
            || self.value.len() != n_nodes
        {
            return Err("tree arrays differ in length".into());
        }

        for node in 0..n_nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(format!("node {node} has only one child"));
                }
                let dist = &self.value[node];
                if dist.len() != n_classes {
                    return Err(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        dist.len()
                    ));
                }
                if dist.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {node} has invalid class weights"));
                }
                continue;
            }

            // Children always come after their parent, which also rules out cycles.
            for child in [left, right] {
                let ok = usize::try_from(child).is_ok_and(|c| c > node && c < n_nodes);
                if !ok {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }
            let ok = usize::try_from(self.feature[node]).is_ok_and(|f| f < n_features);
            if !ok {
                return Err(format!(
                    "node {node} splits on feature {} of {n_features}",
                    self.feature[node]
                ));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf `features` falls into.
    fn leaf_distribution(&self, features: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            // Indices were checked by `validate`.
            let feature = self.feature[node] as usize;
            let next = if features[feature] <= self.threshold[node] {
                self.children_left[node]
            } else {
                self.children_right[node]
            };
            node = next as usize;
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            weights.clone()
        }
    }
}

/// Classifier parameters exported by the training notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedClassifier {
    Linear {
        /// `n_classes x n_features`, or a single row for a binary model.
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    RandomForest {
        n_features_in: usize,
        n_classes: usize,
        trees: Vec<DecisionTree>,
    },
}

impl ExportedClassifier {
    /// Check the exported parameters are internally consistent.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Linear { coef, intercept } => {
                if coef.is_empty() {
                    return Err("linear model has no coefficient rows".into());
                }
                if coef.len() != intercept.len() {
                    return Err(format!(
                        "linear model has {} coefficient rows but {} intercepts",
                        coef.len(),
                        intercept.len()
                    ));
                }
                let width = coef[0].len();
                if width == 0 {
                    return Err("linear model has no features".into());
                }
                if coef.iter().any(|row| row.len() != width) {
                    return Err("linear model coefficient rows differ in width".into());
                }
                let finite = coef.iter().flatten().chain(intercept).all(|w| w.is_finite());
                if !finite {
                    return Err("linear model has non-finite weights".into());
                }
                Ok(())
            }
            Self::RandomForest {
                n_features_in,
                n_classes,
                trees,
            } => {
                if *n_features_in == 0 || *n_classes < 2 {
                    return Err(format!(
                        "forest needs features and 2+ classes, got {n_features_in}/{n_classes}"
                    ));
                }
                if trees.is_empty() {
                    return Err("forest has no trees".into());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features_in, *n_classes)
                        .map_err(|e| format!("tree {i}: {e}"))?;
                }
                Ok(())
            }
        }
    }
}

/// A validated, ready-to-run classifier.
#[derive(Debug, Clone)]
pub struct SklearnClassifier {
    model: ExportedClassifier,
}

impl SklearnClassifier {
    /// Validate an export and wrap it.
    ///
    /// # Errors
    /// Returns error if the export is inconsistent.
    pub fn from_export(model: ExportedClassifier) -> Result<Self, String> {
        model.validate()?;
        Ok(Self { model })
    }

    /// Per-class scores: decision values for linear models, mean leaf
    /// probabilities for forests.
    fn scores(&self, features: &[f64]) -> Vec<f64> {
        match &self.model {
            ExportedClassifier::Linear { coef, intercept } => {
                let decision: Vec<f64> = coef
                    .iter()
                    .zip(intercept)
                    .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
                    .collect();
                if decision.len() == 1 {
                    // Binary models score only the positive class.
                    vec![0.0, decision[0]]
                } else {
                    decision
                }
            }
            ExportedClassifier::RandomForest {
                n_classes, trees, ..
            } => {
                let mut sums = vec![0.0; *n_classes];
                for tree in trees {
                    for (sum, p) in sums.iter_mut().zip(tree.leaf_distribution(features)) {
                        *sum += p;
                    }
                }
                let n = trees.len() as f64;
                sums.iter().map(|s| s / n).collect()
            }
        }
    }
}

/// Index of the highest score; the first index wins ties.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

impl Classifier for SklearnClassifier {
    fn n_features(&self) -> usize {
        match &self.model {
            ExportedClassifier::Linear { coef, .. } => coef[0].len(),
            ExportedClassifier::RandomForest { n_features_in, .. } => *n_features_in,
        }
    }

    fn n_classes(&self) -> usize {
        match &self.model {
            ExportedClassifier::Linear { coef, .. } => coef.len().max(2),
            ExportedClassifier::RandomForest { n_classes, .. } => *n_classes,
        }
    }

    fn predict(&self, features: &[f64]) -> Result<usize, StageFault> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(StageFault::ShapeMismatch {
                expected,
                got: features.len(),
            });
        }
        if let Some(index) = features.iter().position(|x| !x.is_finite()) {
            return Err(StageFault::NonFinite { index });
        }

        let scores = self.scores(features);
        if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
            return Err(StageFault::NonFinite { index });
        }
        Ok(argmax(&scores))
    }
}
