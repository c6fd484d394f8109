//! Label encoder, used to map class indices back to labels.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::StageFault;
use crate::ports::LabelDecoder;

/// Fitted `LabelEncoder`: `classes_` in encoded order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// # Errors
    /// Returns error if there are no classes or a class repeats.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("Label encoder has no classes".into());
        }
        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.as_str()) {
                return Err(format!("Label encoder repeats class {class:?}"));
            }
        }
        Ok(())
    }
}

impl LabelDecoder for LabelEncoder {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn inverse_transform(&self, index: usize) -> Result<&str, StageFault> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(StageFault::ClassOutOfRange {
                index,
                n_classes: self.classes.len(),
            })
    }
}
