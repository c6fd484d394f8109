//! Column transformer: categorical encoding plus remainder handling.
//!
//! Mirrors a fitted scikit-learn `ColumnTransformer` whose encoders are
//! `OneHotEncoder(handle_unknown="error")` or `OrdinalEncoder`. Output is the
//! concatenation of every encoder's output in declared order, followed by the
//! remainder columns in input order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureValue, NormalizedRow, StageFault};
use crate::ports::FeatureTransformer;

/// What happens to columns no encoder claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remainder {
    Passthrough,
    Drop,
}

/// One fitted encoder over a group of named columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncoder {
    OneHot {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
    },
    Ordinal {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
    },
}

impl ColumnEncoder {
    fn parts(&self) -> (&str, &[String], &[Vec<String>]) {
        match self {
            Self::OneHot {
                name,
                columns,
                categories,
            }
            | Self::Ordinal {
                name,
                columns,
                categories,
            } => (name.as_str(), columns.as_slice(), categories.as_slice()),
        }
    }
}

/// Transformer parameters exported by the training notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedColumnTransformer {
    pub feature_names_in: Vec<String>,
    pub encoders: Vec<ColumnEncoder>,
    pub remainder: Remainder,
}

#[derive(Debug, Clone)]
enum SlotKind {
    OneHot(Vec<String>),
    Ordinal(Vec<String>),
    Passthrough,
}

/// One input column's contribution to the output vector.
#[derive(Debug, Clone)]
struct Slot {
    input_index: usize,
    kind: SlotKind,
}

impl Slot {
    fn width(&self) -> usize {
        match &self.kind {
            SlotKind::OneHot(categories) => categories.len(),
            SlotKind::Ordinal(_) | SlotKind::Passthrough => 1,
        }
    }
}

/// Fitted column transformer with its output plan resolved.
#[derive(Debug, Clone)]
pub struct ColumnTransformer {
    feature_names_in: Vec<String>,
    slots: Vec<Slot>,
    n_features_out: usize,
}

impl ColumnTransformer {
    /// Resolve an exported transformer into an executable plan.
    ///
    /// # Errors
    /// Returns error if encoders reference unknown columns, claim a column
    /// twice, or carry empty / duplicated category lists.
    pub fn from_export(export: ExportedColumnTransformer) -> Result<Self, String> {
        let names = export.feature_names_in;
        if names.is_empty() {
            return Err("feature_names_in is empty".into());
        }
        let unique: HashSet<&String> = names.iter().collect();
        if unique.len() != names.len() {
            return Err("feature_names_in contains duplicate columns".into());
        }

        let mut slots = Vec::new();
        let mut claimed = vec![false; names.len()];

        for encoder in &export.encoders {
            let (encoder_name, columns, categories) = encoder.parts();
            if columns.len() != categories.len() {
                return Err(format!(
                    "Encoder {encoder_name}: {} columns but {} category lists",
                    columns.len(),
                    categories.len()
                ));
            }

            for (column, cats) in columns.iter().zip(categories) {
                let input_index = names
                    .iter()
                    .position(|n| n == column)
                    .ok_or_else(|| format!("Encoder {encoder_name}: unknown column {column}"))?;
                if claimed[input_index] {
                    return Err(format!("Column {column} is claimed by more than one encoder"));
                }
                claimed[input_index] = true;

                if cats.is_empty() {
                    return Err(format!("Encoder {encoder_name}: no categories for {column}"));
                }
                let distinct: HashSet<&String> = cats.iter().collect();
                if distinct.len() != cats.len() {
                    return Err(format!(
                        "Encoder {encoder_name}: duplicate categories for {column}"
                    ));
                }

                let kind = match encoder {
                    ColumnEncoder::OneHot { .. } => SlotKind::OneHot(cats.clone()),
                    ColumnEncoder::Ordinal { .. } => SlotKind::Ordinal(cats.clone()),
                };
                slots.push(Slot { input_index, kind });
            }
        }

        if export.remainder == Remainder::Passthrough {
            for (input_index, taken) in claimed.iter().enumerate() {
                if !taken {
                    slots.push(Slot {
                        input_index,
                        kind: SlotKind::Passthrough,
                    });
                }
            }
        }

        let n_features_out = slots.iter().map(Slot::width).sum();
        if n_features_out == 0 {
            return Err("Transformer produces no output features".into());
        }

        Ok(Self {
            feature_names_in: names,
            slots,
            n_features_out,
        })
    }

    fn check_columns(&self, row: &NormalizedRow) -> Result<(), StageFault> {
        if row.len() != self.feature_names_in.len() {
            return Err(StageFault::ShapeMismatch {
                expected: self.feature_names_in.len(),
                got: row.len(),
            });
        }
        for (position, (expected, got)) in self
            .feature_names_in
            .iter()
            .zip(row.columns())
            .enumerate()
        {
            if expected != got {
                return Err(StageFault::ColumnMismatch {
                    position,
                    expected: expected.clone(),
                    got: got.clone(),
                });
            }
        }
        Ok(())
    }

    fn category_index(
        column: &str,
        categories: &[String],
        value: &FeatureValue,
    ) -> Result<usize, StageFault> {
        match value {
            FeatureValue::Category(token) => categories
                .iter()
                .position(|c| c == token)
                .ok_or_else(|| StageFault::UnknownCategory {
                    column: column.to_string(),
                    value: token.clone(),
                }),
            FeatureValue::Number(_) => Err(StageFault::WrongValueKind {
                column: column.to_string(),
                expected: "categorical",
            }),
        }
    }
}

impl FeatureTransformer for ColumnTransformer {
    fn feature_names_in(&self) -> &[String] {
        &self.feature_names_in
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    fn encoded_categories(&self, column: &str) -> Option<&[String]> {
        self.slots.iter().find_map(|slot| {
            if self.feature_names_in[slot.input_index] != column {
                return None;
            }
            match &slot.kind {
                SlotKind::OneHot(categories) | SlotKind::Ordinal(categories) => {
                    Some(categories.as_slice())
                }
                SlotKind::Passthrough => None,
            }
        })
    }

    fn transform(&self, row: &NormalizedRow) -> Result<Vec<f64>, StageFault> {
        self.check_columns(row)?;

        let mut out = Vec::with_capacity(self.n_features_out);
        for slot in &self.slots {
            let column = &self.feature_names_in[slot.input_index];
            let value = &row.values()[slot.input_index];

            match &slot.kind {
                SlotKind::OneHot(categories) => {
                    let hot = Self::category_index(column, categories, value)?;
                    out.extend((0..categories.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
                }
                SlotKind::Ordinal(categories) => {
                    let index = Self::category_index(column, categories, value)?;
                    out.push(index as f64);
                }
                SlotKind::Passthrough => match value {
                    FeatureValue::Number(n) => out.push(*n),
                    FeatureValue::Category(_) => {
                        return Err(StageFault::WrongValueKind {
                            column: column.clone(),
                            expected: "numeric",
                        })
                    }
                },
            }
        }

        Ok(out)
    }
}
