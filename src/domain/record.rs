//! Feature records for obesity-category prediction.
//!
//! Based on the UCI "Estimation of obesity levels based on eating habits and
//! physical condition" survey attributes.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::vocabulary::{Answer, Frequency, Gender, Transport, Vocabulary};

/// Canonical training columns.
///
/// The trained artifacts address these positionally once fitted; the order of
/// [`Column::ALL`] is only the order records are assembled in, the bundle's
/// `feature_columns` decides the order handed to the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Gender,
    FamilyHistory,
    Favc,
    Fcvc,
    Ncp,
    Caec,
    Smoke,
    Ch2o,
    Scc,
    Faf,
    Tue,
    Calc,
    Mtrans,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Gender,
        Column::FamilyHistory,
        Column::Favc,
        Column::Fcvc,
        Column::Ncp,
        Column::Caec,
        Column::Smoke,
        Column::Ch2o,
        Column::Scc,
        Column::Faf,
        Column::Tue,
        Column::Calc,
        Column::Mtrans,
    ];

    /// Column name as stored in `feature_columns`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::FamilyHistory => "family_history_with_overweight",
            Self::Favc => "FAVC",
            Self::Fcvc => "FCVC",
            Self::Ncp => "NCP",
            Self::Caec => "CAEC",
            Self::Smoke => "SMOKE",
            Self::Ch2o => "CH2O",
            Self::Scc => "SCC",
            Self::Faf => "FAF",
            Self::Tue => "TUE",
            Self::Calc => "CALC",
            Self::Mtrans => "MTRANS",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Accepted range for the bounded integer columns.
    #[must_use]
    pub fn bounds(self) -> Option<RangeInclusive<i64>> {
        match self {
            Self::Fcvc => Some(1..=3),
            Self::Ncp => Some(1..=4),
            Self::Ch2o => Some(1..=3),
            Self::Faf => Some(0..=3),
            Self::Tue => Some(0..=2),
            _ => None,
        }
    }

    /// Training tokens a categorical column can carry; `None` for numeric columns.
    #[must_use]
    pub fn training_vocabulary(self) -> Option<Vec<&'static str>> {
        match self {
            Self::Gender => Some(Gender::training_tokens()),
            Self::Caec | Self::Calc => Some(Frequency::training_tokens()),
            Self::Mtrans => Some(Transport::training_tokens()),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw form input in display vocabulary, one value per field.
///
/// Categorical fields carry the wording shown in the form, yes/no fields carry
/// `"yes"` or `"no"`. Nothing here is trusted until normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub gender: String,
    pub family_history: String,
    pub favc: String,
    pub fcvc: i64,
    pub ncp: i64,
    pub caec: String,
    pub smoke: String,
    pub ch2o: i64,
    pub scc: String,
    pub faf: i64,
    pub tue: i64,
    pub calc: String,
    pub mtrans: String,
    /// Collected by the form, not part of the trained schema.
    #[serde(default)]
    pub age: Option<i64>,
}

impl Default for RawRecord {
    /// Initial form state: first option of each selector, "yes" on radios,
    /// slider midpoints.
    fn default() -> Self {
        Self {
            gender: Gender::Male.display().to_string(),
            family_history: Answer::Yes.display().to_string(),
            favc: Answer::Yes.display().to_string(),
            fcvc: 2,
            ncp: 3,
            caec: Frequency::No.display().to_string(),
            smoke: Answer::Yes.display().to_string(),
            ch2o: 2,
            scc: Answer::Yes.display().to_string(),
            faf: 1,
            tue: 1,
            calc: Frequency::No.display().to_string(),
            mtrans: Transport::Automobile.display().to_string(),
            age: Some(25),
        }
    }
}

/// One subject's attributes in training vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRecord {
    pub gender: Gender,
    pub family_history: bool,
    pub favc: bool,
    pub fcvc: u8,
    pub ncp: u8,
    pub caec: Frequency,
    pub smoke: bool,
    pub ch2o: u8,
    pub scc: bool,
    pub faf: u8,
    pub tue: u8,
    pub calc: Frequency,
    pub mtrans: Transport,
}

impl FeatureRecord {
    /// Value of `column` as handed to the transformer.
    #[must_use]
    pub fn value(&self, column: Column) -> FeatureValue {
        let flag = |b: bool| FeatureValue::Number(if b { 1.0 } else { 0.0 });
        match column {
            Column::Gender => FeatureValue::category(self.gender.training()),
            Column::FamilyHistory => flag(self.family_history),
            Column::Favc => flag(self.favc),
            Column::Fcvc => FeatureValue::Number(f64::from(self.fcvc)),
            Column::Ncp => FeatureValue::Number(f64::from(self.ncp)),
            Column::Caec => FeatureValue::category(self.caec.training()),
            Column::Smoke => flag(self.smoke),
            Column::Ch2o => FeatureValue::Number(f64::from(self.ch2o)),
            Column::Scc => flag(self.scc),
            Column::Faf => FeatureValue::Number(f64::from(self.faf)),
            Column::Tue => FeatureValue::Number(f64::from(self.tue)),
            Column::Calc => FeatureValue::category(self.calc.training()),
            Column::Mtrans => FeatureValue::category(self.mtrans.training()),
        }
    }
}

/// A single cell of a normalized row.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Category(String),
    Number(f64),
}

impl FeatureValue {
    pub fn category(token: impl Into<String>) -> Self {
        Self::Category(token.into())
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Single-row table in a fixed column order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    columns: Vec<String>,
    values: Vec<FeatureValue>,
}

impl NormalizedRow {
    /// Build a row from parallel column/value vectors.
    ///
    /// # Errors
    /// Returns an error if the vectors differ in length.
    pub fn new(columns: Vec<String>, values: Vec<FeatureValue>) -> Result<Self, String> {
        if columns.len() != values.len() {
            return Err(format!(
                "Row has {} columns but {} values",
                columns.len(),
                values.len()
            ));
        }
        Ok(Self { columns, values })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look a value up by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }
}
