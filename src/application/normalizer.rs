//! Input normalizer: form selections to a row in the bundle's column order.
//!
//! Categorical answers go through the closed vocabularies, yes/no answers
//! become 1/0 flags, bounded integers are re-checked. Nothing outside a
//! vocabulary or range is passed on.

use crate::domain::{
    Answer, Column, FeatureRecord, Frequency, Gender, NormalizedRow, RawRecord, Transport,
    UnmappedValueError, Vocabulary,
};

/// A raw record could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Unmapped(#[from] UnmappedValueError),

    #[error("Value {value} for field {field} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Column {0:?} is not a known feature column")]
    UnknownColumn(String),

    #[error("Malformed row: {0}")]
    MalformedRow(String),
}

impl NormalizeError {
    /// The failure with the rejected value left out, for logs above `debug`.
    #[must_use]
    pub fn redacted(&self) -> String {
        match self {
            Self::Unmapped(e) => format!("unmapped value for field {}", e.field),
            Self::OutOfRange { field, .. } => format!("value out of range for field {field}"),
            Self::UnknownColumn(name) => format!("unknown column {name:?}"),
            Self::MalformedRow(_) => "malformed row".to_string(),
        }
    }
}

fn answer(column: Column, value: &str) -> Result<bool, UnmappedValueError> {
    Answer::from_display(column.name(), value).map(|a| a == Answer::Yes)
}

fn bounded(column: Column, value: i64) -> Result<u8, NormalizeError> {
    let out_of_range = |min: i64, max: i64| NormalizeError::OutOfRange {
        field: column.name(),
        value,
        min,
        max,
    };
    let Some(range) = column.bounds() else {
        return Err(out_of_range(0, 0));
    };
    if !range.contains(&value) {
        return Err(out_of_range(*range.start(), *range.end()));
    }
    u8::try_from(value).map_err(|_| out_of_range(*range.start(), *range.end()))
}

/// Translate form input into training vocabulary.
///
/// Age, if present, is ignored: it is not part of the trained schema.
///
/// # Errors
/// Returns [`NormalizeError`] for an unmapped categorical value or an
/// out-of-range integer, naming the field.
pub fn normalize(raw: &RawRecord) -> Result<FeatureRecord, NormalizeError> {
    Ok(FeatureRecord {
        gender: Gender::from_display(Column::Gender.name(), &raw.gender)?,
        family_history: answer(Column::FamilyHistory, &raw.family_history)?,
        favc: answer(Column::Favc, &raw.favc)?,
        fcvc: bounded(Column::Fcvc, raw.fcvc)?,
        ncp: bounded(Column::Ncp, raw.ncp)?,
        caec: Frequency::from_display(Column::Caec.name(), &raw.caec)?,
        smoke: answer(Column::Smoke, &raw.smoke)?,
        ch2o: bounded(Column::Ch2o, raw.ch2o)?,
        scc: answer(Column::Scc, &raw.scc)?,
        faf: bounded(Column::Faf, raw.faf)?,
        tue: bounded(Column::Tue, raw.tue)?,
        calc: Frequency::from_display(Column::Calc.name(), &raw.calc)?,
        mtrans: Transport::from_display(Column::Mtrans.name(), &raw.mtrans)?,
    })
}

/// Lay a record out in exactly the given column order.
///
/// # Errors
/// Returns [`NormalizeError::UnknownColumn`] if a name is not a feature column.
pub fn project(
    record: &FeatureRecord,
    columns: &[String],
) -> Result<NormalizedRow, NormalizeError> {
    let values = columns
        .iter()
        .map(|name| {
            Column::from_name(name)
                .map(|c| record.value(c))
                .ok_or_else(|| NormalizeError::UnknownColumn(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Lengths agree by construction.
    NormalizedRow::new(columns.to_vec(), values).map_err(NormalizeError::MalformedRow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureValue;

    fn canonical() -> Vec<String> {
        Column::ALL.iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_default_form_normalizes() {
        let record = normalize(&RawRecord::default()).expect("defaults are valid");
        assert_eq!(record.gender, Gender::Male);
        assert!(record.family_history && record.favc && record.smoke && record.scc);
        assert_eq!((record.fcvc, record.ncp, record.ch2o), (2, 3, 2));
        assert_eq!((record.faf, record.tue), (1, 1));
        assert_eq!(record.caec, Frequency::No);
        assert_eq!(record.mtrans, Transport::Automobile);
    }

    #[test]
    fn test_display_values_translate() {
        let raw = RawRecord {
            gender: "Perempuan".into(),
            family_history: "no".into(),
            caec: "Kadang-kadang".into(),
            calc: "Selalu".into(),
            mtrans: "Transportasi Umum".into(),
            ..RawRecord::default()
        };
        let record = normalize(&raw).unwrap();
        assert_eq!(record.gender, Gender::Female);
        assert!(!record.family_history);
        assert_eq!(record.caec, Frequency::Sometimes);
        assert_eq!(record.calc, Frequency::Always);
        assert_eq!(record.mtrans, Transport::PublicTransportation);

        let row = project(&record, &canonical()).unwrap();
        assert_eq!(row.get("CAEC"), Some(&FeatureValue::category("Sometimes")));
        assert_eq!(row.get("CALC"), Some(&FeatureValue::category("Always")));
        assert_eq!(row.get("MTRANS"), Some(&FeatureValue::category("Public_Transportation")));
        assert_eq!(row.get("family_history_with_overweight"), Some(&FeatureValue::Number(0.0)));
        assert_eq!(row.get("FAVC"), Some(&FeatureValue::Number(1.0)));
    }

    #[test]
    fn test_unmapped_caec_fails_loudly() {
        let raw = RawRecord {
            caec: "Jarang".into(),
            ..RawRecord::default()
        };
        assert_eq!(
            normalize(&raw).unwrap_err(),
            NormalizeError::Unmapped(UnmappedValueError::new("CAEC", "Jarang"))
        );
    }

    #[test]
    fn test_training_tokens_are_not_display_values() {
        // The form only ever sends display wording.
        let raw = RawRecord {
            gender: "Male".into(),
            ..RawRecord::default()
        };
        assert!(matches!(normalize(&raw), Err(NormalizeError::Unmapped(_))));

        let raw = RawRecord {
            smoke: "1".into(),
            ..RawRecord::default()
        };
        assert_eq!(
            normalize(&raw).unwrap_err(),
            NormalizeError::Unmapped(UnmappedValueError::new("SMOKE", "1"))
        );
    }

    #[test]
    fn test_out_of_range_integers() {
        let raw = RawRecord {
            ncp: 5,
            ..RawRecord::default()
        };
        assert_eq!(
            normalize(&raw).unwrap_err(),
            NormalizeError::OutOfRange {
                field: "NCP",
                value: 5,
                min: 1,
                max: 4
            }
        );

        let raw = RawRecord {
            faf: -1,
            ..RawRecord::default()
        };
        assert!(matches!(
            normalize(&raw),
            Err(NormalizeError::OutOfRange { field: "FAF", .. })
        ));
    }

    #[test]
    fn test_redacted_names_field_only() {
        let out_of_range = normalize(&RawRecord {
            ncp: 5,
            ..RawRecord::default()
        })
        .unwrap_err();
        assert_eq!(out_of_range.redacted(), "value out of range for field NCP");
        assert!(out_of_range.to_string().contains('5'));

        let unmapped = normalize(&RawRecord {
            mtrans: "Helikopter".into(),
            ..RawRecord::default()
        })
        .unwrap_err();
        assert_eq!(unmapped.redacted(), "unmapped value for field MTRANS");
        assert!(!unmapped.redacted().contains("Helikopter"));
    }

    #[test]
    fn test_row_shape_error_is_not_a_column_error() {
        let err = NormalizedRow::new(vec!["FCVC".into()], Vec::new())
            .map_err(NormalizeError::MalformedRow)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedRow(_)));
        assert_eq!(err.redacted(), "malformed row");
    }

    #[test]
    fn test_age_is_ignored() {
        let young = RawRecord {
            age: Some(14),
            ..RawRecord::default()
        };
        let absent = RawRecord {
            age: None,
            ..RawRecord::default()
        };
        assert_eq!(normalize(&young).unwrap(), normalize(&absent).unwrap());
    }

    #[test]
    fn test_projection_follows_any_column_order() {
        let record = normalize(&RawRecord::default()).unwrap();
        let mut columns = canonical();
        columns.reverse();
        columns.swap(2, 7);

        let row = project(&record, &columns).unwrap();
        assert_eq!(row.columns(), columns.as_slice());
        for (name, value) in row.columns().iter().zip(row.values()) {
            let column = Column::from_name(name).unwrap();
            assert_eq!(*value, record.value(column));
        }
    }

    #[test]
    fn test_projection_rejects_unknown_column() {
        let record = normalize(&RawRecord::default()).unwrap();
        let mut columns = canonical();
        columns.push("Age".into());
        assert_eq!(
            project(&record, &columns).unwrap_err(),
            NormalizeError::UnknownColumn("Age".into())
        );
    }

    #[test]
    fn test_raw_record_from_json() {
        let json = r#"{
            "gender": "Laki-laki", "family_history": "yes", "favc": "no",
            "fcvc": 3, "ncp": 3, "caec": "Sering", "smoke": "no", "ch2o": 2,
            "scc": "no", "faf": 2, "tue": 0, "calc": "Tidak", "mtrans": "Jalan Kaki"
        }"#;
        let raw: RawRecord = serde_json::from_str(json).expect("parse");
        assert_eq!(raw.age, None);
        let record = normalize(&raw).unwrap();
        assert_eq!(record.caec, Frequency::Frequently);
        assert_eq!(record.mtrans, Transport::Walking);
    }
}
