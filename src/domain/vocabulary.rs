//! Closed vocabularies for the categorical form fields.
//!
//! Every selectable display value (the Indonesian wording shown in the form)
//! maps to exactly one value of the vocabulary the artifacts were trained on.
//! Both directions are exhaustive `match`es, so adding a variant without
//! wording for it fails to compile.

use serde::{Deserialize, Serialize};

/// A categorical value that is not part of its field's closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unmapped value {value:?} for field {field}")]
pub struct UnmappedValueError {
    /// Canonical column the value was meant for.
    pub field: &'static str,
    /// The rejected input, verbatim.
    pub value: String,
}

impl UnmappedValueError {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// A closed enumeration with a display wording and a training token per variant.
pub trait Vocabulary: Copy + PartialEq + Sized + 'static {
    /// Every variant, in form order.
    const ALL: &'static [Self];

    /// Wording shown in the form.
    fn display(self) -> &'static str;

    /// Token the trained artifacts expect.
    fn training(self) -> &'static str;

    /// Map a display wording back to its variant.
    ///
    /// # Errors
    /// Returns [`UnmappedValueError`] if `value` is not a display wording of this vocabulary.
    fn from_display(field: &'static str, value: &str) -> Result<Self, UnmappedValueError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.display() == value)
            .ok_or_else(|| UnmappedValueError::new(field, value))
    }

    /// Map a training token back to its variant.
    ///
    /// # Errors
    /// Returns [`UnmappedValueError`] if `value` is not a training token of this vocabulary.
    fn from_training(field: &'static str, value: &str) -> Result<Self, UnmappedValueError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.training() == value)
            .ok_or_else(|| UnmappedValueError::new(field, value))
    }

    /// Training tokens of every variant.
    fn training_tokens() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.training()).collect()
    }
}

/// Biological sex as recorded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Vocabulary for Gender {
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn display(self) -> &'static str {
        match self {
            Self::Male => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }

    fn training(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Frequency scale shared by snacking (CAEC) and alcohol (CALC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    No,
    Sometimes,
    Frequently,
    Always,
}

impl Vocabulary for Frequency {
    const ALL: &'static [Self] = &[Self::No, Self::Sometimes, Self::Frequently, Self::Always];

    fn display(self) -> &'static str {
        match self {
            Self::No => "Tidak",
            Self::Sometimes => "Kadang-kadang",
            Self::Frequently => "Sering",
            Self::Always => "Selalu",
        }
    }

    fn training(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Sometimes => "Sometimes",
            Self::Frequently => "Frequently",
            Self::Always => "Always",
        }
    }
}

/// Main mode of transport (MTRANS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    Automobile,
    Motorbike,
    Bike,
    PublicTransportation,
    Walking,
}

impl Vocabulary for Transport {
    const ALL: &'static [Self] = &[
        Self::Automobile,
        Self::Motorbike,
        Self::Bike,
        Self::PublicTransportation,
        Self::Walking,
    ];

    fn display(self) -> &'static str {
        match self {
            Self::Automobile => "Mobil",
            Self::Motorbike => "Motor",
            Self::Bike => "Sepeda",
            Self::PublicTransportation => "Transportasi Umum",
            Self::Walking => "Jalan Kaki",
        }
    }

    fn training(self) -> &'static str {
        match self {
            Self::Automobile => "Automobile",
            Self::Motorbike => "Motorbike",
            Self::Bike => "Bike",
            Self::PublicTransportation => "Public_Transportation",
            Self::Walking => "Walking",
        }
    }
}

/// Yes/no answer of a radio button, normalized to 1/0 for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Numeric encoding used at training time.
    #[must_use]
    pub fn as_flag(self) -> u8 {
        match self {
            Self::Yes => 1,
            Self::No => 0,
        }
    }
}

impl Vocabulary for Answer {
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn display(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    fn training(self) -> &'static str {
        match self {
            Self::Yes => "1",
            Self::No => "0",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_bijective<V: Vocabulary + std::fmt::Debug>() {
        let displays: HashSet<_> = V::ALL.iter().map(|v| v.display()).collect();
        let tokens: HashSet<_> = V::ALL.iter().map(|v| v.training()).collect();
        assert_eq!(displays.len(), V::ALL.len(), "display wordings must be unique");
        assert_eq!(tokens.len(), V::ALL.len(), "training tokens must be unique");

        for v in V::ALL {
            assert_eq!(V::from_display("X", v.display()).unwrap(), *v);
            assert_eq!(V::from_training("X", v.training()).unwrap(), *v);
        }
    }

    #[test]
    fn test_vocabularies_are_bijective() {
        assert_bijective::<Gender>();
        assert_bijective::<Frequency>();
        assert_bijective::<Transport>();
        assert_bijective::<Answer>();
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(Gender::ALL.len(), 2);
        assert_eq!(Frequency::ALL.len(), 4);
        assert_eq!(Transport::ALL.len(), 5);
        assert_eq!(Answer::ALL.len(), 2);
    }

    #[test]
    fn test_training_tokens_match_original_vocabulary() {
        assert_eq!(Frequency::training_tokens(), vec!["no", "Sometimes", "Frequently", "Always"]);
        assert_eq!(
            Transport::training_tokens(),
            vec!["Automobile", "Motorbike", "Bike", "Public_Transportation", "Walking"]
        );
        assert_eq!(Gender::from_display("Gender", "Perempuan").unwrap(), Gender::Female);
    }

    #[test]
    fn test_unknown_display_value_is_rejected() {
        let err = Frequency::from_display("CAEC", "Jarang").unwrap_err();
        assert_eq!(err.field, "CAEC");
        assert_eq!(err.value, "Jarang");

        // Training tokens are not display wordings.
        assert!(Frequency::from_display("CALC", "Sometimes").is_err());
        assert!(Answer::from_display("SMOKE", "ya").is_err());
    }
}
