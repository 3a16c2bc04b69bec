//! Contribution amount parsing and validation.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Smallest contribution the flow accepts, in native units.
pub const MIN_CONTRIBUTION: f64 = 0.001;

/// Why a raw amount was rejected. Shown inline; the form stays editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid amount")]
    InvalidFormat,

    #[error("below minimum")]
    BelowMinimum,
}

/// A validated, strictly positive contribution amount at or above [`MIN_CONTRIBUTION`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ContributionAmount(f64);

impl ContributionAmount {
    /// Validate raw user input.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a finite number
    /// greater than zero is `InvalidFormat`; positive values under the floor are
    /// `BelowMinimum`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !looks_decimal(trimmed) {
            return Err(ValidationError::InvalidFormat);
        }

        let value = f64::from_str(trimmed).map_err(|_| ValidationError::InvalidFormat)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::InvalidFormat);
        }
        if value < MIN_CONTRIBUTION {
            return Err(ValidationError::BelowMinimum);
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for ContributionAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ContributionAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl FromStr for ContributionAmount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// `f64::from_str` also accepts "inf", "NaN" and "infinity"; restrict input to
// plain decimal notation with an optional exponent.
fn looks_decimal(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        && text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_decimals() {
        assert_eq!(ContributionAmount::parse("1.5").unwrap().value(), 1.5);
        assert_eq!(ContributionAmount::parse(" 2 ").unwrap().value(), 2.0);
        assert_eq!(ContributionAmount::parse("0.001").unwrap().value(), 0.001);
        assert_eq!(ContributionAmount::parse("1e-2").unwrap().value(), 0.01);
    }

    #[test]
    fn zero_and_negative_are_invalid_format() {
        assert_eq!(
            ContributionAmount::parse("0"),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(
            ContributionAmount::parse("-1"),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(
            ContributionAmount::parse("0.000"),
            Err(ValidationError::InvalidFormat)
        );
    }

    #[test]
    fn non_numeric_input_is_invalid_format() {
        for raw in ["", "   ", "abc", "1.5eth", "1,5", ".", "inf", "NaN", "infinity", "1e999"] {
            assert_eq!(
                ContributionAmount::parse(raw),
                Err(ValidationError::InvalidFormat),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn values_under_the_floor_are_below_minimum() {
        assert_eq!(
            ContributionAmount::parse("0.0009"),
            Err(ValidationError::BelowMinimum)
        );
        assert_eq!(
            ContributionAmount::parse("1e-4"),
            Err(ValidationError::BelowMinimum)
        );
    }

    #[test]
    fn success_iff_finite_and_at_least_the_floor() {
        let samples = [
            "0.0001", "0.00099", "0.001", "0.0011", "0.5", "1", "42.42", "1000000", "-0.5",
        ];
        for raw in samples {
            let parsed: f64 = raw.parse().unwrap();
            let expected = parsed.is_finite() && parsed >= MIN_CONTRIBUTION;
            assert_eq!(ContributionAmount::parse(raw).is_ok(), expected, "input {raw:?}");
        }
    }

    #[test]
    fn parsing_is_repeatable() {
        let first = ContributionAmount::parse("3.25");
        let second = ContributionAmount::parse("3.25");
        assert_eq!(first, second);
    }

    #[test]
    fn error_messages_match_user_taxonomy() {
        assert_eq!(ValidationError::InvalidFormat.to_string(), "invalid amount");
        assert_eq!(ValidationError::BelowMinimum.to_string(), "below minimum");
    }
}
