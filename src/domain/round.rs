use crate::domain::errors::RoundError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest digit a round can produce.
pub const MAX_ROUND_NUMBER: u8 = 9;

/// Binary class of a round's number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeClass {
    Low,
    High,
}

impl OutcomeClass {
    /// `High` iff `number >= 5`.
    pub fn of(number: u8) -> Self {
        if number >= 5 { Self::High } else { Self::Low }
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeClass::Low => write!(f, "LOW"),
            OutcomeClass::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for OutcomeClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(OutcomeClass::Low),
            "HIGH" => Ok(OutcomeClass::High),
            _ => anyhow::bail!("Invalid outcome class: {}. Must be 'LOW' or 'HIGH'", s),
        }
    }
}

/// One resolved round from the feed.
///
/// The class is derived on construction and never stored apart from its number,
/// so the fields stay private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Round {
    id: u64,
    number: u8,
    class: OutcomeClass,
}

impl Round {
    pub fn new(id: u64, number: u8) -> Result<Self, RoundError> {
        if number > MAX_ROUND_NUMBER {
            return Err(RoundError::NumberOutOfRange { id, number });
        }
        Ok(Self {
            id,
            number,
            class: OutcomeClass::of(number),
        })
    }

    /// Builds a round from the raw text fields the upstream feed returns.
    pub fn from_raw(raw_id: &str, raw_number: &str) -> Result<Self, RoundError> {
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            return Err(RoundError::MissingId);
        }
        let id = raw_id
            .parse::<u64>()
            .map_err(|_| RoundError::InvalidId(raw_id.to_string()))?;
        let number = raw_number
            .trim()
            .parse::<u8>()
            .map_err(|_| RoundError::InvalidNumber {
                id,
                raw: raw_number.to_string(),
            })?;
        Self::new(id, number)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn class(&self) -> OutcomeClass {
        self.class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_boundary() {
        for n in 0..=4 {
            assert_eq!(OutcomeClass::of(n), OutcomeClass::Low, "number {}", n);
        }
        for n in 5..=9 {
            assert_eq!(OutcomeClass::of(n), OutcomeClass::High, "number {}", n);
        }
    }

    #[test]
    fn test_round_class_follows_number() {
        let round = Round::new(100, 5).unwrap();
        assert_eq!(round.class(), OutcomeClass::High);
        let round = Round::new(101, 4).unwrap();
        assert_eq!(round.class(), OutcomeClass::Low);
    }

    #[test]
    fn test_round_rejects_out_of_range_number() {
        assert_eq!(
            Round::new(7, 10),
            Err(RoundError::NumberOutOfRange { id: 7, number: 10 })
        );
    }

    #[test]
    fn test_from_raw() {
        let round = Round::from_raw(" 20240101001 ", "8").unwrap();
        assert_eq!(round.id(), 20240101001);
        assert_eq!(round.number(), 8);

        assert_eq!(Round::from_raw("", "3"), Err(RoundError::MissingId));
        assert!(matches!(
            Round::from_raw("12", "x"),
            Err(RoundError::InvalidNumber { id: 12, .. })
        ));
        assert!(matches!(
            Round::from_raw("abc", "3"),
            Err(RoundError::InvalidId(_))
        ));
    }

    #[test]
    fn test_outcome_class_parse_and_display() {
        assert_eq!("high".parse::<OutcomeClass>().unwrap(), OutcomeClass::High);
        assert_eq!(OutcomeClass::Low.to_string(), "LOW");
        assert!("big".parse::<OutcomeClass>().is_err());
    }
}
