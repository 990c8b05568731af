//! Hunter rank value object.
//!
//! Ranks are stored by the profile store as free-form strings ("E", "B", "S3",
//! "Sjp12", ...). They are parsed once at the boundary into [`Rank`] so the power
//! model never does string prefix matching.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base letter ranks, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterRank {
    E,
    D,
    C,
    B,
    A,
}

impl LetterRank {
    pub fn value(self) -> i64 {
        match self {
            Self::E => 1,
            Self::D => 3,
            Self::C => 6,
            Self::B => 12,
            Self::A => 20,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::E => "E",
            Self::D => "D",
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
        }
    }
}

/// Parsed hunter rank.
///
/// `STier(None)` / `SjpTier(None)` keep a recognized prefix whose numeral could not
/// be parsed; they score the prefix's base value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rank {
    Letter(LetterRank),
    STier(Option<i64>),
    SjpTier(Option<i64>),
    /// Anything else the profile store hands us. Scores like `E`.
    Unranked(String),
}

const S_BASE: i64 = 12;
const SJP_BASE: i64 = 200;
const UNRANKED_VALUE: i64 = 1;

impl Rank {
    /// Parse a stored rank string. Never fails: unknown strings become `Unranked`.
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix("Sjp") {
            return Self::SjpTier(rest.trim().parse().ok());
        }
        if let Some(rest) = raw.strip_prefix('S') {
            return Self::STier(rest.trim().parse().ok());
        }
        match raw {
            "E" => Self::Letter(LetterRank::E),
            "D" => Self::Letter(LetterRank::D),
            "C" => Self::Letter(LetterRank::C),
            "B" => Self::Letter(LetterRank::B),
            "A" => Self::Letter(LetterRank::A),
            other => Self::Unranked(other.to_string()),
        }
    }

    /// Tiered rank weight used by the power model.
    pub fn value(&self) -> i64 {
        match self {
            Self::Letter(letter) => letter.value(),
            Self::STier(n) => S_BASE.saturating_add(n.unwrap_or(0)),
            Self::SjpTier(n) => SJP_BASE.saturating_add(n.unwrap_or(0)),
            Self::Unranked(_) => UNRANKED_VALUE,
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self::Letter(LetterRank::E)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) => f.write_str(letter.as_str()),
            Self::STier(Some(n)) => write!(f, "S{}", n),
            Self::STier(None) => f.write_str("S"),
            Self::SjpTier(Some(n)) => write!(f, "Sjp{}", n),
            Self::SjpTier(None) => f.write_str("Sjp"),
            Self::Unranked(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for Rank {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Rank> for String {
    fn from(value: Rank) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_ranks_map_to_fixed_values() {
        let values: Vec<i64> = ["E", "D", "C", "B", "A"]
            .iter()
            .map(|r| Rank::parse(r).value())
            .collect();
        assert_eq!(values, vec![1, 3, 6, 12, 20]);
    }

    #[test]
    fn s_tier_adds_numeral_to_base() {
        assert_eq!(Rank::parse("S3"), Rank::STier(Some(3)));
        assert_eq!(Rank::parse("S3").value(), 15);
    }

    #[test]
    fn sjp_prefix_wins_over_s_prefix() {
        assert_eq!(Rank::parse("Sjp7"), Rank::SjpTier(Some(7)));
        assert_eq!(Rank::parse("Sjp7").value(), 207);
    }

    #[test]
    fn bad_numeral_falls_back_to_prefix_base() {
        assert_eq!(Rank::parse("Sx").value(), 12);
        assert_eq!(Rank::parse("S").value(), 12);
        assert_eq!(Rank::parse("Sjp?").value(), 200);
        assert_eq!(Rank::parse("S9223372036854775807").value(), i64::MAX);
        assert_eq!(Rank::parse("Sjp9223372036854775800").value(), i64::MAX);
    }

    #[test]
    fn unknown_rank_scores_one() {
        let rank = Rank::parse("Z");
        assert_eq!(rank, Rank::Unranked("Z".to_string()));
        assert_eq!(rank.value(), 1);
        assert_eq!(rank.to_string(), "Z");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Rank::parse("Sjp2")).expect("serialize");
        assert_eq!(json, "\"Sjp2\"");
        let back: Rank = serde_json::from_str("\"B\"").expect("deserialize");
        assert_eq!(back, Rank::Letter(LetterRank::B));
    }
}
