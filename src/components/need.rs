//! Need Kinds and Threshold Bands
//!
//! The small shared vocabulary: which resources exist, the four severity
//! bands a resource value falls into, and who may see a need on examine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of resource a need tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedKind {
    Hunger,
    Thirst,
}

impl NeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeedKind::Hunger => "hunger",
            NeedKind::Thirst => "thirst",
        }
    }
}

impl FromStr for NeedKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hunger" => Ok(NeedKind::Hunger),
            "thirst" => Ok(NeedKind::Thirst),
            _ => Err(()),
        }
    }
}

impl fmt::Display for NeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity band for a need value, ordered best to worst.
///
/// Bands partition the value range: each band owns the values at or above
/// its boundary that no less severe band claims. Critical's boundary is
/// pinned to the need's floor, so it is the fallback once nothing else
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    ExtraSatisfied = 0,
    Satisfied = 1,
    Low = 2,
    Critical = 3,
}

impl Band {
    /// All bands, least to most severe.
    pub const ALL: [Band; 4] = [Band::ExtraSatisfied, Band::Satisfied, Band::Low, Band::Critical];

    /// Index into per-band tables.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The next band down, if any.
    pub fn worse(&self) -> Option<Band> {
        match self {
            Band::ExtraSatisfied => Some(Band::Satisfied),
            Band::Satisfied => Some(Band::Low),
            Band::Low => Some(Band::Critical),
            Band::Critical => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::ExtraSatisfied => "extra_satisfied",
            Band::Satisfied => "satisfied",
            Band::Low => "low",
            Band::Critical => "critical",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a need is visible to when the actor is examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamineVisibility {
    /// Never shown.
    Hidden,
    /// Shown to anyone examining the actor.
    Everyone,
    /// Shown only to the actor themselves (admin inspection overrides).
    #[default]
    OwnerOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_order() {
        assert_eq!(Band::ALL[0], Band::ExtraSatisfied);
        assert_eq!(Band::ALL[3], Band::Critical);
        assert_eq!(Band::ExtraSatisfied.worse(), Some(Band::Satisfied));
        assert_eq!(Band::Critical.worse(), None);
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("hunger".parse::<NeedKind>(), Ok(NeedKind::Hunger));
        assert_eq!("thirst".parse::<NeedKind>(), Ok(NeedKind::Thirst));
        assert!("bloodlust".parse::<NeedKind>().is_err());
        assert_eq!(NeedKind::Hunger.as_str(), "hunger");
    }
}
