//! Output vocabulary of the geometric discovery pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a family's presence is expected to help or hurt its owner.
///
/// The discovery pipeline does not trust this expectation for individual
/// signatures; it only decides which signatures (positive or negative value
/// estimates) feed the family's summary weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Reward,
    Penalty,
}

/// A family of geometric relations mined from positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFamily {
    /// A piece attacks two or more enemy-occupied squares.
    Fork,
    /// A ray attack on a piece shielding a more valuable piece.
    Pin,
    /// A ray attack on a piece shielding a less valuable piece.
    Skewer,
    /// Distance of a piece from the board centre.
    Centralization,
    /// Another friendly piece of the same class shares the file.
    Doubled,
    /// No friendly piece of the same class on adjacent files.
    Isolated,
    /// No enemy piece of the same class ahead on this or adjacent files.
    Passed,
    /// Attacked by the enemy and not defended.
    Hanging,
}

impl PatternFamily {
    pub const ALL: [PatternFamily; 8] = [
        PatternFamily::Fork,
        PatternFamily::Pin,
        PatternFamily::Skewer,
        PatternFamily::Centralization,
        PatternFamily::Doubled,
        PatternFamily::Isolated,
        PatternFamily::Passed,
        PatternFamily::Hanging,
    ];

    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            PatternFamily::Fork
            | PatternFamily::Pin
            | PatternFamily::Skewer
            | PatternFamily::Centralization
            | PatternFamily::Passed => Polarity::Reward,
            PatternFamily::Doubled | PatternFamily::Isolated | PatternFamily::Hanging => {
                Polarity::Penalty
            }
        }
    }

    /// Tactical relations are rare; structural ones show up in most positions.
    #[must_use]
    pub const fn is_rare(self) -> bool {
        matches!(
            self,
            PatternFamily::Fork | PatternFamily::Pin | PatternFamily::Skewer
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PatternFamily::Fork => "fork",
            PatternFamily::Pin => "pin",
            PatternFamily::Skewer => "skewer",
            PatternFamily::Centralization => "centralization",
            PatternFamily::Doubled => "doubled",
            PatternFamily::Isolated => "isolated",
            PatternFamily::Passed => "passed",
            PatternFamily::Hanging => "hanging",
        }
    }

    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.as_str() == s)
    }
}

impl fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geometric signature whose correlation with the result has enough support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredPattern {
    pub signature: String,
    pub family: PatternFamily,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// `(wins + draws / 2) / frequency`.
    pub win_rate: f64,
    pub value_estimate: f64,
    /// Number of occurrences, `wins + losses + draws`.
    pub frequency: u64,
}

/// Scalar evaluation weight summarising one family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyWeight {
    pub family: PatternFamily,
    pub weight: f64,
    pub signatures_used: u64,
    pub total_frequency: u64,
}
