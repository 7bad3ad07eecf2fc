//! The fixed-shape key under which move statistics are aggregated.
//!
//! A [`FeatureRecord`] is a coarse, discretized description of a move in its
//! position context. Every field is a small closed domain, so the full tuple is
//! usable as a database key and as a hash map key, and equality is checked by
//! the compiler rather than by string comparison.
//!
//! # Fields
//!
//! | field | domain |
//! |---|---|
//! | `piece_class` | [`PieceClass`] of the mover |
//! | `move_class` | [`MoveClass`] |
//! | `distance_bucket` | `0..=7`, ranks between the destination and the mover's home rank |
//! | `repetition_bucket` | `0..=2`, earlier occurrences of the resulting position |
//! | `stagnation_bucket` | `0..=5`, no-progress counter in steps of 20 plies |
//! | `material_level` | [`MaterialLevel`] |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::PieceClass;

pub const MAX_DISTANCE_BUCKET: u8 = 7;
pub const MAX_REPETITION_BUCKET: u8 = 2;
pub const MAX_STAGNATION_BUCKET: u8 = 5;
pub const STAGNATION_BUCKET_WIDTH: u32 = 20;

/// Tactical class of a move, in default-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveClass {
    /// Captures and gives check at once.
    ForcingCaptureCheck,
    Capture,
    Check,
    /// Starts within the mover's home zone and ends farther from home.
    Development,
    Quiet,
}

impl MoveClass {
    pub const ALL: [MoveClass; 5] = [
        MoveClass::ForcingCaptureCheck,
        MoveClass::Capture,
        MoveClass::Check,
        MoveClass::Development,
        MoveClass::Quiet,
    ];

    #[must_use]
    pub const fn from_flags(is_capture: bool, gives_check: bool, is_development: bool) -> Self {
        match (is_capture, gives_check) {
            (true, true) => MoveClass::ForcingCaptureCheck,
            (true, false) => MoveClass::Capture,
            (false, true) => MoveClass::Check,
            (false, false) if is_development => MoveClass::Development,
            (false, false) => MoveClass::Quiet,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MoveClass::ForcingCaptureCheck => "forcing_capture_check",
            MoveClass::Capture => "capture",
            MoveClass::Check => "check",
            MoveClass::Development => "development",
            MoveClass::Quiet => "quiet",
        }
    }

    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.as_str() == s)
    }
}

impl fmt::Display for MoveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much material is left relative to the starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialLevel {
    Low,
    Medium,
    High,
}

impl MaterialLevel {
    pub const HIGH_FRACTION: f64 = 0.70;
    pub const MEDIUM_FRACTION: f64 = 0.35;

    /// Buckets the remaining material fraction.
    ///
    /// A zero starting total is treated as a full board.
    #[must_use]
    pub fn from_material(on_board: u32, at_start: u32) -> Self {
        if at_start == 0 {
            return MaterialLevel::High;
        }
        let fraction = f64::from(on_board) / f64::from(at_start);
        if fraction >= Self::HIGH_FRACTION {
            MaterialLevel::High
        } else if fraction >= Self::MEDIUM_FRACTION {
            MaterialLevel::Medium
        } else {
            MaterialLevel::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MaterialLevel::Low => "low",
            MaterialLevel::Medium => "medium",
            MaterialLevel::High => "high",
        }
    }

    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(MaterialLevel::Low),
            "medium" => Some(MaterialLevel::Medium),
            "high" => Some(MaterialLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for MaterialLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse game stage, derived from the same material fraction as [`MaterialLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    #[must_use]
    pub fn from_material(on_board: u32, at_start: u32) -> Self {
        Self::from(MaterialLevel::from_material(on_board, at_start))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhase::Opening => "opening",
            GamePhase::Middlegame => "middlegame",
            GamePhase::Endgame => "endgame",
        }
    }
}

impl From<MaterialLevel> for GamePhase {
    fn from(level: MaterialLevel) -> Self {
        match level {
            MaterialLevel::High => GamePhase::Opening,
            MaterialLevel::Medium => GamePhase::Middlegame,
            MaterialLevel::Low => GamePhase::Endgame,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discretized description of a move, used as the statistics key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub piece_class: PieceClass,
    pub move_class: MoveClass,
    pub distance_bucket: u8,
    pub repetition_bucket: u8,
    pub stagnation_bucket: u8,
    pub material_level: MaterialLevel,
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/d{}/r{}/s{}/{}",
            self.piece_class,
            self.move_class,
            self.distance_bucket,
            self.repetition_bucket,
            self.stagnation_bucket,
            self.material_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_class_from_flags() {
        assert_eq!(
            MoveClass::from_flags(true, true, true),
            MoveClass::ForcingCaptureCheck
        );
        assert_eq!(MoveClass::from_flags(true, false, true), MoveClass::Capture);
        assert_eq!(MoveClass::from_flags(false, true, true), MoveClass::Check);
        assert_eq!(
            MoveClass::from_flags(false, false, true),
            MoveClass::Development
        );
        assert_eq!(MoveClass::from_flags(false, false, false), MoveClass::Quiet);
    }

    #[test]
    fn test_move_class_order_matches_default_priority() {
        let mut classes = MoveClass::ALL;
        classes.sort();
        assert_eq!(classes, MoveClass::ALL);
    }

    #[test]
    fn test_material_level_thresholds() {
        assert_eq!(MaterialLevel::from_material(78, 78), MaterialLevel::High);
        assert_eq!(MaterialLevel::from_material(55, 78), MaterialLevel::High);
        assert_eq!(MaterialLevel::from_material(30, 78), MaterialLevel::Medium);
        assert_eq!(MaterialLevel::from_material(10, 78), MaterialLevel::Low);
        assert_eq!(MaterialLevel::from_material(0, 0), MaterialLevel::High);
    }

    #[test]
    fn test_db_strings_round_trip() {
        for class in MoveClass::ALL {
            assert_eq!(MoveClass::from_db_str(class.as_str()), Some(class));
        }
        for level in [MaterialLevel::Low, MaterialLevel::Medium, MaterialLevel::High] {
            assert_eq!(MaterialLevel::from_db_str(level.as_str()), Some(level));
        }
    }
}
