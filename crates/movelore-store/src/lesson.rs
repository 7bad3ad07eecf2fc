use std::fmt;

use movelore_core::{Move, Position, SignaturePair};
use serde::{Deserialize, Serialize};

/// What a remembered move taught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    /// The move lost material (or the game).
    Mistake,
    /// The move won material.
    Tactic,
}

impl LessonKind {
    pub const ALL: [LessonKind; 2] = [LessonKind::Mistake, LessonKind::Tactic];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LessonKind::Mistake => "mistake",
            LessonKind::Tactic => "tactic",
        }
    }

    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete `(position, move)` remembered as a mistake or a tactic.
///
/// `material_total` accumulates the swing of every sighting, so
/// `material_total / times_seen` is the average swing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonEntry {
    pub kind: LessonKind,
    pub position: Position,
    pub mv: Move,
    pub material_total: i64,
    pub times_seen: u64,
    pub signature: SignaturePair,
}

impl LessonEntry {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn avg_material(&self) -> f64 {
        if self.times_seen == 0 {
            return 0.0;
        }
        self.material_total as f64 / self.times_seen as f64
    }
}

/// One new sighting of a lesson, before it is merged into a [`LessonEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonObservation {
    pub kind: LessonKind,
    pub position: Position,
    pub mv: Move,
    /// Material lost (mistakes) or gained (tactics), always non-negative.
    pub material: i64,
    pub signature: SignaturePair,
}

/// Pooled statistics of every lesson sharing one [`SignaturePair`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonAggregate {
    /// Sum of `times_seen` over the pooled rows.
    pub samples: u64,
    pub material_total: i64,
    /// Number of distinct concrete positions pooled.
    pub distinct_positions: u64,
}

impl LessonAggregate {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn avg_material(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.material_total as f64 / self.samples as f64
    }
}
