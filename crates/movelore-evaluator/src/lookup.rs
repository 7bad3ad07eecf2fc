//! Advisory two-tier lookup of remembered mistakes and tactics.
//!
//! Tier 1 is an exact `(position, move)` match. Tier 2 pools every remembered
//! lesson whose [`SignaturePair`] matches the candidate's, and only speaks up
//! when the pool is large enough and its average material swing is large
//! enough; a single unlucky observation never generalizes.
//!
//! The lookup is a small state machine, run once per [`LessonKind`] (mistakes
//! first):
//!
//! ```text
//! Start --exact row--> Hit
//!   |
//!   v
//! ExactMiss -> TryAbstracted --pool passes thresholds--> Hit
//!                    |
//!                    v
//!                   Miss
//! ```
//!
//! Signals are advisory. Callers may down-weight or skip a flagged move; the
//! lookup never changes which moves are legal.

use movelore_core::{GameRules, Move, Position, SignaturePair};
use movelore_stats::confidence::saturation;
use movelore_store::{LessonAggregate, LessonEntry, LessonKind, LessonRepository, StoreError};
use serde::{Deserialize, Serialize};

use crate::abstraction::Abstractor;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Pooled samples must exceed this for a tier-2 signal.
    pub min_samples: u64,
    /// Pooled average material must exceed this for a tier-2 signal.
    pub min_avg_material: f64,
    /// Samples needed for full signal confidence.
    pub confidence_saturation: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            min_samples: 3,
            min_avg_material: 150.0,
            confidence_saturation: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LessonSignal {
    pub kind: LessonKind,
    /// `true` for a tier-1 match on the exact position and move.
    pub is_exact: bool,
    pub avg_material: f64,
    pub samples: u64,
    pub confidence: f64,
}

#[derive(Debug)]
enum LookupState {
    Start,
    ExactMiss,
    TryAbstracted,
    Hit(LessonSignal),
    Miss,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LessonLookup {
    config: LookupConfig,
}

impl LessonLookup {
    #[must_use]
    pub const fn new(config: LookupConfig) -> Self {
        Self { config }
    }

    pub fn check<R>(
        &self,
        repo: &R,
        position: &Position,
        mv: &Move,
        signature: &SignaturePair,
    ) -> Result<Option<LessonSignal>, StoreError>
    where
        R: LessonRepository + ?Sized,
    {
        self.check_with(repo, position, mv, || Some(signature.clone()))
    }

    /// Like [`check`](Self::check), but abstracts the move through the rule
    /// collaborator only if no exact row exists.
    ///
    /// A move the collaborator can not describe is only checked exactly.
    pub fn check_rules<R, G>(
        &self,
        repo: &R,
        rules: &G,
        abstractor: &Abstractor,
        position: &Position,
        mv: &Move,
    ) -> Result<Option<LessonSignal>, StoreError>
    where
        R: LessonRepository + ?Sized,
        G: GameRules + ?Sized,
    {
        self.check_with(repo, position, mv, || {
            abstractor
                .describe(rules, position, mv)
                .inspect_err(|error| {
                    tracing::warn!(
                        position = %position,
                        mv = %mv,
                        %error,
                        "cannot abstract move; skipping generalized lookup"
                    );
                })
                .ok()
        })
    }

    /// Runs the lookup. `signature` is evaluated at most once, and only when no
    /// exact row matches.
    pub fn check_with<R, F>(
        &self,
        repo: &R,
        position: &Position,
        mv: &Move,
        signature: F,
    ) -> Result<Option<LessonSignal>, StoreError>
    where
        R: LessonRepository + ?Sized,
        F: FnOnce() -> Option<SignaturePair>,
    {
        let mut supplier = Some(signature);
        let mut computed: Option<Option<SignaturePair>> = None;

        for kind in LessonKind::ALL {
            let mut state = LookupState::Start;
            loop {
                state = match state {
                    LookupState::Start => match repo.lesson(kind, position, mv)? {
                        Some(entry) => LookupState::Hit(self.exact_signal(&entry)),
                        None => LookupState::ExactMiss,
                    },
                    LookupState::ExactMiss => LookupState::TryAbstracted,
                    LookupState::TryAbstracted => {
                        let signature =
                            computed.get_or_insert_with(|| supplier.take().and_then(|f| f()));
                        match signature {
                            Some(signature) => {
                                let pooled = repo.lesson_aggregate(kind, signature)?;
                                self.pooled_signal(kind, &pooled)
                                    .map_or(LookupState::Miss, LookupState::Hit)
                            }
                            None => LookupState::Miss,
                        }
                    }
                    LookupState::Hit(signal) => return Ok(Some(signal)),
                    LookupState::Miss => break,
                };
            }
        }
        Ok(None)
    }

    fn exact_signal(&self, entry: &LessonEntry) -> LessonSignal {
        LessonSignal {
            kind: entry.kind,
            is_exact: true,
            avg_material: entry.avg_material(),
            samples: entry.times_seen,
            confidence: saturation(entry.times_seen, self.config.confidence_saturation),
        }
    }

    fn pooled_signal(&self, kind: LessonKind, pooled: &LessonAggregate) -> Option<LessonSignal> {
        let avg_material = pooled.avg_material();
        (pooled.samples > self.config.min_samples && avg_material > self.config.min_avg_material)
            .then(|| LessonSignal {
                kind,
                is_exact: false,
                avg_material,
                samples: pooled.samples,
                confidence: saturation(pooled.samples, self.config.confidence_saturation),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use movelore_core::Signature;
    use movelore_store::{LessonObservation, MemoryStore};

    use super::*;

    fn signature(tag: &str) -> SignaturePair {
        SignaturePair {
            position_pattern: Signature::new("middlegame|own|b+0|calm"),
            move_pattern: Signature::new(tag),
        }
    }

    fn remember(store: &mut MemoryStore, kind: LessonKind, position: &str, material: i64, tag: &str) {
        store
            .record_lesson(&LessonObservation {
                kind,
                position: Position::new(position),
                mv: Move::new("m"),
                material,
                signature: signature(tag),
            })
            .unwrap();
    }

    #[test]
    fn test_exact_hit_skips_abstraction() {
        let mut store = MemoryStore::default();
        remember(&mut store, LessonKind::Mistake, "p1", 40, "queen|quiet");
        let called = Cell::new(false);

        let signal = LessonLookup::default()
            .check_with(&store, &Position::new("p1"), &Move::new("m"), || {
                called.set(true);
                None
            })
            .unwrap()
            .unwrap();
        assert!(signal.is_exact);
        assert_eq!(signal.kind, LessonKind::Mistake);
        assert_eq!(signal.samples, 1);
        assert!(!called.get());
    }

    #[test]
    fn test_pooled_signal_needs_more_than_min_samples() {
        let mut store = MemoryStore::default();
        for position in ["p1", "p2", "p3"] {
            remember(&mut store, LessonKind::Mistake, position, 500, "queen|quiet");
        }
        let lookup = LessonLookup::default();
        let candidate = Position::new("fresh");
        let pair = signature("queen|quiet");
        assert_eq!(lookup.check(&store, &candidate, &Move::new("m"), &pair).unwrap(), None);

        remember(&mut store, LessonKind::Mistake, "p4", 500, "queen|quiet");
        let signal = lookup
            .check(&store, &candidate, &Move::new("m"), &pair)
            .unwrap()
            .unwrap();
        assert!(!signal.is_exact);
        assert_eq!(signal.samples, 4);
        assert_eq!(signal.avg_material, 500.0);
    }

    #[test]
    fn test_pooled_signal_needs_material() {
        let mut store = MemoryStore::default();
        for position in ["p1", "p2", "p3", "p4", "p5"] {
            remember(&mut store, LessonKind::Mistake, position, 150, "pawn|quiet");
        }
        let lookup = LessonLookup::default();
        let result = lookup
            .check(&store, &Position::new("fresh"), &Move::new("m"), &signature("pawn|quiet"))
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_tactic_reported_when_no_mistake() {
        let mut store = MemoryStore::default();
        for position in ["p1", "p2", "p3", "p4"] {
            remember(&mut store, LessonKind::Tactic, position, 900, "knight|capture");
        }
        remember(&mut store, LessonKind::Mistake, "p1", 900, "other");
        let signal = LessonLookup::default()
            .check(&store, &Position::new("fresh"), &Move::new("m"), &signature("knight|capture"))
            .unwrap()
            .unwrap();
        assert_eq!(signal.kind, LessonKind::Tactic);
    }

    #[test]
    fn test_signature_is_computed_once() {
        let store = MemoryStore::default();
        let calls = Cell::new(0);
        let result = LessonLookup::default()
            .check_with(&store, &Position::new("p"), &Move::new("m"), || {
                calls.set(calls.get() + 1);
                Some(signature("x"))
            })
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(calls.get(), 1);
    }
}
