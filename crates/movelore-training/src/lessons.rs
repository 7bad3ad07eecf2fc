//! Mistakes and tactics worth remembering.
//!
//! A ply's material swing is the value it captured minus the value the
//! opponent captured on the immediate reply. A large negative swing is a
//! mistake, a large positive one a tactic. The loser's last ply in a decisive
//! game is always a mistake, valued at `decisive_material`.

use movelore_core::{MaterialTable, MoveFacts};
use movelore_evaluator::credit::TerminalEffect;
use movelore_store::LessonKind;
use serde::{Deserialize, Serialize};

use crate::transcript::GameTranscript;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    pub material: MaterialTable,
    /// A swing of at least this much lost material is a mistake.
    pub mistake_min_loss: i64,
    /// A swing of at least this much gained material is a tactic.
    pub tactic_min_gain: i64,
    /// Material recorded for a ply that allowed a decisive loss.
    pub decisive_material: i64,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            material: MaterialTable::default(),
            mistake_min_loss: 100,
            tactic_min_gain: 200,
            decisive_material: 1000,
        }
    }
}

/// A lesson found in a transcript, before it is abstracted and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonCandidate {
    pub kind: LessonKind,
    /// Material lost or gained; always positive.
    pub material: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LessonExtractor {
    config: LessonConfig,
}

impl LessonExtractor {
    #[must_use]
    pub const fn new(config: LessonConfig) -> Self {
        Self { config }
    }

    /// Net material won by the ply at `index`, after the opponent's reply.
    ///
    /// Returns `None` when the ply has no facts.
    #[must_use]
    pub fn swing(&self, transcript: &GameTranscript, index: usize) -> Option<i64> {
        let ply = transcript.plies.get(index)?;
        let gained = self.captured_value(ply.facts.as_ref()?);
        let lost = transcript
            .plies
            .get(index + 1)
            .filter(|reply| reply.mover != ply.mover)
            .and_then(|reply| reply.facts.as_ref())
            .map_or(0, |facts| self.captured_value(facts));
        Some(gained - lost)
    }

    #[must_use]
    pub fn extract(
        &self,
        transcript: &GameTranscript,
        index: usize,
        effect: Option<TerminalEffect>,
    ) -> Option<LessonCandidate> {
        if effect == Some(TerminalEffect::AllowedLoss) {
            return Some(LessonCandidate {
                kind: LessonKind::Mistake,
                material: self.config.decisive_material,
            });
        }
        let swing = self.swing(transcript, index)?;
        if -swing >= self.config.mistake_min_loss {
            Some(LessonCandidate {
                kind: LessonKind::Mistake,
                material: -swing,
            })
        } else if swing >= self.config.tactic_min_gain {
            Some(LessonCandidate {
                kind: LessonKind::Tactic,
                material: swing,
            })
        } else {
            None
        }
    }

    fn captured_value(&self, facts: &MoveFacts) -> i64 {
        facts
            .captured
            .map_or(0, |class| self.config.material.value(class))
    }
}

#[cfg(test)]
mod tests {
    use movelore_core::{BoardDims, GameResult, Move, PieceClass, Position, Side, Square};

    use super::*;
    use crate::transcript::PlyRecord;

    fn ply(mover: Side, captured: Option<PieceClass>) -> PlyRecord {
        PlyRecord {
            mover,
            position_before: Position::new("before"),
            mv: Move::new("m"),
            position_after: Position::new("after"),
            facts: Some(MoveFacts {
                mover,
                piece: PieceClass::Knight,
                from: Square::new(1, 0),
                to: Square::new(2, 2),
                captured,
                gives_check: false,
                stagnation_counter: 0,
                repetition_count: 0,
                material_on_board: 7800,
                material_at_start: 7800,
                dims: BoardDims::new(8, 8),
            }),
            board_before: None,
            board_after: None,
            legal_moves_after: 20,
        }
    }

    fn transcript(plies: Vec<PlyRecord>) -> GameTranscript {
        GameTranscript {
            game_id: "g".to_owned(),
            plies,
            result_for_first: GameResult::Draw,
            terminal_cause: None,
        }
    }

    #[test]
    fn test_losing_exchange_is_mistake() {
        // Knight takes a pawn, queen is taken back.
        let t = transcript(vec![
            ply(Side::First, Some(PieceClass::Pawn)),
            ply(Side::Second, Some(PieceClass::Queen)),
        ]);
        let extractor = LessonExtractor::default();
        assert_eq!(extractor.swing(&t, 0), Some(-800));
        assert_eq!(
            extractor.extract(&t, 0, None),
            Some(LessonCandidate {
                kind: LessonKind::Mistake,
                material: 800,
            })
        );
    }

    #[test]
    fn test_winning_capture_is_tactic() {
        let t = transcript(vec![
            ply(Side::First, Some(PieceClass::Rook)),
            ply(Side::Second, None),
        ]);
        let lesson = LessonExtractor::default().extract(&t, 0, None).unwrap();
        assert_eq!(lesson.kind, LessonKind::Tactic);
        assert_eq!(lesson.material, 500);
    }

    #[test]
    fn test_small_swings_are_ignored() {
        let t = transcript(vec![
            ply(Side::First, Some(PieceClass::Knight)),
            ply(Side::Second, Some(PieceClass::Knight)),
        ]);
        assert_eq!(LessonExtractor::default().extract(&t, 0, None), None);
        // A pawn for nothing is below the tactic threshold.
        let t = transcript(vec![ply(Side::First, Some(PieceClass::Pawn))]);
        assert_eq!(LessonExtractor::default().extract(&t, 0, None), None);
    }

    #[test]
    fn test_allowed_loss_is_decisive_mistake() {
        let t = transcript(vec![ply(Side::First, None), ply(Side::Second, None)]);
        let lesson = LessonExtractor::default()
            .extract(&t, 0, Some(TerminalEffect::AllowedLoss))
            .unwrap();
        assert_eq!(lesson.kind, LessonKind::Mistake);
        assert_eq!(lesson.material, 1000);
    }

    #[test]
    fn test_undescribed_ply_has_no_swing() {
        let mut undescribed = ply(Side::First, None);
        undescribed.facts = None;
        let t = transcript(vec![undescribed]);
        assert_eq!(LessonExtractor::default().swing(&t, 0), None);
    }
}
