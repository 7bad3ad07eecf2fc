//! Finished games, ply by ply.
//!
//! A [`GameTranscript`] is the single place that knows the order of plies, and
//! therefore the single place allowed to decide which ply caused the end of the
//! game. [`GameTranscript::terminal_effect`] attaches a terminal effect to at
//! most two plies:
//!
//! - the final ply, when it produced a terminal position: `DeliveredWin` for a
//!   decisive ending the mover won, `CausedDraw` for a drawn ending;
//! - the loser's last ply in a decisive game: `AllowedLoss`.
//!
//! Every other ply gets `None`, whatever the result of the game.

use movelore_core::{
    BoardView, GameResult, GameRules, Move, MoveFacts, Position, RulesError, Side, TerminalCause,
};
use movelore_evaluator::credit::TerminalEffect;
use serde::{Deserialize, Serialize};

use crate::TrainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlyRecord {
    pub mover: Side,
    pub position_before: Position,
    pub mv: Move,
    pub position_after: Position,
    /// `None` when the collaborator could not describe the move.
    #[serde(default)]
    pub facts: Option<MoveFacts>,
    #[serde(default)]
    pub board_before: Option<BoardView>,
    #[serde(default)]
    pub board_after: Option<BoardView>,
    /// Legal moves for the opponent after this ply.
    #[serde(default)]
    pub legal_moves_after: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTranscript {
    pub game_id: String,
    pub plies: Vec<PlyRecord>,
    /// Result of the game for [`Side::First`].
    pub result_for_first: GameResult,
    /// Why the final position is terminal; `None` for adjudicated games.
    #[serde(default)]
    pub terminal_cause: Option<TerminalCause>,
}

impl GameTranscript {
    /// Replays `moves` from `start` through the collaborator.
    ///
    /// `result` is the final result seen from `perspective`. A move the
    /// collaborator cannot describe is kept with `facts: None`; a move it cannot
    /// apply aborts the replay.
    pub fn replay<R>(
        rules: &R,
        game_id: &str,
        start: &Position,
        moves: &[Move],
        perspective: Side,
        result: GameResult,
    ) -> Result<Self, TrainError>
    where
        R: GameRules + ?Sized,
    {
        let replay_error = |ply: usize, source: RulesError| TrainError::Replay {
            game_id: game_id.to_owned(),
            ply,
            source,
        };

        let mut plies = Vec::with_capacity(moves.len());
        let mut position = start.clone();
        for (ply, mv) in moves.iter().enumerate() {
            let facts = rules
                .describe_move(&position, mv)
                .inspect_err(|error| {
                    tracing::warn!(game_id, ply, mv = %mv, %error, "cannot describe move");
                })
                .ok();
            let board_before = rules.board_view(&position).ok();
            let next = rules
                .apply(&position, mv)
                .map_err(|source| replay_error(ply, source))?;
            let legal_moves_after = if rules.is_terminal(&next) {
                0
            } else {
                rules
                    .legal_moves(&next)
                    .inspect_err(|error| {
                        tracing::warn!(
                            game_id,
                            ply,
                            %error,
                            "cannot list legal moves; no mobility credit"
                        );
                    })
                    .map_or(0, |moves| moves.len())
            };
            let mover = facts
                .as_ref()
                .map(|f| f.mover)
                .or_else(|| board_before.as_ref().map(|b| b.side_to_move))
                .unwrap_or(if ply % 2 == 0 { Side::First } else { Side::Second });
            plies.push(PlyRecord {
                mover,
                position_before: position,
                mv: mv.clone(),
                position_after: next.clone(),
                facts,
                board_before,
                board_after: rules.board_view(&next).ok(),
                legal_moves_after,
            });
            position = next;
        }

        let terminal_cause = if rules.is_terminal(&position) {
            rules.terminal_cause(&position)
        } else {
            None
        };
        Ok(Self {
            game_id: game_id.to_owned(),
            plies,
            result_for_first: result.for_side(perspective, Side::First),
            terminal_cause,
        })
    }

    #[must_use]
    pub fn result_for(&self, side: Side) -> GameResult {
        self.result_for_first.for_side(Side::First, side)
    }

    /// Index of the last ply made by `side`.
    #[must_use]
    pub fn last_ply_of(&self, side: Side) -> Option<usize> {
        self.plies.iter().rposition(|p| p.mover == side)
    }

    /// Terminal effect attached to `ply`, if `ply` is a proximate cause of the
    /// game's end.
    ///
    /// A game that stopped before reaching a terminal position (truncated or
    /// adjudicated) attaches no effect to any ply.
    #[must_use]
    pub fn terminal_effect(&self, ply: usize) -> Option<TerminalEffect> {
        let mover = self.plies.get(ply)?.mover;
        let result = self.result_for(mover);
        let is_final = ply + 1 == self.plies.len();

        if is_final {
            match (self.terminal_cause, result) {
                (Some(cause), GameResult::Draw) if cause.is_draw() => {
                    return Some(TerminalEffect::CausedDraw(cause));
                }
                (Some(TerminalCause::Decisive), GameResult::Win) => {
                    return Some(TerminalEffect::DeliveredWin);
                }
                _ => {}
            }
        }
        (self.terminal_cause == Some(TerminalCause::Decisive)
            && result == GameResult::Loss
            && self.last_ply_of(mover) == Some(ply))
            .then_some(TerminalEffect::AllowedLoss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ply(index: usize) -> PlyRecord {
        PlyRecord {
            mover: if index % 2 == 0 { Side::First } else { Side::Second },
            position_before: Position::new(format!("p{index}")),
            mv: Move::new(format!("m{index}")),
            position_after: Position::new(format!("p{}", index + 1)),
            facts: None,
            board_before: None,
            board_after: None,
            legal_moves_after: 20,
        }
    }

    fn transcript(len: usize, result_for_first: GameResult, cause: Option<TerminalCause>) -> GameTranscript {
        GameTranscript {
            game_id: "g".to_owned(),
            plies: (0..len).map(ply).collect(),
            result_for_first,
            terminal_cause: cause,
        }
    }

    #[test]
    fn test_draw_is_attached_to_final_ply_only() {
        let t = transcript(3, GameResult::Draw, Some(TerminalCause::Repetition));
        assert_eq!(t.terminal_effect(0), None);
        assert_eq!(t.terminal_effect(1), None);
        assert_eq!(
            t.terminal_effect(2),
            Some(TerminalEffect::CausedDraw(TerminalCause::Repetition))
        );
        assert_eq!(t.terminal_effect(3), None);
    }

    #[test]
    fn test_decisive_game_marks_winner_and_loser() {
        // Second delivers mate on ply 3; First's last ply was ply 2.
        let t = transcript(4, GameResult::Loss, Some(TerminalCause::Decisive));
        assert_eq!(t.terminal_effect(0), None);
        assert_eq!(t.terminal_effect(1), None);
        assert_eq!(t.terminal_effect(2), Some(TerminalEffect::AllowedLoss));
        assert_eq!(t.terminal_effect(3), Some(TerminalEffect::DeliveredWin));
    }

    #[test]
    fn test_adjudicated_loss_has_no_effects() {
        for result in [GameResult::Win, GameResult::Loss] {
            let t = transcript(4, result, None);
            assert!((0..4).all(|i| t.terminal_effect(i).is_none()));
        }
    }

    #[test]
    fn test_drawn_terminal_does_not_mark_a_loser() {
        let t = transcript(4, GameResult::Loss, Some(TerminalCause::NoProgress));
        assert!((0..4).all(|i| t.terminal_effect(i).is_none()));
    }

    #[test]
    fn test_adjudicated_draw_has_no_effects() {
        let t = transcript(5, GameResult::Draw, None);
        assert!((0..5).all(|i| t.terminal_effect(i).is_none()));
    }

    #[test]
    fn test_result_for_second() {
        let t = transcript(2, GameResult::Win, None);
        assert_eq!(t.result_for(Side::First), GameResult::Win);
        assert_eq!(t.result_for(Side::Second), GameResult::Loss);
        assert_eq!(t.last_ply_of(Side::Second), Some(1));
    }

    #[test]
    fn test_transcript_json_defaults() {
        let json = r#"{
            "game_id": "g1",
            "result_for_first": "draw",
            "plies": [
                {"mover": "first", "position_before": "a", "mv": "x", "position_after": "b"}
            ]
        }"#;
        let t: GameTranscript = serde_json::from_str(json).unwrap();
        assert_eq!(t.plies.len(), 1);
        assert_eq!(t.terminal_cause, None);
        assert!(t.plies[0].facts.is_none());
    }
}
