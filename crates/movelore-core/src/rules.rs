//! The boundary to the game-rule collaborator.
//!
//! movelore does not implement any game. Legal-move generation, move application,
//! terminal detection and introspection are supplied by a type implementing
//! [`GameRules`]. Everything the learning core needs to know about a single move
//! is condensed into [`MoveFacts`]; everything the geometric passes need to know
//! about a position is condensed into [`BoardView`].

use serde::{Deserialize, Serialize};

use crate::{
    game::{GameResult, Move, Outcome, Position, Side, TerminalCause},
    geometry::{BoardDims, BoardView, Square},
    piece::PieceClass,
};

/// Introspection of one move in one position, supplied by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFacts {
    pub mover: Side,
    pub piece: PieceClass,
    pub from: Square,
    pub to: Square,
    /// Class of the unit removed by this move, if any.
    #[serde(default)]
    pub captured: Option<PieceClass>,
    #[serde(default)]
    pub gives_check: bool,
    /// Plies since the last irreversible move, after this move.
    #[serde(default)]
    pub stagnation_counter: u32,
    /// Earlier occurrences of the resulting position.
    #[serde(default)]
    pub repetition_count: u32,
    /// Total material on the board after this move, in the collaborator's units.
    pub material_on_board: u32,
    /// Total material of the initial position, in the same units.
    pub material_at_start: u32,
    pub dims: BoardDims,
}

impl MoveFacts {
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RulesError {
    #[display("malformed position: {position}")]
    MalformedPosition { position: String },
    #[display("move {mv} is not legal in position {position}")]
    IllegalMove { position: String, mv: String },
    #[display("rule engine unavailable: {reason}")]
    Unavailable { reason: String },
}

impl RulesError {
    #[must_use]
    pub fn malformed(position: &Position) -> Self {
        RulesError::MalformedPosition {
            position: position.to_string(),
        }
    }

    #[must_use]
    pub fn illegal(position: &Position, mv: &Move) -> Self {
        RulesError::IllegalMove {
            position: position.to_string(),
            mv: mv.to_string(),
        }
    }
}

/// A concrete board game, as seen by the learning core.
pub trait GameRules {
    /// Applies `mv` to `position`.
    fn apply(&self, position: &Position, mv: &Move) -> Result<Position, RulesError>;

    /// All legal moves for the side to move.
    fn legal_moves(&self, position: &Position) -> Result<Vec<Move>, RulesError>;

    fn is_terminal(&self, position: &Position) -> bool;

    /// Result of `position` for `perspective`, or `Ongoing`.
    fn outcome(&self, position: &Position, perspective: Side) -> Outcome;

    /// Why a terminal position ended the game. `None` for non-terminal positions.
    fn terminal_cause(&self, position: &Position) -> Option<TerminalCause>;

    /// Introspection of `mv` played in `position`.
    fn describe_move(&self, position: &Position, mv: &Move) -> Result<MoveFacts, RulesError>;

    /// Geometric snapshot of `position`.
    fn board_view(&self, position: &Position) -> Result<BoardView, RulesError>;

    /// Convenience wrapper over [`outcome`](Self::outcome).
    fn result(&self, position: &Position, perspective: Side) -> Option<GameResult> {
        self.outcome(position, perspective).result()
    }
}
