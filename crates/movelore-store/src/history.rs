use movelore_core::{BoardView, GamePhase, GameResult, Move, Position, Side};
use serde::{Deserialize, Serialize};

/// One ply of one finished game, kept for the discovery pipeline.
///
/// Rows are append-only: a `(game_id, ply)` pair is written once and never
/// rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub game_id: String,
    pub ply: u32,
    /// Full-move number, starting at 1.
    pub move_number: u32,
    pub mover: Side,
    pub position_after: Position,
    pub mv: Move,
    /// Final game result from the mover's perspective.
    pub result_for_mover: GameResult,
    /// Material after the move, in the rule collaborator's units.
    pub material_on_board: u32,
    pub material_at_start: u32,
    pub board_after: BoardView,
}

impl HistoryRow {
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        GamePhase::from_material(self.material_on_board, self.material_at_start)
    }
}
