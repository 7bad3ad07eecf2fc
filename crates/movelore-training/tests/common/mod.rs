//! A game whose every move is written down in advance.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use movelore_core::{
    BoardDims, BoardView, GameRules, Move, MoveFacts, Outcome, PieceClass, PlacedPiece, Position,
    RulesError, Side, Square, TerminalCause,
};

pub const START_MATERIAL: u32 = 7800;

#[derive(Debug, Clone)]
struct Step {
    next: Position,
    facts: Option<MoveFacts>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedRules {
    steps: HashMap<(Position, Move), Step>,
    terminal: HashMap<Position, TerminalCause>,
    unlistable: HashSet<Position>,
    legal_moves: usize,
}

impl ScriptedRules {
    pub fn new(legal_moves: usize) -> Self {
        Self {
            legal_moves,
            ..Self::default()
        }
    }

    pub fn step(mut self, from: &str, mv: &str, to: &str, facts: Option<MoveFacts>) -> Self {
        self.steps.insert(
            (Position::new(from), Move::new(mv)),
            Step {
                next: Position::new(to),
                facts,
            },
        );
        self
    }

    pub fn terminal(mut self, position: &str, cause: TerminalCause) -> Self {
        self.terminal.insert(Position::new(position), cause);
        self
    }

    /// Makes `legal_moves` fail in `position`.
    pub fn unlistable(mut self, position: &str) -> Self {
        self.unlistable.insert(Position::new(position));
        self
    }
}

impl GameRules for ScriptedRules {
    fn apply(&self, position: &Position, mv: &Move) -> Result<Position, RulesError> {
        self.steps
            .get(&(position.clone(), mv.clone()))
            .map(|step| step.next.clone())
            .ok_or_else(|| RulesError::illegal(position, mv))
    }

    fn legal_moves(&self, position: &Position) -> Result<Vec<Move>, RulesError> {
        if self.unlistable.contains(position) {
            return Err(RulesError::Unavailable {
                reason: format!("no move list for {position}"),
            });
        }
        Ok((0..self.legal_moves)
            .map(|i| Move::new(format!("any{i}")))
            .collect())
    }

    fn is_terminal(&self, position: &Position) -> bool {
        self.terminal.contains_key(position)
    }

    fn outcome(&self, position: &Position, _perspective: Side) -> Outcome {
        match self.terminal.get(position) {
            Some(cause) if cause.is_draw() => Outcome::Draw,
            Some(_) => Outcome::Loss,
            None => Outcome::Ongoing,
        }
    }

    fn terminal_cause(&self, position: &Position) -> Option<TerminalCause> {
        self.terminal.get(position).copied()
    }

    fn describe_move(&self, position: &Position, mv: &Move) -> Result<MoveFacts, RulesError> {
        self.steps
            .get(&(position.clone(), mv.clone()))
            .and_then(|step| step.facts.clone())
            .ok_or_else(|| RulesError::Unavailable {
                reason: format!("no facts for {mv}"),
            })
    }

    fn board_view(&self, _position: &Position) -> Result<BoardView, RulesError> {
        Ok(BoardView {
            dims: BoardDims::new(8, 8),
            side_to_move: Side::First,
            pieces: vec![
                PlacedPiece {
                    class: PieceClass::King,
                    side: Side::First,
                    square: Square::new(4, 0),
                },
                PlacedPiece {
                    class: PieceClass::King,
                    side: Side::Second,
                    square: Square::new(4, 7),
                },
            ],
            attacks: vec![],
        })
    }
}

/// A non-developing move of `piece` in the middle of the board.
pub fn facts(mover: Side, piece: PieceClass, captured: Option<PieceClass>) -> MoveFacts {
    MoveFacts {
        mover,
        piece,
        from: Square::new(3, 4),
        to: Square::new(3, 3),
        captured,
        gives_check: false,
        stagnation_counter: 0,
        repetition_count: 0,
        material_on_board: START_MATERIAL,
        material_at_start: START_MATERIAL,
        dims: BoardDims::new(8, 8),
    }
}
