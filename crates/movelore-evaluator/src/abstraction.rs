//! Coordinate-free signatures for generalized lookup.
//!
//! Two abstractions are provided, both pure functions of their inputs:
//!
//! - [`Abstractor::abstract_position`] describes a position coarsely: game
//!   phase, who is to move, material balance and whether the side to move is
//!   in check.
//! - [`Abstractor::abstract_move`] describes a move by its local situation only.
//!
//! # Move signature
//!
//! Absolute coordinates never appear. Every displacement is expressed relative
//! to the mover: `+dy` is the mover's forward direction, and the frame is
//! reflected left/right so that the move's lateral component is non-negative.
//! A purely vertical move is encoded in both reflections and the
//! lexicographically smaller encoding wins.
//!
//! The signature keeps, in order:
//!
//! | part | meaning |
//! |---|---|
//! | piece | class of the moving piece |
//! | class | [`MoveClass`] of the move |
//! | `x` | class of the captured piece, `-` for none |
//! | `v` | relative move vector |
//! | half | whether the destination is in the mover's own or the opponent's half |
//! | `a`/`d`/`o` | enemy attackers of the destination, own defenders of the destination (mover excluded), enemy attackers of the origin; each capped |
//! | `n` | every other piece within the neighbourhood radius of the destination as `dx,dy,f/e,class` |
//! | phase | [`GamePhase`] from the material fraction |
//!
//! Pieces outside the neighbourhood radius only influence the signature
//! through the attacker and defender counts.

use std::fmt::Write as _;

use movelore_core::{
    BoardDims, BoardView, GamePhase, GameRules, MaterialTable, Move, MoveClass, MoveFacts,
    PieceClass, Position, RulesError, Side, Signature, SignaturePair,
};
use serde::{Deserialize, Serialize};

use crate::classifier::FeatureClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbstractorConfig {
    /// Material values used for the balance bucket.
    pub material: MaterialTable,
    /// Material difference per balance bucket step.
    pub balance_unit: i64,
    pub max_balance_bucket: i64,
    /// Chebyshev radius of the destination neighbourhood.
    pub neighbourhood_radius: u8,
    /// Attacker and defender counts are capped at this value.
    pub max_count: usize,
}

impl Default for AbstractorConfig {
    fn default() -> Self {
        Self {
            material: MaterialTable::default(),
            balance_unit: 100,
            max_balance_bucket: 5,
            neighbourhood_radius: 2,
            max_count: 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Abstractor {
    config: AbstractorConfig,
    classifier: FeatureClassifier,
}

/// Neighbour relative to the move destination, already in the mover's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Neighbour {
    dx: i16,
    dy: i16,
    friendly: bool,
    class: PieceClass,
}

/// Everything of a move signature except the reflection.
struct LocalMove {
    piece: PieceClass,
    move_class: MoveClass,
    captured: Option<PieceClass>,
    dx: i16,
    dy: i16,
    opponent_half: bool,
    attackers: usize,
    defenders: usize,
    origin_attackers: usize,
    neighbours: Vec<Neighbour>,
    phase: GamePhase,
}

impl LocalMove {
    fn encode(&self, mirrored: bool) -> String {
        let sx = if mirrored { -1 } else { 1 };
        let mut neighbours = self
            .neighbours
            .iter()
            .map(|n| Neighbour { dx: n.dx * sx, ..*n })
            .collect::<Vec<_>>();
        neighbours.sort();

        let mut out = format!(
            "{}|{}|x{}|v{},{}|{}|a{}d{}o{}|n",
            self.piece,
            self.move_class,
            self.captured.map_or("-", PieceClass::as_str),
            self.dx * sx,
            self.dy,
            if self.opponent_half { "opp" } else { "own" },
            self.attackers,
            self.defenders,
            self.origin_attackers,
        );
        for (i, n) in neighbours.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            write!(
                &mut out,
                "{},{},{},{}",
                n.dx,
                n.dy,
                if n.friendly { 'f' } else { 'e' },
                n.class
            )
            .unwrap();
        }
        write!(&mut out, "|{}", self.phase).unwrap();
        out
    }
}

impl Abstractor {
    #[must_use]
    pub fn new(config: AbstractorConfig, classifier: FeatureClassifier) -> Self {
        Self { config, classifier }
    }

    /// Coarse signature of `view` seen from `perspective`.
    #[must_use]
    pub fn abstract_position(&self, view: &BoardView, perspective: Side, phase: GamePhase) -> Signature {
        let table = &self.config.material;
        let balance = view.material(perspective, table) - view.material(perspective.opponent(), table);
        let unit = self.config.balance_unit.max(1);
        let bucket = (balance / unit).clamp(-self.config.max_balance_bucket, self.config.max_balance_bucket);
        let to_move = if view.side_to_move == perspective {
            "own"
        } else {
            "opp"
        };
        let check = if in_check(view, view.side_to_move) {
            "check"
        } else {
            "calm"
        };
        Signature::new(format!("{phase}|{to_move}|b{bucket:+}|{check}"))
    }

    /// Local signature of the move described by `facts`, played in `view`.
    #[must_use]
    pub fn abstract_move(&self, view: &BoardView, facts: &MoveFacts) -> Signature {
        let local = self.local_move(view, facts);
        let encoded = match local.dx.signum() {
            1 => local.encode(false),
            -1 => local.encode(true),
            _ => {
                let plain = local.encode(false);
                let mirrored = local.encode(true);
                plain.min(mirrored)
            }
        };
        Signature::new(encoded)
    }

    #[must_use]
    pub fn signature_pair(&self, view: &BoardView, facts: &MoveFacts) -> SignaturePair {
        let phase = GamePhase::from_material(facts.material_on_board, facts.material_at_start);
        SignaturePair {
            position_pattern: self.abstract_position(view, facts.mover, phase),
            move_pattern: self.abstract_move(view, facts),
        }
    }

    /// Asks the collaborator for the board and the move, then abstracts both.
    pub fn describe<R>(&self, rules: &R, position: &Position, mv: &Move) -> Result<SignaturePair, RulesError>
    where
        R: GameRules + ?Sized,
    {
        let view = rules.board_view(position)?;
        let facts = rules.describe_move(position, mv)?;
        Ok(self.signature_pair(&view, &facts))
    }

    fn local_move(&self, view: &BoardView, facts: &MoveFacts) -> LocalMove {
        let forward = BoardDims::forward(facts.mover);
        let enemy = facts.mover.opponent();
        let cap = self.config.max_count;
        let (dx, dy) = facts.from.delta(facts.to);

        let neighbours = view
            .pieces
            .iter()
            .filter(|p| p.square != facts.from && p.square != facts.to)
            .filter(|p| p.square.chebyshev(facts.to) <= self.config.neighbourhood_radius)
            .map(|p| {
                let (ndx, ndy) = facts.to.delta(p.square);
                Neighbour {
                    dx: ndx,
                    dy: ndy * forward,
                    friendly: p.side == facts.mover,
                    class: p.class,
                }
            })
            .collect();

        LocalMove {
            piece: facts.piece,
            move_class: self.classifier.move_class(facts),
            captured: facts.captured,
            dx,
            dy: dy * forward,
            opponent_half: facts.dims.in_opponent_half(facts.mover, facts.to),
            attackers: view.attackers_of(facts.to, enemy).count().min(cap),
            defenders: view
                .attackers_of(facts.to, facts.mover)
                .filter(|p| p.square != facts.from)
                .count()
                .min(cap),
            origin_attackers: view.attackers_of(facts.from, enemy).count().min(cap),
            neighbours,
            phase: GamePhase::from_material(facts.material_on_board, facts.material_at_start),
        }
    }
}

fn in_check(view: &BoardView, side: Side) -> bool {
    view.pieces_of(side)
        .filter(|p| p.class == PieceClass::King)
        .any(|king| view.attackers_of(king.square, side.opponent()).next().is_some())
}
