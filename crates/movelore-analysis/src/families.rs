//! Geometric pattern families observed on a single board.
//!
//! Every detector looks at one piece and reports at most one observation per
//! family. A detail string refines the family (how many targets a fork hits,
//! which classes a pin lines up, how far from the centre a piece stands). The
//! signature of an observation is `family:class:detail:phase`.
//!
//! Details never contain absolute coordinates, so mirrored boards produce the
//! same signatures.

use std::cmp::Ordering;

use movelore_core::{
    BoardView, GamePhase, MaterialTable, PatternFamily, PieceClass, PlacedPiece, Side,
};

/// Targets beyond this many are reported together.
const MAX_FORK_TARGETS: usize = 4;
const MAX_HANGING_ATTACKERS: usize = 3;

/// One family matched by one piece.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FamilyObservation {
    pub family: PatternFamily,
    /// Owner of the piece; outcomes are counted from this side.
    pub owner: Side,
    pub class: PieceClass,
    pub detail: String,
}

impl FamilyObservation {
    #[must_use]
    pub fn signature(&self, phase: GamePhase) -> String {
        format!("{}:{}:{}:{phase}", self.family, self.class, self.detail)
    }
}

/// Runs every family detector over every piece of `view`.
#[must_use]
pub fn observe(view: &BoardView, material: &MaterialTable) -> Vec<FamilyObservation> {
    let mut observations = Vec::new();
    for piece in &view.pieces {
        if !view.dims.contains(piece.square) {
            tracing::warn!(
                class = %piece.class,
                file = piece.square.file,
                rank = piece.square.rank,
                "piece outside the board; skipping"
            );
            continue;
        }
        let mut push = |family, detail: String| {
            observations.push(FamilyObservation {
                family,
                owner: piece.side,
                class: piece.class,
                detail,
            });
        };

        if let Some(targets) = fork(view, piece) {
            push(PatternFamily::Fork, targets);
        }
        if let Some((family, detail)) = pin_or_skewer(view, piece, material) {
            push(family, detail);
        }
        push(
            PatternFamily::Centralization,
            view.dims.center_distance(piece.square).to_string(),
        );
        if is_file_piece(piece.class) {
            let advance = view.dims.distance_from_home(piece.side, piece.square);
            if let Some(count) = doubled(view, piece) {
                push(PatternFamily::Doubled, count.to_string());
            }
            if is_isolated(view, piece) {
                push(PatternFamily::Isolated, advance.to_string());
            }
            if is_passed(view, piece) {
                push(PatternFamily::Passed, advance.to_string());
            }
        }
        if let Some(attackers) = hanging(view, piece) {
            push(PatternFamily::Hanging, attackers.to_string());
        }
    }
    observations
}

/// Classes whose structure is judged by file occupancy.
fn is_file_piece(class: PieceClass) -> bool {
    matches!(class, PieceClass::Pawn | PieceClass::Man)
}

fn fork(view: &BoardView, piece: &PlacedPiece) -> Option<String> {
    let targets = view.attacked_enemies(piece.square).count();
    (targets >= 2).then(|| {
        if targets >= MAX_FORK_TARGETS {
            format!("{MAX_FORK_TARGETS}+")
        } else {
            targets.to_string()
        }
    })
}

/// A line attack on an enemy piece with another enemy piece right behind it.
///
/// The attack must span at least two squares. A more valuable rear piece makes
/// a pin, a less valuable one a skewer; equal values are neither.
fn pin_or_skewer(
    view: &BoardView,
    piece: &PlacedPiece,
    material: &MaterialTable,
) -> Option<(PatternFamily, String)> {
    view.attacked_enemies(piece.square).find_map(|front| {
        if piece.square.chebyshev(front.square) < 2 {
            return None;
        }
        let step = piece.square.line_step(front.square)?;
        let rear = view.first_piece_along(front.square, step)?;
        if rear.side != front.side {
            return None;
        }
        let family = match material
            .rank_value(rear.class)
            .cmp(&material.rank_value(front.class))
        {
            Ordering::Greater => PatternFamily::Pin,
            Ordering::Less => PatternFamily::Skewer,
            Ordering::Equal => return None,
        };
        Some((family, format!("{}-{}", front.class, rear.class)))
    })
}

fn same_class_friends<'a>(
    view: &'a BoardView,
    piece: &'a PlacedPiece,
) -> impl Iterator<Item = &'a PlacedPiece> + 'a {
    view.pieces_of(piece.side)
        .filter(move |p| p.class == piece.class && p.square != piece.square)
}

/// Number of same-class friends sharing the file, plus the piece itself.
fn doubled(view: &BoardView, piece: &PlacedPiece) -> Option<usize> {
    let on_file = same_class_friends(view, piece)
        .filter(|p| p.square.file == piece.square.file)
        .count();
    (on_file > 0).then_some(on_file + 1)
}

fn is_isolated(view: &BoardView, piece: &PlacedPiece) -> bool {
    let neighbours = view.dims.adjacent_files(piece.square.file);
    !same_class_friends(view, piece).any(|p| neighbours.contains(&p.square.file))
}

fn is_passed(view: &BoardView, piece: &PlacedPiece) -> bool {
    let dims = view.dims;
    let advance = dims.distance_from_home(piece.side, piece.square);
    let files = dims.adjacent_files(piece.square.file);
    !view.pieces_of(piece.side.opponent()).any(|enemy| {
        enemy.class == piece.class
            && (enemy.square.file == piece.square.file || files.contains(&enemy.square.file))
            && dims.distance_from_home(piece.side, enemy.square) > advance
    })
}

/// Attacked by the enemy and defended by nobody. Kings never hang.
fn hanging(view: &BoardView, piece: &PlacedPiece) -> Option<usize> {
    if piece.class == PieceClass::King {
        return None;
    }
    let attackers = view.attackers_of(piece.square, piece.side.opponent()).count();
    let defended = view.attackers_of(piece.square, piece.side).next().is_some();
    (attackers > 0 && !defended).then_some(attackers.min(MAX_HANGING_ATTACKERS))
}
