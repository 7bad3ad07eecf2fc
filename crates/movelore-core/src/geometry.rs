//! Coordinate geometry shared by the abstractor and the discovery pipeline.
//!
//! Files run left to right from 0, ranks run from `First`'s home rank (0) towards
//! `Second`'s home rank (`ranks - 1`). All "forward" computations are expressed
//! relative to a [`Side`] so that features mean the same thing for both players.
//!
//! [`BoardView`] is the geometric snapshot a rule collaborator exports for a
//! position: where the pieces are, and which squares each piece attacks. No
//! movement rules live here; attacks are given, not generated.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{
    game::Side,
    piece::{MaterialTable, PieceClass},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    #[must_use]
    pub const fn new(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// Signed `(files, ranks)` displacement from `self` to `other`.
    #[must_use]
    pub fn delta(self, other: Square) -> (i16, i16) {
        (
            i16::from(other.file) - i16::from(self.file),
            i16::from(other.rank) - i16::from(self.rank),
        )
    }

    /// King-move distance.
    #[must_use]
    pub fn chebyshev(self, other: Square) -> u8 {
        let (df, dr) = self.delta(other);
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let distance = df.abs().max(dr.abs()) as u8;
        distance
    }

    /// Unit step along a rank, file or diagonal from `self` towards `other`.
    ///
    /// Returns `None` when the two squares are not on a common line or coincide.
    #[must_use]
    pub fn line_step(self, other: Square) -> Option<(i16, i16)> {
        let (df, dr) = self.delta(other);
        if (df, dr) == (0, 0) {
            return None;
        }
        if df == 0 || dr == 0 || df.abs() == dr.abs() {
            Some((df.signum(), dr.signum()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn offset(self, df: i16, dr: i16, dims: BoardDims) -> Option<Square> {
        let file = u8::try_from(i16::from(self.file) + df).ok()?;
        let rank = u8::try_from(i16::from(self.rank) + dr).ok()?;
        let square = Square::new(file, rank);
        dims.contains(square).then_some(square)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardDims {
    pub files: u8,
    pub ranks: u8,
}

impl BoardDims {
    #[must_use]
    pub const fn new(files: u8, ranks: u8) -> Self {
        Self { files, ranks }
    }

    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        square.file < self.files && square.rank < self.ranks
    }

    /// Ranks between `square` and `side`'s home rank.
    #[must_use]
    pub const fn distance_from_home(self, side: Side, square: Square) -> u8 {
        match side {
            Side::First => square.rank,
            Side::Second => self.ranks.saturating_sub(1).saturating_sub(square.rank),
        }
    }

    /// Rank direction `side` advances in.
    #[must_use]
    pub const fn forward(side: Side) -> i16 {
        match side {
            Side::First => 1,
            Side::Second => -1,
        }
    }

    #[must_use]
    pub const fn in_opponent_half(self, side: Side, square: Square) -> bool {
        2 * self.distance_from_home(side, square) as u16 >= self.ranks as u16
    }

    /// Chebyshev distance from `square` to the nearest central square.
    ///
    /// On even-sized axes the centre is the middle two lines, on odd-sized axes the
    /// single middle line.
    #[must_use]
    pub fn center_distance(self, square: Square) -> u8 {
        fn axis(pos: u8, len: u8) -> u8 {
            let twice = (2 * i16::from(pos) - (i16::from(len) - 1)).unsigned_abs();
            #[expect(clippy::cast_possible_truncation)]
            let half = (twice / 2) as u8;
            half
        }
        axis(square.file, self.files).max(axis(square.rank, self.ranks))
    }

    /// Files immediately left and right of `file` that exist on the board.
    #[must_use]
    pub fn adjacent_files(self, file: u8) -> ArrayVec<u8, 2> {
        let mut files = ArrayVec::new();
        if let Some(left) = file.checked_sub(1) {
            files.push(left);
        }
        if let Some(right) = file.checked_add(1).filter(|f| *f < self.files) {
            files.push(right);
        }
        files
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub class: PieceClass,
    pub side: Side,
    pub square: Square,
}

/// The piece on `from` attacks `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attack {
    pub from: Square,
    pub to: Square,
}

/// Geometric snapshot of a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub dims: BoardDims,
    pub side_to_move: Side,
    pub pieces: Vec<PlacedPiece>,
    #[serde(default)]
    pub attacks: Vec<Attack>,
}

impl BoardView {
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.square == square)
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &PlacedPiece> + '_ {
        self.pieces.iter().filter(move |p| p.side == side)
    }

    /// Squares attacked by the piece standing on `from`.
    pub fn targets_of(&self, from: Square) -> impl Iterator<Item = Square> + '_ {
        self.attacks
            .iter()
            .filter(move |a| a.from == from)
            .map(|a| a.to)
    }

    /// Pieces of `side` attacking `square`.
    pub fn attackers_of(&self, square: Square, side: Side) -> impl Iterator<Item = &PlacedPiece> + '_ {
        self.attacks
            .iter()
            .filter(move |a| a.to == square)
            .filter_map(|a| self.piece_at(a.from))
            .filter(move |p| p.side == side)
    }

    /// Enemy pieces attacked by the piece standing on `from`.
    pub fn attacked_enemies(&self, from: Square) -> impl Iterator<Item = &PlacedPiece> + '_ {
        let owner = self.piece_at(from).map(|p| p.side);
        self.targets_of(from)
            .filter_map(|to| self.piece_at(to))
            .filter(move |target| Some(target.side.opponent()) == owner)
    }

    /// First piece met walking from `from` (exclusive) in steps of `step`.
    #[must_use]
    pub fn first_piece_along(&self, from: Square, step: (i16, i16)) -> Option<&PlacedPiece> {
        let mut current = from;
        loop {
            current = current.offset(step.0, step.1, self.dims)?;
            if let Some(piece) = self.piece_at(current) {
                return Some(piece);
            }
        }
    }

    #[must_use]
    pub fn material(&self, side: Side, table: &MaterialTable) -> i64 {
        self.pieces_of(side).map(|p| table.value(p.class)).sum()
    }

    #[must_use]
    pub fn total_material(&self, table: &MaterialTable) -> i64 {
        self.pieces.iter().map(|p| table.value(p.class)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHESS: BoardDims = BoardDims::new(8, 8);

    #[test]
    fn test_distance_from_home() {
        let sq = Square::new(4, 2);
        assert_eq!(CHESS.distance_from_home(Side::First, sq), 2);
        assert_eq!(CHESS.distance_from_home(Side::Second, sq), 5);
        assert!(!CHESS.in_opponent_half(Side::First, sq));
        assert!(CHESS.in_opponent_half(Side::Second, sq));
    }

    #[test]
    fn test_center_distance() {
        assert_eq!(CHESS.center_distance(Square::new(3, 4)), 0);
        assert_eq!(CHESS.center_distance(Square::new(4, 3)), 0);
        assert_eq!(CHESS.center_distance(Square::new(2, 4)), 1);
        assert_eq!(CHESS.center_distance(Square::new(0, 0)), 3);
        let odd = BoardDims::new(9, 9);
        assert_eq!(odd.center_distance(Square::new(4, 4)), 0);
        assert_eq!(odd.center_distance(Square::new(0, 8)), 4);
    }

    #[test]
    fn test_line_step() {
        let a = Square::new(0, 0);
        assert_eq!(a.line_step(Square::new(0, 5)), Some((0, 1)));
        assert_eq!(a.line_step(Square::new(3, 3)), Some((1, 1)));
        assert_eq!(a.line_step(Square::new(1, 2)), None);
        assert_eq!(a.line_step(a), None);
    }

    #[test]
    fn test_offset_stays_on_board() {
        assert_eq!(Square::new(0, 0).offset(-1, 0, CHESS), None);
        assert_eq!(Square::new(7, 7).offset(0, 1, CHESS), None);
        assert_eq!(Square::new(3, 3).offset(1, -1, CHESS), Some(Square::new(4, 2)));
    }

    #[test]
    fn test_adjacent_files() {
        assert_eq!(CHESS.adjacent_files(0).as_slice(), &[1]);
        assert_eq!(CHESS.adjacent_files(3).as_slice(), &[2, 4]);
        assert_eq!(CHESS.adjacent_files(7).as_slice(), &[6]);
        assert_eq!(CHESS.adjacent_files(8).as_slice(), &[7]);
        assert_eq!(CHESS.adjacent_files(u8::MAX).as_slice(), &[254]);
    }

    #[test]
    fn test_attack_queries() {
        let rook = PlacedPiece {
            class: PieceClass::Rook,
            side: Side::First,
            square: Square::new(0, 0),
        };
        let target = PlacedPiece {
            class: PieceClass::Knight,
            side: Side::Second,
            square: Square::new(0, 4),
        };
        let behind = PlacedPiece {
            class: PieceClass::King,
            side: Side::Second,
            square: Square::new(0, 6),
        };
        let view = BoardView {
            dims: CHESS,
            side_to_move: Side::First,
            pieces: vec![rook, target, behind],
            attacks: (1..=4)
                .map(|r| Attack {
                    from: rook.square,
                    to: Square::new(0, r),
                })
                .collect(),
        };
        assert_eq!(view.attacked_enemies(rook.square).count(), 1);
        assert_eq!(view.attackers_of(target.square, Side::First).count(), 1);
        assert_eq!(view.attackers_of(target.square, Side::Second).count(), 0);
        assert_eq!(
            view.first_piece_along(target.square, (0, 1)).map(|p| p.class),
            Some(PieceClass::King)
        );
    }
}
