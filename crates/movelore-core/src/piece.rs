use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the moving (or captured) unit.
///
/// The set covers the piece families of the games movelore has been used with.
/// Any name the collaborator reports that is not listed here maps to
/// [`PieceClass::Unknown`] instead of failing, so a new game variant degrades to
/// a coarser key rather than aborting training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PieceClass {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// Uncrowned draughts man.
    Man,
    /// Crowned draughts king.
    Crowned,
    Unknown,
}

impl PieceClass {
    pub const ALL: [PieceClass; 9] = [
        PieceClass::Pawn,
        PieceClass::Knight,
        PieceClass::Bishop,
        PieceClass::Rook,
        PieceClass::Queen,
        PieceClass::King,
        PieceClass::Man,
        PieceClass::Crowned,
        PieceClass::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PieceClass::Pawn => "pawn",
            PieceClass::Knight => "knight",
            PieceClass::Bishop => "bishop",
            PieceClass::Rook => "rook",
            PieceClass::Queen => "queen",
            PieceClass::King => "king",
            PieceClass::Man => "man",
            PieceClass::Crowned => "crowned",
            PieceClass::Unknown => "unknown",
        }
    }

    /// Parses a class name case-insensitively, falling back to `Unknown`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(PieceClass::Unknown)
    }
}

impl fmt::Display for PieceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PieceClass {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<PieceClass> for String {
    fn from(value: PieceClass) -> Self {
        value.as_str().to_owned()
    }
}

/// Unit values used when a capture or a geometric relation needs a magnitude.
///
/// Values are in hundredths of the base unit. The king carries no capture value;
/// losing it is accounted for by the decisive-result terms instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialTable {
    pub pawn: i64,
    pub knight: i64,
    pub bishop: i64,
    pub rook: i64,
    pub queen: i64,
    pub king: i64,
    pub man: i64,
    pub crowned: i64,
    pub unknown: i64,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self {
            pawn: 100,
            knight: 320,
            bishop: 330,
            rook: 500,
            queen: 900,
            king: 0,
            man: 100,
            crowned: 300,
            unknown: 100,
        }
    }
}

impl MaterialTable {
    #[must_use]
    pub const fn value(&self, class: PieceClass) -> i64 {
        match class {
            PieceClass::Pawn => self.pawn,
            PieceClass::Knight => self.knight,
            PieceClass::Bishop => self.bishop,
            PieceClass::Rook => self.rook,
            PieceClass::Queen => self.queen,
            PieceClass::King => self.king,
            PieceClass::Man => self.man,
            PieceClass::Crowned => self.crowned,
            PieceClass::Unknown => self.unknown,
        }
    }

    /// Relative value used for ordering pieces against each other.
    ///
    /// Unlike [`value`](Self::value), the king ranks above everything else here,
    /// which is what pin/skewer detection needs.
    #[must_use]
    pub fn rank_value(&self, class: PieceClass) -> i64 {
        match class {
            PieceClass::King => i64::MAX,
            _ => self.value(class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_lenient() {
        assert_eq!(PieceClass::from_name("Knight"), PieceClass::Knight);
        assert_eq!(PieceClass::from_name(" QUEEN "), PieceClass::Queen);
        assert_eq!(PieceClass::from_name("archbishop"), PieceClass::Unknown);
        assert_eq!(PieceClass::from_name(""), PieceClass::Unknown);
    }

    #[test]
    fn test_serde_maps_unseen_classes_to_unknown() {
        let class: PieceClass = serde_json::from_str("\"dragon\"").unwrap();
        assert_eq!(class, PieceClass::Unknown);
        assert_eq!(
            serde_json::to_string(&PieceClass::Crowned).unwrap(),
            "\"crowned\""
        );
    }

    #[test]
    fn test_rank_value_puts_king_on_top() {
        let table = MaterialTable::default();
        assert_eq!(table.value(PieceClass::King), 0);
        assert!(table.rank_value(PieceClass::King) > table.rank_value(PieceClass::Queen));
    }
}
