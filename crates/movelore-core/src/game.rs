use serde::{Deserialize, Serialize};

/// An externally serialized board state.
///
/// movelore never parses this token; it is only compared, stored and handed back
/// to the [`GameRules`](crate::GameRules) collaborator.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Position(String);

impl Position {
    #[must_use]
    pub fn new<S>(token: S) -> Self
    where
        S: Into<String>,
    {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An externally defined action identifier.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Move(String);

impl Move {
    #[must_use]
    pub fn new<S>(token: S) -> Self
    where
        S: Into<String>,
    {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One of the two players.
///
/// `First` owns the home rank 0, `Second` owns the last rank.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[display("first")]
    First,
    #[display("second")]
    Second,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::First, Side::Second];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Side::First => "first",
            Side::Second => "second",
        }
    }

    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "first" => Some(Side::First),
            "second" => Some(Side::Second),
            _ => None,
        }
    }
}

/// Final result of a game seen from one side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    #[display("win")]
    Win,
    #[display("loss")]
    Loss,
    #[display("draw")]
    Draw,
}

impl GameResult {
    /// The same result seen from the other side.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
            GameResult::Draw => GameResult::Draw,
        }
    }

    /// Re-expresses a result held by `holder` from `viewer`'s perspective.
    #[must_use]
    pub const fn for_side(self, holder: Side, viewer: Side) -> Self {
        if matches!(
            (holder, viewer),
            (Side::First, Side::First) | (Side::Second, Side::Second)
        ) {
            self
        } else {
            self.flip()
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::Loss => "loss",
            GameResult::Draw => "draw",
        }
    }

    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "win" => Some(GameResult::Win),
            "loss" => Some(GameResult::Loss),
            "draw" => Some(GameResult::Draw),
            _ => None,
        }
    }
}

/// State of a position as reported by the rule collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    Ongoing,
}

impl Outcome {
    #[must_use]
    pub const fn result(self) -> Option<GameResult> {
        match self {
            Outcome::Win => Some(GameResult::Win),
            Outcome::Loss => Some(GameResult::Loss),
            Outcome::Draw => Some(GameResult::Draw),
            Outcome::Ongoing => None,
        }
    }
}

/// Why a terminal position is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum TerminalCause {
    /// Checkmate or any other ending with a winner.
    #[display("decisive")]
    Decisive,
    /// The no-progress counter ran out.
    #[display("no_progress")]
    NoProgress,
    /// A position occurred too many times.
    #[display("repetition")]
    Repetition,
    /// Neither side can force a win with the remaining units.
    #[display("insufficient_material")]
    InsufficientMaterial,
    /// The side to move has no legal move and is not in check.
    #[display("no_legal_moves")]
    NoLegalMoves,
}

impl TerminalCause {
    #[must_use]
    pub const fn is_draw(self) -> bool {
        !matches!(self, TerminalCause::Decisive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_for_side() {
        assert_eq!(
            GameResult::Win.for_side(Side::First, Side::First),
            GameResult::Win
        );
        assert_eq!(
            GameResult::Win.for_side(Side::First, Side::Second),
            GameResult::Loss
        );
        assert_eq!(
            GameResult::Draw.for_side(Side::Second, Side::First),
            GameResult::Draw
        );
    }

    #[test]
    fn test_db_strings_round_trip() {
        for result in [GameResult::Win, GameResult::Loss, GameResult::Draw] {
            assert_eq!(GameResult::from_db_str(result.as_str()), Some(result));
        }
        for side in Side::ALL {
            assert_eq!(Side::from_db_str(side.as_str()), Some(side));
        }
        assert_eq!(GameResult::from_db_str("resigned"), None);
    }

    #[test]
    fn test_terminal_cause_is_draw() {
        assert!(!TerminalCause::Decisive.is_draw());
        assert!(TerminalCause::NoProgress.is_draw());
        assert!(TerminalCause::NoLegalMoves.is_draw());
    }

    #[test]
    fn test_opaque_tokens_serialize_transparently() {
        let position = Position::new("8/8/8 w");
        assert_eq!(serde_json::to_string(&position).unwrap(), "\"8/8/8 w\"");
        let mv: Move = serde_json::from_str("\"e2e4\"").unwrap();
        assert_eq!(mv.as_str(), "e2e4");
    }
}
