use movelore_core::{BoardView, FeatureRecord, Move, MoveFacts, Position};
use movelore_evaluator::{lookup::LessonSignal, ranker::ScoreSource};
use serde::{Deserialize, Serialize};

/// Candidate moves of one position, as exported by the rule engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankQuery {
    pub position: Position,
    /// Board before any candidate is played; enables generalized lesson lookup
    #[serde(default)]
    pub board: Option<BoardView>,
    pub candidates: Vec<QueryCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCandidate {
    pub mv: Move,
    pub facts: MoveFacts,
}

/// One line of `rank` output, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub mv: Move,
    pub score: f64,
    pub source: ScoreSource,
    pub record: Option<FeatureRecord>,
    /// Remembered mistake or tactic resembling this move, if any
    pub lesson: Option<LessonSignal>,
}
