//! Storage seams used by the learning components.
//!
//! Each concern gets its own trait so that a component only names what it
//! touches. [`LearnerStore`] bundles all of them for owners of a full backend.

use movelore_core::{
    DiscoveredPattern, FamilyWeight, FeatureRecord, GameResult, Move, Position, SignaturePair,
};

use crate::{
    aggregate::PatternAggregate,
    error::StoreError,
    history::HistoryRow,
    lesson::{LessonAggregate, LessonEntry, LessonKind, LessonObservation},
};

/// Per-feature move statistics.
pub trait PatternRepository {
    fn get(&self, record: &FeatureRecord) -> Result<Option<PatternAggregate>, StoreError>;

    /// Merges one observation into the aggregate for `record`, creating it if
    /// absent, and returns the merged aggregate.
    ///
    /// The read and the write happen atomically: no observation is lost even if
    /// the same record is upserted repeatedly in quick succession.
    fn upsert(
        &mut self,
        record: &FeatureRecord,
        result: GameResult,
        move_score: i64,
    ) -> Result<PatternAggregate, StoreError>;

    /// All aggregates with at least `min_times_seen` observations, in key order.
    fn scan(&self, min_times_seen: u64) -> Result<Vec<(FeatureRecord, PatternAggregate)>, StoreError>;
}

/// Remembered mistakes and tactics.
pub trait LessonRepository {
    fn lesson(
        &self,
        kind: LessonKind,
        position: &Position,
        mv: &Move,
    ) -> Result<Option<LessonEntry>, StoreError>;

    /// Pooled statistics of all lessons of `kind` sharing `signature`.
    fn lesson_aggregate(
        &self,
        kind: LessonKind,
        signature: &SignaturePair,
    ) -> Result<LessonAggregate, StoreError>;

    fn record_lesson(&mut self, observation: &LessonObservation) -> Result<LessonEntry, StoreError>;

    fn lessons(&self, kind: LessonKind) -> Result<Vec<LessonEntry>, StoreError>;
}

/// Raw per-ply game history.
pub trait HistoryRepository {
    /// Appends `rows`. Rows whose `(game_id, ply)` already exists are ignored.
    ///
    /// Returns the number of rows actually inserted.
    fn append_history(&mut self, rows: &[HistoryRow]) -> Result<usize, StoreError>;

    /// Rows with `move_number >= min_move_number`, ordered by game then ply.
    fn history(&self, min_move_number: u32) -> Result<Vec<HistoryRow>, StoreError>;
}

/// Output tables of the geometric discovery pipeline.
pub trait DiscoveryRepository {
    /// Replaces all previously stored discovery output.
    fn replace_discovery(
        &mut self,
        patterns: &[DiscoveredPattern],
        weights: &[FamilyWeight],
    ) -> Result<(), StoreError>;

    fn discovered_patterns(&self) -> Result<Vec<DiscoveredPattern>, StoreError>;

    fn family_weights(&self) -> Result<Vec<FamilyWeight>, StoreError>;
}

/// A backend implementing every storage concern.
pub trait LearnerStore:
    PatternRepository + LessonRepository + HistoryRepository + DiscoveryRepository
{
}

impl<T> LearnerStore for T where
    T: PatternRepository + LessonRepository + HistoryRepository + DiscoveryRepository
{
}
