//! SQLite backend.
//!
//! One [`SqliteStore`] owns one connection and is the only writer. Every
//! mutating call runs in its own transaction, so a crash mid-game loses at
//! most the observation being written and never leaves a half-merged row.

use std::path::Path;

use movelore_core::{
    DiscoveredPattern, FamilyWeight, FeatureRecord, GameResult, Move, Position, SignaturePair,
};
use rusqlite::Connection;

use crate::{
    aggregate::{AggregateParams, PatternAggregate},
    error::StoreError,
    history::HistoryRow,
    lesson::{LessonAggregate, LessonEntry, LessonKind, LessonObservation},
    repository::{DiscoveryRepository, HistoryRepository, LessonRepository, PatternRepository},
};

mod discovery;
mod history;
mod lessons;
mod patterns;
mod schema;

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    params: AggregateParams,
}

impl SqliteStore {
    /// Opens (creating if needed) a database file.
    pub fn open(path: &Path, params: AggregateParams) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        schema::apply_pragmas(&conn)?;
        Self::initialize(conn, params)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(params: AggregateParams) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn, params)
    }

    fn initialize(conn: Connection, params: AggregateParams) -> Result<Self, StoreError> {
        schema::migrate(&conn)?;
        Ok(Self { conn, params })
    }

    #[must_use]
    pub fn params(&self) -> &AggregateParams {
        &self.params
    }
}

impl PatternRepository for SqliteStore {
    fn get(&self, record: &FeatureRecord) -> Result<Option<PatternAggregate>, StoreError> {
        patterns::get_pattern(&self.conn, record, &self.params)
    }

    fn upsert(
        &mut self,
        record: &FeatureRecord,
        result: GameResult,
        move_score: i64,
    ) -> Result<PatternAggregate, StoreError> {
        let tx = self.conn.transaction()?;
        let current = patterns::get_pattern(&tx, record, &self.params)?
            .unwrap_or_else(|| PatternAggregate::empty(&self.params));
        let merged = current.observe(result, move_score, &self.params);
        patterns::write_pattern(&tx, record, &merged)?;
        tx.commit()?;
        tracing::debug!(
            record = %record,
            result = %result,
            move_score,
            times_seen = merged.times_seen,
            priority = merged.priority,
            "pattern upserted"
        );
        Ok(merged)
    }

    fn scan(&self, min_times_seen: u64) -> Result<Vec<(FeatureRecord, PatternAggregate)>, StoreError> {
        patterns::scan_patterns(&self.conn, min_times_seen, &self.params)
    }
}

impl LessonRepository for SqliteStore {
    fn lesson(
        &self,
        kind: LessonKind,
        position: &Position,
        mv: &Move,
    ) -> Result<Option<LessonEntry>, StoreError> {
        lessons::get_lesson(&self.conn, kind, position, mv)
    }

    fn lesson_aggregate(
        &self,
        kind: LessonKind,
        signature: &SignaturePair,
    ) -> Result<LessonAggregate, StoreError> {
        lessons::aggregate_lessons(&self.conn, kind, signature)
    }

    fn record_lesson(&mut self, observation: &LessonObservation) -> Result<LessonEntry, StoreError> {
        let tx = self.conn.transaction()?;
        let entry = lessons::upsert_lesson(&tx, observation)?;
        tx.commit()?;
        Ok(entry)
    }

    fn lessons(&self, kind: LessonKind) -> Result<Vec<LessonEntry>, StoreError> {
        lessons::list_lessons(&self.conn, kind)
    }
}

impl HistoryRepository for SqliteStore {
    fn append_history(&mut self, rows: &[HistoryRow]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let inserted = history::insert_history(&tx, rows)?;
        tx.commit()?;
        if inserted < rows.len() {
            tracing::warn!(
                skipped = rows.len() - inserted,
                "history rows already present were ignored"
            );
        }
        Ok(inserted)
    }

    fn history(&self, min_move_number: u32) -> Result<Vec<HistoryRow>, StoreError> {
        history::load_history(&self.conn, min_move_number)
    }
}

impl DiscoveryRepository for SqliteStore {
    fn replace_discovery(
        &mut self,
        patterns: &[DiscoveredPattern],
        weights: &[FamilyWeight],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        discovery::replace_all(&tx, patterns, weights)?;
        tx.commit()?;
        Ok(())
    }

    fn discovered_patterns(&self) -> Result<Vec<DiscoveredPattern>, StoreError> {
        discovery::load_patterns(&self.conn)
    }

    fn family_weights(&self) -> Result<Vec<FamilyWeight>, StoreError> {
        discovery::load_weights(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use movelore_core::{
        BoardDims, BoardView, MaterialLevel, MoveClass, PatternFamily, PieceClass, PlacedPiece,
        Side, Signature, Square,
    };

    use super::*;

    fn record(distance_bucket: u8) -> FeatureRecord {
        FeatureRecord {
            piece_class: PieceClass::Knight,
            move_class: MoveClass::Development,
            distance_bucket,
            repetition_bucket: 0,
            stagnation_bucket: 0,
            material_level: MaterialLevel::High,
        }
    }

    fn history_row(game_id: &str, ply: u32) -> HistoryRow {
        HistoryRow {
            game_id: game_id.to_owned(),
            ply,
            move_number: ply / 2 + 1,
            mover: if ply % 2 == 0 { Side::First } else { Side::Second },
            position_after: Position::new(format!("{game_id}-{ply}")),
            mv: Move::new("e2e4"),
            result_for_mover: GameResult::Draw,
            material_on_board: 7800,
            material_at_start: 7800,
            board_after: BoardView {
                dims: BoardDims::new(8, 8),
                side_to_move: Side::Second,
                pieces: vec![PlacedPiece {
                    class: PieceClass::King,
                    side: Side::First,
                    square: Square::new(4, 0),
                }],
                attacks: vec![],
            },
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let mut store = SqliteStore::open_in_memory(AggregateParams::default()).unwrap();
        assert_eq!(store.get(&record(1)).unwrap(), None);

        store.upsert(&record(1), GameResult::Win, 1200).unwrap();
        let merged = store.upsert(&record(1), GameResult::Loss, -900).unwrap();
        assert_eq!(merged.times_seen, 2);
        assert_eq!((merged.wins, merged.losses, merged.draws), (1, 1, 0));
        assert_eq!(store.get(&record(1)).unwrap(), Some(merged));

        store.upsert(&record(2), GameResult::Draw, 0).unwrap();
        let scanned = store.scan(2).unwrap();
        assert_eq!(scanned, vec![(record(1), merged)]);
        assert_eq!(store.scan(0).unwrap().len(), 2);
    }

    #[test]
    fn test_reopen_is_bit_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.db");
        let params = AggregateParams::default();

        let before = {
            let mut store = SqliteStore::open(&path, params).unwrap();
            store.upsert(&record(3), GameResult::Win, 1337).unwrap();
            store.upsert(&record(3), GameResult::Draw, -501).unwrap();
            store.upsert(&record(3), GameResult::Loss, -77).unwrap();
            store.upsert(&record(4), GameResult::Win, 50).unwrap();
            store.scan(0).unwrap()
        };

        let store = SqliteStore::open(&path, params).unwrap();
        let after = store.scan(0).unwrap();
        assert_eq!(before.len(), after.len());
        for ((rec_a, agg_a), (rec_b, agg_b)) in before.iter().zip(&after) {
            assert_eq!(rec_a, rec_b);
            assert_eq!(agg_a.times_seen, agg_b.times_seen);
            assert_eq!(agg_a.total_score, agg_b.total_score);
            assert_eq!(agg_a.avg_score.to_bits(), agg_b.avg_score.to_bits());
            assert_eq!(agg_a.confidence.to_bits(), agg_b.confidence.to_bits());
            assert_eq!(agg_a.priority.to_bits(), agg_b.priority.to_bits());
        }
    }

    #[test]
    fn test_lessons_round_trip() {
        let mut store = SqliteStore::open_in_memory(AggregateParams::default()).unwrap();
        let signature = SignaturePair {
            position_pattern: Signature::new("opening|first|even|calm"),
            move_pattern: Signature::new("queen|capture"),
        };
        for (position, material) in [("p1", 900), ("p1", 300), ("p2", 330)] {
            store
                .record_lesson(&LessonObservation {
                    kind: LessonKind::Tactic,
                    position: Position::new(position),
                    mv: Move::new("d1h5"),
                    material,
                    signature: signature.clone(),
                })
                .unwrap();
        }

        let entry = store
            .lesson(LessonKind::Tactic, &Position::new("p1"), &Move::new("d1h5"))
            .unwrap()
            .unwrap();
        assert_eq!(entry.times_seen, 2);
        assert_eq!(entry.material_total, 1200);
        assert_eq!(entry.signature, signature);
        assert!(
            store
                .lesson(LessonKind::Mistake, &Position::new("p1"), &Move::new("d1h5"))
                .unwrap()
                .is_none()
        );

        let pooled = store.lesson_aggregate(LessonKind::Tactic, &signature).unwrap();
        assert_eq!(pooled.samples, 3);
        assert_eq!(pooled.material_total, 1530);
        assert_eq!(pooled.distinct_positions, 2);
        assert_eq!(store.lessons(LessonKind::Tactic).unwrap().len(), 2);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut store = SqliteStore::open_in_memory(AggregateParams::default()).unwrap();
        let rows = [history_row("g1", 0), history_row("g1", 1), history_row("g1", 2)];
        assert_eq!(store.append_history(&rows).unwrap(), 3);
        assert_eq!(store.append_history(&rows[1..]).unwrap(), 0);

        let loaded = store.history(0).unwrap();
        assert_eq!(loaded, rows.to_vec());
        assert_eq!(store.history(2).unwrap(), vec![rows[2].clone()]);
    }

    #[test]
    fn test_discovery_is_replaced_wholesale() {
        let mut store = SqliteStore::open_in_memory(AggregateParams::default()).unwrap();
        let pattern = |signature: &str| DiscoveredPattern {
            signature: signature.to_owned(),
            family: PatternFamily::Fork,
            wins: 4,
            losses: 1,
            draws: 0,
            win_rate: 0.8,
            value_estimate: 60.0,
            frequency: 5,
        };
        let weight = FamilyWeight {
            family: PatternFamily::Fork,
            weight: 60.0,
            signatures_used: 1,
            total_frequency: 5,
        };

        store
            .replace_discovery(&[pattern("fork:knight:2:opening")], &[weight.clone()])
            .unwrap();
        store
            .replace_discovery(&[pattern("fork:queen:3:middlegame")], &[weight.clone()])
            .unwrap();

        assert_eq!(
            store.discovered_patterns().unwrap(),
            vec![pattern("fork:queen:3:middlegame")]
        );
        assert_eq!(store.family_weights().unwrap(), vec![weight]);
    }
}
