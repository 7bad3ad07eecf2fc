use std::collections::{BTreeMap, BTreeSet};

use movelore_core::{
    DiscoveredPattern, FamilyWeight, FeatureRecord, GameResult, Move, Position, SignaturePair,
};

use crate::{
    aggregate::{AggregateParams, PatternAggregate},
    error::StoreError,
    history::HistoryRow,
    lesson::{LessonAggregate, LessonEntry, LessonKind, LessonObservation},
    repository::{DiscoveryRepository, HistoryRepository, LessonRepository, PatternRepository},
};

/// Volatile backend for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    params: AggregateParams,
    patterns: BTreeMap<FeatureRecord, PatternAggregate>,
    lessons: BTreeMap<(LessonKind, Position, Move), LessonEntry>,
    history: BTreeMap<(String, u32), HistoryRow>,
    discovered: Vec<DiscoveredPattern>,
    weights: Vec<FamilyWeight>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(params: AggregateParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn params(&self) -> &AggregateParams {
        &self.params
    }
}

impl PatternRepository for MemoryStore {
    fn get(&self, record: &FeatureRecord) -> Result<Option<PatternAggregate>, StoreError> {
        Ok(self.patterns.get(record).copied())
    }

    fn upsert(
        &mut self,
        record: &FeatureRecord,
        result: GameResult,
        move_score: i64,
    ) -> Result<PatternAggregate, StoreError> {
        let params = self.params;
        let entry = self
            .patterns
            .entry(*record)
            .or_insert_with(|| PatternAggregate::empty(&params));
        *entry = entry.observe(result, move_score, &params);
        Ok(*entry)
    }

    fn scan(&self, min_times_seen: u64) -> Result<Vec<(FeatureRecord, PatternAggregate)>, StoreError> {
        Ok(self
            .patterns
            .iter()
            .filter(|(_, agg)| agg.times_seen >= min_times_seen)
            .map(|(record, agg)| (*record, *agg))
            .collect())
    }
}

impl LessonRepository for MemoryStore {
    fn lesson(
        &self,
        kind: LessonKind,
        position: &Position,
        mv: &Move,
    ) -> Result<Option<LessonEntry>, StoreError> {
        Ok(self
            .lessons
            .get(&(kind, position.clone(), mv.clone()))
            .cloned())
    }

    fn lesson_aggregate(
        &self,
        kind: LessonKind,
        signature: &SignaturePair,
    ) -> Result<LessonAggregate, StoreError> {
        let mut aggregate = LessonAggregate::default();
        let mut positions = BTreeSet::new();
        for entry in self
            .lessons
            .values()
            .filter(|e| e.kind == kind && &e.signature == signature)
        {
            aggregate.samples += entry.times_seen;
            aggregate.material_total += entry.material_total;
            positions.insert(&entry.position);
        }
        aggregate.distinct_positions = positions.len() as u64;
        Ok(aggregate)
    }

    fn record_lesson(&mut self, observation: &LessonObservation) -> Result<LessonEntry, StoreError> {
        let key = (
            observation.kind,
            observation.position.clone(),
            observation.mv.clone(),
        );
        let entry = self.lessons.entry(key).or_insert_with(|| LessonEntry {
            kind: observation.kind,
            position: observation.position.clone(),
            mv: observation.mv.clone(),
            material_total: 0,
            times_seen: 0,
            signature: observation.signature.clone(),
        });
        entry.material_total += observation.material;
        entry.times_seen += 1;
        entry.signature = observation.signature.clone();
        Ok(entry.clone())
    }

    fn lessons(&self, kind: LessonKind) -> Result<Vec<LessonEntry>, StoreError> {
        Ok(self
            .lessons
            .values()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect())
    }
}

impl HistoryRepository for MemoryStore {
    fn append_history(&mut self, rows: &[HistoryRow]) -> Result<usize, StoreError> {
        let mut inserted = 0;
        for row in rows {
            let key = (row.game_id.clone(), row.ply);
            if !self.history.contains_key(&key) {
                self.history.insert(key, row.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn history(&self, min_move_number: u32) -> Result<Vec<HistoryRow>, StoreError> {
        Ok(self
            .history
            .values()
            .filter(|row| row.move_number >= min_move_number)
            .cloned()
            .collect())
    }
}

impl DiscoveryRepository for MemoryStore {
    fn replace_discovery(
        &mut self,
        patterns: &[DiscoveredPattern],
        weights: &[FamilyWeight],
    ) -> Result<(), StoreError> {
        self.discovered = patterns.to_vec();
        self.weights = weights.to_vec();
        Ok(())
    }

    fn discovered_patterns(&self) -> Result<Vec<DiscoveredPattern>, StoreError> {
        Ok(self.discovered.clone())
    }

    fn family_weights(&self) -> Result<Vec<FamilyWeight>, StoreError> {
        Ok(self.weights.clone())
    }
}

#[cfg(test)]
mod tests {
    use movelore_core::{MaterialLevel, MoveClass, PieceClass, Signature};

    use super::*;

    fn record() -> FeatureRecord {
        FeatureRecord {
            piece_class: PieceClass::Rook,
            move_class: MoveClass::Quiet,
            distance_bucket: 2,
            repetition_bucket: 0,
            stagnation_bucket: 1,
            material_level: MaterialLevel::Medium,
        }
    }

    fn observation(position: &str, material: i64) -> LessonObservation {
        LessonObservation {
            kind: LessonKind::Mistake,
            position: Position::new(position),
            mv: Move::new("a1a2"),
            material,
            signature: SignaturePair {
                position_pattern: Signature::new("mid|first|even|calm"),
                move_pattern: Signature::new("rook|quiet"),
            },
        }
    }

    #[test]
    fn test_upsert_creates_then_merges() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get(&record()).unwrap(), None);
        store.upsert(&record(), GameResult::Win, 100).unwrap();
        let merged = store.upsert(&record(), GameResult::Draw, -20).unwrap();
        assert_eq!(merged.times_seen, 2);
        assert_eq!(merged.total_score, 80);
        assert_eq!(store.get(&record()).unwrap(), Some(merged));
        assert_eq!(store.scan(3).unwrap(), vec![]);
        assert_eq!(store.scan(2).unwrap().len(), 1);
    }

    #[test]
    fn test_lesson_aggregate_pools_positions() {
        let mut store = MemoryStore::default();
        store.record_lesson(&observation("p1", 300)).unwrap();
        store.record_lesson(&observation("p1", 100)).unwrap();
        store.record_lesson(&observation("p2", 500)).unwrap();

        let exact = store
            .lesson(LessonKind::Mistake, &Position::new("p1"), &Move::new("a1a2"))
            .unwrap()
            .unwrap();
        assert_eq!(exact.times_seen, 2);
        assert_eq!(exact.avg_material(), 200.0);

        let pooled = store
            .lesson_aggregate(LessonKind::Mistake, &observation("x", 0).signature)
            .unwrap();
        assert_eq!(pooled.samples, 3);
        assert_eq!(pooled.distinct_positions, 2);
        assert_eq!(pooled.avg_material(), 300.0);

        let tactics = store
            .lesson_aggregate(LessonKind::Tactic, &observation("x", 0).signature)
            .unwrap();
        assert_eq!(tactics.samples, 0);
    }
}
