use std::collections::{BTreeMap, HashMap};

use movelore_core::{FeatureRecord, MoveClass};

use crate::{aggregate::PatternAggregate, error::StoreError, repository::PatternRepository};

/// Prior for records of one move class that have never been seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassPrior {
    /// Number of mirror rows of this move class.
    pub rows: usize,
    /// `sum(priority) / sum(confidence)` over those rows: the priority a fully
    /// confident record of this class would get on average.
    pub priority: f64,
}

/// Read-only snapshot of the store for ranking.
///
/// Only rows seen at least `min_times_seen` times are kept. The snapshot does
/// not follow later upserts; call [`refresh`](Self::refresh) to reload.
#[derive(Debug, Clone, Default)]
pub struct PatternMirror {
    min_times_seen: u64,
    entries: HashMap<FeatureRecord, PatternAggregate>,
    class_priors: BTreeMap<MoveClass, ClassPrior>,
}

impl PatternMirror {
    pub fn load<R>(repo: &R, min_times_seen: u64) -> Result<Self, StoreError>
    where
        R: PatternRepository + ?Sized,
    {
        let mut mirror = Self {
            min_times_seen,
            ..Self::default()
        };
        mirror.refresh(repo)?;
        Ok(mirror)
    }

    pub fn refresh<R>(&mut self, repo: &R) -> Result<(), StoreError>
    where
        R: PatternRepository + ?Sized,
    {
        let rows = repo.scan(self.min_times_seen)?;
        self.class_priors = class_priors(&rows);
        self.entries = rows.into_iter().collect();
        tracing::info!(
            rows = self.entries.len(),
            min_times_seen = self.min_times_seen,
            "pattern mirror loaded"
        );
        Ok(())
    }

    #[must_use]
    pub fn get(&self, record: &FeatureRecord) -> Option<&PatternAggregate> {
        self.entries.get(record)
    }

    #[must_use]
    pub fn class_prior(&self, move_class: MoveClass) -> Option<ClassPrior> {
        self.class_priors.get(&move_class).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn class_priors(rows: &[(FeatureRecord, PatternAggregate)]) -> BTreeMap<MoveClass, ClassPrior> {
    let mut sums: BTreeMap<MoveClass, (usize, f64, f64)> = BTreeMap::new();
    for (record, agg) in rows {
        let (count, priority, confidence) = sums.entry(record.move_class).or_default();
        *count += 1;
        *priority += agg.priority;
        *confidence += agg.confidence;
    }
    sums.into_iter()
        .filter(|(_, (_, _, confidence))| *confidence > 0.0)
        .map(|(class, (rows, priority, confidence))| {
            (
                class,
                ClassPrior {
                    rows,
                    priority: priority / confidence,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use movelore_core::{GameResult, MaterialLevel, PieceClass};

    use super::*;
    use crate::{aggregate::AggregateParams, memory::MemoryStore};

    fn record(piece_class: PieceClass, move_class: MoveClass) -> FeatureRecord {
        FeatureRecord {
            piece_class,
            move_class,
            distance_bucket: 1,
            repetition_bucket: 0,
            stagnation_bucket: 0,
            material_level: MaterialLevel::High,
        }
    }

    #[test]
    fn test_min_times_seen_filters_rows() {
        let mut store = MemoryStore::new(AggregateParams::default());
        let seen_twice = record(PieceClass::Pawn, MoveClass::Quiet);
        let seen_once = record(PieceClass::Rook, MoveClass::Quiet);
        store.upsert(&seen_twice, GameResult::Win, 10).unwrap();
        store.upsert(&seen_twice, GameResult::Win, 10).unwrap();
        store.upsert(&seen_once, GameResult::Win, 10).unwrap();

        let mirror = PatternMirror::load(&store, 2).unwrap();
        assert_eq!(mirror.len(), 1);
        assert!(mirror.get(&seen_twice).is_some());
        assert!(mirror.get(&seen_once).is_none());
    }

    #[test]
    fn test_refresh_picks_up_new_rows() {
        let mut store = MemoryStore::new(AggregateParams::default());
        let mut mirror = PatternMirror::load(&store, 1).unwrap();
        assert!(mirror.is_empty());

        let rec = record(PieceClass::Knight, MoveClass::Capture);
        store.upsert(&rec, GameResult::Win, 320).unwrap();
        assert!(mirror.get(&rec).is_none());
        mirror.refresh(&store).unwrap();
        assert!(mirror.get(&rec).is_some());
    }

    #[test]
    fn test_class_prior_is_confidence_normalized() {
        let params = AggregateParams::default();
        let mut store = MemoryStore::new(params);
        // avg score 50 in both rows: unscaled priority (50 + 1500) / 3100 * 100 = 50.
        for _ in 0..5 {
            store
                .upsert(&record(PieceClass::Pawn, MoveClass::Check), GameResult::Draw, 50)
                .unwrap();
        }
        store
            .upsert(&record(PieceClass::Queen, MoveClass::Check), GameResult::Win, 50)
            .unwrap();

        let mirror = PatternMirror::load(&store, 1).unwrap();
        let prior = mirror.class_prior(MoveClass::Check).unwrap();
        assert_eq!(prior.rows, 2);
        assert!((prior.priority - 50.0).abs() < 1e-9);
        assert!(mirror.class_prior(MoveClass::Quiet).is_none());
    }
}
