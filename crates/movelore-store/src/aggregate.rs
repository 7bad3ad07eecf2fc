//! Running statistics kept per [`FeatureRecord`](movelore_core::FeatureRecord).
//!
//! A [`PatternAggregate`] is never edited field by field. Every change goes
//! through [`PatternAggregate::from_parts`], which recomputes the derived
//! columns (`avg_score`, `confidence`, `priority`) from the raw counters, so the
//! derived columns can not disagree with the counters they summarize.

use movelore_core::GameResult;
use movelore_stats::{
    confidence::{clamp01, saturation},
    outcome::OutcomeTally,
};
use serde::{Deserialize, Serialize};

/// Constants mapping raw move scores onto a priority in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateParams {
    /// Observations needed for full confidence.
    pub n_saturate: f64,
    /// Added to the average score so that the lowest possible score maps to 0.
    pub score_offset: f64,
    /// Width of the possible score range.
    pub score_scale: f64,
}

impl Default for AggregateParams {
    fn default() -> Self {
        Self {
            n_saturate: 50.0,
            score_offset: 1500.0,
            score_scale: 3100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternAggregate {
    pub times_seen: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub total_score: i64,
    pub avg_score: f64,
    pub confidence: f64,
    pub priority: f64,
}

impl PatternAggregate {
    /// Builds an aggregate from its raw counters.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_parts(outcomes: OutcomeTally, total_score: i64, params: &AggregateParams) -> Self {
        let times_seen = outcomes.total();
        let avg_score = if times_seen == 0 {
            0.0
        } else {
            total_score as f64 / times_seen as f64
        };
        let confidence = saturation(times_seen, params.n_saturate);
        let normalized = clamp01((avg_score + params.score_offset) / params.score_scale);
        Self {
            times_seen,
            wins: outcomes.wins,
            losses: outcomes.losses,
            draws: outcomes.draws,
            total_score,
            avg_score,
            confidence,
            priority: normalized * 100.0 * confidence,
        }
    }

    #[must_use]
    pub fn empty(params: &AggregateParams) -> Self {
        Self::from_parts(OutcomeTally::default(), 0, params)
    }

    /// Returns the aggregate after one more observation.
    #[must_use]
    pub fn observe(&self, result: GameResult, move_score: i64, params: &AggregateParams) -> Self {
        let mut outcomes = self.outcomes();
        match result {
            GameResult::Win => outcomes.record_win(),
            GameResult::Loss => outcomes.record_loss(),
            GameResult::Draw => outcomes.record_draw(),
        }
        Self::from_parts(outcomes, self.total_score.saturating_add(move_score), params)
    }

    #[must_use]
    pub const fn outcomes(&self) -> OutcomeTally {
        OutcomeTally::new(self.wins, self.losses, self.draws)
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        self.outcomes().score_rate()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn observe_all(observations: &[(GameResult, i64)]) -> PatternAggregate {
        let params = AggregateParams::default();
        observations
            .iter()
            .fold(PatternAggregate::empty(&params), |agg, (result, score)| {
                agg.observe(*result, *score, &params)
            })
    }

    #[test]
    fn test_three_wins_one_loss() {
        let agg = observe_all(&[
            (GameResult::Win, 1200),
            (GameResult::Win, 1100),
            (GameResult::Win, 1300),
            (GameResult::Loss, -900),
        ]);
        assert_eq!(agg.times_seen, 4);
        assert_eq!((agg.wins, agg.losses, agg.draws), (3, 1, 0));
        assert_eq!(agg.total_score, 2700);
        assert_eq!(agg.avg_score, 675.0);
        assert_eq!(agg.confidence, 4.0 / 50.0);

        let single_loss = observe_all(&[(GameResult::Loss, -900)]);
        assert!(agg.priority > single_loss.priority);
    }

    #[test]
    fn test_score_extremes_map_to_priority_bounds() {
        let params = AggregateParams::default();
        let worst = PatternAggregate::from_parts(OutcomeTally::new(0, 50, 0), -1500 * 50, &params);
        assert_eq!(worst.priority, 0.0);
        let best = PatternAggregate::from_parts(OutcomeTally::new(50, 0, 0), 1600 * 50, &params);
        assert!((best.priority - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_has_zero_priority() {
        let agg = PatternAggregate::empty(&AggregateParams::default());
        assert_eq!(agg.times_seen, 0);
        assert_eq!(agg.priority, 0.0);
    }

    fn arb_result() -> impl Strategy<Value = GameResult> {
        prop_oneof![
            Just(GameResult::Win),
            Just(GameResult::Loss),
            Just(GameResult::Draw),
        ]
    }

    proptest! {
        #[test]
        fn counters_always_sum_to_times_seen(
            observations in prop::collection::vec((arb_result(), -5000i64..5000), 0..200)
        ) {
            let agg = observe_all(&observations);
            prop_assert_eq!(agg.wins + agg.losses + agg.draws, agg.times_seen);
            prop_assert_eq!(agg.times_seen, observations.len() as u64);
        }

        #[test]
        fn priority_stays_in_range(
            observations in prop::collection::vec((arb_result(), -100_000i64..100_000), 0..200)
        ) {
            let agg = observe_all(&observations);
            prop_assert!((0.0..=100.0).contains(&agg.priority));
            prop_assert!((0.0..=1.0).contains(&agg.confidence));
        }
    }
}
