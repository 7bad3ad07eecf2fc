//! Candidate move ordering.
//!
//! The [`Ranker`] orders a list of candidate moves by how promising their
//! feature records have been in past games. It never removes or adds a
//! candidate; it only reorders.
//!
//! # Scoring
//!
//! For each candidate, in order of preference:
//!
//! 1. **Learned** - the record is in the [`PatternMirror`]:
//!    `priority + (1 - confidence) * default(move_class)`. The class default
//!    fades out as evidence for the record accumulates.
//! 2. **Class prior** - the record was never seen, but enough records of the
//!    same move class were: the mean confidence-normalized priority of those.
//! 3. **Default** - fixed per-class values that only exist to bootstrap a cold
//!    store.
//!
//! A candidate the rule collaborator cannot describe is scored with the quiet
//! default.
//!
//! The sort is stable and descending, so equal scores keep their input order.

use movelore_core::{FeatureRecord, GameRules, Move, MoveClass, MoveFacts, Position};
use movelore_store::PatternMirror;
use serde::{Deserialize, Serialize};

use crate::classifier::FeatureClassifier;

/// Bootstrap scores per move class, on the same 0-100 scale as priorities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassDefaults {
    pub forcing_capture_check: f64,
    pub capture: f64,
    pub check: f64,
    pub development: f64,
    pub quiet: f64,
}

impl Default for ClassDefaults {
    fn default() -> Self {
        Self {
            forcing_capture_check: 60.0,
            capture: 45.0,
            check: 35.0,
            development: 25.0,
            quiet: 10.0,
        }
    }
}

impl ClassDefaults {
    #[must_use]
    pub const fn value(&self, class: MoveClass) -> f64 {
        match class {
            MoveClass::ForcingCaptureCheck => self.forcing_capture_check,
            MoveClass::Capture => self.capture,
            MoveClass::Check => self.check,
            MoveClass::Development => self.development,
            MoveClass::Quiet => self.quiet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    pub defaults: ClassDefaults,
    /// Mirror rows of a move class needed before its prior replaces the default.
    pub class_prior_min_rows: usize,
    /// Minimum `times_seen` for a row to enter the mirror.
    pub mirror_min_times_seen: u64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            defaults: ClassDefaults::default(),
            class_prior_min_rows: 5,
            mirror_min_times_seen: 1,
        }
    }
}

/// Where a candidate's score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Learned,
    ClassPrior,
    Default,
    /// The collaborator could not describe the move.
    Undescribed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMove {
    pub mv: Move,
    pub score: f64,
    pub record: Option<FeatureRecord>,
    pub source: ScoreSource,
}

#[derive(Debug, Clone)]
pub struct Ranker<'a> {
    config: RankerConfig,
    classifier: FeatureClassifier,
    mirror: Option<&'a PatternMirror>,
}

impl<'a> Ranker<'a> {
    /// Creates a ranker. Without a mirror every candidate gets its class default.
    #[must_use]
    pub fn new(
        config: RankerConfig,
        classifier: FeatureClassifier,
        mirror: Option<&'a PatternMirror>,
    ) -> Self {
        Self {
            config,
            classifier,
            mirror,
        }
    }

    /// Orders `candidates` for the side to move in `position`.
    pub fn rank<R>(&self, rules: &R, position: &Position, candidates: &[Move]) -> Vec<RankedMove>
    where
        R: GameRules + ?Sized,
    {
        let ranked = candidates
            .iter()
            .map(|mv| match rules.describe_move(position, mv) {
                Ok(facts) => self.score_facts(mv.clone(), &facts),
                Err(error) => {
                    tracing::warn!(
                        position = %position,
                        mv = %mv,
                        %error,
                        "cannot describe candidate; using quiet default"
                    );
                    RankedMove {
                        mv: mv.clone(),
                        score: self.config.defaults.quiet,
                        record: None,
                        source: ScoreSource::Undescribed,
                    }
                }
            })
            .collect();
        sorted(ranked)
    }

    /// Orders candidates whose facts are already known.
    pub fn rank_facts<I>(&self, candidates: I) -> Vec<RankedMove>
    where
        I: IntoIterator<Item = (Move, MoveFacts)>,
    {
        let ranked = candidates
            .into_iter()
            .map(|(mv, facts)| self.score_facts(mv, &facts))
            .collect();
        sorted(ranked)
    }

    /// Score and provenance of `record`.
    #[must_use]
    pub fn score_record(&self, record: &FeatureRecord) -> (f64, ScoreSource) {
        let default = self.config.defaults.value(record.move_class);
        let Some(mirror) = self.mirror else {
            return (default, ScoreSource::Default);
        };
        if let Some(agg) = mirror.get(record) {
            return (
                agg.priority + (1.0 - agg.confidence) * default,
                ScoreSource::Learned,
            );
        }
        match mirror.class_prior(record.move_class) {
            Some(prior) if prior.rows >= self.config.class_prior_min_rows => {
                (prior.priority, ScoreSource::ClassPrior)
            }
            _ => (default, ScoreSource::Default),
        }
    }

    fn score_facts(&self, mv: Move, facts: &MoveFacts) -> RankedMove {
        let record = self.classifier.classify(facts);
        let (score, source) = self.score_record(&record);
        RankedMove {
            mv,
            score,
            record: Some(record),
            source,
        }
    }
}

fn sorted(mut ranked: Vec<RankedMove>) -> Vec<RankedMove> {
    // `sort_by` is stable: equal scores keep their input order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
