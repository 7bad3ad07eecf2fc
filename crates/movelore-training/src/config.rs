use movelore_analysis::DiscoveryConfig;
use movelore_evaluator::{
    abstraction::{Abstractor, AbstractorConfig},
    classifier::{ClassifierConfig, FeatureClassifier},
    credit::CreditConfig,
    lookup::{LessonLookup, LookupConfig},
    ranker::{Ranker, RankerConfig},
};
use movelore_store::{AggregateParams, LearnerStore, PatternMirror, StoreError};
use serde::{Deserialize, Serialize};

use crate::{lessons::LessonConfig, trainer::Trainer};

/// Every tunable of the learner in one place.
///
/// Missing fields fall back to their defaults, so a configuration file only
/// has to mention what it changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    pub aggregate: AggregateParams,
    pub classifier: ClassifierConfig,
    pub abstractor: AbstractorConfig,
    pub credit: CreditConfig,
    pub ranker: RankerConfig,
    pub lookup: LookupConfig,
    pub lessons: LessonConfig,
    pub discovery: DiscoveryConfig,
}

impl LearnerConfig {
    #[must_use]
    pub const fn classifier(&self) -> FeatureClassifier {
        FeatureClassifier::new(self.classifier)
    }

    #[must_use]
    pub fn abstractor(&self) -> Abstractor {
        Abstractor::new(self.abstractor, self.classifier())
    }

    #[must_use]
    pub const fn lookup(&self) -> LessonLookup {
        LessonLookup::new(self.lookup)
    }

    #[must_use]
    pub fn ranker<'a>(&self, mirror: Option<&'a PatternMirror>) -> Ranker<'a> {
        Ranker::new(self.ranker, self.classifier(), mirror)
    }
}

/// A configuration paired with the store it governs.
#[derive(Debug)]
pub struct LearnerContext<S> {
    pub config: LearnerConfig,
    pub store: S,
}

impl<S> LearnerContext<S>
where
    S: LearnerStore,
{
    #[must_use]
    pub const fn new(config: LearnerConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Loads a ranking snapshot of the current statistics.
    pub fn mirror(&self) -> Result<PatternMirror, StoreError> {
        PatternMirror::load(&self.store, self.config.ranker.mirror_min_times_seen)
    }

    #[must_use]
    pub fn trainer(&mut self) -> Trainer<'_, S> {
        Trainer::new(&self.config, &mut self.store)
    }
}
