use std::collections::BTreeMap;

use movelore_core::{DiscoveredPattern, FamilyWeight, MaterialTable, PatternFamily};
use movelore_store::{DiscoveryRepository, HistoryRepository, HistoryRow};
use serde::{Deserialize, Serialize};

use crate::{
    DiscoveryError,
    mining::{PatternMiner, family_weights},
    sample::select_rows,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Maximum rows per run; `None` uses the whole history.
    pub sample_limit: Option<usize>,
    pub seed: u64,
    /// Rows with an earlier full-move number are skipped.
    pub min_move_number: u32,
    /// Observations needed before a signature is reported.
    pub common_min_samples: u64,
    /// Lower threshold for forks, pins and skewers, which are seen less often.
    pub rare_min_samples: u64,
    /// Maps a win rate of 1.0 to `value_scale / 2`.
    pub value_scale: f64,
    /// Frequency at which a signature gets full weight in its family summary.
    pub weight_saturation: f64,
    pub material: MaterialTable,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sample_limit: None,
            seed: 42,
            min_move_number: 1,
            common_min_samples: 10,
            rare_min_samples: 5,
            value_scale: 200.0,
            weight_saturation: 100.0,
            material: MaterialTable::default(),
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub const fn min_samples(&self, family: PatternFamily) -> u64 {
        if family.is_rare() {
            self.rare_min_samples
        } else {
            self.common_min_samples
        }
    }

    fn validate(&self) -> Result<(), DiscoveryError> {
        if self.sample_limit == Some(0) {
            return Err(DiscoveryError::invalid("sample_limit must be positive"));
        }
        if self.common_min_samples == 0 || self.rare_min_samples == 0 {
            return Err(DiscoveryError::invalid("minimum sample counts must be positive"));
        }
        if !(self.value_scale.is_finite() && self.value_scale > 0.0) {
            return Err(DiscoveryError::invalid("value_scale must be positive"));
        }
        if !(self.weight_saturation.is_finite() && self.weight_saturation > 0.0) {
            return Err(DiscoveryError::invalid("weight_saturation must be positive"));
        }
        Ok(())
    }
}

/// Result of one discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// History rows eligible for the run.
    pub rows_available: usize,
    /// Rows actually mined.
    pub rows_sampled: usize,
    /// Distinct signatures seen, reported or not.
    pub signatures_seen: usize,
    pub patterns: Vec<DiscoveredPattern>,
    pub weights: Vec<FamilyWeight>,
}

impl DiscoveryReport {
    /// Family weights keyed by family, for export.
    #[must_use]
    pub fn weight_table(&self, generated_at: String) -> WeightTable {
        WeightTable {
            generated_at,
            rows_sampled: self.rows_sampled,
            weights: self.weights.iter().map(|w| (w.family, w.weight)).collect(),
        }
    }
}

/// The exported form of the family weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    pub rows_sampled: usize,
    pub weights: BTreeMap<PatternFamily, f64>,
}

#[derive(Debug, Clone)]
pub struct DiscoveryPipeline {
    config: DiscoveryConfig,
}

impl DiscoveryPipeline {
    pub fn new(config: DiscoveryConfig) -> Result<Self, DiscoveryError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Mines `rows` without touching any store.
    #[must_use]
    pub fn run(&self, rows: &[HistoryRow]) -> DiscoveryReport {
        let config = &self.config;
        let rows_available = rows
            .iter()
            .filter(|row| row.move_number >= config.min_move_number)
            .count();
        let selected = select_rows(rows, config.min_move_number, config.sample_limit, config.seed);

        let mut miner = PatternMiner::new();
        for row in &selected {
            miner.observe_row(row, &config.material);
        }
        let patterns = miner.patterns(config);
        let weights = family_weights(&patterns, config);

        tracing::info!(
            rows_available,
            rows_sampled = miner.rows(),
            signatures = miner.signatures(),
            patterns = patterns.len(),
            "discovery run finished"
        );
        DiscoveryReport {
            rows_available,
            rows_sampled: miner.rows(),
            signatures_seen: miner.signatures(),
            patterns,
            weights,
        }
    }

    /// Reads the history from `repo`, mines it and replaces the stored
    /// discovery output with the result.
    pub fn run_stored<R>(&self, repo: &mut R) -> Result<DiscoveryReport, DiscoveryError>
    where
        R: HistoryRepository + DiscoveryRepository + ?Sized,
    {
        let rows = repo.history(self.config.min_move_number)?;
        let report = self.run(&rows);
        repo.replace_discovery(&report.patterns, &report.weights)?;
        Ok(report)
    }
}
