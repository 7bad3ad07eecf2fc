use chrono::{DateTime, Utc};
use movelore_core::{DiscoveredPattern, FamilyWeight, FeatureRecord};
use movelore_stats::descriptive::DescriptiveStats;
use movelore_store::PatternAggregate;
use serde::{Deserialize, Serialize};

/// Totals of one `ingest` run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub games: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub lessons: usize,
    pub history_rows: usize,
}

/// Snapshot of the store produced by `report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreReport {
    pub generated_at: DateTime<Utc>,
    /// Records seen at least `min_times_seen` times
    pub pattern_count: usize,
    /// Distribution of `avg_score` over those records
    pub avg_score: Option<DescriptiveStats>,
    pub priority: Option<DescriptiveStats>,
    pub mistakes: usize,
    pub tactics: usize,
    pub history_rows: usize,
    /// Highest-priority records
    pub top_patterns: Vec<PatternLine>,
    /// Discovered signatures with the largest value estimates, either sign
    pub top_discovered: Vec<DiscoveredPattern>,
    pub family_weights: Vec<FamilyWeight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternLine {
    /// Compact `piece/class/dN/rN/sN/level` key
    pub key: String,
    pub record: FeatureRecord,
    pub stats: PatternAggregate,
}
