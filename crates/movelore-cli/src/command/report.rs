use std::path::PathBuf;

use chrono::Utc;
use movelore_stats::descriptive::DescriptiveStats;
use movelore_store::{
    DiscoveryRepository, HistoryRepository, LessonKind, LessonRepository, PatternRepository,
};
use movelore_training::LearnerConfig;

use crate::{
    schema::report::{PatternLine, StoreReport},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    /// SQLite statistics database
    #[arg(long)]
    store: PathBuf,
    /// Ignore records seen fewer times
    #[arg(long, default_value_t = 1)]
    min_times_seen: u64,
    /// Number of records and discovered patterns to list
    #[arg(long, default_value_t = 20)]
    top: usize,
}

pub(crate) fn run(arg: &ReportArg, config: LearnerConfig) -> anyhow::Result<()> {
    let ReportArg {
        store,
        min_times_seen,
        top,
    } = arg;
    let store = util::open_store(store, &config)?;

    let mut patterns = store.scan(*min_times_seen)?;
    patterns.sort_by(|a, b| b.1.priority.total_cmp(&a.1.priority));
    let pattern_count = patterns.len();
    let avg_score = DescriptiveStats::new(patterns.iter().map(|(_, stats)| stats.avg_score));
    let priority = DescriptiveStats::new(patterns.iter().map(|(_, stats)| stats.priority));
    let top_patterns = patterns
        .into_iter()
        .take(*top)
        .map(|(record, stats)| PatternLine {
            key: record.to_string(),
            record,
            stats,
        })
        .collect();

    let mut discovered = store.discovered_patterns()?;
    discovered.sort_by(|a, b| b.value_estimate.abs().total_cmp(&a.value_estimate.abs()));
    discovered.truncate(*top);

    let report = StoreReport {
        generated_at: Utc::now(),
        pattern_count,
        avg_score,
        priority,
        mistakes: store.lessons(LessonKind::Mistake)?.len(),
        tactics: store.lessons(LessonKind::Tactic)?.len(),
        history_rows: store.history(0)?.len(),
        top_patterns,
        top_discovered: discovered,
        family_weights: store.family_weights()?,
    };
    Output::stdout().write_json(&report)
}
