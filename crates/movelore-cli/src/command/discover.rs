use std::path::PathBuf;

use chrono::Utc;
use movelore_analysis::DiscoveryPipeline;
use movelore_training::LearnerConfig;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DiscoverArg {
    /// SQLite statistics database
    #[arg(long)]
    store: PathBuf,
    /// Mine at most this many history rows
    #[arg(long)]
    limit: Option<usize>,
    /// Seed for row sampling
    #[arg(long)]
    seed: Option<u64>,
    /// Weight table output path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DiscoverArg, config: LearnerConfig) -> anyhow::Result<()> {
    let DiscoverArg {
        store,
        limit,
        seed,
        output,
    } = arg;
    let mut discovery = config.discovery;
    if let Some(limit) = limit {
        discovery.sample_limit = Some(*limit);
    }
    if let Some(seed) = seed {
        discovery.seed = *seed;
    }

    let pipeline = DiscoveryPipeline::new(discovery)?;
    let mut store = util::open_store(store, &config)?;
    let report = pipeline.run_stored(&mut store)?;
    tracing::info!(
        weights = report.weights.len(),
        output = ?output,
        "writing weight table"
    );

    let table = report.weight_table(Utc::now().to_rfc3339());
    Output::create(output.as_deref())?.write_json(&table)
}
