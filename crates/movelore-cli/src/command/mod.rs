use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{discover::DiscoverArg, ingest::IngestArg, rank::RankArg, report::ReportArg};

mod discover;
mod ingest;
mod rank;
mod report;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Learner configuration JSON file; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Learn from recorded game transcripts
    Ingest(#[clap(flatten)] IngestArg),
    /// Mine geometric patterns from the stored move history
    Discover(#[clap(flatten)] DiscoverArg),
    /// Summarize what the store has learned
    Report(#[clap(flatten)] ReportArg),
    /// Order candidate moves by learned priority
    Rank(#[clap(flatten)] RankArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    let config = crate::util::read_config(args.config.as_deref())?;
    match &args.mode {
        Mode::Ingest(arg) => ingest::run(arg, config)?,
        Mode::Discover(arg) => discover::run(arg, config)?,
        Mode::Report(arg) => report::run(arg, config)?,
        Mode::Rank(arg) => rank::run(arg, config)?,
    }
    Ok(())
}

/// Logs go to stderr so that command output on stdout stays parseable.
///
/// `-v` flags take precedence over `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
