use std::path::PathBuf;

use anyhow::Context;
use movelore_core::Side;
use movelore_training::{GameSummary, LearnSides, LearnerConfig, LearnerContext};

use crate::{
    schema::report::IngestReport,
    util::{self, Output},
};

/// Which side of each game to learn from.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Perspective {
    #[default]
    First,
    Second,
    Both,
}

impl Perspective {
    fn sides(self) -> (Side, LearnSides) {
        match self {
            Perspective::First => (Side::First, LearnSides::Perspective),
            Perspective::Second => (Side::Second, LearnSides::Perspective),
            Perspective::Both => (Side::First, LearnSides::Both),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct IngestArg {
    /// SQLite statistics database
    #[arg(long)]
    store: PathBuf,
    /// JSON array of game transcripts (`-` for stdin)
    #[arg(long)]
    transcripts: PathBuf,
    #[arg(long, default_value = "first")]
    perspective: Perspective,
    /// Learn from at most this many games
    #[arg(long)]
    limit: Option<usize>,
}

pub(crate) fn run(arg: &IngestArg, config: LearnerConfig) -> anyhow::Result<()> {
    let IngestArg {
        store,
        transcripts,
        perspective,
        limit,
    } = arg;
    let games = util::read_transcripts(transcripts)?;
    let store = util::open_store(store, &config)?;
    let mut ctx = LearnerContext::new(config, store);
    let (side, learn_sides) = perspective.sides();

    let mut total = GameSummary::default();
    let mut played = 0;
    for game in games.iter().take(limit.unwrap_or(usize::MAX)) {
        let summary = ctx
            .trainer()
            .with_learn_sides(learn_sides)
            .record_transcript(game, side)
            .with_context(|| format!("Failed to record game {}", game.game_id))?;
        total.merge(&summary);
        played += 1;
    }
    tracing::info!(
        games = played,
        recorded = total.recorded,
        skipped = total.skipped,
        "ingest finished"
    );

    Output::stdout().write_json(&IngestReport {
        games: played,
        recorded: total.recorded,
        skipped: total.skipped,
        lessons: total.lessons,
        history_rows: total.history_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_sides() {
        let both: Perspective = "both".parse().unwrap();
        assert_eq!(both.sides(), (Side::First, LearnSides::Both));
        assert_eq!(
            Perspective::Second.sides(),
            (Side::Second, LearnSides::Perspective)
        );
    }
}
