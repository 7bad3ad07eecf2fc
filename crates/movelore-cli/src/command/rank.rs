use std::path::PathBuf;

use movelore_store::PatternMirror;
use movelore_training::{LearnerConfig, LearnerContext};

use crate::{
    schema::query::RankedCandidate,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RankArg {
    /// SQLite statistics database
    #[arg(long)]
    store: PathBuf,
    /// JSON file with a position and its candidate moves (`-` for stdin)
    #[arg(long)]
    query: PathBuf,
}

pub(crate) fn run(arg: &RankArg, config: LearnerConfig) -> anyhow::Result<()> {
    let RankArg { store, query } = arg;
    let query = util::read_query(query)?;
    let store = util::open_store(store, &config)?;
    let ctx = LearnerContext::new(config, store);

    let mirror: PatternMirror = ctx.mirror()?;
    let ranker = config.ranker(Some(&mirror));
    let lookup = config.lookup();
    let abstractor = config.abstractor();

    let ranked = ranker.rank_facts(
        query
            .candidates
            .iter()
            .map(|c| (c.mv.clone(), c.facts.clone())),
    );
    let mut lines = Vec::with_capacity(ranked.len());
    for ranked in ranked {
        let facts = query
            .candidates
            .iter()
            .find(|c| c.mv == ranked.mv)
            .map(|c| &c.facts);
        let lesson = lookup.check_with(&ctx.store, &query.position, &ranked.mv, || {
            Some(abstractor.signature_pair(query.board.as_ref()?, facts?))
        })?;
        if let Some(signal) = &lesson {
            tracing::info!(
                mv = %ranked.mv,
                kind = %signal.kind,
                exact = signal.is_exact,
                "candidate matches a remembered lesson"
            );
        }
        lines.push(RankedCandidate {
            mv: ranked.mv,
            score: ranked.score,
            source: ranked.source,
            record: ranked.record,
            lesson,
        });
    }
    Output::stdout().write_json(&lines)
}
