//! Outcome counting per signature, and the summaries derived from it.

use std::collections::{BTreeMap, BTreeSet};

use movelore_core::{
    DiscoveredPattern, FamilyWeight, GameResult, MaterialTable, PatternFamily, Polarity,
};
use movelore_stats::{
    confidence::{saturation, weighted_mean},
    outcome::OutcomeTally,
};
use movelore_store::HistoryRow;

use crate::{families, pipeline::DiscoveryConfig};

/// Win/loss/draw counts of every signature seen so far.
#[derive(Debug, Clone, Default)]
pub struct PatternMiner {
    counts: BTreeMap<String, (PatternFamily, OutcomeTally)>,
    rows: usize,
}

impl PatternMiner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every signature on the row's board once per owning side.
    pub fn observe_row(&mut self, row: &HistoryRow, material: &MaterialTable) {
        let phase = row.phase();
        let seen = families::observe(&row.board_after, material)
            .into_iter()
            .map(|o| (o.owner, o.signature(phase), o.family))
            .collect::<BTreeSet<_>>();

        for (owner, signature, family) in seen {
            let (_, tally) = self
                .counts
                .entry(signature)
                .or_insert_with(|| (family, OutcomeTally::default()));
            match row.result_for_mover.for_side(row.mover, owner) {
                GameResult::Win => tally.record_win(),
                GameResult::Loss => tally.record_loss(),
                GameResult::Draw => tally.record_draw(),
            }
        }
        self.rows += 1;
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn signatures(&self) -> usize {
        self.counts.len()
    }

    /// Signatures seen often enough to be reported, in signature order.
    #[must_use]
    pub fn patterns(&self, config: &DiscoveryConfig) -> Vec<DiscoveredPattern> {
        self.counts
            .iter()
            .filter(|(_, (family, tally))| tally.total() >= config.min_samples(*family))
            .map(|(signature, (family, tally))| {
                let win_rate = tally.score_rate();
                DiscoveredPattern {
                    signature: signature.clone(),
                    family: *family,
                    wins: tally.wins,
                    losses: tally.losses,
                    draws: tally.draws,
                    win_rate,
                    value_estimate: (win_rate - 0.5) * config.value_scale,
                    frequency: tally.total(),
                }
            })
            .collect()
    }
}

/// One summary weight per family.
///
/// Reward families average their positive signatures, penalty families their
/// negative ones, each weighted by how often it was seen. A family with no
/// such signature gets a weight of zero.
#[must_use]
pub fn family_weights(patterns: &[DiscoveredPattern], config: &DiscoveryConfig) -> Vec<FamilyWeight> {
    PatternFamily::ALL
        .into_iter()
        .map(|family| {
            let used = patterns
                .iter()
                .filter(|p| p.family == family)
                .filter(|p| match family.polarity() {
                    Polarity::Reward => p.value_estimate > 0.0,
                    Polarity::Penalty => p.value_estimate < 0.0,
                })
                .collect::<Vec<_>>();
            let weight = weighted_mean(
                used.iter()
                    .map(|p| (p.value_estimate, saturation(p.frequency, config.weight_saturation))),
            )
            .unwrap_or(0.0);
            FamilyWeight {
                family,
                weight,
                signatures_used: used.len() as u64,
                total_frequency: used.iter().map(|p| p.frequency).sum(),
            }
        })
        .collect()
}
