//! Move-level credit assignment.
//!
//! A game's final result says little about any single move in it. The
//! [`CreditAssignor`] scores a move by what that move itself did: material it
//! won, check it gave, options it kept open, and whether it was the move that
//! ended the game.
//!
//! Terminal terms apply only to the ply a [`TerminalEffect`] is attached to.
//! The assignor never looks at the game result itself, so a draw or a loss can
//! not leak into the scores of earlier moves. Deciding which ply carries the
//! effect is the job of the game transcript, which knows the ply order.

use movelore_core::{MaterialTable, MoveFacts, TerminalCause};
use serde::{Deserialize, Serialize};

/// What the scored ply did to the end of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum TerminalEffect {
    /// The ply ended the game in the mover's favour.
    DeliveredWin,
    /// The ply produced a drawn terminal position.
    CausedDraw(TerminalCause),
    /// The mover's last ply before losing.
    AllowedLoss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditConfig {
    pub material: MaterialTable,
    pub check_bonus: i64,
    pub draw_penalty: i64,
    pub win_bonus: i64,
    pub loss_penalty: i64,
    /// Bonus per legal move available after the ply.
    pub mobility_per_move: i64,
    pub mobility_cap: i64,
    pub min_score: i64,
    pub max_score: i64,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            material: MaterialTable::default(),
            check_bonus: 50,
            draw_penalty: 500,
            win_bonus: 1000,
            loss_penalty: 1000,
            mobility_per_move: 2,
            mobility_cap: 100,
            min_score: -1500,
            max_score: 1600,
        }
    }
}

/// Everything the assignor needs to score one ply.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub facts: &'a MoveFacts,
    /// Legal moves in the position after the ply.
    pub legal_moves_after: usize,
    pub terminal: Option<TerminalEffect>,
}

/// Score of one ply split into its terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBreakdown {
    pub material: i64,
    pub check: i64,
    pub mobility: i64,
    pub terminal: i64,
    /// Sum of the terms, clamped to the configured range.
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreditAssignor {
    config: CreditConfig,
}

impl CreditAssignor {
    #[must_use]
    pub const fn new(config: CreditConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CreditConfig {
        &self.config
    }

    #[must_use]
    pub fn score(&self, ctx: &MoveContext<'_>) -> i64 {
        self.breakdown(ctx).total
    }

    #[must_use]
    pub fn breakdown(&self, ctx: &MoveContext<'_>) -> CreditBreakdown {
        let config = &self.config;
        let material = ctx
            .facts
            .captured
            .map_or(0, |class| config.material.value(class));
        let check = if ctx.facts.gives_check {
            config.check_bonus
        } else {
            0
        };
        let (mobility, terminal) = match ctx.terminal {
            Some(TerminalEffect::DeliveredWin) => (0, config.win_bonus),
            Some(TerminalEffect::CausedDraw(_)) => (0, -config.draw_penalty),
            Some(TerminalEffect::AllowedLoss) => (0, -config.loss_penalty),
            None => {
                let moves = i64::try_from(ctx.legal_moves_after).unwrap_or(i64::MAX);
                let mobility = moves
                    .saturating_mul(config.mobility_per_move)
                    .min(config.mobility_cap);
                (mobility, 0)
            }
        };
        let total = (material + check + mobility + terminal).clamp(config.min_score, config.max_score);
        CreditBreakdown {
            material,
            check,
            mobility,
            terminal,
            total,
        }
    }
}
