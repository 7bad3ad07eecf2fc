//! Offline discovery of geometric patterns in recorded games.
//!
//! The pipeline reads the move history written by the trainer, recognises
//! geometric pattern families on the board after every ply, and estimates how
//! each pattern relates to the final result of the game.
//!
//! # Discovery Workflow
//!
//! 1. **Select Rows** ([`sample::select_rows`]): skip early moves and, if the
//!    history is large, draw a seeded random subset
//! 2. **Observe Families** ([`families::observe`]): forks, pins, skewers,
//!    centralization, doubled/isolated/passed file pieces and hanging pieces,
//!    each reduced to a `family:class:detail:phase` signature
//! 3. **Mine Outcomes** ([`mining::PatternMiner`]): count wins, losses and draws
//!    per signature from the piece owner's perspective
//! 4. **Summarize** ([`mining::family_weights`]): one confidence-weighted
//!    weight per family
//! 5. **Persist** ([`DiscoveryPipeline::run_stored`]): replace the stored
//!    discovery tables with the new result
//!
//! Output tables are rewritten wholesale, so an interrupted run is simply
//! repeated.
//!
//! # Example
//!
//! ```
//! use movelore_analysis::{DiscoveryConfig, DiscoveryPipeline};
//! use movelore_store::MemoryStore;
//!
//! let mut store = MemoryStore::default();
//! let pipeline = DiscoveryPipeline::new(DiscoveryConfig::default())?;
//! let report = pipeline.run_stored(&mut store)?;
//! assert_eq!(report.rows_sampled, 0);
//! assert!(report.patterns.is_empty());
//! # Ok::<(), movelore_analysis::DiscoveryError>(())
//! ```

pub use self::{
    error::DiscoveryError,
    pipeline::{DiscoveryConfig, DiscoveryPipeline, DiscoveryReport, WeightTable},
};

mod error;
pub mod families;
pub mod mining;
mod pipeline;
pub mod sample;
