//! Learning from finished self-play games.
//!
//! This crate turns a finished game into statistics. After every game the
//! [`Trainer`] walks the plies of the learning side and updates the store.
//!
//! # How Learning Works
//!
//! 1. **Replay**: the move list is replayed through the [`GameRules`]
//!    collaborator into a [`GameTranscript`], which records facts and board
//!    views for every ply and knows which plies ended the game.
//! 2. **Classify**: each learning-side ply is mapped to its
//!    [`FeatureRecord`]. Plies without facts are skipped with a warning.
//! 3. **Credit**: the ply is scored by what it did (captures, checks,
//!    mobility) plus a terminal term only if the transcript marks it as a
//!    proximate cause of the result.
//! 4. **Merge**: the score and the final result are merged into the
//!    record's aggregate.
//! 5. **Lessons**: plies with a large material swing over the opponent's
//!    reply are remembered as mistakes or tactics, under their exact
//!    position and their abstracted signatures.
//! 6. **History**: every ply with a board view is appended to the move
//!    history for later discovery runs.
//!
//! # Architecture
//!
//! ```text
//! moves --> GameTranscript::replay --> GameTranscript
//!                                          |
//!                        +-----------------+-----------------+
//!                        v                 v                 v
//!                 classify + credit   LessonExtractor    HistoryRow
//!                        |                 |                 |
//!                        v                 v                 v
//!                PatternRepository  LessonRepository  HistoryRepository
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! use movelore_store::SqliteStore;
//! use movelore_training::{LearnerConfig, LearnerContext};
//!
//! let config = LearnerConfig::default();
//! let store = SqliteStore::open(Path::new("movelore.db"), config.aggregate)?;
//! let mut ctx = LearnerContext::new(config, store);
//! let summary = ctx
//!     .trainer()
//!     .record_game(&rules, "game-1", &start, &moves, Side::First, GameResult::Win)?;
//! println!("{} plies recorded", summary.recorded);
//! ```
//!
//! [`GameRules`]: movelore_core::GameRules
//! [`FeatureRecord`]: movelore_core::FeatureRecord

pub use self::{
    config::{LearnerConfig, LearnerContext},
    error::TrainError,
    lessons::{LessonCandidate, LessonConfig, LessonExtractor},
    trainer::{GameSummary, LearnSides, Trainer},
    transcript::{GameTranscript, PlyRecord},
};

pub mod config;
mod error;
pub mod lessons;
pub mod trainer;
pub mod transcript;
