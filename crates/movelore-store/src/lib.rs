//! Persistent statistics for the movelore learning core.
//!
//! This crate owns everything that survives between games:
//!
//! - per-[`FeatureRecord`](movelore_core::FeatureRecord) move statistics
//!   ([`PatternAggregate`]), and a read-only [`PatternMirror`] of them for ranking
//! - remembered mistakes and tactics ([`LessonEntry`])
//! - raw per-ply game history ([`HistoryRow`]) consumed by discovery
//! - the output tables of the discovery pipeline
//!
//! Every concern is a trait in [`repository`]; [`SqliteStore`] and [`MemoryStore`]
//! implement all of them.
//!
//! # Example
//!
//! ```
//! use movelore_core::{FeatureRecord, GameResult, MaterialLevel, MoveClass, PieceClass};
//! use movelore_store::{AggregateParams, PatternRepository, SqliteStore};
//!
//! let mut store = SqliteStore::open_in_memory(AggregateParams::default())?;
//! let record = FeatureRecord {
//!     piece_class: PieceClass::Bishop,
//!     move_class: MoveClass::Quiet,
//!     distance_bucket: 2,
//!     repetition_bucket: 0,
//!     stagnation_bucket: 0,
//!     material_level: MaterialLevel::High,
//! };
//! let agg = store.upsert(&record, GameResult::Win, 1000)?;
//! assert_eq!(agg.times_seen, 1);
//! assert_eq!(agg.wins, 1);
//! # Ok::<(), movelore_store::StoreError>(())
//! ```

pub use self::{
    aggregate::{AggregateParams, PatternAggregate},
    error::StoreError,
    history::HistoryRow,
    lesson::{LessonAggregate, LessonEntry, LessonKind, LessonObservation},
    memory::MemoryStore,
    mirror::{ClassPrior, PatternMirror},
    repository::{
        DiscoveryRepository, HistoryRepository, LearnerStore, LessonRepository, PatternRepository,
    },
    sqlite::SqliteStore,
};

pub mod aggregate;
mod error;
pub mod history;
pub mod lesson;
pub mod memory;
pub mod mirror;
pub mod repository;
pub mod sqlite;
