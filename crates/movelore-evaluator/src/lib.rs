//! Online evaluation: turning moves into keys, scores, orderings and warnings.
//!
//! This crate holds the per-move machinery used both while learning from a
//! finished game and while choosing among candidate moves:
//!
//! 1. **Classification** ([`classifier`]) - maps a move to its [`FeatureRecord`],
//!    the key under which statistics are aggregated.
//! 2. **Abstraction** ([`abstraction`]) - maps positions and moves to
//!    coordinate-free [`Signature`]s used for generalized lookup.
//! 3. **Credit assignment** ([`credit`]) - scores a single ply by what it did,
//!    independent of the final result of the game.
//! 4. **Ranking** ([`ranker`]) - orders candidate moves by learned priority.
//! 5. **Lesson lookup** ([`lookup`]) - flags candidates that resemble remembered
//!    mistakes or tactics.
//!
//! # Architecture
//!
//! ```text
//! learning:   MoveFacts -> classifier -> FeatureRecord --+
//!                       -> credit     -> move score -----+--> PatternRepository::upsert
//!
//! choosing:   candidates -> classifier -> PatternMirror -> ranker -> ordered moves
//!                        -> abstraction -> LessonRepository -> lookup -> advisory signal
//! ```
//!
//! Everything here is a pure function of its inputs plus, for the ranker and the
//! lookup, a read-only view of the store.
//!
//! [`FeatureRecord`]: movelore_core::FeatureRecord
//! [`Signature`]: movelore_core::Signature

pub mod abstraction;
pub mod classifier;
pub mod credit;
pub mod lookup;
pub mod ranker;
