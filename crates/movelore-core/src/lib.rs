//! Shared vocabulary for the movelore learning core.
//!
//! movelore learns move priorities for two-player board games without knowing any
//! game's rules. Everything rule-specific comes from a collaborator implementing
//! [`GameRules`]; this crate defines the types that cross that boundary and the
//! types every other crate agrees on.
//!
//! # Modules
//!
//! - [`game`] - Opaque [`Position`]/[`Move`] tokens, sides, results and terminal causes
//! - [`piece`] - Piece classes and the material table used for credit and geometry
//! - [`feature`] - The fixed-shape [`FeatureRecord`] used as the statistics key
//! - [`geometry`] - Squares, board dimensions and the [`BoardView`] introspection snapshot
//! - [`rules`] - The [`GameRules`] collaborator trait and [`MoveFacts`]
//! - [`signature`] - Coordinate-free [`Signature`]s used by the generalized lookup
//! - [`discovery`] - Pattern families and discovery output records
//!
//! # Example
//!
//! ```
//! use movelore_core::{FeatureRecord, MaterialLevel, MoveClass, PieceClass};
//!
//! let record = FeatureRecord {
//!     piece_class: PieceClass::Knight,
//!     move_class: MoveClass::Capture,
//!     distance_bucket: 3,
//!     repetition_bucket: 0,
//!     stagnation_bucket: 0,
//!     material_level: MaterialLevel::High,
//! };
//! assert_eq!(record.to_string(), "knight/capture/d3/r0/s0/high");
//! ```

pub use self::{discovery::*, feature::*, game::*, geometry::*, piece::*, rules::*, signature::*};

pub mod discovery;
pub mod feature;
pub mod game;
pub mod geometry;
pub mod piece;
pub mod rules;
pub mod signature;
