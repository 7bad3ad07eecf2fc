use serde::{Deserialize, Serialize};

/// Coordinate-free canonical description of a situation.
///
/// Two concrete positions (or moves) that share a signature are treated as the
/// same situation by the generalized lookup.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    #[must_use]
    pub fn new<S>(value: S) -> Self
    where
        S: Into<String>,
    {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Signature of a position together with the signature of a move played in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignaturePair {
    pub position_pattern: Signature,
    pub move_pattern: Signature,
}
