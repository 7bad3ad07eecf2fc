//! Feature classification: from one move to one [`FeatureRecord`].
//!
//! Classification is a pure function of the [`MoveFacts`] the rule
//! collaborator reports. Identical `(position, move)` inputs therefore always
//! produce an identical record, which is what makes the record usable as a
//! statistics key.
//!
//! # Move classes
//!
//! | capture | check | development | class |
//! |---|---|---|---|
//! | yes | yes | - | `ForcingCaptureCheck` |
//! | yes | no | - | `Capture` |
//! | no | yes | - | `Check` |
//! | no | no | yes | `Development` |
//! | no | no | no | `Quiet` |
//!
//! A move is a development move when it starts inside the mover's home zone
//! (at most [`ClassifierConfig::home_depth`] ranks from the home rank) and ends
//! farther from home than it started.

use movelore_core::{
    FeatureRecord, GameRules, MAX_DISTANCE_BUCKET, MAX_REPETITION_BUCKET, MAX_STAGNATION_BUCKET,
    MaterialLevel, Move, MoveClass, MoveFacts, Position, RulesError, STAGNATION_BUCKET_WIDTH,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Ranks from the home rank that still count as the home zone.
    pub home_depth: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { home_depth: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot classify move {mv} in position {position}: {source}")]
pub struct ClassifyError {
    position: Position,
    mv: Move,
    source: RulesError,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureClassifier {
    config: ClassifierConfig,
}

impl FeatureClassifier {
    #[must_use]
    pub const fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Asks the collaborator to describe `mv` and classifies it.
    pub fn classify_move<R>(
        &self,
        rules: &R,
        position: &Position,
        mv: &Move,
    ) -> Result<FeatureRecord, ClassifyError>
    where
        R: GameRules + ?Sized,
    {
        let facts = rules
            .describe_move(position, mv)
            .map_err(|source| ClassifyError {
                position: position.clone(),
                mv: mv.clone(),
                source,
            })?;
        Ok(self.classify(&facts))
    }

    #[must_use]
    pub fn classify(&self, facts: &MoveFacts) -> FeatureRecord {
        let destination_distance = facts.dims.distance_from_home(facts.mover, facts.to);
        FeatureRecord {
            piece_class: facts.piece,
            move_class: self.move_class(facts),
            distance_bucket: destination_distance.min(MAX_DISTANCE_BUCKET),
            repetition_bucket: bucket(facts.repetition_count, 1, MAX_REPETITION_BUCKET),
            stagnation_bucket: bucket(
                facts.stagnation_counter,
                STAGNATION_BUCKET_WIDTH,
                MAX_STAGNATION_BUCKET,
            ),
            material_level: MaterialLevel::from_material(
                facts.material_on_board,
                facts.material_at_start,
            ),
        }
    }

    #[must_use]
    pub fn move_class(&self, facts: &MoveFacts) -> MoveClass {
        MoveClass::from_flags(
            facts.is_capture(),
            facts.gives_check,
            self.is_development(facts),
        )
    }

    #[must_use]
    pub fn is_development(&self, facts: &MoveFacts) -> bool {
        let from = facts.dims.distance_from_home(facts.mover, facts.from);
        let to = facts.dims.distance_from_home(facts.mover, facts.to);
        from <= self.config.home_depth && to > from
    }
}

fn bucket(value: u32, width: u32, max: u8) -> u8 {
    u8::try_from(value / width).map_or(max, |b| b.min(max))
}

#[cfg(test)]
mod tests {
    use movelore_core::{BoardDims, PieceClass, Side, Square};

    use super::*;

    fn facts(piece: PieceClass, from: (u8, u8), to: (u8, u8)) -> MoveFacts {
        MoveFacts {
            mover: Side::First,
            piece,
            from: Square::new(from.0, from.1),
            to: Square::new(to.0, to.1),
            captured: None,
            gives_check: false,
            stagnation_counter: 0,
            repetition_count: 0,
            material_on_board: 7800,
            material_at_start: 7800,
            dims: BoardDims::new(8, 8),
        }
    }

    #[test]
    fn test_knight_development() {
        let classifier = FeatureClassifier::default();
        let record = classifier.classify(&facts(PieceClass::Knight, (6, 0), (5, 2)));
        assert_eq!(record.move_class, MoveClass::Development);
        assert_eq!(record.distance_bucket, 2);
        assert_eq!(record.material_level, MaterialLevel::High);
    }

    #[test]
    fn test_move_class_precedence() {
        let classifier = FeatureClassifier::default();
        let mut f = facts(PieceClass::Queen, (3, 0), (3, 6));
        f.captured = Some(PieceClass::Pawn);
        f.gives_check = true;
        assert_eq!(classifier.classify(&f).move_class, MoveClass::ForcingCaptureCheck);
        f.gives_check = false;
        assert_eq!(classifier.classify(&f).move_class, MoveClass::Capture);
        f.captured = None;
        f.gives_check = true;
        assert_eq!(classifier.classify(&f).move_class, MoveClass::Check);
    }

    #[test]
    fn test_moves_outside_home_zone_are_quiet() {
        let classifier = FeatureClassifier::default();
        let record = classifier.classify(&facts(PieceClass::Rook, (0, 3), (0, 5)));
        assert_eq!(record.move_class, MoveClass::Quiet);
        // retreating into the home zone is not development either
        let record = classifier.classify(&facts(PieceClass::Rook, (0, 1), (0, 0)));
        assert_eq!(record.move_class, MoveClass::Quiet);
    }

    #[test]
    fn test_development_is_any_advance_from_the_home_zone() {
        let classifier = FeatureClassifier::default();
        // Still inside the home zone afterwards, and repeatable.
        let record = classifier.classify(&facts(PieceClass::Pawn, (4, 0), (4, 1)));
        assert_eq!(record.move_class, MoveClass::Development);
        let record = classifier.classify(&facts(PieceClass::Bishop, (2, 1), (4, 3)));
        assert_eq!(record.move_class, MoveClass::Development);
        // Sideways within the zone gains no distance.
        let record = classifier.classify(&facts(PieceClass::Rook, (0, 1), (3, 1)));
        assert_eq!(record.move_class, MoveClass::Quiet);
    }

    #[test]
    fn test_second_side_distance_is_mirrored() {
        let classifier = FeatureClassifier::default();
        let mut f = facts(PieceClass::Pawn, (4, 6), (4, 4));
        f.mover = Side::Second;
        let record = classifier.classify(&f);
        assert_eq!(record.distance_bucket, 3);
        assert_eq!(record.move_class, MoveClass::Development);
    }

    #[test]
    fn test_buckets_saturate() {
        let classifier = FeatureClassifier::default();
        let mut f = facts(PieceClass::King, (4, 0), (4, 1));
        f.dims = BoardDims::new(8, 20);
        f.to = Square::new(4, 15);
        f.repetition_count = 9;
        f.stagnation_counter = 99;
        f.material_on_board = 10;
        let record = classifier.classify(&f);
        assert_eq!(record.distance_bucket, MAX_DISTANCE_BUCKET);
        assert_eq!(record.repetition_bucket, 2);
        assert_eq!(record.stagnation_bucket, 4);
        assert_eq!(record.material_level, MaterialLevel::Low);

        f.stagnation_counter = 500;
        assert_eq!(classifier.classify(&f).stagnation_bucket, 5);
    }

    #[test]
    fn test_unknown_piece_is_bucketed_not_rejected() {
        let classifier = FeatureClassifier::default();
        let f = facts(PieceClass::from_name("archbishop"), (1, 1), (2, 2));
        assert_eq!(classifier.classify(&f).piece_class, PieceClass::Unknown);
    }

    #[test]
    fn test_identical_inputs_identical_records() {
        let classifier = FeatureClassifier::default();
        let f = facts(PieceClass::Bishop, (2, 0), (5, 3));
        assert_eq!(classifier.classify(&f), classifier.classify(&f.clone()));
    }
}
