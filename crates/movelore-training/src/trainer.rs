//! Learning from one finished game.

use movelore_core::{GameResult, GameRules, Move, Position, Side};
use movelore_evaluator::{
    abstraction::Abstractor,
    classifier::FeatureClassifier,
    credit::{CreditAssignor, MoveContext},
};
use movelore_store::{HistoryRow, LearnerStore, LessonObservation};
use serde::{Deserialize, Serialize};

use crate::{
    TrainError,
    config::LearnerConfig,
    lessons::LessonExtractor,
    transcript::{GameTranscript, PlyRecord},
};

/// Which sides of a game feed the statistics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum LearnSides {
    /// Only the side whose perspective the game is recorded from.
    #[default]
    Perspective,
    Both,
}

impl LearnSides {
    #[must_use]
    pub fn includes(self, perspective: Side, mover: Side) -> bool {
        match self {
            LearnSides::Perspective => mover == perspective,
            LearnSides::Both => true,
        }
    }
}

/// What [`Trainer::record_transcript`] did with one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Plies merged into the pattern statistics.
    pub recorded: usize,
    /// Learning-side plies that could not be classified.
    pub skipped: usize,
    /// Mistakes and tactics remembered.
    pub lessons: usize,
    /// New history rows appended.
    pub history_rows: usize,
}

impl GameSummary {
    pub fn merge(&mut self, other: &GameSummary) {
        self.recorded += other.recorded;
        self.skipped += other.skipped;
        self.lessons += other.lessons;
        self.history_rows += other.history_rows;
    }
}

/// Feeds finished games into a [`LearnerStore`].
#[derive(Debug)]
pub struct Trainer<'a, S> {
    store: &'a mut S,
    classifier: FeatureClassifier,
    abstractor: Abstractor,
    credit: CreditAssignor,
    lessons: LessonExtractor,
    learn_sides: LearnSides,
}

impl<'a, S> Trainer<'a, S>
where
    S: LearnerStore,
{
    #[must_use]
    pub fn new(config: &LearnerConfig, store: &'a mut S) -> Self {
        Self {
            store,
            classifier: config.classifier(),
            abstractor: config.abstractor(),
            credit: CreditAssignor::new(config.credit),
            lessons: LessonExtractor::new(config.lessons),
            learn_sides: LearnSides::default(),
        }
    }

    #[must_use]
    pub fn with_learn_sides(mut self, learn_sides: LearnSides) -> Self {
        self.learn_sides = learn_sides;
        self
    }

    /// Replays `moves` from `start` and learns from the resulting game.
    ///
    /// `result` is the final result seen from `perspective`.
    pub fn record_game<R>(
        &mut self,
        rules: &R,
        game_id: &str,
        start: &Position,
        moves: &[Move],
        perspective: Side,
        result: GameResult,
    ) -> Result<GameSummary, TrainError>
    where
        R: GameRules + ?Sized,
    {
        let transcript = GameTranscript::replay(rules, game_id, start, moves, perspective, result)?;
        self.record_transcript(&transcript, perspective)
    }

    /// Learns from an already replayed game.
    pub fn record_transcript(
        &mut self,
        transcript: &GameTranscript,
        perspective: Side,
    ) -> Result<GameSummary, TrainError> {
        let mut summary = GameSummary::default();
        let mut history = Vec::with_capacity(transcript.plies.len());

        for (index, ply) in transcript.plies.iter().enumerate() {
            let result = transcript.result_for(ply.mover);
            if let Some(row) = history_row(transcript, index, ply, result) {
                history.push(row);
            }
            if !self.learn_sides.includes(perspective, ply.mover) {
                continue;
            }
            let Some(facts) = &ply.facts else {
                tracing::warn!(
                    game_id = %transcript.game_id,
                    ply = index,
                    mv = %ply.mv,
                    "move has no facts; skipping"
                );
                summary.skipped += 1;
                continue;
            };

            let record = self.classifier.classify(facts);
            let terminal = transcript.terminal_effect(index);
            let score = self.credit.score(&MoveContext {
                facts,
                legal_moves_after: ply.legal_moves_after,
                terminal,
            });
            self.store.upsert(&record, result, score)?;
            summary.recorded += 1;

            let Some(lesson) = self.lessons.extract(transcript, index, terminal) else {
                continue;
            };
            let Some(board) = &ply.board_before else {
                tracing::debug!(
                    game_id = %transcript.game_id,
                    ply = index,
                    kind = %lesson.kind,
                    "no board view; lesson not abstracted"
                );
                continue;
            };
            self.store.record_lesson(&LessonObservation {
                kind: lesson.kind,
                position: ply.position_before.clone(),
                mv: ply.mv.clone(),
                material: lesson.material,
                signature: self.abstractor.signature_pair(board, facts),
            })?;
            summary.lessons += 1;
        }

        summary.history_rows = self.store.append_history(&history)?;
        tracing::info!(
            game_id = %transcript.game_id,
            plies = transcript.plies.len(),
            recorded = summary.recorded,
            skipped = summary.skipped,
            lessons = summary.lessons,
            "game recorded"
        );
        Ok(summary)
    }
}

fn history_row(
    transcript: &GameTranscript,
    index: usize,
    ply: &PlyRecord,
    result_for_mover: GameResult,
) -> Option<HistoryRow> {
    let facts = ply.facts.as_ref()?;
    let board_after = ply.board_after.clone()?;
    let ply_number = u32::try_from(index).ok()?;
    Some(HistoryRow {
        game_id: transcript.game_id.clone(),
        ply: ply_number,
        move_number: ply_number / 2 + 1,
        mover: ply.mover,
        position_after: ply.position_after.clone(),
        mv: ply.mv.clone(),
        result_for_mover,
        material_on_board: facts.material_on_board,
        material_at_start: facts.material_at_start,
        board_after,
    })
}
