use movelore_core::RulesError;
use movelore_store::StoreError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    #[display("cannot replay ply {ply} of game {game_id}: {source}")]
    Replay {
        game_id: String,
        ply: usize,
        source: RulesError,
    },
    #[display("store error: {source}")]
    Store { source: StoreError },
}

impl From<StoreError> for TrainError {
    fn from(source: StoreError) -> Self {
        TrainError::Store { source }
    }
}
