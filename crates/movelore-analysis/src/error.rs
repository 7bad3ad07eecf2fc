use movelore_store::StoreError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DiscoveryError {
    #[display("invalid discovery configuration: {reason}")]
    InvalidConfig { reason: String },
    #[display("store error: {source}")]
    Store { source: StoreError },
}

impl DiscoveryError {
    pub(crate) fn invalid(reason: &str) -> Self {
        DiscoveryError::InvalidConfig {
            reason: reason.to_owned(),
        }
    }
}

impl From<StoreError> for DiscoveryError {
    fn from(source: StoreError) -> Self {
        DiscoveryError::Store { source }
    }
}
