#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("sqlite error: {source}")]
    Sqlite { source: rusqlite::Error },
    #[display("failed to encode or decode JSON column: {source}")]
    Json { source: serde_json::Error },
    #[display("invalid value {value:?} in column {column}")]
    InvalidColumn { column: &'static str, value: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(source: rusqlite::Error) -> Self {
        StoreError::Sqlite { source }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(source: serde_json::Error) -> Self {
        StoreError::Json { source }
    }
}

impl StoreError {
    pub(crate) fn invalid<V>(column: &'static str, value: V) -> Self
    where
        V: ToString,
    {
        StoreError::InvalidColumn {
            column,
            value: value.to_string(),
        }
    }
}
