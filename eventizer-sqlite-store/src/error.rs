use eventizer_survey::ParseAudienceError;

/// Error type for SqliteStore.
#[derive(Debug, thiserror::Error)]
pub enum SqliteStoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid question type column: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid id '{value}'")]
    InvalidId {
        value: String,
        #[source]
        source: uuid::Error,
    },

    #[error(transparent)]
    InvalidAudience(#[from] ParseAudienceError),
}

pub(crate) fn parse_id<T>(value: String) -> Result<T, SqliteStoreError>
where
    T: std::str::FromStr<Err = uuid::Error>,
{
    value
        .parse()
        .map_err(|source| SqliteStoreError::InvalidId { value, source })
}
