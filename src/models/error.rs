use thiserror::Error;

/// Failure to read the authoritative message store. Distinct from an empty
/// but successful fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("message store unavailable: {0}")]
    Unavailable(String),

    #[error("message store returned malformed data: {0}")]
    Malformed(String),

    #[error("message store query failed: {0}")]
    Query(String),
}

#[derive(Debug, Error)]
#[error("cache {operation} failed: {message}")]
pub struct StoreError {
    pub operation: &'static str,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, err: &eyre::Report) -> Self {
        Self {
            operation,
            message: format!("{err:#}"),
        }
    }
}

/// Several provisional threads resolved to the same real thread.
#[derive(Debug, Error)]
#[error(
    "{} provisional threads match {phone_number}: migrated {migrated}, left {left:?}",
    .left.len() + 1
)]
pub struct MigrationConflict {
    pub phone_number: String,
    pub migrated: i64,
    pub left: Vec<i64>,
}

/// Problems absorbed during a sync cycle. None of them abort the cycle.
#[derive(Debug, Error)]
pub enum SyncIssue {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    MigrationConflict(#[from] MigrationConflict),
}
