use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Geometric input that cannot form a spatial filter (NaN, infinite,
    /// negative radius, radius wider than the envelope).
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    /// The executor could not complete a query. Never retried here.
    #[error("query execution failed: {0}")]
    QueryExecution(#[from] QueryFailure),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a [`crate::QueryExecutor`].
#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected row shape: {0}")]
    RowShape(String),
}
