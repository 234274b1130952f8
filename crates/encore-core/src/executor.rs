//! The seam between query construction and the store that runs queries.

use async_trait::async_trait;

use crate::error::QueryFailure;
use crate::model::ConcertRecord;
use crate::query::ConcertQuery;

/// Runs a [`ConcertQuery`] against a document store.
///
/// Implementations return every row or a failure, never a partial result,
/// and do not retry.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &ConcertQuery) -> Result<Vec<ConcertRecord>, QueryFailure>;
}
