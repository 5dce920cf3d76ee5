use thiserror::Error;

use crate::service::BoxError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Search input failed validation before any remote call.
    #[error("invalid search: {0}")]
    InvalidSearch(String),

    /// Discovery failed (transport, auth, or malformed response).
    #[error("discovery failed: {0}")]
    Discovery(#[source] BoxError),

    #[error("a bulk enrichment run is already in progress")]
    BulkInProgress,
}
