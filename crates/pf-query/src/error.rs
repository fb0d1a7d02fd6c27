use pf_core::GeoError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("query passed its deadline after {elapsed_ms} ms")]
    TimedOut { elapsed_ms: u64 },
}

pub type QueryResult<T> = Result<T, QueryError>;
