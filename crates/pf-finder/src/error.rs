use pf_core::ConfigError;
use pf_query::QueryError;
use pf_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid radius {0} km: must be a finite value >= 0")]
    InvalidRadius(f64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type FinderResult<T> = Result<T, FinderError>;
