use pf_core::{GeoError, PersonId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("person {0} does not exist")]
    EntityNotFound(PersonId),

    #[error("person {0} has no location")]
    NotFound(PersonId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("snapshot parse error: {0}")]
    Parse(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
