//! Core error types.
//!
//! Sub-crates define their own error enums and wrap `GeoError` as one variant
//! via `#[from]`, so a bad coordinate keeps its typed identity all the way up
//! to the caller.

use thiserror::Error;

/// Input that cannot describe a point or a search circle on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate ({lat}, {lon}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("invalid radius {0} m: must be a finite value >= 0")]
    InvalidRadius(f64),
}

/// Shorthand result type for coordinate and radius validation.
pub type GeoResult<T> = Result<T, GeoError>;

/// A [`FinderConfig`](crate::FinderConfig) value that the engine cannot run with.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);
