//! `pf-finder` — process-wide facade over the persons-finder engine.
//!
//! # Lifecycle
//!
//! ```text
//! FinderBuilder::new(config)
//!     .directory(d)            optional, shared person directory
//!     .hydrate_from(path)      optional, CSV snapshot of locations
//!     .build()?                → Finder (empty or hydrated)
//!
//! finder.create_person / update_location / find_nearby_km / …
//!
//! finder.shutdown(Some(path))? optional final snapshot
//! ```
//!
//! # Units
//!
//! [`Finder::find_nearby_km`] takes a radius in kilometres and converts it
//! to metres before handing it to [`pf_query`].  Distances on results are
//! always kilometres.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `serde`    | Derives on `FinderConfig`, `Page`, `NearbyPerson`.       |
//! | `parallel` | Exact distances on Rayon's thread pool.                  |
//! | `fx-hash`  | FxHash maps inside the grid index.                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pf_core::FinderConfig;
//! use pf_finder::FinderBuilder;
//!
//! let finder = FinderBuilder::new(FinderConfig::default()).build()?;
//! let ana = finder.create_person("Ana");
//! finder.update_location(ana.id, -36.8415, 174.7570)?;
//! let page = finder.find_nearby_km(-36.8485, 174.7645, 10.0, 0, None)?;
//! ```

pub mod builder;
pub mod error;
pub mod finder;

#[cfg(test)]
mod tests;

pub use builder::FinderBuilder;
pub use error::{FinderError, FinderResult};
pub use finder::{Finder, NearbyPerson};
