//! `pf-core` — foundational types for the persons-finder nearby-search engine.
//!
//! This crate is a dependency of every other `pf-*` crate.  It has no `pf-*`
//! dependencies and a single required external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`ids`]    | `PersonId`                                                  |
//! | [`geo`]    | `GeoPoint`, `Location`, haversine distance, `BoundingBox`   |
//! | [`config`] | `FinderConfig` — grid cell size and paging limits           |
//! | [`error`]  | `GeoError`, `GeoResult`, `ConfigError`                      |
//!
//! # Units
//!
//! Radii are **metres** everywhere inside the engine.  Distances reported on
//! query results are **kilometres**.  Only the `pf-finder` facade accepts a
//! kilometre radius, and it converts before calling in.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FinderConfig;
pub use error::{ConfigError, GeoError, GeoResult};
pub use geo::{BoundingBox, GeoPoint, Location};
pub use ids::PersonId;
