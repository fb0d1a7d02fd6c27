//! `pf-index` — spatial indexes answering "which persons might be near P?".
//!
//! # Crate layout
//!
//! | Module    | Contents                                                      |
//! |-----------|---------------------------------------------------------------|
//! | [`index`] | `SpatialIndex` trait                                          |
//! | [`grid`]  | `GridIndex` — fixed-size degree cells, `CellKey`              |
//! | [`rtree`] | `RTreeIndex` — `rstar` R-tree over `[lat, lon]` points        |
//!
//! Both indexes return a **superset** of the persons within the radius.  The
//! exact haversine cutoff is the caller's job (see `pf-query`).
//!
//! Indexes are plain `&mut self` structures with no interior locking.  The
//! owning location store wraps index and canonical map in a single lock so
//! readers never see an entity half-moved between cells.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | FxHash maps for cells and the reverse index.              |

pub mod grid;
pub mod index;
pub mod rtree;


pub use grid::{CellKey, GridIndex};
pub use index::SpatialIndex;
pub use rtree::RTreeIndex;

// ── Hash containers ───────────────────────────────────────────────────────────

#[cfg(feature = "fx-hash")]
pub(crate) type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(feature = "fx-hash")]
pub(crate) type FastSet<T> = rustc_hash::FxHashSet<T>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type FastMap<K, V> = std::collections::HashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type FastSet<T> = std::collections::HashSet<T>;
