//! `pf-store` — the authoritative person → location map.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`directory`] | `PersonDirectory` trait, `InMemoryDirectory`, `Person`         |
//! | [`store`]     | `LocationStore` trait, `InMemoryLocationStore<I, D>`           |
//! | [`snapshot`]  | CSV save/load of the canonical map                             |
//! | [`error`]     | `StoreError`, `StoreResult<T>`                                 |
//!
//! # Write path
//!
//! ```text
//! upsert(id, lat, lon)
//!   ① validate coordinates             (no lock)
//!   ② directory.exists(id)?            (no lock; may be slow)
//!   ③ write lock
//!        canonical map  ← (id, point)
//!        spatial index  ← (id, point)
//!      unlock
//! ```
//!
//! Canonical map and index sit behind the same `RwLock`, so every reader
//! sees both at the same version: an entity is never visible in zero or two
//! cells, and the index always agrees with the map.

pub mod directory;
pub mod error;
pub mod snapshot;
pub mod store;


pub use directory::{InMemoryDirectory, Person, PersonDirectory};
pub use error::{StoreError, StoreResult};
pub use snapshot::{load_snapshot_csv, read_snapshot, save_snapshot_csv, write_snapshot};
pub use store::{InMemoryLocationStore, LocationStore};
