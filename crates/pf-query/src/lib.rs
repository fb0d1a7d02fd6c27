//! `pf-query` — "everyone within R of P, nearest first, one page at a time".
//!
//! # Query pipeline
//!
//! ```text
//! find_nearby(center, radius_m, page)
//!   ① validate   — center on the globe, radius finite and >= 0, page size > 0
//!   ② candidates — LocationStore::candidates_near (one read-locked snapshot)
//!   ③ exact      — haversine distance per candidate (Rayon with `parallel`)
//!   ④ filter     — keep distance_km * 1000 <= radius_m
//!   ⑤ order      — distance ascending, then person id ascending
//!   ⑥ slice      — [index * size, index * size + size), total = filtered count
//! ```
//!
//! The grid prefilter in step ② only makes the candidate set smaller; step
//! ④ alone decides membership.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`engine`] | `QueryEngine` trait, `NearbyQueryEngine<S>`               |
//! | [`page`]   | `PageRequest`, `Page<T>`, `NearbyHit`                     |
//! | [`error`]  | `QueryError`, `QueryResult<T>`                            |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Exact distances computed on Rayon's thread pool.       |
//! | `serde`    | Derives `Serialize`/`Deserialize` on pages and hits.   |

pub mod engine;
pub mod error;
pub mod page;


pub use engine::{NearbyQueryEngine, QueryEngine};
pub use error::{QueryError, QueryResult};
pub use page::{NearbyHit, Page, PageRequest};
