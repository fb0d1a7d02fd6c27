//! The `SpatialIndex` trait.
//!
//! # Pluggability
//!
//! `pf-store` maintains its index through this trait, so an application can
//! swap the default [`GridIndex`](crate::GridIndex) for the
//! [`RTreeIndex`](crate::RTreeIndex), or for something of its own, without
//! touching the store or the query engine.

use pf_core::{GeoPoint, Location, PersonId};

/// A derived, rebuildable map from persons to points that can cheaply list
/// the persons that might lie within a radius.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a store can share them across
/// reader threads behind a lock.
pub trait SpatialIndex: Send + Sync {
    /// Place `id` at `point`, moving it if it is already indexed.
    ///
    /// After the call `id` is indexed exactly once, at `point`.
    fn insert_or_update(&mut self, id: PersonId, point: GeoPoint);

    /// Drop `id`.  Returns `false` (and does nothing) if it was not indexed.
    fn remove(&mut self, id: PersonId) -> bool;

    /// All indexed persons that may be within `radius_m` metres of `center`.
    ///
    /// The result is a superset of the true matches, contains no duplicates,
    /// and is in no particular order.
    fn candidates_near(&self, center: GeoPoint, radius_m: f64) -> Vec<PersonId>;

    /// `true` if `id` is currently indexed.
    fn contains(&self, id: PersonId) -> bool;

    /// Number of indexed persons.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    fn clear(&mut self);

    /// Replace the whole index with `locations`.
    ///
    /// Later entries for the same person win.  Implementations with a faster
    /// bulk path override this.
    fn rebuild<I>(&mut self, locations: I)
    where
        I: IntoIterator<Item = Location>,
        Self: Sized,
    {
        self.clear();
        for loc in locations {
            self.insert_or_update(loc.person_id, loc.point);
        }
    }
}
