//! The `LocationStore`: canonical person → point map plus its spatial index.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use pf_core::{GeoPoint, Location, PersonId};
use pf_index::{GridIndex, SpatialIndex};

use crate::{InMemoryDirectory, PersonDirectory, StoreError, StoreResult};

/// Source of truth for where every person currently is.
///
/// # Consistency
///
/// Every method observes or produces a single consistent version of the
/// data: a write is fully visible to any call that starts after it returns
/// (read-after-write), and concurrent writes to the same person resolve to
/// one winner whose point replaces the loser's entirely.
pub trait LocationStore: Send + Sync {
    /// Create or replace the location of `id`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Geo`] if `(lat, lon)` is off the globe.
    /// - [`StoreError::EntityNotFound`] if the directory does not know `id`.
    ///
    /// Nothing is modified when an error is returned.
    fn upsert(&self, id: PersonId, lat: f64, lon: f64) -> StoreResult<()>;

    /// Forget the location of `id`.  Removing an absent location succeeds.
    fn remove(&self, id: PersonId) -> StoreResult<()>;

    /// Current location of `id`, or [`StoreError::NotFound`].
    fn get(&self, id: PersonId) -> StoreResult<Location>;

    /// Locations of every person that may be within `radius_m` of `center`.
    ///
    /// Candidate ids and their points come from the same version of the
    /// data.  The result is a superset of the true matches; callers apply
    /// the exact distance cutoff.
    fn candidates_near(&self, center: GeoPoint, radius_m: f64) -> Vec<Location>;

    /// Number of persons with a location.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every location, sorted by person id.
    fn snapshot(&self) -> Vec<Location>;

    /// Replace all state with `locations`, rebuilding the index.
    ///
    /// All entries are checked first; on error the store is left untouched.
    /// Returns the number of locations loaded.
    fn hydrate(&self, locations: Vec<Location>) -> StoreResult<usize>;
}

// ── InMemoryLocationStore ─────────────────────────────────────────────────────

struct StoreState<I> {
    locations: HashMap<PersonId, GeoPoint>,
    index:     I,
}

/// [`LocationStore`] holding the canonical map and an `I: SpatialIndex`
/// behind one `parking_lot::RwLock`.
///
/// Writers take the lock exclusively for the combined map + index update;
/// queries share it.  Directory lookups happen before the lock is taken.
pub struct InMemoryLocationStore<I: SpatialIndex = GridIndex, D: PersonDirectory = InMemoryDirectory> {
    directory: Arc<D>,
    state:     RwLock<StoreState<I>>,
}

impl<I: SpatialIndex, D: PersonDirectory> InMemoryLocationStore<I, D> {
    /// Create an empty store over `index` (which is cleared first).
    pub fn new(mut index: I, directory: Arc<D>) -> Self {
        index.clear();
        Self {
            directory,
            state: RwLock::new(StoreState { locations: HashMap::new(), index }),
        }
    }

    /// The directory consulted on upsert.
    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    /// Run `f` against the canonical map and the index under one read lock.
    ///
    /// Intended for diagnostics and consistency checks; `f` must not call
    /// back into the store.
    pub fn with_view<R>(&self, f: impl FnOnce(&HashMap<PersonId, GeoPoint>, &I) -> R) -> R {
        let state = self.state.read();
        f(&state.locations, &state.index)
    }
}

impl<I: SpatialIndex, D: PersonDirectory> LocationStore for InMemoryLocationStore<I, D> {
    fn upsert(&self, id: PersonId, lat: f64, lon: f64) -> StoreResult<()> {
        let point = GeoPoint::checked(lat, lon)?;
        if !self.directory.exists(id) {
            return Err(StoreError::EntityNotFound(id));
        }

        let moved = {
            let mut state = self.state.write();
            let previous = state.locations.insert(id, point);
            state.index.insert_or_update(id, point);
            previous.is_some()
        };
        debug!(person = %id, lat, lon, moved, "location upserted");
        Ok(())
    }

    fn remove(&self, id: PersonId) -> StoreResult<()> {
        let removed = {
            let mut state = self.state.write();
            let removed = state.locations.remove(&id).is_some();
            state.index.remove(id);
            removed
        };
        debug!(person = %id, removed, "location removed");
        Ok(())
    }

    fn get(&self, id: PersonId) -> StoreResult<Location> {
        self.state
            .read()
            .locations
            .get(&id)
            .map(|&point| Location::new(id, point))
            .ok_or(StoreError::NotFound(id))
    }

    fn candidates_near(&self, center: GeoPoint, radius_m: f64) -> Vec<Location> {
        let state = self.state.read();
        state
            .index
            .candidates_near(center, radius_m)
            .into_iter()
            .filter_map(|id| state.locations.get(&id).map(|&p| Location::new(id, p)))
            .collect()
    }

    fn len(&self) -> usize {
        self.state.read().locations.len()
    }

    fn snapshot(&self) -> Vec<Location> {
        let mut out: Vec<Location> = self
            .state
            .read()
            .locations
            .iter()
            .map(|(&id, &p)| Location::new(id, p))
            .collect();
        out.sort_unstable_by_key(|l| l.person_id);
        out
    }

    fn hydrate(&self, locations: Vec<Location>) -> StoreResult<usize> {
        // ── Check everything before touching state ────────────────────────
        for loc in &locations {
            loc.point.validate()?;
            if !self.directory.exists(loc.person_id) {
                return Err(StoreError::EntityNotFound(loc.person_id));
            }
        }

        let map: HashMap<PersonId, GeoPoint> =
            locations.iter().map(|l| (l.person_id, l.point)).collect();
        let count = map.len();

        {
            let mut state = self.state.write();
            state.index.rebuild(map.iter().map(|(&id, &p)| Location::new(id, p)));
            state.locations = map;
        }
        info!(count, "location store hydrated");
        Ok(count)
    }
}
