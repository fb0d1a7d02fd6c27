//! The process-wide [`Finder`] facade.

use std::f64::consts::PI;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use pf_core::geo::EARTH_RADIUS_KM;
use pf_core::{FinderConfig, GeoPoint, Location, PersonId};
use pf_index::{GridIndex, SpatialIndex};
use pf_query::{NearbyQueryEngine, Page, PageRequest, QueryEngine};
use pf_store::{
    InMemoryDirectory, InMemoryLocationStore, LocationStore, Person, PersonDirectory,
    save_snapshot_csv,
};

use crate::{FinderError, FinderResult};

/// Full circumference: no two points on the globe are farther apart, so
/// larger radii are cut down to this before converting to metres.
const MAX_RADIUS_KM: f64 = 2.0 * PI * EARTH_RADIUS_KM;

/// A person found by [`Finder::find_nearby_km`], with their display name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearbyPerson {
    pub person_id:   PersonId,
    pub name:        String,
    pub lat:         f64,
    pub lon:         f64,
    pub distance_km: f64,
}

/// Owns the person directory, the location store, and the query engine.
///
/// Built empty or from a snapshot by [`FinderBuilder`](crate::FinderBuilder)
/// and torn down with [`shutdown`](Self::shutdown).  All methods take
/// `&self`; share a `Finder` between threads with `Arc`.
///
/// Radii are kilometres here and metres everywhere below.
///
/// `D` is any [`PersonDirectory`]; person creation and batch lookup are only
/// available with the default [`InMemoryDirectory`].
pub struct Finder<I: SpatialIndex = GridIndex, D: PersonDirectory = InMemoryDirectory> {
    pub(crate) config:    FinderConfig,
    pub(crate) directory: Arc<D>,
    pub(crate) store:     Arc<InMemoryLocationStore<I, D>>,
    pub(crate) engine:    NearbyQueryEngine<InMemoryLocationStore<I, D>>,
}

impl<I: SpatialIndex, D: PersonDirectory> Finder<I, D> {
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    pub fn store(&self) -> &Arc<InMemoryLocationStore<I, D>> {
        &self.store
    }

    /// The underlying engine, for radius-in-metres or deadline-bound queries.
    pub fn engine(&self) -> &NearbyQueryEngine<InMemoryLocationStore<I, D>> {
        &self.engine
    }

    // ── Locations ─────────────────────────────────────────────────────────

    /// Set where `id` is now and return the stored location.
    pub fn update_location(&self, id: PersonId, lat: f64, lon: f64) -> FinderResult<Location> {
        self.store.upsert(id, lat, lon)?;
        Ok(Location::new(id, GeoPoint::new(lat, lon)))
    }

    pub fn remove_location(&self, id: PersonId) -> FinderResult<()> {
        Ok(self.store.remove(id)?)
    }

    pub fn get_location(&self, id: PersonId) -> FinderResult<Location> {
        Ok(self.store.get(id)?)
    }

    // ── Search ────────────────────────────────────────────────────────────

    /// Persons within `radius_km` of `(lat, lon)`, nearest first.
    ///
    /// `radius_km` must be finite and >= 0.  `size` defaults to
    /// `config.default_page_size` and is clamped to `config.max_page_size`.
    /// `Some(0)` is rejected.
    pub fn find_nearby_km(
        &self,
        lat:       f64,
        lon:       f64,
        radius_km: f64,
        page:      usize,
        size:      Option<usize>,
    ) -> FinderResult<Page<NearbyPerson>> {
        if !(radius_km.is_finite() && radius_km >= 0.0) {
            return Err(FinderError::InvalidRadius(radius_km));
        }
        let radius_m = radius_km.min(MAX_RADIUS_KM) * 1_000.0;

        let requested = size.unwrap_or(self.config.default_page_size);
        let size = if requested > self.config.max_page_size {
            warn!(
                requested,
                max = self.config.max_page_size,
                "page size clamped"
            );
            self.config.max_page_size
        } else {
            requested
        };

        let hits = self.engine.find_nearby(
            GeoPoint::new(lat, lon),
            radius_m,
            PageRequest::new(page, size),
        )?;

        Ok(hits.map(|hit| NearbyPerson {
            person_id:   hit.person_id,
            name:        self.directory.name(hit.person_id).unwrap_or_default(),
            lat:         hit.lat,
            lon:         hit.lon,
            distance_km: hit.distance_km,
        }))
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Write every location to a CSV snapshot.  Returns the row count.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> FinderResult<usize> {
        let locations = self.store.snapshot();
        save_snapshot_csv(path.as_ref(), &locations)?;
        Ok(locations.len())
    }

    /// Tear the finder down, snapshotting first when `snapshot` is given.
    pub fn shutdown(self, snapshot: Option<&Path>) -> FinderResult<()> {
        let saved = match snapshot {
            Some(path) => Some(self.save_snapshot(path)?),
            None => None,
        };
        info!(
            locations = self.store.len(),
            snapshot_rows = ?saved,
            "finder shut down"
        );
        Ok(())
    }
}

impl<I: SpatialIndex> Finder<I, InMemoryDirectory> {
    /// Register a new person with the next free id.  No location yet.
    pub fn create_person(&self, name: impl Into<String>) -> Person {
        self.directory.create(name)
    }

    /// Persons for `ids`, in request order; unknown ids are skipped.
    pub fn get_persons(&self, ids: &[PersonId]) -> Vec<Person> {
        self.directory.get_many(ids)
    }
}
