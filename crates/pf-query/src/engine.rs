//! Query engine trait and the default nearby implementation.
//!
//! # Pluggability
//!
//! Callers go through the [`QueryEngine`] trait, so a test can substitute a
//! canned engine and an application can wrap the default one (caching,
//! metrics) without touching the store.
//!
//! # Cost
//!
//! With `C` candidates from the index and `M` exact matches, a query costs
//! `O(C)` haversine evaluations plus `O(M + k log k)` for ordering, where
//! `k = (index + 1) * size` is the end of the requested page: only the first
//! `k` matches are fully sorted.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use pf_core::geo::{haversine_km, validate_radius};
use pf_core::{GeoPoint, Location};
use pf_store::LocationStore;

use crate::{NearbyHit, Page, PageRequest, QueryError, QueryResult};

// ── QueryEngine trait ─────────────────────────────────────────────────────────

/// Radius search over persons' current locations.
///
/// # Thread safety
///
/// Engines are shared by every request thread and must be `Send + Sync`.
/// Queries only read shared state.
pub trait QueryEngine: Send + Sync {
    /// Persons within `radius_m` metres of `center`, nearest first, ties by
    /// ascending id, sliced to `page`.
    ///
    /// A page past the end is empty but still reports `total_elements`.
    ///
    /// # Errors
    ///
    /// [`QueryError::Geo`] for an off-globe center or a negative/non-finite
    /// radius, [`QueryError::InvalidPageSize`] for `page.size == 0`.
    fn find_nearby(
        &self,
        center:   GeoPoint,
        radius_m: f64,
        page:     PageRequest,
    ) -> QueryResult<Page<NearbyHit>>;

    /// Like [`find_nearby`](Self::find_nearby) but gives up with
    /// [`QueryError::TimedOut`] once `deadline` has passed.
    fn find_nearby_before(
        &self,
        center:   GeoPoint,
        radius_m: f64,
        page:     PageRequest,
        deadline: Instant,
    ) -> QueryResult<Page<NearbyHit>>;
}

// ── NearbyQueryEngine ─────────────────────────────────────────────────────────

/// Default [`QueryEngine`] over any [`LocationStore`].
pub struct NearbyQueryEngine<S: LocationStore> {
    store: Arc<S>,
}

impl<S: LocationStore> NearbyQueryEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn run(
        &self,
        center:   GeoPoint,
        radius_m: f64,
        page:     PageRequest,
        deadline: Option<Instant>,
    ) -> QueryResult<Page<NearbyHit>> {
        let started = Instant::now();

        // ── ① Validate ────────────────────────────────────────────────────
        center.validate()?;
        validate_radius(radius_m)?;
        if page.size == 0 {
            return Err(QueryError::InvalidPageSize);
        }

        // ── ② Candidates (single consistent read) ─────────────────────────
        let candidates = self.store.candidates_near(center, radius_m);
        let candidate_count = candidates.len();
        check_deadline(deadline, started)?;

        // ── ③④ Exact distance + cutoff ───────────────────────────────────
        let mut hits = exact_hits(center, radius_m, candidates);
        check_deadline(deadline, started)?;

        // ── ⑤⑥ Order and slice ────────────────────────────────────────────
        let total_elements = hits.len();
        let offset = page.offset();
        let items = if offset >= total_elements {
            Vec::new()
        } else {
            let end = offset.saturating_add(page.size).min(total_elements);
            if end < total_elements {
                // Only the first `end` hits can land on this page.
                hits.select_nth_unstable_by(end, by_distance_then_id);
                hits.truncate(end);
            }
            hits.sort_unstable_by(by_distance_then_id);
            hits.split_off(offset)
        };

        debug!(
            %center,
            radius_m,
            candidates = candidate_count,
            matched = total_elements,
            page = page.index,
            returned = items.len(),
            "nearby query"
        );

        Ok(Page {
            items,
            page_index: page.index,
            page_size: page.size,
            total_elements,
        })
    }
}

impl<S: LocationStore> QueryEngine for NearbyQueryEngine<S> {
    fn find_nearby(
        &self,
        center:   GeoPoint,
        radius_m: f64,
        page:     PageRequest,
    ) -> QueryResult<Page<NearbyHit>> {
        self.run(center, radius_m, page, None)
    }

    fn find_nearby_before(
        &self,
        center:   GeoPoint,
        radius_m: f64,
        page:     PageRequest,
        deadline: Instant,
    ) -> QueryResult<Page<NearbyHit>> {
        self.run(center, radius_m, page, Some(deadline))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Total order: distance ascending, then person id ascending.
fn by_distance_then_id(a: &NearbyHit, b: &NearbyHit) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.person_id.cmp(&b.person_id))
}

#[inline]
fn exact_hit(center: GeoPoint, radius_m: f64, loc: Location) -> Option<NearbyHit> {
    let distance_km = haversine_km(center, loc.point);
    (distance_km * 1_000.0 <= radius_m).then_some(NearbyHit {
        person_id: loc.person_id,
        lat: loc.point.lat,
        lon: loc.point.lon,
        distance_km,
    })
}

#[cfg(not(feature = "parallel"))]
fn exact_hits(center: GeoPoint, radius_m: f64, candidates: Vec<Location>) -> Vec<NearbyHit> {
    candidates
        .into_iter()
        .filter_map(|loc| exact_hit(center, radius_m, loc))
        .collect()
}

#[cfg(feature = "parallel")]
fn exact_hits(center: GeoPoint, radius_m: f64, candidates: Vec<Location>) -> Vec<NearbyHit> {
    use rayon::prelude::*;

    candidates
        .into_par_iter()
        .filter_map(|loc| exact_hit(center, radius_m, loc))
        .collect()
}

fn check_deadline(deadline: Option<Instant>, started: Instant) -> QueryResult<()> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(QueryError::TimedOut {
            elapsed_ms: started.elapsed().as_millis() as u64,
        }),
        _ => Ok(()),
    }
}
