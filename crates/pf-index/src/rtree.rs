//! R-tree backed index.
//!
//! An R-tree (via `rstar`) over 2-D `[lat, lon]` points.  Compared to the
//! grid it needs no cell-size tuning and adapts to very uneven density, at
//! the cost of a log-factor on every insert and removal.  Bulk hydration
//! uses `RTree::bulk_load`, which is much faster than repeated inserts.

use rstar::{RTree, RTreeObject, AABB};

use pf_core::geo::bounding_box_degrees;
use pf_core::{GeoPoint, Location, PersonId};

use crate::{FastMap, SpatialIndex};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a `[lat, lon]` point and its owner.
///
/// `PartialEq` lets `RTree::remove` find the exact entry to drop.
#[derive(Clone, Debug, PartialEq)]
struct PointEntry {
    point: [f64; 2], // [lat, lon]
    id:    PersonId,
}

impl PointEntry {
    fn new(id: PersonId, p: GeoPoint) -> Self {
        Self { point: [p.lat, p.lon], id }
    }
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

// ── RTreeIndex ────────────────────────────────────────────────────────────────

/// R-tree [`SpatialIndex`].
///
/// `points` mirrors the tree so an update can rebuild the old entry for
/// removal without a tree search by id.
#[derive(Default)]
pub struct RTreeIndex {
    tree:   RTree<PointEntry>,
    points: FastMap<PersonId, GeoPoint>,
}

impl RTreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The indexed point of `id`, if any.
    pub fn point_of(&self, id: PersonId) -> Option<GeoPoint> {
        self.points.get(&id).copied()
    }
}

impl SpatialIndex for RTreeIndex {
    fn insert_or_update(&mut self, id: PersonId, point: GeoPoint) {
        if let Some(old) = self.points.insert(id, point) {
            self.tree.remove(&PointEntry::new(id, old));
        }
        self.tree.insert(PointEntry::new(id, point));
    }

    fn remove(&mut self, id: PersonId) -> bool {
        match self.points.remove(&id) {
            Some(old) => {
                self.tree.remove(&PointEntry::new(id, old));
                true
            }
            None => false,
        }
    }

    fn candidates_near(&self, center: GeoPoint, radius_m: f64) -> Vec<PersonId> {
        let bbox = bounding_box_degrees(center, radius_m);
        let (min_lat, max_lat) = (bbox.min_lat(), bbox.max_lat());

        // Longitude segments are disjoint, so no entry is reported twice.
        bbox.lon_ranges()
            .into_iter()
            .flat_map(|(lo, hi)| {
                let envelope = AABB::from_corners([min_lat, lo], [max_lat, hi]);
                self.tree
                    .locate_in_envelope_intersecting(&envelope)
                    .map(|e| e.id)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[inline]
    fn contains(&self, id: PersonId) -> bool {
        self.points.contains_key(&id)
    }

    #[inline]
    fn len(&self) -> usize {
        self.points.len()
    }

    fn clear(&mut self) {
        self.tree = RTree::new();
        self.points.clear();
    }

    /// Bulk-load for O(N log N) construction (faster than N inserts).
    fn rebuild<I>(&mut self, locations: I)
    where
        I: IntoIterator<Item = Location>,
        Self: Sized,
    {
        self.points.clear();
        for loc in locations {
            self.points.insert(loc.person_id, loc.point);
        }
        let entries: Vec<PointEntry> = self
            .points
            .iter()
            .map(|(&id, &p)| PointEntry::new(id, p))
            .collect();
        self.tree = RTree::bulk_load(entries);
    }
}
