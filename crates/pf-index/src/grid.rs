//! Fixed-size grid bucketing.
//!
//! # Data layout
//!
//! The globe is cut into square cells of `cell_size_deg` degrees.  A point
//! lands in the cell
//!
//! ```text
//! CellKey { row: floor(lat / cell_size_deg), col: floor(lon / cell_size_deg) }
//! ```
//!
//! Two maps are kept in lockstep:
//!
//! - `cells`:   `CellKey → {PersonId}`, the buckets, only non-empty ones.
//! - `reverse`: `PersonId → CellKey`, which bucket each person is in, so a
//!   move or removal touches exactly one old bucket without searching.
//!
//! # Query cost
//!
//! A radius query converts the circle to a degree box
//! ([`bounding_box_degrees`]) and visits every cell the box touches.  With
//! the cell size close to the typical radius that is a 3×3 block.  Very wide
//! boxes (huge radii, polar caps) would touch more cells than exist, so when
//! the covering is larger than the number of occupied cells the occupied
//! cells are scanned instead.  Either way a query costs
//! `O(min(covered cells, occupied cells) + candidates)`.

use std::ops::RangeInclusive;

use pf_core::geo::bounding_box_degrees;
use pf_core::{FinderConfig, GeoPoint, PersonId};

use crate::{FastMap, FastSet, SpatialIndex};

// ── CellKey ───────────────────────────────────────────────────────────────────

/// Integer coordinates of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: i32,
    pub col: i32,
}

// ── GridIndex ─────────────────────────────────────────────────────────────────

/// Grid-bucket [`SpatialIndex`].
///
/// # Example
///
/// ```
/// use pf_core::{GeoPoint, PersonId};
/// use pf_index::{GridIndex, SpatialIndex};
///
/// let mut grid = GridIndex::new(0.1);
/// grid.insert_or_update(PersonId(1), GeoPoint::new(-36.8415, 174.7570));
/// grid.insert_or_update(PersonId(2), GeoPoint::new(-36.7300, 174.7000));
///
/// let near = grid.candidates_near(GeoPoint::new(-36.8485, 174.7645), 2_000.0);
/// assert_eq!(near, vec![PersonId(1)]);
/// ```
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size_deg: f64,
    cells:         FastMap<CellKey, FastSet<PersonId>>,
    reverse:       FastMap<PersonId, CellKey>,
}

impl GridIndex {
    /// Create an empty grid with cells of `cell_size_deg` degrees.
    ///
    /// `cell_size_deg` must be finite and positive; see
    /// [`FinderConfig::validate`].  Cells finer than
    /// [`FinderConfig::MIN_CELL_SIZE_DEG`] still answer correctly, but
    /// coordinates far from the origin share saturated edge cells.
    pub fn new(cell_size_deg: f64) -> Self {
        debug_assert!(cell_size_deg.is_finite() && cell_size_deg > 0.0);
        Self {
            cell_size_deg,
            cells:   FastMap::default(),
            reverse: FastMap::default(),
        }
    }

    /// Create an empty grid sized by `config.cell_size_deg`.
    pub fn from_config(config: &FinderConfig) -> Self {
        Self::new(config.cell_size_deg)
    }

    #[inline]
    pub fn cell_size_deg(&self) -> f64 {
        self.cell_size_deg
    }

    /// The cell `point` falls in.
    #[inline]
    pub fn cell_key(&self, point: GeoPoint) -> CellKey {
        CellKey {
            row: self.row_of(point.lat),
            col: self.col_of(point.lon),
        }
    }

    /// The cell `id` is currently bucketed in.
    #[inline]
    pub fn cell_of(&self, id: PersonId) -> Option<CellKey> {
        self.reverse.get(&id).copied()
    }

    /// Members of one cell (empty if the cell is unoccupied).
    pub fn cell_members(&self, key: CellKey) -> impl Iterator<Item = PersonId> + '_ {
        self.cells.get(&key).into_iter().flat_map(|set| set.iter().copied())
    }

    /// Number of non-empty cells.
    #[inline]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    #[inline]
    fn row_of(&self, lat: f64) -> i32 {
        (lat / self.cell_size_deg).floor() as i32
    }

    #[inline]
    fn col_of(&self, lon: f64) -> i32 {
        (lon / self.cell_size_deg).floor() as i32
    }

    fn detach(&mut self, id: PersonId, key: CellKey) {
        if let Some(bucket) = self.cells.get_mut(&key) {
            bucket.remove(&id);
            if bucket.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    /// Row range and merged column ranges of every cell a query box touches.
    fn covering(&self, center: GeoPoint, radius_m: f64) -> (RangeInclusive<i32>, Vec<RangeInclusive<i32>>) {
        let bbox = bounding_box_degrees(center, radius_m);
        let rows = self.row_of(bbox.min_lat())..=self.row_of(bbox.max_lat());

        let mut cols: Vec<RangeInclusive<i32>> = bbox
            .lon_ranges()
            .into_iter()
            .map(|(lo, hi)| self.col_of(lo)..=self.col_of(hi))
            .collect();
        cols.sort_unstable_by_key(|r| *r.start());

        // Antimeridian halves can meet in one cell when the box is nearly
        // globe-wide; merge so no cell is visited twice.
        let mut merged: Vec<RangeInclusive<i32>> = Vec::with_capacity(cols.len());
        for r in cols {
            match merged.last_mut() {
                Some(last) if *r.start() <= *last.end() + 1 => {
                    *last = *last.start()..=(*last.end()).max(*r.end());
                }
                _ => merged.push(r),
            }
        }
        (rows, merged)
    }
}

fn span(r: &RangeInclusive<i32>) -> u64 {
    (*r.end() as i64 - *r.start() as i64 + 1).max(0) as u64
}

impl SpatialIndex for GridIndex {
    fn insert_or_update(&mut self, id: PersonId, point: GeoPoint) {
        let key = self.cell_key(point);
        match self.reverse.insert(id, key) {
            Some(old) if old == key => return,
            Some(old) => self.detach(id, old),
            None => {}
        }
        self.cells.entry(key).or_default().insert(id);
    }

    fn remove(&mut self, id: PersonId) -> bool {
        match self.reverse.remove(&id) {
            Some(key) => {
                self.detach(id, key);
                true
            }
            None => false,
        }
    }

    fn candidates_near(&self, center: GeoPoint, radius_m: f64) -> Vec<PersonId> {
        if self.cells.is_empty() {
            return Vec::new();
        }
        let (rows, cols) = self.covering(center, radius_m);

        let col_count = cols.iter().map(span).fold(0u64, u64::saturating_add);
        let covered = span(&rows).saturating_mul(col_count);

        if covered > self.cells.len() as u64 {
            // Box is wider than the occupied part of the grid: filter cells.
            return self
                .cells
                .iter()
                .filter(|(key, _)| {
                    rows.contains(&key.row) && cols.iter().any(|c| c.contains(&key.col))
                })
                .flat_map(|(_, bucket)| bucket.iter().copied())
                .collect();
        }

        let mut out = Vec::new();
        for row in rows {
            for col_range in &cols {
                for col in col_range.clone() {
                    if let Some(bucket) = self.cells.get(&CellKey { row, col }) {
                        out.extend(bucket.iter().copied());
                    }
                }
            }
        }
        out
    }

    #[inline]
    fn contains(&self, id: PersonId) -> bool {
        self.reverse.contains_key(&id)
    }

    #[inline]
    fn len(&self) -> usize {
        self.reverse.len()
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.reverse.clear();
    }
}
