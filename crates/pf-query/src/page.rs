//! Pagination types and the per-person query hit.

use pf_core::{GeoPoint, PersonId};

// ── NearbyHit ─────────────────────────────────────────────────────────────────

/// One person found by a nearby query.  Computed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearbyHit {
    pub person_id:   PersonId,
    pub lat:         f64,
    pub lon:         f64,
    /// Great-circle distance from the query center, kilometres.
    pub distance_km: f64,
}

impl NearbyHit {
    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

// ── PageRequest ───────────────────────────────────────────────────────────────

/// Which slice of an ordered result set to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    /// Zero-based page number.
    pub index: usize,
    /// Items per page.  Must be > 0.
    pub size:  usize,
}

impl PageRequest {
    #[inline]
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// Position of the first item of this page in the full result.
    #[inline]
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size)
    }
}

// ── Page ──────────────────────────────────────────────────────────────────────

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<T> {
    pub items:          Vec<T>,
    pub page_index:     usize,
    pub page_size:      usize,
    /// Size of the whole filtered result, not of this page.
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Number of pages needed to show `total_elements` items.
    pub fn total_pages(&self) -> usize {
        self.total_elements.div_ceil(self.page_size.max(1))
    }

    /// `true` if no page follows this one.
    pub fn is_last(&self) -> bool {
        self.page_index + 1 >= self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items:          self.items.into_iter().map(f).collect(),
            page_index:     self.page_index,
            page_size:      self.page_size,
            total_elements: self.total_elements,
        }
    }
}
