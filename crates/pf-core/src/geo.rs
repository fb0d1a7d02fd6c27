//! Geographic coordinate type and distance utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Ranking by distance needs
//! ties to be reproducible, and `f32` rounding at city scale is already
//! around a metre, so single precision is not enough here.

use std::fmt;

use crate::{GeoError, GeoResult, PersonId};

/// Mean Earth radius in kilometres used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Metres per degree of latitude used for the bounding-box prefilter.
///
/// Slightly below the true value on a 6371 km sphere (≈ 111 195 m), so the
/// derived degree spans are always a little too wide, never too narrow.
pub const METERS_PER_DEGREE_LAT: f64 = 111_111.0;

/// Bounding boxes reaching this close to a pole span every longitude.
pub const POLE_CLAMP_DEG: f64 = 89.0;

// ── Validation ────────────────────────────────────────────────────────────────

/// Check that `(lat, lon)` is a point on the globe.
///
/// NaN fails both range checks and is rejected.
pub fn validate(lat: f64, lon: f64) -> GeoResult<()> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate { lat, lon })
    }
}

/// Check that `radius_m` is a finite, non-negative number of metres.
pub fn validate_radius(radius_m: f64) -> GeoResult<()> {
    if radius_m.is_finite() && radius_m >= 0.0 {
        Ok(())
    } else {
        Err(GeoError::InvalidRadius(radius_m))
    }
}

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Construct without validation.  Use [`checked`](Self::checked) for
    /// untrusted input.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a point, rejecting out-of-range coordinates.
    pub fn checked(lat: f64, lon: f64) -> GeoResult<Self> {
        validate(lat, lon)?;
        Ok(Self { lat, lon })
    }

    /// Re-validate a point built with [`new`](Self::new).
    #[inline]
    pub fn validate(self) -> GeoResult<()> {
        validate(self.lat, self.lon)
    }

    /// Haversine great-circle distance in kilometres.
    #[inline]
    pub fn haversine_km(self, other: GeoPoint) -> f64 {
        haversine_km(self, other)
    }

    /// Haversine great-circle distance in metres.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        haversine_km(self, other) * 1_000.0
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Great-circle distance between `p1` and `p2` in kilometres.
///
/// Every term is symmetric in its arguments (the half-angle sines are
/// squared and the cosine product commutes), so `d(a, b)` and `d(b, a)` are
/// bit-identical.  Identical points give exactly `0.0`.
pub fn haversine_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lon = (p2.lon - p1.lon).to_radians();

    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();

    let a = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    // Rounding can push `a` a hair past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

// ── Location ──────────────────────────────────────────────────────────────────

/// The current position of one person.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub person_id: PersonId,
    pub point:     GeoPoint,
}

impl Location {
    #[inline]
    pub fn new(person_id: PersonId, point: GeoPoint) -> Self {
        Self { person_id, point }
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Degree-space box that contains every point within a radius of `center`.
///
/// Produced by [`bounding_box_degrees`].  The box is a prefilter only: it is
/// deliberately too large and callers must still apply the exact haversine
/// cutoff.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub center: GeoPoint,

    /// Half-height of the box in degrees of latitude.
    pub lat_span: f64,

    /// Half-width of the box in degrees of longitude.  `180.0` when
    /// `full_longitude` is set.
    pub lon_span: f64,

    /// The box reaches a pole (or is wider than the globe) and therefore
    /// covers every longitude.
    pub full_longitude: bool,
}

/// Convert `radius_m` around `center` into an over-approximating degree box.
///
/// The latitude span uses [`METERS_PER_DEGREE_LAT`].  The longitude span is
/// widened by `1 / cos(lat)` evaluated at the most poleward latitude the box
/// reaches, which keeps it a superset of the true circle.  Once that latitude
/// gets within [`POLE_CLAMP_DEG`] of a pole the approximation degenerates and
/// the box is clamped to all longitudes instead.
pub fn bounding_box_degrees(center: GeoPoint, radius_m: f64) -> BoundingBox {
    let lat_span = (radius_m / METERS_PER_DEGREE_LAT).min(180.0);
    let reach    = center.lat.abs() + lat_span;

    if reach >= POLE_CLAMP_DEG {
        return BoundingBox::full_longitude(center, lat_span);
    }

    let lon_span = lat_span / reach.to_radians().cos();
    if lon_span >= 180.0 {
        return BoundingBox::full_longitude(center, lat_span);
    }

    BoundingBox { center, lat_span, lon_span, full_longitude: false }
}

impl BoundingBox {
    fn full_longitude(center: GeoPoint, lat_span: f64) -> Self {
        Self { center, lat_span, lon_span: 180.0, full_longitude: true }
    }

    /// Southern edge, clamped to the globe.
    #[inline]
    pub fn min_lat(&self) -> f64 {
        (self.center.lat - self.lat_span).max(-90.0)
    }

    /// Northern edge, clamped to the globe.
    #[inline]
    pub fn max_lat(&self) -> f64 {
        (self.center.lat + self.lat_span).min(90.0)
    }

    /// The box's longitude extent as one or two `[lo, hi]` segments inside
    /// `[-180, 180]`.
    ///
    /// A box crossing the antimeridian is split in two.
    pub fn lon_ranges(&self) -> Vec<(f64, f64)> {
        if self.full_longitude {
            return vec![(-180.0, 180.0)];
        }
        let lo = self.center.lon - self.lon_span;
        let hi = self.center.lon + self.lon_span;
        if lo < -180.0 {
            vec![(-180.0, hi), (lo + 360.0, 180.0)]
        } else if hi > 180.0 {
            vec![(lo, 180.0), (-180.0, hi - 360.0)]
        } else {
            vec![(lo, hi)]
        }
    }

    /// Cheap membership test in degree space.
    pub fn contains(&self, p: GeoPoint) -> bool {
        if p.lat < self.min_lat() || p.lat > self.max_lat() {
            return false;
        }
        self.lon_ranges()
            .iter()
            .any(|&(lo, hi)| p.lon >= lo && p.lon <= hi)
    }
}
