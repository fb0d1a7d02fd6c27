//! CSV snapshots of the canonical location map.
//!
//! # CSV format
//!
//! One row per person with a location:
//!
//! ```csv
//! person_id,latitude,longitude
//! 1,-36.8415,174.757
//! 2,-36.858,174.787
//! ```
//!
//! Only the canonical map is written.  The spatial index is derived data and
//! is rebuilt on load (see [`LocationStore::hydrate`](crate::LocationStore::hydrate)).
//!
//! Rows are validated on load: out-of-range coordinates and repeated
//! `person_id`s are rejected with the offending line number.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use pf_core::{GeoPoint, Location, PersonId};

use crate::{StoreError, StoreResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct SnapshotRecord {
    person_id: u64,
    latitude:  f64,
    longitude: f64,
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write `locations` to a CSV file at `path`, replacing it.
pub fn save_snapshot_csv(path: &Path, locations: &[Location]) -> StoreResult<()> {
    let file = std::fs::File::create(path)?;
    write_snapshot(file, locations)?;
    info!(path = %path.display(), count = locations.len(), "snapshot saved");
    Ok(())
}

/// Like [`save_snapshot_csv`] but accepts any `Write` sink.
pub fn write_snapshot<W: Write>(writer: W, locations: &[Location]) -> StoreResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for loc in locations {
        csv_writer.serialize(SnapshotRecord {
            person_id: loc.person_id.0,
            latitude:  loc.point.lat,
            longitude: loc.point.lon,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Load a snapshot written by [`save_snapshot_csv`].
pub fn load_snapshot_csv(path: &Path) -> StoreResult<Vec<Location>> {
    let file = std::fs::File::open(path)?;
    let locations = read_snapshot(file)?;
    info!(path = %path.display(), count = locations.len(), "snapshot loaded");
    Ok(locations)
}

/// Like [`load_snapshot_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn read_snapshot<R: Read>(reader: R) -> StoreResult<Vec<Location>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (i, result) in csv_reader.deserialize::<SnapshotRecord>().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let row = result?;
        let point = GeoPoint::checked(row.latitude, row.longitude)
            .map_err(|e| StoreError::Parse(format!("line {line}: {e}")))?;
        let id = PersonId(row.person_id);
        if !seen.insert(id) {
            return Err(StoreError::Parse(format!("line {line}: duplicate person_id {}", row.person_id)));
        }
        out.push(Location::new(id, point));
    }
    Ok(out)
}
