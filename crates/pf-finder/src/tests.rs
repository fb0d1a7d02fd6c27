//! Integration tests for pf-finder.

use pf_core::{FinderConfig, PersonId};

use crate::{Finder, FinderBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

const CENTER: (f64, f64) = (-36.8485, 174.7645);

/// Ana, Ben, and Cat inside 10 km of [`CENTER`]; Dan and Eve outside.
const PEOPLE: [(&str, f64, f64); 5] = [
    ("Ana", -36.8415, 174.7570),
    ("Ben", -36.8580, 174.7870),
    ("Cat", -36.8770, 174.7610),
    ("Dan", -36.8870, 174.6150),
    ("Eve", -36.7300, 174.7000),
];

fn auckland_finder() -> Finder {
    let finder = FinderBuilder::new(FinderConfig::default()).build().unwrap();
    for (name, lat, lon) in PEOPLE {
        let person = finder.create_person(name);
        finder.update_location(person.id, lat, lon).unwrap();
    }
    finder
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use pf_store::LocationStore;

    use super::*;
    use crate::FinderError;

    #[test]
    fn builds_empty_with_defaults() {
        let finder = FinderBuilder::new(FinderConfig::default()).build().unwrap();
        assert_eq!(finder.directory().len(), 0);
        assert!(finder.store().is_empty());
        assert_eq!(finder.config().max_page_size, 100);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FinderConfig { cell_size_deg: 0.0, ..FinderConfig::default() };
        let err = FinderBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, FinderError::Config(_)));

        let config = FinderConfig { default_page_size: 500, ..FinderConfig::default() };
        assert!(matches!(
            FinderBuilder::new(config).build(),
            Err(FinderError::Config(_))
        ));
    }

    #[test]
    fn rtree_index_can_be_swapped_in() {
        let finder = FinderBuilder::new(FinderConfig::default())
            .index(pf_index::RTreeIndex::new())
            .build()
            .unwrap();
        let ana = finder.create_person("Ana");
        finder.update_location(ana.id, -36.8415, 174.7570).unwrap();
        let page = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, None).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Ana");
    }

    #[test]
    fn missing_snapshot_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FinderBuilder::new(FinderConfig::default())
            .hydrate_from(dir.path().join("absent.csv"))
            .build();
        assert!(matches!(result, Err(FinderError::Store(pf_store::StoreError::Io(_)))));
    }
}

// ── Persons & locations ───────────────────────────────────────────────────────

#[cfg(test)]
mod location_tests {
    use pf_store::StoreError;

    use super::*;
    use crate::FinderError;

    #[test]
    fn created_persons_get_sequential_ids() {
        let finder = auckland_finder();
        let names: Vec<_> = finder
            .get_persons(&[PersonId(3), PersonId(1), PersonId(42)])
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Cat", "Ana"]);
    }

    #[test]
    fn update_returns_and_stores_the_new_location() {
        let finder = auckland_finder();
        let loc = finder.update_location(PersonId(2), -36.80, 174.70).unwrap();
        assert_eq!(loc.person_id, PersonId(2));
        assert_eq!(finder.get_location(PersonId(2)).unwrap(), loc);
    }

    #[test]
    fn update_for_unknown_person_fails() {
        let finder = auckland_finder();
        let err = finder.update_location(PersonId(999), -36.85, 174.76).unwrap_err();
        assert!(matches!(err, FinderError::Store(StoreError::EntityNotFound(PersonId(999)))));
    }

    #[test]
    fn update_with_bad_coordinates_fails_and_keeps_old_point() {
        let finder = auckland_finder();
        let before = finder.get_location(PersonId(1)).unwrap();
        let err = finder.update_location(PersonId(1), 95.0, 174.76).unwrap_err();
        assert!(matches!(err, FinderError::Store(StoreError::Geo(_))));
        assert_eq!(finder.get_location(PersonId(1)).unwrap(), before);
    }

    #[test]
    fn removed_location_disappears_from_search() {
        let finder = auckland_finder();
        finder.remove_location(PersonId(1)).unwrap();
        finder.remove_location(PersonId(1)).unwrap();
        assert!(matches!(
            finder.get_location(PersonId(1)),
            Err(FinderError::Store(StoreError::NotFound(_)))
        ));
        let page = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, None).unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ben", "Cat"]);
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod search_tests {
    use pf_core::GeoError;
    use pf_query::QueryError;

    use super::*;
    use crate::FinderError;

    #[test]
    fn ten_km_search_returns_named_persons_nearest_first() {
        let finder = auckland_finder();
        let page = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, None).unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Ben", "Cat"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.page_size, 20);
        assert!(page.items.iter().all(|p| p.distance_km <= 10.0));
    }

    #[test]
    fn radius_is_kilometres() {
        let finder = auckland_finder();
        // Ana is about 1 km from the center, Ben about 2.3 km.
        let page = finder.find_nearby_km(CENTER.0, CENTER.1, 1.5, 0, None).unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items[0].name, "Ana");
    }

    #[test]
    fn oversized_page_is_clamped() {
        let finder = auckland_finder();
        let page = finder
            .find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, Some(10_000))
            .unwrap();
        assert_eq!(page.page_size, 100);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn page_five_of_three_is_empty() {
        let finder = auckland_finder();
        let page = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 5, Some(20)).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_elements, 3);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let finder = auckland_finder();
        let err = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, Some(0)).unwrap_err();
        assert!(matches!(err, FinderError::Query(QueryError::InvalidPageSize)));
    }

    #[test]
    fn bad_radius_is_rejected_in_kilometres() {
        let finder = auckland_finder();
        for r in [-1.0, f64::NAN, f64::INFINITY] {
            let err = finder.find_nearby_km(CENTER.0, CENTER.1, r, 0, None).unwrap_err();
            assert!(matches!(err, FinderError::InvalidRadius(_)), "radius {r}");
            assert!(err.to_string().contains("km"));
        }
    }

    #[test]
    fn radius_beyond_the_globe_finds_everyone() {
        let finder = auckland_finder();
        // 1e306 km overflows to infinity once multiplied into metres.
        for r in [1e306, f64::MAX] {
            let page = finder.find_nearby_km(CENTER.0, CENTER.1, r, 0, None).unwrap();
            assert_eq!(page.total_elements, 5, "radius {r}");
        }
    }

    #[test]
    fn off_globe_center_is_a_query_error() {
        let finder = auckland_finder();
        let err = finder.find_nearby_km(95.0, CENTER.1, 10.0, 0, None).unwrap_err();
        assert!(matches!(
            err,
            FinderError::Query(QueryError::Geo(GeoError::InvalidCoordinate { .. }))
        ));
    }
}

// ── Pluggable directory ───────────────────────────────────────────────────────

#[cfg(test)]
mod directory_tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use pf_store::{PersonDirectory, StoreError};

    use super::*;
    use crate::FinderError;

    /// Read-only directory standing in for an external person service.
    struct FixedDirectory(HashMap<PersonId, String>);

    impl PersonDirectory for FixedDirectory {
        fn exists(&self, id: PersonId) -> bool {
            self.0.contains_key(&id)
        }

        fn name(&self, id: PersonId) -> Option<String> {
            self.0.get(&id).cloned()
        }
    }

    fn fixed_finder() -> Finder<pf_index::GridIndex, FixedDirectory> {
        let names = PEOPLE
            .iter()
            .enumerate()
            .map(|(i, (name, _, _))| (PersonId(100 + i as u64), name.to_string()))
            .collect();
        FinderBuilder::new(FinderConfig::default())
            .directory(Arc::new(FixedDirectory(names)))
            .build()
            .unwrap()
    }

    #[test]
    fn external_directory_gates_updates_and_names_hits() {
        let finder = fixed_finder();
        for (i, (_, lat, lon)) in PEOPLE.iter().enumerate() {
            finder.update_location(PersonId(100 + i as u64), *lat, *lon).unwrap();
        }
        let err = finder.update_location(PersonId(1), -36.85, 174.76).unwrap_err();
        assert!(matches!(err, FinderError::Store(StoreError::EntityNotFound(PersonId(1)))));

        let page = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, None).unwrap();
        let hits: Vec<_> = page.items.iter().map(|p| (p.person_id, p.name.as_str())).collect();
        assert_eq!(
            hits,
            [(PersonId(100), "Ana"), (PersonId(101), "Ben"), (PersonId(102), "Cat")]
        );
    }

    #[test]
    fn external_directory_supports_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.csv");

        let finder = fixed_finder();
        finder.update_location(PersonId(103), -36.8870, 174.6150).unwrap();
        let directory = Arc::clone(finder.directory());
        finder.shutdown(Some(path.as_path())).unwrap();

        let restored = FinderBuilder::new(FinderConfig::default())
            .directory(directory)
            .hydrate_from(&path)
            .build()
            .unwrap();
        let loc = restored.get_location(PersonId(103)).unwrap();
        assert_eq!(loc.point, pf_core::GeoPoint::new(-36.8870, 174.6150));
    }
}

// ── Snapshots & lifecycle ─────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use std::sync::Arc;

    use pf_store::{LocationStore, StoreError};

    use super::*;
    use crate::FinderError;

    #[test]
    fn snapshot_then_hydrate_restores_search_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.csv");

        let finder = auckland_finder();
        let before = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, None).unwrap();
        let directory = Arc::clone(finder.directory());
        finder.shutdown(Some(path.as_path())).unwrap();

        let restored = FinderBuilder::new(FinderConfig::default())
            .directory(directory)
            .hydrate_from(&path)
            .build()
            .unwrap();
        let after = restored.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, None).unwrap();
        assert_eq!(before, after);
        assert_eq!(restored.store().len(), 5);
    }

    #[test]
    fn hydrate_without_directory_entries_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.csv");
        assert_eq!(auckland_finder().save_snapshot(&path).unwrap(), 5);

        let result = FinderBuilder::new(FinderConfig::default())
            .hydrate_from(&path)
            .build();
        assert!(matches!(
            result,
            Err(FinderError::Store(StoreError::EntityNotFound(_)))
        ));
    }

    #[test]
    fn shutdown_without_snapshot_succeeds() {
        auckland_finder().shutdown(None).unwrap();
    }

    #[test]
    fn finder_is_shareable_across_threads() {
        let finder = Arc::new(auckland_finder());
        std::thread::scope(|s| {
            for t in 0..4 {
                let finder = Arc::clone(&finder);
                s.spawn(move || {
                    for i in 0..50 {
                        let lat = -36.85 + (t * 50 + i) as f64 * 1e-5;
                        finder.update_location(PersonId(4), lat, 174.76).unwrap();
                        let page = finder.find_nearby_km(CENTER.0, CENTER.1, 10.0, 0, None).unwrap();
                        assert!(page.items.iter().any(|p| p.person_id == PersonId(4)));
                    }
                });
            }
        });
        assert!(finder.get_location(PersonId(4)).is_ok());
    }
}
