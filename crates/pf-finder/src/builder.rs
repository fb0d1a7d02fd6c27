//! Fluent builder for constructing a [`Finder`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use pf_core::FinderConfig;
use pf_index::{GridIndex, SpatialIndex};
use pf_query::NearbyQueryEngine;
use pf_store::{
    InMemoryDirectory, InMemoryLocationStore, LocationStore, PersonDirectory, load_snapshot_csv,
};

use crate::{Finder, FinderResult};

type IndexFactory<I> = Box<dyn FnOnce(&FinderConfig) -> I>;

/// Fluent builder for [`Finder<I, D>`].
///
/// # Required inputs
///
/// - [`FinderConfig`]: cell size and page-size limits.
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                   |
/// |------------------------|-------------------------------------------|
/// | `.directory(d)`        | Empty `InMemoryDirectory`                 |
/// | `.index(i)`            | `GridIndex` sized by `config.cell_size_deg` |
/// | `.hydrate_from(path)`  | Start with no locations                   |
///
/// # Example
///
/// ```rust,ignore
/// let finder = FinderBuilder::new(FinderConfig::default())
///     .directory(directory)
///     .hydrate_from("locations.csv")
///     .build()?;
/// ```
pub struct FinderBuilder<I: SpatialIndex = GridIndex, D: PersonDirectory = InMemoryDirectory> {
    config:    FinderConfig,
    directory: Arc<D>,
    index:     IndexFactory<I>,
    snapshot:  Option<PathBuf>,
}

impl FinderBuilder<GridIndex> {
    /// Create a builder over the default grid index.
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            directory: Arc::new(InMemoryDirectory::new()),
            index:     Box::new(GridIndex::from_config),
            snapshot:  None,
        }
    }
}

impl<I: SpatialIndex, D: PersonDirectory> FinderBuilder<I, D> {
    /// Use an existing person directory, in-memory or remote.
    ///
    /// Needed with [`hydrate_from`](Self::hydrate_from): every person in the
    /// snapshot must already be known to the directory.
    pub fn directory<E: PersonDirectory>(self, directory: Arc<E>) -> FinderBuilder<I, E> {
        FinderBuilder {
            config:    self.config,
            directory,
            index:     self.index,
            snapshot:  self.snapshot,
        }
    }

    /// Use `index` instead of the default grid.  Any contents are discarded.
    pub fn index<J: SpatialIndex + 'static>(self, index: J) -> FinderBuilder<J, D> {
        FinderBuilder {
            config:    self.config,
            directory: self.directory,
            index:     Box::new(move |_| index),
            snapshot:  self.snapshot,
        }
    }

    /// Load locations from a CSV snapshot written by
    /// [`Finder::save_snapshot`] when building.
    pub fn hydrate_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    /// Validate the config, build the store and engine, and load the
    /// snapshot if one was given.
    pub fn build(self) -> FinderResult<Finder<I, D>> {
        self.config.validate()?;

        let directory = self.directory;
        let index = (self.index)(&self.config);
        let store = Arc::new(InMemoryLocationStore::new(index, Arc::clone(&directory)));

        if let Some(path) = &self.snapshot {
            let locations = load_snapshot_csv(path)?;
            let loaded = store.hydrate(locations)?;
            info!(path = %path.display(), loaded, "finder hydrated from snapshot");
        }

        info!(
            cell_size_deg = self.config.cell_size_deg,
            locations = store.len(),
            "finder ready"
        );

        Ok(Finder {
            engine: NearbyQueryEngine::new(Arc::clone(&store)),
            config: self.config,
            directory,
            store,
        })
    }
}
