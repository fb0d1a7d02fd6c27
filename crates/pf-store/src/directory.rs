//! The person directory: who exists, and what they are called.
//!
//! The engine itself only asks one question of it (`exists`, on the upsert
//! path).  Names are attached to query hits by the calling layer.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use pf_core::PersonId;

/// A person as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id:   PersonId,
    pub name: String,
}

/// Existence and name lookups for persons.
///
/// # Thread safety
///
/// Called from many request threads at once, so implementations must be
/// `Send + Sync`.  The store calls `exists` **before** taking its own lock,
/// so a slow remote directory never blocks readers.
pub trait PersonDirectory: Send + Sync {
    fn exists(&self, id: PersonId) -> bool;

    /// Display name, `None` if `id` is unknown.
    fn name(&self, id: PersonId) -> Option<String>;
}

// ── InMemoryDirectory ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct DirectoryState {
    persons: BTreeMap<PersonId, String>,
    next_id: u64,
}

/// Process-local directory.
///
/// Ids handed out by [`create`](Self::create) are sequential from 1.
/// Persons inserted with an explicit id push the counter past that id so
/// the two never collide.
#[derive(Debug)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState { persons: BTreeMap::new(), next_id: 1 }),
        }
    }

    /// Register a new person under the next free id.
    pub fn create(&self, name: impl Into<String>) -> Person {
        let name = name.into();
        let mut state = self.state.write();
        let id = PersonId(state.next_id);
        state.next_id += 1;
        state.persons.insert(id, name.clone());
        debug!(person = %id, "person created");
        Person { id, name }
    }

    /// Register (or rename) a person under an id assigned elsewhere.
    pub fn insert(&self, id: PersonId, name: impl Into<String>) {
        let mut state = self.state.write();
        state.persons.insert(id, name.into());
        state.next_id = state.next_id.max(id.0.saturating_add(1));
    }

    /// Batch lookup.  Unknown ids are skipped; the order of `ids` is kept.
    pub fn get_many(&self, ids: &[PersonId]) -> Vec<Person> {
        let state = self.state.read();
        ids.iter()
            .filter_map(|&id| {
                state.persons.get(&id).map(|name| Person { id, name: name.clone() })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().persons.is_empty()
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonDirectory for InMemoryDirectory {
    fn exists(&self, id: PersonId) -> bool {
        self.state.read().persons.contains_key(&id)
    }

    fn name(&self, id: PersonId) -> Option<String> {
        self.state.read().persons.get(&id).cloned()
    }
}
