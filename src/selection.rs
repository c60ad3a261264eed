// The checked-player selection set, persisted on every mutation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::storage::{KeyValueStore, CHECKED_PLAYERS_KEY};

/// The set of player ids the user has flagged, independent of lineup slots.
///
/// The in-memory set is authoritative for the session; every mutation is
/// written through to the store synchronously. Persistence failures are
/// warned and swallowed; they never block the in-memory operation or reach
/// the render path.
pub struct SelectionStore {
    checked: HashSet<i64>,
    store: Arc<dyn KeyValueStore>,
}

impl SelectionStore {
    /// Create an empty selection backed by `store`. Call [`load`](Self::load)
    /// to pick up a previously persisted set.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            checked: HashSet::new(),
            store,
        }
    }

    /// Load the persisted set. Fails soft: unreadable or corrupt storage is
    /// treated as an empty set.
    pub fn load(&mut self) {
        match self.store.get(CHECKED_PLAYERS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<i64>>(&json) {
                Ok(ids) => self.checked = ids.into_iter().collect(),
                Err(e) => {
                    warn!("corrupt checked-player data, starting empty: {e}");
                    self.checked.clear();
                }
            },
            Ok(None) => self.checked.clear(),
            Err(e) => {
                warn!("failed to read checked players, starting empty: {e}");
                self.checked.clear();
            }
        }
    }

    /// Flip membership of `id`, persist, and return the new membership
    /// state. Toggling twice restores the prior state.
    pub fn toggle(&mut self, id: i64) -> bool {
        let now_checked = if self.checked.contains(&id) {
            self.checked.remove(&id);
            false
        } else {
            self.checked.insert(id);
            true
        };
        self.persist();
        now_checked
    }

    /// Pure membership query.
    pub fn contains(&self, id: i64) -> bool {
        self.checked.contains(&id)
    }

    /// Clear the set and its persisted representation.
    pub fn reset(&mut self) {
        self.checked.clear();
        if let Err(e) = self.store.delete(CHECKED_PLAYERS_KEY) {
            warn!("failed to clear persisted checked players: {e}");
        }
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Snapshot of the current ids, sorted for deterministic output.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.checked.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.ids()) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize checked players: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(CHECKED_PLAYERS_KEY, &json) {
            warn!("failed to persist checked players: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use anyhow::anyhow;

    fn selection() -> (SelectionStore, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (SelectionStore::new(store.clone()), store)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let (mut sel, _) = selection();
        assert!(sel.toggle(42));
        assert!(sel.contains(42));
        assert!(!sel.toggle(42));
        assert!(!sel.contains(42));
    }

    #[test]
    fn double_toggle_is_idempotent() {
        let (mut sel, _) = selection();
        sel.toggle(1);
        sel.toggle(2);
        let before = sel.ids();

        sel.toggle(7);
        sel.toggle(7);
        assert_eq!(sel.ids(), before);
    }

    #[test]
    fn toggle_persists_immediately() {
        let (mut sel, store) = selection();
        sel.toggle(5);
        sel.toggle(3);
        let stored: Vec<i64> =
            serde_json::from_str(&store.get(CHECKED_PLAYERS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, vec![3, 5]);
    }

    #[test]
    fn reset_clears_set_and_storage() {
        let (mut sel, store) = selection();
        sel.toggle(1);
        sel.toggle(2);
        sel.reset();
        assert!(sel.is_empty());
        assert!(store.get(CHECKED_PLAYERS_KEY).unwrap().is_none());
    }

    #[test]
    fn round_trip_across_restart() {
        let store = Arc::new(MemoryStore::new());

        let mut first = SelectionStore::new(store.clone());
        first.toggle(10);
        first.toggle(20);
        first.toggle(30);
        first.toggle(20); // un-check
        drop(first);

        // Simulated session restart: a fresh store over the same medium.
        let mut second = SelectionStore::new(store);
        second.load();
        assert_eq!(second.ids(), vec![10, 30]);
    }

    #[test]
    fn load_treats_corrupt_data_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(CHECKED_PLAYERS_KEY, "not json at all").unwrap();

        let mut sel = SelectionStore::new(store);
        sel.load();
        assert!(sel.is_empty());
    }

    /// A store whose writes always fail, for the fail-soft path.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
        fn delete(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn persistence_failure_does_not_block_memory_state() {
        let mut sel = SelectionStore::new(Arc::new(BrokenStore));
        assert!(sel.toggle(9));
        assert!(sel.contains(9));
        sel.load();
        assert!(sel.is_empty()); // unreadable storage loads as empty
        sel.toggle(4);
        sel.reset();
        assert!(sel.is_empty());
    }
}
