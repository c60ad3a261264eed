// Saved team library: named snapshots of checked players, persisted under
// the `teams` storage key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::player::Player;
use crate::selection::SelectionStore;
use crate::storage::{KeyValueStore, TEAMS_KEY};

/// A named team: the players that were checked when it was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTeam {
    pub name: String,
    pub players: Vec<Player>,
}

/// The list of saved teams, written through to storage on every mutation.
pub struct TeamLibrary {
    teams: Vec<SavedTeam>,
    store: Arc<dyn KeyValueStore>,
}

impl TeamLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            teams: Vec::new(),
            store,
        }
    }

    /// Load previously saved teams. Fails soft: unreadable or corrupt
    /// storage is treated as an empty library.
    pub fn load(&mut self) {
        match self.store.get(TEAMS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<SavedTeam>>(&json) {
                Ok(teams) => self.teams = teams,
                Err(e) => {
                    warn!("corrupt saved-team data, starting empty: {e}");
                    self.teams.clear();
                }
            },
            Ok(None) => self.teams.clear(),
            Err(e) => {
                warn!("failed to read saved teams, starting empty: {e}");
                self.teams.clear();
            }
        }
    }

    /// Create a team named `name` from the currently checked subset of
    /// `roster`, append it, and persist. An empty name is rejected and
    /// returns `false`; otherwise returns `true`.
    pub fn create_team(
        &mut self,
        name: &str,
        roster: &[Player],
        selection: &SelectionStore,
    ) -> bool {
        if name.is_empty() {
            return false;
        }
        let players: Vec<Player> = roster
            .iter()
            .filter(|p| selection.contains(p.id))
            .cloned()
            .collect();
        self.teams.push(SavedTeam {
            name: name.to_string(),
            players,
        });
        self.persist();
        true
    }

    /// Ordered view of the saved teams (creation order).
    pub fn teams(&self) -> &[SavedTeam] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.teams) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize saved teams: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(TEAMS_KEY, &json) {
            warn!("failed to persist saved teams: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn player(id: i64, name: &str) -> Player {
        Player {
            id,
            rank: Some(id),
            name: Some(name.to_string()),
            team: Some("MIL".to_string()),
            position: Some("PF".to_string()),
            min: None,
            pts: None,
            reb: None,
            ast: None,
            stl: None,
            blk: None,
            to: None,
            fgm: None,
            fga: None,
            ftm: None,
            fta: None,
            three_pm: None,
            rost_pct: None,
            tot: None,
            avg: None,
        }
    }

    #[test]
    fn create_team_snapshots_checked_players() {
        let store = Arc::new(MemoryStore::new());
        let roster = vec![player(1, "A"), player(2, "B"), player(3, "C")];
        let mut selection = SelectionStore::new(store.clone());
        selection.toggle(1);
        selection.toggle(3);

        let mut library = TeamLibrary::new(store);
        assert!(library.create_team("Dream Team", &roster, &selection));
        assert_eq!(library.len(), 1);
        let team = &library.teams()[0];
        assert_eq!(team.name, "Dream Team");
        let names: Vec<&str> = team.players.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn empty_name_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let selection = SelectionStore::new(store.clone());
        let mut library = TeamLibrary::new(store.clone());
        assert!(!library.create_team("", &[], &selection));
        assert!(library.is_empty());
        assert!(store.get(TEAMS_KEY).unwrap().is_none());
    }

    #[test]
    fn teams_round_trip_across_restart() {
        let store = Arc::new(MemoryStore::new());
        let roster = vec![player(1, "A"), player(2, "B")];
        let mut selection = SelectionStore::new(store.clone());
        selection.toggle(2);

        let mut library = TeamLibrary::new(store.clone());
        library.create_team("First", &roster, &selection);
        library.create_team("Second", &roster, &selection);
        drop(library);

        let mut reloaded = TeamLibrary::new(store);
        reloaded.load();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.teams()[0].name, "First");
        assert_eq!(reloaded.teams()[1].name, "Second");
        assert_eq!(reloaded.teams()[1].players[0].id, 2);
    }

    #[test]
    fn load_treats_corrupt_data_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(TEAMS_KEY, "{broken").unwrap();
        let mut library = TeamLibrary::new(store);
        library.load();
        assert!(library.is_empty());
    }

    #[test]
    fn persisted_format_is_name_players_array() {
        let store = Arc::new(MemoryStore::new());
        let roster = vec![player(7, "Solo")];
        let mut selection = SelectionStore::new(store.clone());
        selection.toggle(7);

        let mut library = TeamLibrary::new(store.clone());
        library.create_team("Solo Squad", &roster, &selection);

        let json = store.get(TEAMS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "Solo Squad");
        assert_eq!(value[0]["players"][0]["id"], 7);
    }
}
