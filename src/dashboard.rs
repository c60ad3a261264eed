// Roster view state: the filtered/sorted roster slice, its query
// descriptor, and the in-flight fetch bookkeeping.
//
// All mutation happens synchronously inside one event handler at a time;
// the only suspension points are the fetches themselves. Overlapping
// fetches are resolved with a monotonically increasing sequence token: a
// result is installed only if it belongs to the most recently initiated
// request, so a slow stale response can never clobber a newer one.

use tracing::{debug, warn};

use crate::error::DashboardError;
use crate::player::{Player, Position};
use crate::query::{RosterQuery, SortKey};
use crate::remote::PlayerSource;
use crate::selection::SelectionStore;

/// A roster row joined with the selection set for rendering.
#[derive(Debug, Clone)]
pub struct RosterRow<'a> {
    pub player: &'a Player,
    pub checked: bool,
}

/// The dashboard's roster view state.
#[derive(Debug, Default)]
pub struct RosterView {
    query: RosterQuery,
    /// Last-known-good roster slice. Preserved across fetch failures so a
    /// transient outage doesn't blank the table.
    players: Vec<Player>,
    /// Sequence number of the most recently initiated fetch.
    issued_seq: u64,
    /// Sequence number of the fetch whose result is currently displayed.
    applied_seq: u64,
    /// User-visible message from the most recent failed fetch, cleared by
    /// the next successful one.
    last_error: Option<String>,
}

impl RosterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current query descriptor.
    pub fn query(&self) -> &RosterQuery {
        &self.query
    }

    /// Replace the query descriptor. Returns `true` when it actually
    /// changed, i.e. when a re-fetch is warranted. Equal descriptors are a
    /// no-op so filter churn doesn't trigger redundant requests.
    pub fn set_query(&mut self, query: RosterQuery) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query;
        true
    }

    /// Sort-header click. Always changes the descriptor (same key flips
    /// direction), so a fetch always follows.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.query.toggle_sort(key);
    }

    /// Position-filter click; the active filter clears itself.
    pub fn toggle_position(&mut self, position: Position) {
        self.query.toggle_position(position);
    }

    pub fn set_search(&mut self, search: &str) -> bool {
        let mut next = self.query.clone();
        next.search = search.to_string();
        self.set_query(next)
    }

    /// Begin a fetch: issue the token that `apply` must present.
    pub fn begin_fetch(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// Install a fetch result.
    ///
    /// Stale results (a newer fetch was initiated since `seq` was issued)
    /// are discarded. A failed fetch keeps the last-good slice and records
    /// the message for display.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<Player>, DashboardError>) {
        if seq != self.issued_seq {
            debug!(seq, latest = self.issued_seq, "discarding stale roster response");
            return;
        }
        match result {
            Ok(players) => {
                self.players = players;
                self.applied_seq = seq;
                self.last_error = None;
            }
            Err(e) => {
                warn!("roster fetch failed, keeping last-good slice: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Convenience: run the query against `source` and install the result.
    pub async fn refresh(&mut self, source: &dyn PlayerSource) {
        let seq = self.begin_fetch();
        let query = self.query.clone();
        let result = source.fetch(&query).await;
        self.apply(seq, result);
    }

    /// The displayed roster slice (last-known-good).
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The message from the most recent failed fetch, if the view is
    /// currently showing stale data.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the displayed slice reflects the most recently initiated
    /// fetch.
    pub fn is_current(&self) -> bool {
        self.applied_seq == self.issued_seq
    }

    /// The roster slice merged with the selection set, in display order.
    pub fn rows<'a>(&'a self, selection: &SelectionStore) -> Vec<RosterRow<'a>> {
        self.players
            .iter()
            .map(|player| RosterRow {
                player,
                checked: selection.contains(player.id),
            })
            .collect()
    }
}
