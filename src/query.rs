// Roster query descriptors: search, position filter, and sort state.
//
// A `RosterQuery` is a plain value; the dashboard compares descriptors for
// equality and only re-fetches when one actually changed. Translation to the
// remote collaborator's request parameters lives in `to_params()` so it can
// be tested without a network.

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::player::Position;

/// Sortable columns of the remote `fantasy_players` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Rank,
    Name,
    Team,
    Position,
    Minutes,
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    FieldGoalsMade,
    FieldGoalsAttempted,
    FreeThrowsMade,
    FreeThrowsAttempted,
    ThreePointersMade,
    RosterPct,
    SeasonTotal,
    SeasonAverage,
}

impl SortKey {
    /// The remote column name this key sorts on.
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::Rank => "Rank",
            SortKey::Name => "Player",
            SortKey::Team => "Team",
            SortKey::Position => "Position",
            SortKey::Minutes => "MIN",
            SortKey::Points => "PTS",
            SortKey::Rebounds => "REB",
            SortKey::Assists => "AST",
            SortKey::Steals => "STL",
            SortKey::Blocks => "BLK",
            SortKey::Turnovers => "TO",
            SortKey::FieldGoalsMade => "FGM",
            SortKey::FieldGoalsAttempted => "FGA",
            SortKey::FreeThrowsMade => "FTM",
            SortKey::FreeThrowsAttempted => "FTA",
            SortKey::ThreePointersMade => "3PM",
            SortKey::RosterPct => "%ROST",
            SortKey::SeasonTotal => "tot",
            SortKey::SeasonAverage => "avg",
        }
    }

    /// Parse a table header into a sort key. Derived headers (FG%, FT%) are
    /// not remote columns and are rejected along with anything unknown.
    pub fn from_header(header: &str) -> Result<Self, DashboardError> {
        match header {
            "Rank" => Ok(SortKey::Rank),
            "Player" => Ok(SortKey::Name),
            "Team" => Ok(SortKey::Team),
            "Position" => Ok(SortKey::Position),
            "MIN" => Ok(SortKey::Minutes),
            "PTS" => Ok(SortKey::Points),
            "REB" => Ok(SortKey::Rebounds),
            "AST" => Ok(SortKey::Assists),
            "STL" => Ok(SortKey::Steals),
            "BLK" => Ok(SortKey::Blocks),
            "TO" => Ok(SortKey::Turnovers),
            "FGM" => Ok(SortKey::FieldGoalsMade),
            "FGA" => Ok(SortKey::FieldGoalsAttempted),
            "FTM" => Ok(SortKey::FreeThrowsMade),
            "FTA" => Ok(SortKey::FreeThrowsAttempted),
            "3PM" => Ok(SortKey::ThreePointersMade),
            "%ROST" => Ok(SortKey::RosterPct),
            "TOT" | "tot" => Ok(SortKey::SeasonTotal),
            "AVG" | "avg" => Ok(SortKey::SeasonAverage),
            other => Err(DashboardError::InvalidSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn order_suffix(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// The (search, position filter, sort key, sort direction) tuple governing
/// which roster slice is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterQuery {
    pub search: String,
    pub position: Option<Position>,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Default for RosterQuery {
    fn default() -> Self {
        RosterQuery {
            search: String::new(),
            position: None,
            sort: SortKey::Rank,
            direction: SortDirection::Ascending,
        }
    }
}

impl RosterQuery {
    /// Clicking a sort header: the same key flips direction, a new key
    /// resets to ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort = key;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Clicking a position filter button: the active filter clears itself,
    /// any other position becomes the filter.
    pub fn toggle_position(&mut self, position: Position) {
        if self.position == Some(position) {
            self.position = None;
        } else {
            self.position = Some(position);
        }
    }

    /// Translate the descriptor into PostgREST-style request parameters.
    ///
    /// Ties under the requested ordering are broken by the remote's natural
    /// order, which is stable within a response but not specified across
    /// requests.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        if !self.search.is_empty() {
            // Case-insensitive substring match on the player name.
            params.push(("Player".to_string(), format!("ilike.*{}*", self.search)));
        }

        if let Some(pos) = self.position {
            params.push(("Position".to_string(), format!("eq.{pos}")));
        }

        params.push((
            "order".to_string(),
            format!("{}.{}", self.sort.column(), self.direction.order_suffix()),
        ));

        params
    }
}
