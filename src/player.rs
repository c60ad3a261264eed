// Player records and positions as stored in the remote `fantasy_players` table.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Basketball positions used for filtering and lineup slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

impl Position {
    /// Parse a position string into a Position enum. Case-insensitive.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PG" => Some(Position::PointGuard),
            "SG" => Some(Position::ShootingGuard),
            "SF" => Some(Position::SmallForward),
            "PF" => Some(Position::PowerForward),
            "C" => Some(Position::Center),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::PointGuard => "PG",
            Position::ShootingGuard => "SG",
            Position::SmallForward => "SF",
            Position::PowerForward => "PF",
            Position::Center => "C",
        }
    }

    /// All concrete positions, in the order the filter UI offers them.
    pub fn all() -> [Position; 5] {
        [
            Position::PointGuard,
            Position::ShootingGuard,
            Position::SmallForward,
            Position::PowerForward,
            Position::Center,
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A single player row. Field names mirror the remote table's columns; all
/// per-game statistics are optional (absent = not yet recorded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    #[serde(rename = "Rank")]
    pub rank: Option<i64>,
    #[serde(rename = "Player")]
    pub name: Option<String>,
    #[serde(rename = "Team")]
    pub team: Option<String>,
    #[serde(rename = "Position")]
    pub position: Option<String>,
    #[serde(rename = "MIN")]
    pub min: Option<f64>,
    #[serde(rename = "PTS")]
    pub pts: Option<f64>,
    #[serde(rename = "REB")]
    pub reb: Option<f64>,
    #[serde(rename = "AST")]
    pub ast: Option<f64>,
    #[serde(rename = "STL")]
    pub stl: Option<f64>,
    #[serde(rename = "BLK")]
    pub blk: Option<f64>,
    #[serde(rename = "TO")]
    pub to: Option<f64>,
    #[serde(rename = "FGM")]
    pub fgm: Option<f64>,
    #[serde(rename = "FGA")]
    pub fga: Option<f64>,
    #[serde(rename = "FTM")]
    pub ftm: Option<f64>,
    #[serde(rename = "FTA")]
    pub fta: Option<f64>,
    #[serde(rename = "3PM")]
    pub three_pm: Option<f64>,
    #[serde(rename = "%ROST", default)]
    pub rost_pct: Option<f64>,
    #[serde(rename = "tot", default)]
    pub tot: Option<f64>,
    #[serde(rename = "avg", default)]
    pub avg: Option<f64>,
}

impl Player {
    /// Field-goal percentage, rounded to one decimal. Zero or absent
    /// attempts yields `None` (the "no data" sentinel), never a division
    /// error.
    pub fn fg_pct(&self) -> Option<f64> {
        derive_pct(self.fgm, self.fga)
    }

    /// Free-throw percentage, same sentinel rule as [`fg_pct`](Self::fg_pct).
    pub fn ft_pct(&self) -> Option<f64> {
        derive_pct(self.ftm, self.fta)
    }

    /// Parsed position, if the stored string is one of the five codes.
    pub fn parsed_position(&self) -> Option<Position> {
        self.position.as_deref().and_then(Position::from_str_pos)
    }

    /// Display name; malformed rows without a name render as "-".
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("-")
    }
}

/// `made / attempted * 100`, rounded to one decimal. `None` when either side
/// is absent or attempts are zero.
pub fn derive_pct(made: Option<f64>, attempted: Option<f64>) -> Option<f64> {
    match (made, attempted) {
        (Some(m), Some(a)) if a > 0.0 => Some((m / a * 1000.0).round() / 10.0),
        _ => None,
    }
}

/// Format a derived percentage for display: `"52.3%"` or the `-` sentinel.
pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        Some(v) => format!("{v:.1}%"),
        None => "-".to_string(),
    }
}

/// Convert raw rows into validated players, skipping rows without an id.
/// `id` is nullable in malformed or partially imported remote data; absence
/// of an identity is an error state, not a valid record.
pub fn validate_rows(rows: Vec<serde_json::Value>) -> Vec<Player> {
    let mut players = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<Player>(row.clone()) {
            Ok(p) => players.push(p),
            Err(e) => {
                let name = row
                    .get("Player")
                    .and_then(|v| v.as_str())
                    .unwrap_or("<unnamed>");
                warn!("skipping malformed player row for '{name}': {e}");
            }
        }
    }
    players
}
