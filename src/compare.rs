// Side-by-side player comparison: an ordered pick of up to four players and
// the per-stat series derived from them for tables and bar charts.

use serde::{Deserialize, Serialize};

use crate::player::{derive_pct, Player};

/// Maximum number of players compared at once.
pub const MAX_COMPARED: usize = 4;

/// Default players-per-page for the find-players dialog; configurable via
/// `[fetch] page_size`.
pub const PLAYERS_PER_PAGE: usize = 20;

/// Statistics the comparison view can chart. The two percentage stats are
/// derived from made/attempted pairs; the rest are read directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareStat {
    Minutes,
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    ThreePointersMade,
    FieldGoalPct,
    FreeThrowPct,
}

impl CompareStat {
    /// Stats in the order the comparison table lists them.
    pub fn all() -> [CompareStat; 10] {
        [
            CompareStat::Minutes,
            CompareStat::Points,
            CompareStat::Rebounds,
            CompareStat::Assists,
            CompareStat::Steals,
            CompareStat::Blocks,
            CompareStat::Turnovers,
            CompareStat::ThreePointersMade,
            CompareStat::FieldGoalPct,
            CompareStat::FreeThrowPct,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompareStat::Minutes => "MIN",
            CompareStat::Points => "PTS",
            CompareStat::Rebounds => "REB",
            CompareStat::Assists => "AST",
            CompareStat::Steals => "STL",
            CompareStat::Blocks => "BLK",
            CompareStat::Turnovers => "TO",
            CompareStat::ThreePointersMade => "3PM",
            CompareStat::FieldGoalPct => "FG%",
            CompareStat::FreeThrowPct => "FT%",
        }
    }

    /// Read this stat from a player. `None` is the "no data" sentinel;
    /// percentage stats with zero or absent attempts land here rather than
    /// producing NaN or Infinity.
    pub fn value_of(&self, player: &Player) -> Option<f64> {
        match self {
            CompareStat::Minutes => player.min,
            CompareStat::Points => player.pts,
            CompareStat::Rebounds => player.reb,
            CompareStat::Assists => player.ast,
            CompareStat::Steals => player.stl,
            CompareStat::Blocks => player.blk,
            CompareStat::Turnovers => player.to,
            CompareStat::ThreePointersMade => player.three_pm,
            CompareStat::FieldGoalPct => derive_pct(player.fgm, player.fga),
            CompareStat::FreeThrowPct => derive_pct(player.ftm, player.fta),
        }
    }
}

/// One (player name, value) point in a chart-ready series.
#[derive(Debug, Clone, PartialEq)]
pub struct StatPoint {
    pub name: String,
    pub value: Option<f64>,
}

/// The ordered comparison selection. Order matters: it is the table and
/// chart column order. Never exceeds [`MAX_COMPARED`] entries.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    selected: Vec<i64>,
}

impl Comparison {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `ids`, truncated to the first
    /// [`MAX_COMPARED`] entries. Duplicates keep their first occurrence.
    pub fn select(&mut self, ids: &[i64]) {
        self.selected.clear();
        for &id in ids {
            if self.selected.len() == MAX_COMPARED {
                break;
            }
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
    }

    /// Append `id`. A duplicate is a no-op. Beyond capacity the oldest
    /// entry is evicted, so the most recently added four survive.
    pub fn add(&mut self, id: i64) {
        if self.selected.contains(&id) {
            return;
        }
        self.selected.push(id);
        if self.selected.len() > MAX_COMPARED {
            self.selected.remove(0);
        }
    }

    /// Drop `id` from the selection, preserving the order of the rest.
    pub fn remove(&mut self, id: i64) {
        self.selected.retain(|&s| s != id);
    }

    /// Clear the selection.
    pub fn reset(&mut self) {
        self.selected.clear();
    }

    pub fn ids(&self) -> &[i64] {
        &self.selected
    }

    pub fn contains(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Derive the per-player series for `stat`, in selection order. Ids not
    /// present in `players` are skipped (they may have dropped out of the
    /// roster between fetches).
    pub fn derive(&self, stat: CompareStat, players: &[Player]) -> Vec<StatPoint> {
        self.selected
            .iter()
            .filter_map(|id| players.iter().find(|p| p.id == *id))
            .map(|p| StatPoint {
                name: p.display_name().to_string(),
                value: stat.value_of(p),
            })
            .collect()
    }
}

/// Case-insensitive substring search across name, team, and position, used
/// by the find-players dialog.
pub fn search_players<'a>(players: &'a [Player], term: &str) -> Vec<&'a Player> {
    let needle = term.to_lowercase();
    players
        .iter()
        .filter(|p| {
            let hit = |field: &Option<String>| {
                field
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            };
            hit(&p.name) || hit(&p.team) || hit(&p.position)
        })
        .collect()
}

/// One fixed-size page of a filtered list (1-based page numbers, matching
/// the dialog's pager).
pub fn page<'a>(players: &[&'a Player], page_number: usize, page_size: usize) -> Vec<&'a Player> {
    let start = page_number.saturating_sub(1) * page_size;
    players.iter().skip(start).take(page_size).copied().collect()
}

/// Total number of pages for a filtered list.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i64, name: &str) -> Player {
        Player {
            id,
            rank: Some(id),
            name: Some(name.to_string()),
            team: Some("DEN".to_string()),
            position: Some("C".to_string()),
            min: Some(30.0),
            pts: Some(20.0 + id as f64),
            reb: Some(8.0),
            ast: Some(4.0),
            stl: Some(1.0),
            blk: Some(0.5),
            to: Some(2.0),
            fgm: Some(8.0),
            fga: Some(16.0),
            ftm: Some(3.0),
            fta: Some(4.0),
            three_pm: Some(1.5),
            rost_pct: None,
            tot: None,
            avg: None,
        }
    }

    #[test]
    fn select_truncates_to_first_four() {
        let mut cmp = Comparison::new();
        cmp.select(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(cmp.ids(), &[1, 2, 3, 4]);
    }

    #[test]
    fn select_dedupes_keeping_first_occurrence() {
        let mut cmp = Comparison::new();
        cmp.select(&[1, 2, 1, 3]);
        assert_eq!(cmp.ids(), &[1, 2, 3]);
    }

    #[test]
    fn add_at_capacity_evicts_oldest() {
        let mut cmp = Comparison::new();
        cmp.select(&[1, 2, 3, 4]);
        cmp.add(5);
        assert_eq!(cmp.ids(), &[2, 3, 4, 5]);
        assert_eq!(cmp.len(), 4);
    }

    #[test]
    fn add_duplicate_is_noop() {
        let mut cmp = Comparison::new();
        cmp.select(&[1, 2, 3, 4]);
        cmp.add(3);
        assert_eq!(cmp.ids(), &[1, 2, 3, 4]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut cmp = Comparison::new();
        cmp.select(&[1, 2, 3, 4]);
        cmp.remove(2);
        assert_eq!(cmp.ids(), &[1, 3, 4]);
    }

    #[test]
    fn reset_empties_selection() {
        let mut cmp = Comparison::new();
        cmp.select(&[1, 2]);
        cmp.reset();
        assert!(cmp.is_empty());
    }

    #[test]
    fn derive_follows_selection_order() {
        let players = vec![player(1, "A"), player(2, "B"), player(3, "C")];
        let mut cmp = Comparison::new();
        cmp.select(&[3, 1]);

        let series = cmp.derive(CompareStat::Points, &players);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "C");
        assert_eq!(series[0].value, Some(23.0));
        assert_eq!(series[1].name, "A");
        assert_eq!(series[1].value, Some(21.0));
    }

    #[test]
    fn derive_skips_unknown_ids() {
        let players = vec![player(1, "A")];
        let mut cmp = Comparison::new();
        cmp.select(&[1, 99]);
        let series = cmp.derive(CompareStat::Rebounds, &players);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn derive_percentage_uses_sentinel() {
        let mut p = player(1, "Bricklayer");
        p.fta = Some(0.0);
        let players = vec![p];
        let mut cmp = Comparison::new();
        cmp.add(1);

        let fg = cmp.derive(CompareStat::FieldGoalPct, &players);
        assert_eq!(fg[0].value, Some(50.0)); // 8/16
        let ft = cmp.derive(CompareStat::FreeThrowPct, &players);
        assert_eq!(ft[0].value, None); // zero attempts -> no data
    }

    #[test]
    fn search_matches_name_team_and_position() {
        let players = vec![player(1, "Jamal Murray"), player(2, "Jalen Brunson")];
        assert_eq!(search_players(&players, "murray").len(), 1);
        assert_eq!(search_players(&players, "den").len(), 2); // team DEN
        assert_eq!(search_players(&players, "c").len(), 2); // position C
        assert_eq!(search_players(&players, "zzz").len(), 0);
    }

    #[test]
    fn pagination_splits_into_fixed_pages() {
        let players: Vec<Player> = (1..=45).map(|i| player(i, &format!("P{i}"))).collect();
        let filtered = search_players(&players, "");
        assert_eq!(page_count(filtered.len(), PLAYERS_PER_PAGE), 3);
        assert_eq!(page(&filtered, 1, PLAYERS_PER_PAGE).len(), 20);
        assert_eq!(page(&filtered, 2, PLAYERS_PER_PAGE).len(), 20);
        assert_eq!(page(&filtered, 3, PLAYERS_PER_PAGE).len(), 5);
        assert!(page(&filtered, 4, PLAYERS_PER_PAGE).is_empty());
        // A custom page size flows through.
        assert_eq!(page_count(filtered.len(), 10), 5);
        assert_eq!(page(&filtered, 5, 10).len(), 5);
    }
}
