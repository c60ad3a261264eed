// Lineup slot assignment: the fixed 13-slot team layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::player::Player;

/// Labels for the fixed lineup slots. `Guard`/`Forward` accept either guard
/// or forward position, `Utility` anything, `Bench` anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotLabel {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
    Guard,
    Forward,
    Utility,
    Bench,
}

impl SlotLabel {
    pub fn display_str(&self) -> &'static str {
        match self {
            SlotLabel::PointGuard => "PG",
            SlotLabel::ShootingGuard => "SG",
            SlotLabel::SmallForward => "SF",
            SlotLabel::PowerForward => "PF",
            SlotLabel::Center => "C",
            SlotLabel::Guard => "G",
            SlotLabel::Forward => "F",
            SlotLabel::Utility => "UTIL",
            SlotLabel::Bench => "BN",
        }
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A single lineup slot: a position label and at most one occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupSlot {
    pub label: SlotLabel,
    pub player: Option<Player>,
}

/// The user's team lineup: an ordered, fixed list of labeled slots.
///
/// A slot's label is not validated against the assigned player's natural
/// position, and the same player may occupy multiple slots. Occupancy is
/// session-local and not persisted.
#[derive(Debug, Clone)]
pub struct Lineup {
    slots: Vec<LineupSlot>,
}

impl Default for Lineup {
    fn default() -> Self {
        Self::new()
    }
}

impl Lineup {
    /// The standard 13-slot layout: PG, SG, SF, PF, C, G, F, UTIL x3, BN x3.
    pub fn new() -> Self {
        let labels = [
            SlotLabel::PointGuard,
            SlotLabel::ShootingGuard,
            SlotLabel::SmallForward,
            SlotLabel::PowerForward,
            SlotLabel::Center,
            SlotLabel::Guard,
            SlotLabel::Forward,
            SlotLabel::Utility,
            SlotLabel::Utility,
            SlotLabel::Utility,
            SlotLabel::Bench,
            SlotLabel::Bench,
            SlotLabel::Bench,
        ];
        Lineup {
            slots: labels
                .into_iter()
                .map(|label| LineupSlot { label, player: None })
                .collect(),
        }
    }

    /// Assign `player` to the slot at `index`, overwriting any prior
    /// occupant unconditionally. Replacement confirmation, if any, is a
    /// view-layer concern.
    pub fn assign(&mut self, index: usize, player: Player) -> Result<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(DashboardError::SlotOutOfRange { index, len })?;
        slot.player = Some(player);
        Ok(())
    }

    /// Clear the slot at `index`. The caller is responsible for having
    /// confirmed the user's intent before calling.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(DashboardError::SlotOutOfRange { index, len })?;
        slot.player = None;
        Ok(())
    }

    /// Ordered view of (label, occupant) pairs.
    pub fn slots(&self) -> &[LineupSlot] {
        &self.slots
    }

    /// Number of filled slots.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
