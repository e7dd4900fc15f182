//! # Autoexplore Module
//!
//! Walks the player toward the nearest unseen tile, one step per turn, until
//! something interesting happens.

use crate::{Direction, FloorContext, Position, UndercroftError, UndercroftResult};
use log::info;
use std::collections::HashSet;
use std::fmt;

/// Why autoexplore handed control back to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A hostile is in the current field of view.
    HostileInSight,
    /// Every ground tile on the floor has been seen.
    FullyExplored,
    /// Unseen ground remains but no path leads to it.
    Unreachable,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            StopReason::HostileInSight => "You see a hostile nearby.",
            StopReason::FullyExplored => "Explored this floor.",
            StopReason::Unreachable => "Nowhere left to explore from here.",
        };
        write!(f, "{}", message)
    }
}

/// Autoexplore state for the player.
#[derive(Debug, Clone, Default)]
pub struct AutoexploreState {
    /// Whether autoexplore is currently enabled
    pub enabled: bool,
    /// Why the last run ended, if it has
    pub last_stop: Option<StopReason>,
}

impl AutoexploreState {
    /// Creates a new, disabled autoexplore state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles autoexplore on/off.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            self.last_stop = None;
        }
        self.enabled
    }

    /// Gets the next step for the player, or `None` when disabled or stopped.
    ///
    /// Stopping disables autoexplore and records the reason in `last_stop`.
    pub fn next_step(
        &mut self,
        floor: &FloorContext,
        player: Position,
        hostiles: &[Position],
    ) -> UndercroftResult<Option<Direction>> {
        if !self.enabled {
            return Ok(None);
        }
        if !floor.grid().is_ground(player) {
            return Err(UndercroftError::InvalidState(format!(
                "player at {player} is not on ground"
            )));
        }

        let visibility = floor.visibility();
        if hostiles.iter().any(|&pos| visibility.is_visible(pos)) {
            return Ok(self.stop(StopReason::HostileInSight));
        }
        if visibility.is_fully_explored(floor.grid()) {
            return Ok(self.stop(StopReason::FullyExplored));
        }

        let obstacles: HashSet<Position> = hostiles.iter().copied().collect();
        match floor.explore_step(player, &obstacles) {
            Some(direction) => Ok(Some(direction)),
            None => Ok(self.stop(StopReason::Unreachable)),
        }
    }

    fn stop(&mut self, reason: StopReason) -> Option<Direction> {
        info!("autoexplore stopped: {}", reason);
        self.enabled = false;
        self.last_stop = Some(reason);
        None
    }
}
