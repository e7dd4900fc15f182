//! # Secret Rooms
//!
//! Finds a corridor wall with solid rock behind it, hides a 3x3 room in that
//! rock, and opens the wall once something tries to walk into it.

use crate::config::{SECRET_BORDER_MARGIN, SECRET_MIN_DISTANCE};
use crate::{Direction, Position, Room, TerrainGrid, TerrainKind, UndercroftResult};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A wall tile that could hide a room.
///
/// `inside` points away from the corridor the wall faces, into the rock where
/// the room would be carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretWallCandidate {
    pub wall: Position,
    pub inside: Direction,
}

impl SecretWallCandidate {
    /// Center of the hidden room: two steps in, so the 3x3 block sits
    /// directly behind the wall without including it.
    pub fn room_center(&self) -> Position {
        self.wall.step(self.inside).step(self.inside)
    }

    /// The 3x3 block that would become the room, row by row.
    pub fn room_tiles(&self) -> Vec<Position> {
        square_around(self.room_center(), 1).collect()
    }

    /// The 5x5 block around the room minus the room itself.
    pub fn ring_tiles(&self) -> Vec<Position> {
        let center = self.room_center();
        square_around(center, 2)
            .filter(|pos| pos.chebyshev_distance(center) == 2)
            .collect()
    }
}

fn square_around(center: Position, radius: i32) -> impl Iterator<Item = Position> {
    ((center.y - radius)..=(center.y + radius)).flat_map(move |y| {
        ((center.x - radius)..=(center.x + radius)).map(move |x| Position::new(x, y))
    })
}

/// Secret room bookkeeping for the current floor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRoomState {
    wall: Option<Position>,
    interior: Vec<Position>,
    effect_tile: Option<Position>,
    discovered: bool,
    reward_claimed: bool,
}

impl SecretRoomState {
    /// A floor without a secret room.
    pub fn none() -> Self {
        Self::default()
    }

    /// A carved but still hidden room behind `wall`.
    pub fn hidden(wall: Position, interior: Vec<Position>, effect_tile: Position) -> Self {
        Self {
            wall: Some(wall),
            interior,
            effect_tile: Some(effect_tile),
            discovered: false,
            reward_claimed: false,
        }
    }

    pub fn wall(&self) -> Option<Position> {
        self.wall
    }

    pub fn interior(&self) -> &[Position] {
        &self.interior
    }

    pub fn effect_tile(&self) -> Option<Position> {
        self.effect_tile
    }

    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    pub fn exists(&self) -> bool {
        self.wall.is_some()
    }

    /// Opens the hidden wall if `attempted` is exactly its tile.
    ///
    /// Returns true only on the call that opens it; the wall becomes ground
    /// and the room counts as discovered from then on.
    pub fn try_open(&mut self, grid: &mut TerrainGrid, attempted: Position) -> bool {
        if self.discovered || self.wall != Some(attempted) {
            return false;
        }
        if let Err(err) = grid.set(attempted, TerrainKind::Ground) {
            warn!("secret wall at {} could not be opened: {}", attempted, err);
            return false;
        }
        self.discovered = true;
        info!("secret passage opened at {}", attempted);
        true
    }

    /// Grants the room's reward the first time someone stands on the effect
    /// tile of an opened room.
    pub fn claim_reward(&mut self, pos: Position) -> bool {
        if !self.discovered || self.reward_claimed || self.effect_tile != Some(pos) {
            return false;
        }
        self.reward_claimed = true;
        true
    }
}

/// Locates and carves the floor's secret room.
#[derive(Debug, Clone)]
pub struct SecretPassageFinder {
    /// Minimum Manhattan distance from the wall to the start and to the stairs
    pub min_distance: u32,
    /// Outer rows/columns skipped by the scan
    pub border_margin: i32,
}

impl SecretPassageFinder {
    pub fn new() -> Self {
        Self {
            min_distance: SECRET_MIN_DISTANCE,
            border_margin: SECRET_BORDER_MARGIN,
        }
    }

    /// Every valid hidden-room site on the floor, in scan order.
    ///
    /// A site is a wall with exactly one ground cardinal neighbor, far enough
    /// from `player_start` and `stairs`, whose 3x3 room block and surrounding
    /// ring are solid, in bounds, and clear of every room in `rooms`.
    pub fn find_candidates(
        &self,
        grid: &TerrainGrid,
        rooms: &[Room],
        player_start: Position,
        stairs: Position,
    ) -> Vec<SecretWallCandidate> {
        let mut candidates = Vec::new();
        let margin = self.border_margin;
        for y in margin..(grid.height as i32 - margin) {
            for x in margin..(grid.width as i32 - margin) {
                let wall = Position::new(x, y);
                let Some(inside) = self.inside_direction(grid, wall) else {
                    continue;
                };
                if wall.manhattan_distance(player_start) < self.min_distance
                    || wall.manhattan_distance(stairs) < self.min_distance
                {
                    continue;
                }

                let candidate = SecretWallCandidate { wall, inside };
                let room_ok = candidate
                    .room_tiles()
                    .iter()
                    .all(|&pos| {
                        is_solid(grid, pos) && !rooms.iter().any(|room| room.contains(pos))
                    });
                if room_ok && candidate.ring_tiles().iter().all(|&pos| is_solid(grid, pos)) {
                    candidates.push(candidate);
                }
            }
        }

        debug!("found {} secret room sites", candidates.len());
        candidates
    }

    /// Direction into the rock behind a corridor-facing wall, if `wall` is one.
    fn inside_direction(&self, grid: &TerrainGrid, wall: Position) -> Option<Direction> {
        if grid.get(wall) != Some(TerrainKind::Wall) {
            return None;
        }
        let mut open = Direction::CARDINAL
            .into_iter()
            .filter(|&dir| grid.is_ground(wall.step(dir)));
        let corridor = open.next()?;
        if open.next().is_some() {
            return None;
        }
        Some(corridor.opposite())
    }

    /// Converts the candidate's 3x3 block to ground and returns its tiles.
    pub fn carve(
        &self,
        grid: &mut TerrainGrid,
        candidate: &SecretWallCandidate,
    ) -> UndercroftResult<Vec<Position>> {
        let tiles = candidate.room_tiles();
        for &pos in &tiles {
            grid.set(pos, TerrainKind::Ground)?;
        }
        Ok(tiles)
    }

    /// Runs the whole pass once: scan, pick a site uniformly at random, carve.
    ///
    /// A floor with no valid site gets [`SecretRoomState::none`].
    pub fn install<R: Rng + ?Sized>(
        &self,
        grid: &mut TerrainGrid,
        rooms: &[Room],
        player_start: Position,
        stairs: Position,
        rng: &mut R,
    ) -> UndercroftResult<SecretRoomState> {
        let candidates = self.find_candidates(grid, rooms, player_start, stairs);
        let Some(chosen) = candidates.choose(rng).copied() else {
            return Ok(SecretRoomState::none());
        };

        let interior = self.carve(grid, &chosen)?;
        let effect_tile = chosen.room_center();
        debug!(
            "secret room behind {} facing {:?}, reward at {}",
            chosen.wall, chosen.inside, effect_tile
        );
        Ok(SecretRoomState::hidden(chosen.wall, interior, effect_tile))
    }
}

impl Default for SecretPassageFinder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_solid(grid: &TerrainGrid, pos: Position) -> bool {
    grid.get(pos) == Some(TerrainKind::Wall)
}
