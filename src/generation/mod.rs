//! # Generation Module
//!
//! Floor layout generation and the one-time secret room pass.
//!
//! The room/corridor layout normally comes from an external maze generator
//! that hands over a wall/ground grid plus the list of rooms it carved.
//! [`RoomCorridorGenerator`] fills that role here so a floor can be built end
//! to end; [`SecretPassageFinder`] then runs once on its output.

pub mod dungeon;
pub mod secret;

pub use dungeon::*;
pub use secret::*;

use crate::config;
use crate::game::{Position, TerrainGrid};
use crate::{UndercroftError, UndercroftResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for floor generation.
///
/// Loadable from JSON so a run can be reproduced from a saved config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Floor width in tiles
    pub width: u32,
    /// Floor height in tiles
    pub height: u32,
    /// Minimum room side length (floor tiles)
    pub min_room_size: u32,
    /// Maximum room side length (floor tiles)
    pub max_room_size: u32,
    /// Minimum number of rooms per floor
    pub min_rooms: u32,
    /// Maximum number of rooms per floor
    pub max_rooms: u32,
    /// Probability of extra connections between rooms (0.0 to 1.0)
    pub extra_connection_chance: f64,
    /// Probability that a floor gets a secret room, if a site exists (0.0 to 1.0)
    pub secret_room_chance: f64,
    /// Player sight radius before external modifiers
    pub sight_radius: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_FLOOR_WIDTH,
            height: config::DEFAULT_FLOOR_HEIGHT,
            min_room_size: 3,
            max_room_size: 8,
            min_rooms: 5,
            max_rooms: 9,
            extra_connection_chance: 0.15,
            secret_room_chance: 1.0,
            sight_radius: config::DEFAULT_SIGHT_RADIUS,
        }
    }

    /// Creates a configuration for testing with smaller, simpler floors.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 40,
            height: 24,
            min_room_size: 3,
            max_room_size: 5,
            min_rooms: 3,
            max_rooms: 5,
            extra_connection_chance: 0.0,
            secret_room_chance: 1.0,
            sight_radius: config::DEFAULT_SIGHT_RADIUS,
        }
    }

    /// Creates a configuration for large, busy floors.
    pub fn for_detailed_generation(seed: u64) -> Self {
        Self {
            seed,
            width: 90,
            height: 45,
            min_room_size: 4,
            max_room_size: 12,
            min_rooms: 10,
            max_rooms: 18,
            extra_connection_chance: 0.25,
            secret_room_chance: 1.0,
            sight_radius: config::DEFAULT_SIGHT_RADIUS + 1,
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> UndercroftResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.check()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty JSON.
    pub fn to_json_string(&self) -> UndercroftResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects configurations no generator could satisfy.
    pub fn check(&self) -> UndercroftResult<()> {
        if self.min_room_size == 0 || self.min_room_size > self.max_room_size {
            return Err(UndercroftError::InvalidState(format!(
                "room size range {}..={} is empty",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.min_rooms == 0 || self.min_rooms > self.max_rooms {
            return Err(UndercroftError::InvalidState(format!(
                "room count range {}..={} is empty",
                self.min_rooms, self.max_rooms
            )));
        }
        if self.width < self.max_room_size + 4 || self.height < self.max_room_size + 4 {
            return Err(UndercroftError::InvalidState(format!(
                "{}x{} floor cannot hold a {} tile room",
                self.width, self.height, self.max_room_size
            )));
        }
        for (name, chance) in [
            ("extra_connection_chance", self.extra_connection_chance),
            ("secret_room_chance", self.secret_room_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(UndercroftError::InvalidState(format!(
                    "{name} must be within 0..=1, got {chance}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room: the block of floor tiles a generator carved.
///
/// `top_left`, `width` and `height` describe the floor area only; the walls
/// around it are not part of the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier for this room
    pub id: u32,
    /// Top-left floor tile of the room
    pub top_left: Position,
    /// Width of the room in floor tiles
    pub width: u32,
    /// Height of the room in floor tiles
    pub height: u32,
    /// Rooms joined to this one by a corridor
    pub connections: Vec<u32>,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
            connections: Vec::new(),
        }
    }

    /// Gets the bottom-right floor tile of the room.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Gets the area of the room in tiles.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Checks if a position is inside this room.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert!(room.contains(Position::new(7, 7)));
    /// assert!(!room.contains(Position::new(20, 20)));
    /// ```
    pub fn contains(&self, pos: Position) -> bool {
        let bottom_right = self.bottom_right();
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x <= bottom_right.x
            && pos.y <= bottom_right.y
    }

    /// Checks if this room comes within `margin` tiles of another room.
    pub fn overlaps_with_margin(&self, other: &Room, margin: i32) -> bool {
        !(self.top_left.x >= other.top_left.x + other.width as i32 + margin
            || other.top_left.x >= self.top_left.x + self.width as i32 + margin
            || self.top_left.y >= other.top_left.y + other.height as i32 + margin
            || other.top_left.y >= self.top_left.y + self.height as i32 + margin)
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.area() as usize);

        for y in self.top_left.y..(self.top_left.y + self.height as i32) {
            for x in self.top_left.x..(self.top_left.x + self.width as i32) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Gets the ring of tiles directly surrounding the room.
    pub fn wall_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        let left = self.top_left.x - 1;
        let right = self.top_left.x + self.width as i32;
        let top = self.top_left.y - 1;
        let bottom = self.top_left.y + self.height as i32;

        // Top and bottom walls
        for x in left..=right {
            positions.push(Position::new(x, top));
            positions.push(Position::new(x, bottom));
        }

        // Left and right walls (excluding corners already added)
        for y in (top + 1)..bottom {
            positions.push(Position::new(left, y));
            positions.push(Position::new(right, y));
        }

        positions
    }

    /// Adds a connection to another room.
    pub fn add_connection(&mut self, room_id: u32) {
        if !self.connections.contains(&room_id) {
            self.connections.push(room_id);
        }
    }
}

/// Everything an external layout generator hands to the floor setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFloor {
    pub grid: TerrainGrid,
    pub rooms: Vec<Room>,
    pub player_start: Position,
    pub stairs: Position,
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> UndercroftResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> UndercroftResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates that a grid has somewhere to stand.
    pub fn validate_grid(grid: &TerrainGrid) -> UndercroftResult<()> {
        if grid.ground_positions().next().is_none() {
            return Err(UndercroftError::GenerationFailed(
                "Floor has no ground tiles".to_string(),
            ));
        }
        Ok(())
    }
}
