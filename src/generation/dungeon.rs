//! # Dungeon Generation
//!
//! Room-and-corridor layout generation.
//!
//! This stands in for the external maze generator: it yields a wall/ground
//! grid, the rooms it carved, the player start and the stairs.

use crate::generation::utils;
use crate::{
    GeneratedFloor, GenerationConfig, Generator, Position, Room, TerrainGrid, TerrainKind,
    UndercroftError, UndercroftResult,
};
use log::debug;
use rand::{rngs::StdRng, Rng};
use std::collections::{HashSet, VecDeque};

/// Primary floor generator using a room-and-corridor algorithm.
///
/// This generator creates floors by:
/// 1. Placing rooms randomly with collision detection
/// 2. Connecting consecutive rooms with L-shaped corridors
/// 3. Putting the player start in the first room and stairs in the last
/// 4. Verifying every room is reachable
#[derive(Debug, Clone)]
pub struct RoomCorridorGenerator {
    /// Maximum attempts to place a room before giving up
    pub max_placement_attempts: u32,
    /// Whether to ensure all rooms are connected
    pub ensure_connectivity: bool,
}

impl RoomCorridorGenerator {
    /// Creates a new floor generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{GenerationConfig, Generator, RoomCorridorGenerator};
    /// use undercroft::generation::utils::create_rng;
    ///
    /// let config = GenerationConfig::for_testing(3);
    /// let floor = RoomCorridorGenerator::new()
    ///     .generate(&config, &mut create_rng(&config))
    ///     .unwrap();
    /// assert!(!floor.rooms.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            max_placement_attempts: 100,
            ensure_connectivity: true,
        }
    }

    /// Places rooms and carves their floors.
    fn place_rooms(
        &self,
        grid: &mut TerrainGrid,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> UndercroftResult<Vec<Room>> {
        let mut rooms = Vec::new();
        let room_count = rng.gen_range(config.min_rooms..=config.max_rooms);

        for room_id in 0..room_count {
            if let Some(room) = self.try_place_room(grid, config, rng, room_id, &rooms) {
                self.carve_room(grid, &room)?;
                rooms.push(room);
            }
        }

        if rooms.is_empty() {
            return Err(UndercroftError::GenerationFailed(
                "Failed to place any rooms".to_string(),
            ));
        }

        Ok(rooms)
    }

    /// Attempts to place a single room.
    fn try_place_room(
        &self,
        grid: &TerrainGrid,
        config: &GenerationConfig,
        rng: &mut StdRng,
        room_id: u32,
        existing_rooms: &[Room],
    ) -> Option<Room> {
        for _ in 0..self.max_placement_attempts {
            let width = rng.gen_range(config.min_room_size..=config.max_room_size);
            let height = rng.gen_range(config.min_room_size..=config.max_room_size);
            let x = rng.gen_range(1..(grid.width - width)) as i32;
            let y = rng.gen_range(1..(grid.height - height)) as i32;
            let room = Room::new(room_id, Position::new(x, y), width, height);

            if !self.room_fits_in_grid(grid, &room) {
                continue;
            }

            // Keep at least one wall tile between rooms
            if existing_rooms
                .iter()
                .any(|existing| room.overlaps_with_margin(existing, 2))
            {
                continue;
            }

            return Some(room);
        }

        None
    }

    /// Checks that the room's surrounding wall ring lies inside the grid.
    fn room_fits_in_grid(&self, grid: &TerrainGrid, room: &Room) -> bool {
        room.wall_positions()
            .into_iter()
            .all(|pos| grid.is_valid_position(pos))
    }

    /// Carves out a room by setting its tiles to ground.
    fn carve_room(&self, grid: &mut TerrainGrid, room: &Room) -> UndercroftResult<()> {
        for pos in room.floor_positions() {
            grid.set(pos, TerrainKind::Ground)?;
        }
        Ok(())
    }

    /// Connects rooms using L-shaped corridors.
    fn connect_rooms(
        &self,
        grid: &mut TerrainGrid,
        rooms: &mut [Room],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> UndercroftResult<()> {
        if rooms.len() < 2 {
            return Ok(());
        }

        // Connect each room to the next one
        for i in 0..(rooms.len() - 1) {
            let (a, b) = (rooms[i].center(), rooms[i + 1].center());
            self.carve_l_corridor(grid, a, b, rng.gen_bool(0.5))?;

            let (id_a, id_b) = (rooms[i].id, rooms[i + 1].id);
            rooms[i].add_connection(id_b);
            rooms[i + 1].add_connection(id_a);
        }

        // Add some extra connections for variety
        let extra_connections = (rooms.len() as f64 * config.extra_connection_chance) as usize;
        for _ in 0..extra_connections {
            let i = rng.gen_range(0..rooms.len());
            let j = rng.gen_range(0..rooms.len());
            if i == j {
                continue;
            }
            let (a, b) = (rooms[i].center(), rooms[j].center());
            self.carve_l_corridor(grid, a, b, rng.gen_bool(0.5))?;

            let (id_i, id_j) = (rooms[i].id, rooms[j].id);
            rooms[i].add_connection(id_j);
            rooms[j].add_connection(id_i);
        }

        Ok(())
    }

    /// Carves an L-shaped corridor between two points.
    fn carve_l_corridor(
        &self,
        grid: &mut TerrainGrid,
        start: Position,
        end: Position,
        horizontal_first: bool,
    ) -> UndercroftResult<()> {
        let corner = if horizontal_first {
            Position::new(end.x, start.y)
        } else {
            Position::new(start.x, end.y)
        };

        for (from, to) in [(start, corner), (corner, end)] {
            let (min_x, max_x) = (from.x.min(to.x), from.x.max(to.x));
            let (min_y, max_y) = (from.y.min(to.y), from.y.max(to.y));
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    let pos = Position::new(x, y);
                    if grid.is_valid_position(pos) {
                        grid.set(pos, TerrainKind::Ground)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Picks the player start in the first room and stairs in the last one.
    fn place_start_and_stairs(&self, rooms: &[Room], rng: &mut StdRng) -> (Position, Position) {
        let player_start = rooms[0].center();
        let last = &rooms[rooms.len() - 1];
        let candidates: Vec<Position> = last
            .floor_positions()
            .into_iter()
            .filter(|&pos| pos != player_start)
            .collect();
        let stairs = if candidates.is_empty() {
            player_start
        } else {
            candidates[rng.gen_range(0..candidates.len())]
        };
        (player_start, stairs)
    }

    /// Validates that all rooms are reachable from each other.
    fn validate_connectivity(&self, grid: &TerrainGrid, rooms: &[Room]) -> UndercroftResult<()> {
        if !self.ensure_connectivity || rooms.is_empty() {
            return Ok(());
        }

        // Flood fill from the first room's center
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let start_pos = rooms[0].center();
        queue.push_back(start_pos);
        visited.insert(start_pos);

        while let Some(pos) = queue.pop_front() {
            for adjacent_pos in pos.cardinal_adjacent_positions() {
                if grid.is_ground(adjacent_pos) && visited.insert(adjacent_pos) {
                    queue.push_back(adjacent_pos);
                }
            }
        }

        for room in rooms {
            if !visited.contains(&room.center()) {
                return Err(UndercroftError::GenerationFailed(format!(
                    "Room {} is not connected to other rooms",
                    room.id
                )));
            }
        }

        Ok(())
    }
}

impl Generator<GeneratedFloor> for RoomCorridorGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> UndercroftResult<GeneratedFloor> {
        config.check()?;

        // Start from solid rock
        let mut grid = TerrainGrid::new(config.width, config.height);

        let mut rooms = self.place_rooms(&mut grid, config, rng)?;
        self.connect_rooms(&mut grid, &mut rooms, config, rng)?;
        self.validate_connectivity(&grid, &rooms)?;

        let (player_start, stairs) = self.place_start_and_stairs(&rooms, rng);
        debug!(
            "{} carved {} rooms on a {}x{} floor",
            self.generator_type(),
            rooms.len(),
            config.width,
            config.height
        );

        let floor = GeneratedFloor {
            grid,
            rooms,
            player_start,
            stairs,
        };
        self.validate(&floor, config)?;
        Ok(floor)
    }

    fn validate(&self, floor: &GeneratedFloor, config: &GenerationConfig) -> UndercroftResult<()> {
        utils::validate_grid(&floor.grid)?;
        if floor.grid.width != config.width || floor.grid.height != config.height {
            return Err(UndercroftError::GenerationFailed(format!(
                "expected a {}x{} grid, got {}x{}",
                config.width, config.height, floor.grid.width, floor.grid.height
            )));
        }
        if !floor.grid.is_ground(floor.player_start) || !floor.grid.is_ground(floor.stairs) {
            return Err(UndercroftError::GenerationFailed(
                "Player start or stairs is not on ground".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_corridor_generator_creation() {
        let generator = RoomCorridorGenerator::new();
        assert!(generator.ensure_connectivity);
        assert_eq!(generator.generator_type(), "RoomCorridorGenerator");
    }

    #[test]
    fn test_room_fits_in_grid() {
        let generator = RoomCorridorGenerator::new();
        let grid = TerrainGrid::new(50, 40);

        let good_room = Room::new(1, Position::new(5, 5), 10, 8);
        let bad_room = Room::new(2, Position::new(45, 35), 10, 8);

        assert!(generator.room_fits_in_grid(&grid, &good_room));
        assert!(!generator.room_fits_in_grid(&grid, &bad_room));

        // The wall ring may sit on the grid edge, the floor may not
        let flush = Room::new(3, Position::new(1, 1), 48, 38);
        assert_eq!(flush.bottom_right(), Position::new(48, 38));
        assert!(generator.room_fits_in_grid(&grid, &flush));
        assert!(!generator.room_fits_in_grid(&grid, &Room::new(4, Position::new(0, 3), 4, 4)));
    }

    #[test]
    fn test_generation_produces_connected_floor() {
        let generator = RoomCorridorGenerator::new();
        for seed in 0..20 {
            let config = GenerationConfig::for_testing(seed);
            let mut rng = utils::create_rng(&config);

            let floor = generator.generate(&config, &mut rng).unwrap();
            assert_eq!(floor.grid.width, config.width);
            assert_eq!(floor.grid.height, config.height);
            assert!(floor.grid.is_ground(floor.player_start));
            assert!(floor.grid.is_ground(floor.stairs));
            assert!(generator.validate_connectivity(&floor.grid, &floor.rooms).is_ok());

            // Outer ring stays solid
            for x in 0..config.width as i32 {
                assert!(!floor.grid.is_ground(Position::new(x, 0)));
                assert!(!floor.grid.is_ground(Position::new(x, config.height as i32 - 1)));
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(777);
        let a = generator.generate(&config, &mut utils::create_rng(&config)).unwrap();
        let b = generator.generate(&config, &mut utils::create_rng(&config)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_l_corridor_carving() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = TerrainGrid::new(20, 20);

        let start = Position::new(5, 5);
        let end = Position::new(15, 15);

        generator.carve_l_corridor(&mut grid, start, end, true).unwrap();

        assert!(grid.is_ground(start));
        assert!(grid.is_ground(end));
        assert!(grid.is_ground(Position::new(15, 5)));
        assert!(!grid.is_ground(Position::new(5, 15)));
    }

    #[test]
    fn test_disconnected_rooms_are_rejected() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = TerrainGrid::new(20, 10);
        let rooms = vec![
            Room::new(0, Position::new(1, 1), 3, 3),
            Room::new(1, Position::new(10, 1), 3, 3),
        ];
        for room in &rooms {
            generator.carve_room(&mut grid, room).unwrap();
        }
        assert!(matches!(
            generator.validate_connectivity(&grid, &rooms),
            Err(UndercroftError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::for_testing(1);
        config.min_rooms = 0;
        assert!(generator.generate(&config, &mut utils::create_rng(&config)).is_err());
    }
}
