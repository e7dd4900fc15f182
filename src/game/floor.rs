//! # Floor Context
//!
//! Everything that lives exactly as long as one floor: terrain, fog of war
//! and the secret room. Built when a floor is generated, dropped on the way
//! down the stairs. Nothing in here survives a floor transition.

use crate::config::ALLY_VISION_RADIUS;
use crate::generation::utils::create_rng;
use crate::{
    chase_step, explore_step, rendering, Direction, GeneratedFloor, GenerationConfig, Generator,
    Position, Room, RoomCorridorGenerator, SecretPassageFinder, SecretRoomState, TerrainGrid,
    UndercroftError, UndercroftResult, VisibilityState,
};
use log::debug;
use rand::Rng;
use std::collections::HashSet;

/// Result of an entity trying to move one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The entity now stands on this tile.
    Moved(Position),
    /// The step hit the hidden wall, which is now open ground. The entity
    /// stays where it was this turn.
    OpenedSecret(Position),
    /// Wall, corner cut, or another entity in the way.
    Blocked,
}

/// Per-floor state passed explicitly to every turn-level query.
#[derive(Debug, Clone)]
pub struct FloorContext {
    grid: TerrainGrid,
    visibility: VisibilityState,
    rooms: Vec<Room>,
    player_start: Position,
    stairs: Position,
    secret: SecretRoomState,
}

impl FloorContext {
    /// Sets up a floor from a generator's output.
    ///
    /// Runs the secret room pass once, with probability
    /// `config.secret_room_chance`, and starts with everything unseen.
    pub fn new<R: Rng + ?Sized>(
        generated: GeneratedFloor,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> UndercroftResult<Self> {
        let GeneratedFloor {
            mut grid,
            rooms,
            player_start,
            stairs,
        } = generated;

        for (name, pos) in [("player start", player_start), ("stairs", stairs)] {
            if !grid.is_ground(pos) {
                return Err(UndercroftError::InvalidState(format!(
                    "{name} at {pos} is not on ground"
                )));
            }
        }

        let secret = if rng.gen_bool(config.secret_room_chance.clamp(0.0, 1.0)) {
            SecretPassageFinder::new().install(&mut grid, &rooms, player_start, stairs, rng)?
        } else {
            debug!("floor rolled no secret room");
            SecretRoomState::none()
        };

        Ok(Self {
            visibility: VisibilityState::for_grid(&grid),
            grid,
            rooms,
            player_start,
            stairs,
            secret,
        })
    }

    /// Generates a fresh floor from `config` using the built-in generator.
    pub fn generate(config: &GenerationConfig) -> UndercroftResult<Self> {
        let mut rng = create_rng(config);
        let generated = RoomCorridorGenerator::new().generate(config, &mut rng)?;
        Self::new(generated, config, &mut rng)
    }

    /// Wraps an existing grid with no rooms and no secret room.
    pub fn from_grid(grid: TerrainGrid, player_start: Position, stairs: Position) -> Self {
        Self {
            visibility: VisibilityState::for_grid(&grid),
            grid,
            rooms: Vec::new(),
            player_start,
            stairs,
            secret: SecretRoomState::none(),
        }
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn player_start(&self) -> Position {
        self.player_start
    }

    pub fn stairs(&self) -> Position {
        self.stairs
    }

    pub fn secret(&self) -> &SecretRoomState {
        &self.secret
    }

    /// Rebuilds the current view around the player, then lets each ally add
    /// its own small disk of sight.
    pub fn reveal_visibility(&mut self, center: Position, radius: u32, allies: &[Position]) {
        self.visibility.reveal_area(center, radius);
        for &ally in allies {
            self.visibility.reveal_additional(ally, ALLY_VISION_RADIUS);
        }
    }

    /// First step for a hostile at `origin` hunting the entity at `target`.
    pub fn chase_step(
        &self,
        origin: Position,
        target: Position,
        obstacles: &HashSet<Position>,
    ) -> Option<Direction> {
        chase_step(origin, target, &self.grid, obstacles)
    }

    /// First step from `origin` toward the nearest unseen tile.
    pub fn explore_step(
        &self,
        origin: Position,
        obstacles: &HashSet<Position>,
    ) -> Option<Direction> {
        explore_step(origin, &self.grid, &self.visibility, obstacles)
    }

    /// Opens the secret wall if `attempted` is its tile.
    pub fn try_open_secret_passage(&mut self, attempted: Position) -> bool {
        self.secret.try_open(&mut self.grid, attempted)
    }

    /// Resolves one movement intent from `from` in `direction`.
    ///
    /// `obstacles` are the tiles other entities occupy this turn.
    pub fn attempt_step(
        &mut self,
        from: Position,
        direction: Direction,
        obstacles: &HashSet<Position>,
    ) -> StepOutcome {
        let target = from.step(direction);
        if self.try_open_secret_passage(target) {
            return StepOutcome::OpenedSecret(target);
        }
        if self.grid.can_step(from, direction) && !obstacles.contains(&target) {
            StepOutcome::Moved(target)
        } else {
            StepOutcome::Blocked
        }
    }

    /// Whether standing on `pos` earns the secret room's reward. True once.
    pub fn claim_secret_reward(&mut self, pos: Position) -> bool {
        self.secret.claim_reward(pos)
    }

    /// Ground tiles at least `min_distance` (Chebyshev) from `away_from`
    /// where an entity can be placed. The hidden room's interior is left out
    /// until its wall has been opened.
    pub fn spawn_sites(&self, away_from: Position, min_distance: u32) -> Vec<Position> {
        let sealed: &[Position] = if self.secret.is_discovered() {
            &[]
        } else {
            self.secret.interior()
        };
        self.grid
            .ground_positions()
            .filter(|pos| pos.chebyshev_distance(away_from) >= min_distance)
            .filter(|pos| !sealed.contains(pos))
            .collect()
    }

    /// Sprite index for the cell at `(x, y)`.
    pub fn tile_index_for(&self, x: i32, y: i32) -> usize {
        rendering::tile_index_for(&self.grid, x, y)
    }
}
