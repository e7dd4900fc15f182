//! # Pathfinding
//!
//! One bounded breadth-first search, shared by hostile chase AI and player
//! auto-explore. Searches answer only with the first step to take; callers
//! re-run them every turn because obstacles and targets move.

use crate::config::{CHASE_DETECTION_RANGE, CHASE_SEARCH_RADIUS};
use crate::{Direction, Position, TerrainGrid, VisibilityState};
use log::trace;
use ::pathfinding::prelude::bfs;
use std::collections::HashSet;

/// What a search is looking for.
#[derive(Debug, Clone, Copy)]
pub enum PathGoal<'a> {
    /// A specific cell, typically the tile a target stands on.
    Position(Position),
    /// The nearest cell that has never been seen on this floor.
    Unvisited(&'a VisibilityState),
}

impl PathGoal<'_> {
    fn is_satisfied_by(&self, origin: Position, pos: Position) -> bool {
        match self {
            PathGoal::Position(goal) => pos == *goal,
            PathGoal::Unvisited(visibility) => pos != origin && !visibility.is_visited(pos),
        }
    }
}

/// A single search request.
///
/// `obstacles` holds the cells occupied by entities this turn. They block
/// transit, except that a goal cell is always accepted as the end of a path
/// even when occupied.
#[derive(Debug, Clone, Copy)]
pub struct PathQuery<'a> {
    pub origin: Position,
    pub goal: PathGoal<'a>,
    pub obstacles: &'a HashSet<Position>,
    /// Cells farther than this (Chebyshev) from the origin are never entered.
    pub max_radius: Option<u32>,
}

impl<'a> PathQuery<'a> {
    /// Returns the cells a search may move to from `pos`, cardinals first.
    fn successors(&self, grid: &TerrainGrid, pos: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .filter(|&&dir| grid.can_step_diagonal(pos, dir))
            .map(|&dir| pos.step(dir))
            .filter(|&next| grid.is_ground(next))
            .filter(|&next| {
                !self.obstacles.contains(&next) || self.goal.is_satisfied_by(self.origin, next)
            })
            .filter(|&next| {
                self.max_radius
                    .map_or(true, |radius| self.origin.chebyshev_distance(next) <= radius)
            })
            .collect()
    }
}

/// Runs `query` over `grid` and returns the first step of a shortest path.
///
/// Returns `None` when no goal cell is reachable. Every call builds its own
/// search bookkeeping, so nothing carries over between turns.
pub fn first_step(grid: &TerrainGrid, query: &PathQuery<'_>) -> Option<Direction> {
    let origin = query.origin;
    let path = bfs(
        &origin,
        |&pos| query.successors(grid, pos),
        |&pos| query.goal.is_satisfied_by(origin, pos),
    )?;
    let next = *path.get(1)?;
    Direction::from_delta(next - origin)
}

/// First step for a hostile at `origin` chasing whatever stands on `target`.
///
/// Returns `None` when the target is adjacent (the combat layer attacks
/// instead), beyond [`CHASE_DETECTION_RANGE`], or unreachable within
/// [`CHASE_SEARCH_RADIUS`].
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use undercroft::{chase_step, Direction, Position, TerrainGrid, TerrainKind};
///
/// let grid = TerrainGrid::filled(10, 10, TerrainKind::Ground);
/// let step = chase_step(Position::new(0, 0), Position::new(3, 0), &grid, &HashSet::new());
/// assert_eq!(step, Some(Direction::East));
/// ```
pub fn chase_step(
    origin: Position,
    target: Position,
    grid: &TerrainGrid,
    obstacles: &HashSet<Position>,
) -> Option<Direction> {
    let distance = origin.chebyshev_distance(target);
    if distance <= 1 || distance > CHASE_DETECTION_RANGE {
        return None;
    }

    let query = PathQuery {
        origin,
        goal: PathGoal::Position(target),
        obstacles,
        max_radius: Some(CHASE_SEARCH_RADIUS),
    };
    let step = first_step(grid, &query);
    trace!("chase {} -> {}: {:?}", origin, target, step);
    step
}

/// First step from `origin` toward the nearest never-seen cell.
///
/// The search covers the whole reachable floor. `None` means there is nothing
/// left to explore that can be reached.
pub fn explore_step(
    origin: Position,
    grid: &TerrainGrid,
    visibility: &VisibilityState,
    obstacles: &HashSet<Position>,
) -> Option<Direction> {
    let query = PathQuery {
        origin,
        goal: PathGoal::Unvisited(visibility),
        obstacles,
        max_radius: None,
    };
    let step = first_step(grid, &query);
    trace!("explore from {}: {:?}", origin, step);
    step
}
