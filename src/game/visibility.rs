//! # Fog of War
//!
//! Two-tier tile memory for one floor: `visited` remembers everything ever
//! seen, `currently_visible` holds only what is in sight this turn.

use crate::{Position, TerrainGrid};
use serde::{Deserialize, Serialize};

/// Per-floor visibility arrays, stored row-major.
///
/// `visited` is monotonic for the lifetime of the floor. `currently_visible`
/// is rebuilt from scratch by every [`VisibilityState::reveal_area`] call.
///
/// # Examples
///
/// ```
/// use undercroft::{Position, VisibilityState};
///
/// let mut vis = VisibilityState::new(10, 10);
/// vis.reveal_area(Position::new(5, 5), 2);
/// assert!(vis.is_visible(Position::new(7, 3)));
///
/// vis.reveal_area(Position::new(0, 0), 1);
/// assert!(!vis.is_visible(Position::new(7, 3)));
/// assert!(vis.is_visited(Position::new(7, 3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    width: u32,
    height: u32,
    visited: Vec<bool>,
    currently_visible: Vec<bool>,
}

impl VisibilityState {
    /// Creates an all-dark state for a floor of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            visited: vec![false; len],
            currently_visible: vec![false; len],
        }
    }

    /// Creates a state sized to match `grid`.
    pub fn for_grid(grid: &TerrainGrid) -> Self {
        Self::new(grid.width, grid.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Forgets everything; used when a floor starts.
    pub fn reset(&mut self) {
        self.visited.fill(false);
        self.currently_visible.fill(false);
    }

    /// Replaces the current view with a Chebyshev disk around `center`.
    ///
    /// Every in-bounds cell within `radius` becomes visible and visited;
    /// everything else stops being visible. A radius below 1 is treated as 1.
    pub fn reveal_area(&mut self, center: Position, radius: u32) {
        self.currently_visible.fill(false);
        self.reveal_additional(center, radius);
    }

    /// Adds a Chebyshev disk around `center` to the current view without
    /// clearing it first. Allies use this to extend the player's sight.
    pub fn reveal_additional(&mut self, center: Position, radius: u32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let radius = radius.clamp(1, i32::MAX as u32) as i32;
        let x_lo = center.x.saturating_sub(radius).max(0);
        let x_hi = center.x.saturating_add(radius).min(self.width as i32 - 1);
        let y_lo = center.y.saturating_sub(radius).max(0);
        let y_hi = center.y.saturating_add(radius).min(self.height as i32 - 1);

        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                if let Some(idx) = self.index(Position::new(x, y)) {
                    self.currently_visible[idx] = true;
                    self.visited[idx] = true;
                }
            }
        }
    }

    /// Whether the cell has ever been seen on this floor.
    pub fn is_visited(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.visited[idx])
    }

    /// Whether the cell is in sight this turn.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.currently_visible[idx])
    }

    /// Marks a cell as seen without putting it in view (map scrolls, reveals).
    pub fn mark_visited(&mut self, pos: Position) {
        if let Some(idx) = self.index(pos) {
            self.visited[idx] = true;
        }
    }

    /// Row `y` of the `visited` array, for minimap drawing.
    pub fn visited_row(&self, y: u32) -> Option<&[bool]> {
        self.row(&self.visited, y)
    }

    /// Row `y` of the `currently_visible` array, for fog drawing.
    pub fn visible_row(&self, y: u32) -> Option<&[bool]> {
        self.row(&self.currently_visible, y)
    }

    /// Number of cells ever seen.
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&seen| seen).count()
    }

    /// Share of the grid's passable cells that have been seen, in `0.0..=1.0`.
    pub fn explored_ground_fraction(&self, grid: &TerrainGrid) -> f64 {
        let (seen, total) = grid
            .ground_positions()
            .fold((0usize, 0usize), |(seen, total), pos| {
                (seen + usize::from(self.is_visited(pos)), total + 1)
            });
        if total == 0 {
            return 1.0;
        }
        seen as f64 / total as f64
    }

    /// Whether every passable cell of `grid` has been seen.
    pub fn is_fully_explored(&self, grid: &TerrainGrid) -> bool {
        grid.ground_positions().all(|pos| self.is_visited(pos))
    }

    fn row<'a>(&self, cells: &'a [bool], y: u32) -> Option<&'a [bool]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&cells[start..start + self.width as usize])
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width || pos.y as u32 >= self.height {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }
}
