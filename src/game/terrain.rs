//! # Terrain Grid
//!
//! Classified floor cells and the movement-legality predicates every other
//! system builds on.

use crate::{Direction, Position, UndercroftError, UndercroftResult};
use serde::{Deserialize, Serialize};

/// Classification of a single floor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Solid rock; blocks movement.
    Wall,
    /// Open floor.
    Ground,
    /// Any other walkable terrain (water, rubble, decorated floor).
    Other,
}

impl TerrainKind {
    /// Whether entities may stand on this terrain.
    pub fn is_passable(self) -> bool {
        !matches!(self, TerrainKind::Wall)
    }

    /// Block index of this terrain inside the autotile sheet.
    pub fn tileset_group(self) -> usize {
        match self {
            TerrainKind::Wall => 0,
            TerrainKind::Ground => 1,
            TerrainKind::Other => 2,
        }
    }

    /// ASCII glyph used by [`TerrainGrid::from_rows`] and the text renderer.
    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Wall => '#',
            TerrainKind::Ground => '.',
            TerrainKind::Other => '~',
        }
    }

    /// Parses a glyph produced by [`TerrainKind::glyph`].
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(TerrainKind::Wall),
            '.' => Some(TerrainKind::Ground),
            '~' => Some(TerrainKind::Other),
            _ => None,
        }
    }
}

/// Rectangular grid of classified cells, indexed `cells[y][x]`.
///
/// Reads outside the grid never fail: they report [`TerrainKind::Wall`], so
/// the map edge behaves like solid rock.
///
/// # Examples
///
/// ```
/// use undercroft::{Direction, Position, TerrainGrid};
///
/// let grid = TerrainGrid::from_rows(&[
///     "...",
///     ".#.",
///     "...",
/// ]).unwrap();
/// assert!(grid.is_ground(Position::new(0, 0)));
/// assert!(!grid.is_ground(Position::new(1, 1)));
/// assert!(!grid.is_ground(Position::new(-1, 0)));
/// // (0,1) -> (1,0) would clip the pillar's corner
/// assert!(!grid.can_step_diagonal(Position::new(0, 1), Direction::Northeast));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    pub width: u32,
    pub height: u32,
    cells: Vec<Vec<TerrainKind>>,
}

impl TerrainGrid {
    /// Creates a grid filled entirely with walls.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TerrainKind::Wall)
    }

    /// Creates a grid filled with a single terrain kind.
    pub fn filled(width: u32, height: u32, kind: TerrainKind) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![kind; width as usize]; height as usize],
        }
    }

    /// Builds a grid from ASCII rows (`#` wall, `.` ground, `~` other).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> UndercroftResult<Self> {
        let Some(first) = rows.first() else {
            return Err(UndercroftError::InvalidGrid("no rows".to_string()));
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(UndercroftError::InvalidGrid("empty first row".to_string()));
        }

        let mut cells = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let parsed = row
                .chars()
                .enumerate()
                .map(|(x, glyph)| {
                    TerrainKind::from_glyph(glyph).ok_or_else(|| {
                        UndercroftError::InvalidGrid(format!(
                            "unknown glyph {glyph:?} at ({x}, {y})"
                        ))
                    })
                })
                .collect::<UndercroftResult<Vec<_>>>()?;
            if parsed.len() != width {
                return Err(UndercroftError::InvalidGrid(format!(
                    "row {y} has {} cells, expected {width}",
                    parsed.len()
                )));
            }
            cells.push(parsed);
        }

        Ok(Self {
            width: width as u32,
            height: cells.len() as u32,
            cells,
        })
    }

    /// Checks whether a position lies inside the grid.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Returns the terrain at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: Position) -> Option<TerrainKind> {
        if !self.is_valid_position(pos) {
            return None;
        }
        Some(self.cells[pos.y as usize][pos.x as usize])
    }

    /// Returns the terrain at `pos`, treating anything outside as wall.
    pub fn terrain_at(&self, pos: Position) -> TerrainKind {
        self.get(pos).unwrap_or(TerrainKind::Wall)
    }

    /// Overwrites a single cell.
    pub fn set(&mut self, pos: Position, kind: TerrainKind) -> UndercroftResult<()> {
        if !self.is_valid_position(pos) {
            return Err(UndercroftError::OutOfBounds(pos));
        }
        self.cells[pos.y as usize][pos.x as usize] = kind;
        Ok(())
    }

    /// Whether `pos` is inside the grid and not a wall.
    pub fn is_ground(&self, pos: Position) -> bool {
        self.terrain_at(pos).is_passable()
    }

    /// Whether a move from `from` in `direction` avoids cutting a wall corner.
    ///
    /// A diagonal move is legal only if both cells reached by its two
    /// cardinal components are ground, even when the destination is open.
    /// Cardinal moves have no corner to cut and always pass this check.
    pub fn can_step_diagonal(&self, from: Position, direction: Direction) -> bool {
        if !direction.is_diagonal() {
            return true;
        }
        let delta = direction.to_delta();
        self.is_ground(Position::new(from.x + delta.x, from.y))
            && self.is_ground(Position::new(from.x, from.y + delta.y))
    }

    /// Full terrain legality of a single step: open destination, no corner cut.
    pub fn can_step(&self, from: Position, direction: Direction) -> bool {
        self.is_ground(from.step(direction)) && self.can_step_diagonal(from, direction)
    }

    /// Iterates over every passable cell, row by row.
    pub fn ground_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, kind)| kind.is_passable())
                .map(move |(x, _)| Position::new(x as i32, y as i32))
        })
    }

    /// Counts the cells of the given kind.
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == kind)
            .count()
    }

    /// Renders the grid back into ASCII rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|kind| kind.glyph()).collect())
            .collect()
    }
}
