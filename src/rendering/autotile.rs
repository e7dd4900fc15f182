//! # Autotiling
//!
//! Picks the edged sprite for a cell from which of its eight neighbors share
//! its terrain. The sheet holds one 6x8 block per terrain kind, laid side by
//! side, and every block uses the same mask layout.

use crate::config::{TILESET_BLOCK_COLUMNS, TILESET_COLUMNS};
use crate::{Position, TerrainGrid};

/// Mask of a cell surrounded on all sides by its own terrain.
pub const FULLY_ENCLOSED_MASK: &str = "A1B2C3D4";

/// Mask of a cell with no matching neighbor at all.
pub const ISOLATED_MASK: &str = "X";

/// Every mask the neighbor rules can produce, with its `(col, row)` inside a
/// terrain block.
const MASK_LAYOUT: [(&str, usize, usize); 47] = [
    ("X", 0, 0),
    ("A", 1, 0),
    ("B", 2, 0),
    ("AB", 3, 0),
    ("A1B", 4, 0),
    ("C", 5, 0),
    ("AC", 0, 1),
    ("BC", 1, 1),
    ("B2C", 2, 1),
    ("ABC", 3, 1),
    ("A1BC", 4, 1),
    ("AB2C", 5, 1),
    ("A1B2C", 0, 2),
    ("D", 1, 2),
    ("AD", 2, 2),
    ("AD4", 3, 2),
    ("BD", 4, 2),
    ("ABD", 5, 2),
    ("A1BD", 0, 3),
    ("ABD4", 1, 3),
    ("A1BD4", 2, 3),
    ("CD", 3, 3),
    ("C3D", 4, 3),
    ("ACD", 5, 3),
    ("AC3D", 0, 4),
    ("ACD4", 1, 4),
    ("AC3D4", 2, 4),
    ("BCD", 3, 4),
    ("B2CD", 4, 4),
    ("BC3D", 5, 4),
    ("B2C3D", 0, 5),
    ("ABCD", 1, 5),
    ("A1BCD", 2, 5),
    ("AB2CD", 3, 5),
    ("A1B2CD", 4, 5),
    ("ABC3D", 5, 5),
    ("A1BC3D", 0, 6),
    ("AB2C3D", 1, 6),
    ("A1B2C3D", 2, 6),
    ("ABCD4", 3, 6),
    ("A1BCD4", 4, 6),
    ("AB2CD4", 5, 6),
    ("A1B2CD4", 0, 7),
    ("ABC3D4", 1, 7),
    ("A1BC3D4", 2, 7),
    ("AB2C3D4", 3, 7),
    ("A1B2C3D4", 4, 7),
];

/// Builds the neighbor mask of the cell at `(x, y)`.
///
/// Cardinals are `A` up, `B` right, `C` down, `D` left. A diagonal token is
/// only considered when both cardinals beside it match: `1` up-right, `2`
/// down-right, `3` down-left, `4` up-left. Cells beyond the map edge count as
/// matching, so the border reads as enclosed.
///
/// # Examples
///
/// ```
/// use undercroft::{autotile_mask, TerrainGrid};
///
/// let grid = TerrainGrid::from_rows(&[
///     "###",
///     "#..",
///     "###",
/// ]).unwrap();
/// assert_eq!(autotile_mask(&grid, 1, 1), "B");
/// // The corner misses only its down-right neighbor
/// assert_eq!(autotile_mask(&grid, 0, 0), "A1BC3D4");
/// ```
pub fn autotile_mask(grid: &TerrainGrid, x: i32, y: i32) -> String {
    let center = grid.terrain_at(Position::new(x, y));
    let matches = |dx: i32, dy: i32| {
        grid.get(Position::new(x + dx, y + dy))
            .map_or(true, |kind| kind == center)
    };

    let up = matches(0, -1);
    let right = matches(1, 0);
    let down = matches(0, 1);
    let left = matches(-1, 0);

    let tokens = [
        ('A', up),
        ('1', up && right && matches(1, -1)),
        ('B', right),
        ('2', right && down && matches(1, 1)),
        ('C', down),
        ('3', down && left && matches(-1, 1)),
        ('D', left),
        ('4', left && up && matches(-1, -1)),
    ];

    let mask: String = tokens
        .iter()
        .filter(|(_, present)| *present)
        .map(|(token, _)| *token)
        .collect();
    if mask.is_empty() {
        ISOLATED_MASK.to_string()
    } else {
        mask
    }
}

/// Looks up a mask's `(col, row)` inside a terrain block.
///
/// Masks outside the table fall back to the fully enclosed tile.
pub fn mask_cell(mask: &str) -> (usize, usize) {
    let lookup = |wanted: &str| {
        MASK_LAYOUT
            .iter()
            .find(|(known, _, _)| *known == wanted)
            .map(|&(_, col, row)| (col, row))
    };
    lookup(mask)
        .or_else(|| lookup(FULLY_ENCLOSED_MASK))
        .unwrap_or((0, 0))
}

/// Flat sprite index of the cell at `(x, y)` in the full autotile sheet.
pub fn tile_index_for(grid: &TerrainGrid, x: i32, y: i32) -> usize {
    let terrain = grid.terrain_at(Position::new(x, y));
    let (col, row) = mask_cell(&autotile_mask(grid, x, y));
    row * TILESET_COLUMNS + terrain.tileset_group() * TILESET_BLOCK_COLUMNS + col
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TILESET_ROWS;
    use crate::TerrainKind;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_layout_is_unique_and_fits_block() {
        let masks: HashSet<_> = MASK_LAYOUT.iter().map(|(mask, _, _)| *mask).collect();
        let cells: HashSet<_> = MASK_LAYOUT.iter().map(|&(_, col, row)| (col, row)).collect();
        assert_eq!(masks.len(), 47);
        assert_eq!(cells.len(), 47);
        assert!(MASK_LAYOUT
            .iter()
            .all(|&(_, col, row)| col < TILESET_BLOCK_COLUMNS && row < TILESET_ROWS));
    }

    #[test]
    fn test_surrounded_cell_is_fully_enclosed() {
        let grid = TerrainGrid::filled(5, 5, TerrainKind::Ground);
        assert_eq!(autotile_mask(&grid, 2, 2), FULLY_ENCLOSED_MASK);
        // Borders count as matching
        assert_eq!(autotile_mask(&grid, 0, 0), FULLY_ENCLOSED_MASK);
        assert_eq!(autotile_mask(&grid, 4, 2), FULLY_ENCLOSED_MASK);
    }

    #[test]
    fn test_isolated_cell() {
        let grid = TerrainGrid::from_rows(&["###", "#.#", "###"]).unwrap();
        assert_eq!(autotile_mask(&grid, 1, 1), ISOLATED_MASK);
        assert_eq!(mask_cell(ISOLATED_MASK), (0, 0));
    }

    #[test]
    fn test_diagonal_needs_both_flanks() {
        // Up-right is ground but right is not, so no `1` token
        let grid = TerrainGrid::from_rows(&[
            "...",
            "..#",
            "...",
        ])
        .unwrap();
        assert_eq!(autotile_mask(&grid, 1, 1), "AC3D4");
    }

    #[test]
    fn test_other_terrain_breaks_match() {
        let grid = TerrainGrid::from_rows(&[
            "...",
            ".~.",
            "...",
        ])
        .unwrap();
        assert_eq!(autotile_mask(&grid, 1, 1), ISOLATED_MASK);
        assert_eq!(autotile_mask(&grid, 0, 1), "AC3D4");
    }

    #[test]
    fn test_unknown_mask_falls_back_to_enclosed() {
        let enclosed = mask_cell(FULLY_ENCLOSED_MASK);
        assert_eq!(enclosed, (4, 7));
        assert_eq!(mask_cell("1"), enclosed);
        assert_eq!(mask_cell(""), enclosed);
        assert_eq!(mask_cell("garbage"), enclosed);
    }

    #[test]
    fn test_tile_index_flattens_sheet() {
        let wall = TerrainGrid::new(3, 3);
        let ground = TerrainGrid::filled(3, 3, TerrainKind::Ground);
        let other = TerrainGrid::filled(3, 3, TerrainKind::Other);

        // Enclosed tile sits at (4, 7) in each block
        assert_eq!(tile_index_for(&wall, 1, 1), 7 * 18 + 4);
        assert_eq!(tile_index_for(&ground, 1, 1), 7 * 18 + 6 + 4);
        assert_eq!(tile_index_for(&other, 1, 1), 7 * 18 + 12 + 4);
    }

    proptest! {
        #[test]
        fn prop_every_computed_mask_is_in_the_table(
            cells in proptest::collection::vec(0u8..3, 36),
            x in -1i32..7,
            y in -1i32..7,
        ) {
            let rows: Vec<String> = cells
                .chunks(6)
                .map(|row| row.iter().map(|&c| ['#', '.', '~'][c as usize]).collect())
                .collect();
            let grid = TerrainGrid::from_rows(rows.as_slice()).unwrap();
            let mask = autotile_mask(&grid, x, y);
            prop_assert!(MASK_LAYOUT.iter().any(|(known, _, _)| *known == mask));
            prop_assert!(tile_index_for(&grid, x, y) < TILESET_COLUMNS * TILESET_ROWS);
        }
    }
}
