//! # Display Management
//!
//! Plain-text rendering of a floor under fog of war, plus a short message log.

use crate::{FloorContext, Position};

/// Glyph drawn for cells that have never been seen.
const UNSEEN_GLYPH: char = ' ';

/// Text display for a single floor.
///
/// Cells in view show terrain and entities. Remembered cells show terrain
/// only, and unseen cells stay blank.
#[derive(Debug, Clone)]
pub struct TextDisplay {
    /// Message history, oldest first
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
}

impl TextDisplay {
    /// Creates a display with an empty message log.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_messages: 8,
        }
    }

    /// Adds a message, dropping the oldest once the log is full.
    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }

    /// Renders the map rows. `entities` are drawn only where currently visible.
    pub fn render_map(&self, floor: &FloorContext, entities: &[(Position, char)]) -> Vec<String> {
        let grid = floor.grid();
        let visibility = floor.visibility();

        (0..grid.height as i32)
            .map(|y| {
                (0..grid.width as i32)
                    .map(|x| {
                        let pos = Position::new(x, y);
                        if visibility.is_visible(pos) {
                            entities
                                .iter()
                                .find(|(at, _)| *at == pos)
                                .map(|&(_, glyph)| glyph)
                                .unwrap_or_else(|| grid.terrain_at(pos).glyph())
                        } else if visibility.is_visited(pos) {
                            grid.terrain_at(pos).glyph()
                        } else {
                            UNSEEN_GLYPH
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Renders the autotile sprite index of every remembered cell, `.` elsewhere.
    pub fn render_tile_indices(&self, floor: &FloorContext) -> Vec<String> {
        let grid = floor.grid();
        (0..grid.height as i32)
            .map(|y| {
                (0..grid.width as i32)
                    .map(|x| {
                        if floor.visibility().is_visited(Position::new(x, y)) {
                            format!("{:>4}", floor.tile_index_for(x, y))
                        } else {
                            "   .".to_string()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Renders the map followed by the message log.
    pub fn render(&self, floor: &FloorContext, entities: &[(Position, char)]) -> String {
        let mut lines = self.render_map(floor, entities);
        lines.push(String::new());
        lines.extend(self.messages.iter().cloned());
        lines.join("\n")
    }
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TerrainGrid;

    fn corridor_floor() -> FloorContext {
        let grid = TerrainGrid::from_rows(&["#########", "#.......#", "#########"]).unwrap();
        FloorContext::from_grid(grid, Position::new(1, 1), Position::new(7, 1))
    }

    #[test]
    fn test_render_map_applies_fog() {
        let mut floor = corridor_floor();
        floor.reveal_visibility(Position::new(1, 1), 1, &[]);
        floor.reveal_visibility(Position::new(5, 1), 1, &[]);

        let display = TextDisplay::new();
        let rows = display.render_map(&floor, &[(Position::new(5, 1), '@'), (Position::new(2, 1), 'g')]);
        // (2,1) is remembered, so the goblin there is not drawn
        assert_eq!(rows[1], "#.. .@.  ");
        assert_eq!(rows[0], "### ###  ");
    }

    #[test]
    fn test_message_log_is_bounded() {
        let mut display = TextDisplay::new();
        display.max_messages = 2;
        display.add_message("one");
        display.add_message("two");
        display.add_message("three");
        assert_eq!(display.messages, vec!["two", "three"]);
    }

    #[test]
    fn test_render_includes_messages() {
        let mut floor = corridor_floor();
        floor.reveal_visibility(Position::new(1, 1), 1, &[]);
        let mut display = TextDisplay::new();
        display.add_message("You hear a click.");
        let text = display.render(&floor, &[]);
        assert!(text.ends_with("You hear a click."));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_tile_indices_only_for_remembered_cells() {
        let mut floor = corridor_floor();
        floor.reveal_visibility(Position::new(1, 1), 1, &[]);
        let rows = TextDisplay::new().render_tile_indices(&floor);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].ends_with("   ."));
        assert!(!rows[1].starts_with("   ."));
    }
}
