//! # Undercroft
//!
//! The tile-grid spatial-reasoning core of a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! Everything here operates on one floor at a time and runs synchronously
//! inside a single turn:
//!
//! - **Terrain**: classified wall/ground cells with collision and corner-cut rules
//! - **Visibility**: two-tier fog of war (`visited` vs `currently_visible`)
//! - **Pathfinding**: one bounded BFS shared by hostile chase AI and player auto-explore
//! - **Secret rooms**: a hidden 3x3 room carved behind a corridor wall, opened on approach
//! - **Autotiling**: neighbor-mask lookup that picks the edged sprite for each cell
//!
//! Per-floor state lives in an explicit [`FloorContext`], created when a floor
//! is generated and dropped when the player leaves it.

pub mod game;
pub mod generation;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Undercroft engine.
///
/// Only setup paths can fail. Per-turn queries (pathing, visibility,
/// autotiling, secret passages) always answer with a safe default instead.
#[derive(thiserror::Error, Debug)]
pub enum UndercroftError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Terrain input could not be parsed or has inconsistent dimensions
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// A write targeted a cell outside the grid
    #[error("Position {0} is outside the grid")]
    OutOfBounds(game::Position),

    /// Floor state is invalid
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Undercroft codebase.
pub type UndercroftResult<T> = Result<T, UndercroftError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine-wide tuning constants.
pub mod config {
    /// Default floor width in tiles
    pub const DEFAULT_FLOOR_WIDTH: u32 = 60;

    /// Default floor height in tiles
    pub const DEFAULT_FLOOR_HEIGHT: u32 = 30;

    /// Default player sight radius (Chebyshev)
    pub const DEFAULT_SIGHT_RADIUS: u32 = 4;

    /// Fixed sight radius of allied units
    pub const ALLY_VISION_RADIUS: u32 = 2;

    /// Hostiles only start chasing a target within this Chebyshev range
    pub const CHASE_DETECTION_RANGE: u32 = 5;

    /// Chase searches never expand past this Chebyshev distance from the hostile
    pub const CHASE_SEARCH_RADIUS: u32 = 12;

    /// Minimum Manhattan distance between a secret wall and the start or stairs
    pub const SECRET_MIN_DISTANCE: u32 = 4;

    /// Outer rows/columns never considered for a secret wall
    pub const SECRET_BORDER_MARGIN: i32 = 1;

    /// Columns per terrain block in the autotile sheet
    pub const TILESET_BLOCK_COLUMNS: usize = 6;

    /// Rows in the autotile sheet
    pub const TILESET_ROWS: usize = 8;

    /// Number of terrain blocks laid side by side in the autotile sheet
    pub const TILESET_TERRAIN_GROUPS: usize = 3;

    /// Total columns in the autotile sheet
    pub const TILESET_COLUMNS: usize = TILESET_BLOCK_COLUMNS * TILESET_TERRAIN_GROUPS;
}
