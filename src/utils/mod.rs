//! # Utilities Module
//!
//! Grid search shared by AI movement and auto-exploration.

pub mod pathfinding;

pub use self::pathfinding::*;
