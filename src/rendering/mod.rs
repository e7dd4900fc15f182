//! # Rendering Module
//!
//! Read-only views the renderer pulls from a floor: autotile sprite indices
//! and a plain-text map with fog of war.

pub mod autotile;
pub mod display;

pub use autotile::*;
pub use display::*;
