//! World module - layered 2D levels
//!
//! - Axis-aligned geometry in a y-up world
//! - Named sprite layers (platforms, ladders, coins, hazards, ...)
//! - Spatial hashing for static layers
//! - RON level files, embedded at build time or read from disk

mod builtin;
mod geometry;
mod level;
mod level_set;
mod spatial_hash;
mod sprite;

pub use geometry::*;
pub use level::*;
pub use level_set::*;
pub use sprite::*;
