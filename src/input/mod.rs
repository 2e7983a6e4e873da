//! Keyboard input
//!
//! Tracks held movement keys and turns macroquad's per-frame key sets into
//! discrete press/release events for the game loop.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
