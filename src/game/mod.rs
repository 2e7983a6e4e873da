//! Game Module
//!
//! The per-frame player update loop and everything it drives. Plain structs
//! and free functions; the only seam is `PhysicsEngine`, so the collision
//! model can be swapped without touching the loop.
//!
//! Key pieces:
//! - Game: run state and the frame update (`runtime`)
//! - PlatformerPhysics: gravity, ladders, moving platforms (`physics`)
//! - Events: what happened this frame, drained by the host for sounds
//! - FpsCounter: moving-average frame rate for the HUD

pub mod audio;
pub mod camera;
pub mod collision;
pub mod event;
pub mod fps;
pub mod physics;
pub mod player;
pub mod renderer;
pub mod runtime;

// Re-export main types
pub use audio::SoundBank;
pub use fps::FpsCounter;
pub use renderer::draw_game;
pub use runtime::Game;
