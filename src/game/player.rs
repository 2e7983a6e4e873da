//! Player state
//!
//! Plain data plus the small per-frame rules that only touch the player:
//! animation state, facing, and keeping the hitbox inside the world.

use macroquad::math::Vec2;

use crate::config::BoundsMode;
use crate::world::Aabb;

/// Frames in the walk cycle
pub const WALK_FRAMES: u8 = 8;
/// Climb textures; each is held for `CLIMB_FRAME_TICKS` frames
pub const CLIMB_FRAMES: u8 = 2;
pub const CLIMB_FRAME_TICKS: u8 = 4;
/// Vertical speed above which the climb animation advances
const CLIMB_ANIM_MIN_SPEED: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Climbing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Hitbox center
    pub position: Vec2,
    pub size: Vec2,
    pub change_x: f32,
    pub change_y: f32,
    pub facing: Facing,
    pub anim: AnimState,
    /// Set by climbing input, cleared when a key is released off the ladder
    pub on_ladder: bool,
    /// Walk frame (0..WALK_FRAMES) or climb tick counter (0..CLIMB_FRAMES*CLIMB_FRAME_TICKS)
    pub anim_frame: u8,
}

impl Player {
    pub fn new(start: Vec2, size: Vec2) -> Self {
        Self {
            position: start,
            size,
            change_x: 0.0,
            change_y: 0.0,
            facing: Facing::Right,
            anim: AnimState::Idle,
            on_ladder: false,
            anim_frame: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.size)
    }

    pub fn left(&self) -> f32 {
        self.position.x - self.size.x * 0.5
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.size.y * 0.5
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.size.y * 0.5
    }

    pub fn set_left(&mut self, left: f32) {
        self.position.x = left + self.size.x * 0.5;
    }

    pub fn set_right(&mut self, right: f32) {
        self.position.x = right - self.size.x * 0.5;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.position.y = bottom + self.size.y * 0.5;
    }

    pub fn set_top(&mut self, top: f32) {
        self.position.y = top - self.size.y * 0.5;
    }

    /// Zero both velocity components
    pub fn stop(&mut self) {
        self.change_x = 0.0;
        self.change_y = 0.0;
    }

    /// Put the player back at `start`, at rest and off any ladder
    pub fn reset_to(&mut self, start: Vec2) {
        self.position = start;
        self.stop();
        self.on_ladder = false;
        self.anim = AnimState::Idle;
        self.anim_frame = 0;
    }

    /// Keep the hitbox inside the world after the physics step
    pub fn clamp_to_bounds(&mut self, bounds: BoundsMode) {
        if self.left() < 0.0 {
            self.set_left(0.0);
        }
        if let BoundsMode::Screen { width, height } = bounds {
            if self.right() > width - 1.0 {
                self.set_right(width - 1.0);
            }
            if self.bottom() < 0.0 {
                self.set_bottom(0.0);
            } else if self.top() > height - 1.0 {
                self.set_top(height - 1.0);
            }
        }
    }

    // =========================================================================
    // Animation
    // =========================================================================

    fn update_facing(&mut self) {
        if self.change_x < 0.0 {
            self.facing = Facing::Left;
        } else if self.change_x > 0.0 {
            self.facing = Facing::Right;
        }
    }

    /// Pick the animation state for this frame and advance its frame counter.
    /// Priority: climbing, jumping, idle, walking.
    pub fn update_animation(&mut self) {
        self.update_facing();

        if self.on_ladder {
            if self.anim != AnimState::Climbing {
                self.anim = AnimState::Climbing;
                self.anim_frame = 0;
            }
            if self.change_y.abs() > CLIMB_ANIM_MIN_SPEED {
                self.anim_frame = (self.anim_frame + 1) % (CLIMB_FRAMES * CLIMB_FRAME_TICKS);
            }
            return;
        }

        if self.change_y != 0.0 {
            self.anim = AnimState::Jumping;
            return;
        }

        if self.change_x == 0.0 {
            self.anim = AnimState::Idle;
            return;
        }

        if self.anim != AnimState::Walking {
            self.anim = AnimState::Walking;
            self.anim_frame = 0;
        } else {
            self.anim_frame = (self.anim_frame + 1) % WALK_FRAMES;
        }
    }

    /// Texture index for the current animation state
    pub fn texture_index(&self) -> u8 {
        match self.anim {
            AnimState::Climbing => self.anim_frame / CLIMB_FRAME_TICKS,
            AnimState::Walking => self.anim_frame,
            AnimState::Idle | AnimState::Jumping => 0,
        }
    }
}
