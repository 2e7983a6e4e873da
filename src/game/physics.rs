//! Platformer physics
//!
//! The update loop only talks to the `PhysicsEngine` trait: one `step` per
//! frame, plus `can_jump` / `is_on_ladder` queries when a key is pressed.
//! `PlatformerPhysics` is the built-in implementation:
//!
//! 1. Advance moving platforms, bouncing at their boundaries and carrying
//!    a player standing on them. A carried or shoved player stops at static
//!    platforms.
//! 2. Apply gravity unless the player overlaps a ladder
//! 3. Move along Y, then stop at the nearest solid in the way
//! 4. Move along X, then stop at the nearest solid in the way
//!
//! Resolving each axis on its own keeps corners from snagging. Only solids
//! the player was clear of before the move can stop it, so something the
//! player is already inside never teleports it to a far edge. Velocities
//! are in pixels per frame.

use macroquad::math::{vec2, Vec2};

use crate::world::{
    Aabb, LayerKind, Level, Sprite, CONTACT_EPSILON, PROP_BOUNDARY_BOTTOM, PROP_BOUNDARY_LEFT,
    PROP_BOUNDARY_RIGHT, PROP_BOUNDARY_TOP,
};
use super::player::Player;

/// How far below the feet a platform still counts as "standing on it"
const RIDE_PROBE: f32 = 1.0;

/// Layers the player can't pass through
const SOLID_LAYERS: [LayerKind; 2] = [LayerKind::Platforms, LayerKind::MovingPlatforms];
/// Layers that stop a player pushed around by a moving platform
const STATIC_LAYERS: [LayerKind; 1] = [LayerKind::Platforms];

/// Physics capability required by the update loop
pub trait PhysicsEngine {
    /// Advance one frame: platforms, gravity, then axis-separated movement
    fn step(&mut self, player: &mut Player, level: &mut Level);

    /// True if the player is on solid ground or against a wall
    fn can_jump(&self, player: &Player, level: &Level) -> bool;

    /// True if the player overlaps ladder geometry
    fn is_on_ladder(&self, player: &Player, level: &Level) -> bool;
}

/// Gravity-and-tiles platformer physics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformerPhysics {
    /// Subtracted from change_y every frame off a ladder
    pub gravity: f32,
    /// Distance the hitbox is nudged down, left and right by `can_jump`
    pub probe_distance: f32,
}

impl PlatformerPhysics {
    pub fn new(gravity: f32, probe_distance: f32) -> Self {
        Self {
            gravity,
            probe_distance,
        }
    }

    /// Nearest edge, by `nearer`, of the solids in `layers` that overlap
    /// `moved` and that `blocks` accepts
    fn blocking_edge(
        level: &Level,
        layers: &[LayerKind],
        moved: &Aabb,
        blocks: impl Fn(&Aabb) -> bool,
        edge: impl Fn(&Aabb) -> f32,
        nearer: fn(f32, f32) -> f32,
    ) -> Option<f32> {
        let mut found: Option<f32> = None;
        for layer in layers.iter().filter_map(|&kind| level.layer(kind)) {
            layer.for_each_overlap(moved, |sprite| {
                if blocks(&sprite.bounds) {
                    let e = edge(&sprite.bounds);
                    found = Some(found.map_or(e, |f| nearer(f, e)));
                }
            });
        }
        found
    }

    /// Undo the part of a vertical move from `start` that entered a solid.
    /// Returns true if the player was stopped.
    fn stop_vertical(
        player: &mut Player,
        level: &Level,
        layers: &[LayerKind],
        start: &Aabb,
        dy: f32,
    ) -> bool {
        let moved = player.bounds();
        if dy < 0.0 {
            let floor = Self::blocking_edge(
                level,
                layers,
                &moved,
                |b| b.top() <= start.bottom() + CONTACT_EPSILON,
                Aabb::top,
                f32::max,
            );
            if let Some(top) = floor {
                player.set_bottom(top);
                return true;
            }
        } else if dy > 0.0 {
            let ceiling = Self::blocking_edge(
                level,
                layers,
                &moved,
                |b| b.bottom() >= start.top() - CONTACT_EPSILON,
                Aabb::bottom,
                f32::min,
            );
            if let Some(bottom) = ceiling {
                player.set_top(bottom);
                return true;
            }
        }
        false
    }

    /// Horizontal counterpart of `stop_vertical`
    fn stop_horizontal(
        player: &mut Player,
        level: &Level,
        layers: &[LayerKind],
        start: &Aabb,
        dx: f32,
    ) -> bool {
        let moved = player.bounds();
        if dx > 0.0 {
            let wall = Self::blocking_edge(
                level,
                layers,
                &moved,
                |b| b.left() >= start.right() - CONTACT_EPSILON,
                Aabb::left,
                f32::min,
            );
            if let Some(left) = wall {
                player.set_right(left);
                return true;
            }
        } else if dx < 0.0 {
            let wall = Self::blocking_edge(
                level,
                layers,
                &moved,
                |b| b.right() <= start.left() + CONTACT_EPSILON,
                Aabb::right,
                f32::max,
            );
            if let Some(right) = wall {
                player.set_left(right);
                return true;
            }
        }
        false
    }

    fn hits_solid(level: &Level, bounds: &Aabb) -> bool {
        SOLID_LAYERS
            .iter()
            .filter_map(|&kind| level.layer(kind))
            .any(|layer| layer.any_overlap(bounds))
    }

    /// Move kinematic platforms and carry or push the player along
    fn move_platforms(&self, player: &mut Player, level: &mut Level) {
        let start = player.bounds();
        let Some(platforms) = level.layer_mut(LayerKind::MovingPlatforms) else {
            return;
        };

        for platform in platforms.iter_mut() {
            if platform.velocity == Vec2::ZERO {
                continue;
            }

            let before = platform.bounds;
            let feet_probe = player.bounds().translated(vec2(0.0, -RIDE_PROBE));
            let riding = player.change_y <= 0.0
                && !player.bounds().overlaps(&before)
                && feet_probe.overlaps(&before);

            platform.translate(platform.velocity);
            bounce_at_boundaries(platform);
            let delta = platform.bounds.min - before.min;

            if riding {
                player.position += delta;
            } else if player.bounds().overlaps(&platform.bounds) {
                // Platform moved into the player: shove along its motion
                let b = platform.bounds;
                if delta.y > 0.0 {
                    player.set_bottom(b.top());
                } else if delta.y < 0.0 {
                    player.set_top(b.bottom());
                } else if delta.x > 0.0 {
                    player.set_left(b.right());
                } else if delta.x < 0.0 {
                    player.set_right(b.left());
                }
            }
        }

        // Platforms pass through walls, the player doesn't
        let moved = player.bounds().min - start.min;
        Self::stop_vertical(player, level, &STATIC_LAYERS, &start, moved.y);
        Self::stop_horizontal(player, level, &STATIC_LAYERS, &start, moved.x);
    }
}

/// Clamp a moving platform to its boundary properties and reverse its
/// velocity on the axis it hit
fn bounce_at_boundaries(platform: &mut Sprite) {
    let mut offset = Vec2::ZERO;
    let b = platform.bounds;

    if let Some(limit) = platform.property(PROP_BOUNDARY_LEFT) {
        if b.left() <= limit {
            offset.x = limit - b.left();
            if platform.velocity.x < 0.0 {
                platform.velocity.x = -platform.velocity.x;
            }
        }
    }
    if let Some(limit) = platform.property(PROP_BOUNDARY_RIGHT) {
        if b.right() >= limit {
            offset.x = limit - b.right();
            if platform.velocity.x > 0.0 {
                platform.velocity.x = -platform.velocity.x;
            }
        }
    }
    if let Some(limit) = platform.property(PROP_BOUNDARY_BOTTOM) {
        if b.bottom() <= limit {
            offset.y = limit - b.bottom();
            if platform.velocity.y < 0.0 {
                platform.velocity.y = -platform.velocity.y;
            }
        }
    }
    if let Some(limit) = platform.property(PROP_BOUNDARY_TOP) {
        if b.top() >= limit {
            offset.y = limit - b.top();
            if platform.velocity.y > 0.0 {
                platform.velocity.y = -platform.velocity.y;
            }
        }
    }

    if offset != Vec2::ZERO {
        platform.translate(offset);
    }
}

impl PhysicsEngine for PlatformerPhysics {
    fn step(&mut self, player: &mut Player, level: &mut Level) {
        self.move_platforms(player, level);

        if !self.is_on_ladder(player, level) {
            player.change_y -= self.gravity;
        }

        // Y axis
        let start = player.bounds();
        player.position.y += player.change_y;
        if Self::stop_vertical(player, level, &SOLID_LAYERS, &start, player.change_y) {
            player.change_y = 0.0;
        }

        // X axis
        let start = player.bounds();
        player.position.x += player.change_x;
        if Self::stop_horizontal(player, level, &SOLID_LAYERS, &start, player.change_x) {
            player.change_x = 0.0;
        }
    }

    fn can_jump(&self, player: &Player, level: &Level) -> bool {
        let d = self.probe_distance;
        let bounds = player.bounds();
        [vec2(0.0, -d), vec2(-d, 0.0), vec2(d, 0.0)]
            .iter()
            .any(|&offset| Self::hits_solid(level, &bounds.translated(offset)))
    }

    fn is_on_ladder(&self, player: &Player, level: &Level) -> bool {
        level
            .layer(LayerKind::Ladders)
            .map(|ladders| ladders.any_overlap(&player.bounds()))
            .unwrap_or(false)
    }
}
