//! Axis-aligned bounding boxes
//!
//! World space is y-up with the origin at the bottom-left of the level,
//! so `min` is the bottom-left corner and `max` the top-right.

use macroquad::math::Vec2;

/// Penetration below this is treated as touching, not overlapping.
/// Keeps boxes resting exactly on a floor from snagging on float noise.
pub const CONTACT_EPSILON: f32 = 0.01;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    pub fn top(&self) -> f32 {
        self.max.y
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// True if the boxes interpenetrate by more than `CONTACT_EPSILON` on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x - CONTACT_EPSILON
            && self.max.x > other.min.x + CONTACT_EPSILON
            && self.min.y < other.max.y - CONTACT_EPSILON
            && self.max.y > other.min.y + CONTACT_EPSILON
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}
