//! Follow camera
//!
//! Keeps the player centered in the viewport without ever scrolling before
//! the world origin. The offset is the world position of the viewport's
//! bottom-left corner.

use macroquad::math::{vec2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    /// Current viewport offset
    pub position: Vec2,
    pub viewport: Vec2,
    /// Fraction of the remaining distance covered per frame (None = snap)
    pub smoothing: Option<f32>,
}

impl FollowCamera {
    pub fn new(viewport: Vec2, smoothing: Option<f32>) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
            smoothing,
        }
    }

    /// Offset that centers `focus`, clamped to the world origin
    pub fn target_for(&self, focus: Vec2) -> Vec2 {
        let centered = focus - self.viewport * 0.5;
        vec2(centered.x.max(0.0), centered.y.max(0.0))
    }

    /// Move toward the target for `focus`
    pub fn follow(&mut self, focus: Vec2) {
        let target = self.target_for(focus);
        self.position = match self.smoothing {
            Some(factor) => self.position.lerp(target, factor.clamp(0.0, 1.0)),
            None => target,
        };
    }

    /// Jump straight to the target (level load, respawn)
    pub fn snap_to(&mut self, focus: Vec2) {
        self.position = self.target_for(focus);
    }

    /// World-space center of the viewport
    pub fn center(&self) -> Vec2 {
        self.position + self.viewport * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1000.0, 650.0);

    #[test]
    fn test_centers_player() {
        let mut cam = FollowCamera::new(VIEWPORT, None);
        cam.follow(vec2(2000.0, 1000.0));
        assert_eq!(cam.position, vec2(1500.0, 675.0));
        assert_eq!(cam.center(), vec2(2000.0, 1000.0));
    }

    #[test]
    fn test_never_scrolls_before_origin() {
        let mut cam = FollowCamera::new(VIEWPORT, None);
        for (x, y) in [(0.0, 0.0), (10.0, 300.0), (499.0, 324.0), (600.0, 0.0), (0.0, 5000.0)] {
            cam.follow(vec2(x, y));
            assert!(cam.position.x >= 0.0 && cam.position.y >= 0.0, "at ({}, {})", x, y);
        }
    }

    #[test]
    fn test_smoothing_moves_part_way() {
        let mut cam = FollowCamera::new(VIEWPORT, Some(0.2));
        cam.follow(vec2(1500.0, 325.0));
        // Target is (1000, 0); one step covers 20%
        assert!((cam.position.x - 200.0).abs() < 1e-3);
        assert_eq!(cam.position.y, 0.0);

        for _ in 0..200 {
            cam.follow(vec2(1500.0, 325.0));
        }
        assert!((cam.position.x - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn test_smoothed_stays_non_negative() {
        let mut cam = FollowCamera::new(VIEWPORT, Some(0.2));
        cam.snap_to(vec2(3000.0, 3000.0));
        for _ in 0..100 {
            cam.follow(vec2(0.0, 0.0));
            assert!(cam.position.x >= 0.0 && cam.position.y >= 0.0);
        }
    }
}
