//! Held-key tracking
//!
//! The host feeds discrete press/release events in; the update loop reads
//! the held state once per frame to derive horizontal velocity.

use std::collections::HashSet;

use macroquad::input::{get_keys_pressed, get_keys_released, is_key_down, KeyCode};

use super::Direction;

/// Which movement directions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag_mut(&mut self, dir: Direction) -> &mut bool {
        match dir {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    pub fn press(&mut self, dir: Direction) {
        *self.flag_mut(dir) = true;
    }

    pub fn release(&mut self, dir: Direction) {
        *self.flag_mut(dir) = false;
    }

    /// Desired horizontal velocity: opposing keys cancel
    pub fn horizontal_velocity(&self, speed: f32) -> f32 {
        match (self.left, self.right) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        }
    }
}

/// A discrete key event for one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Pressed(Direction),
    Released(Direction),
}

/// Collect this frame's direction events from macroquad
pub fn poll_key_events() -> Vec<KeyEvent> {
    key_events(&get_keys_pressed(), &get_keys_released(), is_key_down)
}

/// Order one frame's presses and releases.
///
/// A key seen both pressed and released inside the frame was either tapped
/// or let go and pressed again; `is_down` tells which, and the events are
/// ordered so the last one matches the key's live state.
pub fn key_events(
    pressed: &HashSet<KeyCode>,
    released: &HashSet<KeyCode>,
    is_down: impl Fn(KeyCode) -> bool,
) -> Vec<KeyEvent> {
    let repressed = |k: KeyCode| pressed.contains(&k) && is_down(k);
    let mut events: Vec<KeyEvent> = Vec::with_capacity(pressed.len() + released.len());
    events.extend(
        released
            .iter()
            .filter(|&&k| repressed(k))
            .filter_map(|&k| Direction::from_key(k))
            .map(KeyEvent::Released),
    );
    events.extend(
        pressed
            .iter()
            .filter_map(|&k| Direction::from_key(k))
            .map(KeyEvent::Pressed),
    );
    events.extend(
        released
            .iter()
            .filter(|&&k| !repressed(k))
            .filter_map(|&k| Direction::from_key(k))
            .map(KeyEvent::Released),
    );
    events
}
