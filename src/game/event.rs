//! Event System
//!
//! The update loop never plays sounds or touches the HUD directly. It sends
//! events that the host drains after each update:
//!
//! 1. Scoring resolver picks up a coin → sends CoinCollectedEvent
//! 2. Host reads CoinCollectedEvent → plays the coin sound
//! 3. Hazard touched → sends GameOverEvent → host plays the game-over sound

use macroquad::math::Vec2;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all game events.
pub struct Events {
    pub coin_collected: EventQueue<CoinCollectedEvent>,
    pub jump: EventQueue<JumpEvent>,
    pub game_over: EventQueue<GameOverEvent>,
    pub level_complete: EventQueue<LevelCompleteEvent>,
    pub run_restarted: EventQueue<RunRestartedEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            coin_collected: EventQueue::new(),
            jump: EventQueue::new(),
            game_over: EventQueue::new(),
            level_complete: EventQueue::new(),
            run_restarted: EventQueue::new(),
        }
    }

    /// Clear all event queues. Called at the start of each update.
    pub fn clear_all(&mut self) {
        self.coin_collected.clear();
        self.jump.clear();
        self.game_over.clear();
        self.level_complete.clear();
        self.run_restarted.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// A coin was picked up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinCollectedEvent {
    /// Score awarded
    pub points: u32,
    /// Where the coin was
    pub position: Vec2,
}

/// The player left the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpEvent {
    pub position: Vec2,
}

/// Hazard touched or fell off the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverEvent {
    pub cause: GameOverCause,
    pub lives_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    Hazard,
    FellOffMap,
}

/// The player reached the right edge of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCompleteEvent {
    pub completed: u32,
    pub next: u32,
}

/// Out of lives: score, lives and level number were reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRestartedEvent {
    pub final_score: u32,
}
