//! Game Runtime
//!
//! Owns the run state (level, player, score, lives) and drives one frame:
//!
//! 1. `begin_frame` clears last frame's events
//! 2. `handle_key` for every key event the host polled
//! 3. `update`: velocity, animation, physics, bounds clamp, coins,
//!    game over, level completion, camera
//!
//! The host then drains `events` to play sounds and draws.

use macroquad::math::vec2;

use crate::config::GameConfig;
use crate::input::{Direction, KeyEvent, KeyState};
use crate::world::{Level, LevelError, LevelSet};
use super::camera::FollowCamera;
use super::collision::{collect_coins, game_over_cause, reached_end_of_map};
use super::event::{
    Events, GameOverCause, GameOverEvent, JumpEvent, LevelCompleteEvent, RunRestartedEvent,
};
use super::physics::{PhysicsEngine, PlatformerPhysics};
use super::player::Player;

pub struct Game {
    config: GameConfig,
    level_set: LevelSet,
    physics: Box<dyn PhysicsEngine>,
    pub level: Level,
    pub player: Player,
    pub keys: KeyState,
    pub camera: FollowCamera,
    pub score: u32,
    pub lives: u32,
    /// 1-based; wraps around the level set
    pub level_number: u32,
    /// Seconds since the current level was loaded
    pub level_time: f32,
    pub events: Events,
}

impl Game {
    /// Start a run on level 1 with the built-in physics
    pub fn new(config: GameConfig, level_set: LevelSet) -> Result<Self, LevelError> {
        let physics = PlatformerPhysics::new(config.gravity, config.jump_probe_distance);
        Self::with_physics(config, level_set, Box::new(physics))
    }

    pub fn with_physics(
        config: GameConfig,
        level_set: LevelSet,
        physics: Box<dyn PhysicsEngine>,
    ) -> Result<Self, LevelError> {
        let level = level_set.load(1)?;
        let player = Player::new(
            level.player_start,
            vec2(config.player_width, config.player_height),
        );
        let camera = FollowCamera::new(
            vec2(config.screen_width, config.screen_height),
            config.camera_smoothing,
        );

        let mut game = Self {
            lives: config.starting_lives,
            config,
            level_set,
            physics,
            level,
            player,
            keys: KeyState::new(),
            camera,
            score: 0,
            level_number: 1,
            level_time: 0.0,
            events: Events::new(),
        };
        game.place_player();
        tracing::info!(level = %game.level.name, "run started");
        Ok(game)
    }

    /// Load the current level number and put the player at its start.
    /// Score and lives are left alone.
    pub fn setup(&mut self) -> Result<(), LevelError> {
        self.level = self.level_set.load(self.level_number)?;
        self.place_player();
        tracing::info!(
            number = self.level_number,
            name = %self.level.name,
            source = %self.level_set.source(self.level_number).label(),
            "level loaded"
        );
        Ok(())
    }

    fn place_player(&mut self) {
        self.player.reset_to(self.level.player_start);
        self.camera.snap_to(self.player.position);
        self.level_time = 0.0;
    }

    /// Clear last frame's events. Call before handling this frame's keys.
    pub fn begin_frame(&mut self) {
        self.events.clear_all();
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Pressed(dir) => self.on_press(dir),
            KeyEvent::Released(dir) => self.on_release(dir),
        }
    }

    fn on_press(&mut self, dir: Direction) {
        self.keys.press(dir);
        let speed = self.config.movement_speed;
        match dir {
            Direction::Up => {
                if self.physics.is_on_ladder(&self.player, &self.level) {
                    self.player.change_y = speed;
                    self.player.on_ladder = true;
                } else if self.physics.can_jump(&self.player, &self.level) {
                    self.player.change_y = self.config.jump_speed;
                    self.events.jump.send(JumpEvent {
                        position: self.player.position,
                    });
                }
            }
            Direction::Down => {
                if self.physics.is_on_ladder(&self.player, &self.level) {
                    self.player.change_y = -speed;
                }
            }
            Direction::Left | Direction::Right => {}
        }
    }

    fn on_release(&mut self, dir: Direction) {
        self.keys.release(dir);
        if dir.is_vertical() && self.physics.is_on_ladder(&self.player, &self.level) {
            self.player.change_y = 0.0;
        } else {
            self.player.on_ladder = false;
        }
    }

    /// Advance one frame. `delta_time` only drives the level timer; movement
    /// is per frame.
    pub fn update(&mut self, delta_time: f32) -> Result<(), LevelError> {
        self.level_time += delta_time;

        self.player.change_x = self.keys.horizontal_velocity(self.config.movement_speed);
        self.player.update_animation();

        self.physics.step(&mut self.player, &mut self.level);
        self.player.clamp_to_bounds(self.config.bounds);
        debug_assert!(self.player.bounds().is_finite(), "player left the finite world");

        let points = collect_coins(
            &self.player,
            &mut self.level,
            self.config.default_coin_points,
            &mut self.events.coin_collected,
        );
        self.score = self.score.saturating_add(points);

        if let Some(cause) = game_over_cause(&self.player, &self.level, self.config.fall_threshold) {
            self.game_over(cause)?;
        }

        if reached_end_of_map(&self.player, &self.level) {
            self.advance_level()?;
        }

        self.camera.follow(self.player.position);
        Ok(())
    }

    fn game_over(&mut self, cause: GameOverCause) -> Result<(), LevelError> {
        self.player.reset_to(self.level.player_start);
        self.lives = self.lives.saturating_sub(1);
        self.events.game_over.send(GameOverEvent {
            cause,
            lives_left: self.lives,
        });
        tracing::info!(?cause, lives = self.lives, "game over");

        if self.lives == 0 {
            self.restart_run()?;
        }
        Ok(())
    }

    fn restart_run(&mut self) -> Result<(), LevelError> {
        let final_score = self.score;
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.level_number = 1;
        self.setup()?;
        self.events.run_restarted.send(RunRestartedEvent { final_score });
        tracing::info!(final_score, "out of lives, run restarted");
        Ok(())
    }

    fn advance_level(&mut self) -> Result<(), LevelError> {
        let completed = self.level_number;
        self.level_number = self.level_number.saturating_add(1);
        self.setup()?;
        self.events.level_complete.send(LevelCompleteEvent {
            completed,
            next: self.level_number,
        });
        Ok(())
    }

    pub fn coins_left(&self) -> usize {
        self.level.coins_left()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::LevelSource;

    const FIRST: &str = r#"(
        name: "First",
        width: 10,
        height: 8,
        player_start: Some((96.0, 110.0)),
        layers: [
            (name: "Platforms", use_spatial_hash: true, tiles: [(col: 0, row: 0, run: 10)]),
            (name: "Coins", use_spatial_hash: true, tiles: [
                (col: 3, row: 1, scale: 0.5, properties: {"Points": 7.0}),
            ]),
            (name: "Ladders", tiles: [(col: 6, row: 1), (col: 6, row: 2), (col: 6, row: 3)]),
            (name: "Don't Touch", tiles: [(col: 8, row: 1, scale: 0.5)]),
        ],
    )"#;

    const SECOND: &str = r#"(
        name: "Second",
        width: 12,
        height: 8,
        player_start: Some((160.0, 110.0)),
        layers: [
            (name: "Platforms", use_spatial_hash: true, tiles: [(col: 0, row: 0, run: 12)]),
        ],
    )"#;

    fn new_game() -> Game {
        let set = LevelSet::new(vec![
            LevelSource::Embedded { name: "first", bytes: FIRST.as_bytes() },
            LevelSource::Embedded { name: "second", bytes: SECOND.as_bytes() },
        ]);
        Game::new(GameConfig::default(), set).unwrap()
    }

    #[test]
    fn test_new_game_state() {
        let game = new_game();
        assert_eq!(game.level.name, "First");
        assert_eq!(game.level_number, 1);
        assert_eq!(game.lives, 5);
        assert_eq!(game.score, 0);
        assert_eq!(game.player.position, vec2(96.0, 110.0));
        assert_eq!(game.coins_left(), 1);
    }

    #[test]
    fn test_left_only_moves_left() {
        let mut game = new_game();
        game.handle_key(KeyEvent::Pressed(Direction::Left));
        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.player.change_x, -5.0);

        game.handle_key(KeyEvent::Pressed(Direction::Right));
        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.player.change_x, 0.0);

        game.handle_key(KeyEvent::Released(Direction::Left));
        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.player.change_x, 5.0);
    }

    #[test]
    fn test_fall_off_map_game_over_once() {
        let mut game = new_game();
        game.player.position.y = -150.0;
        game.player.change_x = 3.0;

        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.lives, 4);
        assert_eq!(game.player.position, game.level.player_start);
        assert_eq!(game.player.change_y, 0.0);
        assert_eq!(game.events.game_over.len(), 1);
        assert_eq!(
            game.events.game_over.iter().next().map(|e| e.cause),
            Some(GameOverCause::FellOffMap)
        );

        // Back at the start; no second transition
        game.begin_frame();
        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.lives, 4);
        assert!(game.events.game_over.is_empty());
    }

    #[test]
    fn test_hazard_game_over() {
        let mut game = new_game();
        // Spikes at column 8, row 1
        game.player.set_left(530.0);
        game.player.set_bottom(64.0);
        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.lives, 4);
        assert_eq!(
            game.events.game_over.iter().next().map(|e| e.cause),
            Some(GameOverCause::Hazard)
        );
    }

    #[test]
    fn test_out_of_lives_restarts_run() {
        let mut game = new_game();
        game.score = 42;
        game.lives = 1;
        game.level_number = 2;
        game.setup().unwrap();
        assert_eq!(game.level.name, "Second");

        game.player.position.y = -500.0;
        game.update(1.0 / 60.0).unwrap();

        assert_eq!(game.lives, 5);
        assert_eq!(game.score, 0);
        assert_eq!(game.level_number, 1);
        assert_eq!(game.level.name, "First");
        let restart = game.events.run_restarted.iter().next().copied();
        assert_eq!(restart, Some(RunRestartedEvent { final_score: 42 }));
    }

    #[test]
    fn test_level_advances_once_per_crossing() {
        let mut game = new_game();
        game.score = 9;
        game.player.position.x = game.level.end_of_map();

        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.level_number, 2);
        assert_eq!(game.level.name, "Second");
        assert_eq!(game.player.position, vec2(160.0, 110.0));
        assert_eq!(game.events.level_complete.len(), 1);
        assert_eq!(game.score, 9);
        assert_eq!(game.lives, 5);

        game.begin_frame();
        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.level_number, 2);
        assert!(game.events.level_complete.is_empty());
    }

    #[test]
    fn test_level_numbers_wrap() {
        let mut game = new_game();
        for expected in ["Second", "First", "Second"] {
            game.player.position.x = game.level.end_of_map() + 10.0;
            game.update(1.0 / 60.0).unwrap();
            assert_eq!(game.level.name, expected);
        }
        assert_eq!(game.level_number, 4);
    }

    #[test]
    fn test_coin_collected_once() {
        let mut game = new_game();
        game.player.position.x = 224.0;

        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.score, 7);
        assert_eq!(game.coins_left(), 0);
        assert_eq!(game.events.coin_collected.len(), 1);

        game.update(1.0 / 60.0).unwrap();
        assert_eq!(game.score, 7);
        assert_eq!(game.events.coin_collected.len(), 1);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut game = new_game();
        game.handle_key(KeyEvent::Pressed(Direction::Up));
        assert_eq!(game.player.change_y, 20.0);
        assert_eq!(game.events.jump.len(), 1);

        // Mid-air: no double jump
        game.player.position.y = 400.0;
        game.player.change_y = -3.0;
        game.handle_key(KeyEvent::Released(Direction::Up));
        game.handle_key(KeyEvent::Pressed(Direction::Up));
        assert_eq!(game.player.change_y, -3.0);
        assert_eq!(game.events.jump.len(), 1);

        game.begin_frame();
        assert!(game.events.jump.is_empty());
    }

    #[test]
    fn test_ladder_keys() {
        let mut game = new_game();
        // Ladder at column 6
        game.player.position = vec2(416.0, 160.0);

        game.handle_key(KeyEvent::Pressed(Direction::Up));
        assert_eq!(game.player.change_y, 5.0);
        assert!(game.player.on_ladder);
        assert!(game.events.jump.is_empty());

        game.handle_key(KeyEvent::Released(Direction::Up));
        assert_eq!(game.player.change_y, 0.0);
        assert!(game.player.on_ladder);

        game.handle_key(KeyEvent::Pressed(Direction::Down));
        assert_eq!(game.player.change_y, -5.0);

        // Any non-vertical release drops the ladder flag
        game.handle_key(KeyEvent::Pressed(Direction::Left));
        game.handle_key(KeyEvent::Released(Direction::Left));
        assert!(!game.player.on_ladder);
    }

    #[test]
    fn test_timer_resets_per_level() {
        let mut game = new_game();
        game.update(0.5).unwrap();
        game.update(0.25).unwrap();
        assert!((game.level_time - 0.75).abs() < 1e-6);

        game.player.position.x = game.level.end_of_map();
        game.update(0.5).unwrap();
        assert_eq!(game.level_time, 0.0);
    }
}
