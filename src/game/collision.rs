//! Collectible and hazard resolution
//!
//! Runs after the physics step and bounds clamp. Everything here is a query
//! against the player's hitbox; the state changes that follow (score, lives,
//! respawn) belong to the runtime.

use crate::world::{LayerKind, Level, Sprite};
use super::event::{CoinCollectedEvent, EventQueue, GameOverCause};
use super::player::Player;

/// Remove every coin the player overlaps and return the points they award.
///
/// Coins without a usable `Points` property are worth `default_points` and
/// logged. Collected coins leave the layer, so a second call in the same
/// position awards nothing.
pub fn collect_coins(
    player: &Player,
    level: &mut Level,
    default_points: u32,
    events: &mut EventQueue<CoinCollectedEvent>,
) -> u32 {
    let Some(coins) = level.layer_mut(LayerKind::Coins) else {
        return 0;
    };
    if coins.is_empty() {
        return 0;
    }

    let hits = coins.overlapping(&player.bounds());
    if hits.is_empty() {
        return 0;
    }

    let mut total: u32 = 0;
    for coin in coins.remove_indices(&hits) {
        let points = coin_points(&coin, default_points);
        total = total.saturating_add(points);
        events.send(CoinCollectedEvent {
            points,
            position: coin.bounds.center(),
        });
    }
    tracing::debug!(coins = hits.len(), points = total, "collected coins");
    total
}

fn coin_points(coin: &Sprite, default_points: u32) -> u32 {
    match coin.points() {
        Some(points) => points,
        None => {
            tracing::warn!(
                position = ?coin.bounds.center(),
                default_points,
                "coin has no usable Points property, using default"
            );
            default_points
        }
    }
}

/// True if the player overlaps anything on the Don't Touch layer
pub fn touches_hazard(player: &Player, level: &Level) -> bool {
    level
        .layer(LayerKind::DontTouch)
        .map(|hazards| hazards.any_overlap(&player.bounds()))
        .unwrap_or(false)
}

/// True once the player's center has dropped below `fall_threshold`
pub fn fell_off_map(player: &Player, fall_threshold: f32) -> bool {
    player.position.y < fall_threshold
}

/// Why the player should lose a life this frame, if at all.
/// Falling takes precedence so a hazard at the bottom of a pit reports
/// the fall.
pub fn game_over_cause(player: &Player, level: &Level, fall_threshold: f32) -> Option<GameOverCause> {
    if fell_off_map(player, fall_threshold) {
        Some(GameOverCause::FellOffMap)
    } else if touches_hazard(player, level) {
        Some(GameOverCause::Hazard)
    } else {
        None
    }
}

/// True once the player's center reaches the right edge of the level
pub fn reached_end_of_map(player: &Player, level: &Level) -> bool {
    player.position.x >= level.end_of_map()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{LayerData, LevelData, TileData, PROP_POINTS};
    use macroquad::math::{vec2, Vec2};
    use std::collections::BTreeMap;

    const SIZE: Vec2 = Vec2::new(44.0, 92.0);

    fn tile(col: i32, row: i32, points: Option<f32>) -> TileData {
        let mut properties = BTreeMap::new();
        if let Some(p) = points {
            properties.insert(PROP_POINTS.to_string(), p);
        }
        TileData {
            col,
            row,
            run: 1,
            scale: 0.5,
            properties,
        }
    }

    fn test_level() -> Level {
        Level::from_data(&LevelData {
            name: "coins".to_string(),
            tile_size: 64.0,
            width: 10,
            height: 5,
            background: (0, 0, 0),
            player_start: None,
            layers: vec![
                LayerData {
                    name: "Coins".to_string(),
                    use_spatial_hash: true,
                    tiles: vec![tile(1, 1, Some(10.0)), tile(1, 2, None), tile(6, 1, Some(3.0))],
                },
                LayerData {
                    name: "Don't Touch".to_string(),
                    use_spatial_hash: true,
                    tiles: vec![tile(4, 0, None)],
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_collect_awards_points_and_default() {
        let mut level = test_level();
        let mut events = EventQueue::new();
        // Covers both coins in column 1
        let player = Player::new(vec2(96.0, 128.0), SIZE);

        let points = collect_coins(&player, &mut level, 1, &mut events);
        assert_eq!(points, 11);
        assert_eq!(events.len(), 2);
        assert_eq!(level.coins_left(), 1);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut level = test_level();
        let mut events = EventQueue::new();
        let player = Player::new(vec2(416.0, 96.0), SIZE);

        assert_eq!(collect_coins(&player, &mut level, 1, &mut events), 3);
        assert_eq!(collect_coins(&player, &mut level, 1, &mut events), 0);
        assert_eq!(events.len(), 1);
        assert_eq!(level.coins_left(), 2);
    }

    #[test]
    fn test_nothing_to_collect() {
        let mut level = test_level();
        let mut events = EventQueue::new();
        let player = Player::new(vec2(600.0, 280.0), SIZE);
        assert_eq!(collect_coins(&player, &mut level, 1, &mut events), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_game_over_causes() {
        let level = test_level();

        let on_spikes = Player::new(vec2(288.0, 60.0), SIZE);
        assert!(touches_hazard(&on_spikes, &level));
        assert_eq!(game_over_cause(&on_spikes, &level, -100.0), Some(GameOverCause::Hazard));

        let falling = Player::new(vec2(100.0, -150.0), SIZE);
        assert_eq!(game_over_cause(&falling, &level, -100.0), Some(GameOverCause::FellOffMap));

        // Exactly at the threshold is still in play
        let edge = Player::new(vec2(100.0, -100.0), SIZE);
        assert_eq!(game_over_cause(&edge, &level, -100.0), None);
    }

    #[test]
    fn test_end_of_map() {
        let level = test_level();
        assert_eq!(level.end_of_map(), 640.0);
        assert!(!reached_end_of_map(&Player::new(vec2(639.0, 100.0), SIZE), &level));
        assert!(reached_end_of_map(&Player::new(vec2(640.0, 100.0), SIZE), &level));
    }
}
