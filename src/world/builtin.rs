//! Built-in fallback level
//!
//! A flat grass strip with three crates and a row of coins. Used when no
//! level files are configured and none were embedded at build time, so the
//! game always has something to play.

use super::level::{LayerData, LevelData, TileData};
use super::sprite::PROP_POINTS;

fn tile(col: i32, row: i32) -> TileData {
    TileData {
        col,
        row,
        run: 1,
        scale: 1.0,
        properties: Default::default(),
    }
}

/// Build the fallback level description
pub fn starter_level() -> LevelData {
    let ground = TileData { run: 20, ..tile(0, 0) };
    let crates = [4, 8, 12].into_iter().map(|col| tile(col, 1));

    let coins = (2..20).step_by(4).map(|col| {
        let mut coin = TileData { scale: 0.5, ..tile(col, 1) };
        coin.properties.insert(PROP_POINTS.to_string(), 1.0);
        coin
    });

    LevelData {
        name: "Starter".to_string(),
        tile_size: 64.0,
        width: 20,
        height: 10,
        background: (100, 149, 237),
        player_start: Some((64.0, 128.0)),
        layers: vec![
            LayerData {
                name: "Platforms".to_string(),
                use_spatial_hash: true,
                tiles: std::iter::once(ground).chain(crates).collect(),
            },
            LayerData {
                name: "Coins".to_string(),
                use_spatial_hash: true,
                tiles: coins.collect(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Level, LayerKind};

    #[test]
    fn test_starter_level_builds() {
        let level = Level::from_data(&starter_level()).unwrap();
        assert_eq!(level.layer(LayerKind::Platforms).unwrap().len(), 23);
        assert_eq!(level.coins_left(), 5);
        assert_eq!(level.end_of_map(), 1280.0);
    }
}
