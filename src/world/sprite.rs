//! Sprites and sprite lists
//!
//! A `Sprite` here is pure geometry plus tile properties; drawing is the
//! renderer's job. A `SpriteList` is one named layer of a level and can be
//! backed by a spatial hash when its contents never move.

use std::cell::RefCell;
use std::collections::BTreeMap;

use macroquad::math::Vec2;

use super::geometry::Aabb;
use super::spatial_hash::SpatialHash;

/// Tile property holding a coin's score value
pub const PROP_POINTS: &str = "Points";
/// Moving platform properties (same names Tiled maps use)
pub const PROP_BOUNDARY_LEFT: &str = "boundary_left";
pub const PROP_BOUNDARY_RIGHT: &str = "boundary_right";
pub const PROP_BOUNDARY_BOTTOM: &str = "boundary_bottom";
pub const PROP_BOUNDARY_TOP: &str = "boundary_top";
pub const PROP_CHANGE_X: &str = "change_x";
pub const PROP_CHANGE_Y: &str = "change_y";

/// A placed tile or object
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub bounds: Aabb,
    /// Per-frame velocity (only moving platforms use this)
    pub velocity: Vec2,
    pub properties: BTreeMap<String, f32>,
}

impl Sprite {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            velocity: Vec2::ZERO,
            properties: BTreeMap::new(),
        }
    }

    pub fn property(&self, key: &str) -> Option<f32> {
        self.properties.get(key).copied()
    }

    /// Score value of a coin, if the tile defines one.
    /// Fractional values are truncated.
    pub fn points(&self) -> Option<u32> {
        self.property(PROP_POINTS)
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(|p| p.trunc() as u32)
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.bounds = self.bounds.translated(offset);
    }
}

/// One layer of sprites
pub struct SpriteList {
    sprites: Vec<Sprite>,
    hash: Option<SpatialHash>,
    /// Scratch buffer for hash queries, reused across calls
    candidates: RefCell<Vec<usize>>,
}

impl SpriteList {
    pub fn new() -> Self {
        Self {
            sprites: Vec::new(),
            hash: None,
            candidates: RefCell::new(Vec::new()),
        }
    }

    /// Create a list whose overlap queries go through a spatial hash.
    /// Only for layers that don't move: sprites are hashed on insert.
    pub fn with_spatial_hash(cell_size: f32) -> Self {
        Self {
            sprites: Vec::new(),
            hash: Some(SpatialHash::new(cell_size)),
            candidates: RefCell::new(Vec::new()),
        }
    }

    pub fn uses_spatial_hash(&self) -> bool {
        self.hash.is_some()
    }

    pub fn push(&mut self, sprite: Sprite) {
        let idx = self.sprites.len();
        if let Some(hash) = &mut self.hash {
            hash.insert(idx, &sprite.bounds);
        }
        self.sprites.push(sprite);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    /// Mutable access for kinematic layers. Panics on a hashed list,
    /// since moving a hashed sprite would leave the hash stale.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        assert!(self.hash.is_none(), "hashed sprite lists are static");
        self.sprites.iter_mut()
    }

    /// Indices of every sprite overlapping `bounds`, ascending
    pub fn overlapping(&self, bounds: &Aabb) -> Vec<usize> {
        let mut found = Vec::new();
        self.visit_overlaps(bounds, |i| found.push(i));
        found
    }

    /// True if any sprite overlaps `bounds`
    pub fn any_overlap(&self, bounds: &Aabb) -> bool {
        let mut hit = false;
        self.visit_overlaps(bounds, |_| hit = true);
        hit
    }

    /// Visit every sprite overlapping `bounds`
    pub fn for_each_overlap(&self, bounds: &Aabb, mut f: impl FnMut(&Sprite)) {
        self.visit_overlaps(bounds, |i| f(&self.sprites[i]));
    }

    /// Call `f` with the index of each overlapping sprite, ascending.
    /// The scratch buffer is taken out for the duration of the walk, so
    /// a nested query from inside `f` just gets a fresh one.
    fn visit_overlaps(&self, bounds: &Aabb, mut f: impl FnMut(usize)) {
        match &self.hash {
            Some(hash) => {
                let mut buf = self.candidates.take();
                hash.query_into(bounds, &mut buf);
                for &i in &buf {
                    if self.sprites[i].bounds.overlaps(bounds) {
                        f(i);
                    }
                }
                self.candidates.replace(buf);
            }
            None => {
                for (i, sprite) in self.sprites.iter().enumerate() {
                    if sprite.bounds.overlaps(bounds) {
                        f(i);
                    }
                }
            }
        }
    }

    /// Remove the sprites at `indices` and return them.
    /// The hash is rebuilt since indices shift.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Sprite> {
        if indices.is_empty() {
            return Vec::new();
        }
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = Vec::with_capacity(sorted.len());
        for &i in sorted.iter().rev() {
            if i < self.sprites.len() {
                removed.push(self.sprites.remove(i));
            }
        }
        removed.reverse();

        if let Some(hash) = &mut self.hash {
            hash.clear();
            for (i, sprite) in self.sprites.iter().enumerate() {
                hash.insert(i, &sprite.bounds);
            }
        }
        removed
    }
}

impl Default for SpriteList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn coin_at(x: f32) -> Sprite {
        Sprite::new(Aabb::from_center(vec2(x, 96.0), vec2(32.0, 32.0)))
    }

    #[test]
    fn test_points_property() {
        assert_eq!(coin_at(0.0).points(), None);
        let mut coin = coin_at(0.0);
        coin.properties.insert(PROP_POINTS.to_string(), 10.0);
        assert_eq!(coin.points(), Some(10));
        coin.properties.insert(PROP_POINTS.to_string(), 2.7);
        assert_eq!(coin.points(), Some(2));
        coin.properties.insert(PROP_POINTS.to_string(), 0.5);
        assert_eq!(coin.points(), Some(0));
        coin.properties.insert(PROP_POINTS.to_string(), -3.0);
        assert_eq!(coin.points(), None);
    }

    #[test]
    fn test_hashed_and_plain_lists_agree() {
        let mut plain = SpriteList::new();
        let mut hashed = SpriteList::with_spatial_hash(64.0);
        for x in (128..1250).step_by(256) {
            plain.push(coin_at(x as f32));
            hashed.push(coin_at(x as f32));
        }

        let query = Aabb::from_center(vec2(384.0, 100.0), vec2(44.0, 92.0));
        assert_eq!(plain.overlapping(&query), vec![1]);
        assert_eq!(hashed.overlapping(&query), vec![1]);
        assert!(hashed.any_overlap(&query));

        let mut seen = 0;
        hashed.for_each_overlap(&query, |_| seen += 1);
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_repeated_queries_reuse_scratch() {
        let mut list = SpriteList::with_spatial_hash(64.0);
        for x in (128..1250).step_by(256) {
            list.push(coin_at(x as f32));
        }
        let wide = Aabb::from_center(vec2(500.0, 96.0), vec2(400.0, 40.0));
        let narrow = Aabb::from_center(vec2(128.0, 96.0), vec2(10.0, 10.0));

        for _ in 0..3 {
            assert_eq!(list.overlapping(&wide), vec![1, 2]);
            assert!(list.any_overlap(&narrow));
            let mut seen = Vec::new();
            list.for_each_overlap(&wide, |s| seen.push(s.bounds.center().x));
            assert_eq!(seen, vec![384.0, 640.0]);
        }

        // A query from inside a visit sees its own results
        let mut nested = Vec::new();
        list.for_each_overlap(&wide, |_| nested.push(list.overlapping(&narrow)));
        assert_eq!(nested, vec![vec![0], vec![0]]);
        assert_eq!(list.overlapping(&wide), vec![1, 2]);
    }

    #[test]
    fn test_remove_rebuilds_hash() {
        let mut list = SpriteList::with_spatial_hash(64.0);
        list.push(coin_at(128.0));
        list.push(coin_at(384.0));
        list.push(coin_at(640.0));

        let removed = list.remove_indices(&[0, 0]);
        assert_eq!(removed.len(), 1);
        assert_eq!(list.len(), 2);

        // The coin that moved from index 2 to 1 is still found
        let query = Aabb::from_center(vec2(640.0, 96.0), vec2(10.0, 10.0));
        assert_eq!(list.overlapping(&query), vec![1]);

        // Nothing left where the removed coin was
        let query = Aabb::from_center(vec2(128.0, 96.0), vec2(10.0, 10.0));
        assert!(list.overlapping(&query).is_empty());
    }
}
