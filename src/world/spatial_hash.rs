//! Spatial hash for static layer geometry
//!
//! Buckets sprite indices by grid cell so overlap queries only test the
//! handful of sprites near the query box. A sprite spanning several cells
//! is inserted into each of them.

use rustc_hash::FxHashMap;

use super::geometry::Aabb;

pub struct SpatialHash {
    pub cell_size: f32,
    cells: FxHashMap<(i32, i32), Vec<usize>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    fn cell_key(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Insert `id` into every cell touched by `bounds`
    pub fn insert(&mut self, id: usize, bounds: &Aabb) {
        let (x0, y0) = self.cell_key(bounds.min.x, bounds.min.y);
        let (x1, y1) = self.cell_key(bounds.max.x, bounds.max.y);
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(id);
            }
        }
    }

    /// Write candidate ids for `bounds` into `buf` (cleared first, deduplicated).
    /// Candidates still need an exact overlap test.
    pub fn query_into(&self, bounds: &Aabb, buf: &mut Vec<usize>) {
        buf.clear();
        let (x0, y0) = self.cell_key(bounds.min.x, bounds.min.y);
        let (x1, y1) = self.cell_key(bounds.max.x, bounds.max.y);
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                if let Some(ids) = self.cells.get(&(ix, iy)) {
                    buf.extend_from_slice(ids);
                }
            }
        }
        buf.sort_unstable();
        buf.dedup();
    }
}
