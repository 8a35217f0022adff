//! Non-overlapping axis-aligned rectangle layout: sparse, packed, BSP.

use crate::geom::Rectangle;
use crate::rng::RandomSource;

const MAX_ATTEMPTS_PER_SLOT: u32 = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksGenerator;

impl BlocksGenerator {
    /// Up to `n` rectangles, retried with a bounded attempt budget per
    /// slot; a rectangle may be silently abandoned. No two accepted
    /// rectangles may overlap (edge contact permitted).
    pub fn sparse(
        &self,
        rng: &mut RandomSource,
        w: i32,
        h: i32,
        min_size: i32,
        max_size: i32,
        max_ratio: f64,
        n: u32,
    ) -> Vec<Rectangle> {
        self.place(rng, w, h, min_size, max_size, max_ratio, n)
    }

    /// Same contract as `sparse`; retry discipline is identical here (the
    /// acceptance test — interior-overlap only — is what lets packed
    /// layouts sit edge to edge).
    pub fn packed(
        &self,
        rng: &mut RandomSource,
        w: i32,
        h: i32,
        min_size: i32,
        max_size: i32,
        max_ratio: f64,
        n: u32,
    ) -> Vec<Rectangle> {
        self.place(rng, w, h, min_size, max_size, max_ratio, n)
    }

    fn place(
        &self,
        rng: &mut RandomSource,
        w: i32,
        h: i32,
        min_size: i32,
        max_size: i32,
        max_ratio: f64,
        n: u32,
    ) -> Vec<Rectangle> {
        let mut placed: Vec<Rectangle> = Vec::new();
        for _ in 0..n {
            for _ in 0..MAX_ATTEMPTS_PER_SLOT {
                let rw = rng.next_int(min_size, max_size);
                let rh = rng.next_int(min_size, max_size);
                if rw == 0 || rh == 0 {
                    continue;
                }
                let ratio = (rw as f64 / rh as f64).max(rh as f64 / rw as f64);
                if ratio > max_ratio {
                    continue;
                }
                if rw >= w || rh >= h {
                    continue;
                }
                let rx = rng.next_int(0, w - rw - 1);
                let ry = rng.next_int(0, h - rh - 1);
                let candidate = Rectangle::new(rx, ry, rw, rh);
                if placed.iter().any(|r| r.overlaps(&candidate)) {
                    continue;
                }
                placed.push(candidate);
                break;
            }
        }
        placed
    }

    /// Recursive binary space partition. Tiles `w x h` exactly: areas sum
    /// to `w * h`, no gaps, no overlaps.
    pub fn bsp(&self, rng: &mut RandomSource, w: i32, h: i32, min_size: i32, max_size: i32) -> Vec<Rectangle> {
        let mut leaves = Vec::new();
        split(rng, Rectangle::new(0, 0, w, h), min_size, max_size, &mut leaves);
        leaves
    }
}

fn split(
    rng: &mut RandomSource,
    area: Rectangle,
    min_size: i32,
    max_size: i32,
    out: &mut Vec<Rectangle>,
) {
    let can_split_horizontally = area.width >= 2 * min_size;
    let can_split_vertically = area.height >= 2 * min_size;
    let small_enough = area.width <= max_size && area.height <= max_size;

    let should_split = if small_enough {
        rng.chance(0.3) && (can_split_horizontally || can_split_vertically)
    } else {
        can_split_horizontally || can_split_vertically
    };

    if !should_split {
        out.push(area);
        return;
    }

    let split_horizontally = if can_split_horizontally && can_split_vertically {
        area.width > area.height || (area.width == area.height && rng.chance(0.5))
    } else {
        can_split_horizontally
    };

    if split_horizontally {
        let at = rng.next_int(min_size, area.width - min_size);
        let left = Rectangle::new(area.x, area.y, at, area.height);
        let right = Rectangle::new(area.x + at, area.y, area.width - at, area.height);
        split(rng, left, min_size, max_size, out);
        split(rng, right, min_size, max_size, out);
    } else {
        let at = rng.next_int(min_size, area.height - min_size);
        let top = Rectangle::new(area.x, area.y, area.width, at);
        let bottom = Rectangle::new(area.x, area.y + at, area.width, area.height - at);
        split(rng, top, min_size, max_size, out);
        split(rng, bottom, min_size, max_size, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairwise_disjoint(rects: &[Rectangle]) -> bool {
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                if rects[i].overlaps(&rects[j]) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn bsp_tiles_full_area_exactly() {
        let mut rng = RandomSource::with_seed(42);
        let rects = BlocksGenerator.bsp(&mut rng, 40, 30, 5, 12);
        let total: i64 = rects.iter().map(|r| r.area()).sum();
        assert_eq!(total, 40 * 30);
        assert!(pairwise_disjoint(&rects));
    }

    #[test]
    fn sparse_respects_bounds_and_ratio() {
        let mut rng = RandomSource::with_seed(42);
        let rects = BlocksGenerator.sparse(&mut rng, 20, 10, 3, 5, 2.0, 4);
        assert!(!rects.is_empty());
        for r in &rects {
            assert!(r.x >= 0 && r.y >= 0);
            assert!(r.right() <= 20 && r.bottom() <= 10);
            assert!(r.width >= 3 && r.width <= 5);
            assert!(r.height >= 3 && r.height <= 5);
        }
        assert!(pairwise_disjoint(&rects));
    }

    #[test]
    fn packed_allows_edge_contact() {
        let mut rng = RandomSource::with_seed(7);
        let rects = BlocksGenerator.packed(&mut rng, 30, 30, 3, 6, 3.0, 12);
        assert!(pairwise_disjoint(&rects));
    }

    #[test]
    fn bsp_deterministic_for_seed() {
        let mut a = RandomSource::with_seed(99);
        let mut b = RandomSource::with_seed(99);
        let ra = BlocksGenerator.bsp(&mut a, 50, 40, 4, 10);
        let rb = BlocksGenerator.bsp(&mut b, 50, 40, 4, 10);
        assert_eq!(ra, rb);
    }
}
