//! Island/lake/river features painted onto a [`TerrainGrid`], and the
//! wilderness-zone composition that drives them from a [`RegionTheme`].

use crate::geom::Rectangle;
use crate::rng::{Dice, RandomSource};
use crate::terrain::{TerrainCell, TerrainGrid};
use crate::theme::RegionTheme;

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureGenerator;

impl FeatureGenerator {
    /// Cellular-automaton lake confined to `bounds`: fill at 45%, 4 rounds
    /// of birth>=5/survive>=4 (same rule as `CaveGenerator`), alive cells
    /// become `water_id`. Every painted tile lies within `bounds`.
    pub fn lake(&self, rng: &mut RandomSource, terrain: &mut TerrainGrid, water_id: &str, bounds: Rectangle) {
        let w = bounds.width as usize;
        let h = bounds.height as usize;
        let mut cells = vec![false; w * h];
        for c in cells.iter_mut() {
            *c = rng.chance(0.45);
        }
        for _ in 0..4 {
            let mut next = cells.clone();
            for y in 0..h {
                for x in 0..w {
                    let alive = moore_neighbor_count(&cells, w, h, x, y);
                    next[y * w + x] = if cells[y * w + x] { alive >= 4 } else { alive >= 5 };
                }
            }
            cells = next;
        }
        for y in 0..h {
            for x in 0..w {
                if cells[y * w + x] {
                    terrain.set(bounds.x + x as i32, bounds.y + y as i32, Some(TerrainCell::new(water_id)));
                }
            }
        }
    }

    /// Walks a bounded-turn random path from one randomly chosen edge to
    /// the opposite edge, painting a `width`-wide band of `water_id` along
    /// the way.
    pub fn river(&self, rng: &mut RandomSource, terrain: &mut TerrainGrid, water_id: &str, width: i32) {
        let w = terrain.width() as i32;
        let h = terrain.height() as i32;
        if w == 0 || h == 0 {
            return;
        }
        let horizontal = rng.chance(0.5);
        let (mut x, mut y, dx, dy) = if horizontal {
            (0, rng.next_int(0, h - 1), 1, 0)
        } else {
            (rng.next_int(0, w - 1), 0, 0, 1)
        };
        let mut drift = 0i32;
        while x < w && y < h && x >= 0 && y >= 0 {
            paint_band(terrain, x, y, width, horizontal, water_id);
            if horizontal {
                x += dx;
            } else {
                y += dy;
            }
            drift += rng.next_int(-1, 1);
            drift = drift.clamp(-2, 2);
            if horizontal {
                y = (y + drift.signum()).clamp(0, h - 1);
            } else {
                x = (x + drift.signum()).clamp(0, w - 1);
            }
        }
    }
}

fn paint_band(terrain: &mut TerrainGrid, x: i32, y: i32, width: i32, horizontal: bool, water_id: &str) {
    let half = width / 2;
    for offset in -half..=half {
        let (px, py) = if horizontal { (x, y + offset) } else { (x + offset, y) };
        terrain.set(px, py, Some(TerrainCell::new(water_id)));
    }
}

fn moore_neighbor_count(cells: &[bool], w: usize, h: usize, x: usize, y: usize) -> usize {
    let mut count = 0;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                continue;
            }
            if cells[ny as usize * w + nx as usize] {
                count += 1;
            }
        }
    }
    count
}

fn neighbor_count_2d(cells: &[Vec<bool>], w: usize, h: usize, x: usize, y: usize) -> u32 {
    let mut count = 0;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                continue;
            }
            if cells[ny as usize][nx as usize] {
                count += 1;
            }
        }
    }
    count
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WildernessGenerator;

impl WildernessGenerator {
    /// `fill_prob/100` initial fill, then `iterations` rounds of "alive iff
    /// alive-neighbors >= min_neighbors". Returns a purely boolean grid —
    /// composing it into terrain strings is the caller's job.
    pub fn islands(&self, rng: &mut RandomSource, w: i32, h: i32, fill_prob: i32, min_neighbors: u32, iterations: u32) -> Vec<Vec<bool>> {
        let (uw, uh) = (w as usize, h as usize);
        let mut cells = vec![vec![false; uw]; uh];
        for row in cells.iter_mut() {
            for c in row.iter_mut() {
                *c = rng.chance(fill_prob as f64 / 100.0);
            }
        }
        for _ in 0..iterations {
            let mut next = cells.clone();
            for y in 0..uh {
                for x in 0..uw {
                    let alive = neighbor_count_2d(&cells, uw, uh, x, y);
                    next[y][x] = alive >= min_neighbors;
                }
            }
            cells = next;
        }
        cells
    }

    /// Combines `islands` (fixed parameters: 45% fill, 4 neighbors, 4
    /// iterations) with vegetation/creature/item annotation sampling: each
    /// `(id, n)` entry in the theme's maps places `1dn` instances on random
    /// walkable (island) tiles. Vegetation occupies the item annotation
    /// slot when no item has already claimed it.
    pub fn generate_terrain_only(&self, rng: &mut RandomSource, bounds: Rectangle, theme: &RegionTheme, texture_id: &str) -> TerrainGrid {
        let mut terrain = TerrainGrid::new(bounds.width as usize, bounds.height as usize);
        let land = self.islands(rng, bounds.width, bounds.height, 45, 4, 4);

        for y in 0..bounds.height as usize {
            for x in 0..bounds.width as usize {
                if land[y][x] {
                    terrain.set(x as i32, y as i32, Some(TerrainCell::new(texture_id)));
                }
            }
        }

        let walkable: Vec<(i32, i32)> = (0..bounds.height as usize)
            .flat_map(|y| (0..bounds.width as usize).map(move |x| (x, y)))
            .filter(|&(x, y)| land[y][x])
            .map(|(x, y)| (x as i32, y as i32))
            .collect();
        if walkable.is_empty() {
            return terrain;
        }

        let dice = Dice;
        for (id, &n) in &theme.creatures {
            let count = dice.roll(rng, 1, n as i32, 0).max(0) as usize;
            place_named(rng, &mut terrain, &walkable, id, count, true);
        }
        for (id, &n) in &theme.items {
            let count = dice.roll(rng, 1, n as i32, 0).max(0) as usize;
            place_named(rng, &mut terrain, &walkable, id, count, false);
        }
        for (id, &n) in &theme.vegetation {
            let count = dice.roll(rng, 1, n as i32, 0).max(0) as usize;
            place_named(rng, &mut terrain, &walkable, id, count, false);
        }

        terrain
    }
}

fn place_named(rng: &mut RandomSource, terrain: &mut TerrainGrid, walkable: &[(i32, i32)], id: &str, count: usize, as_creature: bool) {
    for _ in 0..count {
        let Some(&(x, y)) = rng.pick(walkable) else { continue };
        if let Some(Some(cell)) = terrain.get_mut(x, y) {
            if as_creature && cell.creature.is_none() {
                cell.creature = Some(id.to_string());
            } else if !as_creature && cell.item.is_none() {
                cell.item = Some(id.to_string());
            }
        }
    }
}
