//! Cellular-automaton cave generation.

use crate::connectivity::repair_connectivity;
use crate::grid::{TileClass, TileGrid};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct CaveGenerator;

impl CaveGenerator {
    /// Moore-neighborhood cellular automaton: cells start alive with
    /// probability `sparseness/10`, then 4 iterations of birth>=5/survive>=4,
    /// then connectivity repair so the floor forms one component. The outer
    /// ring is forced back to `Wall` afterward (invariant 1, §3).
    pub fn generate_open_cave(&self, rng: &mut RandomSource, w: i32, h: i32, sparseness: i32) -> TileGrid {
        let (uw, uh) = (w as usize, h as usize);
        let probability = sparseness as f64 / 10.0;
        let mut cells = vec![false; uw * uh];
        for c in cells.iter_mut() {
            *c = rng.chance(probability);
        }

        for _ in 0..4 {
            let mut next = cells.clone();
            for y in 0..uh {
                for x in 0..uw {
                    let alive_neighbors = moore_neighbor_count(&cells, uw, uh, x, y);
                    next[y * uw + x] = if cells[y * uw + x] {
                        alive_neighbors >= 4
                    } else {
                        alive_neighbors >= 5
                    };
                }
            }
            cells = next;
        }

        let mut grid = TileGrid::new(uw, uh);
        for y in 0..uh {
            for x in 0..uw {
                let on_border = x == 0 || y == 0 || x == uw - 1 || y == uh - 1;
                let tile = if !on_border && cells[y * uw + x] { TileClass::Floor } else { TileClass::Wall };
                grid.set(x as i32, y as i32, tile);
            }
        }

        repair_connectivity(rng, &mut grid);
        grid
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
