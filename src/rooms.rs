//! Carving a single room into a [`TileGrid`].

use crate::geom::{Point, Rectangle};
use crate::grid::{TileClass, TileGrid};
use crate::rng::RandomSource;

/// A carved room, with its bounds and the centroid of its floor —
/// consumed by `ComplexGenerator` when planning corridors.
#[derive(Debug, Clone, Copy)]
pub struct Room {
    pub bounds: Rectangle,
    pub floor_centroid: Point,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoomGenerator;

impl RoomGenerator {
    /// Fills the interior with Floor, the perimeter with WallRoom, corners
    /// with Corner.
    pub fn make_room(&self, grid: &mut TileGrid, bounds: Rectangle) -> Room {
        for y in bounds.top()..bounds.bottom() {
            for x in bounds.left()..bounds.right() {
                let on_left = x == bounds.left();
                let on_right = x == bounds.right() - 1;
                let on_top = y == bounds.top();
                let on_bottom = y == bounds.bottom() - 1;
                let tile = if (on_left || on_right) && (on_top || on_bottom) {
                    TileClass::Corner
                } else if on_left || on_right || on_top || on_bottom {
                    TileClass::WallRoom
                } else {
                    TileClass::Floor
                };
                grid.set(x, y, tile);
            }
        }
        Room {
            bounds,
            floor_centroid: bounds.centroid(),
        }
    }

    /// Unions 1-4 random sub-rectangles fully inside `bounds`; the union's
    /// perimeter becomes WallRoom/Corner. Floor set stays 4-connected
    /// because every sub-rectangle overlaps the first one.
    pub fn make_poly_room(&self, grid: &mut TileGrid, rng: &mut RandomSource, bounds: Rectangle) -> Room {
        let count = rng.next_int(1, 4);
        let mut floor = vec![vec![false; bounds.height as usize]; bounds.width as usize];

        let sub_rect = |rng: &mut RandomSource| -> Rectangle {
            let w = rng.next_int(2.min(bounds.width), bounds.width);
            let h = rng.next_int(2.min(bounds.height), bounds.height);
            let x = bounds.x + rng.next_int(0, bounds.width - w);
            let y = bounds.y + rng.next_int(0, bounds.height - h);
            Rectangle::new(x, y, w, h)
        };

        // First sub-rectangle always touches the room's centroid column so
        // every later sub-rectangle chosen to overlap it keeps the union
        // 4-connected.
        let first = sub_rect(rng);
        mark_floor(&mut floor, bounds, first);

        for _ in 1..count {
            let mut placed = false;
            for _ in 0..20 {
                let r = sub_rect(rng);
                if rectangle_touches_marked(&floor, bounds, r) {
                    mark_floor(&mut floor, bounds, r);
                    placed = true;
                    break;
                }
            }
            if !placed {
                break;
            }
        }

        paint_union(grid, bounds, &floor);
        Room {
            bounds,
            floor_centroid: bounds.centroid(),
        }
    }

    /// Runs a short cellular automaton restricted to `bounds`; alive cells
    /// become Floor, the rest stay Wall.
    pub fn make_cave_room(&self, grid: &mut TileGrid, rng: &mut RandomSource, bounds: Rectangle) -> Room {
        let w = bounds.width as usize;
        let h = bounds.height as usize;
        let mut cells = vec![false; w * h];
        for c in cells.iter_mut() {
            *c = rng.chance(0.45);
        }

        for _ in 0..3 {
            let mut next = cells.clone();
            for y in 0..h {
                for x in 0..w {
                    let alive_neighbors = neighbor_count(&cells, w, h, x, y);
                    next[y * w + x] = if cells[y * w + x] {
                        alive_neighbors >= 4
                    } else {
                        alive_neighbors >= 5
                    };
                }
            }
            cells = next;
        }

        for y in 0..h {
            for x in 0..w {
                let tile = if cells[y * w + x] { TileClass::Floor } else { TileClass::Wall };
                grid.set(bounds.x + x as i32, bounds.y + y as i32, tile);
            }
        }

        Room {
            bounds,
            floor_centroid: bounds.centroid(),
        }
    }
}

fn mark_floor(floor: &mut [Vec<bool>], bounds: Rectangle, r: Rectangle) {
    for y in r.top()..r.bottom() {
        for x in r.left()..r.right() {
            let (lx, ly) = (x - bounds.x, y - bounds.y);
            if lx >= 0 && ly >= 0 && (lx as usize) < floor.len() && (ly as usize) < floor[0].len() {
                floor[lx as usize][ly as usize] = true;
            }
        }
    }
}

fn rectangle_touches_marked(floor: &[Vec<bool>], bounds: Rectangle, r: Rectangle) -> bool {
    for y in r.top()..r.bottom() {
        for x in r.left()..r.right() {
            let (lx, ly) = (x - bounds.x, y - bounds.y);
            if lx >= 0 && ly >= 0 && (lx as usize) < floor.len() && (ly as usize) < floor[0].len() && floor[lx as usize][ly as usize] {
                return true;
            }
        }
    }
    false
}

fn paint_union(grid: &mut TileGrid, bounds: Rectangle, floor: &[Vec<bool>]) {
    let w = bounds.width as usize;
    let h = bounds.height as usize;
    for ly in 0..h {
        for lx in 0..w {
            if !floor[lx][ly] {
                continue;
            }
            let (x, y) = (bounds.x + lx as i32, bounds.y + ly as i32);
            let on_edge = [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)].iter().any(|&(dx, dy)| {
                let (nx, ny) = (lx as i32 + dx, ly as i32 + dy);
                nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h || !floor[nx as usize][ny as usize]
            });
            grid.set(x, y, if on_edge { TileClass::WallRoom } else { TileClass::Floor });
        }
    }
}

fn neighbor_count(cells: &[bool], w: usize, h: usize, x: usize, y: usize) -> usize {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_room_has_wall_perimeter_and_corners() {
        let mut grid = TileGrid::new(10, 10);
        let bounds = Rectangle::new(1, 1, 6, 6);
        RoomGenerator.make_room(&mut grid, bounds);
        assert_eq!(grid[(1, 1)], TileClass::Corner);
        assert_eq!(grid[(3, 1)], TileClass::WallRoom);
        assert_eq!(grid[(3, 3)], TileClass::Floor);
    }

    #[test]
    fn make_poly_room_stays_connected() {
        let mut grid = TileGrid::new(20, 20);
        let mut rng = RandomSource::with_seed(3);
        let bounds = Rectangle::new(2, 2, 14, 14);
        RoomGenerator.make_poly_room(&mut grid, &mut rng, bounds);
        let components = grid.walkable_components();
        assert_eq!(components.len(), 1);
    }
}
