//! Multi-room dungeon composition: sparse, packed, and BSP layouts.

use crate::blocks::BlocksGenerator;
use crate::connectivity::repair_connectivity;
use crate::geom::Rectangle;
use crate::grid::TileGrid;
use crate::rng::RandomSource;
use crate::rooms::RoomGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexGenerator;

impl ComplexGenerator {
    /// `BlocksGenerator.sparse` over the bordered interior, one `make_room`
    /// per rectangle, then connectivity repair.
    pub fn generate_sparse(&self, rng: &mut RandomSource, w: i32, h: i32, n: u32, min_size: i32, max_size: i32) -> TileGrid {
        let mut grid = TileGrid::new(w as usize, h as usize);
        let rects = BlocksGenerator.sparse(rng, w - 2, h - 2, min_size, max_size, 3.0, n);
        for r in rects {
            RoomGenerator.make_room(&mut grid, offset(r));
        }
        repair_connectivity(rng, &mut grid);
        grid
    }

    /// Same as `generate_sparse` but via `BlocksGenerator.packed`, and each
    /// rectangle's room shape is a uniform random choice of `make_room` /
    /// `make_poly_room` / `make_cave_room`.
    pub fn generate_packed(&self, rng: &mut RandomSource, w: i32, h: i32, n: u32, min_size: i32, max_size: i32) -> TileGrid {
        let mut grid = TileGrid::new(w as usize, h as usize);
        let rects = BlocksGenerator.packed(rng, w - 2, h - 2, min_size, max_size, 3.0, n);
        for r in rects {
            let bounds = offset(r);
            match rng.next_int(0, 2) {
                0 => {
                    RoomGenerator.make_room(&mut grid, bounds);
                }
                1 => {
                    RoomGenerator.make_poly_room(&mut grid, rng, bounds);
                }
                _ => {
                    RoomGenerator.make_cave_room(&mut grid, rng, bounds);
                }
            }
        }
        repair_connectivity(rng, &mut grid);
        grid
    }

    /// Recursive BSP over the bordered interior; each leaf gets a
    /// `make_room`, and every pair of leaves sharing a boundary segment is
    /// joined by a corridor carved through that shared wall. A final
    /// connectivity repair pass is a no-op unless some leaf's shared-edge
    /// carve was skipped.
    pub fn generate_bsp(&self, rng: &mut RandomSource, w: i32, h: i32, min_size: i32, max_size: i32) -> TileGrid {
        let mut grid = TileGrid::new(w as usize, h as usize);
        let leaves = BlocksGenerator.bsp(rng, w - 2, h - 2, min_size, max_size);
        let leaves: Vec<Rectangle> = leaves.into_iter().map(offset).collect();
        for r in &leaves {
            RoomGenerator.make_room(&mut grid, *r);
        }
        for i in 0..leaves.len() {
            for j in (i + 1)..leaves.len() {
                if let Some(edge) = shared_boundary(leaves[i], leaves[j]) {
                    carve_boundary(&mut grid, edge);
                }
            }
        }
        repair_connectivity(rng, &mut grid);
        grid
    }
}

fn offset(r: Rectangle) -> Rectangle {
    Rectangle::new(r.x + 1, r.y + 1, r.width, r.height)
}

enum Edge {
    Vertical { x: i32, y: i32 },
    Horizontal { x: i32, y: i32 },
}

fn shared_boundary(a: Rectangle, b: Rectangle) -> Option<Edge> {
    if a.right() == b.left() || b.right() == a.left() {
        let x = a.right().min(b.right());
        let top = a.top().max(b.top());
        let bottom = a.bottom().min(b.bottom());
        if top < bottom {
            return Some(Edge::Vertical { x, y: (top + bottom) / 2 });
        }
    }
    if a.bottom() == b.top() || b.bottom() == a.top() {
        let y = a.bottom().min(b.bottom());
        let left = a.left().max(b.left());
        let right = a.right().min(b.right());
        if left < right {
            return Some(Edge::Horizontal { x: (left + right) / 2, y });
        }
    }
    None
}

fn carve_boundary(grid: &mut TileGrid, edge: Edge) {
    use crate::grid::TileClass;
    match edge {
        Edge::Vertical { x, y } => {
            grid.set(x - 1, y, TileClass::Corridor);
            grid.set(x, y, TileClass::Corridor);
        }
        Edge::Horizontal { x, y } => {
            grid.set(x, y - 1, TileClass::Corridor);
            grid.set(x, y, TileClass::Corridor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bordered_and_connected(grid: &TileGrid) {
        for x in 0..grid.width() {
            assert!(grid[(x as i32, 0)].is_wall());
            assert!(grid[(x as i32, grid.height() as i32 - 1)].is_wall());
        }
        for y in 0..grid.height() {
            assert!(grid[(0, y as i32)].is_wall());
            assert!(grid[(grid.width() as i32 - 1, y as i32)].is_wall());
        }
        assert_eq!(grid.walkable_components().len(), 1);
    }

    #[test]
    fn sparse_is_bordered_and_connected() {
        let mut rng = RandomSource::with_seed(1);
        let grid = ComplexGenerator.generate_sparse(&mut rng, 40, 30, 6, 4, 8);
        bordered_and_connected(&grid);
    }

    #[test]
    fn packed_is_bordered_and_connected() {
        let mut rng = RandomSource::with_seed(2);
        let grid = ComplexGenerator.generate_packed(&mut rng, 40, 30, 8, 4, 8);
        bordered_and_connected(&grid);
    }

    #[test]
    fn bsp_is_bordered_and_connected() {
        let mut rng = RandomSource::with_seed(3);
        let grid = ComplexGenerator.generate_bsp(&mut rng, 40, 30, 5, 12);
        bordered_and_connected(&grid);
    }
}
