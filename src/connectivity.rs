//! Shared connectivity-repair subroutine used by every area generator.
//!
//! Carves single-bend (L-shaped) corridors from the largest walkable
//! component's centroid to the nearest point of each other component,
//! re-checking the component count after every carve, until at most one
//! component remains. The bend direction (horizontal leg first vs.
//! vertical leg first) is drawn uniformly at random per spec.md §4.7.

use crate::geom::Point;
use crate::grid::{TileClass, TileGrid};
use crate::rng::RandomSource;

/// Returns the number of corridors carved.
pub fn repair_connectivity(rng: &mut RandomSource, grid: &mut TileGrid) -> u32 {
    let mut carved = 0;
    let budget = (grid.width() * grid.height()) as u32 + 1;

    loop {
        let mut components = grid.walkable_components();
        if components.len() <= 1 {
            return carved;
        }
        components.sort_by_key(|c| std::cmp::Reverse(c.len()));
        let centroid = centroid_of(&components[0]);
        let anchor = nearest_point_to(&components[0], centroid);

        let mut nearest: Option<(Point, i32)> = None;
        for other in &components[1..] {
            for &p in other {
                let d = (p.x - anchor.x).abs() + (p.y - anchor.y).abs();
                if nearest.is_none_or(|(_, best)| d < best) {
                    nearest = Some((p, d));
                }
            }
        }
        let Some((target, _)) = nearest else {
            return carved;
        };

        carve_l_corridor(grid, anchor, target, rng.chance(0.5));
        carved += 1;
        if carved >= budget {
            return carved;
        }
    }
}

fn centroid_of(points: &[Point]) -> Point {
    let n = points.len() as i32;
    let sx: i32 = points.iter().map(|p| p.x).sum();
    let sy: i32 = points.iter().map(|p| p.y).sum();
    Point::new(sx / n, sy / n)
}

/// The arithmetic centroid of an irregular (e.g. concave) component need
/// not be a member of the component itself; the corridor has to start
/// from an actual walkable tile or it never touches the component it's
/// meant to join.
fn nearest_point_to(points: &[Point], target: Point) -> Point {
    *points
        .iter()
        .min_by_key(|p| (p.x - target.x).abs() + (p.y - target.y).abs())
        .expect("component is non-empty")
}

/// `horizontal_first` selects which leg of the L is carved from `from`:
/// true carves along `from.y` toward `to.x` before dropping down the
/// column at `to.x`; false carves along `from.x` toward `to.y` first.
fn carve_l_corridor(grid: &mut TileGrid, from: Point, to: Point, horizontal_first: bool) {
    if horizontal_first {
        let step_x = if to.x >= from.x { 1 } else { -1 };
        let mut x = from.x;
        while x != to.x {
            set_corridor(grid, x, from.y);
            x += step_x;
        }
        set_corridor(grid, x, from.y);

        let step_y = if to.y >= from.y { 1 } else { -1 };
        let mut y = from.y;
        while y != to.y {
            set_corridor(grid, to.x, y);
            y += step_y;
        }
        set_corridor(grid, to.x, to.y);
    } else {
        let step_y = if to.y >= from.y { 1 } else { -1 };
        let mut y = from.y;
        while y != to.y {
            set_corridor(grid, from.x, y);
            y += step_y;
        }
        set_corridor(grid, from.x, y);

        let step_x = if to.x >= from.x { 1 } else { -1 };
        let mut x = from.x;
        while x != to.x {
            set_corridor(grid, x, to.y);
            x += step_x;
        }
        set_corridor(grid, to.x, to.y);
    }
}

fn set_corridor(grid: &mut TileGrid, x: i32, y: i32) {
    if grid.in_bounds(x, y) && grid[(x, y)].is_wall() {
        grid.set(x, y, TileClass::Corridor);
    }
}
