//! Recursive-backtracker maze generation.

use std::collections::HashSet;

use crate::geom::Point;
use crate::rng::RandomSource;

pub type WalkableSet = HashSet<Point>;

#[derive(Debug, Clone, Copy, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    /// Cells at odd coordinates, walls on even coordinates. With
    /// probability `randomness/100` the next direction is a uniformly
    /// random unvisited neighbor; otherwise the direction with the fewest
    /// turns so far is preferred. After construction, a `sparseness/100`
    /// fraction of dead ends is pruned repeatedly until no dead end
    /// remains eligible.
    pub fn generate(&self, rng: &mut RandomSource, w: i32, h: i32, sparseness: i32, randomness: i32) -> WalkableSet {
        let mut walkable = backtrack(rng, w, h, randomness, true);
        prune_dead_ends(rng, &mut walkable, sparseness, w, h, true);
        walkable
    }

    /// Same recursive-backtracker on a 1-cell-pitch lattice: no
    /// interleaved wall cells, so corridors sit 1 tile wide with no gap
    /// between them (braided, cave-like result).
    pub fn generate_squashed(&self, rng: &mut RandomSource, w: i32, h: i32, sparseness: i32) -> WalkableSet {
        let mut walkable = backtrack(rng, w, h, 0, false);
        prune_dead_ends(rng, &mut walkable, sparseness, w, h, false);
        walkable
    }
}

fn backtrack(rng: &mut RandomSource, w: i32, h: i32, randomness: i32, wide_lattice: bool) -> WalkableSet {
    let step = if wide_lattice { 2 } else { 1 };
    let mut visited = HashSet::new();
    let mut walkable = HashSet::new();

    let start = Point::new(
        odd_start(rng, w, step),
        odd_start(rng, h, step),
    );
    visited.insert(start);
    walkable.insert(start);

    let mut stack = vec![(start, Vec::<(i32, i32)>::new())];

    while let Some((current, ref mut turn_history)) = stack.last_mut() {
        let current = *current;
        let dirs = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        let mut candidates: Vec<(i32, i32)> = dirs
            .iter()
            .copied()
            .filter(|&(dx, dy)| {
                let next = Point::new(current.x + dx * step, current.y + dy * step);
                in_bounds(next, w, h) && !visited.contains(&next)
            })
            .collect();

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let chosen = if rng.chance(randomness as f64 / 100.0) {
            *rng.pick(&candidates).unwrap()
        } else {
            candidates.sort_by_key(|d| turn_history.last().map(|&last| if last == *d { 0 } else { 1 }).unwrap_or(0));
            candidates[0]
        };
        candidates.clear();

        let next = Point::new(current.x + chosen.0 * step, current.y + chosen.1 * step);
        visited.insert(next);
        walkable.insert(next);
        if step == 2 {
            walkable.insert(Point::new(current.x + chosen.0, current.y + chosen.1));
        }
        turn_history.push(chosen);
        stack.push((next, Vec::new()));
    }

    walkable
}

fn odd_start(rng: &mut RandomSource, extent: i32, step: i32) -> i32 {
    if step == 2 {
        let max_cell = (extent - 2) / 2;
        1 + 2 * rng.next_int(0, max_cell.max(0))
    } else {
        rng.next_int(1, (extent - 2).max(1))
    }
}

fn in_bounds(p: Point, w: i32, h: i32) -> bool {
    p.x > 0 && p.y > 0 && p.x < w - 1 && p.y < h - 1
}

/// The pruning budget is a fraction of the dead-end count as it stood
/// *before* any pruning — cascading removal (a pruned dead end can expose
/// its former neighbor as a new one) keeps going until that fixed budget
/// is spent, not until the whole tree of dead ends is consumed.
fn prune_dead_ends(rng: &mut RandomSource, walkable: &mut WalkableSet, sparseness: i32, w: i32, h: i32, _wide_lattice: bool) {
    if sparseness <= 0 {
        return;
    }
    let dead_ends_now = |walkable: &WalkableSet| -> Vec<Point> {
        let mut v: Vec<Point> = walkable.iter().copied().filter(|&p| in_bounds(p, w, h) && degree(walkable, p) <= 1).collect();
        v.sort_by_key(|p| (p.x, p.y));
        v
    };

    let initial_count = dead_ends_now(walkable).len();
    let budget = ((initial_count as f64) * (sparseness as f64 / 100.0)).ceil() as usize;
    let mut removed = 0;

    while removed < budget {
        let mut candidates = dead_ends_now(walkable);
        if candidates.is_empty() {
            break;
        }
        rng.shuffle(&mut candidates);
        for p in candidates {
            if removed >= budget {
                break;
            }
            if degree(walkable, p) <= 1 {
                walkable.remove(&p);
                removed += 1;
            }
        }
    }
}

fn degree(walkable: &WalkableSet, p: Point) -> usize {
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .iter()
        .filter(|&&(dx, dy)| walkable.contains(&Point::new(p.x + dx, p.y + dy)))
        .count()
}

#[cfg(test)]
fn connected(walkable: &WalkableSet) -> bool {
    let Some(&start) = walkable.iter().next() else {
        return true;
    };
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    seen.insert(start);
    while let Some(p) = stack.pop() {
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let n = Point::new(p.x + dx, p.y + dy);
            if walkable.contains(&n) && !seen.contains(&n) {
                seen.insert(n);
                stack.push(n);
            }
        }
    }
    seen.len() == walkable.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maze_is_connected_and_deterministic() {
        let mut a = RandomSource::with_seed(42);
        let mut b = RandomSource::with_seed(42);
        let set_a = MazeGenerator.generate(&mut a, 21, 21, 10, 50);
        let set_b = MazeGenerator.generate(&mut b, 21, 21, 10, 50);
        assert_eq!(set_a, set_b);
        assert!(connected(&set_a));
        assert!(!set_a.is_empty());
    }

    #[test]
    fn squashed_maze_is_connected() {
        let mut rng = RandomSource::with_seed(11);
        let set = MazeGenerator.generate_squashed(&mut rng, 25, 25, 5);
        assert!(connected(&set));
        assert!(!set.is_empty());
    }
}
