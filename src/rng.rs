//! Seeded random source and dice-expression evaluator.
//!
//! Every generator that needs randomness takes a [`RandomSource`] (and,
//! where dice expressions appear, a [`Dice`]) in its constructor — there is
//! no global RNG anywhere in this crate.

use rand::{Rng as RandRng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GeneratorError;

/// Seeded RNG wrapper. The algorithm (ChaCha8) and draw order are part of
/// this crate's save-compatibility contract — see `SPEC_FULL.md` §9.
pub struct RandomSource {
    inner: ChaCha8Rng,
}

impl RandomSource {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform in the closed interval `[lo, hi]`. Returns `lo` if `lo > hi`.
    pub fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
        if lo > hi {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    pub fn next_usize(&mut self, lo: usize, hi: usize) -> usize {
        if lo > hi {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen()
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let i = self.next_usize(0, slice.len() - 1);
            Some(&slice[i])
        }
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(0, i);
            slice.swap(i, j);
        }
    }

    /// A uniformly random 4-direction offset: N, E, S, W.
    pub fn direction4(&mut self) -> (i32, i32) {
        const DIRS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        DIRS[self.next_usize(0, 3)]
    }
}

/// Dice-expression parser/evaluator ("2d6+3").
#[derive(Debug, Clone, Copy, Default)]
pub struct Dice;

impl Dice {
    /// `Σ_{1..n} next_int(1, d) + m`. Returns `m` when `n < 1` or `d < 1`.
    pub fn roll(&self, rng: &mut RandomSource, n: i32, d: i32, m: i32) -> i32 {
        if n < 1 || d < 1 {
            return m;
        }
        let mut total = m;
        for _ in 0..n {
            total += rng.next_int(1, d);
        }
        total
    }

    /// Parses `"NdS"`, `"NdS+M"`, `"NdS-M"` and rolls it. Exactly one of
    /// `+`/`-` may appear, at most once, after the dice portion.
    pub fn roll_expr(&self, rng: &mut RandomSource, expr: &str) -> Result<i32, GeneratorError> {
        let (n, d, m) = parse_dice_expr(expr)?;
        Ok(self.roll(rng, n, d, m))
    }
}

fn parse_dice_expr(expr: &str) -> Result<(i32, i32, i32), GeneratorError> {
    let err = || GeneratorError::DiceParse(expr.to_string());

    let has_plus = expr.contains('+');
    let has_minus = expr.contains('-');
    if has_plus && has_minus {
        return Err(err());
    }

    let (dice_part, modifier) = if has_plus {
        let mut parts = expr.splitn(2, '+');
        let dice_part = parts.next().ok_or_else(err)?;
        let rest = parts.next().ok_or_else(err)?;
        if rest.contains('+') {
            return Err(err());
        }
        let m: i32 = rest.parse().map_err(|_| err())?;
        (dice_part, m)
    } else if has_minus {
        let mut parts = expr.splitn(2, '-');
        let dice_part = parts.next().ok_or_else(err)?;
        let rest = parts.next().ok_or_else(err)?;
        if rest.contains('-') {
            return Err(err());
        }
        let m: i32 = rest.parse().map_err(|_| err())?;
        (dice_part, -m)
    } else {
        (expr, 0)
    };

    let mut nd = dice_part.splitn(2, 'd');
    let n_str = nd.next().ok_or_else(err)?;
    let d_str = nd.next().ok_or_else(err)?;
    if n_str.is_empty() || d_str.is_empty() {
        return Err(err());
    }
    let n: i32 = n_str.parse().map_err(|_| err())?;
    let d: i32 = d_str.parse().map_err(|_| err())?;
    if n <= 0 || d <= 0 {
        return Err(err());
    }
    Ok((n, d, modifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_int_lo_greater_than_hi_returns_lo() {
        let mut rng = RandomSource::with_seed(1);
        assert_eq!(rng.next_int(5, 2), 5);
    }

    #[test]
    fn deterministic_stream_for_fixed_seed() {
        let mut a = RandomSource::with_seed(42);
        let mut b = RandomSource::with_seed(42);
        let seq_a: Vec<i32> = (0..20).map(|_| a.next_int(0, 1000)).collect();
        let seq_b: Vec<i32> = (0..20).map(|_| b.next_int(0, 1000)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn dice_roll_bounds() {
        let mut rng = RandomSource::with_seed(7);
        let dice = Dice;
        for n in 1..=5 {
            for d in 1..=8 {
                let r = dice.roll(&mut rng, n, d, 3);
                assert!(r >= n + 3 && r <= n * d + 3);
            }
        }
    }

    #[test]
    fn dice_roll_degenerate_returns_modifier() {
        let mut rng = RandomSource::with_seed(7);
        let dice = Dice;
        assert_eq!(dice.roll(&mut rng, 0, 6, 4), 4);
        assert_eq!(dice.roll(&mut rng, 2, 0, 4), 4);
    }

    #[test]
    fn roll_expr_parses_plus_and_minus() {
        let mut rng = RandomSource::with_seed(7);
        let dice = Dice;
        let r = dice.roll_expr(&mut rng, "2d6+3").unwrap();
        assert!((5..=15).contains(&r));
        let r = dice.roll_expr(&mut rng, "1d6-2").unwrap();
        assert!((-1..=4).contains(&r));
        let r = dice.roll_expr(&mut rng, "3d4").unwrap();
        assert!((3..=12).contains(&r));
    }

    #[test]
    fn roll_expr_rejects_malformed() {
        let mut rng = RandomSource::with_seed(7);
        let dice = Dice;
        assert!(dice.roll_expr(&mut rng, "1d6-+2").is_err());
        assert!(dice.roll_expr(&mut rng, "d6").is_err());
        assert!(dice.roll_expr(&mut rng, "2dX").is_err());
        assert!(dice.roll_expr(&mut rng, "nonsense").is_err());
    }
}
