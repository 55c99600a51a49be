//! Weighted random prize selection

use rand::Rng;

use super::prize::PrizeSet;

/// Pick a winning prize index with probability `weight / total_weight`
///
/// Returns None for an empty set.
pub fn select<R: Rng + ?Sized>(prizes: &PrizeSet, rng: &mut R) -> Option<usize> {
    if prizes.is_empty() {
        return None;
    }
    let total = prizes.total_weight() as f64;
    let draw = rng.random::<f64>() * total;
    select_with_draw(prizes, draw)
}

/// Resolve a draw in [0, total_weight) to a prize index
///
/// Walks the set subtracting weights; the first prize that brings the
/// remainder to <= 0 wins. A residual remainder falls back to the last prize.
pub fn select_with_draw(prizes: &PrizeSet, draw: f64) -> Option<usize> {
    if prizes.is_empty() {
        return None;
    }
    let mut remainder = draw;
    for (i, prize) in prizes.iter().enumerate() {
        remainder -= prize.weight as f64;
        if remainder <= 0.0 {
            return Some(i);
        }
    }
    Some(prizes.len() - 1)
}
