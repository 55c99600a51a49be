//! Rotation planning: where the wheel must stop so the pointer lands on the winner
//!
//! The wheel's rotation `R` puts wheel angle `a` at screen angle `a + R`. The
//! winner's sector center `c` is under the pointer when
//! `c + R ≡ POINTER_ANGLE (mod 2π)`.

use rand::Rng;
use std::f64::consts::TAU;

use super::prize::PrizeSet;
use crate::consts::*;
use crate::wrap_angle;

/// Random inputs to a plan, drawn once per spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanDraws {
    /// Full turns before landing (MIN_EXTRA_TURNS..=MAX_EXTRA_TURNS)
    pub extra_turns: u32,
    /// Landing offset as a fraction of sector width, in [-JITTER_FACTOR, JITTER_FACTOR]
    pub jitter: f64,
}

impl PlanDraws {
    /// Draw turn count and jitter from the RNG
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            extra_turns: rng.random_range(MIN_EXTRA_TURNS..=MAX_EXTRA_TURNS),
            jitter: rng.random_range(-JITTER_FACTOR..=JITTER_FACTOR),
        }
    }

    /// Minimum turns, no jitter
    pub fn exact() -> Self {
        Self {
            extra_turns: MIN_EXTRA_TURNS,
            jitter: 0.0,
        }
    }
}

/// Unnormalized rotation that centers the winner under the pointer
pub fn target_base(prizes: &PrizeSet, winner: usize) -> Option<f64> {
    let sector = prizes.sector(winner)?;
    Some(POINTER_ANGLE - sector.center())
}

/// Landing angle in (0, 2π] for the winner, including the jitter offset
///
/// Jitter is clamped to ±JITTER_FACTOR of the sector width, and disabled
/// entirely for sectors narrower than MIN_JITTER_SECTOR_WIDTH.
pub fn landing_angle(prizes: &PrizeSet, winner: usize, jitter: f64) -> Option<f64> {
    let sector = prizes.sector(winner)?;
    let jitter = if sector.width < MIN_JITTER_SECTOR_WIDTH {
        0.0
    } else {
        jitter.clamp(-JITTER_FACTOR, JITTER_FACTOR)
    };
    let angle = wrap_angle(POINTER_ANGLE - sector.center() + jitter * sector.width);
    // Keep a zero landing a full turn out so the lower bound stays strict
    Some(if angle <= 0.0 { TAU } else { angle })
}

/// Compute the absolute target rotation for a spin
///
/// The result is the smallest `landing + k·2π` (k >= 0) strictly greater
/// than `current + extra_turns·2π`. Returns None if `winner` is out of range.
pub fn plan(prizes: &PrizeSet, winner: usize, current: f64, draws: PlanDraws) -> Option<f64> {
    let landing = landing_angle(prizes, winner, draws.jitter)?;
    let threshold = current + draws.extra_turns as f64 * TAU;

    let mut k = ((threshold - landing) / TAU).floor().max(-1.0) + 1.0;
    // Correct for rounding in the division on either side
    while landing + k * TAU <= threshold {
        k += 1.0;
    }
    while k > 0.0 && landing + (k - 1.0) * TAU > threshold {
        k -= 1.0;
    }

    Some(landing + k * TAU)
}
