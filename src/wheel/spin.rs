//! Spin animation driver
//!
//! Idle -> Spinning -> Completing -> Idle. The host calls `update` once per
//! display frame with its own clock; the driver never schedules anything
//! itself, so tests can feed it synthetic time.

use rand::Rng;
use std::f64::consts::TAU;

use super::planner::{PlanDraws, plan};
use super::prize::{Prize, PrizeSet};
use super::selector::select;
use crate::consts::*;

/// Current phase of the spin state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    /// Waiting for a spin request
    #[default]
    Idle,
    /// Animating toward the target rotation
    Spinning,
    /// Final frame reached, finish event being emitted
    Completing,
}

/// Side-effect hooks produced by a frame update
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    /// The pointer entered a new sector
    Tick { sector: usize },
    /// The spin landed; fires exactly once per spin
    Finished { winner: usize, prize: Prize },
}

/// Quintic ease-out: fast start, long slow finish
#[inline]
pub fn ease_out_quint(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(5)
}

/// A spin in flight
#[derive(Debug, Clone)]
struct ActiveSpin {
    /// Prize set snapshot taken at spin start
    prizes: PrizeSet,
    winner: usize,
    start_rotation: f64,
    target_rotation: f64,
    start_time: f64,
    duration: f64,
}

impl ActiveSpin {
    fn progress(&self, now: f64) -> f64 {
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }
}

/// Owns the wheel rotation and runs one spin at a time
#[derive(Debug, Clone)]
pub struct SpinDriver {
    /// Authoritative wheel rotation (radians)
    rotation: f64,
    phase: SpinPhase,
    active: Option<ActiveSpin>,
    /// Sector last reported by a tick (None until the first frame of a spin)
    last_sector: Option<usize>,
    /// Rotation at the previous frame, for crossing detection
    last_rotation: f64,
    duration: f64,
}

impl Default for SpinDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinDriver {
    pub fn new() -> Self {
        Self::with_rotation(0.0)
    }

    /// Start from an existing rotation (e.g. restored from a previous session)
    pub fn with_rotation(rotation: f64) -> Self {
        Self {
            rotation,
            phase: SpinPhase::Idle,
            active: None,
            last_sector: None,
            last_rotation: rotation,
            duration: SPIN_DURATION_MS,
        }
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[inline]
    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    #[inline]
    pub fn is_spinning(&self) -> bool {
        self.phase != SpinPhase::Idle
    }

    /// Winner index of the spin in flight
    pub fn winner(&self) -> Option<usize> {
        self.active.as_ref().map(|s| s.winner)
    }

    /// Target rotation of the spin in flight
    pub fn target(&self) -> Option<f64> {
        self.active.as_ref().map(|s| s.target_rotation)
    }

    /// Prize set snapshot of the spin in flight
    pub fn prizes(&self) -> Option<&PrizeSet> {
        self.active.as_ref().map(|s| &s.prizes)
    }

    /// Select a winner, plan the landing, and start spinning
    ///
    /// Returns false (and changes nothing) if a spin is already in flight or
    /// the set is empty.
    pub fn request_spin<R: Rng + ?Sized>(
        &mut self,
        prizes: &PrizeSet,
        now: f64,
        rng: &mut R,
    ) -> bool {
        if !self.can_spin(prizes) {
            return false;
        }
        let Some(winner) = select(prizes, rng) else {
            return false;
        };
        let draws = PlanDraws::sample(rng);
        self.start(prizes, winner, draws, now)
    }

    /// Start a spin toward a predetermined winner with fixed plan draws
    pub fn request_spin_with(
        &mut self,
        prizes: &PrizeSet,
        winner: usize,
        draws: PlanDraws,
        now: f64,
    ) -> bool {
        if !self.can_spin(prizes) {
            return false;
        }
        self.start(prizes, winner, draws, now)
    }

    fn can_spin(&self, prizes: &PrizeSet) -> bool {
        if self.is_spinning() {
            log::debug!("Spin request ignored: already spinning");
            return false;
        }
        if prizes.is_empty() {
            log::debug!("Spin request ignored: no prizes");
            return false;
        }
        true
    }

    fn start(&mut self, prizes: &PrizeSet, winner: usize, draws: PlanDraws, now: f64) -> bool {
        let Some(target_rotation) = plan(prizes, winner, self.rotation, draws) else {
            log::warn!("Spin request ignored: winner {} out of range", winner);
            return false;
        };

        log::debug!(
            "Spin started: winner {:?}, {} turns, target {:.3} rad",
            prizes.get(winner).map(|p| p.label.as_str()),
            draws.extra_turns,
            target_rotation
        );

        self.active = Some(ActiveSpin {
            prizes: prizes.clone(),
            winner,
            start_rotation: self.rotation,
            target_rotation,
            start_time: now,
            duration: self.duration,
        });
        self.phase = SpinPhase::Spinning;
        self.last_sector = None;
        self.last_rotation = self.rotation;
        true
    }

    /// Advance the animation to `now` (host clock, milliseconds)
    ///
    /// Returns the tick and finish events produced by this frame. Does
    /// nothing while Idle.
    pub fn update(&mut self, now: f64) -> Vec<SpinEvent> {
        let mut events = Vec::new();
        if self.phase != SpinPhase::Spinning {
            return events;
        }
        let Some(spin) = self.active.as_ref() else {
            self.phase = SpinPhase::Idle;
            return events;
        };

        let progress = spin.progress(now);
        let eased = ease_out_quint(progress);
        let rotation = if progress >= 1.0 {
            spin.target_rotation
        } else {
            spin.start_rotation + (spin.target_rotation - spin.start_rotation) * eased
        };

        // The pointer sweeps backward over wheel angles as rotation grows, so
        // sectors are entered in descending (wrapping) order.
        let count = spin.prizes.len() as i64;
        if self.last_sector.is_none() {
            let start = sector_ordinal(&spin.prizes, self.last_rotation).rem_euclid(count) as usize;
            events.push(SpinEvent::Tick { sector: start });
            self.last_sector = Some(start);
        }
        let from = sector_ordinal(&spin.prizes, self.last_rotation);
        let to = sector_ordinal(&spin.prizes, rotation);
        for ordinal in (to..from).rev() {
            let sector = ordinal.rem_euclid(count) as usize;
            if self.last_sector != Some(sector) {
                events.push(SpinEvent::Tick { sector });
                self.last_sector = Some(sector);
            }
        }

        self.rotation = rotation;
        self.last_rotation = rotation;

        if progress >= 1.0 {
            self.phase = SpinPhase::Completing;
            if let Some(spin) = self.active.take() {
                let prize = spin.prizes.get(spin.winner).cloned();
                if let Some(prize) = prize {
                    log::info!("Spin finished: {}", prize.label);
                    events.push(SpinEvent::Finished {
                        winner: spin.winner,
                        prize,
                    });
                }
            }
            self.phase = SpinPhase::Idle;
        }

        events
    }

    /// Abandon the spin in flight without a finish event (host teardown)
    ///
    /// The wheel keeps its current rotation. Returns true if a spin was cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.active.take().is_none() {
            return false;
        }
        log::debug!("Spin cancelled at {:.3} rad", self.rotation);
        self.phase = SpinPhase::Idle;
        self.last_sector = None;
        true
    }
}

/// Monotonic sector counter for the pointer position
///
/// `turn * len + sector` over the unwrapped pointer angle; consecutive values
/// are consecutive sectors, so a frame that skips several sectors can still
/// report each one.
fn sector_ordinal(prizes: &PrizeSet, rotation: f64) -> i64 {
    let angle = POINTER_ANGLE - rotation;
    let mut turn = angle.div_euclid(TAU);
    let mut local = angle.rem_euclid(TAU);
    if local >= TAU {
        local = 0.0;
        turn += 1.0;
    }
    let sector = prizes.sector_at(local).unwrap_or(0) as i64;
    turn as i64 * prizes.len() as i64 + sector
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Drive a spin to completion, collecting every event
    fn run_to_end(driver: &mut SpinDriver, start: f64, frame_ms: f64) -> Vec<SpinEvent> {
        let mut events = Vec::new();
        let mut now = start;
        while driver.is_spinning() {
            now += frame_ms;
            events.extend(driver.update(now));
            assert!(now < start + SPIN_DURATION_MS + 10.0 * frame_ms, "spin never finished");
        }
        events
    }

    fn ticks(events: &[SpinEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                SpinEvent::Tick { sector } => Some(*sector),
                _ => None,
            })
            .collect()
    }

    fn finishes(events: &[SpinEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                SpinEvent::Finished { winner, .. } => Some(*winner),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ease_out_quint() {
        assert_eq!(ease_out_quint(0.0), 0.0);
        assert_eq!(ease_out_quint(1.0), 1.0);
        assert!((ease_out_quint(0.5) - (1.0 - 0.5f64.powi(5))).abs() < 1e-12);
        assert_eq!(ease_out_quint(2.0), 1.0);
        assert_eq!(ease_out_quint(-1.0), 0.0);
    }

    #[test]
    fn test_spin_lifecycle() {
        let set = PrizeSet::from_weights(&[1, 1, 2]);
        let mut driver = SpinDriver::new();
        assert_eq!(driver.phase(), SpinPhase::Idle);

        assert!(driver.request_spin_with(&set, 1, PlanDraws::exact(), 0.0));
        assert_eq!(driver.phase(), SpinPhase::Spinning);
        assert_eq!(driver.winner(), Some(1));

        let events = run_to_end(&mut driver, 0.0, FRAME_MS);
        assert_eq!(driver.phase(), SpinPhase::Idle);
        assert_eq!(finishes(&events), vec![1]);
        assert_eq!(driver.winner(), None);
        assert_eq!(set.sector_under_pointer(driver.rotation()), Some(1));
    }

    #[test]
    fn test_request_while_spinning_is_noop() {
        let set = PrizeSet::from_weights(&[1, 2, 3]);
        let mut driver = SpinDriver::new();
        assert!(driver.request_spin_with(&set, 2, PlanDraws::exact(), 0.0));
        let target = driver.target();

        driver.update(500.0);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(!driver.request_spin(&set, 600.0, &mut rng));
        assert!(!driver.request_spin_with(&set, 0, PlanDraws::exact(), 600.0));
        assert_eq!(driver.target(), target);
        assert_eq!(driver.winner(), Some(2));

        let events = run_to_end(&mut driver, 600.0, FRAME_MS);
        assert_eq!(finishes(&events), vec![2]);
    }

    #[test]
    fn test_empty_set_rejected() {
        let mut driver = SpinDriver::new();
        let mut rng = Pcg32::seed_from_u64(9);
        assert!(!driver.request_spin(&PrizeSet::default(), 0.0, &mut rng));
        assert_eq!(driver.phase(), SpinPhase::Idle);
        assert!(driver.update(100.0).is_empty());
    }

    #[test]
    fn test_rotation_monotonic_and_exact_at_end() {
        let set = PrizeSet::from_weights(&[2, 3, 5, 1]);
        let mut driver = SpinDriver::with_rotation(1.25);
        let mut rng = Pcg32::seed_from_u64(77);
        assert!(driver.request_spin(&set, 1000.0, &mut rng));
        let target = driver.target().unwrap();

        let mut last = driver.rotation();
        let mut now = 1000.0;
        while driver.is_spinning() {
            now += FRAME_MS;
            driver.update(now);
            assert!(driver.rotation() >= last);
            last = driver.rotation();
        }
        assert_eq!(driver.rotation(), target);
    }

    #[test]
    fn test_ticks_cover_every_sector_in_order() {
        let set = PrizeSet::from_weights(&[1, 6, 2, 1, 4, 1, 2, 6, 1]);
        let n = set.len();
        let mut driver = SpinDriver::new();
        let draws = PlanDraws {
            extra_turns: 6,
            jitter: 0.3,
        };
        assert!(driver.request_spin_with(&set, 4, draws, 0.0));

        // Coarse frames skip many sectors early in the spin
        let events = run_to_end(&mut driver, 0.0, 100.0);
        let ticks = ticks(&events);

        for pair in ticks.windows(2) {
            assert_ne!(pair[0], pair[1]);
            assert_eq!(pair[1], (pair[0] + n - 1) % n);
        }
        assert!(ticks.len() >= 6 * n);
        assert_eq!(*ticks.last().unwrap(), 4);
        assert_eq!(ticks[0], set.sector_under_pointer(0.0).unwrap());
    }

    #[test]
    fn test_single_prize_ticks_once() {
        let set = PrizeSet::from_weights(&[3]);
        let mut driver = SpinDriver::new();
        assert!(driver.request_spin_with(&set, 0, PlanDraws::exact(), 0.0));
        let events = run_to_end(&mut driver, 0.0, FRAME_MS);
        assert_eq!(ticks(&events), vec![0]);
        assert_eq!(finishes(&events), vec![0]);
    }

    #[test]
    fn test_snapshot_isolates_running_spin() {
        let set = PrizeSet::from_weights(&[1, 1, 1]);
        let mut driver = SpinDriver::new();
        assert!(driver.request_spin_with(&set, 2, PlanDraws::exact(), 0.0));
        drop(set);

        let events = run_to_end(&mut driver, 0.0, FRAME_MS);
        match events.last() {
            Some(SpinEvent::Finished { winner, prize }) => {
                assert_eq!(*winner, 2);
                assert_eq!(prize.label, "Prize 3");
            }
            other => panic!("expected finish event, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_stops_without_finish() {
        let set = PrizeSet::from_weights(&[1, 1]);
        let mut driver = SpinDriver::new();
        assert!(driver.request_spin_with(&set, 0, PlanDraws::exact(), 0.0));
        driver.update(1000.0);
        let rotation = driver.rotation();

        assert!(driver.cancel());
        assert!(!driver.is_spinning());
        assert!(driver.update(7000.0).is_empty());
        assert_eq!(driver.rotation(), rotation);
        assert!(!driver.cancel());
    }

    #[test]
    fn test_second_spin_continues_forward() {
        let set = PrizeSet::from_weights(&[1, 2, 3, 4]);
        let mut driver = SpinDriver::new();
        let mut rng = Pcg32::seed_from_u64(5);

        assert!(driver.request_spin(&set, 0.0, &mut rng));
        run_to_end(&mut driver, 0.0, FRAME_MS);
        let first = driver.rotation();

        assert!(driver.request_spin(&set, 10_000.0, &mut rng));
        assert!(driver.target().unwrap() > first + MIN_EXTRA_TURNS as f64 * TAU);
        let events = run_to_end(&mut driver, 10_000.0, FRAME_MS);
        assert_eq!(finishes(&events).len(), 1);
    }
}
