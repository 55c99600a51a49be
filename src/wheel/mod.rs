//! Deterministic spin core
//!
//! Everything that decides where the wheel stops lives here. This module must
//! stay pure and host-independent:
//! - Randomness comes from an injected `rand::Rng`
//! - Time comes from the caller (milliseconds)
//! - No rendering, audio, or storage dependencies

pub mod planner;
pub mod prize;
pub mod selector;
pub mod spin;

pub use planner::{PlanDraws, landing_angle, plan, target_base};
pub use prize::{Prize, PrizeSet, Sector, clamp_weight};
pub use selector::{select, select_with_draw};
pub use spin::{SpinDriver, SpinEvent, SpinPhase, ease_out_quint};
