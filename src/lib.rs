//! Lucky Wheel - A weighted prize wheel for the browser
//!
//! Core modules:
//! - `wheel`: Deterministic spin core (prize sets, selection, rotation planning, animation)
//! - `renderer`: Wheel layout and Canvas 2D painting
//! - `platform`: Browser/native platform abstraction (time, storage, frame loop)
//! - `persistence`: Scenario/history/settings storage with default fallback
//! - `generator`: Theme-based prize list generation via a text-generation API

pub mod audio;
pub mod generator;
pub mod history;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scenario;
pub mod settings;
pub mod wheel;

pub use history::{History, HistoryEntry};
pub use scenario::{ScenarioBook, WheelScenario};
pub use settings::Settings;
pub use wheel::{Prize, PrizeSet, SpinDriver, SpinEvent, SpinPhase};

use glam::DVec2;

/// Wheel configuration constants
pub mod consts {
    use std::f64::consts::FRAC_PI_2;

    /// Total spin animation length (milliseconds)
    pub const SPIN_DURATION_MS: f64 = 6000.0;

    /// Extra full turns added to every spin (inclusive range)
    pub const MIN_EXTRA_TURNS: u32 = 5;
    pub const MAX_EXTRA_TURNS: u32 = 7;

    /// Landing offset as a fraction of the winning sector's width (±)
    pub const JITTER_FACTOR: f64 = 0.4;
    /// Sectors narrower than this (radians) always land dead-center
    pub const MIN_JITTER_SECTOR_WIDTH: f64 = 1.0e-3;

    /// Pointer direction in screen coordinates (straight up)
    pub const POINTER_ANGLE: f64 = -FRAC_PI_2;

    /// Canvas dimensions
    pub const WHEEL_SIZE: f64 = 600.0;
    pub const WHEEL_RADIUS: f64 = WHEEL_SIZE / 2.0 - 20.0;
    pub const HUB_RADIUS: f64 = 25.0;
    /// Distance of label text end from the rim
    pub const LABEL_INSET: f64 = 40.0;

    /// Sector color palette, cycled for new prizes
    pub const COLORS: [&str; 11] = [
        "#F87171", // red-400
        "#FB923C", // orange-400
        "#FACC15", // yellow-400
        "#A3E635", // lime-400
        "#34D399", // emerald-400
        "#22D3EE", // cyan-400
        "#60A5FA", // blue-400
        "#818CF8", // indigo-400
        "#A78BFA", // violet-400
        "#E879F9", // fuchsia-400
        "#FB7185", // rose-400
    ];
}

/// Palette color for the n-th prize
#[inline]
pub fn palette_color(index: usize) -> &'static str {
    consts::COLORS[index % consts::COLORS.len()]
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((wrap_angle(5.0 * TAU + 1.0) - 1.0).abs() < 1e-9);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-18) < TAU);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0), consts::COLORS[0]);
        assert_eq!(palette_color(consts::COLORS.len()), consts::COLORS[0]);
        assert_eq!(palette_color(12), consts::COLORS[1]);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, PI / 2.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }
}
