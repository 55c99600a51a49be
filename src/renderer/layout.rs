//! Wheel layout: screen-space wedges and label placement
//!
//! Pure function of (prizes, rotation), shared by the canvas painter and tests.

use glam::DVec2;

use crate::consts::*;
use crate::polar_to_cartesian;
use crate::wheel::PrizeSet;

/// One painted sector
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    /// Screen-space start angle (rotation applied)
    pub start: f64,
    /// Screen-space end angle
    pub end: f64,
    /// Angle of the label baseline (sector bisector)
    pub label_angle: f64,
    /// Point where right-aligned label text ends
    pub label_anchor: DVec2,
    pub label: String,
    pub color: String,
}

/// Full wheel layout around `center`
#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    pub center: DVec2,
    pub radius: f64,
    pub wedges: Vec<Wedge>,
    /// Tip of the fixed pointer (top of the wheel)
    pub pointer_tip: DVec2,
}

impl WheelLayout {
    /// Lay out a wheel of the default size
    pub fn new(prizes: &PrizeSet, rotation: f64) -> Self {
        let center = DVec2::splat(WHEEL_SIZE / 2.0);
        Self::with_geometry(prizes, rotation, center, WHEEL_RADIUS)
    }

    pub fn with_geometry(prizes: &PrizeSet, rotation: f64, center: DVec2, radius: f64) -> Self {
        let wedges = prizes
            .iter()
            .zip(prizes.sectors())
            .map(|(prize, sector)| {
                let label_angle = sector.center() + rotation;
                Wedge {
                    start: sector.start + rotation,
                    end: sector.end() + rotation,
                    label_angle,
                    label_anchor: center
                        + polar_to_cartesian(radius - LABEL_INSET, label_angle),
                    label: prize.label.clone(),
                    color: prize.color.clone(),
                }
            })
            .collect();

        Self {
            center,
            radius,
            wedges,
            pointer_tip: center + polar_to_cartesian(radius, POINTER_ANGLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_wedges_span_full_circle() {
        let set = PrizeSet::from_weights(&[1, 2, 3]);
        let layout = WheelLayout::new(&set, 0.7);
        assert_eq!(layout.wedges.len(), 3);
        assert!((layout.wedges[0].start - 0.7).abs() < 1e-12);
        assert!((layout.wedges[2].end - (0.7 + TAU)).abs() < 1e-9);
        for pair in layout.wedges.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pointer_at_top() {
        let layout = WheelLayout::new(&PrizeSet::from_weights(&[1]), 0.0);
        assert!((layout.pointer_tip.x - WHEEL_SIZE / 2.0).abs() < 1e-9);
        assert!((layout.pointer_tip.y - (WHEEL_SIZE / 2.0 - WHEEL_RADIUS)).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_wedge_matches_driver_math() {
        let set = PrizeSet::from_weights(&[3, 1, 4, 1, 5, 9]);
        for rotation in [0.0, 1.0, 2.5, 40.0, -3.0] {
            let layout = WheelLayout::new(&set, rotation);
            let under = set.sector_under_pointer(rotation).unwrap();
            let wedge = &layout.wedges[under];
            let rel = crate::wrap_angle(POINTER_ANGLE - wedge.start);
            assert!(rel < wedge.end - wedge.start);
        }
    }

    #[test]
    fn test_label_anchor_on_bisector() {
        let set = PrizeSet::from_weights(&[2, 1, 1]);
        let layout = WheelLayout::new(&set, 1.3);
        for wedge in &layout.wedges {
            let dir = wedge.label_anchor - layout.center;
            let angle = dir.y.atan2(dir.x);
            let diff = crate::wrap_angle(angle - wedge.label_angle);
            assert!(diff < 1e-9 || TAU - diff < 1e-9);
        }
    }

    #[test]
    fn test_label_anchor_inside_rim() {
        let set = PrizeSet::from_weights(&[1, 1]);
        let layout = WheelLayout::new(&set, PI);
        for wedge in &layout.wedges {
            let dist = wedge.label_anchor.distance(layout.center);
            assert!((dist - (WHEEL_RADIUS - LABEL_INSET)).abs() < 1e-9);
        }
    }
}
