//! Prize options and the sector layout they define on the wheel
//!
//! Sectors are laid out in sequence order starting at angle 0, each one
//! `2π * weight / total_weight` wide.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::wrap_angle;

/// A single prize on the wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    /// Opaque unique id
    pub id: String,
    /// Display label
    #[serde(rename = "name")]
    pub label: String,
    /// Relative selection probability (always >= 1)
    pub weight: u32,
    /// CSS color for the sector
    pub color: String,
}

impl Prize {
    /// Create a prize, clamping the weight to at least 1
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        weight: u32,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            weight: clamp_weight(weight as i64),
            color: color.into(),
        }
    }
}

/// Clamp a user-entered weight to the valid range (>= 1)
#[inline]
pub fn clamp_weight(weight: i64) -> u32 {
    weight.clamp(1, u32::MAX as i64) as u32
}

/// Angular extent of one prize on the unrotated wheel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    /// Start angle (radians, in [0, 2π))
    pub start: f64,
    /// Angular width (radians)
    pub width: f64,
}

impl Sector {
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    #[inline]
    pub fn center(&self) -> f64 {
        self.start + self.width / 2.0
    }

    /// Check if a wheel angle in [0, 2π) falls inside this sector
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end()
    }
}

/// Ordered, weighted prize list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeSet {
    prizes: Vec<Prize>,
}

impl PrizeSet {
    pub fn new(prizes: Vec<Prize>) -> Self {
        let mut prizes = prizes;
        // Stored data may predate the weight clamp
        for prize in &mut prizes {
            prize.weight = prize.weight.max(1);
        }
        Self { prizes }
    }

    /// Build a set from bare weights (ids and labels derived from position)
    pub fn from_weights(weights: &[u32]) -> Self {
        Self::new(
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| {
                    Prize::new(i.to_string(), format!("Prize {}", i + 1), w, crate::palette_color(i))
                })
                .collect(),
        )
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Prize> {
        self.prizes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prize> {
        self.prizes.iter()
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> u64 {
        self.prizes.iter().map(|p| p.weight as u64).sum()
    }

    /// Sector of the prize at `index` (None if out of range)
    pub fn sector(&self, index: usize) -> Option<Sector> {
        let prize = self.prizes.get(index)?;
        let total = self.total_weight() as f64;
        let before: u64 = self.prizes[..index].iter().map(|p| p.weight as u64).sum();
        Some(Sector {
            start: TAU * before as f64 / total,
            width: TAU * prize.weight as f64 / total,
        })
    }

    /// All sectors in sequence order
    pub fn sectors(&self) -> Vec<Sector> {
        let total = self.total_weight() as f64;
        let mut before = 0u64;
        self.prizes
            .iter()
            .map(|p| {
                let sector = Sector {
                    start: TAU * before as f64 / total,
                    width: TAU * p.weight as f64 / total,
                };
                before += p.weight as u64;
                sector
            })
            .collect()
    }

    /// Index of the sector containing a wheel angle (any value, wrapped to [0, 2π))
    ///
    /// Angles that rounding pushes past the last sector end map to the last
    /// sector. Returns None only for an empty set.
    pub fn sector_at(&self, angle: f64) -> Option<usize> {
        if self.prizes.is_empty() {
            return None;
        }
        let angle = wrap_angle(angle);
        let index = self
            .sectors()
            .iter()
            .position(|s| s.contains(angle))
            .unwrap_or(self.prizes.len() - 1);
        Some(index)
    }

    /// Index of the prize currently under the pointer for a wheel rotation
    pub fn sector_under_pointer(&self, rotation: f64) -> Option<usize> {
        self.sector_at(crate::consts::POINTER_ANGLE - rotation)
    }
}

impl From<Vec<Prize>> for PrizeSet {
    fn from(prizes: Vec<Prize>) -> Self {
        Self::new(prizes)
    }
}

impl<'a> IntoIterator for &'a PrizeSet {
    type Item = &'a Prize;
    type IntoIter = std::slice::Iter<'a, Prize>;

    fn into_iter(self) -> Self::IntoIter {
        self.prizes.iter()
    }
}
