//! Preview zoom level.

use std::fmt;

/// Zoom factor in `[0.5, 3.0]`, kept in tenths so repeated steps never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    const MIN_TENTHS: i64 = 5;
    const MAX_TENTHS: i64 = 30;
    const DEFAULT_TENTHS: u8 = 10;

    /// One zoom button press.
    pub const STEP: f64 = 0.1;
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 3.0;

    /// Build a level from any factor, clamped and rounded to one decimal.
    pub fn from_factor(factor: f64) -> Self {
        if !factor.is_finite() {
            return Self::default();
        }
        let tenths = (factor * 10.0).round() as i64;
        Self(tenths.clamp(Self::MIN_TENTHS, Self::MAX_TENTHS) as u8)
    }

    pub fn factor(&self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Rounded percentage for display (`1.0` → `100`).
    pub fn percent(&self) -> u32 {
        u32::from(self.0) * 10
    }

    /// Apply a delta, clamping to the allowed range.
    pub fn adjusted(self, delta: f64) -> Self {
        if !delta.is_finite() {
            return self;
        }
        let delta_tenths = (delta * 10.0).round() as i64;
        let tenths = (i64::from(self.0) + delta_tenths).clamp(Self::MIN_TENTHS, Self::MAX_TENTHS);
        Self(tenths as u8)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(Self::DEFAULT_TENTHS)
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
