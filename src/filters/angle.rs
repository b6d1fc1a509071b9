//! Smoothing for angular signals.
//!
//! Raw angles wrap at 360°, so a naive filter sees 359° → 1° as a 358°
//! jump and smears the output across the circle. This variant unwraps each
//! sample through the shortest circular path into a continuous domain,
//! filters there, and renormalizes the result into [0, 360).

use super::{one_euro::OneEuroFilter, SignalFilter};
use crate::constants::{DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF, DEFAULT_MIN_CUTOFF};

/// One-euro filter for angles in degrees, with circular unwrapping
pub struct AngleFilter {
    inner: OneEuroFilter,
    /// Last filtered value in the continuous (unwrapped) domain
    continuous: Option<f64>,
}

impl AngleFilter {
    /// Create a new angle filter
    ///
    /// # Panics
    ///
    /// Panics on the same parameter bounds as [`OneEuroFilter::new`]
    #[must_use]
    pub fn new(min_cutoff: f64, beta: f64, derivative_cutoff: f64) -> Self {
        Self {
            inner: OneEuroFilter::new(min_cutoff, beta, derivative_cutoff),
            continuous: None,
        }
    }

    /// Signed shortest angular difference `to - from`, in (-180, 180]
    #[must_use]
    pub fn shortest_diff(from: f64, to: f64) -> f64 {
        let mut diff = (to - from) % 360.0;
        if diff > 180.0 {
            diff -= 360.0;
        } else if diff <= -180.0 {
            diff += 360.0;
        }
        diff
    }

    /// Normalize an angle into [0, 360)
    fn normalize(angle: f64) -> f64 {
        angle.rem_euclid(360.0)
    }
}

impl Default for AngleFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CUTOFF, DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF)
    }
}

impl SignalFilter for AngleFilter {
    fn filter(&mut self, timestamp: f64, angle_degrees: f64) -> f64 {
        let unwrapped = match self.continuous {
            Some(cont) => cont + Self::shortest_diff(Self::normalize(cont), Self::normalize(angle_degrees)),
            None => angle_degrees,
        };

        let filtered = self.inner.filter(timestamp, unwrapped);
        self.continuous = Some(filtered);
        Self::normalize(filtered)
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.continuous = None;
    }

    fn name(&self) -> &str {
        "AngleFilter"
    }
}
