//! One-euro adaptive smoothing filter.
//!
//! Two cascaded low-pass stages: one for the raw signal, one for its
//! estimated velocity. The primary smoothing factor is derived each sample
//! from `cutoff = min_cutoff + beta * |velocity|`, so the filter smooths
//! hard at rest and relaxes as motion speeds up.

use super::SignalFilter;
use crate::constants::{DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF, DEFAULT_MIN_CUTOFF, MIN_DT};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Adaptive exponential smoothing filter for a single scalar stream
pub struct OneEuroFilter {
    min_cutoff: f64,
    beta: f64,
    derivative_cutoff: f64,

    prev_value: Option<f64>,
    prev_velocity: f64,
    prev_timestamp: f64,
}

impl OneEuroFilter {
    /// Create a new one-euro filter
    ///
    /// `min_cutoff` controls baseline smoothing (lower = smoother at rest);
    /// `beta` controls how aggressively smoothing relaxes with speed.
    ///
    /// # Panics
    ///
    /// Panics if `min_cutoff` is not positive, `beta` is negative, or
    /// `derivative_cutoff` is not positive
    #[must_use]
    pub fn new(min_cutoff: f64, beta: f64, derivative_cutoff: f64) -> Self {
        assert!(min_cutoff > 0.0, "Minimum cutoff must be positive");
        assert!(beta >= 0.0, "Beta must be non-negative");
        assert!(derivative_cutoff > 0.0, "Derivative cutoff must be positive");
        Self {
            min_cutoff,
            beta,
            derivative_cutoff,
            prev_value: None,
            prev_velocity: 0.0,
            prev_timestamp: 0.0,
        }
    }

    /// Smoothing factor for a given cutoff frequency and sample interval:
    /// `tau = 1/(2π·cutoff)`, `alpha = 1/(1 + tau/dt)`
    fn alpha(cutoff: f64, dt: f64) -> f64 {
        let tau = 1.0 / (2.0 * PI * cutoff);
        1.0 / (1.0 + tau / dt)
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CUTOFF, DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF)
    }
}

impl SignalFilter for OneEuroFilter {
    fn filter(&mut self, timestamp: f64, value: f64) -> f64 {
        let Some(prev) = self.prev_value else {
            // First sample seeds both stages, no smoothing
            self.prev_value = Some(value);
            self.prev_timestamp = timestamp;
            return value;
        };

        // Non-increasing timestamps are a caller error; clamp rather than reject
        let dt = (timestamp - self.prev_timestamp).max(MIN_DT);

        let velocity = (value - prev) / dt;
        let a_d = Self::alpha(self.derivative_cutoff, dt);
        let velocity_hat = a_d.mul_add(velocity - self.prev_velocity, self.prev_velocity);

        let cutoff = self.beta.mul_add(velocity_hat.abs(), self.min_cutoff);
        let a = Self::alpha(cutoff, dt);
        let filtered = a.mul_add(value - prev, prev);

        self.prev_value = Some(filtered);
        self.prev_velocity = velocity_hat;
        self.prev_timestamp = timestamp;

        filtered
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.prev_velocity = 0.0;
        self.prev_timestamp = 0.0;
    }

    fn name(&self) -> &str {
        "OneEuroFilter"
    }
}

/// Independent one-euro filters for a 2D position
pub struct OneEuroFilter2d {
    x: OneEuroFilter,
    y: OneEuroFilter,
}

impl OneEuroFilter2d {
    /// Create a 2D composition with identical parameters per axis
    #[must_use]
    pub fn new(min_cutoff: f64, beta: f64, derivative_cutoff: f64) -> Self {
        Self {
            x: OneEuroFilter::new(min_cutoff, beta, derivative_cutoff),
            y: OneEuroFilter::new(min_cutoff, beta, derivative_cutoff),
        }
    }

    /// Filter a 2D position sampled at `timestamp`
    pub fn filter(&mut self, timestamp: f64, position: (f64, f64)) -> (f64, f64) {
        (
            self.x.filter(timestamp, position.0),
            self.y.filter(timestamp, position.1),
        )
    }

    /// Reset both axes
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

impl Default for OneEuroFilter2d {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CUTOFF, DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF)
    }
}

/// Independent one-euro filters for a 3D position
pub struct OneEuroFilter3d {
    x: OneEuroFilter,
    y: OneEuroFilter,
    z: OneEuroFilter,
}

impl OneEuroFilter3d {
    /// Create a 3D composition with identical parameters per axis
    #[must_use]
    pub fn new(min_cutoff: f64, beta: f64, derivative_cutoff: f64) -> Self {
        Self {
            x: OneEuroFilter::new(min_cutoff, beta, derivative_cutoff),
            y: OneEuroFilter::new(min_cutoff, beta, derivative_cutoff),
            z: OneEuroFilter::new(min_cutoff, beta, derivative_cutoff),
        }
    }

    /// Filter a 3D position sampled at `timestamp`
    pub fn filter(&mut self, timestamp: f64, position: Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            self.x.filter(timestamp, position.x),
            self.y.filter(timestamp, position.y),
            self.z.filter(timestamp, position.z),
        )
    }

    /// Reset all three axes
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
    }
}

impl Default for OneEuroFilter3d {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CUTOFF, DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_passes_through() {
        let mut filter = OneEuroFilter::default();
        assert_eq!(filter.filter(0.0, 42.0), 42.0);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let mut filter = OneEuroFilter::default();
        let mut out = filter.filter(0.0, 0.0);
        for i in 1..120 {
            out = filter.filter(f64::from(i) / 30.0, 10.0);
        }
        assert!((out - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_no_overshoot_on_monotonic_input() {
        let mut filter = OneEuroFilter::default();
        let mut last = filter.filter(0.0, 0.0);
        for i in 1..60 {
            let input = f64::from(i);
            let out = filter.filter(f64::from(i) / 30.0, input);
            // Output stays between previous output and current input
            assert!(out >= last);
            assert!(out <= input);
            last = out;
        }
    }

    #[test]
    fn test_jitter_suppression_at_rest() {
        let mut filter = OneEuroFilter::new(1.0, 0.0, 1.0);
        filter.filter(0.0, 5.0);
        // Alternating +-0.1 jitter around 5.0
        let mut deviations = 0.0;
        for i in 1..60 {
            let noise = if i % 2 == 0 { 0.1 } else { -0.1 };
            let out = filter.filter(f64::from(i) / 30.0, 5.0 + noise);
            deviations += (out - 5.0).abs();
        }
        // Smoothed deviation well below the raw jitter magnitude
        assert!(deviations / 59.0 < 0.05);
    }

    #[test]
    fn test_non_increasing_timestamp_is_clamped() {
        let mut filter = OneEuroFilter::default();
        filter.filter(1.0, 0.0);
        // Same timestamp again: must not panic or produce NaN
        let out = filter.filter(1.0, 1.0);
        assert!(out.is_finite());
    }

    #[test]
    fn test_reset_reseeds() {
        let mut filter = OneEuroFilter::default();
        filter.filter(0.0, 0.0);
        filter.filter(0.033, 100.0);
        filter.reset();
        // After reset the next sample seeds, unsmoothed
        assert_eq!(filter.filter(0.066, 7.0), 7.0);
    }

    #[test]
    fn test_2d_composition() {
        let mut filter = OneEuroFilter2d::default();
        let (x, y) = filter.filter(0.0, (0.5, 0.5));
        assert_eq!((x, y), (0.5, 0.5));
        let (x, y) = filter.filter(1.0 / 30.0, (0.6, 0.5));
        assert!(x > 0.5 && x < 0.6);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_3d_axes_independent() {
        let mut filter = OneEuroFilter3d::default();
        let first = filter.filter(0.0, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(first, Vector3::new(1.0, 2.0, 3.0));
        let second = filter.filter(1.0 / 30.0, Vector3::new(1.0, 2.0, 4.0));
        // Unchanged axes stay fixed; moving axis moves toward the input
        assert!((second.x - 1.0).abs() < 1e-12);
        assert!((second.y - 2.0).abs() < 1e-12);
        assert!(second.z > 3.0 && second.z < 4.0);
    }
}
