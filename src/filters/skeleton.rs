//! Full-skeleton smoothing: one 3-axis filter bank per landmark index.

use super::one_euro::OneEuroFilter3d;
use crate::constants::{DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF, DEFAULT_MIN_CUTOFF, DEFAULT_MIN_VISIBILITY};
use crate::landmark::{Landmark, PoseFrame};
use std::collections::HashMap;

/// Per-landmark smoothing for an entire pose frame.
///
/// Landmarks whose visibility falls below the threshold are passed through
/// raw: filtering a barely tracked point would smear stale history into it
/// once it reappears.
pub struct SkeletonFilter {
    min_cutoff: f64,
    beta: f64,
    derivative_cutoff: f64,
    visibility_threshold: f64,
    banks: HashMap<usize, OneEuroFilter3d>,
}

impl SkeletonFilter {
    /// Create a skeleton filter with per-axis one-euro parameters
    ///
    /// # Panics
    ///
    /// Panics on the same parameter bounds as [`super::one_euro::OneEuroFilter::new`],
    /// or if `visibility_threshold` is outside [0, 1]
    #[must_use]
    pub fn new(min_cutoff: f64, beta: f64, derivative_cutoff: f64, visibility_threshold: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&visibility_threshold),
            "Visibility threshold must be in [0, 1]"
        );
        // Validate shared filter parameters up front
        let _ = OneEuroFilter3d::new(min_cutoff, beta, derivative_cutoff);
        Self {
            min_cutoff,
            beta,
            derivative_cutoff,
            visibility_threshold,
            banks: HashMap::new(),
        }
    }

    /// Smooth a single landmark in place, or pass it through when below
    /// the visibility threshold
    pub fn filter_landmark(&mut self, timestamp: f64, landmark: &Landmark) -> Landmark {
        if landmark.visibility < self.visibility_threshold {
            return landmark.clone();
        }

        let bank = self
            .banks
            .entry(landmark.index)
            .or_insert_with(|| OneEuroFilter3d::new(self.min_cutoff, self.beta, self.derivative_cutoff));

        let smoothed = bank.filter(timestamp, landmark.position());
        let mut out = landmark.clone();
        out.x = smoothed.x;
        out.y = smoothed.y;
        out.z = smoothed.z;
        out
    }

    /// Smooth every landmark of a frame, preserving order and metadata
    pub fn filter_frame(&mut self, frame: &PoseFrame) -> PoseFrame {
        let landmarks = frame
            .landmarks
            .iter()
            .map(|lm| self.filter_landmark(frame.timestamp, lm))
            .collect();
        PoseFrame::new(frame.timestamp, landmarks)
    }

    /// Reset the history of a single landmark
    pub fn reset_landmark(&mut self, index: usize) {
        if let Some(bank) = self.banks.get_mut(&index) {
            bank.reset();
        }
    }

    /// Reset all per-landmark history. Must be called when tracking is lost
    /// or a new session starts; stale state biases the first measurement
    /// after the gap.
    pub fn reset(&mut self) {
        log::debug!("resetting skeleton filter ({} landmark banks)", self.banks.len());
        for bank in self.banks.values_mut() {
            bank.reset();
        }
    }
}

impl Default for SkeletonFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_CUTOFF,
            DEFAULT_BETA,
            DEFAULT_DERIVATIVE_CUTOFF,
            DEFAULT_MIN_VISIBILITY,
        )
    }
}
