//! Landmark smoothing filters.
//!
//! This module provides adaptive smoothing for the noisy per-frame landmark
//! stream, removing high-frequency jitter without lagging behind genuinely
//! fast motion.

/// Adaptive one-euro filter and its 2D/3D compositions
pub mod one_euro;

/// Angle-aware filtering with circular unwrapping
pub mod angle;

/// Full-skeleton filter bank keyed by landmark index
pub mod skeleton;

use crate::Result;

/// Trait for scalar signal filters driven by timestamped samples
pub trait SignalFilter: Send + Sync {
    /// Filter a single value observed at `timestamp` (seconds)
    fn filter(&mut self, timestamp: f64, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn filter(&mut self, _timestamp: f64, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a signal filter by type name
pub fn create_filter(filter_type: &str) -> Result<Box<dyn SignalFilter>> {
    match filter_type.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "one_euro" | "oneeuro" => Ok(Box::new(one_euro::OneEuroFilter::default())),
        "angle" => Ok(Box::new(angle::AngleFilter::default())),
        _ => Err(crate::Error::Config(format!("unknown filter type: {filter_type}"))),
    }
}
