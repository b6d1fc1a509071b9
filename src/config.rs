//! Configuration management for the motion assessment pipeline

use crate::constants::{DEFAULT_BETA, DEFAULT_DERIVATIVE_CUTOFF, DEFAULT_MIN_CUTOFF, DEFAULT_MIN_VISIBILITY};
use crate::feedback::FeedbackWeights;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Landmark smoothing parameters
    pub smoothing: SmoothingConfig,

    /// Angle measurement parameters
    pub measurement: MeasurementConfig,

    /// Feedback prioritization weight tables
    pub feedback: FeedbackWeights,
}

/// One-euro smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Baseline cutoff frequency in Hz; lower means smoother at rest
    pub min_cutoff: f64,

    /// Speed coefficient; higher means less lag during fast motion
    pub beta: f64,

    /// Cutoff frequency for the velocity estimate, Hz
    pub derivative_cutoff: f64,

    /// Landmarks below this visibility pass through unfiltered
    pub visibility_threshold: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_cutoff: DEFAULT_MIN_CUTOFF,
            beta: DEFAULT_BETA,
            derivative_cutoff: DEFAULT_DERIVATIVE_CUTOFF,
            visibility_threshold: DEFAULT_MIN_VISIBILITY,
        }
    }
}

/// Angle measurement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Minimum landmark visibility for angle and frame computation
    pub min_visibility: f64,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.smoothing.min_cutoff <= 0.0 {
            return Err(Error::Config("Minimum cutoff must be positive".to_string()));
        }
        if self.smoothing.beta < 0.0 {
            return Err(Error::Config("Beta must be non-negative".to_string()));
        }
        if self.smoothing.derivative_cutoff <= 0.0 {
            return Err(Error::Config("Derivative cutoff must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.smoothing.visibility_threshold) {
            return Err(Error::Config("Visibility threshold must be between 0.0 and 1.0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.measurement.min_visibility) {
            return Err(Error::Config("Minimum visibility must be between 0.0 and 1.0".to_string()));
        }
        if self.feedback.injury_risk.values().any(|w| *w < 0.0) {
            return Err(Error::Config("Injury-risk weights must be non-negative".to_string()));
        }
        if self.feedback.score_deduction_factor < 0.0 {
            return Err(Error::Config("Score deduction factor must be non-negative".to_string()));
        }
        Ok(())
    }

    /// Build a skeleton filter from the smoothing section
    #[must_use]
    pub fn create_skeleton_filter(&self) -> crate::filters::skeleton::SkeletonFilter {
        crate::filters::skeleton::SkeletonFilter::new(
            self.smoothing.min_cutoff,
            self.smoothing.beta,
            self.smoothing.derivative_cutoff,
            self.smoothing.visibility_threshold,
        )
    }

    /// Build an angle calculator from the measurement section
    #[must_use]
    pub fn create_angle_calculator(&self) -> crate::angles::AngleCalculator {
        crate::angles::AngleCalculator::new(self.measurement.min_visibility)
    }
}
