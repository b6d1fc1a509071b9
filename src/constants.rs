//! Constants used throughout the library

/// Default minimum landmark visibility for angle and frame computation
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// Default one-euro filter baseline cutoff frequency (Hz)
pub const DEFAULT_MIN_CUTOFF: f64 = 1.0;

/// Default one-euro speed coefficient
pub const DEFAULT_BETA: f64 = 0.3;

/// Default cutoff frequency for the velocity low-pass stage (Hz)
pub const DEFAULT_DERIVATIVE_CUTOFF: f64 = 1.0;

/// Smallest allowed inter-sample interval in seconds.
/// Non-increasing timestamps are clamped to this instead of rejected.
pub const MIN_DT: f64 = 1e-6;

/// Scapular plane offset: degrees anterior of the coronal plane
pub const SCAPULAR_PLANE_OFFSET_DEG: f64 = 35.0;

/// Vector norms below this are treated as degenerate geometry
pub const DEGENERATE_NORM: f64 = 1e-9;

/// Angle deviation (degrees) at or below which a joint is rated good
pub const DEVIATION_GOOD_DEG: f64 = 5.0;

/// Angle deviation (degrees) at or below which a joint is rated warning
pub const DEVIATION_WARNING_DEG: f64 = 15.0;

/// User range below this fraction of the reference range flags a range deficit
pub const RANGE_DEFICIT_RATIO: f64 = 0.6;

/// Weight of the angle-deviation term in the overall comparison score
pub const ANGLE_SCORE_WEIGHT: f64 = 0.7;

/// Weight of the tempo term in the overall comparison score
pub const TEMPO_SCORE_WEIGHT: f64 = 0.3;

/// Per-severity angle scores used by the overall blend
pub const SCORE_GOOD: f64 = 100.0;
pub const SCORE_WARNING: f64 = 70.0;
pub const SCORE_CRITICAL: f64 = 40.0;

/// Time tolerance (seconds, reference timeline) for phase-point matching
pub const PHASE_TOLERANCE_SECS: f64 = 0.25;

/// Streaming comparison sliding-window capacity (~0.5 s at 24-30 fps)
pub const STREAMING_WINDOW_CAPACITY: usize = 12;

/// Minimum streaming window fill before an intermediate result is produced
pub const STREAMING_WINDOW_MIN: usize = 6;

/// Frequency contribution cap and multiplier in feedback prioritization
pub const FREQUENCY_CAP: usize = 10;
pub const FREQUENCY_WEIGHT: f64 = 2.5;

/// Feedback score at or above which positive reinforcement is attached
pub const REINFORCEMENT_SCORE: f64 = 85.0;

/// Warning-level error recurrences required before feedback is shown
pub const WARNING_RECURRENCE_MIN: usize = 3;
