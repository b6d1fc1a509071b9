//! Error types for the motion assessment library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// A required landmark's visibility is below the caller's threshold
    #[error("insufficient confidence for landmark '{landmark}': visibility {visibility:.2} < required {required:.2}")]
    InsufficientConfidence {
        /// Landmark name
        landmark: String,
        /// Observed visibility value
        visibility: f64,
        /// Minimum visibility the caller required
        required: f64,
    },

    /// The active schema lacks a landmark the joint definition needs
    #[error("joint '{joint}' unsupported by schema: missing landmark '{missing}'")]
    UnsupportedJoint {
        /// Requested joint name
        joint: String,
        /// Landmark name absent from the schema
        missing: String,
    },

    /// An anatomical reference frame needed for the measurement was not computed
    #[error("anatomical reference frame unavailable for segment '{segment}'")]
    FrameUnavailable {
        /// Body segment whose frame is missing
        segment: String,
    },

    /// No joint definition registered under the requested name
    #[error("unknown joint: '{0}'")]
    UnknownJoint(String),

    /// Landmark geometry degenerate (zero-length or plane-parallel vectors)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input parameters provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
