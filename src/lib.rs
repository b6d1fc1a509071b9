//! Motion assessment library for clinically meaningful joint-angle
//! measurement and movement comparison.
//!
//! Raw per-frame body-landmark streams from an external pose-detection
//! model are turned into joint-angle measurements, compared against a
//! reference movement, and condensed into prioritized, safety-ranked
//! feedback. The pipeline, leaves first:
//! 1. Per-landmark adaptive smoothing (one-euro family)
//! 2. Schema-aware joint resolution (no hard-coded landmark indices)
//! 3. Anatomical reference frames and plane-projected angle measurement
//! 4. Euler decomposition for the multi-DOF shoulder
//! 5. Movement comparison with temporal alignment
//! 6. Prioritized feedback generation
//!
//! All computation is single-threaded and synchronous with the frame
//! cadence; run one pipeline instance per tracking session and call the
//! `reset` methods whenever tracking is interrupted.
//!
//! # Examples
//!
//! ## Measuring joint angles for one frame
//!
//! ```no_run
//! use motion_assessment::{
//!     anatomy::FrameBundle,
//!     angles::AngleCalculator,
//!     filters::skeleton::SkeletonFilter,
//!     landmark::{LandmarkSchema, PoseFrame},
//! };
//!
//! # fn next_frame() -> PoseFrame { unimplemented!() }
//! # fn main() {
//! let schema = LandmarkSchema::mediapipe_pose();
//! let mut smoother = SkeletonFilter::default();
//! let calculator = AngleCalculator::new(0.5);
//!
//! let raw: PoseFrame = next_frame();
//! let mut frame = smoother.filter_frame(&raw);
//! let frames = FrameBundle::compute(&frame, 0.5);
//! let measurements = calculator.measure_all(&mut frame, &schema, &frames);
//!
//! for (joint, m) in &measurements {
//!     println!("{joint}: {:.1}° ({})", m.angle_degrees, m.plane.name());
//! }
//! # }
//! ```
//!
//! ## Comparing a recorded movement against a reference
//!
//! ```
//! use motion_assessment::comparison::MovementComparator;
//! use motion_assessment::landmark::PoseFrame;
//!
//! let reference: Vec<PoseFrame> = Vec::new();
//! let user: Vec<PoseFrame> = Vec::new();
//!
//! let comparator = MovementComparator::new();
//! let result = comparator.compare(&reference, &user);
//! // Empty input is a normal "no data yet" state, scored zero
//! assert_eq!(result.overall_score, 0.0);
//! ```
//!
//! ## Generating feedback
//!
//! ```
//! use motion_assessment::feedback::{FeedbackGenerator, SkillLevel};
//!
//! let generator = FeedbackGenerator::new();
//! let report = generator.generate(&[], SkillLevel::Beginner);
//! assert_eq!(report.score, 100.0);
//! ```

/// Landmark, pose-frame, and skeleton-schema types
pub mod landmark;

/// Landmark smoothing filters
pub mod filters;

/// Schema-aware joint resolution
pub mod joints;

/// Anatomical reference frames and measurement planes
pub mod anatomy;

/// Plane-projected joint-angle measurement
pub mod angles;

/// Shoulder Euler decomposition
pub mod euler;

/// Movement comparison and temporal alignment
pub mod comparison;

/// Prioritized feedback generation
pub mod feedback;

/// Error types and result handling
pub mod error;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

pub use error::{Error, Result};
