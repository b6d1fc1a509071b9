//! Shoulder Euler decomposition.
//!
//! A single plane-projected angle cannot describe full shoulder mobility,
//! so the upper-arm frame's rotation relative to the trunk frame is
//! decomposed into the three clinically standard components of a Y-X-Y
//! sequence: elevation, plane of elevation, and axial rotation.

use crate::anatomy::{AnatomicalReferenceFrame, FrameBundle};
use crate::Result;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Clinically standard shoulder rotation components, in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShoulderEuler {
    /// Arm elevation: 0° at the side, 180° overhead
    pub elevation: f64,
    /// Plane of elevation: 0° ≈ forward (sagittal), 90° ≈ sideways (coronal)
    pub plane_of_elevation: f64,
    /// Axial rotation: positive external, negative internal
    pub rotation: f64,
    /// min(trunk frame confidence, upper-arm frame confidence)
    pub confidence: f64,
}

/// Rotation of the upper-arm frame expressed in trunk coordinates:
/// `R[(i, j)]` is the dot product of the arm's j-th axis with the trunk's
/// i-th axis
fn relative_rotation(trunk: &AnatomicalReferenceFrame, arm: &AnatomicalReferenceFrame) -> Matrix3<f64> {
    let trunk_axes = [trunk.x_axis, trunk.y_axis, trunk.z_axis];
    let arm_axes = [arm.x_axis, arm.y_axis, arm.z_axis];
    Matrix3::from_fn(|i, j| trunk_axes[i].dot(&arm_axes[j]))
}

/// Decompose two frames into Y-X-Y shoulder components
#[must_use]
pub fn decompose(trunk: &AnatomicalReferenceFrame, arm: &AnatomicalReferenceFrame) -> ShoulderEuler {
    let r = relative_rotation(trunk, arm);

    let elevation = r[(1, 1)].clamp(-1.0, 1.0).acos().to_degrees();
    let plane_of_elevation = r[(0, 1)].atan2(r[(2, 1)]).to_degrees();
    let rotation = r[(1, 0)].atan2(-r[(1, 2)]).to_degrees();

    ShoulderEuler {
        elevation,
        plane_of_elevation,
        rotation,
        confidence: trunk.confidence.min(arm.confidence),
    }
}

/// Decompose the shoulder of one side from a frame bundle.
///
/// # Errors
///
/// `Error::FrameUnavailable` when the trunk or that side's upper-arm frame
/// was not computed (typically an occluded arm).
pub fn decompose_shoulder(frames: &FrameBundle, side: &str) -> Result<ShoulderEuler> {
    let trunk = frames.trunk()?;
    let arm = frames.upper_arm(side)?;
    Ok(decompose(trunk, arm))
}
