//! Plane-projected joint-angle measurement.
//!
//! Both joint vectors are projected onto the joint's clinical measurement
//! plane before the angle is taken, which removes the foreshortening error
//! a raw 3D (or screen-space) angle picks up when a limb leaves the
//! camera's frontal plane.

use crate::anatomy::{FrameBundle, PlaneKind};
use crate::constants::DEGENERATE_NORM;
use crate::euler::{self, ShoulderEuler};
use crate::joints::{self, MAJOR_JOINTS};
use crate::landmark::{Landmark, LandmarkSchema, PoseFrame};
use crate::{Error, Result};
use nalgebra::Vector3;
use std::collections::HashMap;

/// One joint-angle measurement for one frame
#[derive(Debug, Clone)]
pub struct JointAngleMeasurement {
    /// Joint name
    pub joint: String,
    /// Angle in degrees, in [0, 180]
    pub angle_degrees: f64,
    /// Average visibility of the three landmarks used
    pub confidence: f64,
    /// Plane the angle was measured in
    pub plane: PlaneKind,
    /// Timestamp of the source frame, seconds
    pub timestamp: f64,
    /// Euler components, present only for multi-DOF joints (shoulder)
    pub euler: Option<ShoulderEuler>,
}

/// Computes plane-projected joint angles from resolved landmark triplets
#[derive(Debug, Clone)]
pub struct AngleCalculator {
    min_visibility: f64,
}

impl AngleCalculator {
    /// Create a calculator enforcing the given minimum landmark visibility
    ///
    /// # Panics
    ///
    /// Panics if `min_visibility` is outside [0, 1]
    #[must_use]
    pub fn new(min_visibility: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&min_visibility),
            "Minimum visibility must be in [0, 1]"
        );
        Self { min_visibility }
    }

    /// Measure a single joint's plane-projected angle.
    ///
    /// Requires the relevant reference frames to have been computed for
    /// this frame already; this method consumes, never recomputes, them.
    ///
    /// # Errors
    ///
    /// `UnknownJoint` / `UnsupportedJoint` on a joint-table/schema mismatch,
    /// `InsufficientConfidence` when any of the three landmarks is below
    /// the visibility threshold, `FrameUnavailable` when the trunk frame
    /// (for the measurement plane) or, for shoulders, the arm frame is
    /// missing, `DegenerateGeometry` when a joint vector vanishes in the
    /// projection.
    pub fn measure(
        &self,
        frame: &PoseFrame,
        joint: &str,
        schema: &LandmarkSchema,
        frames: &FrameBundle,
    ) -> Result<JointAngleMeasurement> {
        let triplet = joints::resolve(joint, schema)?;

        let proximal = self.landmark_at(frame, triplet.proximal)?;
        let vertex = self.landmark_at(frame, triplet.vertex)?;
        let distal = self.landmark_at(frame, triplet.distal)?;

        let plane = frames.plane_for(joint)?;

        let v1 = project_onto_plane(proximal.position() - vertex.position(), &plane.normal, joint)?;
        let v2 = project_onto_plane(distal.position() - vertex.position(), &plane.normal, joint)?;

        let angle_degrees = v1.dot(&v2).clamp(-1.0, 1.0).acos().to_degrees();
        let confidence = (proximal.visibility + vertex.visibility + distal.visibility) / 3.0;

        // Shoulders carry the full 3-DOF decomposition alongside the
        // plane-projected angle; an occluded arm drops only the Euler part
        let euler = if joint.ends_with("shoulder") {
            let side = joint.trim_end_matches("_shoulder");
            match euler::decompose_shoulder(frames, side) {
                Ok(e) => Some(e),
                Err(e) => {
                    log::debug!("euler decomposition skipped for {joint}: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(JointAngleMeasurement {
            joint: joint.to_string(),
            angle_degrees,
            confidence,
            plane: plane.kind,
            timestamp: frame.timestamp,
            euler,
        })
    }

    /// Measure every major joint, omitting those that fail.
    ///
    /// Per-joint failures are caught so one occluded limb never prevents
    /// reporting the rest of the body. Configuration-level mismatches
    /// (`UnknownJoint`, `UnsupportedJoint`) are logged at warn level since
    /// they will never resolve at runtime; transient ones at debug.
    /// Successful angles are also written into the frame's lazy angle map.
    pub fn measure_all(
        &self,
        frame: &mut PoseFrame,
        schema: &LandmarkSchema,
        frames: &FrameBundle,
    ) -> HashMap<String, JointAngleMeasurement> {
        let mut results = HashMap::new();
        for joint in MAJOR_JOINTS {
            match self.measure(frame, joint, schema, frames) {
                Ok(measurement) => {
                    frame.angles.insert(joint.to_string(), measurement.angle_degrees);
                    results.insert(joint.to_string(), measurement);
                }
                Err(e @ (Error::UnknownJoint(_) | Error::UnsupportedJoint { .. })) => {
                    log::warn!("joint table / schema mismatch for {joint}: {e}");
                }
                Err(e) => {
                    log::debug!("skipping {joint}: {e}");
                }
            }
        }
        results
    }

    fn landmark_at<'a>(&self, frame: &'a PoseFrame, index: usize) -> Result<&'a Landmark> {
        let lm = frame
            .landmark_at(index)
            .ok_or_else(|| Error::InvalidInput(format!("frame has no landmark at index {index}")))?;
        if !lm.is_visible(self.min_visibility) {
            return Err(Error::InsufficientConfidence {
                landmark: lm.name.clone(),
                visibility: lm.visibility,
                required: self.min_visibility,
            });
        }
        Ok(lm)
    }
}

/// Project a vector onto a plane (drop the normal component) and
/// renormalize. A vector parallel to the normal has no in-plane direction
/// and is reported as degenerate.
fn project_onto_plane(v: Vector3<f64>, normal: &Vector3<f64>, context: &str) -> Result<Vector3<f64>> {
    let projected = v - normal * v.dot(normal);
    let norm = projected.norm();
    if norm < DEGENERATE_NORM {
        return Err(Error::DegenerateGeometry(format!(
            "joint vector for {context} is normal to the measurement plane"
        )));
    }
    Ok(projected / norm)
}
