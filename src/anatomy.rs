//! Anatomical reference frames and measurement planes.
//!
//! Per-segment orthonormal coordinate frames (trunk, each upper arm) are
//! built from landmark positions once per frame and passed explicitly to
//! the consumers that need them; nothing here is cached ambiently. The
//! measurement plane for each joint type is a fixed clinical convention,
//! derived from the trunk frame, and is what removes camera-perspective
//! foreshortening from the angle computation.

use crate::constants::{DEGENERATE_NORM, SCAPULAR_PLANE_OFFSET_DEG};
use crate::landmark::{Landmark, PoseFrame};
use crate::{Error, Result};
use nalgebra::{Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// Orthonormal coordinate frame for a body segment
#[derive(Debug, Clone)]
pub struct AnatomicalReferenceFrame {
    /// Frame origin in landmark space
    pub origin: Vector3<f64>,
    /// Lateral axis
    pub x_axis: Vector3<f64>,
    /// Longitudinal (up) axis
    pub y_axis: Vector3<f64>,
    /// Anterior axis
    pub z_axis: Vector3<f64>,
    /// Minimum visibility of the landmarks used to build the frame
    pub confidence: f64,
}

/// Clinically standard measurement planes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneKind {
    /// Forward/back flexion-extension plane
    Sagittal,
    /// Side-to-side plane
    Coronal,
    /// Coronal plane rotated anterior, for shoulder measurement
    Scapular,
}

impl PlaneKind {
    /// Plane name as a string
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sagittal => "sagittal",
            Self::Coronal => "coronal",
            Self::Scapular => "scapular",
        }
    }
}

/// A measurement plane: kind plus unit normal in landmark space
#[derive(Debug, Clone)]
pub struct AnatomicalPlane {
    /// Which clinical plane this is
    pub kind: PlaneKind,
    /// Unit normal vector
    pub normal: Vector3<f64>,
}

/// Measurement plane for each joint type. Fixed table, not configurable
/// per call: shoulder measures in the scapular plane, elbow and knee in
/// the sagittal, hip in the coronal, anything unrecognized defaults to
/// sagittal.
#[must_use]
pub fn plane_for_joint(joint: &str) -> PlaneKind {
    if joint.ends_with("shoulder") {
        PlaneKind::Scapular
    } else if joint.ends_with("hip") {
        PlaneKind::Coronal
    } else {
        // elbow, knee, and the safe default
        PlaneKind::Sagittal
    }
}

/// All reference frames derivable from one pose frame.
///
/// Segments whose landmarks are occluded are simply absent; consumers fail
/// per-joint with `FrameUnavailable` rather than aborting the whole frame.
#[derive(Debug, Clone, Default)]
pub struct FrameBundle {
    /// Trunk frame, from shoulders and hips
    pub trunk: Option<AnatomicalReferenceFrame>,
    /// Left upper-arm frame
    pub left_upper_arm: Option<AnatomicalReferenceFrame>,
    /// Right upper-arm frame
    pub right_upper_arm: Option<AnatomicalReferenceFrame>,
}

impl FrameBundle {
    /// Build every frame the landmarks allow.
    ///
    /// Individual segment failures (occlusion, low visibility) are logged
    /// and leave that slot empty.
    #[must_use]
    pub fn compute(frame: &PoseFrame, min_visibility: f64) -> Self {
        let trunk = match trunk_frame(frame, min_visibility) {
            Ok(f) => Some(f),
            Err(e) => {
                log::debug!("trunk frame unavailable: {e}");
                None
            }
        };
        let left_upper_arm = match upper_arm_frame(frame, "left", min_visibility) {
            Ok(f) => Some(f),
            Err(e) => {
                log::debug!("left upper-arm frame unavailable: {e}");
                None
            }
        };
        let right_upper_arm = match upper_arm_frame(frame, "right", min_visibility) {
            Ok(f) => Some(f),
            Err(e) => {
                log::debug!("right upper-arm frame unavailable: {e}");
                None
            }
        };
        Self {
            trunk,
            left_upper_arm,
            right_upper_arm,
        }
    }

    /// Trunk frame or `FrameUnavailable`
    pub fn trunk(&self) -> Result<&AnatomicalReferenceFrame> {
        self.trunk.as_ref().ok_or(Error::FrameUnavailable {
            segment: "trunk".to_string(),
        })
    }

    /// Upper-arm frame for a side ("left"/"right") or `FrameUnavailable`
    pub fn upper_arm(&self, side: &str) -> Result<&AnatomicalReferenceFrame> {
        let slot = match side {
            "left" => &self.left_upper_arm,
            "right" => &self.right_upper_arm,
            _ => {
                return Err(Error::InvalidInput(format!("unknown side: {side}")));
            }
        };
        slot.as_ref().ok_or_else(|| Error::FrameUnavailable {
            segment: format!("{side}_upper_arm"),
        })
    }

    /// Measurement plane for a joint, derived from the trunk frame
    pub fn plane_for(&self, joint: &str) -> Result<AnatomicalPlane> {
        let trunk = self.trunk()?;
        let kind = plane_for_joint(joint);
        let normal = match kind {
            // Sagittal plane contains the up and forward axes; lateral is normal
            PlaneKind::Sagittal => trunk.x_axis,
            // Coronal plane contains up and lateral; forward is normal
            PlaneKind::Coronal => trunk.z_axis,
            PlaneKind::Scapular => {
                // Coronal normal swung anterior about the trunk's vertical axis
                let axis = Unit::new_normalize(trunk.y_axis);
                let rot = Rotation3::from_axis_angle(&axis, SCAPULAR_PLANE_OFFSET_DEG.to_radians());
                rot * trunk.z_axis
            }
        };
        Ok(AnatomicalPlane { kind, normal })
    }
}

/// Fetch a landmark by name and enforce the visibility threshold
fn visible_landmark<'a>(frame: &'a PoseFrame, name: &str, min_visibility: f64) -> Result<&'a Landmark> {
    let lm = frame.landmark(name).ok_or_else(|| Error::UnsupportedJoint {
        joint: name.to_string(),
        missing: name.to_string(),
    })?;
    if !lm.is_visible(min_visibility) {
        return Err(Error::InsufficientConfidence {
            landmark: name.to_string(),
            visibility: lm.visibility,
            required: min_visibility,
        });
    }
    Ok(lm)
}

fn normalized(v: Vector3<f64>, context: &str) -> Result<Vector3<f64>> {
    let norm = v.norm();
    if norm < DEGENERATE_NORM {
        return Err(Error::DegenerateGeometry(format!("zero-length vector: {context}")));
    }
    Ok(v / norm)
}

/// Build the trunk reference frame from shoulders and hips.
///
/// Origin at the hip midpoint, y up the spine, z anterior, x lateral.
pub fn trunk_frame(frame: &PoseFrame, min_visibility: f64) -> Result<AnatomicalReferenceFrame> {
    let ls = visible_landmark(frame, "left_shoulder", min_visibility)?;
    let rs = visible_landmark(frame, "right_shoulder", min_visibility)?;
    let lh = visible_landmark(frame, "left_hip", min_visibility)?;
    let rh = visible_landmark(frame, "right_hip", min_visibility)?;

    let shoulder_mid = (ls.position() + rs.position()) / 2.0;
    let hip_mid = (lh.position() + rh.position()) / 2.0;

    let y_axis = normalized(shoulder_mid - hip_mid, "trunk spine")?;
    let shoulder_line = normalized(ls.position() - rs.position(), "trunk shoulder line")?;
    let z_axis = normalized(shoulder_line.cross(&y_axis), "trunk anterior")?;
    let x_axis = y_axis.cross(&z_axis);

    let confidence = ls.visibility.min(rs.visibility).min(lh.visibility).min(rh.visibility);

    Ok(AnatomicalReferenceFrame {
        origin: hip_mid,
        x_axis,
        y_axis,
        z_axis,
        confidence,
    })
}

/// Build an upper-arm frame for one side.
///
/// Origin at the shoulder, y along elbow-to-shoulder (so the arm hanging
/// at the side aligns with the trunk's vertical axis), remaining axes from
/// the forearm direction.
pub fn upper_arm_frame(frame: &PoseFrame, side: &str, min_visibility: f64) -> Result<AnatomicalReferenceFrame> {
    let shoulder = visible_landmark(frame, &format!("{side}_shoulder"), min_visibility)?;
    let elbow = visible_landmark(frame, &format!("{side}_elbow"), min_visibility)?;
    let wrist = visible_landmark(frame, &format!("{side}_wrist"), min_visibility)?;

    let y_axis = normalized(shoulder.position() - elbow.position(), "upper arm")?;
    let forearm = normalized(wrist.position() - elbow.position(), "forearm")?;

    // Forearm parallel to the upper arm (straight arm) leaves the frame
    // roll unconstrained; pick a stable perpendicular instead
    let x_raw = y_axis.cross(&forearm);
    let x_axis = if x_raw.norm() < DEGENERATE_NORM {
        any_perpendicular(&y_axis)
    } else {
        x_raw / x_raw.norm()
    };
    let z_axis = x_axis.cross(&y_axis);

    let confidence = shoulder.visibility.min(elbow.visibility).min(wrist.visibility);

    Ok(AnatomicalReferenceFrame {
        origin: shoulder.position(),
        x_axis,
        y_axis,
        z_axis,
        confidence,
    })
}

/// A unit vector perpendicular to `v`, chosen from the world axis least
/// aligned with it
fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let candidate = if v.x.abs() < v.y.abs().min(v.z.abs()) {
        Vector3::x()
    } else if v.y.abs() < v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let perp = v.cross(&candidate);
    perp / perp.norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upright_frame() -> PoseFrame {
        // Subject facing the camera, y up. Image-space handedness is not
        // assumed; only axis orthonormality and relative geometry matter.
        let mk = |name: &str, idx, x: f64, y: f64, z: f64| Landmark::new(x, y, z, 0.9, idx, name);
        PoseFrame::new(
            0.0,
            vec![
                mk("left_shoulder", 0, 0.2, 1.0, 0.0),
                mk("right_shoulder", 1, -0.2, 1.0, 0.0),
                mk("left_hip", 2, 0.15, 0.0, 0.0),
                mk("right_hip", 3, -0.15, 0.0, 0.0),
                mk("left_elbow", 4, 0.25, 0.7, 0.0),
                mk("left_wrist", 5, 0.3, 0.4, 0.1),
            ],
        )
    }

    #[test]
    fn test_trunk_frame_orthonormal() {
        let frame = trunk_frame(&upright_frame(), 0.5).unwrap();
        assert!((frame.x_axis.norm() - 1.0).abs() < 1e-9);
        assert!((frame.y_axis.norm() - 1.0).abs() < 1e-9);
        assert!((frame.z_axis.norm() - 1.0).abs() < 1e-9);
        assert!(frame.x_axis.dot(&frame.y_axis).abs() < 1e-9);
        assert!(frame.y_axis.dot(&frame.z_axis).abs() < 1e-9);
        assert!(frame.x_axis.dot(&frame.z_axis).abs() < 1e-9);
        // Spine points up
        assert!((frame.y_axis - Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn test_trunk_confidence_is_min_visibility() {
        let mut pose = upright_frame();
        pose.landmarks[2].visibility = 0.6;
        let frame = trunk_frame(&pose, 0.5).unwrap();
        assert!((frame.confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_low_visibility_rejected() {
        let mut pose = upright_frame();
        pose.landmarks[0].visibility = 0.2;
        match trunk_frame(&pose, 0.5) {
            Err(Error::InsufficientConfidence { landmark, .. }) => {
                assert_eq!(landmark, "left_shoulder");
            }
            other => panic!("expected InsufficientConfidence, got {other:?}"),
        }
    }

    #[test]
    fn test_upper_arm_frame_points_up_arm() {
        let frame = upper_arm_frame(&upright_frame(), "left", 0.5).unwrap();
        // Elbow below shoulder: y axis points up toward the shoulder
        assert!(frame.y_axis.y > 0.9);
        assert!(frame.x_axis.dot(&frame.y_axis).abs() < 1e-9);
    }

    #[test]
    fn test_plane_table() {
        assert_eq!(plane_for_joint("left_shoulder"), PlaneKind::Scapular);
        assert_eq!(plane_for_joint("right_elbow"), PlaneKind::Sagittal);
        assert_eq!(plane_for_joint("left_knee"), PlaneKind::Sagittal);
        assert_eq!(plane_for_joint("right_hip"), PlaneKind::Coronal);
        assert_eq!(plane_for_joint("left_pinky_toe"), PlaneKind::Sagittal);
    }

    #[test]
    fn test_scapular_plane_rotated_from_coronal() {
        let bundle = FrameBundle::compute(&upright_frame(), 0.5);
        let coronal = bundle.plane_for("left_hip").unwrap();
        let scapular = bundle.plane_for("left_shoulder").unwrap();
        let angle = coronal.normal.dot(&scapular.normal).clamp(-1.0, 1.0).acos().to_degrees();
        assert!((angle - SCAPULAR_PLANE_OFFSET_DEG).abs() < 1e-6);
    }

    #[test]
    fn test_missing_frame_reported() {
        let bundle = FrameBundle::default();
        match bundle.trunk() {
            Err(Error::FrameUnavailable { segment }) => assert_eq!(segment, "trunk"),
            other => panic!("expected FrameUnavailable, got {other:?}"),
        }
        assert!(bundle.upper_arm("right").is_err());
    }

    #[test]
    fn test_degenerate_trunk_rejected() {
        // All landmarks collapsed onto one point
        let mk = |name: &str, idx| Landmark::new(0.5, 0.5, 0.0, 0.9, idx, name);
        let pose = PoseFrame::new(
            0.0,
            vec![
                mk("left_shoulder", 0),
                mk("right_shoulder", 1),
                mk("left_hip", 2),
                mk("right_hip", 3),
            ],
        );
        assert!(matches!(trunk_frame(&pose, 0.5), Err(Error::DegenerateGeometry(_))));
    }
}
