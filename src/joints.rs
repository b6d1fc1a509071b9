//! Schema-aware joint resolution.
//!
//! Maps an abstract joint name to the three landmark indices needed for a
//! three-point angle, by looking each anatomical landmark name up in the
//! active schema. No numeric landmark index is hard-coded anywhere else in
//! the pipeline, so the same angle logic runs against any skeleton layout
//! that supplies landmarks under these anatomical names.

use crate::landmark::LandmarkSchema;
use crate::{Error, Result};

/// Landmark indices for a three-point angle: vertex plus its two neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTriplet {
    /// Index of the proximal (body-side) landmark
    pub proximal: usize,
    /// Index of the joint vertex landmark
    pub vertex: usize,
    /// Index of the distal landmark
    pub distal: usize,
}

/// Joint definitions keyed by anatomical convention: (joint, [proximal, vertex, distal])
const JOINT_DEFINITIONS: [(&str, [&str; 3]); 10] = [
    ("left_elbow", ["left_shoulder", "left_elbow", "left_wrist"]),
    ("right_elbow", ["right_shoulder", "right_elbow", "right_wrist"]),
    ("left_shoulder", ["left_hip", "left_shoulder", "left_elbow"]),
    ("right_shoulder", ["right_hip", "right_shoulder", "right_elbow"]),
    ("left_knee", ["left_hip", "left_knee", "left_ankle"]),
    ("right_knee", ["right_hip", "right_knee", "right_ankle"]),
    ("left_hip", ["left_shoulder", "left_hip", "left_knee"]),
    ("right_hip", ["right_shoulder", "right_hip", "right_knee"]),
    ("left_wrist", ["left_elbow", "left_wrist", "left_index"]),
    ("right_wrist", ["right_elbow", "right_wrist", "right_index"]),
];

/// Joints measured by a full-skeleton batch computation
pub const MAJOR_JOINTS: [&str; 8] = [
    "left_elbow",
    "right_elbow",
    "left_shoulder",
    "right_shoulder",
    "left_knee",
    "right_knee",
    "left_hip",
    "right_hip",
];

/// Landmark name triplet for a joint, independent of any schema
#[must_use]
pub fn joint_landmark_names(joint: &str) -> Option<&'static [&'static str; 3]> {
    JOINT_DEFINITIONS
        .iter()
        .find(|(name, _)| *name == joint)
        .map(|(_, names)| names)
}

/// Resolve a joint to landmark indices in the given schema.
///
/// # Errors
///
/// `Error::UnknownJoint` when no definition exists for the joint,
/// `Error::UnsupportedJoint` when the schema lacks one of the three
/// required landmark names. Both indicate a configuration mismatch and
/// should not be silently swallowed by callers resolving a single joint.
pub fn resolve(joint: &str, schema: &LandmarkSchema) -> Result<JointTriplet> {
    let names = joint_landmark_names(joint).ok_or_else(|| Error::UnknownJoint(joint.to_string()))?;

    let mut indices = [0usize; 3];
    for (slot, landmark_name) in names.iter().enumerate() {
        indices[slot] = schema.index_of(landmark_name).ok_or_else(|| Error::UnsupportedJoint {
            joint: joint.to_string(),
            missing: (*landmark_name).to_string(),
        })?;
    }

    Ok(JointTriplet {
        proximal: indices[0],
        vertex: indices[1],
        distal: indices[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_mediapipe() {
        let schema = LandmarkSchema::mediapipe_pose();
        let triplet = resolve("left_elbow", &schema).unwrap();
        assert_eq!(triplet.proximal, 11); // left_shoulder
        assert_eq!(triplet.vertex, 13); // left_elbow
        assert_eq!(triplet.distal, 15); // left_wrist
    }

    #[test]
    fn test_resolve_against_coco() {
        let schema = LandmarkSchema::coco();
        let triplet = resolve("left_elbow", &schema).unwrap();
        assert_eq!(triplet.proximal, 5);
        assert_eq!(triplet.vertex, 7);
        assert_eq!(triplet.distal, 9);
    }

    #[test]
    fn test_schemas_agree_on_names() {
        // Same joint resolved against both layouts points at the same-named
        // landmarks, whatever their numeric position
        let mp = LandmarkSchema::mediapipe_pose();
        let coco = LandmarkSchema::coco();
        for joint in ["left_knee", "right_shoulder", "left_hip"] {
            let a = resolve(joint, &mp).unwrap();
            let b = resolve(joint, &coco).unwrap();
            assert_eq!(mp.landmark_names[a.vertex], coco.landmark_names[b.vertex]);
            assert_eq!(mp.landmark_names[a.proximal], coco.landmark_names[b.proximal]);
            assert_eq!(mp.landmark_names[a.distal], coco.landmark_names[b.distal]);
        }
    }

    #[test]
    fn test_unknown_joint() {
        let schema = LandmarkSchema::mediapipe_pose();
        assert!(matches!(resolve("left_jaw", &schema), Err(Error::UnknownJoint(_))));
    }

    #[test]
    fn test_unsupported_joint() {
        // COCO has no hand landmarks, so wrist angles cannot resolve
        let schema = LandmarkSchema::coco();
        match resolve("left_wrist", &schema) {
            Err(Error::UnsupportedJoint { joint, missing }) => {
                assert_eq!(joint, "left_wrist");
                assert_eq!(missing, "left_index");
            }
            other => panic!("expected UnsupportedJoint, got {other:?}"),
        }
    }
}
