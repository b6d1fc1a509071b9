//! Landmark, pose-frame, and skeleton-schema types.
//!
//! Landmarks arrive from an external pose-detection collaborator in a
//! model-defined normalized coordinate space. The schema describes which
//! landmarks the model produces and in what order, so the rest of the
//! pipeline can address them by anatomical name instead of numeric index.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single body landmark for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate (model-normalized)
    pub x: f64,
    /// Y coordinate (model-normalized)
    pub y: f64,
    /// Z coordinate (model-normalized depth)
    pub z: f64,
    /// Detection confidence in [0, 1]
    pub visibility: f64,
    /// Position in the schema's landmark list
    pub index: usize,
    /// Anatomical landmark name (e.g. "left_shoulder")
    pub name: String,
}

impl Landmark {
    /// Create a new landmark
    pub fn new(x: f64, y: f64, z: f64, visibility: f64, index: usize, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
            index,
            name: name.into(),
        }
    }

    /// Position as a 3D vector
    #[must_use]
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Whether the landmark meets a minimum visibility threshold
    #[must_use]
    pub fn is_visible(&self, min_visibility: f64) -> bool {
        self.visibility >= min_visibility
    }
}

/// One frame of pose data: landmarks plus lazily populated joint angles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Frame timestamp in seconds, monotonically increasing per session
    pub timestamp: f64,
    /// Landmarks in schema order
    pub landmarks: Vec<Landmark>,
    /// Joint angles in degrees, populated by the angle calculator
    pub angles: HashMap<String, f64>,
}

impl PoseFrame {
    /// Create a frame with no angles computed yet
    #[must_use]
    pub fn new(timestamp: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp,
            landmarks,
            angles: HashMap::new(),
        }
    }

    /// Look up a landmark by anatomical name
    #[must_use]
    pub fn landmark(&self, name: &str) -> Option<&Landmark> {
        self.landmarks.iter().find(|lm| lm.name == name)
    }

    /// Look up a landmark by schema index
    #[must_use]
    pub fn landmark_at(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

/// A skeleton layout: which landmarks a pose model produces, in what order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkSchema {
    /// Schema identifier (e.g. "mediapipe_pose")
    pub name: String,
    /// Landmark names in model output order
    pub landmark_names: Vec<String>,
}

impl LandmarkSchema {
    /// Build a schema from a name list
    pub fn new(name: impl Into<String>, landmark_names: Vec<String>) -> Self {
        Self {
            name: name.into(),
            landmark_names,
        }
    }

    /// Number of landmarks this schema produces per frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmark_names.len()
    }

    /// Whether the schema has no landmarks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmark_names.is_empty()
    }

    /// Numeric index of a landmark name, if the schema provides it
    #[must_use]
    pub fn index_of(&self, landmark_name: &str) -> Option<usize> {
        self.landmark_names.iter().position(|n| n == landmark_name)
    }

    /// Whether the schema provides a landmark under this name
    #[must_use]
    pub fn has_landmark(&self, landmark_name: &str) -> bool {
        self.index_of(landmark_name).is_some()
    }

    /// The 33-landmark MediaPipe Pose layout
    #[must_use]
    pub fn mediapipe_pose() -> Self {
        const NAMES: [&str; 33] = [
            "nose",
            "left_eye_inner",
            "left_eye",
            "left_eye_outer",
            "right_eye_inner",
            "right_eye",
            "right_eye_outer",
            "left_ear",
            "right_ear",
            "mouth_left",
            "mouth_right",
            "left_shoulder",
            "right_shoulder",
            "left_elbow",
            "right_elbow",
            "left_wrist",
            "right_wrist",
            "left_pinky",
            "right_pinky",
            "left_index",
            "right_index",
            "left_thumb",
            "right_thumb",
            "left_hip",
            "right_hip",
            "left_knee",
            "right_knee",
            "left_ankle",
            "right_ankle",
            "left_heel",
            "right_heel",
            "left_foot_index",
            "right_foot_index",
        ];
        Self::new("mediapipe_pose", NAMES.iter().map(|s| (*s).to_string()).collect())
    }

    /// The 17-landmark COCO layout
    #[must_use]
    pub fn coco() -> Self {
        const NAMES: [&str; 17] = [
            "nose",
            "left_eye",
            "right_eye",
            "left_ear",
            "right_ear",
            "left_shoulder",
            "right_shoulder",
            "left_elbow",
            "right_elbow",
            "left_wrist",
            "right_wrist",
            "left_hip",
            "right_hip",
            "left_knee",
            "right_knee",
            "left_ankle",
            "right_ankle",
        ];
        Self::new("coco", NAMES.iter().map(|s| (*s).to_string()).collect())
    }
}
