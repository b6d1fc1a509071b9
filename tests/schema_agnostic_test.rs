//! The same pose expressed under different skeleton layouts must measure
//! identically: name-based joint resolution is what keeps the angle
//! pipeline schema-agnostic.

use motion_assessment::{
    anatomy::FrameBundle,
    angles::AngleCalculator,
    landmark::{Landmark, LandmarkSchema, PoseFrame},
};
use std::collections::HashMap;

/// Positions for an upright subject with a bent left elbow, by landmark name
fn body_positions() -> HashMap<&'static str, (f64, f64, f64)> {
    HashMap::from([
        ("left_shoulder", (0.2, 1.0, 0.0)),
        ("right_shoulder", (-0.2, 1.0, 0.0)),
        ("left_hip", (0.2, 0.0, 0.0)),
        ("right_hip", (-0.2, 0.0, 0.0)),
        ("left_elbow", (0.2, 0.6, 0.0)),
        ("left_wrist", (0.2, 0.6, 0.4)),
        ("right_elbow", (-0.2, 0.6, 0.0)),
        ("right_wrist", (-0.2, 0.2, 0.0)),
        ("left_knee", (0.2, -0.5, 0.0)),
        ("right_knee", (-0.2, -0.5, 0.0)),
        ("left_ankle", (0.2, -1.0, 0.0)),
        ("right_ankle", (-0.2, -1.0, 0.0)),
    ])
}

/// Lay the same body out under a given schema; landmarks the body does not
/// define sit at the origin with zero visibility
fn frame_for_schema(schema: &LandmarkSchema) -> PoseFrame {
    let positions = body_positions();
    let landmarks = schema
        .landmark_names
        .iter()
        .enumerate()
        .map(|(index, name)| match positions.get(name.as_str()) {
            Some(&(x, y, z)) => Landmark::new(x, y, z, 0.9, index, name.clone()),
            None => Landmark::new(0.0, 0.0, 0.0, 0.0, index, name.clone()),
        })
        .collect();
    PoseFrame::new(0.0, landmarks)
}

#[test]
fn same_pose_measures_identically_across_schemas() {
    let calculator = AngleCalculator::new(0.5);

    let mediapipe = LandmarkSchema::mediapipe_pose();
    let coco = LandmarkSchema::coco();

    let mut mp_frame = frame_for_schema(&mediapipe);
    let mut coco_frame = frame_for_schema(&coco);

    let mp_bundle = FrameBundle::compute(&mp_frame, 0.5);
    let coco_bundle = FrameBundle::compute(&coco_frame, 0.5);

    let mp_angles = calculator.measure_all(&mut mp_frame, &mediapipe, &mp_bundle);
    let coco_angles = calculator.measure_all(&mut coco_frame, &coco, &coco_bundle);

    assert!(!mp_angles.is_empty());
    assert_eq!(
        mp_angles.keys().collect::<std::collections::BTreeSet<_>>(),
        coco_angles.keys().collect::<std::collections::BTreeSet<_>>()
    );
    for (joint, mp) in &mp_angles {
        let other = &coco_angles[joint];
        assert!(
            (mp.angle_degrees - other.angle_degrees).abs() < 1e-9,
            "{joint}: {} vs {}",
            mp.angle_degrees,
            other.angle_degrees
        );
        assert_eq!(mp.plane, other.plane);
    }
}

#[test]
fn bent_elbow_measures_90_under_both_schemas() {
    let calculator = AngleCalculator::new(0.5);
    for schema in [LandmarkSchema::mediapipe_pose(), LandmarkSchema::coco()] {
        let mut frame = frame_for_schema(&schema);
        let bundle = FrameBundle::compute(&frame, 0.5);
        let angles = calculator.measure_all(&mut frame, &schema, &bundle);
        let elbow = &angles["left_elbow"];
        assert!((elbow.angle_degrees - 90.0).abs() < 1e-9);
    }
}
