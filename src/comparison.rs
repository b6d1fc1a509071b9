//! Movement comparison and temporal alignment.
//!
//! Compares a reference pose-angle sequence against a user sequence and
//! produces per-joint deviations, tempo/phase alignment, and a blended
//! overall score. Batch mode runs once over complete sequences; streaming
//! mode keeps a bounded sliding window so per-frame cost stays independent
//! of session length.

use crate::constants::{
    ANGLE_SCORE_WEIGHT, DEVIATION_GOOD_DEG, DEVIATION_WARNING_DEG, PHASE_TOLERANCE_SECS, RANGE_DEFICIT_RATIO,
    SCORE_CRITICAL, SCORE_GOOD, SCORE_WARNING, STREAMING_WINDOW_CAPACITY, STREAMING_WINDOW_MIN, TEMPO_SCORE_WEIGHT,
};
use crate::landmark::PoseFrame;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Deviation severity buckets. Thresholds are fixed policy, not
/// user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Within tolerance
    Good,
    /// Noticeable deviation
    Warning,
    /// Deviation large enough to matter clinically
    Critical,
}

impl Severity {
    /// Bucket an absolute angle deviation in degrees
    #[must_use]
    pub fn from_deviation(deviation_degrees: f64) -> Self {
        if deviation_degrees <= DEVIATION_GOOD_DEG {
            Self::Good
        } else if deviation_degrees <= DEVIATION_WARNING_DEG {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    fn angle_score(self) -> f64 {
        match self {
            Self::Good => SCORE_GOOD,
            Self::Warning => SCORE_WARNING,
            Self::Critical => SCORE_CRITICAL,
        }
    }
}

/// Per-joint deviation between reference and user sequences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngleDeviation {
    /// Joint name
    pub joint: String,
    /// Mean reference angle, degrees
    pub reference_angle: f64,
    /// Mean user angle, degrees
    pub user_angle: f64,
    /// Absolute difference of the means, degrees
    pub deviation: f64,
    /// Severity bucket for the deviation
    pub severity: Severity,
}

/// Tempo and phase relationship between the two sequences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalAlignment {
    /// Start-time offset between sequences, seconds
    pub time_offset: f64,
    /// Mean per-frame pose similarity over the overlapping range, in [0, 1]
    pub confidence: f64,
    /// `user_duration / reference_duration`; >1 means the user moved slower
    pub speed_ratio: f64,
    /// Fraction of reference phase points matched by a user phase point
    pub phase_alignment: f64,
}

impl Default for TemporalAlignment {
    fn default() -> Self {
        Self {
            time_offset: 0.0,
            confidence: 0.0,
            speed_ratio: 1.0,
            phase_alignment: 0.0,
        }
    }
}

/// Outcome of comparing a user sequence against a reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Blended 0-100 score
    pub overall_score: f64,
    /// Per-joint deviations
    pub angle_deviations: Vec<AngleDeviation>,
    /// Tempo/phase alignment
    pub temporal: TemporalAlignment,
    /// Human-readable observations (range deficits, tempo)
    pub recommendations: Vec<String>,
}

impl ComparisonResult {
    /// The zero-score result used when either sequence is empty.
    /// "No data yet" is a normal streaming state, not an error.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            overall_score: 0.0,
            angle_deviations: Vec::new(),
            temporal: TemporalAlignment::default(),
            recommendations: Vec::new(),
        }
    }
}

/// Batch movement comparator
#[derive(Debug, Clone, Default)]
pub struct MovementComparator;

impl MovementComparator {
    /// Create a comparator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compare complete reference and user sequences.
    ///
    /// Empty input on either side yields the zero-score empty result.
    /// Frames are expected with angles already populated by the angle
    /// calculator; joints are tracked when both sequences carry them.
    #[must_use]
    pub fn compare(&self, reference: &[PoseFrame], user: &[PoseFrame]) -> ComparisonResult {
        if reference.is_empty() || user.is_empty() {
            return ComparisonResult::empty();
        }

        let joints = tracked_joints(reference, user);
        let mut angle_deviations = Vec::with_capacity(joints.len());
        let mut recommendations = Vec::new();

        for joint in &joints {
            let ref_series = angle_series(reference, joint);
            let user_series = angle_series(user, joint);
            if ref_series.is_empty() || user_series.is_empty() {
                continue;
            }

            let reference_angle = mean(&ref_series);
            let user_angle = mean(&user_series);
            let deviation = (reference_angle - user_angle).abs();
            let severity = Severity::from_deviation(deviation);

            let ref_range = range(&ref_series);
            let user_range = range(&user_series);
            if ref_range > DEVIATION_GOOD_DEG && user_range < ref_range * RANGE_DEFICIT_RATIO {
                recommendations.push(format!(
                    "Incomplete range of motion at {joint}: {user_range:.0}° covered vs {ref_range:.0}° in the reference"
                ));
            }

            angle_deviations.push(AngleDeviation {
                joint: joint.clone(),
                reference_angle,
                user_angle,
                deviation,
                severity,
            });
        }

        let speed_ratio = speed_ratio(reference, user);
        let temporal = TemporalAlignment {
            time_offset: user[0].timestamp - reference[0].timestamp,
            confidence: alignment_confidence(reference, user, &joints),
            speed_ratio,
            phase_alignment: phase_alignment(reference, user, &joints, speed_ratio),
        };

        if temporal.speed_ratio > 1.25 {
            recommendations.push("Movement slower than the reference; work toward the target tempo".to_string());
        } else if temporal.speed_ratio < 0.8 {
            recommendations.push("Movement faster than the reference; slow down for control".to_string());
        }

        let overall_score = overall_score(&angle_deviations, temporal.speed_ratio);

        ComparisonResult {
            overall_score,
            angle_deviations,
            temporal,
            recommendations,
        }
    }
}

/// Streaming comparison over a bounded window of recent user frames.
///
/// User frames must be appended in increasing timestamp order; the session
/// owns its window exclusively and must be reset between repetitions or
/// after a tracking gap.
pub struct StreamingSession {
    reference: Vec<PoseFrame>,
    window: VecDeque<PoseFrame>,
    frames_seen: usize,
    comparator: MovementComparator,
}

impl StreamingSession {
    /// Start a session against a reference sequence
    #[must_use]
    pub fn new(reference: Vec<PoseFrame>) -> Self {
        log::info!(
            "starting streaming comparison session ({} reference frames)",
            reference.len()
        );
        Self {
            reference,
            window: VecDeque::with_capacity(STREAMING_WINDOW_CAPACITY),
            frames_seen: 0,
            comparator: MovementComparator::new(),
        }
    }

    /// Append a user frame and, once the window is warm, return an
    /// intermediate comparison against the corresponding reference window.
    pub fn push_frame(&mut self, frame: PoseFrame) -> Option<ComparisonResult> {
        if let Some(last) = self.window.back() {
            if frame.timestamp < last.timestamp {
                log::warn!(
                    "streaming frame out of order ({} < {}); velocity-sensitive results may degrade",
                    frame.timestamp,
                    last.timestamp
                );
            }
        }

        if self.window.len() >= STREAMING_WINDOW_CAPACITY {
            self.window.pop_front();
        }
        self.window.push_back(frame);
        self.frames_seen += 1;

        if self.window.len() < STREAMING_WINDOW_MIN || self.reference.is_empty() {
            return None;
        }

        // Map the current user frame index proportionally into the
        // reference and compare against the window ending there
        let ref_end = self.frames_seen.min(self.reference.len());
        let ref_start = ref_end.saturating_sub(self.window.len());
        let user_window: Vec<PoseFrame> = self.window.iter().cloned().collect();

        Some(self.comparator.compare(&self.reference[ref_start..ref_end], &user_window))
    }

    /// Number of user frames accepted so far
    #[must_use]
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Clear the window for a new repetition or after a tracking gap
    pub fn reset(&mut self) {
        log::debug!("resetting streaming session after {} frames", self.frames_seen);
        self.window.clear();
        self.frames_seen = 0;
    }
}

/// Joints present in the angle maps of both sequences
fn tracked_joints(reference: &[PoseFrame], user: &[PoseFrame]) -> Vec<String> {
    let in_ref: BTreeSet<&String> = reference.iter().flat_map(|f| f.angles.keys()).collect();
    let in_user: BTreeSet<&String> = user.iter().flat_map(|f| f.angles.keys()).collect();
    in_ref.intersection(&in_user).map(|s| (*s).clone()).collect()
}

fn angle_series(frames: &[PoseFrame], joint: &str) -> Vec<f64> {
    frames.iter().filter_map(|f| f.angles.get(joint).copied()).collect()
}

fn mean(series: &[f64]) -> f64 {
    series.iter().sum::<f64>() / series.len() as f64
}

fn range(series: &[f64]) -> f64 {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max - min
}

/// `user_duration / reference_duration`; >1 means the user moved slower
fn speed_ratio(reference: &[PoseFrame], user: &[PoseFrame]) -> f64 {
    let ref_duration = duration(reference);
    let user_duration = duration(user);
    if ref_duration <= 0.0 || user_duration <= 0.0 {
        return 1.0;
    }
    user_duration / ref_duration
}

fn duration(frames: &[PoseFrame]) -> f64 {
    match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => last.timestamp - first.timestamp,
        _ => 0.0,
    }
}

/// Mean per-frame pose similarity (1 − normalized mean angular difference)
/// over the overlapping frame range
fn alignment_confidence(reference: &[PoseFrame], user: &[PoseFrame], joints: &[String]) -> f64 {
    if joints.is_empty() {
        return 0.0;
    }
    let overlap = reference.len().min(user.len());
    if overlap == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..overlap {
        let mut diff_sum = 0.0;
        let mut counted = 0usize;
        for joint in joints {
            if let (Some(r), Some(u)) = (reference[i].angles.get(joint), user[i].angles.get(joint)) {
                diff_sum += (r - u).abs() / 180.0;
                counted += 1;
            }
        }
        if counted > 0 {
            total += 1.0 - diff_sum / counted as f64;
        }
    }
    total / overlap as f64
}

/// Timestamps (relative to sequence start) of local angle peaks and valleys
fn phase_points(frames: &[PoseFrame], joints: &[String]) -> Vec<f64> {
    let Some(first) = frames.first() else {
        return Vec::new();
    };
    let start = first.timestamp;
    let mut points = Vec::new();

    for joint in joints {
        let series: Vec<(f64, f64)> = frames
            .iter()
            .filter_map(|f| f.angles.get(joint).map(|a| (f.timestamp - start, *a)))
            .collect();
        for w in series.windows(3) {
            let (_, prev) = w[0];
            let (t, current) = w[1];
            let (_, next) = w[2];
            let is_peak = current > prev && current > next;
            let is_valley = current < prev && current < next;
            if is_peak || is_valley {
                points.push(t);
            }
        }
    }
    points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    points
}

/// Fraction of reference phase points with a user phase point within
/// tolerance, after mapping user times onto the reference timeline
fn phase_alignment(reference: &[PoseFrame], user: &[PoseFrame], joints: &[String], speed_ratio: f64) -> f64 {
    let ref_points = phase_points(reference, joints);
    if ref_points.is_empty() {
        return 1.0;
    }
    let user_points: Vec<f64> = phase_points(user, joints)
        .into_iter()
        .map(|t| if speed_ratio > 0.0 { t / speed_ratio } else { t })
        .collect();
    if user_points.is_empty() {
        return 0.0;
    }

    let matched = ref_points
        .iter()
        .filter(|rp| {
            user_points
                .iter()
                .any(|up| (*up - **rp).abs() <= PHASE_TOLERANCE_SECS)
        })
        .count();
    matched as f64 / ref_points.len() as f64
}

/// 70% angle-deviation score, 30% tempo score
fn overall_score(deviations: &[AngleDeviation], speed_ratio: f64) -> f64 {
    if deviations.is_empty() {
        return 0.0;
    }
    let angle_score = deviations.iter().map(|d| d.severity.angle_score()).sum::<f64>() / deviations.len() as f64;
    let tempo_score = (100.0 - (1.0 - speed_ratio).abs() * 100.0).max(0.0);
    ANGLE_SCORE_WEIGHT.mul_add(angle_score, TEMPO_SCORE_WEIGHT * tempo_score)
}
