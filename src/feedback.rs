//! Prioritized, safety-weighted feedback generation.
//!
//! Takes raw movement errors already classified by exercise-specific rules
//! and produces a small, ranked, patient-appropriate set of corrections.
//! Injury-risk patterns (knee valgus above all) outrank cosmetic issues of
//! equal severity, and the number of items is capped by skill level to
//! control cognitive load.

use crate::comparison::Severity;
use crate::constants::{FREQUENCY_CAP, FREQUENCY_WEIGHT, REINFORCEMENT_SCORE, WARNING_RECURRENCE_MIN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Movement error categories produced by exercise rule evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Inward knee collapse, a ligament-injury risk
    KneeValgus,
    /// Rounded lumbar spine under load
    BackRounding,
    /// Shoulder hiked toward the ear during elevation
    ShoulderShrug,
    /// Elbow drifting away from the torso
    ElbowFlare,
    /// Pelvis dropping on the unsupported side
    HipDrop,
    /// Wrist bent out of neutral alignment
    WristDeviation,
    /// Joint not moved through the expected range
    IncompleteRange,
    /// Repetition tempo off the target
    TempoDeviation,
}

/// Body side an error was observed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    /// Midline or side-independent errors
    Center,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "",
        }
    }
}

/// A raw movement error detected during an evaluation window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedError {
    /// Error category
    pub kind: ErrorKind,
    /// Warning or critical (Good never reaches the generator)
    pub severity: Severity,
    /// Side of the body
    pub side: Side,
    /// Joint the error was measured at
    pub joint: String,
    /// Magnitude of the deviation, degrees
    pub deviation: f64,
}

/// Patient skill level, controlling how much feedback is surfaced at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Maximum feedback items shown at this level. Fewer, more
    /// critical-only items for beginners; this is cognitive-load control,
    /// not a performance optimization.
    #[must_use]
    pub fn max_feedback_items(self) -> usize {
        match self {
            Self::Beginner => 2,
            Self::Intermediate => 3,
            Self::Advanced => 4,
        }
    }
}

/// Overridable priority weight tables.
///
/// The injury-risk and severity weights are domain policy values; they are
/// configuration rather than literals so a clinician can retune them, but
/// the defaults below are the validated ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackWeights {
    /// Per-error-kind injury-risk weight
    pub injury_risk: HashMap<ErrorKind, f64>,
    /// Priority weight for critical errors
    pub critical_weight: f64,
    /// Priority weight for warning errors
    pub warning_weight: f64,
    /// Fraction of (risk + severity) deducted from the session score per error
    pub score_deduction_factor: f64,
}

impl Default for FeedbackWeights {
    fn default() -> Self {
        let injury_risk = HashMap::from([
            (ErrorKind::KneeValgus, 30.0),
            (ErrorKind::BackRounding, 25.0),
            (ErrorKind::HipDrop, 18.0),
            (ErrorKind::ShoulderShrug, 12.0),
            (ErrorKind::ElbowFlare, 8.0),
            (ErrorKind::IncompleteRange, 6.0),
            (ErrorKind::WristDeviation, 5.0),
            (ErrorKind::TempoDeviation, 4.0),
        ]);
        Self {
            injury_risk,
            critical_weight: 20.0,
            warning_weight: 10.0,
            score_deduction_factor: 0.3,
        }
    }
}

impl FeedbackWeights {
    fn risk(&self, kind: ErrorKind) -> f64 {
        self.injury_risk.get(&kind).copied().unwrap_or(0.0)
    }

    fn severity_weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical_weight,
            Severity::Warning => self.warning_weight,
            Severity::Good => 0.0,
        }
    }
}

/// Human-facing correction message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackMessage {
    /// Short headline
    pub title: String,
    /// What was observed
    pub description: String,
    /// What to do about it
    pub correction: String,
}

/// A ranked error with its priority score and message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedError {
    /// The representative (most severe) error of its group
    pub error: DetectedError,
    /// Priority score used for ranking
    pub priority: f64,
    /// Occurrences of this (kind, side) group in the evaluation window
    pub frequency: usize,
    /// Curated natural-language message
    pub message: FeedbackMessage,
}

/// Full feedback output for one evaluation window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Ranked, capped corrections
    pub errors: Vec<PrioritizedError>,
    /// 0-100 session score
    pub score: f64,
    /// One-sentence summary
    pub summary: String,
    /// Positive reinforcement, when earned
    pub reinforcement: Option<String>,
}

/// Converts raw detected errors into prioritized feedback
#[derive(Debug, Clone, Default)]
pub struct FeedbackGenerator {
    weights: FeedbackWeights,
}

impl FeedbackGenerator {
    /// Create a generator with the default weight tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with custom weight tables
    #[must_use]
    pub fn with_weights(weights: FeedbackWeights) -> Self {
        Self { weights }
    }

    /// Generate ranked feedback for an evaluation window.
    ///
    /// Raw error kinds never surface to the patient; only the curated
    /// messages do.
    #[must_use]
    pub fn generate(&self, errors: &[DetectedError], skill: SkillLevel) -> FeedbackReport {
        let mut ranked = self.prioritize(errors);
        ranked.truncate(skill.max_feedback_items());

        let score = self.session_score(errors);
        let reinforcement = if errors.is_empty() {
            Some("Excellent form! Keep up exactly this technique.".to_string())
        } else if score >= REINFORCEMENT_SCORE {
            Some("Strong session overall; just a few details to polish.".to_string())
        } else {
            None
        };

        let summary = if ranked.is_empty() {
            "No movement corrections needed this session.".to_string()
        } else {
            format!(
                "{} area{} to work on, starting with: {}.",
                ranked.len(),
                if ranked.len() == 1 { "" } else { "s" },
                ranked[0].message.title.to_lowercase()
            )
        };

        FeedbackReport {
            errors: ranked,
            score,
            summary,
            reinforcement,
        }
    }

    /// The single top-priority error, for terse live feedback
    #[must_use]
    pub fn live_feedback(&self, errors: &[DetectedError]) -> Option<PrioritizedError> {
        self.prioritize(errors).into_iter().next()
    }

    /// Whether feedback should be surfaced at all: at least one critical
    /// error, or a warning-level kind recurring three or more times.
    /// Suppressing below that avoids nagging over a transient misread
    /// frame.
    #[must_use]
    pub fn should_show_feedback(&self, errors: &[DetectedError]) -> bool {
        if errors.iter().any(|e| e.severity == Severity::Critical) {
            return true;
        }
        let mut warning_counts: HashMap<(ErrorKind, Side), usize> = HashMap::new();
        for e in errors.iter().filter(|e| e.severity == Severity::Warning) {
            *warning_counts.entry((e.kind, e.side)).or_insert(0) += 1;
        }
        warning_counts.values().any(|&count| count >= WARNING_RECURRENCE_MIN)
    }

    /// Group by (kind, side), pick each group's most severe member, score
    /// and sort by priority descending
    fn prioritize(&self, errors: &[DetectedError]) -> Vec<PrioritizedError> {
        let mut groups: HashMap<(ErrorKind, Side), Vec<&DetectedError>> = HashMap::new();
        for e in errors {
            groups.entry((e.kind, e.side)).or_default().push(e);
        }

        let mut ranked: Vec<PrioritizedError> = groups
            .into_iter()
            .filter_map(|((kind, _side), members)| {
                let frequency = members.len();
                let representative = members.into_iter().max_by_key(|e| e.severity)?.clone();

                let priority = self.weights.risk(kind)
                    + self.weights.severity_weight(representative.severity)
                    + frequency.min(FREQUENCY_CAP) as f64 * FREQUENCY_WEIGHT;

                let message = compose_message(&representative);
                Some(PrioritizedError {
                    error: representative,
                    priority,
                    frequency,
                    message,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.priority.partial_cmp(&a.priority).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// 0-100 score with per-error deductions proportional to injury risk
    /// and severity, floored at 0
    fn session_score(&self, errors: &[DetectedError]) -> f64 {
        let deducted: f64 = errors
            .iter()
            .map(|e| (self.weights.risk(e.kind) + self.weights.severity_weight(e.severity)) * self.weights.score_deduction_factor)
            .sum();
        (100.0 - deducted).max(0.0)
    }
}

/// Curated patient-facing text per error kind
fn compose_message(error: &DetectedError) -> FeedbackMessage {
    let side = error.side.label();
    let sided = |noun: &str| {
        if side.is_empty() {
            noun.to_string()
        } else {
            format!("{side} {noun}")
        }
    };

    let (title, description, correction) = match error.kind {
        ErrorKind::KneeValgus => (
            "Keep your knee tracking over your toes".to_string(),
            format!("Your {} is collapsing inward during the movement.", sided("knee")),
            "Press the knee gently outward so it stays in line with your foot.".to_string(),
        ),
        ErrorKind::BackRounding => (
            "Keep your back straight".to_string(),
            "Your lower back is rounding under load.".to_string(),
            "Brace your core and hinge from the hips instead of the spine.".to_string(),
        ),
        ErrorKind::ShoulderShrug => (
            "Relax your shoulders".to_string(),
            format!("Your {} is creeping up toward your ear.", sided("shoulder")),
            "Draw the shoulder blade down and back before you lift.".to_string(),
        ),
        ErrorKind::ElbowFlare => (
            "Keep your elbow closer to your body".to_string(),
            format!("Your {} is drifting away from your torso.", sided("elbow")),
            "Tuck the elbow in so the upper arm brushes your side.".to_string(),
        ),
        ErrorKind::HipDrop => (
            "Keep your hips level".to_string(),
            format!("Your {} is dipping during single-leg support.", sided("hip")),
            "Squeeze the standing-side glute to hold the pelvis level.".to_string(),
        ),
        ErrorKind::WristDeviation => (
            "Keep your wrist neutral".to_string(),
            format!("Your {} is bending out of line with your forearm.", sided("wrist")),
            "Hold the wrist straight, as if shaking hands.".to_string(),
        ),
        ErrorKind::IncompleteRange => (
            "Complete the full movement".to_string(),
            format!("Your {} is not moving through the full range.", sided(&error.joint)),
            "Move slowly through the entire range before reversing.".to_string(),
        ),
        ErrorKind::TempoDeviation => (
            "Match the target tempo".to_string(),
            "Your repetition speed is off the target pace.".to_string(),
            "Follow the reference rhythm, counting the phases if it helps.".to_string(),
        ),
    };

    FeedbackMessage {
        title,
        description,
        correction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(kind: ErrorKind, severity: Severity, side: Side) -> DetectedError {
        DetectedError {
            kind,
            severity,
            side,
            joint: "left_knee".to_string(),
            deviation: 10.0,
        }
    }

    #[test]
    fn test_skill_level_caps() {
        let generator = FeedbackGenerator::new();
        // 20 raw errors across many distinct groups
        let kinds = [
            ErrorKind::KneeValgus,
            ErrorKind::BackRounding,
            ErrorKind::ShoulderShrug,
            ErrorKind::ElbowFlare,
            ErrorKind::HipDrop,
            ErrorKind::WristDeviation,
            ErrorKind::IncompleteRange,
            ErrorKind::TempoDeviation,
        ];
        let mut errors = Vec::new();
        for (i, kind) in kinds.iter().cycle().take(20).enumerate() {
            let side = if i % 2 == 0 { Side::Left } else { Side::Right };
            errors.push(error(*kind, Severity::Warning, side));
        }

        assert!(generator.generate(&errors, SkillLevel::Beginner).errors.len() <= 2);
        assert!(generator.generate(&errors, SkillLevel::Intermediate).errors.len() <= 3);
        assert!(generator.generate(&errors, SkillLevel::Advanced).errors.len() <= 4);
    }

    #[test]
    fn test_injury_risk_outranks_equal_severity() {
        let generator = FeedbackGenerator::new();
        let errors = vec![
            error(ErrorKind::WristDeviation, Severity::Warning, Side::Left),
            error(ErrorKind::KneeValgus, Severity::Warning, Side::Left),
        ];
        let report = generator.generate(&errors, SkillLevel::Advanced);
        assert_eq!(report.errors[0].error.kind, ErrorKind::KneeValgus);
    }

    #[test]
    fn test_group_representative_is_most_severe() {
        let generator = FeedbackGenerator::new();
        let errors = vec![
            error(ErrorKind::KneeValgus, Severity::Warning, Side::Left),
            error(ErrorKind::KneeValgus, Severity::Critical, Side::Left),
            error(ErrorKind::KneeValgus, Severity::Warning, Side::Left),
        ];
        let report = generator.generate(&errors, SkillLevel::Advanced);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].error.severity, Severity::Critical);
        assert_eq!(report.errors[0].frequency, 3);
    }

    #[test]
    fn test_frequency_raises_priority_with_cap() {
        let generator = FeedbackGenerator::new();
        let few = vec![error(ErrorKind::ElbowFlare, Severity::Warning, Side::Left); 2];
        let many = vec![error(ErrorKind::ElbowFlare, Severity::Warning, Side::Left); 8];
        let capped = vec![error(ErrorKind::ElbowFlare, Severity::Warning, Side::Left); 30];

        let p_few = generator.live_feedback(&few).unwrap().priority;
        let p_many = generator.live_feedback(&many).unwrap().priority;
        let p_capped = generator.live_feedback(&capped).unwrap().priority;

        assert!(p_many > p_few);
        // Frequency contribution saturates at the cap
        assert!((p_capped - (p_many + 2.0 * FREQUENCY_WEIGHT)).abs() < 1e-9);
    }

    #[test]
    fn test_live_feedback_single_item() {
        let generator = FeedbackGenerator::new();
        let errors = vec![
            error(ErrorKind::WristDeviation, Severity::Critical, Side::Left),
            error(ErrorKind::KneeValgus, Severity::Critical, Side::Right),
        ];
        let top = generator.live_feedback(&errors).unwrap();
        assert_eq!(top.error.kind, ErrorKind::KneeValgus);
        assert!(generator.live_feedback(&[]).is_none());
    }

    #[test]
    fn test_should_show_feedback_policy() {
        let generator = FeedbackGenerator::new();

        // One transient warning: stay quiet
        let transient = vec![error(ErrorKind::ElbowFlare, Severity::Warning, Side::Left)];
        assert!(!generator.should_show_feedback(&transient));

        // A single critical error shows immediately
        let critical = vec![error(ErrorKind::KneeValgus, Severity::Critical, Side::Left)];
        assert!(generator.should_show_feedback(&critical));

        // A warning recurring three times shows
        let recurring = vec![error(ErrorKind::ElbowFlare, Severity::Warning, Side::Left); 3];
        assert!(generator.should_show_feedback(&recurring));

        // Three warnings across different groups do not
        let scattered = vec![
            error(ErrorKind::ElbowFlare, Severity::Warning, Side::Left),
            error(ErrorKind::ElbowFlare, Severity::Warning, Side::Right),
            error(ErrorKind::WristDeviation, Severity::Warning, Side::Left),
        ];
        assert!(!generator.should_show_feedback(&scattered));
    }

    #[test]
    fn test_score_and_reinforcement() {
        let generator = FeedbackGenerator::new();

        let clean = generator.generate(&[], SkillLevel::Beginner);
        assert_eq!(clean.score, 100.0);
        assert!(clean.reinforcement.is_some());

        // Pile on critical knee valgus until the floor is reached
        let pile = vec![error(ErrorKind::KneeValgus, Severity::Critical, Side::Left); 20];
        let floored = generator.generate(&pile, SkillLevel::Beginner);
        assert_eq!(floored.score, 0.0);
        assert!(floored.reinforcement.is_none());
    }

    #[test]
    fn test_messages_never_expose_raw_kinds() {
        let generator = FeedbackGenerator::new();
        let errors = vec![error(ErrorKind::KneeValgus, Severity::Critical, Side::Left)];
        let report = generator.generate(&errors, SkillLevel::Beginner);
        let msg = &report.errors[0].message;
        for text in [&msg.title, &msg.description, &msg.correction] {
            assert!(!text.contains("KneeValgus"));
            assert!(!text.contains("knee_valgus"));
        }
    }

    #[test]
    fn test_custom_weights_override() {
        let mut weights = FeedbackWeights::default();
        // A clinic that treats wrist issues as the top concern
        weights.injury_risk.insert(ErrorKind::WristDeviation, 99.0);
        let generator = FeedbackGenerator::with_weights(weights);

        let errors = vec![
            error(ErrorKind::KneeValgus, Severity::Warning, Side::Left),
            error(ErrorKind::WristDeviation, Severity::Warning, Side::Left),
        ];
        let top = generator.live_feedback(&errors).unwrap();
        assert_eq!(top.error.kind, ErrorKind::WristDeviation);
    }
}
