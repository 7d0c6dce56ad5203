//! Percentage helpers and aggregate statistics across subtopics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::report::SubtopicAssessment;
use crate::results::MasteryLevel;

/// `round(100 * correct / attempted)`, or 0 when nothing was attempted.
///
/// `correct` is capped at `attempted`, so the result never exceeds 100.
pub fn percent(correct: u32, attempted: u32) -> u8 {
    if attempted == 0 {
        return 0;
    }
    let correct = correct.min(attempted);
    (100.0 * correct as f64 / attempted as f64).round() as u8
}

/// How many subtopics to list as weakest in a summary.
pub const WEAKEST_SUBTOPICS: usize = 3;

/// Statistics for one learner across all assessed subtopics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerSummary {
    /// Subtopics in the report, assessed or not.
    pub subtopics: usize,
    /// Subtopics with at least one attempt.
    pub assessed: usize,
    /// Mean weighted accuracy over assessed subtopics.
    pub avg_current_accuracy: f64,
    /// Mean raw accuracy over assessed subtopics.
    pub avg_overall_accuracy: f64,
    /// Number of subtopics at each current level, keyed by label.
    pub level_distribution: BTreeMap<String, usize>,
    /// Subtopics whose foundations are ready for advanced work.
    pub ready_for_advanced: Vec<String>,
    /// Assessed subtopics with the lowest current accuracy, weakest first.
    pub weakest_subtopics: Vec<String>,
}

/// Summarize a batch of subtopic assessments.
pub fn summarize(assessments: &[SubtopicAssessment]) -> LearnerSummary {
    let mut level_distribution: BTreeMap<String, usize> = MasteryLevel::ALL
        .iter()
        .map(|l| (l.label().to_string(), 0))
        .collect();
    for a in assessments {
        *level_distribution
            .entry(a.mastery.current.level.label().to_string())
            .or_default() += 1;
    }

    let assessed: Vec<&SubtopicAssessment> = assessments
        .iter()
        .filter(|a| a.mastery.is_assessed())
        .collect();

    let mean = |f: fn(&SubtopicAssessment) -> u8| -> f64 {
        if assessed.is_empty() {
            0.0
        } else {
            assessed.iter().map(|a| f(a) as f64).sum::<f64>() / assessed.len() as f64
        }
    };
    let avg_current_accuracy = mean(|a| a.mastery.current.accuracy);
    let avg_overall_accuracy = mean(|a| a.mastery.overall.accuracy);

    let ready_for_advanced = assessed
        .iter()
        .filter(|a| a.mastery.foundation.ready_for_advanced)
        .map(|a| a.subtopic_id.clone())
        .collect();

    let mut ranked = assessed.clone();
    ranked.sort_by(|a, b| {
        a.mastery
            .current
            .accuracy
            .cmp(&b.mastery.current.accuracy)
            .then_with(|| a.subtopic_id.cmp(&b.subtopic_id))
    });
    let weakest_subtopics = ranked
        .iter()
        .take(WEAKEST_SUBTOPICS)
        .map(|a| a.subtopic_id.clone())
        .collect();

    LearnerSummary {
        subtopics: assessments.len(),
        assessed: assessed.len(),
        avg_current_accuracy,
        avg_overall_accuracy,
        level_distribution,
        ready_for_advanced,
        weakest_subtopics,
    }
}
