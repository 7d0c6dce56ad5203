//! Core data model types for mastery scoring.
//!
//! These are the cumulative per-learner, per-subtopic answer counters the
//! engine consumes, plus the quiz outcome type callers merge into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProgressError;
use crate::statistics::percent;

/// Question difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// All tiers, easiest first.
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Easy => write!(f, "easy"),
            Tier::Medium => write!(f, "medium"),
            Tier::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" | "med" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

/// IGCSE paper category a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperCategory {
    Core,
    Extended,
}

impl fmt::Display for PaperCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperCategory::Core => write!(f, "core"),
            PaperCategory::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for PaperCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "core" => Ok(PaperCategory::Core),
            "extended" | "ext" => Ok(PaperCategory::Extended),
            other => Err(format!("unknown paper category: {other}")),
        }
    }
}

/// An attempted/correct counter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStats {
    /// Questions attempted.
    #[serde(default)]
    pub attempted: u32,
    /// Questions answered correctly. Should never exceed `attempted`.
    #[serde(default)]
    pub correct: u32,
}

impl TierStats {
    pub fn new(attempted: u32, correct: u32) -> Self {
        Self { attempted, correct }
    }

    /// Accuracy as a rounded 0–100 percentage, 0 when nothing was attempted.
    pub fn accuracy_pct(&self) -> u8 {
        percent(self.correct, self.attempted)
    }

    /// Raw accuracy fraction in `[0, 1]`, 0 when nothing was attempted.
    pub fn fraction(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            (self.correct.min(self.attempted) as f64) / self.attempted as f64
        }
    }

    /// Whether `correct > attempted`.
    pub fn is_inconsistent(&self) -> bool {
        self.correct > self.attempted
    }

    /// Copy with `correct` clamped to `attempted`.
    pub fn clamped(&self) -> Self {
        Self {
            attempted: self.attempted,
            correct: self.correct.min(self.attempted),
        }
    }

    fn record(&mut self, correct: bool) {
        self.attempted = self.attempted.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }
}

/// Cumulative answer statistics for one learner on one subtopic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtopicProgress {
    /// Opaque learner identifier.
    pub learner_id: String,
    /// Opaque subtopic identifier.
    pub subtopic_id: String,
    #[serde(default)]
    pub easy: TierStats,
    #[serde(default)]
    pub medium: TierStats,
    #[serde(default)]
    pub hard: TierStats,
    /// Core paper counters (reporting only, not used for scoring).
    #[serde(default)]
    pub core: TierStats,
    /// Extended paper counters (reporting only, not used for scoring).
    #[serde(default)]
    pub extended: TierStats,
    /// Total questions attempted across all tiers.
    #[serde(default)]
    pub questions_attempted: u32,
    /// Total questions answered correctly across all tiers.
    #[serde(default)]
    pub questions_correct: u32,
    /// Whether the initial baseline assessment has been completed.
    #[serde(default)]
    pub baseline_completed: bool,
    /// Last time this subtopic was practiced.
    #[serde(default)]
    pub last_practiced: Option<DateTime<Utc>>,
}

impl SubtopicProgress {
    /// An empty record for a learner/subtopic pair.
    pub fn new(learner_id: impl Into<String>, subtopic_id: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            subtopic_id: subtopic_id.into(),
            ..Self::default()
        }
    }

    /// Set the per-tier counters and derive the aggregate totals from them.
    pub fn with_tiers(mut self, easy: TierStats, medium: TierStats, hard: TierStats) -> Self {
        self.easy = easy;
        self.medium = medium;
        self.hard = hard;
        let totals = self.tier_totals();
        self.questions_attempted = totals.attempted;
        self.questions_correct = totals.correct;
        self
    }

    /// Counters for a single tier.
    pub fn tier(&self, tier: Tier) -> &TierStats {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
        }
    }

    /// Counters for a paper category.
    pub fn paper(&self, paper: PaperCategory) -> &TierStats {
        match paper {
            PaperCategory::Core => &self.core,
            PaperCategory::Extended => &self.extended,
        }
    }

    /// Sum of the per-tier attempted/correct counters.
    pub fn tier_totals(&self) -> TierStats {
        Tier::ALL
            .iter()
            .map(|t| *self.tier(*t))
            .fold(TierStats::default(), |acc, s| TierStats {
                attempted: acc.attempted.saturating_add(s.attempted),
                correct: acc.correct.saturating_add(s.correct),
            })
    }

    /// Whether any counter pair has more correct answers than attempts.
    pub fn has_inconsistent_counters(&self) -> bool {
        [
            &self.easy,
            &self.medium,
            &self.hard,
            &self.core,
            &self.extended,
        ]
        .iter()
        .any(|s| s.is_inconsistent())
            || self.questions_correct > self.questions_attempted
    }

    /// Copy with every `correct` counter clamped to its `attempted` counter.
    pub fn clamped(&self) -> Self {
        Self {
            easy: self.easy.clamped(),
            medium: self.medium.clamped(),
            hard: self.hard.clamped(),
            core: self.core.clamped(),
            extended: self.extended.clamped(),
            questions_correct: self.questions_correct.min(self.questions_attempted),
            ..self.clone()
        }
    }

    /// Sum a finished quiz into the cumulative counters.
    pub fn record_quiz(&mut self, quiz: &QuizOutcome) {
        for answer in &quiz.answers {
            match answer.tier {
                Tier::Easy => self.easy.record(answer.correct),
                Tier::Medium => self.medium.record(answer.correct),
                Tier::Hard => self.hard.record(answer.correct),
            }
            match answer.paper {
                Some(PaperCategory::Core) => self.core.record(answer.correct),
                Some(PaperCategory::Extended) => self.extended.record(answer.correct),
                None => {}
            }
            self.questions_attempted = self.questions_attempted.saturating_add(1);
            if answer.correct {
                self.questions_correct = self.questions_correct.saturating_add(1);
            }
        }

        if quiz.baseline {
            self.baseline_completed = true;
        }
        if !quiz.answers.is_empty() {
            self.last_practiced = Some(match self.last_practiced {
                Some(prev) if prev > quiz.completed_at => prev,
                _ => quiz.completed_at,
            });
        }
    }
}

/// All progress records for one learner, as loaded from a progress file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSet {
    pub learner_id: String,
    /// Display name, if the file provides one.
    #[serde(default)]
    pub learner_name: Option<String>,
    #[serde(default)]
    pub subtopics: Vec<SubtopicProgress>,
}

impl ProgressSet {
    pub fn subtopic(&self, subtopic_id: &str) -> Option<&SubtopicProgress> {
        self.subtopics.iter().find(|s| s.subtopic_id == subtopic_id)
    }

    pub fn subtopic_mut(&mut self, subtopic_id: &str) -> Result<&mut SubtopicProgress, ProgressError> {
        self.subtopics
            .iter_mut()
            .find(|s| s.subtopic_id == subtopic_id)
            .ok_or_else(|| ProgressError::SubtopicNotFound(subtopic_id.to_string()))
    }

    /// Copy with every record clamped; logs each record that needed it.
    pub fn clamped(&self) -> Self {
        let subtopics = self
            .subtopics
            .iter()
            .map(|s| {
                if s.has_inconsistent_counters() {
                    tracing::warn!(
                        "clamping inconsistent counters for {}/{}",
                        s.learner_id,
                        s.subtopic_id
                    );
                }
                s.clamped()
            })
            .collect();
        Self {
            subtopics,
            ..self.clone()
        }
    }
}

/// A single answered question from a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    /// Difficulty tier of the question.
    #[serde(rename = "difficulty")]
    pub tier: Tier,
    /// Paper category, when the question is tagged with one.
    #[serde(default)]
    pub paper: Option<PaperCategory>,
    /// Whether the learner answered correctly.
    pub correct: bool,
}

/// The outcome of one completed quiz on a subtopic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// When the quiz was finished.
    pub completed_at: DateTime<Utc>,
    /// Whether this quiz was the initial baseline assessment.
    #[serde(default)]
    pub baseline: bool,
    /// Answers in the order they were given.
    #[serde(default)]
    pub answers: Vec<AnsweredQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tier_display_and_parse() {
        assert_eq!(Tier::Easy.to_string(), "easy");
        assert_eq!(Tier::Hard.to_string(), "hard");
        assert_eq!("Medium".parse::<Tier>().unwrap(), Tier::Medium);
        assert_eq!("med".parse::<Tier>().unwrap(), Tier::Medium);
        assert!("impossible".parse::<Tier>().is_err());
        assert_eq!(
            "EXT".parse::<PaperCategory>().unwrap(),
            PaperCategory::Extended
        );
    }

    #[test]
    fn tier_stats_zero_attempts() {
        let s = TierStats::default();
        assert_eq!(s.accuracy_pct(), 0);
        assert_eq!(s.fraction(), 0.0);
    }

    #[test]
    fn clamping_caps_correct_at_attempted() {
        let mut p = SubtopicProgress::new("l1", "s1").with_tiers(
            TierStats::new(5, 7),
            TierStats::new(3, 1),
            TierStats::default(),
        );
        p.core = TierStats::new(2, 4);
        assert!(p.has_inconsistent_counters());

        let c = p.clamped();
        assert_eq!(c.easy, TierStats::new(5, 5));
        assert_eq!(c.medium, TierStats::new(3, 1));
        assert_eq!(c.core, TierStats::new(2, 2));
        assert_eq!(c.questions_correct, 8);
        assert!(!c.has_inconsistent_counters());
        assert_eq!(c.subtopic_id, "s1");
    }

    #[test]
    fn record_quiz_sums_into_totals() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let mut p = SubtopicProgress::new("l1", "algebra");
        let quiz = QuizOutcome {
            completed_at: at,
            baseline: true,
            answers: vec![
                AnsweredQuestion {
                    tier: Tier::Easy,
                    paper: Some(PaperCategory::Core),
                    correct: true,
                },
                AnsweredQuestion {
                    tier: Tier::Easy,
                    paper: None,
                    correct: false,
                },
                AnsweredQuestion {
                    tier: Tier::Hard,
                    paper: Some(PaperCategory::Extended),
                    correct: true,
                },
            ],
        };
        p.record_quiz(&quiz);

        assert_eq!(p.easy, TierStats::new(2, 1));
        assert_eq!(p.hard, TierStats::new(1, 1));
        assert_eq!(p.core, TierStats::new(1, 1));
        assert_eq!(p.extended, TierStats::new(1, 1));
        assert_eq!(p.questions_attempted, 3);
        assert_eq!(p.questions_correct, 2);
        assert!(p.baseline_completed);
        assert_eq!(p.last_practiced, Some(at));
        assert_eq!(p.tier_totals(), TierStats::new(3, 2));
    }

    #[test]
    fn record_quiz_keeps_latest_practice_time() {
        let later = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let mut p = SubtopicProgress::new("l1", "s1");
        p.last_practiced = Some(later);

        p.record_quiz(&QuizOutcome {
            completed_at: earlier,
            baseline: false,
            answers: vec![AnsweredQuestion {
                tier: Tier::Medium,
                paper: None,
                correct: true,
            }],
        });
        assert_eq!(p.last_practiced, Some(later));
        assert!(!p.baseline_completed);
    }

    #[test]
    fn progress_set_lookup() {
        let mut set = ProgressSet {
            learner_id: "l1".into(),
            learner_name: None,
            subtopics: vec![
                SubtopicProgress::new("l1", "algebra"),
                SubtopicProgress::new("l1", "geometry").with_tiers(
                    TierStats::new(2, 3),
                    TierStats::default(),
                    TierStats::default(),
                ),
            ],
        };
        assert!(set.subtopic("algebra").is_some());
        assert!(set.subtopic_mut("geometry").is_ok());
        let err = set.subtopic_mut("calculus").unwrap_err();
        assert_eq!(err.to_string(), "subtopic not found: calculus");

        let clamped = set.clamped();
        assert_eq!(clamped.subtopic("geometry").unwrap().easy, TierStats::new(2, 2));
        assert_eq!(clamped.learner_id, "l1");
    }

    #[test]
    fn progress_serde_defaults() {
        let json = r#"{"learner_id":"l","subtopic_id":"s","easy":{"attempted":4,"correct":3}}"#;
        let p: SubtopicProgress = serde_json::from_str(json).unwrap();
        assert_eq!(p.easy, TierStats::new(4, 3));
        assert_eq!(p.hard, TierStats::default());
        assert!(p.last_practiced.is_none());
    }
}
