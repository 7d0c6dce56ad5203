//! Assessment result types produced by the mastery engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Tier;

/// Discrete mastery level, ordered from Unassessed (0) to Mastery (5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    Unassessed = 0,
    Beginning = 1,
    Developing = 2,
    Approaching = 3,
    Proficient = 4,
    Mastery = 5,
}

impl MasteryLevel {
    /// All levels, lowest first.
    pub const ALL: [MasteryLevel; 6] = [
        MasteryLevel::Unassessed,
        MasteryLevel::Beginning,
        MasteryLevel::Developing,
        MasteryLevel::Approaching,
        MasteryLevel::Proficient,
        MasteryLevel::Mastery,
    ];

    /// Ordinal in `0..=5`.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MasteryLevel::Unassessed => "Unassessed",
            MasteryLevel::Beginning => "Beginning",
            MasteryLevel::Developing => "Developing",
            MasteryLevel::Approaching => "Approaching",
            MasteryLevel::Proficient => "Proficient",
            MasteryLevel::Mastery => "Mastery",
        }
    }

    /// Presentational color tag.
    pub fn color(self) -> &'static str {
        match self {
            MasteryLevel::Unassessed => "gray",
            MasteryLevel::Beginning => "red",
            MasteryLevel::Developing => "orange",
            MasteryLevel::Approaching => "yellow",
            MasteryLevel::Proficient => "blue",
            MasteryLevel::Mastery => "green",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MasteryLevel::Unassessed => "No questions attempted yet",
            MasteryLevel::Beginning => "Starting to build understanding of this subtopic",
            MasteryLevel::Developing => "Building core skills, with gaps still to close",
            MasteryLevel::Approaching => "Nearing exam standard on most question types",
            MasteryLevel::Proficient => "Solid, exam-ready performance",
            MasteryLevel::Mastery => "Consistent top-grade performance",
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tier accuracy and the foundation gates derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundationMastery {
    /// Easy-tier accuracy, 0–100.
    pub easy_mastery: u8,
    /// Medium-tier accuracy, 0–100.
    pub medium_mastery: u8,
    /// Hard-tier accuracy, 0–100.
    pub hard_mastery: u8,
    pub easy_mastered: bool,
    pub medium_mastered: bool,
    /// Both foundation tiers mastered; hard-tier results are trustworthy.
    pub ready_for_advanced: bool,
}

impl FoundationMastery {
    /// Accuracy for one tier.
    pub fn accuracy(&self, tier: Tier) -> u8 {
        match tier {
            Tier::Easy => self.easy_mastery,
            Tier::Medium => self.medium_mastery,
            Tier::Hard => self.hard_mastery,
        }
    }

    /// Tier with the lowest accuracy; ties go to the easier tier.
    pub fn weakest_tier(&self) -> Tier {
        let (easy, medium, hard) = (self.easy_mastery, self.medium_mastery, self.hard_mastery);
        if easy <= medium && easy <= hard {
            Tier::Easy
        } else if medium <= hard {
            Tier::Medium
        } else {
            Tier::Hard
        }
    }
}

/// Which weight triple the foundation state selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingRegime {
    /// Foundations solid: hard questions carry premium weight.
    Advanced,
    /// Easy mastered, medium not yet.
    MediumFocus,
    /// Foundations weak: hard-tier signal is discounted.
    Foundation,
}

impl fmt::Display for WeightingRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightingRegime::Advanced => write!(f, "advanced"),
            WeightingRegime::MediumFocus => write!(f, "medium focus"),
            WeightingRegime::Foundation => write!(f, "foundation"),
        }
    }
}

/// Reliability of an estimate, from sample size alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Insufficient,
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Insufficient => write!(f, "insufficient"),
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceConfidence {
    pub level: ConfidenceLevel,
    pub description: String,
    pub need_more_questions: bool,
}

/// The weighted, exam-priority view of current mastery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMastery {
    pub level: MasteryLevel,
    /// Weighted accuracy, 0–100.
    pub accuracy: u8,
    pub confidence: PerformanceConfidence,
    pub questions_analyzed: u32,
    pub weighting: WeightingRegime,
}

/// The unweighted all-time view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallMastery {
    pub level: MasteryLevel,
    /// Raw correct/attempted accuracy, 0–100.
    pub accuracy: u8,
    pub total_questions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Slight,
    Moderate,
    Strong,
}

/// Progress trend. Not computed yet: always a static placeholder with
/// `available == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryTrend {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    pub description: String,
    pub available: bool,
}

impl MasteryTrend {
    /// Placeholder for a learner with attempts on record.
    pub fn pending() -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: TrendStrength::Moderate,
            description: "Trend analysis coming soon".into(),
            available: false,
        }
    }

    /// Placeholder for a learner with no attempts.
    pub fn no_history() -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: TrendStrength::Slight,
            description: "No practice history yet".into(),
            available: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamReadiness {
    /// Likelihood of top-grade exam performance, 0–100.
    pub a_star_potential: u8,
    pub weakest_area: Tier,
    pub next_milestone: String,
}

/// The full mastery report for one learner on one subtopic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveMasteryData {
    pub current: CurrentMastery,
    pub overall: OverallMastery,
    pub foundation: FoundationMastery,
    pub trend: MasteryTrend,
    pub exam_readiness: ExamReadiness,
    pub recommendations: Vec<String>,
}

/// The slice of an assessment callers write back to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMastery {
    pub accuracy: u8,
    pub mastery_level: String,
}

impl ComprehensiveMasteryData {
    pub fn persisted(&self) -> PersistedMastery {
        PersistedMastery {
            accuracy: self.overall.accuracy,
            mastery_level: self.overall.level.label().to_string(),
        }
    }

    /// Whether any questions were analyzed.
    pub fn is_assessed(&self) -> bool {
        self.overall.total_questions > 0
    }
}
