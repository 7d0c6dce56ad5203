//! Mastery report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::MasteryEngine;
use crate::model::SubtopicProgress;
use crate::results::ComprehensiveMasteryData;
use crate::statistics::{summarize, LearnerSummary};

/// A mastery assessment for one subtopic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtopicAssessment {
    pub learner_id: String,
    pub subtopic_id: String,
    /// When the subtopic was last practiced, copied from the progress record.
    #[serde(default)]
    pub last_practiced: Option<DateTime<Utc>>,
    pub mastery: ComprehensiveMasteryData,
}

impl SubtopicAssessment {
    pub fn new(progress: &SubtopicProgress, mastery: ComprehensiveMasteryData) -> Self {
        Self {
            learner_id: progress.learner_id.clone(),
            subtopic_id: progress.subtopic_id.clone(),
            last_practiced: progress.last_practiced,
            mastery,
        }
    }
}

/// A complete mastery report for a batch of progress records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Learner the records belong to.
    pub learner_id: String,
    /// One assessment per progress record, in input order.
    pub assessments: Vec<SubtopicAssessment>,
    /// Aggregate statistics across the assessments.
    pub summary: LearnerSummary,
}

impl MasteryReport {
    /// Assess every record with `engine` and bundle the results.
    pub fn build(
        engine: &MasteryEngine,
        learner_id: impl Into<String>,
        records: &[SubtopicProgress],
    ) -> Self {
        let assessments: Vec<SubtopicAssessment> = records
            .iter()
            .map(|p| SubtopicAssessment::new(p, engine.calculate_comprehensive_mastery(Some(p))))
            .collect();
        let summary = summarize(&assessments);

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            learner_id: learner_id.into(),
            assessments,
            summary,
        }
    }

    /// Look up the assessment for a subtopic.
    pub fn assessment(&self, subtopic_id: &str) -> Option<&SubtopicAssessment> {
        self.assessments.iter().find(|a| a.subtopic_id == subtopic_id)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: MasteryReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Mastery report: {}\n\n", self.learner_id));
        md.push_str(&format!(
            "**Summary:** {} of {} subtopics assessed, average current accuracy {:.1}%\n\n",
            self.summary.assessed, self.summary.subtopics, self.summary.avg_current_accuracy
        ));

        if self.assessments.is_empty() {
            return md;
        }

        md.push_str("| Subtopic | Current | Overall | Confidence | A* potential | Weakest |\n");
        md.push_str("|----------|---------|---------|------------|--------------|---------|\n");
        for a in &self.assessments {
            let m = &a.mastery;
            md.push_str(&format!(
                "| {} | {} ({}%) | {} ({}%) | {} | {}% | {} |\n",
                a.subtopic_id,
                m.current.level,
                m.current.accuracy,
                m.overall.level,
                m.overall.accuracy,
                m.current.confidence.level,
                m.exam_readiness.a_star_potential,
                m.exam_readiness.weakest_area,
            ));
        }
        md.push('\n');

        md.push_str("### Recommendations\n\n");
        for a in &self.assessments {
            md.push_str(&format!("**{}**\n\n", a.subtopic_id));
            for r in &a.mastery.recommendations {
                md.push_str(&format!("- {r}\n"));
            }
            md.push('\n');
        }

        md
    }
}
