//! TOML progress record parser.
//!
//! Loads learner progress files and quiz outcomes, writes progress files
//! back out, and validates records for integrity problems.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProgressError;
use crate::model::{ProgressSet, QuizOutcome, SubtopicProgress, TierStats};

/// On-disk layout of a progress file.
#[derive(Debug, Serialize, Deserialize)]
struct TomlProgressFile {
    learner: TomlLearner,
    #[serde(default)]
    subtopics: Vec<TomlSubtopic>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlLearner {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlSubtopic {
    id: String,
    #[serde(default)]
    baseline_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_practiced: Option<DateTime<Utc>>,
    /// Defaults to the sum of the tier counters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    questions_attempted: Option<u32>,
    /// Defaults to the sum of the tier counters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    questions_correct: Option<u32>,
    #[serde(default)]
    easy: TierStats,
    #[serde(default)]
    medium: TierStats,
    #[serde(default)]
    hard: TierStats,
    #[serde(default)]
    core: TierStats,
    #[serde(default)]
    extended: TierStats,
}

/// Parse a single TOML progress file.
pub fn parse_progress_file(path: &Path) -> Result<ProgressSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read progress file: {}", path.display()))?;

    parse_progress_str(&content, path)
}

/// Parse a TOML string into a `ProgressSet` (useful for testing).
///
/// Counters are kept exactly as written; see [`ProgressSet::clamped`].
pub fn parse_progress_str(content: &str, source_path: &Path) -> Result<ProgressSet> {
    let parsed: TomlProgressFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let learner_id = parsed.learner.id;
    let subtopics = parsed
        .subtopics
        .into_iter()
        .enumerate()
        .map(|(index, s)| {
            if s.id.trim().is_empty() {
                return Err(ProgressError::EmptySubtopicId { index })
                    .with_context(|| format!("in {}", source_path.display()));
            }

            let mut progress = SubtopicProgress::new(learner_id.clone(), s.id)
                .with_tiers(s.easy, s.medium, s.hard);
            if let Some(attempted) = s.questions_attempted {
                progress.questions_attempted = attempted;
            }
            if let Some(correct) = s.questions_correct {
                progress.questions_correct = correct;
            }
            progress.core = s.core;
            progress.extended = s.extended;
            progress.baseline_completed = s.baseline_completed;
            progress.last_practiced = s.last_practiced;
            Ok(progress)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProgressSet {
        learner_id,
        learner_name: parsed.learner.name,
        subtopics,
    })
}

/// Serialize a `ProgressSet` back into the progress file format.
pub fn progress_to_toml(set: &ProgressSet) -> Result<String> {
    let file = TomlProgressFile {
        learner: TomlLearner {
            id: set.learner_id.clone(),
            name: set.learner_name.clone(),
        },
        subtopics: set
            .subtopics
            .iter()
            .map(|s| TomlSubtopic {
                id: s.subtopic_id.clone(),
                baseline_completed: s.baseline_completed,
                last_practiced: s.last_practiced,
                questions_attempted: Some(s.questions_attempted),
                questions_correct: Some(s.questions_correct),
                easy: s.easy,
                medium: s.medium,
                hard: s.hard,
                core: s.core,
                extended: s.extended,
            })
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize progress file")
}

/// Recursively load all `.toml` progress files from a directory.
pub fn load_progress_directory(dir: &Path) -> Result<Vec<ProgressSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_progress_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_progress_file(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a progress file, or every progress file under a directory.
pub fn load_progress_path(path: &Path) -> Result<Vec<ProgressSet>> {
    if path.is_dir() {
        load_progress_directory(path)
    } else {
        Ok(vec![parse_progress_file(path)?])
    }
}

/// Combine sets that belong to the same learner, in first-seen order.
///
/// Subtopics are appended in load order and the first display name found
/// wins. Subtopic ids repeated across files are left for
/// [`validate_progress_set`] to report.
pub fn merge_by_learner(sets: Vec<ProgressSet>) -> Vec<ProgressSet> {
    let mut merged: Vec<ProgressSet> = Vec::new();
    for set in sets {
        match merged.iter_mut().find(|m| m.learner_id == set.learner_id) {
            Some(existing) => {
                if existing.learner_name.is_none() {
                    existing.learner_name = set.learner_name;
                }
                existing.subtopics.extend(set.subtopics);
            }
            None => merged.push(set),
        }
    }
    merged
}

/// Parse a quiz outcome file.
pub fn parse_quiz_file(path: &Path) -> Result<QuizOutcome> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse quiz: {}", path.display()))
}

/// A warning from progress validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The subtopic ID (if applicable).
    pub subtopic_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a progress set for integrity problems the engine does not check.
pub fn validate_progress_set(set: &ProgressSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.learner_id.trim().is_empty() {
        warnings.push(ValidationWarning {
            subtopic_id: None,
            message: "learner id is empty".into(),
        });
    }

    let mut seen_ids = std::collections::HashSet::new();
    for s in &set.subtopics {
        if !seen_ids.insert(&s.subtopic_id) {
            warnings.push(ValidationWarning {
                subtopic_id: Some(s.subtopic_id.clone()),
                message: format!("duplicate subtopic ID: {}", s.subtopic_id),
            });
        }
    }

    let now = Utc::now();
    for s in &set.subtopics {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                subtopic_id: Some(s.subtopic_id.clone()),
                message,
            })
        };

        let counters = [
            ("easy", &s.easy),
            ("medium", &s.medium),
            ("hard", &s.hard),
            ("core", &s.core),
            ("extended", &s.extended),
        ];
        for (name, stats) in counters {
            if stats.is_inconsistent() {
                warn(format!(
                    "{name}: {} correct out of {} attempted",
                    stats.correct, stats.attempted
                ));
            }
        }
        if s.questions_correct > s.questions_attempted {
            warn(format!(
                "questions_correct ({}) exceeds questions_attempted ({})",
                s.questions_correct, s.questions_attempted
            ));
        }

        let totals = s.tier_totals();
        if totals.attempted != s.questions_attempted {
            warn(format!(
                "questions_attempted ({}) does not match the tier total ({})",
                s.questions_attempted, totals.attempted
            ));
        }
        if totals.correct != s.questions_correct {
            warn(format!(
                "questions_correct ({}) does not match the tier total ({})",
                s.questions_correct, totals.correct
            ));
        }

        let paper_attempts = s.core.attempted.saturating_add(s.extended.attempted);
        if paper_attempts > s.questions_attempted {
            warn(format!(
                "core + extended attempts ({paper_attempts}) exceed questions_attempted ({})",
                s.questions_attempted
            ));
        }

        if s.last_practiced.is_some_and(|t| t > now) {
            warn("last_practiced is in the future".into());
        }
    }

    warnings
}
