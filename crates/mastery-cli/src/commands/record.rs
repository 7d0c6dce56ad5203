//! The `mastery record` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use mastery_core::config::load_config_from;
use mastery_core::engine::MasteryEngine;
use mastery_core::parser::{parse_progress_file, parse_quiz_file, progress_to_toml};

pub fn execute(
    progress_path: PathBuf,
    subtopic_id: String,
    quiz_path: PathBuf,
    write: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let engine = MasteryEngine::new(config);

    let mut set = parse_progress_file(&progress_path)?;
    let quiz = parse_quiz_file(&quiz_path)?;

    let progress = set
        .subtopic_mut(&subtopic_id)
        .with_context(|| format!("in {}", progress_path.display()))?;
    let before = engine.calculate_comprehensive_mastery(Some(&progress.clamped()));
    progress.record_quiz(&quiz);
    let after = engine.calculate_comprehensive_mastery(Some(&progress.clamped()));

    println!(
        "Recorded {} answer(s) for {} / {}",
        quiz.answers.len(),
        set.learner_id,
        subtopic_id
    );
    println!(
        "Current: {} ({}%) -> {} ({}%)",
        before.current.level, before.current.accuracy, after.current.level, after.current.accuracy
    );
    println!(
        "Overall: {} ({}%), confidence {}",
        after.overall.level, after.overall.accuracy, after.current.confidence.level
    );
    for r in &after.recommendations {
        println!("  - {r}");
    }

    if write {
        let toml = progress_to_toml(&set)?;
        std::fs::write(&progress_path, toml)
            .with_context(|| format!("failed to write {}", progress_path.display()))?;
        println!("Updated {}", progress_path.display());
    } else {
        println!("Dry run; pass --write to save the updated record.");
    }

    Ok(())
}
