//! The `mastery validate` command.

use std::path::PathBuf;

use anyhow::Result;

use mastery_core::parser::{load_progress_path, validate_progress_set};

pub fn execute(progress_path: PathBuf) -> Result<()> {
    let sets = load_progress_path(&progress_path)?;

    let mut total_warnings = 0;

    for set in &sets {
        let name = set.learner_name.as_deref().unwrap_or(&set.learner_id);
        println!("Learner: {name} ({} subtopics)", set.subtopics.len());

        let warnings = validate_progress_set(set);
        for w in &warnings {
            let prefix = w
                .subtopic_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All progress records valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
