//! The `mastery assess` command.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use mastery_core::config::load_config_from;
use mastery_core::engine::MasteryEngine;
use mastery_core::parser::{load_progress_path, merge_by_learner, validate_progress_set};
use mastery_core::report::MasteryReport;
use mastery_report::html::write_html_report;

pub fn execute(
    progress_path: PathBuf,
    config_path: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
    subtopic_filter: Option<String>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "json" | "markdown"),
        "unknown format '{format}' (expected table, json or markdown)"
    );

    let config = load_config_from(config_path.as_deref())?;
    let engine = MasteryEngine::new(config);

    let sets = merge_by_learner(load_progress_path(&progress_path)?);
    anyhow::ensure!(
        !sets.is_empty(),
        "no progress records found in {}",
        progress_path.display()
    );
    tracing::debug!(
        "loaded {} learner(s) from {}",
        sets.len(),
        progress_path.display()
    );

    let filter: Option<Vec<&str>> = subtopic_filter
        .as_deref()
        .map(|f| f.split(',').map(|s| s.trim()).collect());

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let mut used_stems = HashSet::new();

    for set in &sets {
        for w in validate_progress_set(set) {
            let prefix = w
                .subtopic_id
                .as_ref()
                .map(|id| format!("[{}/{id}]", set.learner_id))
                .unwrap_or_else(|| format!("[{}]", set.learner_id));
            eprintln!("{prefix} WARNING: {}", w.message);
        }

        let mut records = set.clamped().subtopics;
        if let Some(ids) = &filter {
            records.retain(|s| ids.contains(&s.subtopic_id.as_str()));
            if records.is_empty() {
                eprintln!(
                    "No matching subtopics for learner {}, skipping.",
                    set.learner_id
                );
                continue;
            }
        }

        let report = MasteryReport::build(&engine, set.learner_id.clone(), &records);

        match format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&report)?),
            "markdown" => println!("{}", report.to_markdown()),
            _ => print_summary(&report),
        }

        if let Some(dir) = &output {
            std::fs::create_dir_all(dir)?;
            let base = format!("report-{}-{timestamp}", file_safe(&set.learner_id));
            let stem = unique_stem(dir, &base, &mut used_stems);

            let json_path = dir.join(format!("{stem}.json"));
            report.save_json(&json_path)?;
            eprintln!("Results saved to: {}", json_path.display());

            let html_path = dir.join(format!("{stem}.html"));
            write_html_report(&report, &html_path)?;
            eprintln!("HTML report: {}", html_path.display());
        }
    }

    Ok(())
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `base`, or `base-2`, `base-3`, ... if an earlier report took that name.
fn unique_stem(dir: &Path, base: &str, used: &mut HashSet<String>) -> String {
    let mut stem = base.to_string();
    let mut n = 2;
    while used.contains(&stem) || dir.join(format!("{stem}.json")).exists() {
        stem = format!("{base}-{n}");
        n += 1;
    }
    used.insert(stem.clone());
    stem
}

fn print_summary(report: &MasteryReport) {
    use comfy_table::{Cell, Table};

    println!("Learner: {}", report.learner_id);

    let mut table = Table::new();
    table.set_header(vec![
        "Subtopic",
        "Current",
        "Overall",
        "Confidence",
        "Questions",
        "A* potential",
        "Weakest",
        "Next milestone",
    ]);

    for a in &report.assessments {
        let m = &a.mastery;
        table.add_row(vec![
            Cell::new(&a.subtopic_id),
            Cell::new(format!("{} ({}%)", m.current.level, m.current.accuracy)),
            Cell::new(format!("{} ({}%)", m.overall.level, m.overall.accuracy)),
            Cell::new(m.current.confidence.level),
            Cell::new(m.overall.total_questions),
            Cell::new(format!("{}%", m.exam_readiness.a_star_potential)),
            Cell::new(m.exam_readiness.weakest_area),
            Cell::new(&m.exam_readiness.next_milestone),
        ]);
    }

    println!("{table}");

    let s = &report.summary;
    println!(
        "{} of {} subtopics assessed, average current accuracy {:.1}%",
        s.assessed, s.subtopics, s.avg_current_accuracy
    );
    if !s.weakest_subtopics.is_empty() {
        println!("Weakest: {}", s.weakest_subtopics.join(", "));
    }
}
