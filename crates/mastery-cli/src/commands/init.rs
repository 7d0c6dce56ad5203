//! The `mastery init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("mastery.toml").exists() {
        println!("mastery.toml already exists, skipping.");
    } else {
        std::fs::write("mastery.toml", SAMPLE_CONFIG)?;
        println!("Created mastery.toml");
    }

    std::fs::create_dir_all("progress")?;
    let example_path = std::path::Path::new("progress/example.toml");
    if example_path.exists() {
        println!("progress/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PROGRESS)?;
        println!("Created progress/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust thresholds in mastery.toml if needed");
    println!("  2. Run: mastery validate --progress progress/example.toml");
    println!("  3. Run: mastery assess --progress progress/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mastery configuration
# Every key is optional; omitted keys use the built-in defaults.

[foundation]
easy_mastered_pct = 80
medium_mastered_pct = 70

[levels]
mastery_pct = 90
proficient_pct = 75
approaching_pct = 60
developing_pct = 40
beginning_pct = 1

[confidence]
high_min_questions = 12
medium_min_questions = 8
low_min_questions = 5

[weights.advanced]
easy = 1.0
medium = 2.0
hard = 3.0

[weights.medium_focus]
easy = 1.0
medium = 2.5
hard = 1.0

[weights.foundation]
easy = 2.0
medium = 1.5
hard = 0.5

[readiness]
advanced_bonus = 10
foundation_penalty = 15
a_star_threshold = 85
consistency_level = 4
challenge_level = 3
"#;

const EXAMPLE_PROGRESS: &str = r#"[learner]
id = "student-1"
name = "Example Student"

[[subtopics]]
id = "algebra-linear-equations"
baseline_completed = true
last_practiced = "2025-09-14T16:30:00Z"

[subtopics.easy]
attempted = 10
correct = 8

[subtopics.medium]
attempted = 10
correct = 6

[subtopics.hard]
attempted = 10
correct = 2

[subtopics.core]
attempted = 18
correct = 12

[subtopics.extended]
attempted = 12
correct = 4

[[subtopics]]
id = "geometry-circle-theorems"
baseline_completed = true
last_practiced = "2025-09-20T09:00:00Z"

[subtopics.easy]
attempted = 10
correct = 10

[subtopics.medium]
attempted = 10
correct = 10

[subtopics.hard]
attempted = 10
correct = 9

[[subtopics]]
id = "vectors"
"#;
