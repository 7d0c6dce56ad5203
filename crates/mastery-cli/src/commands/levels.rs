//! The `mastery levels` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mastery_core::config::load_config_from;
use mastery_core::results::MasteryLevel;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["Level", "Ordinal", "Min accuracy", "Color", "Description"]);

    for level in MasteryLevel::ALL.iter().rev() {
        let min = config
            .levels
            .min_accuracy(*level)
            .map(|pct| format!("{pct}%"))
            .unwrap_or_else(|| "no attempts".to_string());
        table.add_row(vec![
            Cell::new(level),
            Cell::new(level.ordinal()),
            Cell::new(min),
            Cell::new(level.color()),
            Cell::new(level.description()),
        ]);
    }

    println!("{table}");
    println!(
        "Foundations: easy {}%+, medium {}%+ before hard questions gain weight.",
        config.foundation.easy_mastered_pct, config.foundation.medium_mastered_pct
    );

    Ok(())
}
