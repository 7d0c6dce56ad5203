//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use mastery_core::report::{MasteryReport, SubtopicAssessment};
use mastery_core::results::MasteryLevel;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Hex color for a level's color tag.
fn level_hex(level: MasteryLevel) -> &'static str {
    match level.color() {
        "green" => "#22c55e",
        "blue" => "#3b82f6",
        "yellow" => "#eab308",
        "orange" => "#f97316",
        "red" => "#ef4444",
        _ => "#9ca3af",
    }
}

/// Generate an HTML report from a mastery report.
pub fn generate_html(report: &MasteryReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Mastery report: {}</title>\n",
        html_escape(&report.learner_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Mastery report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Learner: <strong>{}</strong> | {} subtopics | {} assessed | {}</p>\n",
        html_escape(&report.learner_id),
        report.summary.subtopics,
        report.summary.assessed,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    let summary = &report.summary;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><th>Average current accuracy</th><td>{:.1}%</td></tr>\n",
        summary.avg_current_accuracy
    ));
    html.push_str(&format!(
        "<tr><th>Average overall accuracy</th><td>{:.1}%</td></tr>\n",
        summary.avg_overall_accuracy
    ));
    html.push_str(&format!(
        "<tr><th>Ready for advanced work</th><td>{}</td></tr>\n",
        join_escaped(&summary.ready_for_advanced)
    ));
    html.push_str(&format!(
        "<tr><th>Weakest subtopics</th><td>{}</td></tr>\n",
        join_escaped(&summary.weakest_subtopics)
    ));
    html.push_str("</tbody></table>\n");

    if !report.assessments.is_empty() {
        html.push_str(&generate_bar_chart(&report.assessments));
    }
    html.push_str("</section>\n");

    // Per-subtopic results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Subtopics</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Subtopic</th><th onclick=\"sortTable(1)\">Current</th><th onclick=\"sortTable(2)\">Overall</th><th onclick=\"sortTable(3)\">Confidence</th><th onclick=\"sortTable(4)\">A* potential</th><th onclick=\"sortTable(5)\">Weakest</th><th>Next milestone</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for a in &report.assessments {
        let m = &a.mastery;
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"level-{}\">{} ({}%)</td><td class=\"level-{}\">{} ({}%)</td><td>{}</td><td>{}%</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&a.subtopic_id),
            m.current.level.color(),
            m.current.level,
            m.current.accuracy,
            m.overall.level.color(),
            m.overall.level,
            m.overall.accuracy,
            m.current.confidence.level,
            m.exam_readiness.a_star_potential,
            m.exam_readiness.weakest_area,
            html_escape(&m.exam_readiness.next_milestone),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Recommendations
    html.push_str("<section class=\"recommendations\">\n");
    html.push_str("<h2>Recommendations</h2>\n");
    for a in &report.assessments {
        html.push_str(&format!("<h3>{}</h3>\n<ul>\n", html_escape(&a.subtopic_id)));
        for r in &a.mastery.recommendations {
            html.push_str(&format!("<li>{}</li>\n", html_escape(r)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(&serde_json::to_string_pretty(report).unwrap_or_default()));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &MasteryReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn join_escaped(items: &[String]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|s| html_escape(s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn generate_bar_chart(assessments: &[SubtopicAssessment]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = assessments.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, a) in assessments.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let accuracy = a.mastery.current.accuracy;
        let width = accuracy as usize * max_width / 100;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&a.subtopic_id)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            level_hex(a.mastery.current.level)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}% {}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            accuracy,
            a.mastery.current.level
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.level-green { color: #15803d; font-weight: bold; }
.level-blue { color: #1d4ed8; }
.level-yellow { color: #a16207; }
.level-orange { color: #c2410c; }
.level-red { color: #b91c1c; }
.level-gray { color: #6b7280; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
