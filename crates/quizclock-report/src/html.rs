//! HTML review page.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined. Correct
//! answers and explanations appear here, so the page is only generated for
//! finished attempts.

use anyhow::{Context, Result};
use std::path::Path;

use quizclock_core::record::AttemptRecord;
use quizclock_core::statistics::{compute_breakdown, GroupStats};
use quizclock_core::QuestionBank;

use crate::review::{format_duration, review_items, ReviewItem};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the review page for a finished attempt.
pub fn generate_html(record: &AttemptRecord, bank: &QuestionBank) -> String {
    let result = &record.result;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizclock review: {}</title>\n",
        html_escape(&record.bank.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>quizclock review</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | {} questions | {} | {}</p>\n",
        html_escape(&record.bank.name),
        record.bank.question_count,
        record.status,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"grade grade-{}\">{}</p>\n",
        result.grade.to_string().to_lowercase(),
        result.grade
    ));
    html.push_str(&format!(
        "<p class=\"feedback\">{}</p>\n",
        html_escape(&result.feedback)
    ));
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Correct</th><th>Score</th><th>Points</th><th>Time</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}/{}</td><td>{}%</td><td>{}/{}</td><td>{}</td></tr></tbody>\n",
        result.correct_answers,
        result.total_questions,
        result.score_percent,
        result.points_earned,
        result.total_points,
        format_duration(result.time_taken_seconds)
    ));
    html.push_str("</table>\n");

    let breakdown = compute_breakdown(bank, result);
    if !breakdown.per_category.is_empty() {
        html.push_str("<h3>By category</h3>\n");
        html.push_str(&generate_bar_chart(&breakdown.per_category));
    }
    html.push_str("</section>\n");

    // Per-question review
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Question</th><th onclick=\"sortTable(2)\">Category</th><th onclick=\"sortTable(3)\">Difficulty</th><th onclick=\"sortTable(4)\">Result</th><th onclick=\"sortTable(5)\">Points</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    let items = review_items(record, bank);
    for item in &items {
        let class = if item.is_correct() { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td><a href=\"#q-{}\">{}</a></td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}/{}</td></tr>\n",
            class,
            item.index + 1,
            html_escape(&item.question.id),
            html_escape(&item.question.id),
            html_escape(&item.question.category),
            item.question.difficulty,
            class,
            item.status_label(),
            item.outcome.map_or(0, |o| o.points_awarded),
            item.question.points,
        ));
    }
    html.push_str("</tbody></table>\n");

    for item in &items {
        html.push_str(&question_card(item));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(record).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the review page to a file.
pub fn write_html_report(record: &AttemptRecord, bank: &QuestionBank, path: &Path) -> Result<()> {
    let html = generate_html(record, bank);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn question_card(item: &ReviewItem<'_>) -> String {
    let q = item.question;
    let mut card = format!(
        "<article class=\"question {}\" id=\"q-{}\">\n<h3>{}. {}</h3>\n",
        if item.is_correct() { "pass" } else { "fail" },
        html_escape(&q.id),
        item.index + 1,
        html_escape(&q.prompt)
    );

    if !q.options.is_empty() {
        card.push_str("<ul class=\"options\">\n");
        for option in &q.options {
            card.push_str(&format!("<li>{}</li>\n", html_escape(option)));
        }
        card.push_str("</ul>\n");
    }

    let given = item
        .given
        .filter(|a| !a.is_empty())
        .map_or_else(|| "(no answer)".to_string(), |a| a.to_string());
    card.push_str(&format!(
        "<p><strong>Your answer:</strong> <code>{}</code></p>\n",
        html_escape(&given)
    ));
    card.push_str(&format!(
        "<p><strong>Correct answer:</strong> <code>{}</code></p>\n",
        html_escape(&q.correct_answer.to_string())
    ));
    if item.outcome.is_some_and(|o| o.mismatch) {
        card.push_str(&format!(
            "<p class=\"warning\">The recorded answer does not fit a {} question.</p>\n",
            q.kind
        ));
    }
    if !q.explanation.is_empty() {
        card.push_str(&format!(
            "<p class=\"explanation\">{}</p>\n",
            html_escape(&q.explanation)
        ));
    }

    card.push_str("</article>\n");
    card
}

fn generate_bar_chart(per_category: &std::collections::BTreeMap<String, GroupStats>) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = per_category.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );

    for (i, (category, stats)) in per_category.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let percent = stats.percent() as usize;
        let width = percent * max_width / 100;

        let color = if percent >= 80 {
            "#22c55e"
        } else if percent >= 60 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(category)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}% ({}/{})</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            percent,
            stats.correct,
            stats.total
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); max-width: 960px; }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.grade { font-size: 3rem; font-weight: bold; margin: 0; }
.grade-a, .grade-b { color: #16a34a; }
.grade-c, .grade-d { color: #ca8a04; }
.grade-f { color: #dc2626; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
article.question { border: 1px solid var(--border); border-radius: 8px; padding: 0 1rem 1rem; margin: 1rem 0; }
.explanation { font-style: italic; }
.warning { color: #dc2626; }
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
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
