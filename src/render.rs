//! Markdown rendering of coverage results for pull request comments.
//!
//! The output format is parsed by downstream consumers, so every row and
//! glyph here is fixed: pipe-delimited tables, an alignment row after each
//! header, `:white_check_mark:`/`:x:` status markers, and percentages with
//! trailing zeros stripped.

use std::fmt::Write;

use crate::model::FilesCoverage;

const TABLE_STRUCTURE: &str = "|:-|:-:|:-:|";
const NO_COVERAGE_INFO: &str =
    "> There is no coverage information present for the Files changed";

/// Status glyph for a coverage value against a threshold. Meeting the
/// threshold exactly passes; only strictly-below fails.
fn status(coverage: f64, min_coverage: f64) -> &'static str {
    if coverage < min_coverage {
        ":x:"
    } else {
        ":white_check_mark:"
    }
}

/// Format a percentage: two decimals, trailing zeros stripped (87.5%, 100%).
#[must_use]
pub fn format_coverage(coverage: f64) -> String {
    let rounded = (coverage * 100.0).round() / 100.0;
    format!("{rounded}%")
}

/// Heading line for the comment, or the empty string for no title.
#[must_use]
pub fn title_line(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!("### {title}\n")
    }
}

/// Table of changed-file coverage, one row per matched file.
///
/// The header embeds the aggregate percentage with its own pass/fail
/// marker; each file row is marked independently against the same
/// threshold. An empty file set renders a fixed informational line.
#[must_use]
pub fn file_table(files_coverage: &FilesCoverage, min_coverage: f64) -> String {
    if files_coverage.files.is_empty() {
        return NO_COVERAGE_INFO.to_string();
    }

    let total_pct = files_coverage.percentage;
    let mut table = format!(
        "|File|Coverage [{}]|{}|\n{}",
        format_coverage(total_pct),
        status(total_pct, min_coverage),
        TABLE_STRUCTURE,
    );

    for file in &files_coverage.files {
        write!(
            table,
            "\n|[{}]({})|{}|{}|",
            file.name,
            file.url,
            format_coverage(file.percentage),
            status(file.percentage, min_coverage),
        )
        .unwrap();
    }

    table
}

/// Single-row table for the project-wide coverage.
#[must_use]
pub fn overall_table(coverage: f64, min_coverage: f64) -> String {
    format!(
        "|Total Project Coverage|{}|{}|\n{}",
        format_coverage(coverage),
        status(coverage, min_coverage),
        TABLE_STRUCTURE,
    )
}

/// Assemble the full comment body: title, file table, overall table.
#[must_use]
pub fn pr_comment(
    overall_coverage: f64,
    files_coverage: &FilesCoverage,
    min_coverage_overall: f64,
    min_coverage_changed_files: f64,
    title: &str,
) -> String {
    format!(
        "{}{}\n\n{}",
        title_line(title),
        file_table(files_coverage, min_coverage_changed_files),
        overall_table(overall_coverage, min_coverage_overall),
    )
}
