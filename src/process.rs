//! Coverage aggregation: turns parsed report modules plus the changed-file
//! list into overall and per-changed-file coverage. Pure computation over
//! the typed model; all percentages are weighted aggregates of summed
//! missed/covered counts, never averages of percentages.

use crate::error::{CovprError, Result};
use crate::model::{
    percentage, ChangedFile, CounterKind, CoverageCounter, DetailedCoverage, FileCoverageResult,
    FilesCoverage, ModuleCoverage, OverallCoverage, ReportModule,
};

/// Find the first counter of the requested kind and derive its coverage.
pub fn detailed_coverage(
    counters: &[CoverageCounter],
    kind: CounterKind,
) -> Result<DetailedCoverage> {
    let counter = counters
        .iter()
        .find(|c| c.kind == kind)
        .ok_or(CovprError::CounterNotFound {
            kind,
            element: "counter list".to_string(),
        })?;
    Ok(DetailedCoverage::new(counter.missed, counter.covered))
}

/// Instruction coverage percentage of a single report module.
///
/// A module without an INSTRUCTION counter is an error: there is no
/// meaningful fallback for module or project aggregates.
pub fn module_coverage(report: &ReportModule) -> Result<f64> {
    let coverage =
        detailed_coverage(&report.counters, CounterKind::Instruction).map_err(|_| {
            CovprError::CounterNotFound {
                kind: CounterKind::Instruction,
                element: format!("module '{}'", report.name),
            }
        })?;
    Ok(coverage.percentage)
}

/// Weighted instruction coverage across all report modules.
///
/// Missed and covered counts are summed independently before dividing, so
/// larger modules dominate proportionally.
pub fn project_coverage(reports: &[ReportModule]) -> Result<f64> {
    let mut missed = 0u64;
    let mut covered = 0u64;
    for report in reports {
        let coverage =
            detailed_coverage(&report.counters, CounterKind::Instruction).map_err(|_| {
                CovprError::CounterNotFound {
                    kind: CounterKind::Instruction,
                    element: format!("module '{}'", report.name),
                }
            })?;
        missed += coverage.missed;
        covered += coverage.covered;
    }
    Ok(percentage(covered, missed))
}

/// Project coverage plus per-module entries in input report order.
pub fn overall_coverage(reports: &[ReportModule]) -> Result<OverallCoverage> {
    let modules = reports
        .iter()
        .map(|report| {
            Ok(ModuleCoverage {
                module: report.name.clone(),
                coverage: module_coverage(report)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(OverallCoverage {
        project: project_coverage(reports)?,
        modules,
    })
}

/// True when `file_path` ends with `key` aligned on a path boundary.
///
/// The changed-file path is repository-relative while the coverage key is
/// package-relative, so "src/main/java/com/acme/Foo.java" must match the
/// key "com/acme/Foo.java" — but "javacom/acme/Foo.java" must not.
fn path_suffix_match(file_path: &str, key: &str) -> bool {
    file_path == key
        || file_path
            .strip_suffix(key)
            .is_some_and(|prefix| prefix.ends_with('/'))
}

/// Match every source file in every report against the changed files and
/// aggregate instruction coverage over the matches.
///
/// Skips are normal outcomes, not errors: a source file with no matching
/// changed file, or a match whose source file carries no counters, simply
/// does not contribute. A non-empty counter list lacking an INSTRUCTION
/// entry is malformed input for a single file; it is skipped with a stderr
/// warning rather than failing the whole aggregation.
pub fn file_coverage(reports: &[ReportModule], changed_files: &[ChangedFile]) -> FilesCoverage {
    let mut files: Vec<FileCoverageResult> = Vec::new();

    for package in reports.iter().flat_map(|r| r.packages.iter()) {
        for source_file in &package.source_files {
            let key = if package.name.is_empty() {
                source_file.name.clone()
            } else {
                format!("{}/{}", package.name, source_file.name)
            };

            // First matching changed file wins; duplicate suffixes across
            // differently nested modules resolve to the earliest entry.
            let Some(changed) = changed_files
                .iter()
                .find(|f| path_suffix_match(&f.file_path, &key))
            else {
                continue;
            };

            if source_file.counters.is_empty() {
                continue;
            }

            match detailed_coverage(&source_file.counters, CounterKind::Instruction) {
                Ok(coverage) => files.push(FileCoverageResult {
                    file_path: changed.file_path.clone(),
                    url: changed.url.clone(),
                    name: source_file.name.clone(),
                    missed: coverage.missed,
                    covered: coverage.covered,
                    percentage: coverage.percentage,
                }),
                Err(_) => {
                    eprintln!("Warning: no INSTRUCTION counter on source file '{key}', skipping");
                }
            }
        }
    }

    // Stable sort: equal percentages keep discovery order.
    files.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    let pct = if files.is_empty() {
        100.0
    } else {
        let covered = files.iter().map(|f| f.covered).sum();
        let missed = files.iter().map(|f| f.missed).sum();
        percentage(covered, missed)
    };

    FilesCoverage {
        files,
        percentage: pct,
    }
}
