//! Typed in-memory representation of JaCoCo coverage data. The parser
//! validates the XML shape once and produces these records; everything
//! downstream (aggregation, rendering) is a pure function over them.

/// Compute a coverage percentage rounded to two decimals.
///
/// When `covered + missed == 0` there is nothing to cover and the element
/// counts as fully covered (100.0). This matches the sentinel used for an
/// empty changed-file set.
#[must_use]
pub fn percentage(covered: u64, missed: u64) -> f64 {
    let total = covered + missed;
    if total == 0 {
        return 100.0;
    }
    let pct = covered as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// The measurement granularities JaCoCo emits.
///
/// Only `Instruction` is used for percentage computation; the rest are
/// carried so a report's counter list round-trips faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Instruction,
    Branch,
    Line,
    Complexity,
    Method,
    Class,
}

impl CounterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::Instruction => "INSTRUCTION",
            CounterKind::Branch => "BRANCH",
            CounterKind::Line => "LINE",
            CounterKind::Complexity => "COMPLEXITY",
            CounterKind::Method => "METHOD",
            CounterKind::Class => "CLASS",
        }
    }

    /// Map a JaCoCo `type` attribute value. Unknown values yield `None` and
    /// are skipped by the parser.
    pub fn from_attr(s: &str) -> Option<Self> {
        match s {
            "INSTRUCTION" => Some(CounterKind::Instruction),
            "BRANCH" => Some(CounterKind::Branch),
            "LINE" => Some(CounterKind::Line),
            "COMPLEXITY" => Some(CounterKind::Complexity),
            "METHOD" => Some(CounterKind::Method),
            "CLASS" => Some(CounterKind::Class),
            _ => None,
        }
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (missed, covered) measurement of a given kind.
#[derive(Debug, Clone, Copy)]
pub struct CoverageCounter {
    pub kind: CounterKind,
    pub missed: u64,
    pub covered: u64,
}

/// A source file within a package, with its own counters.
#[derive(Debug, Clone, Default)]
pub struct SourceFileRecord {
    pub name: String,
    pub counters: Vec<CoverageCounter>,
}

/// A package (slash-delimited, e.g. "com/example") and its source files.
#[derive(Debug, Clone, Default)]
pub struct PackageRecord {
    pub name: String,
    pub source_files: Vec<SourceFileRecord>,
}

/// One parsed JaCoCo report: module name, module-level counters, packages.
#[derive(Debug, Clone, Default)]
pub struct ReportModule {
    pub name: String,
    pub counters: Vec<CoverageCounter>,
    pub packages: Vec<PackageRecord>,
}

/// A file changed between the base and head revisions, as reported by the
/// source-control host. Never mutated by the aggregator.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub file_path: String,
    /// Link to the file at the head revision.
    pub url: String,
}

/// Missed/covered counts plus the derived percentage for one counter kind.
#[derive(Debug, Clone, Copy)]
pub struct DetailedCoverage {
    pub missed: u64,
    pub covered: u64,
    pub percentage: f64,
}

impl DetailedCoverage {
    #[must_use]
    pub fn new(missed: u64, covered: u64) -> Self {
        Self {
            missed,
            covered,
            percentage: percentage(covered, missed),
        }
    }
}

/// Coverage for one changed file matched against the reports.
#[derive(Debug, Clone)]
pub struct FileCoverageResult {
    pub file_path: String,
    pub url: String,
    /// Source file name as it appears in the report.
    pub name: String,
    pub missed: u64,
    pub covered: u64,
    pub percentage: f64,
}

/// Per-module coverage entry, in input report order.
#[derive(Debug, Clone)]
pub struct ModuleCoverage {
    pub module: String,
    pub coverage: f64,
}

/// Project-wide coverage plus the per-module breakdown.
#[derive(Debug, Clone)]
pub struct OverallCoverage {
    pub project: f64,
    pub modules: Vec<ModuleCoverage>,
}

/// Coverage over the changed files, sorted by percentage descending.
#[derive(Debug, Clone)]
pub struct FilesCoverage {
    pub files: Vec<FileCoverageResult>,
    /// Weighted aggregate over `files`; 100.0 when no file matched.
    pub percentage: f64,
}
