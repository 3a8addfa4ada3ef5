use std::path::{Path, PathBuf};

use crate::error::{CovprError, Result};
use crate::model::ReportModule;
use crate::parsers::jacoco;

/// Read and parse every report path, preserving input order. A path that
/// cannot be read or parsed fails the whole load.
pub fn load_reports(paths: &[PathBuf]) -> Result<Vec<ReportModule>> {
    paths.iter().map(|path| load_report(path)).collect()
}

/// Read a single JaCoCo XML report from disk.
pub fn load_report(path: &Path) -> Result<ReportModule> {
    let content = std::fs::read(path).map_err(|source| CovprError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    jacoco::parse(&content)
}
