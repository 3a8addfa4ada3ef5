use std::path::PathBuf;

use thiserror::Error;

use crate::model::CounterKind;

#[derive(Error, Debug)]
pub enum CovprError {
    #[error("Failed to read report {path}: {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("XML parse error at position {position}: {source}")]
    Xml {
        source: quick_xml::Error,
        position: usize,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No {kind} counter on {element}")]
    CounterNotFound {
        kind: CounterKind,
        element: String,
    },

    #[error("GitHub API error: {0}")]
    Github(String),
}

pub type Result<T> = std::result::Result<T, CovprError>;
