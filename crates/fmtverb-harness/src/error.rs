//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no fixture JSON files found in {}", .0.display())]
    NoFixtures(PathBuf),
    #[error("unknown argument-index policy '{0}', expected resume|detached|both")]
    UnknownPolicy(String),
    #[error("invalid directive options: {}", join_errors(.0))]
    Options(Vec<fmtverb_core::OptionError>),
    #[error("conformance verification failed: {failed} of {total} cases")]
    Failed { failed: usize, total: usize },
}

fn join_errors(errors: &[fmtverb_core::OptionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
