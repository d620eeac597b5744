use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovhtmlError {
    #[error("failed to open coverage profile {path}: {source}")]
    OpenProfile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read coverage profile: {0}")]
    ReadProfile(std::io::Error),

    #[error("failed to create output file {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    WriteReport(std::io::Error),
}

pub type Result<T> = std::result::Result<T, CovhtmlError>;
