use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] lss_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    InvalidSplits {
        path: PathBuf,
        #[source]
        source: lss_core::Error,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{failed} of {total} files did not round-trip")]
    RoundTripFailed { failed: usize, total: usize },
    #[error("Runs are not comparable")]
    NotComparable,
}
