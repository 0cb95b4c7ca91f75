//! Error types for aggregation.
//!
//! Library-level failures are typed here; `main` wraps them in
//! `anyhow` with extra context before reporting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an aggregation run.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// An input file could not be opened or read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory to scan could not be listed.
    #[error("Failed to scan directory '{path}': {message}")]
    Scan { path: PathBuf, message: String },

    /// A convergence file name carries no `<prefix><N>.txt` thread count.
    #[error("Cannot infer a thread count from file name '{path}'")]
    ThreadCountFromName { path: PathBuf },

    /// The configured file-name prefix cannot be turned into a pattern.
    #[error("Invalid result file prefix '{prefix}': {message}")]
    InvalidPrefix { prefix: String, message: String },

    /// No input line matched, so there is nothing to summarize or plot.
    #[error("No data points found in {files} input file(s)")]
    EmptyAggregate { files: usize },
}

impl AggregateError {
    /// Wraps an I/O error with the path that caused it.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_file() {
        let err = AggregateError::read(
            "res3.txt",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        let message = err.to_string();
        assert!(message.contains("res3.txt"));
        assert!(message.contains("No such file"));
    }

    #[test]
    fn test_empty_aggregate_message() {
        let err = AggregateError::EmptyAggregate { files: 5 };
        assert_eq!(err.to_string(), "No data points found in 5 input file(s)");
    }
}
