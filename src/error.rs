//! Error types for vmstat2.
//!
//! Retrieval failures are fatal: there is no retry and no partial report.
//! Configuration errors live in [`crate::config::ConfigError`] because they are
//! raised before any host access happens.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using VmStatError
pub type Result<T> = std::result::Result<T, VmStatError>;

/// Errors raised while sampling the host or emitting a report.
#[derive(Error, Debug)]
pub enum VmStatError {
    /// A host statistic could not be obtained
    #[error("Failed to fetch {what}: {reason}")]
    Retrieval { what: &'static str, reason: String },

    /// The JSON test data file could not be read or parsed
    #[error("Failed to load test data from {}: {reason}", path.display())]
    TestData { path: PathBuf, reason: String },

    /// Writing the report failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VmStatError {
    pub fn retrieval(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Retrieval {
            what,
            reason: reason.into(),
        }
    }

    pub fn test_data(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::TestData {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_message_names_the_statistic() {
        let err = VmStatError::retrieval("page size", "kern_return 5");
        assert_eq!(err.to_string(), "Failed to fetch page size: kern_return 5");
    }

    #[test]
    fn test_test_data_message_includes_path() {
        let err = VmStatError::test_data("/tmp/samples.json", "missing field `samples`");
        assert_eq!(
            err.to_string(),
            "Failed to load test data from /tmp/samples.json: missing field `samples`"
        );
    }
}
