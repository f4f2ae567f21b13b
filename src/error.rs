//! Error types for cut computation and refinement

use thiserror::Error;

use crate::graph::NodeId;

/// Result type for cut operations
pub type Result<T> = std::result::Result<T, CutError>;

/// Errors that can occur when computing or refining cuts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutError {
    /// Result requested before `run()` completed
    #[error("call run() before requesting the result")]
    NotRun,

    /// Seed partition is not a proper two-way clustering
    #[error("invalid seed partition: {0}")]
    InvalidPartition(String),

    /// Invalid construction parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No contraction phase produced a cut separating the terminal pair
    #[error("no phase candidate separated the terminal pair ({0}, {1})")]
    NoSeparatingCut(NodeId, NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CutError::NotRun;
        assert_eq!(err.to_string(), "call run() before requesting the result");

        let err = CutError::InvalidPartition("expected 2 subsets, found 3".to_string());
        assert_eq!(
            err.to_string(),
            "invalid seed partition: expected 2 subsets, found 3"
        );

        let err = CutError::NoSeparatingCut(4, 7);
        assert_eq!(
            err.to_string(),
            "no phase candidate separated the terminal pair (4, 7)"
        );
    }
}
