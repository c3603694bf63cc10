use thiserror::Error;

/// Errors returned by the projection and clustering stages.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite value in row {row}")]
    NonFinite {
        /// Offending row index.
        row: usize,
    },

    /// Empty clusters could not be re-seeded, typically because there are fewer
    /// distinct points than clusters.
    #[error("cannot form {requested} non-empty clusters after {attempts} re-seed attempts")]
    Degenerate {
        /// Requested number of clusters.
        requested: usize,
        /// Failed re-seed attempts before giving up.
        attempts: usize,
    },

    /// Tensor backend failure while projecting.
    #[error("tensor backend error: {0}")]
    Backend(#[from] candle_core::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
