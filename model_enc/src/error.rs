use thiserror::Error;

/// Errors raised when the corpus cannot be turned into normalized sequences.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    /// No records were supplied.
    #[error("corpus is empty")]
    EmptyCorpus,
    /// Every sequence is padding only, so the global maximum is zero.
    #[error("normalization is undefined: no record produced a token")]
    UndefinedNormalization,
    /// Target sequence length must be positive.
    #[error("sequence length must be positive")]
    InvalidSequenceLength,
}
