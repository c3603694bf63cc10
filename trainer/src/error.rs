use thiserror::Error;

/// Errors raised while fitting or running the autoencoder.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// A batch or validation loss became NaN or infinite.
    #[error("non-finite loss {loss} at epoch {epoch}")]
    NonFiniteLoss { epoch: usize, loss: f32 },
    /// No rows were supplied for training.
    #[error("training data is empty")]
    EmptyDataset,
    /// Invalid hyper-parameter value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// Input width does not match the network.
    #[error("expected input dimension {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// Tensor backend failure.
    #[error("tensor backend error: {0}")]
    Backend(#[from] candle_core::Error),
}
