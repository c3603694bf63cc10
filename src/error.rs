use clustering::ClusterError;
use datasets::CorpusError;
use model_enc::DataError;
use thiserror::Error;
use trainer::TrainingError;

use crate::service::PipelineState;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("corpus could not be loaded: {0}")]
    Corpus(#[from] CorpusError),

    #[error("corpus could not be encoded: {0}")]
    Data(#[from] DataError),

    #[error("autoencoder training failed: {0}")]
    Training(#[from] TrainingError),

    #[error("clustering failed: {0}")]
    Clustering(ClusterError),

    /// Fewer distinct embeddings than requested clusters.
    #[error("could not form {requested} non-empty clusters")]
    ClusteringDegenerate { requested: usize },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfiguration(&'static str),

    #[error("pipeline is not ready (state: {state})")]
    NotReady { state: PipelineState },

    #[error("pipeline failed during initialization: {reason}")]
    Failed { reason: String },

    #[error("tensor backend error: {0}")]
    Backend(#[from] candle_core::Error),
}

impl From<ClusterError> for PipelineError {
    fn from(error: ClusterError) -> Self {
        match error {
            ClusterError::Degenerate { requested, .. } => Self::ClusteringDegenerate { requested },
            other => Self::Clustering(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_clustering_is_lifted() {
        let error = PipelineError::from(ClusterError::Degenerate {
            requested: 3,
            attempts: 9,
        });
        assert!(matches!(
            error,
            PipelineError::ClusteringDegenerate { requested: 3 }
        ));
        assert!(matches!(
            PipelineError::from(ClusterError::EmptyInput),
            PipelineError::Clustering(ClusterError::EmptyInput)
        ));
    }
}
