use model_enc::StopwordConfig;
use serde::{Deserialize, Serialize};
use trainer::{AdamSettings, AutoencoderConfig};

use crate::error::PipelineError;

/// Knobs for one end-to-end pipeline run. Every field has a default so partial
/// TOML tables deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fixed length every id sequence is padded or truncated to.
    pub sequence_length: usize,
    pub embedding_dim: usize,
    pub cluster_count: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub validation_fraction: f32,
    pub learning_rate: f64,
    /// Shared by weight init, shuffling, PCA start vectors and k-means seeding.
    pub seed: u64,
    /// Upper bound on points returned per visualization.
    pub max_points: usize,
    pub examples_per_cluster: usize,
    pub max_cluster_iterations: usize,
    pub stopwords: StopwordConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sequence_length: 100,
            embedding_dim: 32,
            cluster_count: 3,
            epochs: 200,
            batch_size: 256,
            validation_fraction: 0.2,
            learning_rate: 1e-3,
            seed: 42,
            max_points: 500,
            examples_per_cluster: 3,
            max_cluster_iterations: 100,
            stopwords: StopwordConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Rejects settings that would let training succeed but every visualization fail.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.embedding_dim < 2 {
            return Err(PipelineError::InvalidConfiguration(
                "embedding_dim must be at least 2 for a 2-D projection",
            ));
        }
        if self.cluster_count == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "cluster_count must be positive",
            ));
        }
        if self.max_cluster_iterations == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "max_cluster_iterations must be positive",
            ));
        }
        Ok(())
    }

    pub fn autoencoder(&self) -> AutoencoderConfig {
        AutoencoderConfig {
            input_dim: self.sequence_length,
            embedding_dim: self.embedding_dim,
            epochs: self.epochs,
            batch_size: self.batch_size,
            validation_fraction: self.validation_fraction,
            optimizer: AdamSettings {
                learning_rate: self.learning_rate,
                ..AdamSettings::default()
            },
            seed: self.seed,
        }
    }
}
