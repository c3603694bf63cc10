use serde::{Deserialize, Serialize};

use crate::error::TrainingError;
use crate::optimizer::AdamSettings;

/// Configuration for the autoencoder trainer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoencoderConfig {
    /// Width of the normalized input sequences.
    pub input_dim: usize,
    /// Width of the bottleneck layer, i.e. the embedding size.
    pub embedding_dim: usize,
    pub epochs: usize,
    pub batch_size: usize,
    /// Trailing share of rows held out to report validation loss.
    pub validation_fraction: f32,
    pub optimizer: AdamSettings,
    /// Seeds weight initialisation and per-epoch shuffling.
    pub seed: u64,
}

impl Default for AutoencoderConfig {
    fn default() -> Self {
        Self {
            input_dim: 100,
            embedding_dim: 32,
            epochs: 200,
            batch_size: 256,
            validation_fraction: 0.2,
            optimizer: AdamSettings::default(),
            seed: 42,
        }
    }
}

impl AutoencoderConfig {
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.input_dim == 0 {
            return Err(TrainingError::InvalidConfiguration(
                "input_dim must be positive",
            ));
        }
        if self.embedding_dim == 0 {
            return Err(TrainingError::InvalidConfiguration(
                "embedding_dim must be positive",
            ));
        }
        if self.epochs == 0 {
            return Err(TrainingError::InvalidConfiguration(
                "epochs must be positive",
            ));
        }
        if self.batch_size == 0 {
            return Err(TrainingError::InvalidConfiguration(
                "batch_size must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.validation_fraction) {
            return Err(TrainingError::InvalidConfiguration(
                "validation_fraction must lie in [0, 1)",
            ));
        }
        if !(self.optimizer.learning_rate > 0.0) {
            return Err(TrainingError::InvalidConfiguration(
                "learning_rate must be positive",
            ));
        }
        Ok(())
    }
}
