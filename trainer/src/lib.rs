//! Autoencoder training: a dense encoder/decoder pair fitted to reconstruct normalized sequences.

pub mod autoencoder;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod offline;
pub mod optimizer;

pub use autoencoder::{Autoencoder, Decoder, Encoder, rows_to_tensor};
pub use config::AutoencoderConfig;
pub use dataset::{HoldoutSplit, epoch_batches, split_sizes};
pub use error::TrainingError;
pub use metrics::{EpochMetrics, TrainingHistory};
pub use offline::{AutoencoderTrainer, EpochObserver, TrainedAutoencoder};
pub use optimizer::AdamSettings;

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(epochs: usize) -> AutoencoderConfig {
        AutoencoderConfig {
            input_dim: 8,
            embedding_dim: 3,
            epochs,
            batch_size: 4,
            validation_fraction: 0.25,
            optimizer: AdamSettings {
                learning_rate: 1e-2,
                ..AdamSettings::default()
            },
            seed: 3,
        }
    }

    fn patterned_rows() -> Vec<Vec<f32>> {
        (0..16)
            .map(|i| {
                (0..8)
                    .map(|j| if (i + j) % 4 == 0 { 1.0 } else { 0.25 * (j % 3) as f32 })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn training_reduces_reconstruction_loss() {
        let trainer = AutoencoderTrainer::new(small_config(60));
        let trained = trainer.fit(&patterned_rows(), None).expect("training succeeds");

        let history = trained.history();
        assert_eq!(history.len(), 60);
        let first = history.epochs()[0].loss;
        let last = history.final_loss().unwrap();
        assert!(last < first, "loss did not improve: {first} -> {last}");
        assert!(history.final_validation_loss().is_some());
    }

    #[test]
    fn encoder_is_usable_without_decoder() {
        let trainer = AutoencoderTrainer::new(small_config(2));
        let trained = trainer.fit(&patterned_rows(), None).unwrap();
        let (encoder, _, _) = trained.into_parts();

        let embeddings = encoder.embed_rows(&patterned_rows()).unwrap();
        assert_eq!(embeddings.len(), 16);
        assert!(embeddings.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn observer_sees_every_epoch() {
        let trainer = AutoencoderTrainer::new(small_config(5));
        let mut seen = Vec::new();
        let mut record = |metrics: &EpochMetrics| seen.push(metrics.epoch);
        let observer: &mut dyn EpochObserver = &mut record;
        trainer.fit(&patterned_rows(), Some(observer)).unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn non_finite_inputs_fail_training() {
        let mut rows = patterned_rows();
        rows[0][0] = f32::NAN;
        let trainer = AutoencoderTrainer::new(AutoencoderConfig {
            validation_fraction: 0.0,
            batch_size: 16,
            ..small_config(3)
        });
        let error = trainer.fit(&rows, None).unwrap_err();
        assert!(matches!(error, TrainingError::NonFiniteLoss { epoch: 0, .. }));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let trainer = AutoencoderTrainer::new(AutoencoderConfig {
            batch_size: 0,
            ..small_config(1)
        });
        assert!(matches!(
            trainer.fit(&patterned_rows(), None),
            Err(TrainingError::InvalidConfiguration(_))
        ));

        let trainer = AutoencoderTrainer::new(small_config(1));
        assert!(matches!(
            trainer.fit(&[], None),
            Err(TrainingError::EmptyDataset)
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: AutoencoderConfig =
            serde_json::from_str(r#"{"epochs": 5, "optimizer": {"learning_rate": 0.01}}"#).unwrap();
        assert_eq!(config.epochs, 5);
        assert_eq!(config.batch_size, 256);
        assert_eq!(config.embedding_dim, 32);
        assert_eq!(config.optimizer.beta1, 0.9);
        assert_eq!(config.optimizer.weight_decay, 0.0);
    }

    #[test]
    fn same_seed_gives_same_weights() {
        let rows = patterned_rows();
        let a = AutoencoderTrainer::new(small_config(3)).fit(&rows, None).unwrap();
        let b = AutoencoderTrainer::new(small_config(3)).fit(&rows, None).unwrap();
        assert_eq!(
            a.encoder().embed_rows(&rows).unwrap(),
            b.encoder().embed_rows(&rows).unwrap()
        );
    }
}
