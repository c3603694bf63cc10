use candle_core::{Device, Tensor};
use candle_nn::Optimizer;
use candle_nn::loss::mse;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

use crate::autoencoder::{Autoencoder, Decoder, Encoder, rows_to_tensor};
use crate::config::AutoencoderConfig;
use crate::dataset::{HoldoutSplit, epoch_batches};
use crate::error::TrainingError;
use crate::metrics::{EpochMetrics, LossAccumulator, TrainingHistory};

/// Hook invoked after every completed epoch.
pub trait EpochObserver {
    fn on_epoch_end(&mut self, metrics: &EpochMetrics);
}

impl<F: FnMut(&EpochMetrics)> EpochObserver for F {
    fn on_epoch_end(&mut self, metrics: &EpochMetrics) {
        self(metrics)
    }
}

/// Result of a full training run. Parameters are detached from the optimizer.
#[derive(Clone, Debug)]
pub struct TrainedAutoencoder {
    encoder: Encoder,
    decoder: Decoder,
    history: TrainingHistory,
}

impl TrainedAutoencoder {
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    pub fn reconstruct(&self, inputs: &Tensor) -> Result<Tensor, TrainingError> {
        self.decoder.decode(&self.encoder.embed(inputs)?)
    }

    pub fn into_parts(self) -> (Encoder, Decoder, TrainingHistory) {
        (self.encoder, self.decoder, self.history)
    }
}

/// Offline reconstruction trainer. Always runs the full epoch budget.
pub struct AutoencoderTrainer {
    config: AutoencoderConfig,
}

impl AutoencoderTrainer {
    pub fn new(config: AutoencoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AutoencoderConfig {
        &self.config
    }

    /// Trains on row slices; every row must be `input_dim` wide.
    pub fn fit(
        &self,
        rows: &[Vec<f32>],
        observer: Option<&mut dyn EpochObserver>,
    ) -> Result<TrainedAutoencoder, TrainingError> {
        if rows.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        let samples = rows_to_tensor(rows, self.config.input_dim, &Device::Cpu)?;
        self.fit_tensor(&samples, observer)
    }

    /// Trains on an `[n, input_dim]` tensor.
    #[instrument(skip_all, fields(epochs = self.config.epochs, batch_size = self.config.batch_size))]
    pub fn fit_tensor(
        &self,
        samples: &Tensor,
        mut observer: Option<&mut dyn EpochObserver>,
    ) -> Result<TrainedAutoencoder, TrainingError> {
        self.config.validate()?;
        let (_, width) = samples.dims2()?;
        if width != self.config.input_dim {
            return Err(TrainingError::DimensionMismatch {
                expected: self.config.input_dim,
                found: width,
            });
        }

        let split = HoldoutSplit::new(samples, self.config.validation_fraction)?;
        if split.validation.is_none() && self.config.validation_fraction > 0.0 {
            warn!(
                rows = split.train_rows(),
                "too few rows for a validation hold-out, reporting training loss only"
            );
        }
        info!(
            train_rows = split.train_rows(),
            validation_rows = split.validation_rows(),
            "autoencoder training started"
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let device = samples.device().clone();
        let model = Autoencoder::new(
            self.config.input_dim,
            self.config.embedding_dim,
            &mut rng,
            &device,
        )?;
        let mut optimizer = self.config.optimizer.build(model.vars())?;
        let mut history = TrainingHistory::default();

        for epoch in 0..self.config.epochs {
            let mut epoch_loss = LossAccumulator::default();
            for batch in epoch_batches(split.train_rows(), self.config.batch_size, &mut rng) {
                let batch_rows = batch.len();
                let indices = Tensor::from_vec(batch, batch_rows, &device)?;
                let inputs = split.train.index_select(&indices, 0)?;
                let loss = mse(&model.reconstruct(&inputs)?, &inputs)?;
                let value = loss.to_scalar::<f32>()?;
                ensure_finite(epoch, value)?;
                optimizer.backward_step(&loss)?;
                epoch_loss.add(value, batch_rows);
            }

            let validation_loss = match &split.validation {
                Some(validation) => {
                    let reconstruction = model.reconstruct(validation)?;
                    let value = mse(&reconstruction, validation)?.to_scalar::<f32>()?;
                    ensure_finite(epoch, value)?;
                    Some(value)
                }
                None => None,
            };

            let metrics = EpochMetrics {
                epoch,
                loss: epoch_loss.mean(),
                validation_loss,
            };
            debug!(
                epoch = epoch + 1,
                loss = metrics.loss,
                validation_loss = ?metrics.validation_loss,
                "epoch finished"
            );
            if let Some(hook) = observer.as_mut() {
                hook.on_epoch_end(&metrics);
            }
            history.push(metrics);
        }

        let (encoder, decoder) = model.freeze()?;
        info!(
            epochs = history.len(),
            loss = ?history.final_loss(),
            validation_loss = ?history.final_validation_loss(),
            "autoencoder training complete"
        );
        Ok(TrainedAutoencoder {
            encoder,
            decoder,
            history,
        })
    }
}

fn ensure_finite(epoch: usize, loss: f32) -> Result<(), TrainingError> {
    if loss.is_finite() {
        Ok(())
    } else {
        Err(TrainingError::NonFiniteLoss { epoch, loss })
    }
}
