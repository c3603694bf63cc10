use candle_core::Tensor;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::TrainingError;

/// Rows used for fitting plus the trailing hold-out used only to report validation loss.
pub struct HoldoutSplit {
    pub train: Tensor,
    pub validation: Option<Tensor>,
}

impl HoldoutSplit {
    /// Splits off the last `fraction` of rows, preserving order.
    ///
    /// The hold-out is dropped when it would leave no training rows.
    pub fn new(samples: &Tensor, fraction: f32) -> Result<Self, TrainingError> {
        let (rows, _) = samples.dims2()?;
        if rows == 0 {
            return Err(TrainingError::EmptyDataset);
        }
        let (train_rows, validation_rows) = split_sizes(rows, fraction);
        if validation_rows == 0 {
            return Ok(Self {
                train: samples.clone(),
                validation: None,
            });
        }
        Ok(Self {
            train: samples.narrow(0, 0, train_rows)?,
            validation: Some(samples.narrow(0, train_rows, validation_rows)?),
        })
    }

    pub fn train_rows(&self) -> usize {
        self.train.dims()[0]
    }

    pub fn validation_rows(&self) -> usize {
        self.validation.as_ref().map_or(0, |v| v.dims()[0])
    }
}

/// Returns `(train, validation)` row counts; training keeps `floor(rows * (1 - fraction))`.
pub fn split_sizes(rows: usize, fraction: f32) -> (usize, usize) {
    if fraction <= 0.0 {
        return (rows, 0);
    }
    // `fraction` widened from f32 (0.2 -> 0.20000000298..) must not cost a training row.
    let train = (rows as f64 * (1.0 - fraction as f64) + 1e-6).floor() as usize;
    if train == 0 {
        return (rows, 0);
    }
    (train, rows - train)
}

/// Shuffles `0..rows` and chunks it into batches of at most `batch_size` indices.
pub fn epoch_batches<R: Rng>(rows: usize, batch_size: usize, rng: &mut R) -> Vec<Vec<u32>> {
    let mut order: Vec<u32> = (0..rows as u32).collect();
    order.shuffle(rng);
    order
        .chunks(batch_size.max(1))
        .map(<[u32]>::to_vec)
        .collect()
}
