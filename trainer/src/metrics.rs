use serde::Serialize;

/// Losses recorded at the end of one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EpochMetrics {
    /// Zero-based epoch index.
    pub epoch: usize,
    /// Mean reconstruction error over the training rows, weighted by batch size.
    pub loss: f32,
    /// Reconstruction error over the hold-out rows, if any.
    pub validation_loss: Option<f32>,
}

/// Per-epoch losses of a completed training run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrainingHistory {
    epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn push(&mut self, metrics: EpochMetrics) {
        self.epochs.push(metrics);
    }

    pub fn epochs(&self) -> &[EpochMetrics] {
        &self.epochs
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn final_loss(&self) -> Option<f32> {
        self.epochs.last().map(|m| m.loss)
    }

    pub fn final_validation_loss(&self) -> Option<f32> {
        self.epochs.last().and_then(|m| m.validation_loss)
    }

    /// Lowest training loss seen. Reported only; training never selects a checkpoint.
    pub fn best_loss(&self) -> Option<f32> {
        self.epochs.iter().map(|m| m.loss).reduce(f32::min)
    }
}

/// Batch-size weighted running mean of batch losses.
#[derive(Debug, Default)]
pub(crate) struct LossAccumulator {
    total: f64,
    rows: usize,
}

impl LossAccumulator {
    pub(crate) fn add(&mut self, loss: f32, rows: usize) {
        self.total += loss as f64 * rows as f64;
        self.rows += rows;
    }

    pub(crate) fn mean(&self) -> f32 {
        if self.rows == 0 {
            0.0
        } else {
            (self.total / self.rows as f64) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn accumulator_weights_by_rows() {
        let mut acc = LossAccumulator::default();
        acc.add(1.0, 3);
        acc.add(0.0, 1);
        assert_relative_eq!(acc.mean(), 0.75);
        assert_eq!(LossAccumulator::default().mean(), 0.0);
    }

    #[test]
    fn history_reports_last_and_best() {
        let mut history = TrainingHistory::default();
        assert!(history.final_loss().is_none());
        history.push(EpochMetrics {
            epoch: 0,
            loss: 0.3,
            validation_loss: Some(0.35),
        });
        history.push(EpochMetrics {
            epoch: 1,
            loss: 0.2,
            validation_loss: Some(0.4),
        });
        assert_eq!(history.len(), 2);
        assert_eq!(history.final_loss(), Some(0.2));
        assert_eq!(history.final_validation_loss(), Some(0.4));
        assert_eq!(history.best_loss(), Some(0.2));
    }
}
