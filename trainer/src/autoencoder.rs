//! Two-layer dense autoencoder: `input -> relu(embedding) -> sigmoid(input)`.

use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{Linear, Module};
use rand::Rng;

use crate::error::TrainingError;

/// Encoder half. Maps `[n, input_dim]` rows to `[n, embedding_dim]` embeddings.
#[derive(Clone, Debug)]
pub struct Encoder {
    layer: Linear,
    input_dim: usize,
    embedding_dim: usize,
}

impl Encoder {
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Runs the encoder on a batch without touching the decoder.
    pub fn embed(&self, inputs: &Tensor) -> Result<Tensor, TrainingError> {
        check_width(inputs, self.input_dim)?;
        Ok(self.layer.forward(inputs)?.relu()?)
    }

    /// Convenience wrapper around [`Encoder::embed`] for row slices.
    pub fn embed_rows(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, TrainingError> {
        let inputs = rows_to_tensor(rows, self.input_dim, &Device::Cpu)?;
        Ok(self.embed(&inputs)?.to_vec2::<f32>()?)
    }
}

/// Decoder half. Sigmoid output keeps reconstructions inside `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Decoder {
    layer: Linear,
    embedding_dim: usize,
    output_dim: usize,
}

impl Decoder {
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    pub fn decode(&self, embeddings: &Tensor) -> Result<Tensor, TrainingError> {
        check_width(embeddings, self.embedding_dim)?;
        Ok(candle_nn::ops::sigmoid(&self.layer.forward(embeddings)?)?)
    }
}

/// Trainable network. Weights live in [`Var`]s so the optimizer can update them in place.
pub struct Autoencoder {
    encoder: Encoder,
    decoder: Decoder,
    vars: Vec<Var>,
}

impl Autoencoder {
    /// Glorot-uniform weights drawn from `rng`, zero biases.
    pub fn new<R: Rng>(
        input_dim: usize,
        embedding_dim: usize,
        rng: &mut R,
        device: &Device,
    ) -> Result<Self, TrainingError> {
        let (encoder_weight, encoder_bias) = dense_vars(input_dim, embedding_dim, rng, device)?;
        let (decoder_weight, decoder_bias) = dense_vars(embedding_dim, input_dim, rng, device)?;

        let encoder = Encoder {
            layer: Linear::new(
                encoder_weight.as_tensor().clone(),
                Some(encoder_bias.as_tensor().clone()),
            ),
            input_dim,
            embedding_dim,
        };
        let decoder = Decoder {
            layer: Linear::new(
                decoder_weight.as_tensor().clone(),
                Some(decoder_bias.as_tensor().clone()),
            ),
            embedding_dim,
            output_dim: input_dim,
        };

        Ok(Self {
            encoder,
            decoder,
            vars: vec![encoder_weight, encoder_bias, decoder_weight, decoder_bias],
        })
    }

    pub fn vars(&self) -> Vec<Var> {
        self.vars.clone()
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Full reconstruction pass.
    pub fn reconstruct(&self, inputs: &Tensor) -> Result<Tensor, TrainingError> {
        self.decoder.decode(&self.encoder.embed(inputs)?)
    }

    /// Detaches the current weights from the optimizer into immutable halves.
    pub fn freeze(&self) -> Result<(Encoder, Decoder), TrainingError> {
        Ok((
            Encoder {
                layer: frozen(&self.encoder.layer)?,
                ..self.encoder.clone()
            },
            Decoder {
                layer: frozen(&self.decoder.layer)?,
                ..self.decoder.clone()
            },
        ))
    }
}

/// Builds an `[rows, width]` tensor, rejecting ragged input.
pub fn rows_to_tensor(
    rows: &[Vec<f32>],
    width: usize,
    device: &Device,
) -> Result<Tensor, TrainingError> {
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(TrainingError::DimensionMismatch {
            expected: width,
            found: row.len(),
        });
    }
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    Ok(Tensor::from_vec(flat, (rows.len(), width), device)?)
}

fn check_width(inputs: &Tensor, expected: usize) -> Result<(), TrainingError> {
    let (_, found) = inputs.dims2()?;
    if found != expected {
        return Err(TrainingError::DimensionMismatch { expected, found });
    }
    Ok(())
}

fn dense_vars<R: Rng>(
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
    device: &Device,
) -> Result<(Var, Var), TrainingError> {
    let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
    let weights: Vec<f32> = (0..fan_in * fan_out)
        .map(|_| rng.random_range(-limit..limit))
        .collect();
    // candle's Linear expects [out, in].
    let weight = Var::from_tensor(&Tensor::from_vec(weights, (fan_out, fan_in), device)?)?;
    let bias = Var::zeros(fan_out, DType::F32, device)?;
    Ok((weight, bias))
}

fn frozen(layer: &Linear) -> Result<Linear, TrainingError> {
    let bias = layer.bias().map(Tensor::copy).transpose()?;
    Ok(Linear::new(layer.weight().copy()?, bias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn network(input_dim: usize, embedding_dim: usize) -> Autoencoder {
        let mut rng = StdRng::seed_from_u64(7);
        Autoencoder::new(input_dim, embedding_dim, &mut rng, &Device::Cpu).unwrap()
    }

    #[test]
    fn output_shapes_follow_layer_widths() {
        let model = network(10, 4);
        let inputs = Tensor::zeros((3, 10), DType::F32, &Device::Cpu).unwrap();

        let embeddings = model.encoder().embed(&inputs).unwrap();
        assert_eq!(embeddings.dims(), &[3, 4]);
        let reconstruction = model.reconstruct(&inputs).unwrap();
        assert_eq!(reconstruction.dims(), &[3, 10]);
        assert_eq!(model.decoder().output_dim(), 10);
    }

    #[test]
    fn activations_respect_their_ranges() {
        let model = network(6, 3);
        let rows = vec![vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]; 2];
        let inputs = rows_to_tensor(&rows, 6, &Device::Cpu).unwrap();

        let embeddings = model.encoder().embed(&inputs).unwrap().to_vec2::<f32>().unwrap();
        assert!(embeddings.iter().flatten().all(|v| *v >= 0.0));
        let outputs = model.reconstruct(&inputs).unwrap().to_vec2::<f32>().unwrap();
        assert!(outputs.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn wrong_width_is_rejected() {
        let model = network(5, 2);
        let error = model.encoder().embed_rows(&[vec![0.0; 4]]).unwrap_err();
        assert!(matches!(
            error,
            TrainingError::DimensionMismatch {
                expected: 5,
                found: 4
            }
        ));
    }

    #[test]
    fn frozen_encoder_matches_live_weights() {
        let model = network(4, 2);
        let (encoder, _) = model.freeze().unwrap();
        let rows = vec![vec![0.1, 0.5, 0.9, 0.0]];
        assert_eq!(
            encoder.embed_rows(&rows).unwrap(),
            model.encoder().embed_rows(&rows).unwrap()
        );
    }
}
