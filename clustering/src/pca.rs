//! Principal component projection by power iteration on the covariance matrix.
//!
//! The covariance is formed with candle (`X^T X / n` over the centred rows); the
//! leading eigenvectors are then extracted one at a time, deflating the matrix
//! and re-orthogonalising against earlier components after each step. Each
//! component is sign-normalised so its largest-magnitude coordinate is positive,
//! which keeps projections stable across runs for a fixed seed.

use candle_core::{DType, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ClusterError, Result};

/// PCA configuration.
#[derive(Clone, Debug)]
pub struct Pca {
    n_components: usize,
    seed: u64,
    max_iter: usize,
    tolerance: f64,
}

/// Fitted projection.
#[derive(Clone, Debug, PartialEq)]
pub struct PcaFit {
    mean: Vec<f64>,
    /// Row `i` is the `i`-th principal axis.
    components: Vec<Vec<f64>>,
    eigenvalues: Vec<f64>,
    total_variance: f64,
}

impl Default for Pca {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Pca {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            seed: 42,
            max_iter: 1000,
            tolerance: 1e-10,
        }
    }

    /// Seeds the power-iteration start vectors.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn fit(&self, embeddings: &Tensor) -> Result<PcaFit> {
        let (rows, dim) = embeddings.dims2()?;
        if rows == 0 {
            return Err(ClusterError::EmptyInput);
        }
        if self.n_components == 0 || self.n_components > dim {
            return Err(ClusterError::InvalidParameter {
                name: "n_components",
                message: "must be between 1 and the embedding dimension",
            });
        }

        let data = embeddings.to_dtype(DType::F64)?;
        check_finite(&data)?;
        let mean = data.mean_keepdim(0)?;
        let centered = data.broadcast_sub(&mean)?;
        let covariance = centered
            .t()?
            .contiguous()?
            .matmul(&centered)?
            .affine(1.0 / rows as f64, 0.0)?;
        let mut matrix = covariance.to_vec2::<f64>()?;
        let total_variance = (0..dim).map(|i| matrix[i][i]).sum();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut components: Vec<Vec<f64>> = Vec::with_capacity(self.n_components);
        let mut eigenvalues = Vec::with_capacity(self.n_components);
        for _ in 0..self.n_components {
            let mut axis = self.leading_eigenvector(&matrix, &components, &mut rng);
            canonicalize_sign(&mut axis);
            let eigenvalue = rayleigh_quotient(&matrix, &axis).max(0.0);
            deflate(&mut matrix, &axis, eigenvalue);
            components.push(axis);
            eigenvalues.push(eigenvalue);
        }

        Ok(PcaFit {
            mean: mean.flatten_all()?.to_vec1::<f64>()?,
            components,
            eigenvalues,
            total_variance,
        })
    }

    /// Fits on `embeddings` and projects the same rows.
    pub fn fit_transform(&self, embeddings: &Tensor) -> Result<Vec<Vec<f32>>> {
        self.fit(embeddings)?.transform(embeddings)
    }

    fn leading_eigenvector(
        &self,
        matrix: &[Vec<f64>],
        previous: &[Vec<f64>],
        rng: &mut StdRng,
    ) -> Vec<f64> {
        let dim = matrix.len();
        let mut vector: Vec<f64> = (0..dim).map(|_| rng.random::<f64>() - 0.5).collect();
        orthogonalize(&mut vector, previous);
        if !normalize(&mut vector) {
            vector = fallback_axis(dim, previous);
        }

        for _ in 0..self.max_iter {
            let mut next = multiply(matrix, &vector);
            orthogonalize(&mut next, previous);
            if !normalize(&mut next) {
                // No variance left outside the earlier components.
                break;
            }
            let change = 1.0 - dot(&next, &vector).abs();
            vector = next;
            if change < self.tolerance {
                break;
            }
        }
        vector
    }
}

impl PcaFit {
    /// Projects rows onto the fitted axes.
    pub fn transform(&self, embeddings: &Tensor) -> Result<Vec<Vec<f32>>> {
        let (_, dim) = embeddings.dims2()?;
        if dim != self.mean.len() {
            return Err(ClusterError::DimensionMismatch {
                expected: self.mean.len(),
                found: dim,
            });
        }
        let device = embeddings.device();
        let mean = Tensor::from_vec(self.mean.clone(), (1, dim), device)?;
        let axes: Vec<f64> = self.components.iter().flatten().copied().collect();
        let axes = Tensor::from_vec(axes, (self.components.len(), dim), device)?;

        let projected = embeddings
            .to_dtype(DType::F64)?
            .broadcast_sub(&mean)?
            .matmul(&axes.t()?.contiguous()?)?;
        Ok(projected.to_dtype(DType::F32)?.to_vec2::<f32>()?)
    }

    pub fn components(&self) -> &[Vec<f64>] {
        &self.components
    }

    /// Variance captured by each component, in descending order.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Share of total variance captured by each component; zeros when the input has no variance.
    pub fn explained_variance_ratio(&self) -> Vec<f64> {
        if self.total_variance <= 0.0 {
            return vec![0.0; self.eigenvalues.len()];
        }
        self.eigenvalues
            .iter()
            .map(|value| value / self.total_variance)
            .collect()
    }
}

fn check_finite(data: &Tensor) -> Result<()> {
    for (row, values) in data.to_vec2::<f64>()?.iter().enumerate() {
        if values.iter().any(|value| !value.is_finite()) {
            return Err(ClusterError::NonFinite { row });
        }
    }
    Ok(())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn multiply(matrix: &[Vec<f64>], vector: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| dot(row, vector)).collect()
}

fn normalize(vector: &mut [f64]) -> bool {
    let norm = dot(vector, vector).sqrt();
    if norm < 1e-12 {
        return false;
    }
    vector.iter_mut().for_each(|value| *value /= norm);
    true
}

fn orthogonalize(vector: &mut [f64], basis: &[Vec<f64>]) {
    for axis in basis {
        let overlap = dot(vector, axis);
        for (value, a) in vector.iter_mut().zip(axis) {
            *value -= overlap * a;
        }
    }
}

/// First standard basis vector with a non-zero residual after orthogonalisation.
fn fallback_axis(dim: usize, previous: &[Vec<f64>]) -> Vec<f64> {
    for index in 0..dim {
        let mut axis = vec![0.0; dim];
        axis[index] = 1.0;
        orthogonalize(&mut axis, previous);
        if normalize(&mut axis) {
            return axis;
        }
    }
    vec![0.0; dim]
}

fn rayleigh_quotient(matrix: &[Vec<f64>], vector: &[f64]) -> f64 {
    dot(vector, &multiply(matrix, vector))
}

fn deflate(matrix: &mut [Vec<f64>], axis: &[f64], eigenvalue: f64) {
    for (i, row) in matrix.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value -= eigenvalue * axis[i] * axis[j];
        }
    }
}

fn canonicalize_sign(axis: &mut [f64]) {
    let pivot = axis
        .iter()
        .copied()
        .fold(0.0f64, |best, value| if value.abs() > best.abs() { value } else { best });
    if pivot < 0.0 {
        axis.iter_mut().for_each(|value| *value = -*value);
    }
}
