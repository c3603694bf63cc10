//! Lloyd's k-means with k-means++ seeding and farthest-point re-seeding of empty clusters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{ClusterError, Result};
use crate::traits::Clustering;
use crate::util::{check_points, squared_euclidean};

/// K-means configuration.
///
/// Seeding is k-means++ driven by a `StdRng` seeded from `seed`, so identical
/// inputs and settings always produce identical labels.
#[derive(Clone, Debug)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    seed: u64,
    reseed_budget: usize,
}

/// Outcome of a k-means run.
#[derive(Clone, Debug, PartialEq)]
pub struct KmeansFit {
    /// Cluster index per input point, in `0..k`.
    pub labels: Vec<usize>,
    /// Final centroid per cluster.
    pub centroids: Vec<Vec<f32>>,
    /// Lloyd iterations executed.
    pub iterations: usize,
    /// Empty clusters repaired by moving a point into them.
    pub reseeds: usize,
}

impl KmeansFit {
    /// Number of points assigned to each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

impl Kmeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            seed: 42,
            reseed_budget: 8,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Failed re-seed attempts tolerated before reporting [`ClusterError::Degenerate`].
    pub fn with_reseed_budget(mut self, budget: usize) -> Self {
        self.reseed_budget = budget;
        self
    }

    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        if self.k == 0 {
            return Err(ClusterError::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(ClusterError::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        check_points(data)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = kmeans_plus_plus(data, self.k, &mut rng);
        let mut labels: Vec<usize> = Vec::new();
        let mut failures = 0usize;
        let mut reseeds = 0usize;
        let mut iterations = 0usize;

        for _ in 0..self.max_iter {
            iterations += 1;
            let mut next = assign(data, &centroids);

            let mut repaired = false;
            let mut sizes = sizes_of(&next, self.k);
            while let Some(empty) = sizes.iter().position(|&size| size == 0) {
                match farthest_movable(data, &centroids, &next, &sizes) {
                    Some(index) => {
                        sizes[next[index]] -= 1;
                        sizes[empty] += 1;
                        next[index] = empty;
                        centroids[empty] = data[index].clone();
                        reseeds += 1;
                        repaired = true;
                    }
                    None => {
                        failures += 1;
                        if failures > self.reseed_budget {
                            return Err(ClusterError::Degenerate {
                                requested: self.k,
                                attempts: failures,
                            });
                        }
                        break;
                    }
                }
            }

            let complete = sizes.iter().all(|&size| size > 0);
            let converged = complete && !repaired && next == labels;
            labels = next;
            update_centroids(data, &labels, &mut centroids);
            if converged {
                break;
            }
        }

        if sizes_of(&labels, self.k).contains(&0) {
            return Err(ClusterError::Degenerate {
                requested: self.k,
                attempts: failures,
            });
        }

        debug!(k = self.k, iterations, reseeds, "k-means finished");
        Ok(KmeansFit {
            labels,
            centroids,
            iterations,
            reseeds,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn kmeans_plus_plus(data: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let first = rng.random_range(0..data.len());
    let mut centroids = vec![data[first].clone()];
    let mut nearest: Vec<f32> = data
        .iter()
        .map(|point| squared_euclidean(point, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().map(|&d| d as f64).sum();
        let chosen = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = None;
            for (index, &d) in nearest.iter().enumerate() {
                if d <= 0.0 {
                    continue;
                }
                chosen = Some(index);
                target -= d as f64;
                if target < 0.0 {
                    break;
                }
            }
            chosen.unwrap_or(first)
        } else {
            // Every point coincides with a centroid; the duplicate is repaired or
            // reported as degenerate by the Lloyd loop.
            first
        };

        let centroid = data[chosen].clone();
        for (distance, point) in nearest.iter_mut().zip(data) {
            *distance = distance.min(squared_euclidean(point, &centroid));
        }
        centroids.push(centroid);
    }
    centroids
}

fn assign(data: &[Vec<f32>], centroids: &[Vec<f32>]) -> Vec<usize> {
    data.iter()
        .map(|point| {
            let mut best = 0;
            let mut best_distance = f32::INFINITY;
            for (index, centroid) in centroids.iter().enumerate() {
                let distance = squared_euclidean(point, centroid);
                if distance < best_distance {
                    best = index;
                    best_distance = distance;
                }
            }
            best
        })
        .collect()
}

fn sizes_of(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &label in labels {
        sizes[label] += 1;
    }
    sizes
}

/// Point farthest from its centroid among clusters that can spare a member.
fn farthest_movable(
    data: &[Vec<f32>],
    centroids: &[Vec<f32>],
    labels: &[usize],
    sizes: &[usize],
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, point) in data.iter().enumerate() {
        let label = labels[index];
        if sizes[label] < 2 {
            continue;
        }
        let distance = squared_euclidean(point, &centroids[label]);
        if distance > 0.0 && best.is_none_or(|(_, current)| distance > current) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

fn update_centroids(data: &[Vec<f32>], labels: &[usize], centroids: &mut [Vec<f32>]) {
    let dim = data[0].len();
    let mut sums = vec![vec![0.0f64; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];
    for (point, &label) in data.iter().zip(labels) {
        counts[label] += 1;
        for (sum, &value) in sums[label].iter_mut().zip(point) {
            *sum += value as f64;
        }
    }
    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count == 0 {
            continue;
        }
        *centroid = sum.into_iter().map(|s| (s / count as f64) as f32).collect();
    }
}
