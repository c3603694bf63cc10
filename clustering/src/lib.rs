//! Projection and clustering of embedding vectors.
//!
//! - [`Pca`]: power-iteration principal components on candle tensors.
//! - [`Kmeans`]: Lloyd's algorithm with k-means++ seeding.

pub mod error;
pub mod kmeans;
pub mod pca;
pub mod traits;
pub mod util;

pub use error::{ClusterError, Result};
pub use kmeans::{Kmeans, KmeansFit};
pub use pca::{Pca, PcaFit};
pub use traits::Clustering;
pub use util::squared_euclidean;
