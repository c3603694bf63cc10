use candle_core::{Device, Tensor};
use clustering::{ClusterError, Clustering, Kmeans, Pca};
use proptest::prelude::*;

fn distinct_points(data: &[Vec<f32>]) -> usize {
    let mut seen: Vec<&Vec<f32>> = Vec::new();
    for point in data {
        if !seen.contains(&point) {
            seen.push(point);
        }
    }
    seen.len()
}

proptest! {
    #[test]
    fn prop_kmeans_labels_cover_every_cluster(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..30),
        k in 1usize..5
    ) {
        if k <= data.len() {
            match Kmeans::new(k).with_seed(42).fit_predict(&data) {
                Ok(labels) => {
                    prop_assert_eq!(labels.len(), data.len());
                    for cluster in 0..k {
                        prop_assert!(labels.contains(&cluster));
                    }
                }
                Err(ClusterError::Degenerate { .. }) => {
                    prop_assert!(distinct_points(&data) < k);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn prop_pca_projects_every_row_to_two_finite_coordinates(
        data in prop::collection::vec(prop::collection::vec(-5.0f32..5.0, 4), 1..25)
    ) {
        let flat: Vec<f32> = data.iter().flatten().copied().collect();
        let tensor = Tensor::from_vec(flat, (data.len(), 4), &Device::Cpu).unwrap();
        let projected = Pca::new(2).fit_transform(&tensor).unwrap();

        prop_assert_eq!(projected.len(), data.len());
        for point in &projected {
            prop_assert_eq!(point.len(), 2);
            prop_assert!(point.iter().all(|v| v.is_finite()));
        }
    }
}
