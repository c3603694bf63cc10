use crate::error::{ClusterError, Result};

/// Squared L2 distance between two equal-length points.
#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Rejects empty, ragged or non-finite point sets.
pub(crate) fn check_points(data: &[Vec<f32>]) -> Result<usize> {
    let first = data.first().ok_or(ClusterError::EmptyInput)?;
    let dim = first.len();
    if dim == 0 {
        return Err(ClusterError::InvalidParameter {
            name: "data",
            message: "points must have at least one dimension",
        });
    }
    for (row, point) in data.iter().enumerate() {
        if point.len() != dim {
            return Err(ClusterError::DimensionMismatch {
                expected: dim,
                found: point.len(),
            });
        }
        if point.iter().any(|value| !value.is_finite()) {
            return Err(ClusterError::NonFinite { row });
        }
    }
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0.0, 3.0], &[4.0, 0.0], 25.0)]
    #[case(&[1.0, 1.0], &[1.0, 1.0], 0.0)]
    #[case(&[-1.0], &[2.0], 9.0)]
    fn squared_distance_matches_hand_computation(
        #[case] a: &[f32],
        #[case] b: &[f32],
        #[case] expected: f32,
    ) {
        assert_eq!(squared_euclidean(a, b), expected);
    }

    #[test]
    fn ragged_points_are_rejected() {
        let error = check_points(&[vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            error,
            ClusterError::DimensionMismatch {
                expected: 2,
                found: 1
            }
        ));
        assert!(matches!(
            check_points(&[vec![]]),
            Err(ClusterError::InvalidParameter { name: "data", .. })
        ));
        assert_eq!(check_points(&[vec![1.0, 2.0, 3.0]]).unwrap(), 3);
    }
}
