/// Scales `v` to unit length in place and returns the original norm.
/// A zero vector is left untouched.
pub fn l2_normalize(v: &mut [f32]) -> f32 {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    norm
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Similarity reported for a hit at squared distance `d`.
///
/// For unit vectors cosine is `1 - d/2`; the reranker was tuned against
/// `1 - d`, which is kept as a monotone proxy.
pub fn similarity_from_distance(d: f32) -> f64 {
    1.0 - f64::from(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_and_distance() {
        let mut a = vec![3.0, 4.0];
        assert_eq!(l2_normalize(&mut a), 5.0);
        assert!((a[0] - 0.6).abs() < 1e-6 && (a[1] - 0.8).abs() < 1e-6);
        let mut zero = vec![0.0, 0.0];
        assert_eq!(l2_normalize(&mut zero), 0.0);
        assert_eq!(zero, vec![0.0, 0.0]);
        // Orthogonal unit vectors sit at squared distance 2.
        assert!((squared_l2(&[1.0, 0.0], &[0.0, 1.0]) - 2.0).abs() < 1e-6);
        assert!((similarity_from_distance(2.0) + 1.0).abs() < 1e-9);
    }
}
