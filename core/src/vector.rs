use crate::{Error, Result};

/// L2 norm of a dense vector.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|c| c * c).sum::<f64>().sqrt()
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "dot product of vectors with different lengths");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `dot(a, b) / (|a| * |b|)`. Fails when either vector has a zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return Err(Error::DegenerateVector);
    }
    Ok(dot(a, b) / denom)
}

/// Sparse view over a dense vector: (dimension, value) for every non-zero coordinate.
pub fn non_zero_components(v: &[f64]) -> impl Iterator<Item = (usize, f64)> + '_ {
    v.iter().enumerate().filter(|(_, c)| **c != 0.0).map(|(j, c)| (j, *c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_of_3_4_is_5() {
        assert!((norm(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn self_similarity_is_one() {
        let v = [0.2, 0.0, 1.7, 3.1];
        let s = cosine_similarity(&v, &v).unwrap();
        assert!((s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let s = cosine_similarity(&[1.0, 0.0], &[0.0, 2.0]).unwrap();
        assert_eq!(s, 0.0);
    }

    #[test]
    fn zero_vector_is_degenerate() {
        let err = cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::DegenerateVector));
    }

    #[test]
    fn sparse_view_skips_zeros() {
        let nz: Vec<_> = non_zero_components(&[0.0, 1.5, 0.0, -2.0]).collect();
        assert_eq!(nz, vec![(1, 1.5), (3, -2.0)]);
    }
}
