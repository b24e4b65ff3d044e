//! Shared math utilities for scoring.

/// Numerically stable softmax over a logits row.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|&e| e / sum).collect()
    } else {
        vec![1.0 / logits.len() as f32; logits.len()]
    }
}

/// Normalize scores in place so they sum to 1. Leaves an all-zero slice
/// untouched.
pub fn normalize_in_place(scores: &mut [f32]) {
    let sum: f32 = scores.iter().sum();
    if sum > 0.0 {
        for score in scores.iter_mut() {
            *score /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0, 3.0]);
        let b = softmax(&[1001.0, 1002.0, 1003.0]);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_handles_large_negatives() {
        let probs = softmax(&[-1000.0, 0.0]);
        assert!((probs[1] - 1.0).abs() < 1e-6);
        assert!(probs[0] >= 0.0);
    }

    #[test]
    fn test_softmax_empty() {
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn test_normalize_in_place() {
        let mut scores = vec![1.0, 1.0, 2.0];
        normalize_in_place(&mut scores);
        assert!((scores[2] - 0.5).abs() < 1e-6);
        let sum: f32 = scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_all_zero_untouched() {
        let mut scores = vec![0.0, 0.0];
        normalize_in_place(&mut scores);
        assert_eq!(scores, vec![0.0, 0.0]);
    }
}
