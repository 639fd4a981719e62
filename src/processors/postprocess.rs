//! Post-processing of classification outputs.

/// Applies a numerically stable softmax to a score vector.
///
/// The maximum is subtracted before exponentiation so large logits do not
/// overflow. An empty input produces an empty output.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Ranks class indices by descending score.
///
/// Returns `(index, score)` pairs for the top `k` classes. `k` is clamped to
/// the number of classes; ties keep the original index order.
pub fn rank_classes(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    indexed.truncate(k.min(scores.len()));
    indexed
}
