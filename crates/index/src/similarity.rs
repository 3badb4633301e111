//! Vector similarity for nearest-neighbor retrieval.

use groundcrew_core::TextChunk;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 =
/// opposite. Returns 0.0 if either vector is zero-length, empty, or the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank indexed chunks by similarity to a query embedding.
///
/// Descending similarity, at most `k` results. The sort is stable, so
/// chunks with equal scores keep their insertion order.
pub fn rank(entries: &[(Vec<f32>, TextChunk)], query: &[f32], k: usize) -> Vec<TextChunk> {
    let mut scored: Vec<(f32, &TextChunk)> = entries
        .iter()
        .map(|(embedding, chunk)| (cosine_similarity(embedding, query), chunk))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored.into_iter().map(|(_, chunk)| chunk.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, seq: usize) -> TextChunk {
        TextChunk::new(text, "test.txt", seq)
    }

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_mismatched_or_zero_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn rank_orders_by_descending_similarity() {
        let entries = vec![
            (vec![0.0, 1.0], chunk("orthogonal", 0)),
            (vec![1.0, 0.0], chunk("identical", 1)),
            (vec![1.0, 1.0], chunk("partial", 2)),
        ];
        let results = rank(&entries, &[1.0, 0.0], 10);
        let texts: Vec<_> = results.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["identical", "partial", "orthogonal"]);
    }

    #[test]
    fn rank_respects_k() {
        let entries: Vec<_> = (0..10)
            .map(|i| (vec![1.0, i as f32 * 0.1], chunk("c", i)))
            .collect();
        assert_eq!(rank(&entries, &[1.0, 0.0], 3).len(), 3);
    }

    #[test]
    fn rank_is_stable_on_ties() {
        let entries = vec![
            (vec![1.0, 0.0], chunk("first", 0)),
            (vec![1.0, 0.0], chunk("second", 1)),
        ];
        let results = rank(&entries, &[1.0, 0.0], 2);
        assert_eq!(results[0].text, "first");
        assert_eq!(results[1].text, "second");
    }
}
