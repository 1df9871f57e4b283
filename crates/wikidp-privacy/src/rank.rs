//! Re-ranking of noised counts.

/// Assign ranks `1..=N` by descending count.
///
/// Equal counts keep their input order (the sort is stable), so the
/// ground-truth order breaks ties. `ranks[i]` is the rank of `counts[i]`.
pub fn rerank(counts: &[u64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

    let mut ranks = vec![0u32; counts.len()];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = position as u32 + 1;
    }
    ranks
}
