// Tree-building helpers
//
// Split search works on index subsets of the full feature matrix instead
// of copying sub-matrices per node. Candidate thresholds are midpoints
// between consecutive distinct sorted values; impurity is Gini, evaluated
// with running class counts in a single sorted scan per feature.

use ndarray::ArrayView2;

/// Gini impurity of a binary label multiset given as per-class counts.
pub(super) fn gini_from_counts(counts: [usize; 2]) -> f32 {
    let total = counts[0] + counts[1];
    if total == 0 {
        return 0.0;
    }
    let n = total as f32;
    let p0 = counts[0] as f32 / n;
    let p1 = counts[1] as f32 / n;
    1.0 - p0 * p0 - p1 * p1
}

/// Count labels per class over an index subset.
pub(super) fn class_counts(y: &[usize], indices: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &idx in indices {
        counts[y[idx]] += 1;
    }
    counts
}

/// Majority label, breaking ties toward the lower label for determinism.
pub(super) fn majority_label(counts: [usize; 2]) -> usize {
    usize::from(counts[1] > counts[0])
}

/// Best (feature, threshold) over all features for the given index subset,
/// or `None` when no split improves on the parent impurity.
pub(super) fn best_split(
    x: &ArrayView2<'_, f32>,
    y: &[usize],
    indices: &[usize],
) -> Option<(usize, f32)> {
    let n = indices.len();
    if n < 2 {
        return None;
    }

    let parent_counts = class_counts(y, indices);
    let parent_gini = gini_from_counts(parent_counts);
    let n_total = n as f32;

    let mut best_gain = 0.0f32;
    let mut best: Option<(usize, f32)> = None;

    let mut column: Vec<(f32, usize)> = Vec::with_capacity(n);
    for feature in 0..x.ncols() {
        column.clear();
        column.extend(indices.iter().map(|&idx| (x[[idx, feature]], y[idx])));
        column.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite feature values"));

        // Scan left-to-right, moving one sample at a time into the left side
        let mut left = [0usize; 2];
        let mut right = parent_counts;

        for i in 0..n - 1 {
            let (value, label) = column[i];
            left[label] += 1;
            right[label] -= 1;

            let next_value = column[i + 1].0;
            if next_value <= value {
                // Not a boundary between distinct values
                continue;
            }

            let n_left = (i + 1) as f32;
            let n_right = n_total - n_left;
            let weighted = (n_left / n_total) * gini_from_counts(left)
                + (n_right / n_total) * gini_from_counts(right);
            let gain = parent_gini - weighted;

            if gain > best_gain {
                best_gain = gain;
                best = Some((feature, (value + next_value) / 2.0));
            }
        }
    }

    best
}

/// Partition an index subset by `feature <= threshold`.
pub(super) fn partition_indices(
    x: &ArrayView2<'_, f32>,
    indices: &[usize],
    feature: usize,
    threshold: f32,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &idx in indices {
        if x[[idx, feature]] <= threshold {
            left.push(idx);
        } else {
            right.push(idx);
        }
    }
    (left, right)
}
