/// Silhouette scoring for cluster assignments.
///
/// For each row the coefficient compares the mean distance to its own
/// cluster (cohesion) against the mean distance to the nearest other
/// cluster (separation): `s = (b - a) / max(a, b)`. The batch score is
/// the mean coefficient, in `[-1, 1]`, higher meaning tighter and
/// better separated clusters. Rows that sit alone in a cluster have no
/// cohesion term and contribute a coefficient of zero.

use crate::analysis::kmeans::squared_distance;
use crate::model::{FeatureRow, PipelineError};

/// Mean silhouette coefficient over the batch.
///
/// Needs at least two populated clusters and at least one cluster with
/// more than one member; anything else is `DegenerateInput`. Label
/// values themselves are arbitrary, only their grouping matters.
pub fn silhouette_score(features: &[FeatureRow], labels: &[usize]) -> Result<f64, PipelineError> {
    let n = features.len();
    if n == 0 {
        return Err(PipelineError::EmptyData(
            "no feature rows to score".to_string(),
        ));
    }
    if labels.len() != n {
        return Err(PipelineError::DegenerateInput(format!(
            "{} labels for {} rows",
            labels.len(),
            n
        )));
    }

    let max_label = *labels.iter().max().unwrap_or(&0);
    let mut sizes = vec![0usize; max_label + 1];
    for &label in labels {
        sizes[label] += 1;
    }
    let populated = sizes.iter().filter(|&&s| s > 0).count();
    if populated < 2 {
        return Err(PipelineError::DegenerateInput(format!(
            "silhouette needs at least 2 clusters, found {}",
            populated
        )));
    }
    if populated == n {
        return Err(PipelineError::DegenerateInput(
            "every row is its own cluster".to_string(),
        ));
    }

    // Pairwise distances up front; the per-row pass below reads each
    // pair twice.
    let mut dist = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = squared_distance(&features[i], &features[j]).sqrt();
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }

    let mut sum = 0.0;
    for i in 0..n {
        let own = labels[i];
        if sizes[own] == 1 {
            continue; // coefficient 0
        }

        let mut cluster_sums = vec![0.0; max_label + 1];
        for j in 0..n {
            cluster_sums[labels[j]] += dist[i][j];
        }

        // Self-distance is zero, so dividing by (size - 1) excludes it.
        let a = cluster_sums[own] / (sizes[own] - 1) as f64;
        let mut b = f64::MAX;
        for (label, (&total, &size)) in cluster_sums.iter().zip(sizes.iter()).enumerate() {
            if label != own && size > 0 {
                b = b.min(total / size as f64);
            }
        }

        let denom = a.max(b);
        if denom > 0.0 {
            sum += (b - a) / denom;
        }
    }

    Ok(sum / n as f64)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfectly_separated_pairs_score_one() {
        let rows: Vec<FeatureRow> = vec![[0.0, 0.0], [0.0, 0.0], [10.0, 0.0], [10.0, 0.0]];
        let labels = vec![0, 0, 1, 1];

        let score = silhouette_score(&rows, &labels).expect("score should succeed");
        assert!(
            (score - 1.0).abs() < 1e-12,
            "coincident pairs far apart should score exactly 1, got {}",
            score
        );
    }

    #[test]
    fn test_tight_far_blobs_score_high() {
        let mut rows: Vec<FeatureRow> = Vec::new();
        let mut labels = Vec::new();
        for i in 0..6 {
            rows.push([i as f64 * 0.01, 0.0]);
            labels.push(0);
        }
        for i in 0..6 {
            rows.push([100.0 + i as f64 * 0.01, 0.0]);
            labels.push(1);
        }

        let score = silhouette_score(&rows, &labels).expect("score should succeed");
        assert!(score > 0.9, "separated blobs should score high, got {}", score);
    }

    #[test]
    fn test_singleton_cluster_contributes_zero() {
        // One stop alone in cluster 0, a pair in cluster 1.
        let rows: Vec<FeatureRow> = vec![[0.0, 0.0], [5.0, 0.0], [5.0, 1.0]];
        let labels = vec![0, 1, 1];

        let score = silhouette_score(&rows, &labels).expect("score should succeed");
        let expected = (0.0 + 0.8 + (1.0 - 1.0 / 26.0f64.sqrt())) / 3.0;
        assert!(
            (score - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            score
        );
    }

    #[test]
    fn test_mislabelled_neighbours_score_negative() {
        let rows: Vec<FeatureRow> = vec![[0.0, 0.0], [0.1, 0.0], [10.0, 0.0], [10.1, 0.0]];
        let labels = vec![1, 0, 0, 1];

        let score = silhouette_score(&rows, &labels).expect("score should succeed");
        assert!(score < 0.0, "crossed labels should score negative, got {}", score);
    }

    #[test]
    fn test_label_values_are_arbitrary() {
        let rows: Vec<FeatureRow> = vec![[0.0, 0.0], [0.0, 0.0], [10.0, 0.0], [10.0, 0.0]];
        let sparse = silhouette_score(&rows, &[0, 0, 7, 7]).expect("score should succeed");
        let dense = silhouette_score(&rows, &[0, 0, 1, 1]).expect("score should succeed");
        assert_eq!(sparse, dense, "renumbering labels must not change the score");
    }

    #[test]
    fn test_single_cluster_is_degenerate() {
        let rows: Vec<FeatureRow> = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        let err = silhouette_score(&rows, &[0, 0, 0]).expect_err("one cluster should fail");
        assert!(matches!(err, PipelineError::DegenerateInput(_)));
    }

    #[test]
    fn test_all_singletons_is_degenerate() {
        let rows: Vec<FeatureRow> = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        let err = silhouette_score(&rows, &[0, 1, 2]).expect_err("n clusters should fail");
        assert!(matches!(err, PipelineError::DegenerateInput(_)));
    }

    #[test]
    fn test_label_count_mismatch_is_degenerate() {
        let rows: Vec<FeatureRow> = vec![[0.0, 0.0], [1.0, 0.0]];
        let err = silhouette_score(&rows, &[0]).expect_err("mismatch should fail");
        assert!(matches!(err, PipelineError::DegenerateInput(_)));
    }

    #[test]
    fn test_empty_input_is_empty_data() {
        let err = silhouette_score(&[], &[]).expect_err("empty input should fail");
        assert!(matches!(err, PipelineError::EmptyData(_)));
    }
}
