/// Density-based assignment for irregular demand shapes.
///
/// Alternative to the k-means path when cluster counts are unknown or
/// the demand bands are not convex. Core points (at least
/// `min_samples` rows within `eps`, the point itself included) grow
/// clusters; rows reachable from no core point are labelled noise.
/// Runs on the same standardized features as the k-means path.

use std::collections::VecDeque;

use crate::analysis::kmeans::squared_distance;
use crate::model::{FeatureRow, PipelineError};

/// Label for rows that belong to no cluster.
pub const NOISE: i32 = -1;

/// Neighborhood radius matched to standardized features.
pub const DEFAULT_EPS: f64 = 0.5;

/// Minimum neighborhood size for a core point.
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// Cluster the batch by density. Returns one label per row: `0..` for
/// clusters in discovery order, `NOISE` for unclaimed rows.
pub fn dbscan(
    features: &[FeatureRow],
    eps: f64,
    min_samples: usize,
) -> Result<Vec<i32>, PipelineError> {
    if features.is_empty() {
        return Err(PipelineError::EmptyData(
            "no feature rows to cluster".to_string(),
        ));
    }
    if !eps.is_finite() || eps <= 0.0 {
        return Err(PipelineError::DegenerateInput(format!(
            "eps must be a positive finite radius, got {}",
            eps
        )));
    }
    if min_samples == 0 {
        return Err(PipelineError::DegenerateInput(
            "min_samples must be at least 1".to_string(),
        ));
    }

    let n = features.len();
    let eps_sq = eps * eps;
    let neighborhoods: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| squared_distance(&features[i], &features[j]) <= eps_sq)
                .collect()
        })
        .collect();

    let mut labels = vec![NOISE; n];
    let mut visited = vec![false; n];
    let mut cluster: i32 = 0;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        if neighborhoods[i].len() < min_samples {
            continue; // noise unless a later cluster claims it as border
        }

        labels[i] = cluster;
        let mut queue: VecDeque<usize> = neighborhoods[i].iter().copied().collect();
        while let Some(j) = queue.pop_front() {
            if labels[j] == NOISE {
                labels[j] = cluster;
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;
            labels[j] = cluster;
            if neighborhoods[j].len() >= min_samples {
                queue.extend(neighborhoods[j].iter().copied());
            }
        }
        cluster += 1;
    }

    Ok(labels)
}

// =============================================================================
// Tests
// =============================================================================
