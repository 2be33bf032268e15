/// Seeded k-means fitting on standardized features.
///
/// Centers are initialized with the k-means++ weighting and refined by
/// Lloyd iterations until the largest centroid shift falls within the
/// configured tolerance or the iteration cap is hit. All randomness
/// comes from a ChaCha8 stream seeded from the pipeline config, so a
/// given batch and config always produce the same assignment.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::PipelineConfig;
use crate::model::{FeatureRow, PipelineError, FEATURE_COLUMNS};

/// Outcome of a single k-means fit.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster index per input row, each in `0..k`.
    pub labels: Vec<usize>,
    /// Final cluster centers in feature space.
    pub centroids: Vec<FeatureRow>,
    /// Sum of squared distances from each row to its assigned center.
    pub inertia: f64,
    /// Lloyd iterations actually run.
    pub iterations: usize,
    /// Whether the centers settled within tolerance before the cap.
    pub converged: bool,
}

/// Fit `k` clusters to the feature matrix.
///
/// Fails with `EmptyData` on an empty matrix and `DegenerateInput`
/// when `k` is zero or exceeds the number of rows or distinct rows;
/// duplicated rows cannot anchor separate clusters.
pub fn fit(
    features: &[FeatureRow],
    k: usize,
    config: &PipelineConfig,
) -> Result<KMeansFit, PipelineError> {
    if features.is_empty() {
        return Err(PipelineError::EmptyData(
            "no feature rows to cluster".to_string(),
        ));
    }
    if k == 0 {
        return Err(PipelineError::DegenerateInput(
            "cluster count must be at least 1".to_string(),
        ));
    }
    if k > features.len() {
        return Err(PipelineError::DegenerateInput(format!(
            "cannot form {} clusters from {} rows",
            k,
            features.len()
        )));
    }
    let distinct = distinct_rows(features);
    if k > distinct {
        return Err(PipelineError::DegenerateInput(format!(
            "cannot form {} clusters from {} distinct rows",
            k, distinct
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut centroids = init_centroids(features, k, &mut rng);
    let mut labels = assign_labels(features, &centroids);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;
        let mut next = mean_centroids(features, &labels, k);
        reseed_empty(&mut next, features, &labels);

        let shift = centroids
            .iter()
            .zip(next.iter())
            .map(|(old, new)| squared_distance(old, new))
            .fold(0.0, f64::max);

        centroids = next;
        labels = assign_labels(features, &centroids);

        if shift <= config.tolerance {
            converged = true;
            break;
        }
    }

    let inertia = features
        .iter()
        .zip(labels.iter())
        .map(|(row, &label)| squared_distance(row, &centroids[label]))
        .sum();

    Ok(KMeansFit {
        labels,
        centroids,
        inertia,
        iterations,
        converged,
    })
}

/// Count distinct rows by bit pattern. Inputs here are always finite,
/// so bitwise equality matches numeric equality once negative zero is
/// normalized.
pub(crate) fn distinct_rows(features: &[FeatureRow]) -> usize {
    let mut seen: HashSet<[u64; FEATURE_COLUMNS]> = HashSet::with_capacity(features.len());
    for row in features {
        let mut bits = [0u64; FEATURE_COLUMNS];
        for col in 0..FEATURE_COLUMNS {
            let v = if row[col] == 0.0 { 0.0 } else { row[col] };
            bits[col] = v.to_bits();
        }
        seen.insert(bits);
    }
    seen.len()
}

pub(crate) fn squared_distance(a: &FeatureRow, b: &FeatureRow) -> f64 {
    let mut sum = 0.0;
    for col in 0..FEATURE_COLUMNS {
        let d = a[col] - b[col];
        sum += d * d;
    }
    sum
}

// -----------------------------------------------------------------------------
// Lloyd internals
// -----------------------------------------------------------------------------

/// k-means++ seeding: the first center is drawn uniformly, each later
/// center with probability proportional to its squared distance from
/// the nearest center already chosen.
fn init_centroids(features: &[FeatureRow], k: usize, rng: &mut ChaCha8Rng) -> Vec<FeatureRow> {
    let n = features.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(features[rng.gen_range(0..n)]);

    let mut min_dist = vec![f64::MAX; n];
    while centroids.len() < k {
        let latest = centroids[centroids.len() - 1];
        for (i, row) in features.iter().enumerate() {
            let d = squared_distance(row, &latest);
            if d < min_dist[i] {
                min_dist[i] = d;
            }
        }
        let total: f64 = min_dist.iter().sum();
        let next = if total > 0.0 {
            weighted_pick(&min_dist, total, rng)
        } else {
            // Unreachable once the distinct-row check has passed.
            0
        };
        centroids.push(features[next]);
    }
    centroids
}

fn weighted_pick(weights: &[f64], total: f64, rng: &mut ChaCha8Rng) -> usize {
    let mut target = rng.gen_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        if target < w {
            return i;
        }
        target -= w;
    }
    // Floating error can leave the target a hair past the last bucket.
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

fn assign_labels(features: &[FeatureRow], centroids: &[FeatureRow]) -> Vec<usize> {
    features
        .iter()
        .map(|row| nearest_centroid(row, centroids))
        .collect()
}

/// Ties resolve to the lowest center index.
fn nearest_centroid(row: &FeatureRow, centroids: &[FeatureRow]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(row, centroid);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn mean_centroids(features: &[FeatureRow], labels: &[usize], k: usize) -> Vec<FeatureRow> {
    let mut sums = vec![[0.0; FEATURE_COLUMNS]; k];
    let mut counts = vec![0usize; k];
    for (row, &label) in features.iter().zip(labels.iter()) {
        for col in 0..FEATURE_COLUMNS {
            sums[label][col] += row[col];
        }
        counts[label] += 1;
    }
    for (sum, &count) in sums.iter_mut().zip(counts.iter()) {
        if count > 0 {
            for col in 0..FEATURE_COLUMNS {
                sum[col] /= count as f64;
            }
        }
    }
    sums
}

/// Re-seed clusters that lost every member to the row currently worst
/// served by its own center. Rows are scanned in order and each
/// reseed claims a different row, so the repair is deterministic.
fn reseed_empty(centroids: &mut [FeatureRow], features: &[FeatureRow], labels: &[usize]) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &label in labels {
        counts[label] += 1;
    }

    let mut claimed = vec![false; features.len()];
    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }
        let mut worst = 0;
        let mut worst_dist = -1.0;
        for (i, row) in features.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            let d = squared_distance(row, &centroids[labels[i]]);
            if d > worst_dist {
                worst_dist = d;
                worst = i;
            }
        }
        centroids[cluster] = features[worst];
        claimed[worst] = true;
    }
}

// =============================================================================
// Tests
// =============================================================================
