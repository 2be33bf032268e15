/// Quality score and per-cluster statistics for a finished assignment.
///
/// Works from the labelled stops alone: the feature matrix is
/// re-derived by the same standardization the fit used, so the score
/// reflects exactly the geometry the clusterer saw. Statistics follow
/// the reporting convention of the demand dashboards: the cluster
/// average is the mean of its stops' averages, the cluster total the
/// sum of their totals.

use std::collections::BTreeMap;

use crate::analysis::scaling::scale;
use crate::analysis::silhouette::silhouette_score;
use crate::model::{ClusterStats, ClusteredStop, PipelineError, StopSummary};

/// Score the assignment and summarize each cluster.
///
/// Returns the batch silhouette score and one `ClusterStats` entry per
/// populated cluster, sorted by cluster id. Fails with `EmptyData` on
/// an empty batch and `DegenerateInput` when fewer than two clusters
/// are populated, since a lone cluster has no separation to measure.
pub fn evaluate(clustered: &[ClusteredStop]) -> Result<(f64, Vec<ClusterStats>), PipelineError> {
    if clustered.is_empty() {
        return Err(PipelineError::EmptyData(
            "no clustered stops to evaluate".to_string(),
        ));
    }

    let mut distinct: Vec<usize> = clustered.iter().map(|c| c.cluster).collect();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 2 {
        return Err(PipelineError::DegenerateInput(format!(
            "evaluation needs at least 2 clusters, found {}",
            distinct.len()
        )));
    }

    let summaries: Vec<StopSummary> = clustered
        .iter()
        .map(|c| StopSummary {
            stop_id: c.stop_id,
            avg_passengers: c.avg_passengers,
            total_passengers: c.total_passengers,
        })
        .collect();
    let (features, _params) = scale(&summaries)?;
    let labels: Vec<usize> = clustered.iter().map(|c| c.cluster).collect();
    let score = silhouette_score(&features, &labels)?;

    let mut groups: BTreeMap<usize, (usize, f64, f64)> = BTreeMap::new();
    for stop in clustered {
        let entry = groups.entry(stop.cluster).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += stop.avg_passengers;
        entry.2 += stop.total_passengers;
    }

    let stats = groups
        .into_iter()
        .map(|(cluster, (count, avg_sum, total_sum))| ClusterStats {
            cluster,
            count,
            avg_passengers: avg_sum / count as f64,
            total_passengers: total_sum,
        })
        .collect();

    Ok((score, stats))
}

// =============================================================================
// Tests
// =============================================================================
