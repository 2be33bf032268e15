/// Column standardization for the clustering feature matrix.
///
/// Euclidean distance treats every unit the same, so the stop-id and
/// average-load columns are both shifted to zero mean and divided by
/// their standard deviation before any distance is computed. The
/// per-column parameters are returned alongside the matrix so a run
/// can be audited against the batch that produced it.

use crate::model::{
    FeatureMatrix, FeatureRow, PipelineError, ScalerParams, StopSummary, FEATURE_COLUMNS,
};

/// Standardize `[stop_id, avg_passengers]` per column across the batch.
///
/// Uses the population standard deviation. A column with zero variance
/// maps to all zeros rather than dividing by zero. An empty batch is
/// an `EmptyData` error since there is nothing to fit parameters to.
pub fn scale(summaries: &[StopSummary]) -> Result<(FeatureMatrix, ScalerParams), PipelineError> {
    if summaries.is_empty() {
        return Err(PipelineError::EmptyData(
            "no stop summaries to scale".to_string(),
        ));
    }

    let raw: Vec<FeatureRow> = summaries
        .iter()
        .map(|s| [s.stop_id as f64, s.avg_passengers])
        .collect();

    let n = raw.len() as f64;
    let mut mean = [0.0; FEATURE_COLUMNS];
    let mut std_dev = [0.0; FEATURE_COLUMNS];

    for col in 0..FEATURE_COLUMNS {
        let sum: f64 = raw.iter().map(|row| row[col]).sum();
        mean[col] = sum / n;
        let var: f64 = raw
            .iter()
            .map(|row| {
                let d = row[col] - mean[col];
                d * d
            })
            .sum::<f64>()
            / n;
        std_dev[col] = var.sqrt();
    }

    let scaled: FeatureMatrix = raw
        .iter()
        .map(|row| {
            let mut out = [0.0; FEATURE_COLUMNS];
            for col in 0..FEATURE_COLUMNS {
                if std_dev[col] > 0.0 {
                    out[col] = (row[col] - mean[col]) / std_dev[col];
                }
            }
            out
        })
        .collect();

    Ok((scaled, ScalerParams { mean, std_dev }))
}

// =============================================================================
// Tests
// =============================================================================
