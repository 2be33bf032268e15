/// Candidate scan and final cluster assignment.
///
/// `select_k` fits every candidate cluster count in the configured
/// range against the scaled batch, scores each fit with the silhouette
/// coefficient, and keeps the best. `cluster` then runs the final fit
/// at a chosen count and pairs each stop summary with its label. Both
/// seed their own RNG from the config, so selecting at `k` and then
/// clustering at `k` reproduce the same assignment.

use crate::analysis::kmeans::{self, distinct_rows};
use crate::analysis::scaling::scale;
use crate::analysis::silhouette::silhouette_score;
use crate::config::PipelineConfig;
use crate::logging::{self, Stage};
use crate::model::{ClusteredStop, FeatureRow, KSelection, PipelineError, StopSummary};

/// Scan the configured k range and pick the silhouette-best count.
///
/// Candidates that cannot produce a scoreable fit are skipped: a count
/// must be below the row count (otherwise every stop is its own
/// cluster) and at most the distinct-row count. Skips are logged, not
/// fatal; a scan with no viable candidate at all is `DegenerateInput`.
pub fn select_k(
    features: &[FeatureRow],
    config: &PipelineConfig,
) -> Result<KSelection, PipelineError> {
    config.validate().map_err(PipelineError::DegenerateInput)?;

    if features.is_empty() {
        return Err(PipelineError::EmptyData(
            "no feature rows to scan".to_string(),
        ));
    }
    let distinct = distinct_rows(features);
    if distinct < 2 {
        return Err(PipelineError::DegenerateInput(format!(
            "need at least 2 distinct rows to cluster, found {}",
            distinct
        )));
    }

    let n = features.len();
    let mut scores: Vec<(usize, f64)> = Vec::new();
    let mut skipped: Vec<usize> = Vec::new();

    for k in config.k_range() {
        if k >= n || k > distinct {
            skipped.push(k);
            continue;
        }
        let fit = kmeans::fit(features, k, config)?;
        let score = silhouette_score(features, &fit.labels)?;
        logging::debug(
            Stage::Select,
            Some(&format!("k={}", k)),
            &format!("silhouette {:.4} after {} iterations", score, fit.iterations),
        );
        scores.push((k, score));
    }

    if !skipped.is_empty() {
        logging::warn(
            Stage::Select,
            None,
            &format!(
                "skipped {} candidate(s) {:?}: batch has {} rows, {} distinct",
                skipped.len(),
                skipped,
                n,
                distinct
            ),
        );
    }
    if scores.is_empty() {
        return Err(PipelineError::DegenerateInput(format!(
            "no scannable candidate in {}..{} for a batch of {} rows",
            config.k_min, config.k_max, n
        )));
    }

    let best_k = pick_best(&scores);
    logging::info(
        Stage::Select,
        Some(&format!("k={}", best_k)),
        &format!("selected from {} candidate(s)", scores.len()),
    );

    Ok(KSelection { best_k, scores })
}

/// Run the final fit at `k` and attach labels to the summaries.
///
/// Scaling is re-derived from the summaries so callers hand over plain
/// aggregates, not matrices. `k` normally comes from `select_k` but
/// any count the batch supports is accepted.
pub fn cluster(
    summaries: &[StopSummary],
    k: usize,
    config: &PipelineConfig,
) -> Result<Vec<ClusteredStop>, PipelineError> {
    if summaries.is_empty() {
        return Err(PipelineError::EmptyData(
            "no stop summaries to cluster".to_string(),
        ));
    }

    let (features, _params) = scale(summaries)?;
    let fit = kmeans::fit(&features, k, config)?;

    Ok(summaries
        .iter()
        .zip(fit.labels.iter())
        .map(|(summary, &label)| ClusteredStop::from_summary(summary, label))
        .collect())
}

/// Highest score wins; on a tie the earliest (lowest) k is kept.
fn pick_best(scores: &[(usize, f64)]) -> usize {
    let mut best_k = scores[0].0;
    let mut best_score = scores[0].1;
    for &(k, score) in &scores[1..] {
        if score > best_score {
            best_score = score;
            best_k = k;
        }
    }
    best_k
}

// =============================================================================
// Tests
// =============================================================================
