/// Clustering analysis for the stop demand service.
///
/// This module holds the numeric stages of the pipeline. Data flows
/// through them in a fixed order: `preprocess` turns a raw table into
/// per-stop summaries, `scaling` standardizes the feature columns,
/// `selection` scans candidate cluster counts and produces the final
/// assignment, and `evaluate` scores the result.
///
/// Submodules:
/// - `preprocess` — cleaning, filtering, and per-stop aggregation.
/// - `scaling` — column standardization (z-scores).
/// - `kmeans` — seeded k-means fitting.
/// - `silhouette` — cohesion/separation scoring.
/// - `selection` — candidate scan and final cluster assignment.
/// - `dbscan` — density-based assignment for irregular demand shapes.
/// - `evaluate` — quality score and per-cluster statistics.

pub mod dbscan;
pub mod evaluate;
pub mod kmeans;
pub mod preprocess;
pub mod scaling;
pub mod selection;
pub mod silhouette;
