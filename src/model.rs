/// RawTable, StopSummary, ClusteredStop, ClusterStats, PipelineError
/// core data structures and error handling
///
/// Core data types for the stop demand clustering service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond simple accessors, no I/O, and no external
/// dependencies beyond serde — only types.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Header name of the stop identifier column in an uploaded dataset.
pub const COL_STOP_ID: &str = "stop_id";

/// Header name of the per-trip passenger count column.
pub const COL_PASSENGERS: &str = "passengers";

/// Number of feature columns used for clustering: `stop_id` and
/// `avg_passengers`, in that order.
pub const FEATURE_COLUMNS: usize = 2;

/// One stop described by its two clustering features, standardized.
/// Column 0 is `stop_id`, column 1 is `avg_passengers`.
pub type FeatureRow = [f64; FEATURE_COLUMNS];

/// The standardized feature matrix, one row per stop summary row.
pub type FeatureMatrix = Vec<FeatureRow>;

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// An uploaded dataset exactly as loaded from disk: header names plus rows
/// of raw string cells. The loader performs no coercion and no schema
/// validation beyond requiring every row to match the header's cell count;
/// numeric interpretation happens in the preprocessor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Assembles a table from parsed header names and rows. The loader is
    /// responsible for having checked that every row matches the header
    /// width; this constructor trusts its caller.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RawTable { headers, rows }
    }

    /// Position of a named column, or `None` if the header lacks it.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Stop summary types
// ---------------------------------------------------------------------------

/// Aggregated ridership for a single stop.
///
/// Produced by `analysis::preprocess` from the raw table: one row per
/// distinct `stop_id` that had at least one positive passenger observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSummary {
    pub stop_id: u32,
    /// Mean of the stop's positive passenger counts.
    pub avg_passengers: f64,
    /// Sum of the stop's positive passenger counts.
    pub total_passengers: f64,
}

/// A stop summary paired with its final cluster label.
///
/// Clustering returns a new vector of these rather than mutating the
/// summary rows, so the un-clustered table stays valid for re-runs with a
/// different k.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteredStop {
    pub stop_id: u32,
    pub avg_passengers: f64,
    pub total_passengers: f64,
    /// Cluster label in `0..k`.
    pub cluster: usize,
}

impl ClusteredStop {
    /// Pairs a summary row with its label.
    pub fn from_summary(summary: &StopSummary, cluster: usize) -> Self {
        ClusteredStop {
            stop_id: summary.stop_id,
            avg_passengers: summary.avg_passengers,
            total_passengers: summary.total_passengers,
            cluster,
        }
    }
}

/// Descriptive statistics for one final cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterStats {
    pub cluster: usize,
    /// Number of stops assigned to the cluster.
    pub count: usize,
    /// Mean of the member stops' `avg_passengers` (a mean of means).
    pub avg_passengers: f64,
    /// Sum of the member stops' `total_passengers`.
    pub total_passengers: f64,
}

// ---------------------------------------------------------------------------
// Scaler and selector outputs
// ---------------------------------------------------------------------------

/// Per-column statistics fitted by the scaler over the current batch.
///
/// Not reused elsewhere in the pipeline (each stage re-derives its own
/// features), but exposed for symmetry and testability. Column order
/// matches `FeatureRow`: `[stop_id, avg_passengers]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalerParams {
    pub mean: [f64; FEATURE_COLUMNS],
    /// Population standard deviation per column. A zero entry marks a
    /// degenerate (single-valued) column; the scaler emits 0.0 for every
    /// value of such a column rather than dividing by zero.
    pub std_dev: [f64; FEATURE_COLUMNS],
}

/// Result of scanning the candidate cluster counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KSelection {
    /// The candidate with the highest silhouette score. Ties keep the
    /// earliest (lowest) k.
    pub best_k: usize,
    /// Every scanned `(k, silhouette)` pair, ascending in k.
    pub scores: Vec<(usize, f64)>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while loading or clustering a dataset.
///
/// Every pipeline stage fails fast and propagates one of these to its
/// caller; there are no retries and no partial results.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The data file is absent, unreadable, or structurally malformed
    /// (missing header, ragged row).
    Load(String),
    /// A required column is missing from the header after a successful load.
    Schema(String),
    /// A stage received zero usable rows (nothing survived filtering).
    EmptyData(String),
    /// The data cannot support the requested clustering: fewer distinct
    /// points than the minimum cluster count, an invalid k, or labels that
    /// cannot be scored.
    DegenerateInput(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Load(msg) => write!(f, "Load error: {}", msg),
            PipelineError::Schema(msg) => write!(f, "Schema error: {}", msg),
            PipelineError::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            PipelineError::DegenerateInput(msg) => {
                write!(f, "Degenerate input: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}
