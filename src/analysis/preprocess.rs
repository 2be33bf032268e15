/// Cleaning, filtering, and per-stop aggregation.
///
/// Takes the raw trip table from ingest and produces one summary row
/// per stop. Rows with missing, unparseable, or non-finite values are
/// dropped, as are trips with zero or negative passenger counts (depot
/// runs and counter glitches). Surviving trips are grouped by stop id
/// and reduced to the average and total passenger load per stop.

use std::collections::BTreeMap;

use crate::model::{PipelineError, RawTable, StopSummary, COL_PASSENGERS, COL_STOP_ID};

/// Aggregate a raw trip table into per-stop ridership summaries.
///
/// Output is sorted by stop id and carries one entry per distinct stop
/// that had at least one valid trip. A table whose rows are all
/// filtered out yields an empty vector, not an error; downstream
/// stages decide whether an empty batch is fatal.
pub fn preprocess(table: &RawTable) -> Result<Vec<StopSummary>, PipelineError> {
    let stop_col = table.column_index(COL_STOP_ID).ok_or_else(|| {
        PipelineError::Schema(format!("required column '{}' not found", COL_STOP_ID))
    })?;
    let passengers_col = table.column_index(COL_PASSENGERS).ok_or_else(|| {
        PipelineError::Schema(format!("required column '{}' not found", COL_PASSENGERS))
    })?;

    // Per stop: (passenger sum, trip count). BTreeMap keeps the output
    // ordered by stop id without a separate sort.
    let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for row in table.rows() {
        let stop_id = match parse_stop_id(&row[stop_col]) {
            Some(id) => id,
            None => continue,
        };
        let passengers = match parse_passengers(&row[passengers_col]) {
            Some(p) => p,
            None => continue,
        };
        if passengers <= 0.0 {
            continue;
        }
        let entry = groups.entry(stop_id).or_insert((0.0, 0));
        entry.0 += passengers;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(stop_id, (sum, count))| StopSummary {
            stop_id,
            avg_passengers: sum / count as f64,
            total_passengers: sum,
        })
        .collect())
}

/// Parse a stop identifier cell. Empty cells, "null", and anything
/// that is not a whole non-negative number count as missing.
pub(crate) fn parse_stop_id(cell: &str) -> Option<u32> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse a passenger-count cell. Empty cells and "null" count as
/// missing; unparseable and non-finite values do too, so an "inf"
/// cell cannot reach the aggregation.
pub(crate) fn parse_passengers(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Tests
// =============================================================================
