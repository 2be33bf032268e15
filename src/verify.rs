//! Dataset Verification Module
//!
//! Framework for checking a ridership export before it enters the
//! clustering pipeline: whether the file loads, which required columns
//! are present, how many rows survive cleaning, and whether the batch
//! can support clustering at all.
//!
//! Use this when onboarding a new export to see what the pipeline will
//! make of it, without running the pipeline.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::preprocess::{parse_passengers, parse_stop_id};
use crate::ingest::csv::load_table;
use crate::model::{COL_PASSENGERS, COL_STOP_ID};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    pub timestamp: String,
    pub path: String,
    pub status: VerificationStatus,
    pub loadable: bool,
    pub columns_found: Vec<String>,
    pub columns_missing: Vec<String>,
    pub raw_rows: usize,
    pub rows_missing_values: usize,
    pub rows_non_positive: usize,
    pub valid_rows: usize,
    pub distinct_stops: usize,
    pub clusterable: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Dataset Verification
// ============================================================================

/// Check one export end to end. Never panics: every failure mode lands
/// in the report's status and error message instead.
pub fn verify_dataset(path: &Path) -> DatasetReport {
    let mut report = DatasetReport {
        timestamp: Utc::now().to_rfc3339(),
        path: path.display().to_string(),
        status: VerificationStatus::Failed,
        loadable: false,
        columns_found: Vec::new(),
        columns_missing: Vec::new(),
        raw_rows: 0,
        rows_missing_values: 0,
        rows_non_positive: 0,
        valid_rows: 0,
        distinct_stops: 0,
        clusterable: false,
        error_message: None,
    };

    // Test 1: does the file load at all?
    let table = match load_table(path) {
        Ok(table) => {
            report.loadable = true;
            table
        }
        Err(e) => {
            report.error_message = Some(e.to_string());
            return report;
        }
    };
    report.columns_found = table.headers().to_vec();
    report.raw_rows = table.n_rows();

    // Test 2: are the required columns present?
    let stop_col = table.column_index(COL_STOP_ID);
    let passengers_col = table.column_index(COL_PASSENGERS);
    if stop_col.is_none() {
        report.columns_missing.push(COL_STOP_ID.to_string());
    }
    if passengers_col.is_none() {
        report.columns_missing.push(COL_PASSENGERS.to_string());
    }
    let (Some(stop_col), Some(passengers_col)) = (stop_col, passengers_col) else {
        report.error_message = Some(format!(
            "missing required column(s): {}",
            report.columns_missing.join(", ")
        ));
        return report;
    };

    // Test 3: row-by-row accounting with the pipeline's own parsers.
    let mut stops: BTreeSet<u32> = BTreeSet::new();
    for row in table.rows() {
        let (Some(stop_id), Some(passengers)) = (
            parse_stop_id(&row[stop_col]),
            parse_passengers(&row[passengers_col]),
        ) else {
            report.rows_missing_values += 1;
            continue;
        };
        if passengers <= 0.0 {
            report.rows_non_positive += 1;
            continue;
        }
        report.valid_rows += 1;
        stops.insert(stop_id);
    }
    report.distinct_stops = stops.len();
    report.clusterable = report.distinct_stops >= 2;

    // Roll up the status.
    if report.valid_rows == 0 {
        report.error_message = Some("no usable rows after cleaning".to_string());
    } else if !report.clusterable {
        report.error_message =
            Some("fewer than 2 distinct stops; clustering would fail".to_string());
    } else if report.rows_missing_values > 0 || report.rows_non_positive > 0 {
        report.status = VerificationStatus::PartialSuccess;
    } else {
        report.status = VerificationStatus::Success;
    }

    report
}

pub fn print_summary(report: &DatasetReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 DATASET VERIFICATION");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("File:                 {}", report.path);
    println!("Loadable:             {}", if report.loadable { "yes" } else { "no" });
    println!("Columns found:        {}", report.columns_found.join(", "));
    if !report.columns_missing.is_empty() {
        println!("Columns missing:      {}", report.columns_missing.join(", "));
    }
    println!("Raw rows:             {}", report.raw_rows);
    println!("Dropped (missing):    {}", report.rows_missing_values);
    println!("Dropped (non-positive): {}", report.rows_non_positive);
    println!("Valid rows:           {}/{}", report.valid_rows, report.raw_rows);
    println!("Distinct stops:       {}", report.distinct_stops);
    println!();

    match report.status {
        VerificationStatus::Success => println!("✓ Ready for clustering"),
        VerificationStatus::PartialSuccess => {
            println!("⚠ Usable, but some rows will be dropped")
        }
        VerificationStatus::Failed => println!(
            "✗ FAILED: {}",
            report.error_message.as_deref().unwrap_or("unknown")
        ),
    }
    println!("═══════════════════════════════════════════════════════════");
}

// =============================================================================
// Tests
// =============================================================================
