/// Columnar ridership file loader
///
/// Reads an uploaded per-trip ridership dataset into a `RawTable`: the
/// first line names the columns, every following non-blank line is one
/// observation row. Cells are kept as raw strings — numeric coercion and
/// schema checks belong to the preprocessor, not the loader.
///
/// The format is plain comma-separated text. Quoted fields are not
/// supported; the columns this pipeline consumes are numeric and the
/// remaining columns are ignored wholesale.

use crate::model::{PipelineError, RawTable};
use std::path::Path;

// ============================================================================
// File Loading
// ============================================================================

/// Load a columnar dataset from disk.
///
/// # Returns
/// The raw table, unmodified. A header-only file yields a table with zero
/// rows — deciding whether that is usable is the preprocessor's job.
///
/// # Errors
/// `PipelineError::Load` when the file is absent or unreadable, has no
/// header line, or contains a row whose cell count differs from the
/// header's.
pub fn load_table(path: &Path) -> Result<RawTable, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Load(format!("cannot read '{}': {}", path.display(), e))
    })?;
    parse_table(&text)
}

/// Parse already-read columnar text into a raw table.
///
/// Exposed separately so callers holding an in-memory upload (the
/// presentation layer receives file contents, not paths) can skip the
/// filesystem round trip.
pub fn parse_table(text: &str) -> Result<RawTable, PipelineError> {
    let mut lines = text.lines().enumerate();

    let headers: Vec<String> = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line.trim_end_matches('\r');
                if line.trim().is_empty() {
                    continue; // Tolerate leading blank lines before the header
                }
                break split_row(line)
                    .into_iter()
                    .map(|cell| cell.trim().to_string())
                    .collect();
            }
            None => {
                return Err(PipelineError::Load(
                    "file is empty (no header row)".to_string(),
                ));
            }
        }
    };

    let mut rows = Vec::new();
    for (i, line) in lines {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue; // Skip blank lines between records
        }

        let cells = split_row(line);
        if cells.len() != headers.len() {
            // A ragged row means the upload is corrupt, not merely sparse.
            // Line numbers are 1-based from the top of the file.
            return Err(PipelineError::Load(format!(
                "row at line {} has {} cells, expected {}",
                i + 1,
                cells.len(),
                headers.len()
            )));
        }
        rows.push(cells);
    }

    Ok(RawTable::new(headers, rows))
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.to_string()).collect()
}

// ============================================================================
// Tests
// ============================================================================
