/// Dataset ingestion for the stop clustering service.
///
/// One uploaded dataset is read from disk per pipeline run; there is no
/// polling, no remote source, and no incremental loading.
///
/// Submodules:
/// - `csv` — columnar text file loader producing the raw table.

pub mod csv;
