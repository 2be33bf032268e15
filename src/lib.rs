//! Stop demand clustering service
//!
//! Batch pipeline that turns a raw ridership export into demand
//! clusters: load the table, clean and aggregate it per stop,
//! standardize the features, scan candidate cluster counts, fit the
//! winner, and score the result. The binary wires the stages together;
//! everything is equally usable as a library, stage by stage.

pub mod analysis;
pub mod config;
pub mod demand;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod verify;

// The five pipeline stages, in call order.
pub use analysis::preprocess::preprocess;
pub use analysis::scaling::scale;
pub use analysis::selection::{cluster, select_k};
pub use analysis::evaluate::evaluate;
