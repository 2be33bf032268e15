/// Stop demand clustering runner
///
/// Loads a ridership export, runs the full pipeline, and prints the
/// candidate scan, per-cluster statistics, and service suggestions.
/// A JSON report of the run is written alongside the console output.
///
/// Usage:
///   stopclust_service [DATA.csv]
///   stopclust_service --verify [DATA.csv]
///   stopclust_service --dev-mode [OUT.csv]

use std::error::Error;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use stopclust_service::analysis::selection::{cluster, select_k};
use stopclust_service::config::{PipelineConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_SEED};
use stopclust_service::demand::{classify_clusters, ClusterDemand};
use stopclust_service::dev_mode::DevMode;
use stopclust_service::ingest::csv::load_table;
use stopclust_service::logging::{
    self, error, info, init_logger, log_stage_summary, LogLevel, Stage, LOG_PATH_ENV,
};
use stopclust_service::model::{ClusterStats, KSelection, PipelineError};
use stopclust_service::verify::{print_summary, verify_dataset, VerificationStatus};
use stopclust_service::{evaluate, preprocess, scale};

/// Dataset the runner uses when neither the CLI nor the config names one.
const DEFAULT_DATA_PATH: &str = "data/ridership.csv";

/// Where `--dev-mode` writes its synthetic export.
const SYNTHETIC_PATH: &str = "synthetic_ridership.csv";

/// Machine-readable run summary written next to the console output.
const REPORT_PATH: &str = "cluster_report.json";

#[derive(Serialize)]
struct RunReport {
    timestamp: String,
    data_path: String,
    rows_loaded: usize,
    stops: usize,
    silhouette: f64,
    selection: KSelection,
    clusters: Vec<ClusterStats>,
    demand: Vec<ClusterDemand>,
}

fn main() {
    dotenv::dotenv().ok();
    let log_file = std::env::var(LOG_PATH_ENV).ok();
    init_logger(LogLevel::Info, log_file.as_deref(), false);

    if let Err(e) = run() {
        error(Stage::System, None, &format!("aborted: {}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("--verify") => run_verify(args.get(1).map(String::as_str)),
        Some("--dev-mode") => run_dev_mode(args.get(1).map(String::as_str)),
        other => run_pipeline(other),
    }
}

fn print_usage() {
    println!("Stop demand clustering service");
    println!();
    println!("Usage:");
    println!("  stopclust_service [DATA.csv]         run the pipeline on an export");
    println!("  stopclust_service --verify [DATA]    check an export without clustering");
    println!("  stopclust_service --dev-mode [OUT]   generate a synthetic export and run on it");
    println!();
    println!("Config: ./{} (override with ${})", DEFAULT_CONFIG_PATH, CONFIG_PATH_ENV);
    println!("Log file: ${}", LOG_PATH_ENV);
}

// ============================================================================
// Pipeline Run
// ============================================================================

fn run_pipeline(data_arg: Option<&str>) -> Result<(), Box<dyn Error>> {
    let env_config = std::env::var(CONFIG_PATH_ENV).ok();
    let config = PipelineConfig::discover(env_config.as_deref())?;
    let data_path = data_arg
        .map(String::from)
        .or_else(|| config.data_path.clone())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    println!("\n🚌 Stop Demand Clustering");
    println!("═══════════════════════════════════════════════════════════");
    info(Stage::System, None, &format!("dataset: {}", data_path));
    info(
        Stage::System,
        None,
        &format!(
            "candidates k in {}..{}, seed {}",
            config.k_min, config.k_max, config.seed
        ),
    );

    let table = load_table(Path::new(&data_path))?;
    info(
        Stage::Ingest,
        None,
        &format!("loaded {} rows, {} columns", table.n_rows(), table.headers().len()),
    );

    let summaries = preprocess(&table)?;
    log_stage_summary(Stage::Preprocess, table.n_rows(), summaries.len());
    if summaries.is_empty() {
        return Err(Box::new(PipelineError::EmptyData(
            "no valid rows survived cleaning".to_string(),
        )));
    }

    let (features, params) = scale(&summaries)?;
    logging::debug(
        Stage::Scale,
        None,
        &format!(
            "standardized {} rows, column means [{:.2}, {:.2}]",
            features.len(),
            params.mean[0],
            params.mean[1]
        ),
    );

    let selection = select_k(&features, &config)?;

    println!("\nCandidate scan:");
    println!("   {:>3}  {:>10}", "k", "silhouette");
    for (k, score) in &selection.scores {
        let marker = if *k == selection.best_k { "  ◀ best" } else { "" };
        println!("   {:>3}  {:>10.4}{}", k, score, marker);
    }

    let clustered = cluster(&summaries, selection.best_k, &config)?;
    log_stage_summary(Stage::Cluster, summaries.len(), clustered.len());

    let (silhouette, stats) = evaluate(&clustered)?;
    let demand = classify_clusters(&stats);

    println!(
        "\nCluster report (k = {}, silhouette {:.4}):",
        selection.best_k, silhouette
    );
    println!(
        "   {:>7}  {:>5}  {:>9}  {:>11}  {:<8}  {}",
        "cluster", "stops", "avg/trip", "total", "tier", "action"
    );
    for (s, d) in stats.iter().zip(demand.iter()) {
        println!(
            "   {:>7}  {:>5}  {:>9.1}  {:>11.0}  {:<8}  {}",
            s.cluster, s.count, s.avg_passengers, s.total_passengers, d.tier, d.action
        );
    }

    let report = RunReport {
        timestamp: Utc::now().to_rfc3339(),
        data_path,
        rows_loaded: table.n_rows(),
        stops: summaries.len(),
        silhouette,
        selection,
        clusters: stats,
        demand,
    };
    std::fs::write(REPORT_PATH, serde_json::to_string_pretty(&report)?)?;
    println!("\n📄 Report saved to: {}", REPORT_PATH);

    Ok(())
}

// ============================================================================
// Alternate Modes
// ============================================================================

fn run_verify(arg: Option<&str>) -> Result<(), Box<dyn Error>> {
    let path = arg.unwrap_or(DEFAULT_DATA_PATH);
    let report = verify_dataset(Path::new(path));
    print_summary(&report);

    if report.status == VerificationStatus::Failed {
        return Err(format!("dataset '{}' failed verification", path).into());
    }
    Ok(())
}

fn run_dev_mode(arg: Option<&str>) -> Result<(), Box<dyn Error>> {
    let path = arg.unwrap_or(SYNTHETIC_PATH);
    let dev = DevMode::new(DEFAULT_SEED);
    dev.write_csv(Path::new(path))?;
    info(
        Stage::System,
        None,
        &format!("synthetic export written to {}", path),
    );
    run_pipeline(Some(path))
}
