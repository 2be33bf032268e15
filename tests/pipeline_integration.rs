//! Pipeline Integration Tests
//!
//! These tests run the whole chain — load, preprocess, scale, select,
//! cluster, evaluate — against on-disk fixtures, the way the runner
//! does. Unit behavior of each stage is covered next to the stages;
//! here the interest is the handoffs between them.

use std::fs;
use std::path::PathBuf;

use stopclust_service::analysis::selection::{cluster, select_k};
use stopclust_service::config::PipelineConfig;
use stopclust_service::dev_mode::DevMode;
use stopclust_service::ingest::csv::load_table;
use stopclust_service::model::PipelineError;
use stopclust_service::{evaluate, preprocess, scale};

fn fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_full_pipeline_on_synthetic_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    DevMode::new(42).write_csv(&path).unwrap();

    println!("\n🚌 Running full pipeline on synthetic export");
    println!("═══════════════════════════════════════════════════════════");

    let config = PipelineConfig::default();
    let table = load_table(&path).unwrap();
    let summaries = preprocess(&table).unwrap();
    let (features, _params) = scale(&summaries).unwrap();
    let selection = select_k(&features, &config).unwrap();

    println!("\nCandidate scan:");
    for (k, score) in &selection.scores {
        println!("   k={}  silhouette={:.4}", k, score);
    }

    // The synthetic network has three demand bands.
    assert_eq!(selection.best_k, 3, "three bands should select k=3");

    let clustered = cluster(&summaries, selection.best_k, &config).unwrap();
    let (silhouette, stats) = evaluate(&clustered).unwrap();

    println!("\nResult: k={}, silhouette={:.4}", selection.best_k, silhouette);
    for s in &stats {
        println!(
            "   cluster {}: {} stops, avg {:.1}, total {:.0}",
            s.cluster, s.count, s.avg_passengers, s.total_passengers
        );
    }
    println!("═══════════════════════════════════════════════════════════\n");

    assert!(silhouette > 0.5, "bands are well separated, got {}", silhouette);
    assert_eq!(stats.len(), 3);
    let stops_covered: usize = stats.iter().map(|s| s.count).sum();
    assert_eq!(stops_covered, summaries.len(), "every stop lands in a cluster");
    assert!(stats.iter().all(|s| s.count == 12), "bands have 12 stops each");
}

#[test]
fn test_pipeline_is_deterministic_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    DevMode::new(7).write_csv(&path).unwrap();

    let run = || {
        let config = PipelineConfig::default();
        let table = load_table(&path).unwrap();
        let summaries = preprocess(&table).unwrap();
        let (features, _) = scale(&summaries).unwrap();
        let selection = select_k(&features, &config).unwrap();
        let clustered = cluster(&summaries, selection.best_k, &config).unwrap();
        (selection, clustered)
    };

    let (first_selection, first_clusters) = run();
    let (second_selection, second_clusters) = run();

    assert_eq!(first_selection, second_selection);
    assert_eq!(first_clusters, second_clusters);
}

#[test]
fn test_cleaning_drops_junk_and_aggregates_per_stop() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(
        &dir,
        "mixed.csv",
        "stop_id,passengers\n1,10\n1,20\n2,-5\n2,0\n",
    );

    let table = load_table(&path).unwrap();
    let summaries = preprocess(&table).unwrap();

    // Stop 2 has no positive trips, so only stop 1 survives.
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].stop_id, 1);
    assert!((summaries[0].avg_passengers - 15.0).abs() < 1e-12);
    assert!((summaries[0].total_passengers - 30.0).abs() < 1e-12);
}

#[test]
fn test_single_stop_export_cannot_be_clustered() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "single.csv", "stop_id,passengers\n7,10\n7,14\n7,9\n");

    let table = load_table(&path).unwrap();
    let summaries = preprocess(&table).unwrap();
    let (features, _) = scale(&summaries).unwrap();

    let err = select_k(&features, &PipelineConfig::default())
        .expect_err("one distinct stop cannot form clusters");
    assert!(matches!(err, PipelineError::DegenerateInput(_)));
}

#[test]
fn test_fully_filtered_export_stops_at_scaling() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "junk.csv", "stop_id,passengers\n1,0\n2,-3\nnull,9\n");

    let table = load_table(&path).unwrap();
    let summaries = preprocess(&table).unwrap();
    assert!(summaries.is_empty(), "cleaning drops every row");

    let err = scale(&summaries).expect_err("nothing left to scale");
    assert!(matches!(err, PipelineError::EmptyData(_)));
}

#[test]
fn test_missing_required_column_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "renamed.csv", "station,riders\n1,10\n2,20\n");

    let table = load_table(&path).unwrap();
    let err = preprocess(&table).expect_err("renamed columns must fail");
    match err {
        PipelineError::Schema(msg) => assert!(msg.contains("stop_id"), "got: {}", msg),
        other => panic!("expected Schema error, got {:?}", other),
    }
}

#[test]
fn test_malformed_export_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "ragged.csv", "stop_id,passengers\n1,10\n2,20,EXTRA\n");

    let err = load_table(&path).expect_err("ragged row must fail");
    match err {
        PipelineError::Load(msg) => assert!(msg.contains("line 3"), "got: {}", msg),
        other => panic!("expected Load error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_fails_at_load() {
    let err = load_table(std::path::Path::new("/no/such/export.csv"))
        .expect_err("missing file must fail");
    assert!(matches!(err, PipelineError::Load(_)));
}

#[test]
fn test_configured_range_narrows_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    DevMode::new(42).write_csv(&path).unwrap();

    let config = PipelineConfig {
        k_min: 4,
        k_max: 7,
        ..PipelineConfig::default()
    };
    let table = load_table(&path).unwrap();
    let summaries = preprocess(&table).unwrap();
    let (features, _) = scale(&summaries).unwrap();
    let selection = select_k(&features, &config).unwrap();

    let ks: Vec<usize> = selection.scores.iter().map(|(k, _)| *k).collect();
    assert_eq!(ks, vec![4, 5, 6], "scan respects the configured bounds");
    assert!(ks.contains(&selection.best_k));
}

#[test]
fn test_report_artifact_serializes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    DevMode::new(42).write_csv(&path).unwrap();

    let config = PipelineConfig::default();
    let table = load_table(&path).unwrap();
    let summaries = preprocess(&table).unwrap();
    let (features, _) = scale(&summaries).unwrap();
    let selection = select_k(&features, &config).unwrap();
    let clustered = cluster(&summaries, selection.best_k, &config).unwrap();
    let (_, stats) = evaluate(&clustered).unwrap();

    let report_json = serde_json::to_string_pretty(&stats).unwrap();
    let report_path = dir.path().join("cluster_report.json");
    fs::write(&report_path, &report_json).unwrap();

    println!("\n📄 Cluster report saved to: {}", report_path.display());

    let parsed: serde_json::Value = serde_json::from_str(&report_json).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), stats.len());
    assert!(entries[0].get("cluster").is_some());
    assert!(entries[0].get("avg_passengers").is_some());
}
