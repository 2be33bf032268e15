//! Pipeline configuration.
//!
//! The clustering parameters that were hidden defaults in earlier
//! prototypes (fixed random seed, candidate k range) live in an explicit
//! `PipelineConfig` that callers pass into the selector and clusterer.
//! The runner loads it from a TOML file when one is present and falls back
//! to the built-in defaults otherwise.

use serde::Deserialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Seed for every k-means fit. A fresh RNG is created from this seed per
/// fit, so the selector's fit at k and the final fit at the same k produce
/// identical labels.
pub const DEFAULT_SEED: u64 = 42;

/// Default candidate range lower bound (inclusive).
pub const DEFAULT_K_MIN: usize = 2;

/// Default candidate range upper bound (exclusive) — candidates 2..=10.
pub const DEFAULT_K_MAX: usize = 11;

/// Lloyd iteration cap per k-means fit.
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// Convergence threshold on the largest squared centroid shift.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Config file the runner looks for in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "Stopclust.toml";

/// Environment variable that overrides the config file path.
pub const CONFIG_PATH_ENV: &str = "STOPCLUST_CONFIG";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Fixed configuration for one pipeline run.
///
/// Every field has a default matching the behavior of the system this
/// service replaces, so an empty TOML file (or no file at all) reproduces
/// the historical results exactly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed for deterministic k-means initialization.
    pub seed: u64,
    /// Lowest candidate cluster count (inclusive). Must be at least 2.
    pub k_min: usize,
    /// Upper bound of the candidate range (exclusive). Must exceed `k_min`.
    pub k_max: usize,
    /// Maximum Lloyd iterations per fit.
    pub max_iterations: usize,
    /// Convergence threshold on centroid movement.
    pub tolerance: f64,
    /// Dataset path for the standalone runner. The library entry points
    /// never read this; callers hand them tables directly.
    pub data_path: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            seed: DEFAULT_SEED,
            k_min: DEFAULT_K_MIN,
            k_max: DEFAULT_K_MAX,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            data_path: None,
        }
    }
}

impl PipelineConfig {
    /// Checks the parameter invariants, failing with a descriptive message.
    ///
    /// Called by `load` after parsing; library users constructing a config
    /// by hand should call it themselves before running the selector.
    pub fn validate(&self) -> Result<(), String> {
        if self.k_min < 2 {
            return Err(format!(
                "k_min must be >= 2, got {}. Silhouette scoring requires at \
                 least 2 clusters.",
                self.k_min
            ));
        }
        if self.k_max <= self.k_min {
            return Err(format!(
                "k_max ({}) must be greater than k_min ({}). The range is \
                 inclusive-exclusive, so k_max = k_min + 1 scans a single \
                 candidate.",
                self.k_max, self.k_min
            ));
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(format!(
                "tolerance must be a non-negative finite number, got {}",
                self.tolerance
            ));
        }
        Ok(())
    }

    /// The candidate cluster counts as a range, `k_min..k_max`.
    pub fn k_range(&self) -> std::ops::Range<usize> {
        self.k_min..self.k_max
    }

    /// Loads and validates a config from a TOML file.
    pub fn load(path: &Path) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config file '{}': {}", path.display(), e))?;
        let config: PipelineConfig = toml::from_str(&text)
            .map_err(|e| format!("cannot parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the runner's configuration.
    ///
    /// An explicit path (CLI or `STOPCLUST_CONFIG`) must load successfully.
    /// Without one, `Stopclust.toml` is used when present; otherwise the
    /// defaults apply.
    pub fn discover(explicit: Option<&str>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
        match explicit {
            Some(path) => PipelineConfig::load(Path::new(path)),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    PipelineConfig::load(default_path)
                } else {
                    Ok(PipelineConfig::default())
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
