/// Development mode utilities for working without a real export
///
/// When no ridership export is available, use this module to generate
/// a synthetic one for testing and development. Stops are laid out in
/// demand bands, separated in both stop-id range and passenger load,
/// so the pipeline has real structure to find.

use std::fs;
use std::io;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{RawTable, COL_PASSENGERS, COL_STOP_ID};

/// One band of stops sharing a demand profile.
pub struct DemandProfile {
    pub label: &'static str,
    /// First stop id in the band.
    pub first_stop_id: u32,
    /// Number of stops in the band.
    pub stops: usize,
    /// Typical passengers per trip.
    pub avg_passengers: f64,
    /// Half-width of the uniform jitter around the average.
    pub spread: f64,
}

/// Configuration for synthetic ridership generation
pub struct DevMode {
    pub profiles: Vec<DemandProfile>,
    /// Trips recorded per stop (default: 40, roughly a week of service)
    pub trips_per_stop: usize,
    pub seed: u64,
}

impl DevMode {
    /// Create a dev mode configuration with the default three-band
    /// network: quiet residential feeders, commuter corridor stops,
    /// and interchange hubs.
    pub fn new(seed: u64) -> Self {
        Self {
            profiles: vec![
                DemandProfile {
                    label: "residential",
                    first_stop_id: 100,
                    stops: 12,
                    avg_passengers: 6.0,
                    spread: 3.0,
                },
                DemandProfile {
                    label: "corridor",
                    first_stop_id: 500,
                    stops: 12,
                    avg_passengers: 45.0,
                    spread: 10.0,
                },
                DemandProfile {
                    label: "interchange",
                    first_stop_id: 900,
                    stops: 12,
                    avg_passengers: 130.0,
                    spread: 20.0,
                },
            ],
            trips_per_stop: 40,
            seed,
        }
    }

    /// Generate the synthetic trip table as if it had just been loaded.
    ///
    /// Carries a `band` column the pipeline ignores; handy when eyeing
    /// the file by hand.
    pub fn generate(&self) -> RawTable {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut rows = Vec::new();
        for profile in &self.profiles {
            for stop in 0..profile.stops {
                let stop_id = profile.first_stop_id + stop as u32;
                for _ in 0..self.trips_per_stop {
                    let jitter = if profile.spread > 0.0 {
                        rng.gen_range(-profile.spread..profile.spread)
                    } else {
                        0.0
                    };
                    // Whole passengers, never below 1: a recorded trip
                    // had at least one rider.
                    let passengers = (profile.avg_passengers + jitter).round().max(1.0);
                    rows.push(vec![
                        stop_id.to_string(),
                        (passengers as i64).to_string(),
                        profile.label.to_string(),
                    ]);
                }
            }
        }
        RawTable::new(
            vec![
                COL_STOP_ID.to_string(),
                COL_PASSENGERS.to_string(),
                "band".to_string(),
            ],
            rows,
        )
    }

    /// Write the synthetic export as a CSV file the loader can read.
    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        let table = self.generate();
        let mut out = String::new();
        out.push_str(&table.headers().join(","));
        out.push('\n');
        for row in table.rows() {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        fs::write(path, out)
    }
}
