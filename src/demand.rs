/// Demand tiers and service actions derived from cluster statistics.
///
/// Planning reads each cluster relative to the network: a cluster
/// whose average load sits well above the mean of cluster averages is
/// a candidate for more frequent service, one well below for review.
/// Thresholds are ratios so the same bands work for a rural feeder
/// network and a metro trunk alike.

use std::fmt;

use serde::Serialize;

use crate::model::ClusterStats;

/// Ratio of cluster average to network average at or above which a
/// cluster counts as high demand.
pub const HIGH_DEMAND_RATIO: f64 = 1.25;

/// Ratio at or below which a cluster counts as low demand.
pub const LOW_DEMAND_RATIO: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DemandTier {
    Low,
    Moderate,
    High,
}

impl fmt::Display for DemandTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandTier::Low => write!(f, "low"),
            DemandTier::Moderate => write!(f, "moderate"),
            DemandTier::High => write!(f, "high"),
        }
    }
}

/// What planning should do with a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceAction {
    IncreaseFrequency,
    Maintain,
    ReviewForReduction,
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceAction::IncreaseFrequency => write!(f, "increase frequency"),
            ServiceAction::Maintain => write!(f, "maintain"),
            ServiceAction::ReviewForReduction => write!(f, "review for reduction"),
        }
    }
}

/// One cluster's standing relative to the rest of the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterDemand {
    pub cluster: usize,
    pub tier: DemandTier,
    pub action: ServiceAction,
    pub avg_passengers: f64,
    /// Cluster average divided by the mean of all cluster averages.
    pub load_ratio: f64,
}

/// Band every cluster against the network mean of cluster averages.
///
/// An empty input yields an empty report. Should the network mean ever
/// be non-positive the ratios are meaningless, so everything falls
/// back to `Moderate`.
pub fn classify_clusters(stats: &[ClusterStats]) -> Vec<ClusterDemand> {
    if stats.is_empty() {
        return Vec::new();
    }

    let network_avg =
        stats.iter().map(|s| s.avg_passengers).sum::<f64>() / stats.len() as f64;

    stats
        .iter()
        .map(|s| {
            let ratio = if network_avg > 0.0 {
                s.avg_passengers / network_avg
            } else {
                1.0
            };
            let tier = tier_for_ratio(ratio);
            ClusterDemand {
                cluster: s.cluster,
                tier,
                action: action_for_tier(tier),
                avg_passengers: s.avg_passengers,
                load_ratio: ratio,
            }
        })
        .collect()
}

fn tier_for_ratio(ratio: f64) -> DemandTier {
    if ratio >= HIGH_DEMAND_RATIO {
        DemandTier::High
    } else if ratio <= LOW_DEMAND_RATIO {
        DemandTier::Low
    } else {
        DemandTier::Moderate
    }
}

pub fn action_for_tier(tier: DemandTier) -> ServiceAction {
    match tier {
        DemandTier::High => ServiceAction::IncreaseFrequency,
        DemandTier::Moderate => ServiceAction::Maintain,
        DemandTier::Low => ServiceAction::ReviewForReduction,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(entries: &[(usize, f64)]) -> Vec<ClusterStats> {
        entries
            .iter()
            .map(|&(cluster, avg)| ClusterStats {
                cluster,
                count: 5,
                avg_passengers: avg,
                total_passengers: avg * 50.0,
            })
            .collect()
    }

    #[test]
    fn test_bands_relative_to_network_mean() {
        // Network mean is 100.
        let report = classify_clusters(&stats(&[(0, 10.0), (1, 100.0), (2, 190.0)]));

        assert_eq!(report.len(), 3);
        assert_eq!(report[0].tier, DemandTier::Low);
        assert_eq!(report[0].action, ServiceAction::ReviewForReduction);
        assert_eq!(report[1].tier, DemandTier::Moderate);
        assert_eq!(report[1].action, ServiceAction::Maintain);
        assert_eq!(report[2].tier, DemandTier::High);
        assert_eq!(report[2].action, ServiceAction::IncreaseFrequency);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        // Network mean is exactly 100, so the ratios land on the bands.
        let report = classify_clusters(&stats(&[(0, 75.0), (1, 100.0), (2, 125.0)]));

        assert_eq!(report[0].tier, DemandTier::Low);
        assert!((report[0].load_ratio - 0.75).abs() < 1e-12);
        assert_eq!(report[1].tier, DemandTier::Moderate);
        assert_eq!(report[2].tier, DemandTier::High);
        assert!((report[2].load_ratio - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_network_is_all_moderate() {
        let report = classify_clusters(&stats(&[(0, 40.0), (1, 40.0), (2, 40.0)]));
        assert!(report.iter().all(|d| d.tier == DemandTier::Moderate));
        assert!(report.iter().all(|d| (d.load_ratio - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_empty_stats_yield_empty_report() {
        assert!(classify_clusters(&[]).is_empty());
    }

    #[test]
    fn test_report_preserves_cluster_order() {
        let report = classify_clusters(&stats(&[(0, 10.0), (1, 50.0), (2, 90.0)]));
        let ids: Vec<usize> = report.iter().map(|d| d.cluster).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_tier_display_matches_report_wording() {
        assert_eq!(DemandTier::High.to_string(), "high");
        assert_eq!(ServiceAction::ReviewForReduction.to_string(), "review for reduction");
    }
}
