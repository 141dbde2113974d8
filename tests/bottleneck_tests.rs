//! Tests for static bottleneck analysis.

use hub_allocation::bottleneck::BottleneckAnalyzer;
use hub_allocation::config::{Config, LinkSpec};
use hub_allocation::geo::GeoPoint;
use hub_allocation::hub::{DistributionHub, HubTier};
use hub_allocation::network::{DistributionNetwork, NetworkBuilder, Route, TransportMode};
use hub_allocation::records::{FacilityRecord, StaticCoordinates};

/// Build a network from `(district, facility count)` pairs spread around Kampala.
fn build(config: &Config, districts: &[(&str, u32)]) -> DistributionNetwork {
    let mut facilities = Vec::new();
    let mut coordinates = StaticCoordinates::new();
    for (i, &(name, count)) in districts.iter().enumerate() {
        facilities.push(FacilityRecord::new(name, count, 0, 0, 0, 0));
        coordinates.insert(name, GeoPoint::new(0.3 + 0.1 * i as f64, 32.5));
    }

    NetworkBuilder::new(config)
        .build(&facilities, &coordinates)
        .unwrap()
}

#[test]
fn test_small_hub_is_capacity_constrained() {
    let config = Config::new();
    let network = build(&config, &[("SMALL", 4), ("LARGE", 20)]);

    let report = BottleneckAnalyzer::new(&config).analyze(&network);

    assert_eq!(report.capacity_constraints.len(), 1);
    let constraint = &report.capacity_constraints[0];
    assert_eq!(constraint.hub, "SMALL_District_Hub");
    assert_eq!(constraint.current_capacity, 4000);
    assert_eq!(constraint.recommended, 5000);
    assert_eq!(constraint.gap, 1000);
}

#[test]
fn test_capacity_floor_is_exclusive() {
    let config = Config::new();
    let network = build(&config, &[("EXACT", 5)]);

    let report = BottleneckAnalyzer::new(&config).analyze(&network);
    assert!(report.capacity_constraints.is_empty());
}

#[test]
fn test_no_cold_chain_is_full_gap() {
    let config = Config::new();
    let network = build(&config, &[("A", 6), ("B", 7), ("C", 8)]);

    let report = BottleneckAnalyzer::new(&config).analyze(&network);
    let gap = report.cold_chain_gap.unwrap();

    assert_eq!(gap.current_coverage, 0.0);
    assert_eq!(gap.gap_percent(), 100.0);
    assert_eq!(gap.target, 0.5);
    assert_eq!(gap.districts_needing_cold_chain, 3);
}

#[test]
fn test_half_cold_chain_meets_target() {
    let config = Config::new();
    let network = build(&config, &[("A", 6), ("B", 20)]);

    let report = BottleneckAnalyzer::new(&config).analyze(&network);
    assert!(report.cold_chain_gap.is_none());
}

#[test]
fn test_cold_chain_gap_below_target() {
    let config = Config::new();
    let network = build(&config, &[("A", 6), ("B", 7), ("C", 20)]);

    let gap = BottleneckAnalyzer::new(&config)
        .analyze(&network)
        .cold_chain_gap
        .unwrap();
    assert!((gap.current_coverage - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(gap.districts_needing_cold_chain, 2);
}

#[test]
fn test_default_links_are_reliable() {
    let config = Config::new();
    let network = build(&config, &[("A", 20), ("B", 20)]);

    let report = BottleneckAnalyzer::new(&config).analyze(&network);
    assert!(report.reliability_concerns.is_empty());
    assert!(report.is_clean());
    assert_eq!(report.finding_count(), 0);
}

#[test]
fn test_unreliable_feeders_are_flagged() {
    let config = Config::new().with_feeder_link(LinkSpec {
        mode: TransportMode::Motorcycle,
        cost_per_km: 0.2,
        speed_kmh: 30.0,
        reliability: 0.7,
    });
    let network = build(&config, &[("A", 20), ("B", 20)]);

    let report = BottleneckAnalyzer::new(&config).analyze(&network);

    assert_eq!(report.reliability_concerns.len(), 2);
    for concern in &report.reliability_concerns {
        assert!(concern.from.ends_with("_Regional_Hub"));
        assert!(concern.to.ends_with("_District_Hub"));
        assert_eq!(concern.reliability, 0.7);
        assert!(!concern.recommendation.is_empty());
    }
}

#[test]
fn test_threshold_is_configurable() {
    let config = Config::new().with_reliability_threshold(0.9);
    let network = build(&config, &[("A", 20)]);

    let report = BottleneckAnalyzer::new(&config).analyze(&network);
    assert_eq!(report.reliability_concerns.len(), 1);
}

#[test]
fn test_orphan_district_is_a_connectivity_issue() {
    let config = Config::new();
    let hub = |name: &str, tier: HubTier| {
        DistributionHub::new(
            name.to_string(),
            name.to_string(),
            tier,
            GeoPoint::new(0.0, 0.0),
            10_000,
            true,
            2,
        )
    };

    let mut network = DistributionNetwork::new();
    network.add_hub(hub("N", HubTier::National)).unwrap();
    network.add_hub(hub("R", HubTier::Regional)).unwrap();
    network.add_hub(hub("LINKED", HubTier::District)).unwrap();
    network.add_hub(hub("ORPHAN", HubTier::District)).unwrap();
    network
        .connect("N", "R", Route::new(10.0, &config.trunk_link))
        .unwrap();
    network
        .connect("R", "LINKED", Route::new(10.0, &config.feeder_link))
        .unwrap();

    let report = BottleneckAnalyzer::new(&config).analyze(&network);

    assert_eq!(report.connectivity_issues.len(), 1);
    assert_eq!(report.connectivity_issues[0].hub, "ORPHAN");
    assert_eq!(report.connectivity_issues[0].issue, "No incoming routes");
}

#[test]
fn test_analysis_does_not_change_network() {
    let config = Config::new();
    let network = build(&config, &[("A", 4), ("B", 7)]);

    let first = BottleneckAnalyzer::new(&config).analyze(&network);
    let second = BottleneckAnalyzer::new(&config).analyze(&network);
    assert_eq!(first, second);
    assert_eq!(network.node_count(), 1 + 4 + 2);
}
