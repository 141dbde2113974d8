//! Tests for network construction and its structural invariants.

use hub_allocation::config::{Config, LinkSpec, RegionSpec};
use hub_allocation::error::BuildError;
use hub_allocation::geo::{distance_km, GeoPoint};
use hub_allocation::hub::{DistributionHub, HubTier};
use hub_allocation::network::{DistributionNetwork, NetworkBuilder, Route, TransportMode};
use hub_allocation::records::{FacilityRecord, StaticCoordinates, StubCoordinates};

/// The sample districts used throughout: Kampala area, Jinja and Gulu.
fn sample_facilities() -> Vec<FacilityRecord> {
    vec![
        FacilityRecord::new("KAMPALA", 15, 30, 20, 10, 5),
        FacilityRecord::new("WAKISO", 12, 25, 15, 8, 3),
        FacilityRecord::new("MUKONO", 10, 20, 12, 5, 2),
        FacilityRecord::new("JINJA", 8, 15, 10, 4, 2),
        FacilityRecord::new("GULU", 5, 12, 8, 3, 1),
    ]
}

fn sample_coordinates() -> StaticCoordinates {
    StaticCoordinates::new()
        .with("KAMPALA", 0.3476, 32.5825)
        .with("WAKISO", 0.4044, 32.4594)
        .with("MUKONO", 0.3533, 32.7553)
        .with("JINJA", 0.4479, 33.2026)
        .with("GULU", 2.7809, 32.2995)
}

fn build_sample() -> DistributionNetwork {
    let config = Config::new();
    NetworkBuilder::new(&config)
        .build(&sample_facilities(), &sample_coordinates())
        .unwrap()
}

#[test]
fn test_build_creates_three_tiers() {
    let network = build_sample();

    assert_eq!(network.node_count(), 1 + 4 + 5);
    assert_eq!(network.edge_count(), 4 + 5);

    let summary = network.summary();
    assert_eq!(summary.national_hubs, 1);
    assert_eq!(summary.regional_hubs, 4);
    assert_eq!(summary.district_hubs, 5);
    assert_eq!(summary.routes, 9);

    let national = network.national_hub().unwrap();
    assert_eq!(national.name, "National_Medical_Stores");
    assert_eq!(national.capacity, 1_000_000);
    assert!(national.cold_chain);
}

#[test]
fn test_district_hub_attributes() {
    let network = build_sample();

    // 15 + 30 + 20 + 10 + 5 = 80 facilities
    let kampala = network.district_hub("KAMPALA").unwrap();
    assert_eq!(kampala.name, "KAMPALA_District_Hub");
    assert_eq!(kampala.tier, HubTier::District);
    assert_eq!(kampala.capacity, 80_000);
    assert!(kampala.cold_chain);
    assert_eq!(kampala.staff_count, 16);
}

#[test]
fn test_small_district_has_no_cold_chain() {
    let config = Config::new();
    let facilities = vec![
        FacilityRecord::new("TEN", 10, 0, 0, 0, 0),
        FacilityRecord::new("ELEVEN", 11, 0, 0, 0, 0),
    ];
    let coordinates = StaticCoordinates::new()
        .with("TEN", 0.5, 32.5)
        .with("ELEVEN", 0.6, 32.6);

    let network = NetworkBuilder::new(&config)
        .build(&facilities, &coordinates)
        .unwrap();

    let ten = network.district_hub("TEN").unwrap();
    assert!(!ten.cold_chain);
    assert_eq!(ten.staff_count, 2);
    assert!(network.district_hub("ELEVEN").unwrap().cold_chain);
}

#[test]
fn test_trunk_routes_are_priced_from_distance() {
    let config = Config::new();
    let network = build_sample();

    let eastern = network
        .route("National_Medical_Stores", "Eastern_Regional_Hub")
        .unwrap();
    let expected = distance_km(config.national_location, GeoPoint::new(1.0821, 34.1758));

    assert!((eastern.distance_km - expected).abs() < 1e-9);
    assert!((eastern.cost - expected * 0.5).abs() < 1e-9);
    assert!((eastern.time_hours - expected / 60.0).abs() < 1e-9);
    assert_eq!(eastern.reliability, 0.95);
    assert_eq!(eastern.mode, TransportMode::Truck);

    // The central regional hub sits on top of the national hub
    let central = network
        .route("National_Medical_Stores", "Central_Regional_Hub")
        .unwrap();
    assert_eq!(central.cost, 0.0);
}

#[test]
fn test_district_attaches_to_nearest_region() {
    let network = build_sample();

    let gulu = network
        .route("Northern_Regional_Hub", "GULU_District_Hub")
        .unwrap();
    assert_eq!(gulu.distance_km, 0.0);
    assert_eq!(gulu.reliability, 0.85);

    let jinja = network
        .route("Central_Regional_Hub", "JINJA_District_Hub")
        .unwrap();
    assert!((jinja.cost - jinja.distance_km * 0.3).abs() < 1e-9);
    assert!((jinja.time_hours - jinja.distance_km / 40.0).abs() < 1e-9);

    assert!(network
        .route("Eastern_Regional_Hub", "JINJA_District_Hub")
        .is_none());
}

#[test]
fn test_every_district_has_one_parent() {
    let network = build_sample();

    for (index, hub) in network.hubs_of_tier(HubTier::District) {
        assert_eq!(network.in_degree(index), 1, "{} has wrong in-degree", hub.name);
    }
    assert!(network.validate().is_ok());
}

#[test]
fn test_build_is_deterministic() {
    let first = build_sample();
    let second = build_sample();

    let hubs_a: Vec<_> = first.hubs().map(|(_, h)| h.clone()).collect();
    let hubs_b: Vec<_> = second.hubs().map(|(_, h)| h.clone()).collect();
    assert_eq!(hubs_a, hubs_b);

    let routes_a: Vec<_> = first.routes().map(|(_, _, r)| r.clone()).collect();
    let routes_b: Vec<_> = second.routes().map(|(_, _, r)| r.clone()).collect();
    assert_eq!(routes_a, routes_b);
}

#[test]
fn test_stub_coordinates_are_reproducible() {
    let config = Config::new();
    let facilities = sample_facilities();

    let first = NetworkBuilder::new(&config)
        .build(&facilities, &StubCoordinates::seeded(7))
        .unwrap();
    let second = NetworkBuilder::new(&config)
        .build(&facilities, &StubCoordinates::seeded(7))
        .unwrap();

    let costs_a: Vec<f64> = first.routes().map(|(_, _, r)| r.cost).collect();
    let costs_b: Vec<f64> = second.routes().map(|(_, _, r)| r.cost).collect();
    assert_eq!(costs_a, costs_b);
}

#[test]
fn test_record_without_district_is_skipped() {
    let config = Config::new();
    let mut facilities = sample_facilities();
    facilities.insert(1, FacilityRecord::default());
    facilities.push(FacilityRecord {
        district: Some("   ".to_string()),
        ..FacilityRecord::default()
    });

    let network = NetworkBuilder::new(&config)
        .build(&facilities, &sample_coordinates())
        .unwrap();
    assert_eq!(network.summary().district_hubs, 5);
}

#[test]
fn test_missing_coordinates_fail_the_build() {
    let config = Config::new();
    let mut facilities = sample_facilities();
    facilities.push(FacilityRecord::new("ATLANTIS", 1, 1, 1, 1, 1));

    let result = NetworkBuilder::new(&config).build(&facilities, &sample_coordinates());
    match result {
        Err(BuildError::MissingCoordinates { district }) => assert_eq!(district, "ATLANTIS"),
        other => panic!("expected missing coordinates, got {:?}", other.map(|n| n.node_count())),
    }
}

#[test]
fn test_district_cap_limits_records() {
    let config = Config::new().with_max_district_hubs(3);
    let network = NetworkBuilder::new(&config)
        .build(&sample_facilities(), &sample_coordinates())
        .unwrap();

    assert_eq!(network.summary().district_hubs, 3);
    assert!(network.district_hub("JINJA").is_none());
    assert!(network.district_hub("GULU").is_none());
}

#[test]
fn test_duplicate_district_row_is_skipped() {
    let config = Config::new();
    let mut facilities = sample_facilities();
    facilities.push(FacilityRecord::new("GULU", 1, 1, 1, 1, 1));

    let network = NetworkBuilder::new(&config)
        .build(&facilities, &sample_coordinates())
        .unwrap();

    assert_eq!(network.summary().district_hubs, 5);
    let gulu = network.hub("GULU_District_Hub").unwrap();
    // First row wins: 5 + 12 + 8 + 3 + 1 = 29 facilities
    assert_eq!(gulu.capacity, 29_000);
    assert_eq!(network.in_degree(network.index_of("GULU_District_Hub").unwrap()), 1);
}

#[test]
fn test_huge_facility_counts_do_not_overflow() {
    let config = Config::new();
    let facilities = vec![FacilityRecord::new("HUGE", u32::MAX, 1, 0, 0, 0)];
    let coordinates = StaticCoordinates::new().with("HUGE", 0.3476, 32.5825);

    let expected = u64::from(u32::MAX) + 1;
    assert_eq!(facilities[0].total_facilities(), expected);

    let network = NetworkBuilder::new(&config)
        .build(&facilities, &coordinates)
        .unwrap();

    let hub = network.district_hub("HUGE").unwrap();
    assert_eq!(hub.capacity, expected * 1000);
    assert!(hub.cold_chain);
    assert_eq!(u64::from(hub.staff_count), expected / 5);
}

#[test]
fn test_no_regions_is_rejected() {
    let config = Config::new().with_regions(Vec::new());
    let result = NetworkBuilder::new(&config).build(&sample_facilities(), &sample_coordinates());
    assert!(matches!(result, Err(BuildError::NoRegionalHubs)));
}

#[test]
fn test_custom_topology() {
    let config = Config::new()
        .with_national_location(GeoPoint::new(0.0, 0.0))
        .with_regions(vec![
            RegionSpec::new("West", "W", 0.0, -1.0),
            RegionSpec::new("East", "E", 0.0, 1.0),
        ])
        .with_feeder_link(LinkSpec {
            mode: TransportMode::Motorcycle,
            cost_per_km: 1.0,
            speed_kmh: 30.0,
            reliability: 0.7,
        });
    let coordinates = StaticCoordinates::new().with("NEAR_EAST", 0.0, 0.9);
    let facilities = vec![FacilityRecord::new("NEAR_EAST", 2, 0, 0, 0, 0)];

    let network = NetworkBuilder::new(&config)
        .build(&facilities, &coordinates)
        .unwrap();

    let route = network
        .route("East_Regional_Hub", "NEAR_EAST_District_Hub")
        .unwrap();
    assert_eq!(route.mode, TransportMode::Motorcycle);
    assert!((route.cost - route.distance_km).abs() < 1e-9);
    assert_eq!(network.summary().regional_hubs, 2);
}

fn hub(name: &str, tier: HubTier) -> DistributionHub {
    DistributionHub::new(
        name.to_string(),
        name.to_string(),
        tier,
        GeoPoint::new(0.0, 0.0),
        1000,
        false,
        2,
    )
}

#[test]
fn test_second_national_hub_is_rejected() {
    let mut network = DistributionNetwork::new();
    network.add_hub(hub("N1", HubTier::National)).unwrap();

    let result = network.add_hub(hub("N2", HubTier::National));
    assert!(matches!(result, Err(BuildError::DuplicateNationalHub { .. })));
    assert_eq!(network.node_count(), 1);
}

#[test]
fn test_second_hub_for_same_district_is_rejected() {
    let mut network = DistributionNetwork::new();
    network.add_hub(hub("D", HubTier::District)).unwrap();

    let mut other = hub("D_Annex", HubTier::District);
    other.district = "D".to_string();
    let result = network.add_hub(other);
    assert!(matches!(result, Err(BuildError::DuplicateHub(name)) if name == "D_Annex"));
    assert_eq!(network.node_count(), 1);
}

#[test]
fn test_routes_must_descend_one_tier() {
    let config = Config::new();
    let mut network = DistributionNetwork::new();
    network.add_hub(hub("N", HubTier::National)).unwrap();
    network.add_hub(hub("R", HubTier::Regional)).unwrap();
    network.add_hub(hub("D", HubTier::District)).unwrap();

    let route = Route::new(10.0, &config.trunk_link);
    assert!(matches!(
        network.connect("N", "D", route.clone()),
        Err(BuildError::InvalidRoute { .. })
    ));
    assert!(matches!(
        network.connect("D", "R", route.clone()),
        Err(BuildError::InvalidRoute { .. })
    ));
    assert!(matches!(
        network.connect("N", "X", route.clone()),
        Err(BuildError::UnknownHub(_))
    ));
    assert!(network.connect("N", "R", route).is_ok());
}

#[test]
fn test_validate_flags_orphan_district() {
    let config = Config::new();
    let mut network = DistributionNetwork::new();
    network.add_hub(hub("N", HubTier::National)).unwrap();
    network.add_hub(hub("R", HubTier::Regional)).unwrap();
    network.add_hub(hub("D", HubTier::District)).unwrap();
    network
        .connect("N", "R", Route::new(10.0, &config.trunk_link))
        .unwrap();

    match network.validate() {
        Err(BuildError::OrphanDistrict { hub, parents }) => {
            assert_eq!(hub, "D");
            assert_eq!(parents, 0);
        }
        other => panic!("expected orphan district, got {:?}", other),
    }
}

#[test]
fn test_validate_requires_national_hub() {
    let network = DistributionNetwork::new();
    assert!(matches!(network.validate(), Err(BuildError::MissingNationalHub)));
}
