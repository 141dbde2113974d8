//! Configuration parameters for network construction, allocation and analysis.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::LoadError;
use crate::geo::GeoPoint;
use crate::network::TransportMode;

/// A predefined region, anchored at a named reference district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub anchor_district: String,
    pub location: GeoPoint,
}

impl RegionSpec {
    /// Region `name` anchored at `anchor_district`.
    pub fn new(name: &str, anchor_district: &str, lat: f64, lon: f64) -> Self {
        RegionSpec {
            name: name.to_string(),
            anchor_district: anchor_district.to_string(),
            location: GeoPoint::new(lat, lon),
        }
    }

    /// Name of the regional hub serving this region.
    pub fn hub_name(&self) -> String {
        format!("{}_Regional_Hub", self.name)
    }
}

/// Tariff and speed assumptions for one tier of routes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub mode: TransportMode,
    /// Cost per kilometre
    pub cost_per_km: f64,
    /// Assumed average speed in km/h
    pub speed_kmh: f64,
    /// Reliability score in [0, 1]
    pub reliability: f64,
}

/// Configuration settings for a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the single national hub
    pub national_hub_name: String,
    /// District hosting the national hub
    pub national_district: String,
    pub national_location: GeoPoint,
    pub national_capacity: u64,
    pub national_staff: u32,
    /// Regions, each served by one regional hub
    pub regions: Vec<RegionSpec>,
    pub regional_capacity: u64,
    pub regional_staff: u32,
    /// National to regional routes
    pub trunk_link: LinkSpec,
    /// Regional to district routes
    pub feeder_link: LinkSpec,
    /// Storage units per health facility in a district
    pub capacity_per_facility: u64,
    /// Districts with more facilities than this get cold chain
    pub cold_chain_facility_threshold: u32,
    pub min_district_staff: u32,
    /// Facilities per staff member at district hubs
    pub facilities_per_staff: u32,
    /// Cap on facility records turned into district hubs
    pub max_district_hubs: usize,
    /// Handling fee per allocated unit
    pub handling_cost_per_unit: f64,
    /// Minimum viable storage at a district hub
    pub min_district_capacity: u64,
    /// Routes below this reliability are flagged
    pub reliability_threshold: f64,
    /// Target share of district hubs with cold chain
    pub cold_chain_target: f64,
    pub connectivity_fix_cost: f64,
    pub capacity_upgrade_cost_per_unit: f64,
    pub cold_chain_cost_per_hub: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            national_hub_name: "National_Medical_Stores".to_string(),
            national_district: "KAMPALA".to_string(),
            national_location: GeoPoint::new(0.3476, 32.5825),
            national_capacity: 1_000_000,
            national_staff: 50,
            regions: vec![
                RegionSpec::new("Central", "KAMPALA", 0.3476, 32.5825),
                RegionSpec::new("Eastern", "MBALE", 1.0821, 34.1758),
                RegionSpec::new("Northern", "GULU", 2.7809, 32.2995),
                RegionSpec::new("Western", "MBARARA", -0.6118, 30.6587),
            ],
            regional_capacity: 200_000,
            regional_staff: 20,
            trunk_link: LinkSpec {
                mode: TransportMode::Truck,
                cost_per_km: 0.5,
                speed_kmh: 60.0,
                reliability: 0.95,
            },
            feeder_link: LinkSpec {
                mode: TransportMode::Truck,
                cost_per_km: 0.3,
                speed_kmh: 40.0,
                reliability: 0.85,
            },
            capacity_per_facility: 1000,
            cold_chain_facility_threshold: 10,
            min_district_staff: 2,
            facilities_per_staff: 5,
            max_district_hubs: 50,
            handling_cost_per_unit: 0.1,
            min_district_capacity: 5000,
            reliability_threshold: 0.8,
            cold_chain_target: 0.5,
            connectivity_fix_cost: 50_000.0,
            capacity_upgrade_cost_per_unit: 10.0,
            cold_chain_cost_per_hub: 25_000.0,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Replace the region partition.
    pub fn with_regions(mut self, regions: Vec<RegionSpec>) -> Self {
        self.regions = regions;
        self
    }

    /// Move the national hub.
    pub fn with_national_location(mut self, location: GeoPoint) -> Self {
        self.national_location = location;
        self
    }

    /// Set the national to regional link parameters.
    pub fn with_trunk_link(mut self, link: LinkSpec) -> Self {
        self.trunk_link = link;
        self
    }

    /// Set the regional to district link parameters.
    pub fn with_feeder_link(mut self, link: LinkSpec) -> Self {
        self.feeder_link = link;
        self
    }

    /// Set the cap on district hubs.
    pub fn with_max_district_hubs(mut self, max: usize) -> Self {
        self.max_district_hubs = max;
        self
    }

    /// Set the per-unit handling fee.
    pub fn with_handling_cost_per_unit(mut self, cost: f64) -> Self {
        self.handling_cost_per_unit = cost;
        self
    }

    /// Set the minimum viable district capacity.
    pub fn with_min_district_capacity(mut self, capacity: u64) -> Self {
        self.min_district_capacity = capacity;
        self
    }

    /// Set the route reliability threshold.
    pub fn with_reliability_threshold(mut self, threshold: f64) -> Self {
        self.reliability_threshold = threshold;
        self
    }

    /// Set the target cold-chain coverage.
    pub fn with_cold_chain_target(mut self, target: f64) -> Self {
        self.cold_chain_target = target;
        self
    }
}
