//! The hub graph and its construction from facility records.

use log::{debug, info, warn};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{Config, LinkSpec};
use crate::error::BuildError;
use crate::geo::{self, GeoPoint};
use crate::hub::{DistributionHub, HubRegistry, HubTier};
use crate::records::{CoordinateProvider, FacilityRecord};

/// How goods move along a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Truck,
    Motorcycle,
    Bicycle,
    Foot,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportMode::Truck => "truck",
            TransportMode::Motorcycle => "motorcycle",
            TransportMode::Bicycle => "bicycle",
            TransportMode::Foot => "foot",
        };
        f.write_str(name)
    }
}

/// A directed route from a parent-tier hub to a child-tier hub.
///
/// `cost` and `time_hours` are derived once from the distance and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance_km: f64,
    pub mode: TransportMode,
    pub cost_per_km: f64,
    pub cost: f64,
    pub time_hours: f64,
    pub reliability: f64,
}

impl Route {
    /// Route of `distance_km` priced with the given link parameters.
    pub fn new(distance_km: f64, link: &LinkSpec) -> Self {
        Route {
            distance_km,
            mode: link.mode,
            cost_per_km: link.cost_per_km,
            cost: distance_km * link.cost_per_km,
            time_hours: distance_km / link.speed_kmh,
            reliability: link.reliability,
        }
    }
}

/// Aggregate figures describing a built network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub national_hubs: usize,
    pub regional_hubs: usize,
    pub district_hubs: usize,
    pub routes: usize,
    pub total_capacity: u64,
    pub cold_chain_hubs: usize,
    pub total_route_km: f64,
}

/// Directed hub graph rooted at the national hub.
#[derive(Debug, Clone, Default)]
pub struct DistributionNetwork {
    graph: DiGraph<DistributionHub, Route>,
    registry: HubRegistry,
}

impl DistributionNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        DistributionNetwork::default()
    }

    /// Read-only access to the underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<DistributionHub, Route> {
        &self.graph
    }

    /// Name and district lookup for the hubs in this network.
    pub fn registry(&self) -> &HubRegistry {
        &self.registry
    }

    /// Add a hub, enforcing unique names and a single national hub.
    pub fn add_hub(&mut self, hub: DistributionHub) -> Result<NodeIndex, BuildError> {
        // Reserve the index before inserting so a rejected hub leaves no node behind.
        let index = NodeIndex::new(self.graph.node_count());
        self.registry.register(&hub, index)?;
        Ok(self.graph.add_node(hub))
    }

    /// Add a route between two named hubs. The route must descend exactly one tier.
    pub fn connect(&mut self, from: &str, to: &str, route: Route) -> Result<EdgeIndex, BuildError> {
        let a = self
            .registry
            .get(from)
            .ok_or_else(|| BuildError::UnknownHub(from.to_string()))?;
        let b = self
            .registry
            .get(to)
            .ok_or_else(|| BuildError::UnknownHub(to.to_string()))?;

        if self.graph[a].tier.child() != Some(self.graph[b].tier) {
            return Err(BuildError::InvalidRoute {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        Ok(self.graph.add_edge(a, b, route))
    }

    /// Check the tree invariants: one national hub, at least one regional hub,
    /// and exactly one parent route into every non-national hub.
    pub fn validate(&self) -> Result<(), BuildError> {
        self.registry.national().ok_or(BuildError::MissingNationalHub)?;

        if self.hubs_of_tier(HubTier::Regional).next().is_none() {
            return Err(BuildError::NoRegionalHubs);
        }

        for index in self.graph.node_indices() {
            let hub = &self.graph[index];
            if hub.tier == HubTier::National {
                continue;
            }
            let parents = self.in_degree(index);
            if parents != 1 {
                return Err(BuildError::OrphanDistrict {
                    hub: hub.name.clone(),
                    parents,
                });
            }
        }

        Ok(())
    }

    /// Number of hubs.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of routes.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Graph node of the hub named `name`.
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.registry.get(name)
    }

    /// The hub named `name`.
    pub fn hub(&self, name: &str) -> Option<&DistributionHub> {
        self.registry.get(name).map(|i| &self.graph[i])
    }

    /// The district hub serving `district`, if one was built.
    pub fn district_hub(&self, district: &str) -> Option<&DistributionHub> {
        self.registry.district(district).map(|i| &self.graph[i])
    }

    /// The single national hub, if present.
    pub fn national_hub(&self) -> Option<&DistributionHub> {
        self.registry.national().map(|i| &self.graph[i])
    }

    /// All hubs in insertion order.
    pub fn hubs(&self) -> impl Iterator<Item = (NodeIndex, &DistributionHub)> {
        self.graph
            .node_indices()
            .map(move |i| (i, &self.graph[i]))
    }

    /// Hubs of one tier in insertion order.
    pub fn hubs_of_tier(&self, tier: HubTier) -> impl Iterator<Item = (NodeIndex, &DistributionHub)> {
        self.hubs().filter(move |(_, hub)| hub.tier == tier)
    }

    /// All routes as `(from, to, route)`.
    pub fn routes(&self) -> impl Iterator<Item = (&DistributionHub, &DistributionHub, &Route)> {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    /// Route between two named hubs, if directly connected.
    pub fn route(&self, from: &str, to: &str) -> Option<&Route> {
        let a = self.registry.get(from)?;
        let b = self.registry.get(to)?;
        self.graph.find_edge(a, b).map(|e| &self.graph[e])
    }

    /// Number of routes arriving at `index`.
    pub fn in_degree(&self, index: NodeIndex) -> usize {
        self.graph
            .neighbors_directed(index, Direction::Incoming)
            .count()
    }

    /// Hub counts, capacity and route length totals.
    pub fn summary(&self) -> NetworkSummary {
        let mut summary = NetworkSummary {
            routes: self.edge_count(),
            total_route_km: self.graph.edge_weights().map(|r| r.distance_km).sum(),
            ..NetworkSummary::default()
        };

        for (_, hub) in self.hubs() {
            match hub.tier {
                HubTier::National => summary.national_hubs += 1,
                HubTier::Regional => summary.regional_hubs += 1,
                HubTier::District => summary.district_hubs += 1,
            }
            summary.total_capacity = summary.total_capacity.saturating_add(hub.capacity);
            if hub.cold_chain {
                summary.cold_chain_hubs += 1;
            }
        }

        summary
    }
}

/// Builds a [`DistributionNetwork`] from facility records.
pub struct NetworkBuilder<'a> {
    config: &'a Config,
}

impl<'a> NetworkBuilder<'a> {
    /// Builder using the topology and tariffs in `config`.
    pub fn new(config: &'a Config) -> Self {
        NetworkBuilder { config }
    }

    /// Build the national hub, one regional hub per configured region and one
    /// district hub per usable facility record, each attached to its nearest
    /// regional hub.
    pub fn build<C: CoordinateProvider + ?Sized>(
        &self,
        facilities: &[FacilityRecord],
        coordinates: &C,
    ) -> Result<DistributionNetwork, BuildError> {
        let config = self.config;
        let mut network = DistributionNetwork::new();

        if config.regions.is_empty() {
            return Err(BuildError::NoRegionalHubs);
        }

        network.add_hub(DistributionHub::new(
            config.national_hub_name.clone(),
            config.national_district.clone(),
            HubTier::National,
            config.national_location,
            config.national_capacity,
            true,
            config.national_staff,
        ))?;

        let mut regional: Vec<(String, GeoPoint)> = Vec::with_capacity(config.regions.len());
        for region in &config.regions {
            let name = region.hub_name();
            network.add_hub(DistributionHub::new(
                name.clone(),
                region.anchor_district.clone(),
                HubTier::Regional,
                region.location,
                config.regional_capacity,
                true,
                config.regional_staff,
            ))?;

            let distance = geo::distance_km(config.national_location, region.location);
            network.connect(
                &config.national_hub_name,
                &name,
                Route::new(distance, &config.trunk_link),
            )?;
            regional.push((name, region.location));
        }

        let regional_points: Vec<GeoPoint> = regional.iter().map(|(_, p)| *p).collect();

        if facilities.len() > config.max_district_hubs {
            warn!(
                "only the first {} of {} facility records are used",
                config.max_district_hubs,
                facilities.len()
            );
        }

        for (i, record) in facilities.iter().take(config.max_district_hubs).enumerate() {
            let district = match record.district_name() {
                Some(name) => name,
                None => {
                    warn!("skipping facility record #{} without a district name", i);
                    continue;
                }
            };

            if network.district_hub(district).is_some() {
                warn!("skipping facility record #{}: district {} already has a hub", i, district);
                continue;
            }

            let location = coordinates
                .locate(district)
                .ok_or_else(|| BuildError::MissingCoordinates {
                    district: district.to_string(),
                })?;

            let hub = self.district_hub(district, location, record.total_facilities());
            let hub_name = hub.name.clone();
            network.add_hub(hub)?;

            let (nearest, distance) =
                geo::nearest(location, &regional_points).ok_or(BuildError::NoRegionalHubs)?;
            let parent = &regional[nearest].0;
            debug!("{} -> {} ({:.1} km)", parent, hub_name, distance);
            network.connect(parent, &hub_name, Route::new(distance, &config.feeder_link))?;
        }

        network.validate()?;

        let summary = network.summary();
        info!(
            "built network: {} regional hubs, {} district hubs, {} routes",
            summary.regional_hubs, summary.district_hubs, summary.routes
        );

        Ok(network)
    }

    fn district_hub(&self, district: &str, location: GeoPoint, facilities: u64) -> DistributionHub {
        let config = self.config;
        let staff = match facilities.checked_div(u64::from(config.facilities_per_staff)) {
            Some(staff) => u32::try_from(staff).unwrap_or(u32::MAX),
            None => 0,
        }
        .max(config.min_district_staff);

        DistributionHub::new(
            DistributionHub::district_hub_name(district),
            district.to_string(),
            HubTier::District,
            location,
            facilities.saturating_mul(config.capacity_per_facility),
            facilities > u64::from(config.cold_chain_facility_threshold),
            staff,
        )
    }
}
