//! # Hub Allocation
//!
//! Models a hierarchical supply network (national, regional and district
//! hubs), finds least-cost routes through it, and allocates a constrained
//! budget across competing district demands.
//!
//! The network is built once per planning run and is read-only afterwards.
//! Allocation, bottleneck analysis and improvement recommendations all take
//! the built network by shared reference.

pub mod allocation;
pub mod bottleneck;
pub mod config;
pub mod error;
pub mod geo;
pub mod hub;
pub mod network;
pub mod recommend;
pub mod records;
pub mod routing;
pub mod utils;

use crate::allocation::{AllocationPlan, AllocationPlanner, DemandMap};
use crate::bottleneck::{BottleneckAnalyzer, BottleneckReport};
use crate::config::Config;
use crate::error::{BuildError, RoutingError};
use crate::network::{DistributionNetwork, NetworkBuilder};
use crate::recommend::{ImprovementRecommender, Recommendation};
use crate::records::{CoordinateProvider, FacilityRecord};
use crate::routing::{shortest_path, Path, RouteWeight};

/// Owns a configuration and the network built from it.
pub struct SupplyChainPlanner {
    pub config: Config,
    pub network: DistributionNetwork,
}

impl SupplyChainPlanner {
    /// Build the network for `facilities`, locating districts with `coordinates`.
    pub fn new<C: CoordinateProvider + ?Sized>(
        config: Config,
        facilities: &[FacilityRecord],
        coordinates: &C,
    ) -> Result<Self, BuildError> {
        let network = NetworkBuilder::new(&config).build(facilities, coordinates)?;
        Ok(SupplyChainPlanner { config, network })
    }

    /// Least-cost path between two named hubs.
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<Path, RoutingError> {
        shortest_path(&self.network, from, to, RouteWeight::Cost)
    }

    /// Allocate `budget` across `demand`, serving `priority` districts first.
    pub fn allocate<S: AsRef<str>>(
        &self,
        demand: &DemandMap,
        budget: f64,
        priority: &[S],
    ) -> AllocationPlan {
        AllocationPlanner::new(&self.network, &self.config).allocate(demand, budget, priority)
    }

    /// Capacity, connectivity, reliability and cold-chain findings for the network.
    pub fn analyze_bottlenecks(&self) -> BottleneckReport {
        BottleneckAnalyzer::new(&self.config).analyze(&self.network)
    }

    /// Remediations that fit within `budget`, in fixed priority order.
    pub fn recommend_improvements(&self, budget: f64) -> Vec<Recommendation> {
        ImprovementRecommender::new(&self.config).recommend(&self.network, budget)
    }
}
