//! Least-cost paths through the hub graph.

use petgraph::algo::astar;
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::network::{DistributionNetwork, Route};

/// Edge attribute minimised by [`shortest_path`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteWeight {
    #[default]
    Cost,
    Distance,
    Time,
}

impl RouteWeight {
    /// The weight of `route` under this criterion.
    pub fn of(&self, route: &Route) -> f64 {
        match self {
            RouteWeight::Cost => route.cost,
            RouteWeight::Distance => route.distance_km,
            RouteWeight::Time => route.time_hours,
        }
    }
}

/// A sequence of hubs with totals accumulated over its routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub hubs: Vec<String>,
    pub distance_km: f64,
    pub cost: f64,
    pub time_hours: f64,
    /// Product of route reliabilities
    pub reliability: f64,
}

impl Path {
    /// Number of routes traversed.
    pub fn hops(&self) -> usize {
        self.hubs.len().saturating_sub(1)
    }
}

/// Minimum-weight path between two named hubs.
///
/// The built network is a tree, so this is the unique parent chain, but the
/// search is a general weighted shortest path and accepts any topology with
/// non-negative weights.
pub fn shortest_path(
    network: &DistributionNetwork,
    from: &str,
    to: &str,
    weight: RouteWeight,
) -> Result<Path, RoutingError> {
    let start = network
        .index_of(from)
        .ok_or_else(|| RoutingError::UnknownHub(from.to_string()))?;
    let goal = network
        .index_of(to)
        .ok_or_else(|| RoutingError::UnknownHub(to.to_string()))?;

    let graph = network.graph();
    let (_, nodes) = astar(
        graph,
        start,
        |n| n == goal,
        |e| weight.of(e.weight()),
        |_| 0.0,
    )
    .ok_or_else(|| RoutingError::NoPath {
        from: from.to_string(),
        to: to.to_string(),
    })?;

    let mut path = Path {
        hubs: nodes.iter().map(|&n| graph[n].name.clone()).collect(),
        distance_km: 0.0,
        cost: 0.0,
        time_hours: 0.0,
        reliability: 1.0,
    };

    for pair in nodes.windows(2) {
        // parallel routes: take the one the search would have used
        let cheapest = graph
            .edges_connecting(pair[0], pair[1])
            .map(|e| e.weight())
            .min_by(|a, b| weight.of(a).total_cmp(&weight.of(b)));
        if let Some(route) = cheapest {
            path.distance_km += route.distance_km;
            path.cost += route.cost;
            path.time_hours += route.time_hours;
            path.reliability *= route.reliability;
        }
    }

    Ok(path)
}
