//! Budget-constrained allocation of supply units across district demands.

use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::network::DistributionNetwork;
use crate::records::PopulationRecord;
use crate::routing::{shortest_path, Path, RouteWeight};

/// Remaining budget at or below this is treated as exhausted.
const BUDGET_EPSILON: f64 = 1e-9;

/// Requested units per district.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandMap(BTreeMap<String, u64>);

impl DemandMap {
    /// Create an empty demand map.
    pub fn new() -> Self {
        DemandMap::default()
    }

    /// Set the request for `district`, replacing any earlier one.
    pub fn insert(&mut self, district: &str, units: u64) {
        self.0.insert(district.to_string(), units);
    }

    /// Add a request, builder style.
    pub fn with(mut self, district: &str, units: u64) -> Self {
        self.insert(district, units);
        self
    }

    /// Units requested by `district`.
    pub fn get(&self, district: &str) -> Option<u64> {
        self.0.get(district).copied()
    }

    /// Requests in district name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(d, &u)| (d.as_str(), u))
    }

    /// Sum of all requests.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of districts with a request.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no requests.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Demand of `units_per_capita` per person, rounded up. Districts that
    /// come out at zero are left out.
    pub fn from_population(records: &[PopulationRecord], units_per_capita: f64) -> Self {
        records
            .iter()
            .filter_map(|r| {
                let units = (r.total_population as f64 * units_per_capita).ceil();
                (units >= 1.0).then(|| (r.district.clone(), units as u64))
            })
            .collect()
    }
}

impl FromIterator<(String, u64)> for DemandMap {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        DemandMap(iter.into_iter().collect())
    }
}

/// Units routed to one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAssignment {
    pub district: String,
    /// Hub names from the national hub to the district hub
    pub path: Vec<String>,
    pub units: u64,
    pub units_requested: u64,
    /// Route plus handling cost for the granted units
    pub cost: f64,
    pub time_hours: f64,
    pub priority: bool,
    pub partial: bool,
}

/// Result of one allocation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Assignments in processing order
    pub routes: Vec<RouteAssignment>,
    pub total_cost: f64,
    /// Longest single delivery; deliveries run concurrently
    pub total_time_hours: f64,
    /// Granted units as a percentage of requested units
    pub coverage: f64,
    /// Shortfall for every district not fully served
    pub unmet_demand: BTreeMap<String, u64>,
    pub budget: f64,
    pub remaining_budget: f64,
    pub units_requested: u64,
    pub units_granted: u64,
}

impl AllocationPlan {
    /// Units granted to `district`, zero if it received nothing.
    pub fn granted_for(&self, district: &str) -> u64 {
        self.routes
            .iter()
            .filter(|r| r.district == district)
            .map(|r| r.units)
            .sum()
    }

    /// Whether every request was met in full.
    pub fn is_fully_covered(&self) -> bool {
        self.unmet_demand.is_empty()
    }

    /// Units left unserved across all districts.
    pub fn total_unmet(&self) -> u64 {
        self.unmet_demand.values().sum()
    }
}

/// Budget threaded through the sequential allocation pass.
#[derive(Debug)]
struct BudgetState {
    remaining: f64,
    plan: AllocationPlan,
}

impl BudgetState {
    fn exhausted(&self) -> bool {
        self.remaining <= BUDGET_EPSILON
    }

    fn shortfall(mut self, district: &str, units: u64) -> Self {
        self.plan.unmet_demand.insert(district.to_string(), units);
        self
    }

    fn grant(mut self, assignment: RouteAssignment) -> Self {
        if assignment.partial {
            self.plan.unmet_demand.insert(
                assignment.district.clone(),
                assignment.units_requested - assignment.units,
            );
        }
        self.remaining = (self.remaining - assignment.cost).max(0.0);
        self.plan.total_cost += assignment.cost;
        self.plan.total_time_hours = self.plan.total_time_hours.max(assignment.time_hours);
        self.plan.units_granted += assignment.units;
        self.plan.routes.push(assignment);
        self
    }
}

/// Allocates a budget across district demands in priority order.
pub struct AllocationPlanner<'a> {
    network: &'a DistributionNetwork,
    config: &'a Config,
}

impl<'a> AllocationPlanner<'a> {
    /// Planner over `network` priced with `config`.
    pub fn new(network: &'a DistributionNetwork, config: &'a Config) -> Self {
        AllocationPlanner { network, config }
    }

    /// Produce a plan for `demand` within `budget`.
    ///
    /// Priority districts go first, then larger demands, then district name.
    /// Each district is fully served if affordable, otherwise partially served
    /// in proportion to the remaining budget. Missing hubs and unreachable hubs
    /// are recorded as unmet demand rather than returned as errors.
    pub fn allocate<S: AsRef<str>>(
        &self,
        demand: &DemandMap,
        budget: f64,
        priority: &[S],
    ) -> AllocationPlan {
        let is_priority = |district: &str| priority.iter().any(|p| p.as_ref() == district);
        let budget = budget.max(0.0);

        let initial = BudgetState {
            remaining: budget,
            plan: AllocationPlan {
                budget,
                units_requested: demand.total(),
                ..AllocationPlan::default()
            },
        };

        // Order matters from here on: each step sees the budget left by the previous one.
        let state = demand
            .iter()
            .filter(|&(_, units)| units > 0)
            .sorted_by_key(|&(district, units)| (!is_priority(district), Reverse(units), district))
            .fold(initial, |state, (district, units)| {
                self.step(state, district, units, is_priority(district))
            });

        let mut plan = state.plan;
        plan.remaining_budget = state.remaining;
        plan.coverage = if plan.units_requested > 0 {
            plan.units_granted as f64 / plan.units_requested as f64 * 100.0
        } else {
            0.0
        };

        info!(
            "allocated {}/{} units ({:.1}%) for {:.2} of {:.2}",
            plan.units_granted, plan.units_requested, plan.coverage, plan.total_cost, plan.budget
        );

        plan
    }

    fn step(&self, state: BudgetState, district: &str, units: u64, priority: bool) -> BudgetState {
        if state.exhausted() {
            debug!("{}: budget exhausted, {} units unmet", district, units);
            return state.shortfall(district, units);
        }

        let path = match self.route_to(district) {
            Some(path) => path,
            None => return state.shortfall(district, units),
        };

        let handling = units as f64 * self.config.handling_cost_per_unit;
        let total_cost = path.cost + handling;

        let assignment = |granted: u64, cost: f64, partial: bool| RouteAssignment {
            district: district.to_string(),
            path: path.hubs.clone(),
            units: granted,
            units_requested: units,
            cost,
            time_hours: path.time_hours,
            priority,
            partial,
        };

        if total_cost <= state.remaining {
            debug!("{}: {} units for {:.2}", district, units, total_cost);
            return state.grant(assignment(units, total_cost, false));
        }

        let affordable = (units as f64 * state.remaining / total_cost).floor() as u64;
        if affordable == 0 {
            debug!("{}: cannot afford a single unit", district);
            return state.shortfall(district, units);
        }

        let cost = (affordable as f64 / units as f64 * total_cost).min(state.remaining);
        debug!(
            "{}: partial {}/{} units for {:.2}",
            district, affordable, units, cost
        );
        state.grant(assignment(affordable, cost, true))
    }

    fn route_to(&self, district: &str) -> Option<Path> {
        let hub = match self.network.district_hub(district) {
            Some(hub) => hub,
            None => {
                debug!("{}: no district hub", district);
                return None;
            }
        };
        let national = self.network.national_hub()?;

        match shortest_path(self.network, &national.name, &hub.name, RouteWeight::Cost) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("{}: {}", district, e);
                None
            }
        }
    }
}
