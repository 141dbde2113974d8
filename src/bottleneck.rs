//! Static analysis of structural weaknesses in a built network.

use log::debug;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::hub::HubTier;
use crate::network::DistributionNetwork;

/// A district hub below the minimum viable storage capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityConstraint {
    pub hub: String,
    pub current_capacity: u64,
    pub recommended: u64,
    pub gap: u64,
}

/// A district hub with no incoming route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityIssue {
    pub hub: String,
    pub issue: String,
}

/// A route whose reliability is below the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityConcern {
    pub from: String,
    pub to: String,
    pub reliability: f64,
    pub recommendation: String,
}

/// Shortfall of cold-chain capable district hubs against the target share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdChainGap {
    /// Share of district hubs with cold chain, in [0, 1]
    pub current_coverage: f64,
    pub target: f64,
    pub districts_needing_cold_chain: usize,
}

impl ColdChainGap {
    /// Share of district hubs lacking cold chain, as a percentage.
    pub fn gap_percent(&self) -> f64 {
        (1.0 - self.current_coverage) * 100.0
    }
}

/// Findings from one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BottleneckReport {
    pub capacity_constraints: Vec<CapacityConstraint>,
    pub connectivity_issues: Vec<ConnectivityIssue>,
    pub reliability_concerns: Vec<ReliabilityConcern>,
    pub cold_chain_gap: Option<ColdChainGap>,
}

impl BottleneckReport {
    /// Whether the pass found nothing.
    pub fn is_clean(&self) -> bool {
        self.capacity_constraints.is_empty()
            && self.connectivity_issues.is_empty()
            && self.reliability_concerns.is_empty()
            && self.cold_chain_gap.is_none()
    }

    /// Total findings; the cold-chain gap counts as one.
    pub fn finding_count(&self) -> usize {
        self.capacity_constraints.len()
            + self.connectivity_issues.len()
            + self.reliability_concerns.len()
            + usize::from(self.cold_chain_gap.is_some())
    }
}

/// Read-only analyzer; safe to run against a network shared with a planner.
pub struct BottleneckAnalyzer<'a> {
    config: &'a Config,
}

impl<'a> BottleneckAnalyzer<'a> {
    /// Analyzer using the thresholds in `config`.
    pub fn new(config: &'a Config) -> Self {
        BottleneckAnalyzer { config }
    }

    /// Run every check against `network`.
    pub fn analyze(&self, network: &DistributionNetwork) -> BottleneckReport {
        let report = BottleneckReport {
            capacity_constraints: self.capacity_constraints(network),
            connectivity_issues: self.connectivity_issues(network),
            reliability_concerns: self.reliability_concerns(network),
            cold_chain_gap: self.cold_chain_gap(network),
        };
        debug!("bottleneck analysis: {} findings", report.finding_count());
        report
    }

    fn capacity_constraints(&self, network: &DistributionNetwork) -> Vec<CapacityConstraint> {
        let floor = self.config.min_district_capacity;
        network
            .hubs_of_tier(HubTier::District)
            .filter(|(_, hub)| hub.capacity < floor)
            .map(|(_, hub)| CapacityConstraint {
                hub: hub.name.clone(),
                current_capacity: hub.capacity,
                recommended: floor,
                gap: floor - hub.capacity,
            })
            .collect()
    }

    fn connectivity_issues(&self, network: &DistributionNetwork) -> Vec<ConnectivityIssue> {
        network
            .hubs_of_tier(HubTier::District)
            .filter(|&(index, _)| network.in_degree(index) == 0)
            .map(|(_, hub)| ConnectivityIssue {
                hub: hub.name.clone(),
                issue: "No incoming routes".to_string(),
            })
            .collect()
    }

    fn reliability_concerns(&self, network: &DistributionNetwork) -> Vec<ReliabilityConcern> {
        let graph = network.graph();
        graph
            .edge_references()
            .filter(|e| e.weight().reliability < self.config.reliability_threshold)
            .map(|e| ReliabilityConcern {
                from: graph[e.source()].name.clone(),
                to: graph[e.target()].name.clone(),
                reliability: e.weight().reliability,
                recommendation: "Improve road conditions or add alternative route".to_string(),
            })
            .collect()
    }

    fn cold_chain_gap(&self, network: &DistributionNetwork) -> Option<ColdChainGap> {
        let (total, equipped) = network
            .hubs_of_tier(HubTier::District)
            .fold((0usize, 0usize), |(total, equipped), (_, hub)| {
                (total + 1, equipped + usize::from(hub.cold_chain))
            });

        if total == 0 {
            return None;
        }

        let coverage = equipped as f64 / total as f64;
        (coverage < self.config.cold_chain_target).then(|| ColdChainGap {
            current_coverage: coverage,
            target: self.config.cold_chain_target,
            districts_needing_cold_chain: total - equipped,
        })
    }
}
