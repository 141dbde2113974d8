//! Greedy, budget-bounded remediation proposals.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bottleneck::{BottleneckAnalyzer, BottleneckReport};
use crate::config::Config;
use crate::network::DistributionNetwork;

/// The bottleneck category a recommendation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Connectivity,
    Capacity,
    ColdChain,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecommendationKind::Connectivity => "connectivity",
            RecommendationKind::Capacity => "capacity",
            RecommendationKind::ColdChain => "cold_chain",
        };
        f.write_str(name)
    }
}

/// Expected effect of a remediation on service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
}

/// A funded remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    /// Human-readable description of the work
    pub action: String,
    pub cost: f64,
    pub impact: Impact,
    /// Expected duration, e.g. "1-2 months"
    pub timeline: String,
}

/// Turns bottleneck findings into funded remediations.
///
/// Tiers are visited in a fixed order (connectivity, capacity, cold chain)
/// against one running budget. A proposal that does not fit is dropped, never
/// revisited.
pub struct ImprovementRecommender<'a> {
    config: &'a Config,
}

impl<'a> ImprovementRecommender<'a> {
    /// Recommender using the remediation costs in `config`.
    pub fn new(config: &'a Config) -> Self {
        ImprovementRecommender { config }
    }

    /// Analyze `network` and recommend within `budget`.
    pub fn recommend(&self, network: &DistributionNetwork, budget: f64) -> Vec<Recommendation> {
        let report = BottleneckAnalyzer::new(self.config).analyze(network);
        self.recommend_from(&report, budget)
    }

    /// Recommend from an existing report.
    pub fn recommend_from(&self, report: &BottleneckReport, budget: f64) -> Vec<Recommendation> {
        let config = self.config;
        let mut candidates = Vec::new();

        for issue in &report.connectivity_issues {
            candidates.push(Recommendation {
                kind: RecommendationKind::Connectivity,
                action: format!("Establish distribution route to {}", issue.hub),
                cost: config.connectivity_fix_cost,
                impact: Impact::High,
                timeline: "1-2 months".to_string(),
            });
        }

        for constraint in &report.capacity_constraints {
            candidates.push(Recommendation {
                kind: RecommendationKind::Capacity,
                action: format!("Upgrade storage at {}", constraint.hub),
                cost: constraint.gap as f64 * config.capacity_upgrade_cost_per_unit,
                impact: Impact::Medium,
                timeline: "2-3 months".to_string(),
            });
        }

        if let Some(gap) = &report.cold_chain_gap {
            candidates.push(Recommendation {
                kind: RecommendationKind::ColdChain,
                action: format!(
                    "Install cold chain in {} districts",
                    gap.districts_needing_cold_chain
                ),
                cost: gap.districts_needing_cold_chain as f64 * config.cold_chain_cost_per_hub,
                impact: Impact::High,
                timeline: "3-6 months".to_string(),
            });
        }

        let mut remaining = budget;
        candidates
            .into_iter()
            .filter(|rec| {
                if rec.cost <= remaining {
                    remaining -= rec.cost;
                    true
                } else {
                    debug!("skipping {} ({:.0} > {:.0})", rec.action, rec.cost, remaining);
                    false
                }
            })
            .collect()
    }
}
