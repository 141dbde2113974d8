//! Distribution hubs and the registry that owns hub identity.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::BuildError;
use crate::geo::GeoPoint;

/// Tier of a hub in the national -> regional -> district hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubTier {
    National,
    Regional,
    District,
}

impl HubTier {
    /// The tier directly below this one, if any.
    pub fn child(&self) -> Option<HubTier> {
        match self {
            HubTier::National => Some(HubTier::Regional),
            HubTier::Regional => Some(HubTier::District),
            HubTier::District => None,
        }
    }
}

impl fmt::Display for HubTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HubTier::National => "national",
            HubTier::Regional => "regional",
            HubTier::District => "district",
        };
        f.write_str(name)
    }
}

/// A storage and dispatch point in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionHub {
    pub name: String,
    pub district: String,
    pub tier: HubTier,
    pub location: GeoPoint,
    /// Storage capacity in units
    pub capacity: u64,
    pub cold_chain: bool,
    pub staff_count: u32,
}

impl DistributionHub {
    /// Create a hub from its attributes.
    pub fn new(
        name: String,
        district: String,
        tier: HubTier,
        location: GeoPoint,
        capacity: u64,
        cold_chain: bool,
        staff_count: u32,
    ) -> Self {
        DistributionHub {
            name,
            district,
            tier,
            location,
            capacity,
            cold_chain,
            staff_count,
        }
    }

    /// Conventional hub name for a district.
    pub fn district_hub_name(district: &str) -> String {
        format!("{}_District_Hub", district)
    }
}

/// Maps hub names and district names to graph nodes.
///
/// Enforces unique hub names and a single national hub.
#[derive(Debug, Clone, Default)]
pub struct HubRegistry {
    by_name: BTreeMap<String, NodeIndex>,
    districts: BTreeMap<String, NodeIndex>,
    national: Option<(String, NodeIndex)>,
}

impl HubRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        HubRegistry::default()
    }

    /// Record a hub that has been placed at `index`.
    pub fn register(&mut self, hub: &DistributionHub, index: NodeIndex) -> Result<(), BuildError> {
        if self.by_name.contains_key(&hub.name) {
            return Err(BuildError::DuplicateHub(hub.name.clone()));
        }

        match hub.tier {
            HubTier::National => {
                if let Some((existing, _)) = &self.national {
                    return Err(BuildError::DuplicateNationalHub {
                        existing: existing.clone(),
                        name: hub.name.clone(),
                    });
                }
                self.national = Some((hub.name.clone(), index));
            }
            HubTier::District => {
                if self.districts.contains_key(&hub.district) {
                    return Err(BuildError::DuplicateHub(hub.name.clone()));
                }
                self.districts.insert(hub.district.clone(), index);
            }
            HubTier::Regional => {}
        }

        self.by_name.insert(hub.name.clone(), index);
        Ok(())
    }

    /// Node of the hub named `name`.
    pub fn get(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    /// Node of the district hub serving `district`.
    pub fn district(&self, district: &str) -> Option<NodeIndex> {
        self.districts.get(district).copied()
    }

    /// Node of the national hub, once registered.
    pub fn national(&self) -> Option<NodeIndex> {
        self.national.as_ref().map(|(_, index)| *index)
    }

    /// Number of registered hubs.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no hub has been registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
