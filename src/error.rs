//! Error types for network construction, routing and input loading.

use thiserror::Error;

/// Structural failures while assembling the hub graph. These abort the build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("hub {0} already exists")]
    DuplicateHub(String),

    #[error("a national hub already exists ({existing}); refusing to add {name}")]
    DuplicateNationalHub { existing: String, name: String },

    #[error("network has no national hub")]
    MissingNationalHub,

    #[error("no regional hubs configured; district hubs cannot be parented")]
    NoRegionalHubs,

    #[error("no coordinates available for district {district}")]
    MissingCoordinates { district: String },

    #[error("unknown hub {0}")]
    UnknownHub(String),

    #[error("route {from} -> {to} does not go from parent tier to child tier")]
    InvalidRoute { from: String, to: String },

    #[error("hub {hub} has {parents} parent routes, expected exactly one")]
    OrphanDistrict { hub: String, parents: usize },
}

/// Reasons a path could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("hub {0} is not in the network")]
    UnknownHub(String),

    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },
}

/// Failures reading configuration or input records from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
