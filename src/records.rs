//! Typed input records and coordinate providers.
//!
//! Facility and population rows arrive from collaborators as loosely typed
//! JSON. Each row is decoded on its own so one bad row does not sink the
//! whole file; rejected rows are logged and dropped.

use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::LoadError;
use crate::geo::GeoPoint;

/// Health facility counts for one district.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "District", default)]
    pub district: Option<String>,
    #[serde(rename = "CLINIC", default)]
    pub clinic: Option<u32>,
    #[serde(rename = "HC_II", default)]
    pub hc_ii: Option<u32>,
    #[serde(rename = "HC_III", default)]
    pub hc_iii: Option<u32>,
    #[serde(rename = "HC_IV", default)]
    pub hc_iv: Option<u32>,
    #[serde(rename = "HOSPITAL", default)]
    pub hospital: Option<u32>,
}

impl FacilityRecord {
    /// Record with every facility count set.
    pub fn new(
        district: &str,
        clinic: u32,
        hc_ii: u32,
        hc_iii: u32,
        hc_iv: u32,
        hospital: u32,
    ) -> Self {
        FacilityRecord {
            district: Some(district.to_string()),
            clinic: Some(clinic),
            hc_ii: Some(hc_ii),
            hc_iii: Some(hc_iii),
            hc_iv: Some(hc_iv),
            hospital: Some(hospital),
        }
    }

    /// Trimmed district name, or `None` when absent or blank.
    pub fn district_name(&self) -> Option<&str> {
        self.district
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Sum of all facility counts; absent counts are zero.
    pub fn total_facilities(&self) -> u64 {
        [self.clinic, self.hc_ii, self.hc_iii, self.hc_iv, self.hospital]
            .iter()
            .map(|count| u64::from(count.unwrap_or(0)))
            .sum()
    }
}

/// Total population of one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    #[serde(rename = "ADM2_EN")]
    pub district: String,
    #[serde(rename = "T_TL", default)]
    pub total_population: u64,
}

impl PopulationRecord {
    /// Record for `district` with the given head count.
    pub fn new(district: &str, total_population: u64) -> Self {
        PopulationRecord {
            district: district.to_string(),
            total_population,
        }
    }
}

/// Source of district coordinates.
pub trait CoordinateProvider {
    /// Coordinates of `district`, or `None` if unknown.
    fn locate(&self, district: &str) -> Option<GeoPoint>;
}

/// Coordinates supplied by a geodata provider, keyed by district name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCoordinates {
    points: BTreeMap<String, GeoPoint>,
}

impl StaticCoordinates {
    /// Create an empty provider.
    pub fn new() -> Self {
        StaticCoordinates::default()
    }

    /// Set the location of `district`.
    pub fn insert(&mut self, district: &str, location: GeoPoint) {
        self.points.insert(district.to_string(), location);
    }

    /// Add a location, builder style.
    pub fn with(mut self, district: &str, lat: f64, lon: f64) -> Self {
        self.insert(district, GeoPoint::new(lat, lon));
        self
    }

    /// Number of located districts.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no district is located.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl CoordinateProvider for StaticCoordinates {
    fn locate(&self, district: &str) -> Option<GeoPoint> {
        self.points.get(district).copied()
    }
}

impl FromIterator<(String, GeoPoint)> for StaticCoordinates {
    fn from_iter<I: IntoIterator<Item = (String, GeoPoint)>>(iter: I) -> Self {
        StaticCoordinates {
            points: iter.into_iter().collect(),
        }
    }
}

/// TEST ONLY: seeded pseudo-random coordinates inside the Uganda bounding box.
///
/// Not a geodata source. Locations are stable per district within one
/// provider and identical across providers built with the same seed when
/// districts are queried in the same order.
#[derive(Debug)]
pub struct StubCoordinates {
    rng: RefCell<ChaCha8Rng>,
    assigned: RefCell<BTreeMap<String, GeoPoint>>,
}

impl StubCoordinates {
    pub const LAT_RANGE: (f64, f64) = (-1.5, 4.0);
    pub const LON_RANGE: (f64, f64) = (29.5, 35.0);

    /// Provider whose draws are fixed by `seed`.
    pub fn seeded(seed: u64) -> Self {
        StubCoordinates {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
            assigned: RefCell::new(BTreeMap::new()),
        }
    }
}

impl CoordinateProvider for StubCoordinates {
    fn locate(&self, district: &str) -> Option<GeoPoint> {
        if let Some(point) = self.assigned.borrow().get(district) {
            return Some(*point);
        }

        let mut rng = self.rng.borrow_mut();
        let point = GeoPoint::new(
            rng.gen_range(Self::LAT_RANGE.0..Self::LAT_RANGE.1),
            rng.gen_range(Self::LON_RANGE.0..Self::LON_RANGE.1),
        );
        self.assigned
            .borrow_mut()
            .insert(district.to_string(), point);
        Some(point)
    }
}

/// Decode a JSON array, dropping elements that do not fit `T`.
pub fn parse_records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, LoadError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(decode_rows(rows))
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<serde_json::Value>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("skipping malformed record #{}: {}", i, e);
                None
            }
        })
        .collect()
}

fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<serde_json::Value>, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Load facility records from a JSON array file.
pub fn load_facilities<P: AsRef<Path>>(path: P) -> Result<Vec<FacilityRecord>, LoadError> {
    Ok(decode_rows(read_rows(path)?))
}

/// Load population records from a JSON array file.
pub fn load_population<P: AsRef<Path>>(path: P) -> Result<Vec<PopulationRecord>, LoadError> {
    Ok(decode_rows(read_rows(path)?))
}

/// Load a `{"DISTRICT": {"lat": .., "lon": ..}}` coordinate file.
pub fn load_coordinates<P: AsRef<Path>>(path: P) -> Result<StaticCoordinates, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let points: BTreeMap<String, GeoPoint> = serde_json::from_reader(reader)?;
    Ok(points.into_iter().collect())
}
