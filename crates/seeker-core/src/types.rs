//! Domain types shared by the data store, the controller and the CLI.
//!
//! Shops and brands are read-only on the client: they are replaced
//! wholesale on every fetch and never edited in place.

use serde::{Deserialize, Serialize};

use crate::CoreError;

pub type ShopId = i64;
pub type BrandId = i64;

/// A validated WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateRepr")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct CoordinateRepr {
    lat: f64,
    lng: f64,
}

impl TryFrom<CoordinateRepr> for Coordinate {
    type Error = CoreError;

    fn try_from(repr: CoordinateRepr) -> Result<Self, Self::Error> {
        Coordinate::new(repr.lat, repr.lng)
    }
}

impl Coordinate {
    /// Builds a coordinate, rejecting anything outside lat ∈ [-90, 90],
    /// lng ∈ [-180, 180] (NaN included).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Ok(Self { lat, lng })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// The visible map rectangle, recomputed on every viewport settle.
///
/// Edges are stored as south ≤ north and west ≤ east. Viewports that wrap
/// the antimeridian are rejected rather than split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportBounds {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

impl ViewportBounds {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBounds`] if an edge is out of range or the
    /// edges are inverted.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Result<Self, CoreError> {
        let south_west = Coordinate::new(south, west)
            .map_err(|e| CoreError::InvalidBounds(format!("south-west corner: {e}")))?;
        let north_east = Coordinate::new(north, east)
            .map_err(|e| CoreError::InvalidBounds(format!("north-east corner: {e}")))?;
        Self::from_corners(south_west, north_east)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBounds`] if `south_west` is not south-west
    /// of `north_east`.
    pub fn from_corners(south_west: Coordinate, north_east: Coordinate) -> Result<Self, CoreError> {
        if south_west.lat() > north_east.lat() {
            return Err(CoreError::InvalidBounds(format!(
                "south edge {} is north of north edge {}",
                south_west.lat(),
                north_east.lat()
            )));
        }
        if south_west.lng() > north_east.lng() {
            return Err(CoreError::InvalidBounds(format!(
                "west edge {} is east of east edge {} (antimeridian viewports are not supported)",
                south_west.lng(),
                north_east.lng()
            )));
        }
        Ok(Self {
            south: south_west.lat(),
            north: north_east.lat(),
            west: south_west.lng(),
            east: north_east.lng(),
        })
    }

    #[must_use]
    pub fn south(&self) -> f64 {
        self.south
    }

    #[must_use]
    pub fn north(&self) -> f64 {
        self.north
    }

    #[must_use]
    pub fn west(&self) -> f64 {
        self.west
    }

    #[must_use]
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Edge-inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat())
            && (self.west..=self.east).contains(&point.lng())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    /// Chinese display name, preferred in Chinese-script regions.
    pub name_zh: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub origin_country: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    /// ISO-3166 alpha-2 code as stored by the backend (e.g. `"TW"`).
    pub country: String,
    pub location: Coordinate,
    pub brand_id: Option<BrandId>,
    /// Google rating in `0.0..=5.0`.
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub phone: Option<String>,
    pub hours: Option<String>,
    pub photo_url: Option<String>,
    pub google_place_id: Option<String>,
}

impl Shop {
    #[must_use]
    pub fn marker(&self) -> Marker {
        Marker {
            id: self.id,
            lat: self.location.lat(),
            lng: self.location.lng(),
        }
    }
}

/// What the map widget needs to draw a pin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub id: ShopId,
    pub lat: f64,
    pub lng: f64,
}

/// One page of the full listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedShops {
    pub shops: Vec<Shop>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}
