//! Region classification from static bounding boxes.
//!
//! Regions scope the brand catalog and decide which brand name is shown.
//! The boxes must not overlap; if they ever do, the first match in
//! [`REGION_BOXES`] wins.

use serde::{Deserialize, Serialize};

use crate::types::{Brand, Coordinate};
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "TW")]
    Taiwan,
    #[serde(rename = "HK")]
    HongKong,
    #[serde(rename = "SG")]
    Singapore,
    #[serde(rename = "US")]
    UnitedStates,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Taiwan,
        Region::HongKong,
        Region::Singapore,
        Region::UnitedStates,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Region::Taiwan => "TW",
            Region::HongKong => "HK",
            Region::Singapore => "SG",
            Region::UnitedStates => "US",
        }
    }

    /// Parses a region code. The empty string means "no region" and maps to
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownRegion`] for any other unrecognised code.
    pub fn from_code(code: &str) -> Result<Option<Region>, CoreError> {
        if code.is_empty() {
            return Ok(None);
        }
        Region::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(code))
            .map(Some)
            .ok_or_else(|| CoreError::UnknownRegion(code.to_string()))
    }

    fn naming(self) -> BrandNaming {
        match self {
            Region::Taiwan | Region::HongKong => BrandNaming::ChinesePreferred,
            Region::Singapore | Region::UnitedStates => BrandNaming::Latin,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrandNaming {
    ChinesePreferred,
    Latin,
}

/// An inclusive lat/lng rectangle tagged with its region.
#[derive(Debug, Clone, Copy)]
pub struct RegionBox {
    pub region: Region,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl RegionBox {
    fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

/// Evaluated in order; first match wins.
pub const REGION_BOXES: &[RegionBox] = &[
    RegionBox {
        region: Region::Taiwan,
        min_lat: 21.8,
        max_lat: 25.4,
        min_lng: 119.3,
        max_lng: 122.1,
    },
    RegionBox {
        region: Region::HongKong,
        min_lat: 22.15,
        max_lat: 22.57,
        min_lng: 113.8,
        max_lng: 114.45,
    },
    RegionBox {
        region: Region::Singapore,
        min_lat: 1.15,
        max_lat: 1.48,
        min_lng: 103.6,
        max_lng: 104.1,
    },
    // Contiguous US only.
    RegionBox {
        region: Region::UnitedStates,
        min_lat: 24.4,
        max_lat: 49.4,
        min_lng: -125.0,
        max_lng: -66.9,
    },
];

/// Region containing the point, if any.
#[must_use]
pub fn classify_region(lat: f64, lng: f64) -> Option<Region> {
    REGION_BOXES
        .iter()
        .find(|b| b.contains(lat, lng))
        .map(|b| b.region)
}

/// Region code for the point, or `""` when no box contains it.
///
/// Total: NaN or out-of-range input simply matches nothing.
#[must_use]
pub fn classify(lat: f64, lng: f64) -> &'static str {
    classify_region(lat, lng).map_or("", Region::code)
}

#[must_use]
pub fn classify_coordinate(point: Coordinate) -> Option<Region> {
    classify_region(point.lat(), point.lng())
}

/// The name to show for `brand` while browsing `region`.
///
/// Chinese-script regions show `name_zh` when the brand has one; everything
/// else, including "no region", shows the primary name.
#[must_use]
pub fn brand_display_name(brand: &Brand, region: Option<Region>) -> &str {
    match region.map(Region::naming) {
        Some(BrandNaming::ChinesePreferred) => brand
            .name_zh
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&brand.name),
        Some(BrandNaming::Latin) | None => &brand.name,
    }
}
