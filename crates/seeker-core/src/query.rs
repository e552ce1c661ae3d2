use serde::Serialize;

use crate::types::{BrandId, Coordinate, ViewportBounds};

/// A request for shops, in one of the shapes the backend understands.
///
/// Radius searches never carry brand ids: brand narrowing for them happens
/// on the client. Box searches may push the selection to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchQuery {
    Nearby {
        center: Coordinate,
        radius_km: f64,
    },
    Bounds {
        bounds: ViewportBounds,
        brand_ids: Vec<BrandId>,
    },
    /// Whole-region listing used by the preload strategy.
    Country {
        country: Option<String>,
        page_size: u32,
    },
}

impl SearchQuery {
    /// The point the query is centred on, used to re-derive the region.
    /// Country listings have no single center.
    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        match self {
            SearchQuery::Nearby { center, .. } => Some(*center),
            SearchQuery::Bounds { bounds, .. } => Some(crate::bounds::center_of(bounds)),
            SearchQuery::Country { .. } => None,
        }
    }
}
