//! Wire shapes returned by the shop backend.

use seeker_core::{BrandId, Coordinate, CoreError, PagedShops, Shop, ShopId};
use serde::Deserialize;

/// A shop as serialized by the backend. Coordinates arrive as two loose
/// floats and are validated on conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopRecord {
    pub id: ShopId,
    pub name: String,
    pub brand_id: Option<BrandId>,
    pub address: String,
    pub city: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub rating_count: Option<i64>,
    pub phone: Option<String>,
    pub hours: Option<String>,
    pub photo_url: Option<String>,
    pub google_place_id: Option<String>,
}

impl TryFrom<ShopRecord> for Shop {
    type Error = CoreError;

    fn try_from(record: ShopRecord) -> Result<Self, Self::Error> {
        let location = Coordinate::new(record.latitude, record.longitude)?;
        Ok(Shop {
            id: record.id,
            name: record.name,
            address: record.address,
            city: record.city,
            country: record.country,
            location,
            brand_id: record.brand_id,
            rating: record.rating.filter(|r| (0.0..=5.0).contains(r)),
            rating_count: record.rating_count.and_then(|c| u32::try_from(c).ok()),
            phone: record.phone,
            hours: record.hours,
            photo_url: record.photo_url,
            google_place_id: record.google_place_id,
        })
    }
}

/// Envelope of `GET /shops`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopListResponse {
    pub shops: Vec<ShopRecord>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl From<ShopListResponse> for PagedShops {
    fn from(response: ShopListResponse) -> Self {
        PagedShops {
            shops: into_shops(response.shops),
            total: response.total,
            page: response.page,
            page_size: response.page_size,
        }
    }
}

/// Converts records, dropping any with an invalid coordinate.
pub(crate) fn into_shops(records: Vec<ShopRecord>) -> Vec<Shop> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match Shop::try_from(record) {
                Ok(shop) => Some(shop),
                Err(e) => {
                    tracing::warn!(shop_id = id, error = %e, "dropping shop with invalid coordinate");
                    None
                }
            }
        })
        .collect()
}
