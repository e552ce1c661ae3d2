//! The read operations the search layer needs from the backend.

use std::future::Future;

use seeker_core::{
    Brand, BrandId, Coordinate, PagedShops, Region, SearchQuery, Shop, ShopId, ViewportBounds,
};

use crate::client::ShopClient;
use crate::error::DataUnavailable;
use crate::types::{into_shops, ShopListResponse, ShopRecord};

/// Radius range the nearby endpoint accepts.
pub const NEARBY_RADIUS_KM: std::ops::RangeInclusive<f64> = 0.1..=50.0;
pub const MAX_PAGE_SIZE: u32 = 10_000;
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Filters for the full listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub country: Option<String>,
    pub city: Option<String>,
    pub brand_id: Option<BrandId>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            country: None,
            city: None,
            brand_id: None,
            page: 1,
            page_size: 20,
        }
    }
}

/// Read-only shop and brand source.
///
/// Every operation fails only with [`DataUnavailable`]; an empty list is a
/// successful answer.
pub trait ShopDataStore {
    fn list_by_country(
        &self,
        request: &ListRequest,
    ) -> impl Future<Output = Result<PagedShops, DataUnavailable>>;

    fn nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> impl Future<Output = Result<Vec<Shop>, DataUnavailable>>;

    fn in_bounds(
        &self,
        bounds: &ViewportBounds,
        brand_ids: &[BrandId],
    ) -> impl Future<Output = Result<Vec<Shop>, DataUnavailable>>;

    fn list_brands(
        &self,
        region: Option<Region>,
    ) -> impl Future<Output = Result<Vec<Brand>, DataUnavailable>>;

    /// Name/address substring search.
    fn search_text(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Shop>, DataUnavailable>>;

    /// `Ok(None)` when the shop does not exist.
    fn shop(&self, id: ShopId) -> impl Future<Output = Result<Option<Shop>, DataUnavailable>>;

    /// Runs a [`SearchQuery`] against the matching endpoint.
    fn execute(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Shop>, DataUnavailable>> {
        async move {
            match query {
                SearchQuery::Nearby { center, radius_km } => self.nearby(*center, *radius_km).await,
                SearchQuery::Bounds { bounds, brand_ids } => {
                    self.in_bounds(bounds, brand_ids).await
                }
                SearchQuery::Country { country, page_size } => {
                    let request = ListRequest {
                        country: country.clone(),
                        page_size: *page_size,
                        ..ListRequest::default()
                    };
                    self.list_by_country(&request).await.map(|page| page.shops)
                }
            }
        }
    }
}

fn join_ids(ids: &[BrandId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl ShopDataStore for ShopClient {
    async fn list_by_country(&self, request: &ListRequest) -> Result<PagedShops, DataUnavailable> {
        let mut params = vec![
            ("page", request.page.max(1).to_string()),
            (
                "page_size",
                request.page_size.clamp(1, MAX_PAGE_SIZE).to_string(),
            ),
        ];
        if let Some(country) = request.country.as_deref().filter(|c| !c.is_empty()) {
            params.push(("country", country.to_owned()));
        }
        if let Some(city) = request.city.as_deref().filter(|c| !c.is_empty()) {
            params.push(("city", city.to_owned()));
        }
        if let Some(brand_id) = request.brand_id {
            params.push(("brand_id", brand_id.to_string()));
        }

        let url = self.build_url(&["shops"], &params);
        let response: ShopListResponse = self
            .get_json(&url)
            .await
            .map_err(|e| DataUnavailable::from_client("list_by_country", &e))?;
        let page = PagedShops::from(response);
        tracing::info!(
            country = request.country.as_deref().unwrap_or(""),
            returned = page.shops.len(),
            total = page.total,
            "listed shops"
        );
        Ok(page)
    }

    async fn nearby(&self, center: Coordinate, radius_km: f64) -> Result<Vec<Shop>, DataUnavailable> {
        let radius_km = radius_km.clamp(*NEARBY_RADIUS_KM.start(), *NEARBY_RADIUS_KM.end());
        let url = self.build_url(
            &["shops", "nearby"],
            &[
                ("lat", center.lat().to_string()),
                ("lng", center.lng().to_string()),
                ("radius_km", radius_km.to_string()),
            ],
        );
        let records: Vec<ShopRecord> = self
            .get_json(&url)
            .await
            .map_err(|e| DataUnavailable::from_client("nearby", &e))?;
        let shops = into_shops(records);
        tracing::info!(%center, radius_km, returned = shops.len(), "nearby search");
        Ok(shops)
    }

    async fn in_bounds(
        &self,
        bounds: &ViewportBounds,
        brand_ids: &[BrandId],
    ) -> Result<Vec<Shop>, DataUnavailable> {
        let mut params = vec![
            ("min_lat", bounds.south().to_string()),
            ("max_lat", bounds.north().to_string()),
            ("min_lng", bounds.west().to_string()),
            ("max_lng", bounds.east().to_string()),
        ];
        if !brand_ids.is_empty() {
            params.push(("brand_ids", join_ids(brand_ids)));
        }
        let url = self.build_url(&["shops", "bounds"], &params);
        let records: Vec<ShopRecord> = self
            .get_json(&url)
            .await
            .map_err(|e| DataUnavailable::from_client("in_bounds", &e))?;
        let shops = into_shops(records);
        tracing::info!(
            brand_filter = brand_ids.len(),
            returned = shops.len(),
            "bounds search"
        );
        Ok(shops)
    }

    async fn list_brands(&self, region: Option<Region>) -> Result<Vec<Brand>, DataUnavailable> {
        let params: Vec<(&str, String)> = region
            .map(|r| vec![("region", r.code().to_owned())])
            .unwrap_or_default();
        let url = self.build_url(&["brands"], &params);
        let brands: Vec<Brand> = self
            .get_json(&url)
            .await
            .map_err(|e| DataUnavailable::from_client("list_brands", &e))?;
        tracing::info!(region = ?region, returned = brands.len(), "listed brands");
        Ok(brands)
    }

    async fn search_text(&self, query: &str, limit: u32) -> Result<Vec<Shop>, DataUnavailable> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DataUnavailable {
                operation: "search_text",
                reason: "search text must not be empty".to_owned(),
            });
        }
        let url = self.build_url(
            &["shops", "search"],
            &[
                ("q", query.to_owned()),
                ("limit", limit.clamp(1, MAX_SEARCH_LIMIT).to_string()),
            ],
        );
        let records: Vec<ShopRecord> = self
            .get_json(&url)
            .await
            .map_err(|e| DataUnavailable::from_client("search_text", &e))?;
        Ok(into_shops(records))
    }

    async fn shop(&self, id: ShopId) -> Result<Option<Shop>, DataUnavailable> {
        let id_str = id.to_string();
        let url = self.build_url(&["shops", &id_str], &[]);
        let record: Option<ShopRecord> = self
            .get_json_optional(&url)
            .await
            .map_err(|e| DataUnavailable::from_client("shop", &e))?;
        Ok(record.and_then(|r| into_shops(vec![r]).into_iter().next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_ids_is_comma_separated() {
        assert_eq!(join_ids(&[3, 1, 2]), "3,1,2");
        assert_eq!(join_ids(&[]), "");
    }

    #[test]
    fn list_request_defaults_match_backend() {
        let req = ListRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 20);
    }
}
