//! Integration tests for `ShopClient` using wiremock HTTP mocks.

use seeker_client::{ListRequest, ShopClient, ShopDataStore};
use seeker_core::{Coordinate, Region, SearchQuery, ViewportBounds};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ShopClient {
    ShopClient::with_base_url(&format!("{base_url}/api"), 5, "seeker-test", 1, 0)
        .expect("client construction should not fail")
}

fn shop_json(id: i64, brand_id: Option<i64>, lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Shop {id}"),
        "brand_id": brand_id,
        "address": "No. 100, Section 1",
        "city": "Taipei",
        "country": "TW",
        "latitude": lat,
        "longitude": lng,
        "rating": 4.5,
        "rating_count": 120,
        "phone": null,
        "hours": null,
        "photo_url": null,
        "google_place_id": format!("place-{id}"),
        "brand": null
    })
}

#[tokio::test]
async fn nearby_sends_center_and_radius() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops/nearby"))
        .and(query_param("lat", "25.03"))
        .and(query_param("lng", "121.5"))
        .and(query_param("radius_km", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            shop_json(1, Some(3), 25.04, 121.51),
            shop_json(2, None, 25.02, 121.49)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let shops = client
        .nearby(Coordinate::new(25.03, 121.5).unwrap(), 10.0)
        .await
        .expect("nearby should succeed");

    assert_eq!(shops.len(), 2);
    assert_eq!(shops[0].id, 1);
    assert_eq!(shops[0].brand_id, Some(3));
    assert_eq!(shops[1].brand_id, None);
}

#[tokio::test]
async fn nearby_clamps_radius_to_backend_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops/nearby"))
        .and(query_param("radius_km", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let shops = client
        .nearby(Coordinate::new(25.03, 121.5).unwrap(), 400.0)
        .await
        .unwrap();
    assert!(shops.is_empty(), "empty list is a valid result");
}

#[tokio::test]
async fn in_bounds_pushes_brand_filter_to_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops/bounds"))
        .and(query_param("min_lat", "24.9"))
        .and(query_param("max_lat", "25.1"))
        .and(query_param("min_lng", "121.4"))
        .and(query_param("max_lng", "121.6"))
        .and(query_param("brand_ids", "3,7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([shop_json(5, Some(7), 25.0, 121.5)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let bounds = ViewportBounds::new(24.9, 25.1, 121.4, 121.6).unwrap();
    let shops = client.in_bounds(&bounds, &[3, 7]).await.unwrap();
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].id, 5);
}

#[tokio::test]
async fn list_by_country_reads_paged_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops"))
        .and(query_param("country", "TW"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shops": [shop_json(1, Some(1), 25.0, 121.5), shop_json(2, Some(2), 95.0, 121.5)],
            "total": 2,
            "page": 1,
            "page_size": 10000
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let request = ListRequest {
        country: Some("TW".to_owned()),
        page_size: 10_000,
        ..ListRequest::default()
    };
    let page = client.list_by_country(&request).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.shops.len(), 1, "invalid coordinate is dropped");
}

#[tokio::test]
async fn list_brands_scopes_by_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/brands"))
        .and(query_param("region", "TW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "CoCo", "name_zh": "都可", "origin_country": "TW" },
            { "id": 2, "name": "Milksha", "name_zh": null }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let brands = client.list_brands(Some(Region::Taiwan)).await.unwrap();
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0].name_zh.as_deref(), Some("都可"));
    assert!(brands[1].website.is_none());
}

#[tokio::test]
async fn execute_dispatches_query_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops/bounds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = SearchQuery::Bounds {
        bounds: ViewportBounds::new(1.2, 1.4, 103.7, 103.9).unwrap(),
        brand_ids: vec![],
    };
    let shops = client.execute(&query).await.unwrap();
    assert!(shops.is_empty());
}

#[tokio::test]
async fn server_error_becomes_data_unavailable_after_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops/nearby"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .nearby(Coordinate::new(25.03, 121.5).unwrap(), 10.0)
        .await
        .unwrap_err();
    assert_eq!(err.operation, "nearby");
    assert!(err.reason.contains("503"), "reason: {}", err.reason);
}

#[tokio::test]
async fn malformed_body_is_data_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/brands"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.list_brands(None).await.unwrap_err();
    assert_eq!(err.operation, "list_brands");
}

#[tokio::test]
async fn unreachable_backend_is_data_unavailable() {
    let client = ShopClient::with_base_url("http://127.0.0.1:1/api", 2, "seeker-test", 0, 0)
        .expect("client construction should not fail");
    let err = client.list_brands(None).await.unwrap_err();
    assert_eq!(err.operation, "list_brands");
}

#[tokio::test]
async fn shop_lookup_maps_not_found_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Shop not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/shops/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shop_json(9, Some(1), 25.0, 121.5)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.shop(404).await.unwrap().is_none());
    assert_eq!(client.shop(9).await.unwrap().map(|s| s.id), Some(9));
}

#[tokio::test]
async fn search_text_sends_query_and_clamped_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shops/search"))
        .and(query_param("q", "milk tea"))
        .and(query_param("limit", "50"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([shop_json(4, None, 25.0, 121.5)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let shops = client.search_text("  milk tea ", 500).await.unwrap();
    assert_eq!(shops.len(), 1);
}

#[tokio::test]
async fn empty_search_text_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_text("   ", 10).await.unwrap_err();
    assert_eq!(err.operation, "search_text");
}
