//! One-shot query commands. Each prints a plain table to stdout.

use anyhow::Context;
use seeker_client::{ListRequest, ShopClient, ShopDataStore};
use seeker_core::region::brand_display_name;
use seeker_core::{classify, BrandId, Coordinate, Region, Shop, ShopId, ViewportBounds};

const NAME_WIDTH: usize = 32;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn print_shops(shops: &[Shop]) {
    if shops.is_empty() {
        println!("no shops found");
        return;
    }
    println!(
        "{:<8}{:<34}{:<14}{:<8}{:<11}LNG",
        "ID", "NAME", "CITY", "RATING", "LAT"
    );
    for shop in shops {
        let rating = shop
            .rating
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        println!(
            "{:<8}{:<34}{:<14}{:<8}{:<11.5}{:.5}",
            shop.id,
            truncate(&shop.name, NAME_WIDTH),
            truncate(shop.city.as_deref().unwrap_or("-"), 12),
            rating,
            shop.location.lat(),
            shop.location.lng()
        );
    }
}

pub(crate) async fn run_nearby(
    client: &ShopClient,
    lat: f64,
    lng: f64,
    radius_km: f64,
) -> anyhow::Result<()> {
    let center = Coordinate::new(lat, lng)?;
    let shops = client.nearby(center, radius_km).await?;
    print_shops(&shops);
    Ok(())
}

pub(crate) async fn run_area(
    client: &ShopClient,
    bounds: &ViewportBounds,
    brands: &[BrandId],
) -> anyhow::Result<()> {
    let shops = client.in_bounds(bounds, brands).await?;
    print_shops(&shops);
    Ok(())
}

pub(crate) async fn run_list(client: &ShopClient, request: &ListRequest) -> anyhow::Result<()> {
    let page = client.list_by_country(request).await?;
    print_shops(&page.shops);
    println!(
        "page {} ({} per page), {} shops in total",
        page.page, page.page_size, page.total
    );
    Ok(())
}

pub(crate) async fn run_brands(client: &ShopClient, region: Option<&str>) -> anyhow::Result<()> {
    let region = Region::from_code(region.unwrap_or_default())?;
    let brands = client.list_brands(region).await?;
    if brands.is_empty() {
        println!("no brands found");
        return Ok(());
    }
    println!("{:<8}{:<34}{:<34}ORIGIN", "ID", "NAME", "DISPLAY");
    for brand in &brands {
        println!(
            "{:<8}{:<34}{:<34}{}",
            brand.id,
            truncate(&brand.name, NAME_WIDTH),
            truncate(brand_display_name(brand, region), NAME_WIDTH),
            brand.origin_country.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub(crate) async fn run_search(client: &ShopClient, query: &str, limit: u32) -> anyhow::Result<()> {
    let shops = client.search_text(query, limit).await?;
    print_shops(&shops);
    Ok(())
}

pub(crate) async fn run_shop(client: &ShopClient, id: ShopId) -> anyhow::Result<()> {
    let shop = client
        .shop(id)
        .await?
        .with_context(|| format!("shop {id} not found"))?;
    println!("{} (#{})", shop.name, shop.id);
    println!("  address:  {}", shop.address);
    if let Some(city) = &shop.city {
        println!("  city:     {city}, {}", shop.country);
    }
    println!("  location: {}", shop.location);
    if let Some(rating) = shop.rating {
        println!(
            "  rating:   {rating:.1} ({} reviews)",
            shop.rating_count.unwrap_or(0)
        );
    }
    for (label, value) in [
        ("phone", &shop.phone),
        ("hours", &shop.hours),
        ("photo", &shop.photo_url),
    ] {
        if let Some(value) = value {
            println!("  {:<9} {value}", format!("{label}:"));
        }
    }
    Ok(())
}

pub(crate) fn run_classify(lat: f64, lng: f64) -> anyhow::Result<()> {
    let point = Coordinate::new(lat, lng)?;
    let code = classify(point.lat(), point.lng());
    if code.is_empty() {
        println!("{point}: outside every known region");
    } else {
        println!("{point}: {code}");
    }
    Ok(())
}
