mod explore;
mod shops;

use clap::{Parser, Subcommand};
use seeker_client::ShopClient;
use seeker_core::{BrandId, ShopId, ViewportBounds};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seeker")]
#[command(about = "Find shops on a map by viewport, brand and region")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Shops within a radius of a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in km (defaults to SEEKER_INITIAL_RADIUS_KM)
        #[arg(long)]
        radius_km: Option<f64>,
    },
    /// Shops inside a box, given as south,north,west,east
    Area {
        #[arg(value_parser = parse_bounds, allow_hyphen_values = true)]
        bounds: ViewportBounds,
        /// Restrict to a brand; repeat for several
        #[arg(long = "brand")]
        brands: Vec<BrandId>,
    },
    /// Page through the full listing
    List {
        /// Country code (e.g., TW)
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        brand: Option<BrandId>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        page_size: u32,
    },
    /// Brand catalog, optionally scoped to a region (TW, HK, SG, US)
    Brands {
        #[arg(long)]
        region: Option<String>,
    },
    /// Search shops by name or address
    Search {
        query: String,
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Show one shop
    Shop { id: ShopId },
    /// Print the region code for a coordinate
    Classify {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Run a scripted map session and print each render
    Explore {
        /// Device latitude; without it the session uses the fallback location
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Select a region before the first search
        #[arg(long)]
        region: Option<String>,
        /// Toggle a brand filter; repeat for several
        #[arg(long = "brand")]
        brands: Vec<BrandId>,
        /// Pan to south,north,west,east and search there; repeat to pan again
        #[arg(long = "pan", value_parser = parse_bounds, allow_hyphen_values = true)]
        pans: Vec<ViewportBounds>,
        /// Load the whole region up front instead of searching by viewport
        #[arg(long)]
        preload: bool,
    },
}

/// Parses `south,north,west,east` into validated bounds.
fn parse_bounds(raw: &str) -> Result<ViewportBounds, String> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in bounds '{raw}': {e}"))?;
    let [south, north, west, east] = parts[..] else {
        return Err(format!(
            "expected south,north,west,east but got {} values",
            parts.len()
        ));
    };
    ViewportBounds::new(south, north, west, east).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = seeker_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("seeker ready; API at {}", config.api_base_url);
        return Ok(());
    };

    let client = ShopClient::from_app_config(&config)?;
    match command {
        Commands::Nearby { lat, lng, radius_km } => {
            let radius_km = radius_km.unwrap_or(config.initial_radius_km);
            shops::run_nearby(&client, lat, lng, radius_km).await
        }
        Commands::Area { bounds, brands } => shops::run_area(&client, &bounds, &brands).await,
        Commands::List {
            country,
            city,
            brand,
            page,
            page_size,
        } => {
            let request = seeker_client::ListRequest {
                country,
                city,
                brand_id: brand,
                page,
                page_size,
            };
            shops::run_list(&client, &request).await
        }
        Commands::Brands { region } => shops::run_brands(&client, region.as_deref()).await,
        Commands::Search { query, limit } => shops::run_search(&client, &query, limit).await,
        Commands::Shop { id } => shops::run_shop(&client, id).await,
        Commands::Explore {
            lat,
            lng,
            region,
            brands,
            pans,
            preload,
        } => {
            let device = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(seeker_core::Coordinate::new(lat, lng)?),
                _ => None,
            };
            let script = explore::Script {
                region,
                brands,
                pans,
            };
            explore::run_explore(&client, &config, device, preload, script).await
        }
        Commands::Classify { lat, lng } => shops::run_classify(lat, lng),
    }
}
