//! Domain model and pure geometry for the shop directory.
//!
//! Everything here is free of I/O apart from reading configuration from the
//! environment.

pub mod app_config;
pub mod bounds;
pub mod config;
pub mod error;
pub mod filter;
pub mod query;
pub mod region;
pub mod types;

pub use app_config::{AppConfig, Environment, SearchMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use filter::FilterState;
pub use query::SearchQuery;
pub use region::{brand_display_name, classify, classify_region, Region};
pub use types::{Brand, BrandId, Coordinate, Marker, PagedShops, Shop, ShopId, ViewportBounds};
