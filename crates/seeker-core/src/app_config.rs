use crate::types::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the first load and "search this area" obtain shops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Radius search on start, box search on confirm.
    Viewport,
    /// Load the whole region up front, narrow to the viewport in memory.
    RegionPreload,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Viewport => write!(f, "viewport"),
            SearchMode::RegionPreload => write!(f, "region-preload"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub geolocation_timeout_ms: u64,
    pub fallback_location: Coordinate,
    pub initial_radius_km: f64,
    pub min_radius_km: f64,
    pub viewport_debounce_ms: u64,
    pub search_mode: SearchMode,
    pub preload_page_size: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_base_url", &self.api_base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("geolocation_timeout_ms", &self.geolocation_timeout_ms)
            .field("fallback_location", &self.fallback_location.to_string())
            .field("initial_radius_km", &self.initial_radius_km)
            .field("min_radius_km", &self.min_radius_km)
            .field("viewport_debounce_ms", &self.viewport_debounce_ms)
            .field("search_mode", &self.search_mode.to_string())
            .field("preload_page_size", &self.preload_page_size)
            .finish()
    }
}
