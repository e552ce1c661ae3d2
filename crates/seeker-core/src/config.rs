use crate::app_config::{AppConfig, Environment, SearchMode};
use crate::types::Coordinate;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// development config pointed at a local backend.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, format!("must be a positive number, got {value}")))
        }
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SEEKER_ENV", "development"))?;
    let api_base_url = or_default("SEEKER_API_BASE_URL", "http://localhost:8000/api");
    let log_level = or_default("SEEKER_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SEEKER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SEEKER_USER_AGENT", "seeker/0.1 (shop-directory)");
    let max_retries = parse_u32("SEEKER_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("SEEKER_RETRY_BACKOFF_BASE_MS", "250")?;
    let geolocation_timeout_ms = parse_u64("SEEKER_GEOLOCATION_TIMEOUT_MS", "5000")?;

    let fallback_lat = parse_f64("SEEKER_FALLBACK_LAT", "25.03")?;
    let fallback_lng = parse_f64("SEEKER_FALLBACK_LNG", "121.5")?;
    let fallback_location = Coordinate::new(fallback_lat, fallback_lng)
        .map_err(|e| invalid("SEEKER_FALLBACK_LAT/SEEKER_FALLBACK_LNG", e.to_string()))?;

    let initial_radius_km = parse_positive_f64("SEEKER_INITIAL_RADIUS_KM", "10")?;
    let min_radius_km = parse_positive_f64("SEEKER_MIN_RADIUS_KM", "5")?;
    let viewport_debounce_ms = parse_u64("SEEKER_VIEWPORT_DEBOUNCE_MS", "300")?;
    let search_mode = parse_search_mode(&or_default("SEEKER_SEARCH_MODE", "viewport"))?;

    let preload_page_size = parse_u32("SEEKER_PRELOAD_PAGE_SIZE", "10000")?;
    if !(1..=10_000).contains(&preload_page_size) {
        return Err(invalid(
            "SEEKER_PRELOAD_PAGE_SIZE",
            format!("must be between 1 and 10000, got {preload_page_size}"),
        ));
    }

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        geolocation_timeout_ms,
        fallback_location,
        initial_radius_km,
        min_radius_km,
        viewport_debounce_ms,
        search_mode,
        preload_page_size,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SEEKER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_search_mode(s: &str) -> Result<SearchMode, ConfigError> {
    match s {
        "viewport" => Ok(SearchMode::Viewport),
        "region-preload" => Ok(SearchMode::RegionPreload),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SEEKER_SEARCH_MODE".to_string(),
            reason: format!("expected 'viewport' or 'region-preload', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
