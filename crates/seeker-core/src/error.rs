use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Violations of the domain invariants checked at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lng}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("unknown region code: {0:?}")]
    UnknownRegion(String),
}
