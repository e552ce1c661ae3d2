//! One-shot device position lookup with a bounded wait.

use std::future::Future;
use std::time::Duration;

use seeker_core::Coordinate;

use crate::error::LocationUnavailable;

/// Source of the device position.
pub trait LocationProvider {
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, LocationUnavailable>>;
}

/// Always reports the same position. Used when the position is supplied
/// up front (CLI flags, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationUnavailable> {
        Ok(self.0)
    }
}

/// A provider that never yields a position.
#[derive(Debug, Clone)]
pub struct NoLocation(pub LocationUnavailable);

impl Default for NoLocation {
    fn default() -> Self {
        Self(LocationUnavailable::Unsupported)
    }
}

impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationUnavailable> {
        Err(self.0.clone())
    }
}

/// Asks `provider` for a position, giving up after `timeout`.
///
/// # Errors
///
/// Returns the provider's error, or [`LocationUnavailable::TimedOut`] when
/// the wait runs out.
pub async fn locate_with_timeout<P: LocationProvider>(
    provider: &P,
    timeout: Duration,
) -> Result<Coordinate, LocationUnavailable> {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            Err(LocationUnavailable::TimedOut { timeout_ms })
        }
    }
}

/// Resolves the starting point: the device position, or `fallback` on any
/// failure. The failure is logged, never surfaced.
pub async fn locate_or_fallback<P: LocationProvider>(
    provider: &P,
    timeout: Duration,
    fallback: Coordinate,
) -> Coordinate {
    match locate_with_timeout(provider, timeout).await {
        Ok(position) => position,
        Err(e) => {
            tracing::info!(reason = %e, %fallback, "device location unavailable, using fallback");
            fallback
        }
    }
}
