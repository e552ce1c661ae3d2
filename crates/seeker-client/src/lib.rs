//! Backend access for the shop directory: the HTTP shop/brand store and the
//! device geolocation adapter.

pub mod client;
pub mod error;
pub mod geolocation;
pub(crate) mod retry;
pub mod store;
pub mod types;

pub use client::ShopClient;
pub use error::{ClientError, DataUnavailable, LocationUnavailable};
pub use geolocation::{
    locate_or_fallback, locate_with_timeout, FixedLocation, LocationProvider, NoLocation,
};
pub use store::{ListRequest, ShopDataStore};
