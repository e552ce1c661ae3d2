//! Typed inputs and outputs of the search controller.

use std::time::Duration;

use seeker_client::{DataUnavailable, LocationUnavailable};
use seeker_core::{Brand, BrandId, Coordinate, Region, SearchQuery, Shop, ShopId, ViewportBounds};

/// Who moved the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportOrigin {
    /// A drag, pinch, wheel or keyboard pan.
    User,
    /// A camera move the app asked for (initial centering, fly-to).
    Programmatic,
}

/// Everything the controller reacts to, funnelled through one queue.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// App mounted.
    Started,
    LocationResolved(Result<Coordinate, LocationUnavailable>),
    ViewportSettled {
        bounds: ViewportBounds,
        origin: ViewportOrigin,
    },
    UserInteractionStarted,
    BrandToggled(BrandId),
    BrandsCleared,
    /// Region picked by the user; `""` clears it.
    RegionSelected(String),
    /// The "search this area" confirmation.
    SearchThisArea,
    ShopSelected(ShopId),
    ResultsArrived {
        token: u64,
        outcome: Result<Vec<Shop>, DataUnavailable>,
    },
    BrandsArrived {
        region: Option<Region>,
        outcome: Result<Vec<Brand>, DataUnavailable>,
    },
}

/// Side effects the controller asks its runtime to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RequestLocation { timeout: Duration },
    Fetch { token: u64, query: SearchQuery },
    FetchBrands { region: Option<Region> },
    /// Move the map camera; the resulting settle is programmatic.
    CenterOn(Coordinate),
    /// Visible shops, filters or the affordance changed.
    Render,
}
