//! The search state machine.
//!
//! [`SearchController::handle`] is the only way state changes: it takes one
//! [`SearchEvent`], updates the controller and returns the [`Command`]s the
//! runtime must carry out. No I/O happens here, so every transition can be
//! driven directly from tests.
//!
//! Phases run `Idle → AwaitingFirstResult → Ready`. After the first search
//! completes, any user pan/zoom or filter change raises the re-search
//! affordance; issuing a new search clears it. Viewport changes never fetch
//! on their own.

use std::time::Duration;

use seeker_core::bounds::search_bounds;
use seeker_core::filter::within_bounds;
use seeker_core::region::{brand_display_name, classify_coordinate};
use seeker_core::{
    AppConfig, Brand, BrandId, Coordinate, FilterState, Marker, Region, SearchMode, SearchQuery,
    Shop, ShopId, ViewportBounds,
};

use crate::event::{Command, SearchEvent, ViewportOrigin};

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub fallback_location: Coordinate,
    pub geolocation_timeout: Duration,
    pub initial_radius_km: f64,
    pub min_radius_km: f64,
    pub search_mode: SearchMode,
    pub preload_page_size: u32,
}

impl ControllerSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            fallback_location: config.fallback_location,
            geolocation_timeout: Duration::from_millis(config.geolocation_timeout_ms),
            initial_radius_km: config.initial_radius_km,
            min_radius_km: config.min_radius_km,
            search_mode: config.search_mode,
            preload_page_size: config.preload_page_size,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            fallback_location: Coordinate::new(25.03, 121.5)
                .unwrap_or_else(|_| unreachable!("fallback literal is in range")),
            geolocation_timeout: Duration::from_secs(5),
            initial_radius_km: 10.0,
            min_radius_km: seeker_core::bounds::MIN_SEARCH_RADIUS_KM,
            search_mode: SearchMode::Viewport,
            preload_page_size: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingFirstResult,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    pub has_searched: bool,
    pub show_affordance: bool,
}

/// What the list panel should display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultView<'a> {
    /// Nothing has been searched yet.
    NotSearched,
    /// The first search is in flight.
    Loading,
    /// A search completed and nothing matches the current filters.
    Empty,
    Shops(&'a [Shop]),
}

#[derive(Debug)]
pub struct SearchController {
    settings: ControllerSettings,
    phase: Phase,
    has_searched: bool,
    show_affordance: bool,
    bounds: Option<ViewportBounds>,
    filter: FilterState,
    /// Last token handed out; only its response is applied.
    latest_token: u64,
    in_flight: Option<SearchQuery>,
    results: Vec<Shop>,
    /// Preload mode: the area last confirmed with "search this area".
    area: Option<ViewportBounds>,
    visible: Vec<Shop>,
    brands: Vec<Brand>,
    brands_requested: bool,
    selected_shop: Option<ShopId>,
    last_error: Option<String>,
}

impl SearchController {
    #[must_use]
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            has_searched: false,
            show_affordance: false,
            bounds: None,
            filter: FilterState::new(),
            latest_token: 0,
            in_flight: None,
            results: Vec::new(),
            area: None,
            visible: Vec::new(),
            brands: Vec::new(),
            brands_requested: false,
            selected_shop: None,
            last_error: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn ui_state(&self) -> UiState {
        UiState {
            has_searched: self.has_searched,
            show_affordance: self.show_affordance,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn bounds(&self) -> Option<&ViewportBounds> {
        self.bounds.as_ref()
    }

    #[must_use]
    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Everything the last successful fetch returned, before brand filtering.
    #[must_use]
    pub fn results(&self) -> &[Shop] {
        &self.results
    }

    #[must_use]
    pub fn visible(&self) -> &[Shop] {
        &self.visible
    }

    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        self.visible.iter().map(Shop::marker).collect()
    }

    #[must_use]
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    /// Localized label for a brand in the active region.
    #[must_use]
    pub fn brand_label(&self, id: BrandId) -> Option<&str> {
        let region = self.filter.active_region();
        self.brands
            .iter()
            .find(|b| b.id == id)
            .map(|b| brand_display_name(b, region))
    }

    #[must_use]
    pub fn selected_shop(&self) -> Option<&Shop> {
        let id = self.selected_shop?;
        self.results.iter().find(|s| s.id == id)
    }

    /// The last user-visible failure, cleared by the next successful fetch.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn result_view(&self) -> ResultView<'_> {
        if !self.has_searched {
            if self.in_flight.is_some() {
                ResultView::Loading
            } else {
                ResultView::NotSearched
            }
        } else if self.visible.is_empty() {
            ResultView::Empty
        } else {
            ResultView::Shops(&self.visible)
        }
    }

    /// Applies one event and returns the commands it produces.
    pub fn handle(&mut self, event: SearchEvent) -> Vec<Command> {
        match event {
            SearchEvent::Started => self.on_started(),
            SearchEvent::LocationResolved(result) => {
                let center = match result {
                    Ok(position) => position,
                    Err(e) => {
                        tracing::info!(
                            reason = %e,
                            fallback = %self.settings.fallback_location,
                            "location unavailable, starting from fallback"
                        );
                        self.settings.fallback_location
                    }
                };
                self.on_location(center)
            }
            SearchEvent::ViewportSettled { bounds, origin } => self.on_settled(bounds, origin),
            // Each settle already carries its origin from the bridge.
            SearchEvent::UserInteractionStarted => Vec::new(),
            SearchEvent::BrandToggled(id) => {
                self.filter.toggle_brand(id);
                self.on_filter_changed()
            }
            SearchEvent::BrandsCleared => {
                if self.filter.clear_brands() {
                    self.on_filter_changed()
                } else {
                    Vec::new()
                }
            }
            SearchEvent::RegionSelected(code) => self.on_region_selected(&code),
            SearchEvent::SearchThisArea => self.on_search_this_area(),
            SearchEvent::ShopSelected(id) => self.on_shop_selected(id),
            SearchEvent::ResultsArrived { token, outcome } => self.on_results(token, outcome),
            SearchEvent::BrandsArrived { region, outcome } => self.on_brands(region, outcome),
        }
    }

    fn on_started(&mut self) -> Vec<Command> {
        if self.phase != Phase::Idle {
            return Vec::new();
        }
        vec![Command::RequestLocation {
            timeout: self.settings.geolocation_timeout,
        }]
    }

    fn on_location(&mut self, center: Coordinate) -> Vec<Command> {
        if self.phase != Phase::Idle {
            tracing::debug!("ignoring late location result");
            return Vec::new();
        }
        self.phase = Phase::AwaitingFirstResult;

        let query = match self.settings.search_mode {
            SearchMode::Viewport => SearchQuery::Nearby {
                center,
                radius_km: self.settings.initial_radius_km,
            },
            SearchMode::RegionPreload => {
                let code = classify_coordinate(center).map_or("", Region::code);
                self.filter.set_region(code);
                self.preload_query()
            }
        };

        let mut commands = vec![Command::CenterOn(center)];
        commands.push(self.issue(query));
        commands
    }

    fn on_settled(&mut self, bounds: ViewportBounds, origin: ViewportOrigin) -> Vec<Command> {
        self.bounds = Some(bounds);
        let by_user = origin == ViewportOrigin::User;
        if by_user && self.phase == Phase::Ready && self.has_searched && !self.show_affordance {
            self.show_affordance = true;
            return vec![Command::Render];
        }
        Vec::new()
    }

    fn on_filter_changed(&mut self) -> Vec<Command> {
        self.refresh_visible();
        if self.has_searched {
            self.show_affordance = true;
        }
        vec![Command::Render]
    }

    fn on_region_selected(&mut self, code: &str) -> Vec<Command> {
        let region = match Region::from_code(code) {
            Ok(region) => region,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring region selection");
                return Vec::new();
            }
        };
        let code = region.map_or("", Region::code);
        if !self.filter.set_region(code) {
            return Vec::new();
        }

        let mut commands = self.on_filter_changed();
        commands.push(self.request_brands());
        if self.settings.search_mode == SearchMode::RegionPreload && self.phase != Phase::Idle {
            self.area = None;
            let query = self.preload_query();
            commands.push(self.issue(query));
        }
        commands
    }

    fn on_search_this_area(&mut self) -> Vec<Command> {
        let Some(bounds) = self.bounds else {
            tracing::warn!("search this area requested before any viewport was reported");
            return Vec::new();
        };

        match self.settings.search_mode {
            SearchMode::Viewport => {
                let query = SearchQuery::Bounds {
                    bounds: search_bounds(&bounds, self.settings.min_radius_km),
                    brand_ids: self.filter.selected_brands().iter().copied().collect(),
                };
                self.show_affordance = false;
                if self.phase == Phase::Idle {
                    // Supersedes the pending location-based first search.
                    self.phase = Phase::AwaitingFirstResult;
                }
                vec![self.issue(query), Command::Render]
            }
            SearchMode::RegionPreload => {
                // Everything for the region is already in memory.
                self.area = Some(bounds);
                self.refresh_visible();
                self.has_searched = true;
                self.show_affordance = false;
                vec![Command::Render]
            }
        }
    }

    fn on_shop_selected(&mut self, id: ShopId) -> Vec<Command> {
        let Some(location) = self.results.iter().find(|s| s.id == id).map(|s| s.location) else {
            tracing::debug!(shop_id = id, "selected shop is not in the current results");
            return Vec::new();
        };
        self.selected_shop = Some(id);
        vec![Command::CenterOn(location), Command::Render]
    }

    fn on_results(
        &mut self,
        token: u64,
        outcome: Result<Vec<Shop>, seeker_client::DataUnavailable>,
    ) -> Vec<Command> {
        if token != self.latest_token {
            tracing::warn!(
                token,
                latest = self.latest_token,
                "discarding stale search response"
            );
            return Vec::new();
        }
        let query = self.in_flight.take();
        if self.phase == Phase::AwaitingFirstResult {
            self.phase = Phase::Ready;
        }

        let shops = match outcome {
            Ok(shops) => shops,
            Err(e) => {
                tracing::error!(token, error = %e, "search failed, keeping previous results");
                self.last_error = Some(e.to_string());
                return vec![Command::Render];
            }
        };

        tracing::info!(token, returned = shops.len(), "search completed");
        self.results = shops;
        self.last_error = None;
        self.has_searched = true;
        self.show_affordance = false;
        if self
            .selected_shop
            .is_some_and(|id| !self.results.iter().any(|s| s.id == id))
        {
            self.selected_shop = None;
        }

        let mut commands = Vec::new();
        if let Some(center) = query.as_ref().and_then(SearchQuery::center) {
            let code = classify_coordinate(center).map_or("", Region::code);
            if self.filter.set_region(code) {
                tracing::info!(region = code, "active region changed");
                commands.push(self.request_brands());
                // The server narrowed these results by a brand selection
                // that no longer exists.
                let server_filtered = matches!(
                    &query,
                    Some(SearchQuery::Bounds { brand_ids, .. }) if !brand_ids.is_empty()
                );
                if server_filtered {
                    self.show_affordance = true;
                }
            }
        }
        if !self.brands_requested {
            commands.push(self.request_brands());
        }

        self.refresh_visible();
        commands.push(Command::Render);
        commands
    }

    fn on_brands(
        &mut self,
        region: Option<Region>,
        outcome: Result<Vec<Brand>, seeker_client::DataUnavailable>,
    ) -> Vec<Command> {
        if region != self.filter.active_region() {
            tracing::debug!(?region, "discarding brand list for inactive region");
            return Vec::new();
        }
        match outcome {
            Ok(brands) => self.brands = brands,
            Err(e) => {
                tracing::error!(error = %e, "brand catalog unavailable");
                self.last_error = Some(e.to_string());
            }
        }
        vec![Command::Render]
    }

    fn issue(&mut self, query: SearchQuery) -> Command {
        self.latest_token += 1;
        tracing::info!(token = self.latest_token, ?query, "issuing search");
        self.in_flight = Some(query.clone());
        Command::Fetch {
            token: self.latest_token,
            query,
        }
    }

    fn request_brands(&mut self) -> Command {
        self.brands_requested = true;
        Command::FetchBrands {
            region: self.filter.active_region(),
        }
    }

    fn preload_query(&self) -> SearchQuery {
        let region = self.filter.region();
        SearchQuery::Country {
            country: (!region.is_empty()).then(|| region.to_string()),
            page_size: self.settings.preload_page_size,
        }
    }

    fn refresh_visible(&mut self) {
        self.visible = match (self.settings.search_mode, self.area) {
            (SearchMode::RegionPreload, Some(area)) => {
                self.filter.apply(&within_bounds(&self.results, &area))
            }
            _ => self.filter.apply(&self.results),
        };
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
