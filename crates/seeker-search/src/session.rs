//! Drives a [`SearchController`] against real collaborators.
//!
//! One task owns the controller. Widget events, user actions and completed
//! backend calls are all funnelled into a single event queue, so the
//! controller never sees two events at once. Backend calls run concurrently
//! and may finish in any order; the controller's request tokens take care
//! of stale answers.

use std::collections::VecDeque;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use seeker_client::{locate_with_timeout, LocationProvider, ShopDataStore};
use seeker_core::{BrandId, Coordinate, ShopId};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::bridge::{ViewportBridge, WidgetEvent};
use crate::controller::{ControllerSettings, SearchController};
use crate::event::{Command, SearchEvent};

/// The map and list surface a session renders into.
pub trait Presenter {
    /// Move the map camera. The bridge tags the resulting settle as
    /// programmatic.
    fn center_on(&mut self, center: Coordinate);

    /// Redraw markers, list, filters and the affordance.
    fn render(&mut self, controller: &SearchController);
}

/// Direct user actions outside the map widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    ToggleBrand(BrandId),
    ClearBrands,
    SelectRegion(String),
    SearchThisArea,
    SelectShop(ShopId),
}

impl From<UserAction> for SearchEvent {
    fn from(action: UserAction) -> Self {
        match action {
            UserAction::ToggleBrand(id) => SearchEvent::BrandToggled(id),
            UserAction::ClearBrands => SearchEvent::BrandsCleared,
            UserAction::SelectRegion(code) => SearchEvent::RegionSelected(code),
            UserAction::SearchThisArea => SearchEvent::SearchThisArea,
            UserAction::SelectShop(id) => SearchEvent::ShopSelected(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    Widget(WidgetEvent),
    Action(UserAction),
    /// Stop immediately, abandoning in-flight requests.
    Shutdown,
}

/// Runs a session until [`SessionInput::Shutdown`] arrives, or until the
/// input channel closes and all outstanding work has drained.
///
/// Returns the controller in its final state.
pub async fn run_session<S, L, P>(
    store: &S,
    locator: &L,
    presenter: &mut P,
    settings: ControllerSettings,
    debounce: Duration,
    mut inputs: mpsc::Receiver<SessionInput>,
) -> SearchController
where
    S: ShopDataStore,
    L: LocationProvider,
    P: Presenter,
{
    let mut controller = SearchController::new(settings);
    let mut bridge = ViewportBridge::new(debounce);
    let mut queue = VecDeque::from([SearchEvent::Started]);
    let mut pending: FuturesUnordered<LocalBoxFuture<'_, SearchEvent>> = FuturesUnordered::new();
    let mut inputs_open = true;

    tracing::info!(debounce_ms = debounce.as_millis(), "search session started");

    loop {
        let mut dirty = false;
        while let Some(event) = queue.pop_front() {
            for command in controller.handle(event) {
                match command {
                    Command::RequestLocation { timeout } => pending.push(
                        async move {
                            SearchEvent::LocationResolved(
                                locate_with_timeout(locator, timeout).await,
                            )
                        }
                        .boxed_local(),
                    ),
                    Command::Fetch { token, query } => pending.push(
                        async move {
                            let outcome = store.execute(&query).await;
                            SearchEvent::ResultsArrived { token, outcome }
                        }
                        .boxed_local(),
                    ),
                    Command::FetchBrands { region } => pending.push(
                        async move {
                            let outcome = store.list_brands(region).await;
                            SearchEvent::BrandsArrived { region, outcome }
                        }
                        .boxed_local(),
                    ),
                    Command::CenterOn(center) => {
                        bridge.begin_programmatic_move(Instant::now());
                        presenter.center_on(center);
                    }
                    Command::Render => dirty = true,
                }
            }
        }
        if dirty {
            presenter.render(&controller);
        }

        let deadline = bridge.settle_deadline();
        if !inputs_open && pending.is_empty() && deadline.is_none() {
            tracing::info!("input closed and work drained, ending session");
            break;
        }

        tokio::select! {
            input = inputs.recv(), if inputs_open => match input {
                Some(SessionInput::Widget(event)) => {
                    queue.extend(
                        bridge
                            .handle(event, Instant::now())
                            .into_iter()
                            .map(SearchEvent::from),
                    );
                }
                Some(SessionInput::Action(action)) => queue.push_back(action.into()),
                Some(SessionInput::Shutdown) => {
                    tracing::info!(abandoned = pending.len(), "session shut down");
                    break;
                }
                None => inputs_open = false,
            },
            Some(event) = pending.next(), if !pending.is_empty() => queue.push_back(event),
            () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(signal) = bridge.poll(Instant::now()) {
                    queue.push_back(signal.into());
                }
            }
            else => break,
        }
    }

    controller
}
