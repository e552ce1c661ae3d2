//! `seeker explore`: a scripted map session rendered to the terminal.
//!
//! The script stands in for a person at the map. It waits for the first
//! search to settle, applies any region and brand choices, then pans to each
//! requested box and presses "search this area".

use std::time::Duration;

use seeker_client::{FixedLocation, LocationProvider, NoLocation, ShopClient};
use seeker_core::{AppConfig, BrandId, Coordinate, SearchMode, ViewportBounds};
use seeker_search::{
    run_session, ControllerSettings, Presenter, ResultView, SearchController, SessionInput,
    UserAction, WidgetEvent,
};
use tokio::sync::mpsc;

use crate::shops::print_shops;

#[derive(Debug, Default)]
pub(crate) struct Script {
    pub region: Option<String>,
    pub brands: Vec<BrandId>,
    pub pans: Vec<ViewportBounds>,
}

impl Script {
    fn into_inputs(self) -> Vec<Vec<SessionInput>> {
        let mut steps = Vec::new();
        let mut choices = Vec::new();
        if let Some(code) = self.region {
            choices.push(SessionInput::Action(UserAction::SelectRegion(code)));
        }
        choices.extend(
            self.brands
                .into_iter()
                .map(|id| SessionInput::Action(UserAction::ToggleBrand(id))),
        );
        if !choices.is_empty() {
            steps.push(choices);
        }
        for bounds in self.pans {
            steps.push(vec![
                SessionInput::Widget(WidgetEvent::InteractionStarted),
                SessionInput::Widget(WidgetEvent::Moved(bounds)),
                SessionInput::Widget(WidgetEvent::MoveEnded(bounds)),
            ]);
            steps.push(vec![SessionInput::Action(UserAction::SearchThisArea)]);
        }
        steps
    }
}

#[derive(Debug, Default)]
struct ConsolePresenter {
    renders: usize,
}

impl Presenter for ConsolePresenter {
    fn center_on(&mut self, center: Coordinate) {
        println!("map centered on {center}");
    }

    fn render(&mut self, controller: &SearchController) {
        self.renders += 1;
        let filter = controller.filter();
        let region = if filter.region().is_empty() {
            "any"
        } else {
            filter.region()
        };
        let brands: Vec<String> = filter
            .selected_brands()
            .iter()
            .map(|id| {
                controller
                    .brand_label(*id)
                    .map_or_else(|| format!("#{id}"), str::to_string)
            })
            .collect();
        println!(
            "--- render {} | region: {region} | brands: {} ---",
            self.renders,
            if brands.is_empty() {
                "all".to_string()
            } else {
                brands.join(", ")
            }
        );

        match controller.result_view() {
            ResultView::NotSearched => println!("move the map to search"),
            ResultView::Loading => println!("searching..."),
            ResultView::Empty => println!("no shops match the current filters"),
            ResultView::Shops(shops) => {
                print_shops(shops);
                match serde_json::to_string(&controller.markers()) {
                    Ok(json) => println!("markers: {json}"),
                    Err(e) => tracing::warn!(error = %e, "could not encode markers"),
                }
            }
        }
        if controller.ui_state().show_affordance {
            println!("[ search this area ]");
        }
        if let Some(error) = controller.last_error() {
            println!("error: {error}");
        }
    }
}

async fn drive(
    inputs: mpsc::Sender<SessionInput>,
    script: Script,
    pause: Duration,
) -> anyhow::Result<()> {
    for step in script.into_inputs() {
        tokio::time::sleep(pause).await;
        for input in step {
            inputs.send(input).await?;
        }
    }
    Ok(())
}

async fn explore_with<L: LocationProvider>(
    client: &ShopClient,
    locator: &L,
    settings: ControllerSettings,
    debounce: Duration,
    script: Script,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(32);
    let mut presenter = ConsolePresenter::default();
    // Long enough for the debounce to fire and a typical response to land.
    let pause = debounce * 2 + Duration::from_millis(500);

    let (controller, driven) = tokio::join!(
        run_session(client, locator, &mut presenter, settings, debounce, rx),
        drive(tx, script, pause)
    );
    driven?;

    println!(
        "session ended after {} renders with {} of {} shops visible",
        presenter.renders,
        controller.visible().len(),
        controller.results().len()
    );
    Ok(())
}

/// Runs the session against the configured backend.
///
/// # Errors
///
/// Returns an error if the session stops before the script finishes.
pub(crate) async fn run_explore(
    client: &ShopClient,
    config: &AppConfig,
    device: Option<Coordinate>,
    preload: bool,
    script: Script,
) -> anyhow::Result<()> {
    let mut settings = ControllerSettings::from_app_config(config);
    if preload {
        settings.search_mode = SearchMode::RegionPreload;
    }
    let debounce = Duration::from_millis(config.viewport_debounce_ms);
    tracing::info!(mode = %settings.search_mode, ?device, "starting explore session");

    match device {
        Some(position) => {
            explore_with(client, &FixedLocation(position), settings, debounce, script).await
        }
        None => explore_with(client, &NoLocation::default(), settings, debounce, script).await,
    }
}
