//! Viewport-driven search: the controller state machine, the map-widget
//! bridge and the session runtime that wires them to a shop store.

pub mod bridge;
pub mod controller;
pub mod event;
pub mod session;

pub use bridge::{BridgeSignal, ViewportBridge, WidgetEvent};
pub use controller::{ControllerSettings, Phase, ResultView, SearchController, UiState};
pub use event::{Command, SearchEvent, ViewportOrigin};
pub use session::{run_session, Presenter, SessionInput, UserAction};
