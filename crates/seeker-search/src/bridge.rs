//! Adapter between a map widget's raw camera events and the controller.
//!
//! Widgets report a stream of `Moved` events while the camera animates or
//! the user drags. The bridge keeps only the latest box and reports it once
//! the camera has been still for the debounce window. Every settle carries
//! its origin so camera moves the app itself requested do not count as the
//! user moving the map.

use std::time::Duration;

use seeker_core::{ShopId, ViewportBounds};
use tokio::time::Instant;

use crate::event::{SearchEvent, ViewportOrigin};

/// Raw input from the map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    /// Drag, pinch, wheel or keyboard interaction began.
    InteractionStarted,
    Moved(ViewportBounds),
    /// The camera stopped. Some widgets never send this.
    MoveEnded(ViewportBounds),
    MarkerClicked(ShopId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BridgeSignal {
    UserInteractionStarted,
    ViewportSettled {
        bounds: ViewportBounds,
        origin: ViewportOrigin,
    },
    ShopSelected(ShopId),
}

impl From<BridgeSignal> for SearchEvent {
    fn from(signal: BridgeSignal) -> Self {
        match signal {
            BridgeSignal::UserInteractionStarted => SearchEvent::UserInteractionStarted,
            BridgeSignal::ViewportSettled { bounds, origin } => {
                SearchEvent::ViewportSettled { bounds, origin }
            }
            BridgeSignal::ShopSelected(id) => SearchEvent::ShopSelected(id),
        }
    }
}

/// How long a requested camera move may take to start. A widget that is
/// already at the target never reports a move at all.
pub const PROGRAMMATIC_START_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct ViewportBridge {
    debounce: Duration,
    /// Origin of the move currently in progress.
    origin: ViewportOrigin,
    /// A requested move that has not produced a `Moved` event yet.
    programmatic_expires: Option<Instant>,
    pending: Option<(ViewportBounds, Instant)>,
    last_settled: Option<ViewportBounds>,
}

impl ViewportBridge {
    /// The first settle after construction is the widget's initial layout,
    /// so it is treated as programmatic.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            origin: ViewportOrigin::Programmatic,
            programmatic_expires: None,
            pending: None,
            last_settled: None,
        }
    }

    /// Call before asking the widget to move its camera.
    ///
    /// If no move starts within [`PROGRAMMATIC_START_WINDOW`], the next
    /// move is attributed to the user.
    pub fn begin_programmatic_move(&mut self, now: Instant) {
        self.origin = ViewportOrigin::Programmatic;
        self.programmatic_expires = Some(now + PROGRAMMATIC_START_WINDOW);
    }

    /// Feeds one widget event. Settles are only produced by [`Self::poll`].
    pub fn handle(&mut self, event: WidgetEvent, now: Instant) -> Vec<BridgeSignal> {
        match event {
            WidgetEvent::InteractionStarted => {
                self.origin = ViewportOrigin::User;
                self.programmatic_expires = None;
                vec![BridgeSignal::UserInteractionStarted]
            }
            WidgetEvent::Moved(bounds) | WidgetEvent::MoveEnded(bounds) => {
                if self.programmatic_expires.take().is_some_and(|e| now > e) {
                    tracing::debug!("requested camera move never started, move is the user's");
                    self.origin = ViewportOrigin::User;
                }
                self.pending = Some((bounds, now + self.debounce));
                Vec::new()
            }
            WidgetEvent::MarkerClicked(id) => vec![BridgeSignal::ShopSelected(id)],
        }
    }

    /// When the pending settle is due, if any.
    #[must_use]
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Emits the pending settle once its quiet period has elapsed.
    ///
    /// A box identical to the previous settle is swallowed.
    pub fn poll(&mut self, now: Instant) -> Option<BridgeSignal> {
        let (bounds, deadline) = self.pending?;
        if now < deadline {
            return None;
        }
        self.pending = None;
        let origin = std::mem::replace(&mut self.origin, ViewportOrigin::User);

        if self.last_settled == Some(bounds) {
            tracing::trace!("viewport unchanged, settle suppressed");
            return None;
        }
        self.last_settled = Some(bounds);
        tracing::debug!(?origin, ?bounds, "viewport settled");
        Some(BridgeSignal::ViewportSettled { bounds, origin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn vb(south: f64, north: f64) -> ViewportBounds {
        ViewportBounds::new(south, north, 121.4, 121.6).unwrap()
    }

    #[test]
    fn burst_of_moves_settles_once_with_latest_box() {
        let mut bridge = ViewportBridge::new(DEBOUNCE);
        let t0 = Instant::now();
        bridge.handle(WidgetEvent::Moved(vb(24.0, 25.0)), t0);
        bridge.handle(WidgetEvent::Moved(vb(24.1, 25.1)), t0 + Duration::from_millis(100));
        bridge.handle(WidgetEvent::Moved(vb(24.2, 25.2)), t0 + Duration::from_millis(200));

        assert_eq!(bridge.poll(t0 + Duration::from_millis(400)), None);
        let deadline = bridge.settle_deadline().unwrap();
        assert_eq!(deadline, t0 + Duration::from_millis(500));

        let signal = bridge.poll(deadline).unwrap();
        assert_eq!(
            signal,
            BridgeSignal::ViewportSettled {
                bounds: vb(24.2, 25.2),
                origin: ViewportOrigin::Programmatic,
            }
        );
        assert!(bridge.settle_deadline().is_none());
        assert_eq!(bridge.poll(deadline + DEBOUNCE), None);
    }

    #[test]
    fn origin_returns_to_user_after_initial_settle() {
        let mut bridge = ViewportBridge::new(DEBOUNCE);
        let t0 = Instant::now();
        bridge.handle(WidgetEvent::MoveEnded(vb(24.0, 25.0)), t0);
        bridge.poll(t0 + DEBOUNCE);

        // Wheel zoom with no interaction-start event.
        bridge.handle(WidgetEvent::Moved(vb(24.5, 25.0)), t0 + DEBOUNCE * 2);
        let signal = bridge.poll(t0 + DEBOUNCE * 3).unwrap();
        assert!(matches!(
            signal,
            BridgeSignal::ViewportSettled {
                origin: ViewportOrigin::User,
                ..
            }
        ));
    }

    #[test]
    fn programmatic_move_is_tagged_until_user_takes_over() {
        let mut bridge = ViewportBridge::new(DEBOUNCE);
        let t0 = Instant::now();
        bridge.begin_programmatic_move(t0);
        bridge.handle(WidgetEvent::Moved(vb(1.0, 2.0)), t0);
        let signal = bridge.poll(t0 + DEBOUNCE).unwrap();
        assert!(matches!(
            signal,
            BridgeSignal::ViewportSettled {
                origin: ViewportOrigin::Programmatic,
                ..
            }
        ));

        bridge.begin_programmatic_move(t0 + DEBOUNCE);
        let signals = bridge.handle(WidgetEvent::InteractionStarted, t0 + DEBOUNCE);
        assert_eq!(signals, vec![BridgeSignal::UserInteractionStarted]);
        bridge.handle(WidgetEvent::Moved(vb(1.5, 2.5)), t0 + DEBOUNCE);
        let signal = bridge.poll(t0 + DEBOUNCE * 2).unwrap();
        assert!(matches!(
            signal,
            BridgeSignal::ViewportSettled {
                origin: ViewportOrigin::User,
                ..
            }
        ));
    }

    #[test]
    fn requested_move_that_never_starts_expires() {
        let mut bridge = ViewportBridge::new(DEBOUNCE);
        let t0 = Instant::now();
        bridge.handle(WidgetEvent::Moved(vb(1.0, 2.0)), t0);
        bridge.poll(t0 + DEBOUNCE);

        // Map already centered on the target: no camera move follows.
        bridge.begin_programmatic_move(t0 + DEBOUNCE);
        let later = t0 + DEBOUNCE + PROGRAMMATIC_START_WINDOW * 2;
        // Wheel zoom with no interaction-start event.
        bridge.handle(WidgetEvent::Moved(vb(1.2, 1.8)), later);
        let signal = bridge.poll(later + DEBOUNCE).unwrap();
        assert!(matches!(
            signal,
            BridgeSignal::ViewportSettled {
                origin: ViewportOrigin::User,
                ..
            }
        ));
    }

    #[test]
    fn long_programmatic_animation_stays_programmatic_once_started() {
        let mut bridge = ViewportBridge::new(DEBOUNCE);
        let t0 = Instant::now();
        bridge.begin_programmatic_move(t0);
        bridge.handle(WidgetEvent::Moved(vb(1.0, 2.0)), t0 + Duration::from_millis(100));
        let late_frame = t0 + PROGRAMMATIC_START_WINDOW * 3;
        bridge.handle(WidgetEvent::MoveEnded(vb(1.1, 2.1)), late_frame);
        let signal = bridge.poll(late_frame + DEBOUNCE).unwrap();
        assert!(matches!(
            signal,
            BridgeSignal::ViewportSettled {
                origin: ViewportOrigin::Programmatic,
                ..
            }
        ));
    }

    #[test]
    fn identical_box_is_not_reported_twice() {
        let mut bridge = ViewportBridge::new(DEBOUNCE);
        let t0 = Instant::now();
        bridge.handle(WidgetEvent::Moved(vb(24.0, 25.0)), t0);
        assert!(bridge.poll(t0 + DEBOUNCE).is_some());
        bridge.handle(WidgetEvent::MoveEnded(vb(24.0, 25.0)), t0 + DEBOUNCE);
        assert!(bridge.poll(t0 + DEBOUNCE * 2).is_none());
        assert!(bridge.settle_deadline().is_none());
    }

    #[test]
    fn marker_click_selects_shop_immediately() {
        let mut bridge = ViewportBridge::new(DEBOUNCE);
        let signals = bridge.handle(WidgetEvent::MarkerClicked(7), Instant::now());
        assert_eq!(signals, vec![BridgeSignal::ShopSelected(7)]);
        assert_eq!(
            SearchEvent::from(signals[0]),
            SearchEvent::ShopSelected(7)
        );
    }
}
