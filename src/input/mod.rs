//! Pointer input interpretation.
//!
//! [`InputAdapter`] turns raw press/motion/release events into phase-tagged [`GestureEvent`]s:
//! drags of the handle and taps anywhere on the control. It knows nothing about the switch
//! state; the controller decides what a gesture means and enables or disables the adapter.

use std::time::Duration;

use arrayvec::ArrayVec;

pub mod swipe_tracker;

use self::swipe_tracker::SwipeTracker;

/// A raw pointer sample in the control's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Monotonic event time.
    pub time: Duration,
}

/// What a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The draggable handle. Presses here can become drags or taps.
    Handle,
    /// Anywhere else inside the control bounds. Presses here can only become taps.
    Background,
}

/// A structured gesture phase consumed by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    DragBegin,
    /// `delta_y` is the vertical displacement from the press point.
    DragUpdate { delta_y: f64, velocity_y: f64 },
    DragEnd { delta_y: f64, velocity_y: f64 },
    /// A press and release that stayed within the tap slop.
    Tap { y: f64 },
}

/// Receiver of interpreted gestures.
pub trait GestureHandler {
    fn handle_gesture(&mut self, event: GestureEvent);
}

/// Events produced by a single pointer sample.
pub type Gestures = ArrayVec<GestureEvent, 2>;

#[derive(Debug)]
struct PointerSession {
    start: (f64, f64),
    target: PointerTarget,
    is_dragging: bool,
    tracker: SwipeTracker,
}

#[derive(Debug)]
pub struct InputAdapter {
    is_enabled: bool,
    tap_slop: f64,
    session: Option<PointerSession>,
}

impl PointerSession {
    fn delta_y(&self) -> f64 {
        self.tracker.pos()
    }

    /// Records the pointer at `event`. Samples the tracker rejects leave the displacement as is.
    fn track(&mut self, event: PointerEvent) {
        let delta = event.y - self.start.1 - self.tracker.pos();
        self.tracker.push(delta, event.time);
    }

    fn exceeds_slop(&self, x: f64, y: f64, slop: f64) -> bool {
        let dx = x - self.start.0;
        let dy = y - self.start.1;
        dx * dx + dy * dy > slop * slop
    }
}

impl InputAdapter {
    pub fn new(tap_slop: f64) -> Self {
        Self {
            is_enabled: true,
            tap_slop: tap_slop.max(0.),
            session: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Enables or disables input.
    ///
    /// Disabling drops the pointer session in progress; a pointer that is still held when input
    /// is enabled again is ignored until it is released and pressed anew.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.is_enabled == enabled {
            return;
        }

        trace!("input {}", if enabled { "enabled" } else { "disabled" });
        self.is_enabled = enabled;
        if !enabled {
            self.session = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_dragging)
    }

    pub fn tap_slop(&self) -> f64 {
        self.tap_slop
    }

    pub fn set_tap_slop(&mut self, tap_slop: f64) {
        self.tap_slop = tap_slop.max(0.);
    }

    /// Starts tracking a press. `target` is `None` for presses outside the control.
    pub fn pointer_down(&mut self, event: PointerEvent, target: Option<PointerTarget>) {
        if !self.is_enabled {
            return;
        }

        let Some(target) = target else {
            return;
        };

        if self.session.is_some() {
            // Single pointer only.
            return;
        }

        let mut tracker = SwipeTracker::new();
        tracker.push(0., event.time);

        self.session = Some(PointerSession {
            start: (event.x, event.y),
            target,
            is_dragging: false,
            tracker,
        });
    }

    pub fn pointer_motion(&mut self, event: PointerEvent) -> Gestures {
        let mut gestures = Gestures::new();

        let slop = self.tap_slop;
        let Some(session) = &mut self.session else {
            return gestures;
        };

        session.track(event);

        if !session.is_dragging {
            if !session.exceeds_slop(event.x, event.y, slop) {
                return gestures;
            }

            if session.target != PointerTarget::Handle {
                // Too far to be a tap, and not a drag either.
                self.session = None;
                return gestures;
            }

            session.is_dragging = true;
            gestures.push(GestureEvent::DragBegin);
        }

        gestures.push(GestureEvent::DragUpdate {
            delta_y: session.delta_y(),
            velocity_y: session.tracker.velocity(),
        });
        gestures
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        let mut session = self.session.take()?;

        session.track(event);

        if session.is_dragging {
            return Some(GestureEvent::DragEnd {
                delta_y: session.delta_y(),
                velocity_y: session.tracker.velocity(),
            });
        }

        if session.exceeds_slop(event.x, event.y, self.tap_slop) {
            return None;
        }

        Some(GestureEvent::Tap { y: event.y })
    }

    /// Aborts the pointer session. An ongoing drag ends in place without velocity.
    pub fn pointer_cancel(&mut self) -> Option<GestureEvent> {
        let session = self.session.take()?;

        session.is_dragging.then(|| GestureEvent::DragEnd {
            delta_y: session.delta_y(),
            velocity_y: 0.,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: f64, ms: u64) -> PointerEvent {
        PointerEvent {
            x: 20.,
            y,
            time: Duration::from_millis(ms),
        }
    }

    #[test]
    fn press_release_is_tap() {
        let mut input = InputAdapter::new(10.);
        input.pointer_down(at(250., 0), Some(PointerTarget::Background));
        assert!(input.pointer_motion(at(253., 10)).is_empty());
        assert_eq!(
            input.pointer_up(at(253., 20)),
            Some(GestureEvent::Tap { y: 253. })
        );
    }

    #[test]
    fn press_outside_is_ignored() {
        let mut input = InputAdapter::new(10.);
        input.pointer_down(at(250., 0), None);
        assert_eq!(input.pointer_up(at(250., 20)), None);
    }

    #[test]
    fn handle_drag_phases() {
        let mut input = InputAdapter::new(10.);
        input.pointer_down(at(75., 0), Some(PointerTarget::Handle));

        let gestures = input.pointer_motion(at(95., 10));
        assert_eq!(gestures.len(), 2);
        assert_eq!(gestures[0], GestureEvent::DragBegin);
        let GestureEvent::DragUpdate { delta_y, velocity_y } = gestures[1] else {
            panic!("expected a drag update, got {:?}", gestures[1]);
        };
        assert_eq!(delta_y, 20.);
        assert!(velocity_y > 0.);
        assert!(input.is_dragging());

        let gestures = input.pointer_motion(at(125., 20));
        assert!(matches!(
            gestures.as_slice(),
            [GestureEvent::DragUpdate { delta_y, .. }] if *delta_y == 50.
        ));

        let end = input.pointer_up(at(125., 30));
        assert!(matches!(
            end,
            Some(GestureEvent::DragEnd { delta_y, .. }) if delta_y == 50.
        ));
        assert!(!input.is_dragging());
    }

    #[test]
    fn background_swipe_is_neither_tap_nor_drag() {
        let mut input = InputAdapter::new(10.);
        input.pointer_down(at(250., 0), Some(PointerTarget::Background));
        assert!(input.pointer_motion(at(200., 10)).is_empty());
        assert_eq!(input.pointer_up(at(200., 20)), None);
    }

    #[test]
    fn disabling_drops_the_session() {
        let mut input = InputAdapter::new(10.);
        input.pointer_down(at(75., 0), Some(PointerTarget::Handle));
        input.pointer_motion(at(120., 10));
        input.set_enabled(false);
        input.set_enabled(true);

        assert!(input.pointer_motion(at(150., 20)).is_empty());
        assert_eq!(input.pointer_up(at(150., 30)), None);
    }

    #[test]
    fn disabled_input_ignores_presses() {
        let mut input = InputAdapter::new(10.);
        input.set_enabled(false);
        input.pointer_down(at(250., 0), Some(PointerTarget::Background));
        input.set_enabled(true);
        assert_eq!(input.pointer_up(at(250., 10)), None);
    }

    #[test]
    fn out_of_order_motion_does_not_skew_displacement() {
        let mut input = InputAdapter::new(10.);
        input.pointer_down(at(75., 0), Some(PointerTarget::Handle));
        input.pointer_motion(at(95., 20));
        // Older than the last sample, so the tracker drops it.
        input.pointer_motion(at(135., 10));

        let gestures = input.pointer_motion(at(105., 30));
        assert!(matches!(
            gestures.as_slice(),
            [GestureEvent::DragUpdate { delta_y, .. }] if *delta_y == 30.
        ));
        let end = input.pointer_up(at(115., 40));
        assert!(matches!(
            end,
            Some(GestureEvent::DragEnd { delta_y, velocity_y })
                if delta_y == 40. && (velocity_y - 1000.).abs() < 1e-6
        ));
    }

    #[test]
    fn tap_slop_is_never_negative() {
        let mut input = InputAdapter::new(-5.);
        assert_eq!(input.tap_slop(), 0.);
        input.set_tap_slop(4.);
        assert_eq!(input.tap_slop(), 4.);

        input.pointer_down(at(250., 0), Some(PointerTarget::Background));
        assert!(input.pointer_motion(at(255., 10)).is_empty());
        assert_eq!(input.pointer_up(at(255., 20)), None);
    }

    #[test]
    fn cancel_ends_drag_without_velocity() {
        let mut input = InputAdapter::new(10.);
        input.pointer_down(at(75., 0), Some(PointerTarget::Handle));
        input.pointer_motion(at(115., 10));
        assert_eq!(
            input.pointer_cancel(),
            Some(GestureEvent::DragEnd {
                delta_y: 40.,
                velocity_y: 0.
            })
        );
        assert_eq!(input.pointer_cancel(), None);
    }
}
