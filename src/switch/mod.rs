//! The vertical switch controller.
//!
//! [`VerticalSwitch`] owns the two-state model. Pointer input is interpreted by the
//! [`InputAdapter`] into gestures, gestures drive an [`AnimationRun`], and the run's completion
//! commits the new state and publishes it to subscribers.
//!
//! The host is expected to:
//! - forward pointer events through [`PointerInput`],
//! - call [`VerticalSwitch::advance_animations`] once per frame after clearing the clock,
//! - draw the handle at [`VerticalSwitch::handle_offset`].

use serde::Serialize;
use vswitch_config::{Config, InitialState};

use crate::animation::{Clock, Interpolation, SpringTiming};
use crate::input::{GestureEvent, GestureHandler, InputAdapter, PointerEvent, PointerTarget};
use crate::notifications::{Notifier, Subscription};

mod gesture;
mod layout;
mod options;
mod run;

pub use self::layout::{Rect, SwitchLayout};
pub use self::options::Options;
pub use self::run::{AnimationRun, Commit, GestureSession, RunId};

use self::run::RunIds;


/// Progress a tap or programmatic move starts from.
const TAP_START_PROGRESS: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwitchState {
    Top,
    Bottom,
}

impl SwitchState {
    pub fn opposite(self) -> Self {
        match self {
            SwitchState::Top => SwitchState::Bottom,
            SwitchState::Bottom => SwitchState::Top,
        }
    }

    /// Sign of a vertical movement leaving this state.
    pub fn direction(self) -> f64 {
        match self {
            SwitchState::Top => 1.,
            SwitchState::Bottom => -1.,
        }
    }
}

impl From<InitialState> for SwitchState {
    fn from(value: InitialState) -> Self {
        match value {
            InitialState::Top => SwitchState::Top,
            InitialState::Bottom => SwitchState::Bottom,
        }
    }
}

/// Observable state of the switch at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwitchSnapshot {
    pub state: SwitchState,
    pub progress: f64,
    pub handle_offset: f64,
    pub is_input_enabled: bool,
    pub is_animating: bool,
}

/// Raw pointer input on the control.
pub trait PointerInput {
    fn on_pointer_down(&mut self, event: PointerEvent);
    fn on_pointer_motion(&mut self, event: PointerEvent);
    fn on_pointer_up(&mut self, event: PointerEvent);
    fn on_pointer_cancel(&mut self);
}

#[derive(Debug)]
pub struct VerticalSwitch {
    /// Committed state.
    state: SwitchState,
    /// Last value sent to subscribers.
    last_published: SwitchState,
    layout: SwitchLayout,
    options: Options,
    clock: Clock,
    input: InputAdapter,
    run: Option<AnimationRun>,
    session: Option<GestureSession>,
    notifier: Notifier<SwitchState>,
    run_ids: RunIds,
    warned_degenerate_layout: bool,
}

impl VerticalSwitch {
    pub fn new(clock: Clock, layout: SwitchLayout, options: Options) -> Self {
        let state = options.initial_state;
        if layout.is_degenerate() {
            warn!("switch created with degenerate layout: {layout:?}");
        }

        Self {
            state,
            last_published: state,
            layout,
            input: InputAdapter::new(options.tap_slop),
            options,
            clock,
            run: None,
            session: None,
            notifier: Notifier::new(),
            run_ids: RunIds::default(),
            warned_degenerate_layout: layout.is_degenerate(),
        }
    }

    pub fn from_config(clock: Clock, config: &Config) -> Self {
        Self::new(
            clock,
            SwitchLayout::from_config(&config.layout),
            Options::from_config(config),
        )
    }

    /// Returns the committed state.
    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Returns the state the switch will be in once the current run settles.
    pub fn target_state(&self) -> SwitchState {
        self.run
            .as_ref()
            .and_then(AnimationRun::commit)
            .map_or(self.state, |commit| commit.destination)
    }

    pub fn subscribe(&mut self) -> Subscription<SwitchState> {
        self.notifier.subscribe()
    }

    pub fn layout(&self) -> &SwitchLayout {
        &self.layout
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input.is_enabled()
    }

    pub fn is_disposed(&self) -> bool {
        self.notifier.is_closed()
    }

    /// Minimum drag distance towards the other state that commits.
    pub fn commit_distance(&self) -> f64 {
        if self.layout.is_degenerate() {
            return 0.;
        }
        self.layout.height * self.options.commit_distance_fraction
    }

    /// Returns the active run, if any.
    pub fn run(&self) -> Option<&AnimationRun> {
        self.run.as_ref()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Progress of the active run, or 0 when resting.
    pub fn progress(&self) -> f64 {
        self.run
            .as_ref()
            .map_or(0., |run| run.interpolation.progress())
    }

    /// Vertical offset of the handle centre, including spring overshoot.
    pub fn handle_offset(&self) -> f64 {
        self.run.as_ref().map_or_else(
            || self.layout.resting_offset(self.state),
            |run| run.interpolation.value(),
        )
    }

    pub fn handle_rect(&self) -> Rect {
        self.layout.handle(self.handle_offset())
    }

    /// Returns `true` while a committing run still has to settle or be observed.
    pub fn are_animations_ongoing(&self) -> bool {
        self.run.as_ref().is_some_and(AnimationRun::is_committing)
    }

    pub fn snapshot(&self) -> SwitchSnapshot {
        SwitchSnapshot {
            state: self.state,
            progress: self.progress(),
            handle_offset: self.handle_offset(),
            is_input_enabled: self.input.is_enabled(),
            is_animating: self.are_animations_ongoing(),
        }
    }

    pub fn set_layout(&mut self, layout: SwitchLayout) {
        if self.layout == layout {
            return;
        }

        if layout.is_degenerate() {
            warn!("switch layout became degenerate: {layout:?}");
        }
        self.warned_degenerate_layout = layout.is_degenerate();
        self.layout = layout;

        if let Some(run) = &mut self.run {
            run.interpolation.set_endpoints(
                layout.resting_offset(run.origin),
                layout.resting_offset(run.target),
            );
        }
    }

    pub fn set_options(&mut self, options: Options) {
        self.input.set_tap_slop(options.tap_slop);
        self.options = options;
    }

    /// Lets the active run observe the clock, committing it once it settles.
    pub fn advance_animations(&mut self) {
        let Some(run) = &mut self.run else {
            return;
        };

        if let Some((commit, position)) = run.interpolation.poll_completion() {
            trace!("run {} settled at {position:?}", commit.run.get());
            self.complete(commit);
        }
    }

    /// Moves to `state` through the same animated path as a tap.
    ///
    /// Does nothing if the switch is at, or already heading to, `state`. `notify` controls
    /// whether the change is published.
    pub fn move_to(&mut self, state: SwitchState, notify: bool) {
        if self.is_disposed() {
            debug!("ignoring move to {state:?} on a disposed switch");
            return;
        }

        if state == self.target_state() {
            return;
        }

        debug!("moving to {state:?}, notify: {notify}");
        self.start_transition(state, notify);
    }

    /// Closes the notification stream and stops all motion.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }

        debug!("disposing switch in state {:?}", self.state);
        if let Some(mut run) = self.run.take() {
            run.interpolation.cancel_completion();
        }
        self.session = None;
        self.input.set_enabled(false);
        self.notifier.close();
    }

    fn pointer_target(&self, x: f64, y: f64) -> Option<PointerTarget> {
        if !self.layout.contains(x, y) {
            return None;
        }

        if self.handle_rect().contains(x, y) {
            Some(PointerTarget::Handle)
        } else {
            Some(PointerTarget::Background)
        }
    }

    /// Makes room for a new run.
    ///
    /// A run that already settled but whose completion was not observed yet is completed first.
    /// Anything else is discarded, and its completion will never fire.
    fn finish_or_discard_run(&mut self) {
        let Some(mut run) = self.run.take() else {
            return;
        };

        if run.interpolation.is_settled() {
            if let Some((commit, _)) = run.interpolation.poll_completion() {
                self.complete(commit);
                return;
            }
        }

        if let Some(commit) = run.interpolation.cancel_completion() {
            debug!(
                "superseding run {} towards {:?}",
                commit.run.get(),
                commit.destination
            );
        }
    }

    /// Starts a tap-like run from the current handle position towards `destination`.
    fn start_transition(&mut self, destination: SwitchState, notify: bool) {
        let from = self.handle_offset();
        self.finish_or_discard_run();
        self.session = None;
        self.input.set_enabled(false);

        let id = self.run_ids.next();
        let mut interpolation = Interpolation::new(
            self.clock.clone(),
            from,
            self.layout.resting_offset(destination),
            self.options.spring_params(),
        );
        interpolation.set_progress(TAP_START_PROGRESS);
        interpolation.add_completion(Commit {
            run: id,
            destination,
            notify,
        });
        interpolation.continue_with(
            SpringTiming {
                damping_ratio: self.options.damping_ratio,
                initial_velocity: self.options.tap_velocity,
            },
            self.options.duration_factor,
        );

        self.run = Some(AnimationRun {
            id,
            origin: self.state,
            target: destination,
            interpolation,
        });
    }

    fn complete(&mut self, commit: Commit) {
        if self.run.as_ref().is_some_and(|run| run.id != commit.run) {
            // A newer run owns the switch now.
            debug!("ignoring completion of superseded run {}", commit.run.get());
            return;
        }

        self.run = None;
        self.session = None;

        let previous = self.state;
        self.state = commit.destination;
        if previous != commit.destination {
            debug!("committed {:?} -> {:?}", previous, commit.destination);
        } else {
            debug!("settled back in {:?}", commit.destination);
        }

        if commit.notify && commit.destination != self.last_published {
            self.last_published = commit.destination;
            self.notifier.publish(commit.destination);
        }

        if !self.is_disposed() {
            self.input.set_enabled(true);
        }
    }
}

impl GestureHandler for VerticalSwitch {
    fn handle_gesture(&mut self, event: GestureEvent) {
        if self.is_disposed() {
            return;
        }

        match event {
            GestureEvent::DragBegin => self.drag_begin(),
            GestureEvent::DragUpdate {
                delta_y,
                velocity_y,
            } => self.drag_update(delta_y, velocity_y),
            GestureEvent::DragEnd {
                delta_y,
                velocity_y,
            } => self.drag_end(delta_y, velocity_y),
            GestureEvent::Tap { y } => self.tap(y),
        }
    }
}

impl PointerInput for VerticalSwitch {
    fn on_pointer_down(&mut self, event: PointerEvent) {
        // A run that settled since the last frame re-enables input before the press is seen.
        self.advance_animations();

        let target = self.pointer_target(event.x, event.y);
        self.input.pointer_down(event, target);
    }

    fn on_pointer_motion(&mut self, event: PointerEvent) {
        self.advance_animations();

        for gesture in self.input.pointer_motion(event) {
            if !self.input.is_enabled() {
                break;
            }
            self.handle_gesture(gesture);
        }
    }

    fn on_pointer_up(&mut self, event: PointerEvent) {
        self.advance_animations();

        if let Some(gesture) = self.input.pointer_up(event) {
            self.handle_gesture(gesture);
        }
    }

    fn on_pointer_cancel(&mut self) {
        if let Some(gesture) = self.input.pointer_cancel() {
            self.handle_gesture(gesture);
        }
    }
}

impl Drop for VerticalSwitch {
    fn drop(&mut self) {
        self.notifier.close();
    }
}
