//! Drag and tap handling.

use super::run::{AnimationRun, Commit, GestureSession};
use super::{SwitchState, VerticalSwitch};
use crate::animation::{Interpolation, SpringTiming};

/// Scrubbing never reaches the endpoints exactly, which would read as a settled run.
const MIN_SCRUB_PROGRESS: f64 = 0.0001;
const MAX_SCRUB_PROGRESS: f64 = 0.9999;

impl VerticalSwitch {
    pub(super) fn drag_begin(&mut self) {
        self.finish_or_discard_run();

        let origin = self.state;
        let target = origin.opposite();

        let id = self.run_ids.next();
        let interpolation = Interpolation::new(
            self.clock.clone(),
            self.layout.resting_offset(origin),
            self.layout.resting_offset(target),
            self.options.spring_params(),
        );
        self.run = Some(AnimationRun {
            id,
            origin,
            target,
            interpolation,
        });
        self.session = Some(GestureSession {
            origin,
            run: id,
            delta_y: 0.,
            velocity_y: 0.,
        });

        trace!("drag {} began in {origin:?}", id.get());
    }

    pub(super) fn drag_update(&mut self, delta_y: f64, velocity_y: f64) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.delta_y = delta_y;
        session.velocity_y = velocity_y;
        let session = *session;

        let progress = self.drag_progress(session.origin, delta_y);

        if self
            .options
            .early_commit
            .is_some_and(|threshold| progress > threshold)
        {
            debug!("drag progress {progress:.3} crossed the early commit threshold");
            self.drag_end(delta_y, velocity_y);
            return;
        }

        let Some(run) = self.run.as_mut().filter(|run| run.id == session.run) else {
            return;
        };
        run.interpolation.set_progress(progress);
        trace!("drag {} progress {progress:.4}", session.run.get());
    }

    pub(super) fn drag_end(&mut self, delta_y: f64, velocity_y: f64) {
        let Some(session) = self.session.take() else {
            return;
        };

        if !self
            .run
            .as_ref()
            .is_some_and(|run| run.id == session.run)
        {
            // The run was superseded while dragging.
            self.input.set_enabled(true);
            return;
        }

        if self
            .run
            .as_ref()
            .is_some_and(|run| run.interpolation.progress() == 1.)
        {
            debug!("drag {} ended on a settled run", session.run.get());
            self.run = None;
            self.input.set_enabled(true);
            return;
        }

        let origin = session.origin;
        let commit = self.should_commit(origin, delta_y, velocity_y);
        let destination = if commit { origin.opposite() } else { origin };
        let initial_velocity = self.progress_velocity(origin, velocity_y);

        debug!(
            "drag {} ended at {delta_y:.1} with velocity {velocity_y:.1}: {}",
            session.run.get(),
            if commit { "committing" } else { "snapping back" }
        );

        self.input.set_enabled(false);

        let Some(run) = &mut self.run else {
            return;
        };
        run.interpolation.set_reversed(!commit);
        run.interpolation.add_completion(Commit {
            run: run.id,
            destination,
            notify: true,
        });
        run.interpolation.continue_with(
            SpringTiming {
                damping_ratio: self.options.damping_ratio,
                initial_velocity,
            },
            self.options.duration_factor,
        );
    }

    pub(super) fn tap(&mut self, y: f64) {
        // Observe a run that settled since the last frame before comparing states.
        if self.run.as_ref().is_some_and(|run| run.interpolation.is_settled()) {
            self.finish_or_discard_run();
        }

        let destination = self.layout.tap_destination(y);
        if destination == self.state && self.run.is_none() {
            trace!("tap at {y:.1} keeps {destination:?}");
            return;
        }

        debug!("tap at {y:.1} moves to {destination:?}");
        self.start_transition(destination, true);
    }

    /// Decides whether a drag that started in `origin` commits to the opposite state.
    pub(super) fn should_commit(&self, origin: SwitchState, delta_y: f64, velocity_y: f64) -> bool {
        let direction = origin.direction();
        direction * delta_y >= self.commit_distance()
            || direction * velocity_y >= self.options.commit_velocity
    }

    /// Maps a drag displacement to run progress.
    fn drag_progress(&mut self, origin: SwitchState, delta_y: f64) -> f64 {
        if self.layout.is_degenerate() {
            if !self.warned_degenerate_layout {
                warn!("dragging a switch with degenerate layout: {:?}", self.layout);
                self.warned_degenerate_layout = true;
            }
            return MAX_SCRUB_PROGRESS;
        }

        let progress = origin.direction() * delta_y / self.layout.center_y();
        if progress.is_nan() {
            return MIN_SCRUB_PROGRESS;
        }
        progress.clamp(MIN_SCRUB_PROGRESS, MAX_SCRUB_PROGRESS)
    }

    /// Converts a pointer velocity into progress per second towards the drag target.
    fn progress_velocity(&self, origin: SwitchState, velocity_y: f64) -> f64 {
        if self.layout.is_degenerate() || !velocity_y.is_finite() {
            return 0.;
        }
        origin.direction() * velocity_y / self.layout.center_y()
    }
}
