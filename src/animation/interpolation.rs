use super::{Animation, Clock, SpringParams};

/// Endpoint at which a settled [`Interpolation`] came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPosition {
    /// Progress 0, the starting value.
    Start,
    /// Progress 1, the destination value.
    End,
}

/// Spring parameters used to resume an interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTiming {
    pub damping_ratio: f64,
    /// In progress units per second, positive towards progress 1.
    pub initial_velocity: f64,
}

/// A resumable interpolation between two values.
///
/// The position is expressed as a progress fraction where 0 is `from` and 1 is `to`. While no
/// motion is running the progress can be set directly; [`Interpolation::continue_with`] then
/// springs from wherever the progress currently is towards the end selected by the reversed
/// flag. Motion can be redirected mid-flight, in which case the current velocity carries over.
///
/// The completion payload `T` is handed out at most once, when the motion settles.
#[derive(Debug)]
pub struct Interpolation<T> {
    clock: Clock,
    from: f64,
    to: f64,
    /// Progress while paused.
    fraction: f64,
    reversed: bool,
    params: SpringParams,
    duration_factor: f64,
    motion: Option<Animation>,
    completion: Option<T>,
}

impl<T> Interpolation<T> {
    pub fn new(clock: Clock, from: f64, to: f64, params: SpringParams) -> Self {
        Self {
            clock,
            from,
            to,
            fraction: 0.,
            reversed: false,
            params,
            duration_factor: 1.,
            motion: None,
            completion: None,
        }
    }

    /// Returns the progress clamped to `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.raw_progress().clamp(0., 1.)
    }

    /// Returns the progress including spring overshoot.
    pub fn raw_progress(&self) -> f64 {
        self.motion.as_ref().map_or(self.fraction, Animation::value)
    }

    /// Returns the interpolated value, overshoot included.
    pub fn value(&self) -> f64 {
        self.from + (self.to - self.from) * self.raw_progress()
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    /// Moves the endpoints without affecting progress.
    pub fn set_endpoints(&mut self, from: f64, to: f64) {
        self.from = from;
        self.to = to;
    }

    /// Pauses any motion and jumps to `progress`.
    pub fn set_progress(&mut self, progress: f64) {
        self.motion = None;
        self.fraction = if progress.is_nan() {
            0.
        } else {
            progress.clamp(0., 1.)
        };
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn set_reversed(&mut self, reversed: bool) {
        if self.reversed == reversed {
            return;
        }
        self.reversed = reversed;

        let target = self.target();
        if let Some(motion) = &mut self.motion {
            if !motion.is_done() {
                *motion = motion.restarted(motion.value(), target, motion.velocity());
            } else if motion.to() != target {
                *motion = motion.restarted(motion.to(), target, 0.);
            }
        }
    }

    pub fn reverse(&mut self) {
        self.set_reversed(!self.reversed);
    }

    fn target(&self) -> f64 {
        if self.reversed {
            0.
        } else {
            1.
        }
    }

    /// Springs from the current progress towards the current target.
    pub fn continue_with(&mut self, timing: SpringTiming, duration_factor: f64) {
        self.params = SpringParams::new(
            timing.damping_ratio,
            self.params.stiffness,
            self.params.epsilon,
        );
        self.duration_factor = duration_factor;

        let from = self.raw_progress();
        let anim = Animation::spring(
            self.clock.clone(),
            from,
            self.target(),
            timing.initial_velocity,
            self.params,
        );
        self.motion = Some(anim.with_duration_factor(duration_factor));
    }

    pub fn duration_factor(&self) -> f64 {
        self.duration_factor
    }

    pub fn params(&self) -> SpringParams {
        self.params
    }

    /// Sets the payload handed out when the motion settles, replacing any previous one.
    pub fn add_completion(&mut self, payload: T) {
        self.completion = Some(payload);
    }

    pub fn completion(&self) -> Option<&T> {
        self.completion.as_ref()
    }

    /// Drops the pending completion so that it never fires.
    pub fn cancel_completion(&mut self) -> Option<T> {
        self.completion.take()
    }

    /// Returns `true` while a motion is running.
    pub fn is_running(&self) -> bool {
        self.motion.as_ref().is_some_and(|motion| !motion.is_done())
    }

    /// Returns `true` once a motion has come to rest at its target.
    pub fn is_settled(&self) -> bool {
        self.motion.as_ref().is_some_and(Animation::is_done)
    }

    pub fn position(&self) -> AnimationPosition {
        if self.progress() >= 1. {
            AnimationPosition::End
        } else {
            AnimationPosition::Start
        }
    }

    /// Hands out the completion payload if the motion has settled.
    ///
    /// Returns `None` on every later call.
    pub fn poll_completion(&mut self) -> Option<(T, AnimationPosition)> {
        if !self.is_settled() {
            return None;
        }

        let payload = self.completion.take()?;
        Some((payload, self.position()))
    }
}
