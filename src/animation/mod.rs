//! Time-driven animations.
//!
//! [`Animation`] is a one-shot spring from one value to another. [`Interpolation`] builds on it to
//! provide a resumable, reversible progress value that can also be scrubbed directly by a gesture.

use std::time::Duration;

mod clock;
mod interpolation;
mod spring;

pub use self::clock::Clock;
pub use self::interpolation::{AnimationPosition, Interpolation, SpringTiming};
pub use self::spring::{Spring, SpringParams};

#[derive(Debug, Clone)]
pub struct Animation {
    /// Real-time velocity at the start, in units of value per second.
    initial_velocity: f64,
    /// Time scale applied to the spring; 0.5 plays it twice as fast.
    duration_factor: f64,
    duration: Duration,
    start_time: Duration,
    clock: Clock,
    spring: Spring,
}

impl Animation {
    /// Creates a spring animation.
    ///
    /// `initial_velocity` is in units of value per second.
    pub fn spring(
        clock: Clock,
        from: f64,
        to: f64,
        initial_velocity: f64,
        params: SpringParams,
    ) -> Self {
        let start_time = clock.now();
        let mut rv = Self {
            initial_velocity,
            duration_factor: 1.,
            duration: Duration::ZERO,
            start_time,
            clock,
            spring: Spring {
                from,
                to,
                initial_velocity,
                params,
            },
        };
        rv.update_duration();
        rv
    }

    /// Scales the animation time. The initial velocity is preserved in real time.
    pub fn with_duration_factor(mut self, factor: f64) -> Self {
        self.duration_factor = if factor.is_finite() { factor.max(0.) } else { 1. };
        self.spring.initial_velocity = self.initial_velocity * self.duration_factor;
        self.update_duration();
        self
    }

    fn update_duration(&mut self) {
        if self.duration_factor == 0. {
            self.duration = Duration::ZERO;
            return;
        }

        let base = self.spring.duration();
        self.duration = if base == Duration::MAX {
            base
        } else {
            Duration::try_from_secs_f64(base.as_secs_f64() * self.duration_factor)
                .unwrap_or(Duration::MAX)
        };
    }

    /// Restarts the spring from `from` to `to`, keeping its parameters and time scale.
    pub fn restarted(&self, from: f64, to: f64, initial_velocity: f64) -> Self {
        Self::spring(
            self.clock.clone(),
            from,
            to,
            initial_velocity,
            self.spring.params,
        )
        .with_duration_factor(self.duration_factor)
    }

    pub fn is_done(&self) -> bool {
        if self.clock.should_complete_instantly() {
            return true;
        }

        self.clock.now() >= self.end_time()
    }

    pub fn value(&self) -> f64 {
        if self.is_done() {
            return self.spring.to;
        }

        self.spring.value_at(self.spring_time())
    }

    /// Returns the current velocity in units of value per second.
    pub fn velocity(&self) -> f64 {
        if self.is_done() {
            return 0.;
        }

        self.spring.velocity_at(self.spring_time()) / self.duration_factor
    }

    /// Time elapsed on the spring's own time scale.
    fn spring_time(&self) -> Duration {
        let passed = self.clock.now().saturating_sub(self.start_time);
        Duration::try_from_secs_f64(passed.as_secs_f64() / self.duration_factor)
            .unwrap_or(Duration::MAX)
    }

    pub fn from(&self) -> f64 {
        self.spring.from
    }

    pub fn to(&self) -> f64 {
        self.spring.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn end_time(&self) -> Duration {
        self.start_time.saturating_add(self.duration)
    }
}
