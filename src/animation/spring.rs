use std::time::Duration;

/// Physical parameters of a damped spring with unit mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub damping: f64,
    pub mass: f64,
    pub stiffness: f64,
    pub epsilon: f64,
}

/// A damped harmonic oscillator moving from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub from: f64,
    pub to: f64,
    /// Velocity at `t = 0`, in units of value per second.
    pub initial_velocity: f64,
    pub params: SpringParams,
}

impl SpringParams {
    pub fn new(damping_ratio: f64, stiffness: f64, epsilon: f64) -> Self {
        let damping_ratio = damping_ratio.max(0.);
        let stiffness = stiffness.max(0.);
        let epsilon = epsilon.max(0.);

        let mass = 1.;
        let critical_damping = 2. * (mass * stiffness).sqrt();
        let damping = damping_ratio * critical_damping;

        Self {
            damping,
            mass,
            stiffness,
            epsilon,
        }
    }

    pub fn damping_ratio(&self) -> f64 {
        let critical_damping = 2. * (self.mass * self.stiffness).sqrt();
        if critical_damping == 0. {
            return 0.;
        }
        self.damping / critical_damping
    }
}

impl Spring {
    pub fn value_at(&self, t: Duration) -> f64 {
        self.oscillate(t.as_secs_f64())
    }

    /// Returns the spring velocity at `t`, in units of value per second.
    pub fn velocity_at(&self, t: Duration) -> f64 {
        const DELTA: f64 = 0.0001;
        let t = t.as_secs_f64();
        (self.oscillate(t + DELTA) - self.oscillate(t)) / DELTA
    }

    /// Computes the time it takes the spring to settle within `epsilon` of `to`.
    pub fn duration(&self) -> Duration {
        const DELTA: f64 = 0.001;

        let beta = self.params.damping / (2. * self.params.mass);

        if beta.abs() <= f64::EPSILON || beta < 0. {
            return Duration::MAX;
        }

        if (self.to - self.from).abs() <= f64::EPSILON && self.initial_velocity == 0. {
            return Duration::ZERO;
        }

        let omega0 = (self.params.stiffness / self.params.mass).sqrt();

        // The envelope bounds the oscillation, so the time it takes to decay below epsilon is a
        // good estimate for the underdamped and critically damped cases, and a starting point
        // for the overdamped one.
        let mut x0 = -self.params.epsilon.ln() / beta;

        if !x0.is_finite() {
            return Duration::MAX;
        }

        if (beta - omega0).abs() <= f64::EPSILON || beta < omega0 {
            return Duration::try_from_secs_f64(x0).unwrap_or(Duration::MAX);
        }

        // Overdamped: find when the curve reaches the target using Newton's method.
        let mut y0 = self.oscillate(x0);
        let m = (self.oscillate(x0 + DELTA) - y0) / DELTA;

        let mut x1 = (self.to - y0 + m * x0) / m;
        let mut y1 = self.oscillate(x1);

        let mut i = 0;
        while (self.to - y1).abs() > self.params.epsilon {
            if i > 1000 {
                return Duration::ZERO;
            }

            x0 = x1;
            y0 = y1;

            let m = (self.oscillate(x0 + DELTA) - y0) / DELTA;

            x1 = (self.to - y0 + m * x0) / m;
            y1 = self.oscillate(x1);
            i += 1;
        }

        if !x1.is_finite() || x1 < 0. {
            return Duration::ZERO;
        }

        Duration::try_from_secs_f64(x1).unwrap_or(Duration::MAX)
    }

    fn oscillate(&self, t: f64) -> f64 {
        let b = self.params.damping;
        let m = self.params.mass;
        let k = self.params.stiffness;
        let v0 = self.initial_velocity;

        let beta = b / (2. * m);
        let omega0 = (k / m).sqrt();

        // Displacement from the rest position, which is `to`.
        let x0 = self.from - self.to;

        let envelope = (-beta * t).exp();

        if (beta - omega0).abs() <= f64::EPSILON {
            // Critically damped.
            self.to + envelope * (x0 + (beta * x0 + v0) * t)
        } else if beta < omega0 {
            // Underdamped.
            let omega1 = ((omega0 * omega0) - (beta * beta)).sqrt();

            self.to
                + envelope
                    * (x0 * (omega1 * t).cos() + ((beta * x0 + v0) / omega1) * (omega1 * t).sin())
        } else {
            // Overdamped.
            let omega2 = ((beta * beta) - (omega0 * omega0)).sqrt();

            self.to
                + envelope
                    * (x0 * (omega2 * t).cosh() + ((beta * x0 + v0) / omega2) * (omega2 * t).sinh())
        }
    }
}
