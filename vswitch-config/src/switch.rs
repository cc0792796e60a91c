use crate::utils::FloatOrInt;

/// Resting position the switch starts in.
#[derive(knuffel::DecodeScalar, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InitialState {
    #[default]
    Top,
    Bottom,
}

/// Interaction and spring tuning for the switch.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Switch {
    #[knuffel(child, unwrap(argument), default)]
    pub initial_state: InitialState,
    /// Spring damping ratio. Lower values bounce more, 1 is critically damped.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(0.4))]
    pub damping_ratio: FloatOrInt<0, 100>,
    #[knuffel(child, unwrap(argument), default = FloatOrInt(100.))]
    pub stiffness: FloatOrInt<1, 100000>,
    #[knuffel(child, unwrap(argument), default = FloatOrInt(0.001))]
    pub epsilon: FloatOrInt<0, 1>,
    /// Time scale applied to spring runs; 0.5 plays them twice as fast.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(0.5))]
    pub duration_factor: FloatOrInt<0, 100>,
    /// Fraction of the control height a drag must cover to commit.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(1. / 3.))]
    pub commit_distance_fraction: FloatOrInt<0, 1>,
    /// Release velocity (units per second) that commits regardless of distance.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(100.))]
    pub commit_velocity: FloatOrInt<0, 100000>,
    /// Drag progress past which the drag ends on its own.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(0.7))]
    pub early_commit_progress: FloatOrInt<0, 1>,
    #[knuffel(child)]
    pub disable_early_commit: bool,
    /// Initial velocity for taps and programmatic moves, in progress per second.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(10.))]
    pub tap_velocity: FloatOrInt<0, 10000>,
    /// Pointer travel below which a press-release counts as a tap.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(10.))]
    pub tap_slop: FloatOrInt<0, 1000>,
}

impl Default for Switch {
    fn default() -> Self {
        Self {
            initial_state: InitialState::Top,
            damping_ratio: FloatOrInt(0.4),
            stiffness: FloatOrInt(100.),
            epsilon: FloatOrInt(0.001),
            duration_factor: FloatOrInt(0.5),
            commit_distance_fraction: FloatOrInt(1. / 3.),
            commit_velocity: FloatOrInt(100.),
            early_commit_progress: FloatOrInt(0.7),
            disable_early_commit: false,
            tap_velocity: FloatOrInt(10.),
            tap_slop: FloatOrInt(10.),
        }
    }
}

impl Switch {
    /// Returns the early-commit threshold, or `None` if early commit is disabled.
    pub fn early_commit(&self) -> Option<f64> {
        (!self.disable_early_commit).then_some(self.early_commit_progress.0)
    }
}
