use vswitch_config::Config;

use super::SwitchState;
use crate::animation::SpringParams;

/// Runtime tuning of the switch, resolved from the config.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub initial_state: SwitchState,
    pub damping_ratio: f64,
    pub stiffness: f64,
    pub epsilon: f64,
    pub duration_factor: f64,
    /// Fraction of the control height a drag must cover to commit.
    pub commit_distance_fraction: f64,
    /// Release velocity that commits regardless of distance.
    pub commit_velocity: f64,
    /// Drag progress past which the drag ends on its own; `None` disables early commit.
    pub early_commit: Option<f64>,
    /// Initial velocity of taps and programmatic moves, in progress per second.
    pub tap_velocity: f64,
    pub tap_slop: f64,
}

impl Options {
    pub fn from_config(config: &Config) -> Self {
        let switch = &config.switch;
        Self {
            initial_state: switch.initial_state.into(),
            damping_ratio: switch.damping_ratio.0,
            stiffness: switch.stiffness.0,
            epsilon: switch.epsilon.0,
            duration_factor: switch.duration_factor.0,
            commit_distance_fraction: switch.commit_distance_fraction.0,
            commit_velocity: switch.commit_velocity.0,
            early_commit: switch.early_commit(),
            tap_velocity: switch.tap_velocity.0,
            tap_slop: switch.tap_slop.0,
        }
    }

    pub fn spring_params(&self) -> SpringParams {
        SpringParams::new(self.damping_ratio, self.stiffness, self.epsilon)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
