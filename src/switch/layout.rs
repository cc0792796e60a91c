use serde::Serialize;

use super::SwitchState;

/// An axis-aligned rectangle in the control's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x <= x && x <= self.x + self.w && self.y <= y && y <= self.y + self.h
    }
}

/// Geometry of the switch.
///
/// The origin is the top-left corner of the control. The handle is as wide as the control and
/// rests either just above or just below the vertical centre, so the distance between the two
/// resting positions equals the handle height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwitchLayout {
    pub width: f64,
    pub height: f64,
    pub handle_height: f64,
}

impl SwitchLayout {
    pub fn new(width: f64, height: f64, handle_height: f64) -> Self {
        Self {
            width,
            height,
            handle_height,
        }
    }

    pub fn from_config(config: &vswitch_config::Layout) -> Self {
        Self::new(config.width.0, config.height.0, config.handle_height.0)
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.
    }

    /// Returns `true` if the height cannot be used to normalize drags.
    pub fn is_degenerate(&self) -> bool {
        !(self.height.is_finite() && self.height > 0.)
    }

    /// Vertical offset of the handle centre when resting in `state`.
    pub fn resting_offset(&self, state: SwitchState) -> f64 {
        match state {
            SwitchState::Top => self.center_y() - self.handle_height / 2.,
            SwitchState::Bottom => self.center_y() + self.handle_height / 2.,
        }
    }

    /// Resting state selected by a tap at `y`.
    pub fn tap_destination(&self, y: f64) -> SwitchState {
        if y <= self.center_y() {
            SwitchState::Top
        } else {
            SwitchState::Bottom
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.background().contains(x, y)
    }

    /// The full bounds, which also act as the tap target.
    pub fn background(&self) -> Rect {
        Rect {
            x: 0.,
            y: 0.,
            w: self.width,
            h: self.height,
        }
    }

    /// The handle with its centre at `offset`.
    pub fn handle(&self, offset: f64) -> Rect {
        Rect {
            x: 0.,
            y: offset - self.handle_height / 2.,
            w: self.width,
            h: self.handle_height,
        }
    }

    /// The label area for `state`, which is the half of the control the handle rests over.
    pub fn label(&self, state: SwitchState) -> Rect {
        let y = match state {
            SwitchState::Top => 0.,
            SwitchState::Bottom => self.center_y(),
        };
        Rect {
            x: 0.,
            y,
            w: self.width,
            h: self.center_y(),
        }
    }
}

impl Default for SwitchLayout {
    fn default() -> Self {
        Self::from_config(&vswitch_config::Layout::default())
    }
}
