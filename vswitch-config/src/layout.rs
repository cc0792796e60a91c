use crate::utils::FloatOrInt;

/// Geometry of the control, in the host's logical units.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    #[knuffel(child, unwrap(argument), default = FloatOrInt(60.))]
    pub width: FloatOrInt<0, 65535>,
    #[knuffel(child, unwrap(argument), default = FloatOrInt(300.))]
    pub height: FloatOrInt<0, 65535>,
    /// Height of the draggable handle; also the distance between the resting positions.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(150.))]
    pub handle_height: FloatOrInt<0, 65535>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: FloatOrInt(60.),
            height: FloatOrInt(300.),
            handle_height: FloatOrInt(150.),
        }
    }
}
