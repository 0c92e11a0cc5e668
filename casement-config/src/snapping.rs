use crate::FloatOrInt;

/// Snap-to-guide behavior applied when a window settles.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Snapping {
    #[knuffel(child)]
    pub off: bool,
    /// Spacing of the snap grid in logical pixels.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(20.))]
    pub grid_size: FloatOrInt<0, 65535>,
    /// Maximum distance at which a guide captures the window.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(10.))]
    pub threshold: FloatOrInt<0, 65535>,
}

impl Default for Snapping {
    fn default() -> Self {
        Self {
            off: false,
            grid_size: FloatOrInt(20.),
            threshold: FloatOrInt(10.),
        }
    }
}
