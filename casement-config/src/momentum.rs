use crate::FloatOrInt;

/// Release momentum of dragged windows.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    #[knuffel(child)]
    pub off: bool,
    /// Per-tick velocity multiplier, strictly between 0 and 1.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(0.95))]
    pub friction: FloatOrInt<0, 1>,
    /// Velocity (logical pixels per tick) under which a window comes to rest.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(0.1))]
    pub rest_velocity: FloatOrInt<0, 65535>,
}

impl Default for Momentum {
    fn default() -> Self {
        Self {
            off: false,
            friction: FloatOrInt(0.95),
            rest_velocity: FloatOrInt(0.1),
        }
    }
}
