use crate::FloatOrInt;

/// Cascade placement of windows opened without a position.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    #[knuffel(child, unwrap(argument), default = FloatOrInt(30.))]
    pub cascade_step: FloatOrInt<0, 65535>,
    /// Number of cascade steps before the offset wraps around.
    #[knuffel(child, unwrap(argument), default = 5)]
    pub cascade_limit: u32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            cascade_step: FloatOrInt(30.),
            cascade_limit: 5,
        }
    }
}
