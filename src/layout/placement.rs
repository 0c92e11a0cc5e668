//! Cascade placement of windows opened without a position.

use super::repository::WindowRepository;
use super::{Options, WindowManager};
use crate::utils::geometry::{Point, Size};

/// Position of a new window given how many windows are already visible.
///
/// Each visible window shifts the new one diagonally by one cascade step, wrapping around
/// after `cascade_limit` steps. The result is clamped to the window's own size so that the very
/// first window stays reachable on tiny containers. This is not a bounds constraint.
pub fn cascade_position(visible_count: usize, size: Size, options: &Options) -> Point {
    let limit = options.cascade_limit.max(1) as usize;
    let offset = options.cascade_step * (visible_count % limit) as f64;
    let candidate = offset + options.window_spacing;

    Point::new(f64::min(candidate, size.w), f64::min(candidate, size.h))
}

impl<R: WindowRepository> WindowManager<R> {
    /// Position a window of `size` would be cascaded to if opened right now.
    pub fn next_cascade_position(&self, size: Size) -> Point {
        cascade_position(self.visible_windows().count(), size, &self.options)
    }
}
