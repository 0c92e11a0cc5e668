//! Keeping windows inside the container.

use tracing::trace;

use super::repository::WindowRepository;
use super::window::WindowId;
use super::WindowManager;
use crate::utils::geometry::{Point, Size};
use crate::utils::{center_in_container, clamp_preferring_zero};

/// Whether a window at `pos` lies entirely outside the container on some axis.
fn is_lost(pos: Point, size: Size, container: Size) -> bool {
    pos.x < -size.w || pos.x > container.w || pos.y < -size.h || pos.y > container.h
}

/// Clamps a window into the container, axis by axis.
///
/// When the window is larger than the container, it's aligned to the top-left edge.
pub fn clamp_to_container(pos: Point, size: Size, container: Size) -> Point {
    Point::new(
        clamp_preferring_zero(pos.x, container.w - size.w),
        clamp_preferring_zero(pos.y, container.h - size.h),
    )
}

/// Brings a window back into the container.
///
/// A window that ended up completely outside, for example after the container shrunk, is
/// centered. Anything else is clamped per axis.
///
/// The centered position goes through the clamp too: for a window larger than the container it
/// would otherwise be negative, and a second pass would move it to the top-left. This way
/// applying the constraint twice gives the same result as applying it once.
pub fn constrain_to_container(pos: Point, size: Size, container: Size) -> Point {
    let pos = if is_lost(pos, size, container) {
        center_in_container(size, container)
    } else {
        pos
    };
    clamp_to_container(pos, size, container)
}

impl<R: WindowRepository> WindowManager<R> {
    /// Brings a window back into the container.
    ///
    /// Minimized windows are left alone. Maximized windows get their restore position
    /// constrained, so that they come back on-screen.
    pub fn constrain_to_bounds(&mut self, id: &WindowId, container: Size) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("constrain_to_bounds: unknown window {id}");
            return false;
        };
        if win.is_minimized {
            return false;
        }

        win.position = constrain_to_container(win.position, win.size, container);
        true
    }

    /// Brings every visible window back into the container.
    pub fn constrain_all(&mut self, container: Size) {
        let _span = tracy_client::span!("WindowManager::constrain_all");

        for win in self.windows.iter_mut().filter(|win| win.is_visible()) {
            win.position = constrain_to_container(win.position, win.size, container);
        }
    }
}
