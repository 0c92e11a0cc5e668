//! Z-order and focus.
//!
//! Every focus-affecting operation gives the window a fresh z-index, one above the highest
//! z-index in the registry, so z-indices stay unique without ever being compacted. Focus
//! timestamps are only used to order windows by recency.

use std::cmp::Reverse;

use tracing::{debug, trace};

use super::repository::WindowRepository;
use super::window::{Window, WindowId};
use super::WindowManager;

impl<R: WindowRepository> WindowManager<R> {
    /// Raises a visible window to the top and focuses it.
    ///
    /// Minimized windows can't be focused, so this does nothing for them; restore them instead.
    pub fn bring_to_front(&mut self, id: &WindowId) -> bool {
        match self.windows.get(id) {
            None => {
                trace!("bring_to_front: unknown window {id}");
                false
            }
            Some(win) if win.is_minimized => {
                trace!("bring_to_front: {id} is minimized");
                false
            }
            Some(_) => self.activate(id),
        }
    }

    pub fn focused_id(&self) -> Option<&WindowId> {
        self.focused.as_ref()
    }

    pub fn focused_window(&self) -> Option<&Window<R::Payload>> {
        let id = self.focused.as_ref()?;
        self.windows.get(id)
    }

    pub fn is_focused(&self, id: &WindowId) -> bool {
        self.focused.as_ref() == Some(id)
    }

    /// Highest z-index in the registry, or 0 when it's empty.
    pub fn top_z_index(&self) -> u64 {
        self.windows.iter().map(|win| win.z_index).max().unwrap_or(0)
    }

    /// Windows in paint order, back to front.
    pub fn windows_by_z(&self) -> Vec<&Window<R::Payload>> {
        let mut windows: Vec<_> = self.windows.iter().collect();
        windows.sort_by_key(|win| win.z_index);
        windows
    }

    /// Windows from most to least recently focused.
    ///
    /// Windows focused at the same instant are ordered by z-index, topmost first.
    pub fn windows_by_recency(&self) -> Vec<&Window<R::Payload>> {
        let mut windows: Vec<_> = self.windows.iter().collect();
        windows.sort_by_key(|win| Reverse((win.last_focused_at, win.z_index)));
        windows
    }

    /// Gives a window a fresh top z-index and focus timestamp, without touching focus.
    pub(crate) fn raise(&mut self, id: &WindowId) -> bool {
        let z_index = self.top_z_index() + 1;
        let now = self.clock.now();

        let Some(win) = self.windows.get_mut(id) else {
            return false;
        };
        win.z_index = z_index;
        win.last_focused_at = now;
        true
    }

    /// Raises and focuses a window.
    pub(crate) fn activate(&mut self, id: &WindowId) -> bool {
        if !self.raise(id) {
            return false;
        }

        if self.focused.as_ref() != Some(id) {
            debug!("focusing {id}");
        }
        self.focused = Some(id.clone());
        true
    }

    /// Clears focus if it's on the given window.
    pub(crate) fn unfocus(&mut self, id: &WindowId) {
        if self.focused.as_ref() == Some(id) {
            debug!("{id} lost focus");
            self.focused = None;
        }
    }
}
