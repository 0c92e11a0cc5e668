//! Window lifecycle: open, close, minimize, maximize, restore.
//!
//! ```text
//!            open               minimize
//!   Closed ───────▶ Normal ◀────────────▶ Minimized
//!      ▲              ▲ │ maximize            │
//!      │       restore│ ▼                     │ maximize
//!      └── close ── Maximized ◀───────────────┘
//! ```
//!
//! Every state can be closed. Re-opening a known id only clears the minimized flag; a maximized
//! window stays maximized.

use tracing::{debug, trace};

use super::repository::WindowRepository;
use super::window::{LifecycleState, Window, WindowDescriptor, WindowId, WindowUpdate};
use super::WindowManager;

/// What [`WindowManager::open`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenResult {
    /// A new window was registered.
    Created,
    /// The id was already registered; the existing window was restored and focused.
    Restored,
}

impl<R: WindowRepository> WindowManager<R> {
    /// Opens a window, or restores and focuses the existing one with the same id.
    ///
    /// A new window without a position is cascaded. It starts in the state the descriptor asks
    /// for and gets focus unless it starts minimized. For a known id, the rest of the
    /// descriptor is ignored.
    pub fn open(&mut self, descriptor: WindowDescriptor<R::Payload>) -> OpenResult {
        let id = descriptor.id.clone();

        if let Some(win) = self.windows.get_mut(&id) {
            debug!("re-opening {id}");
            win.is_minimized = false;
            self.activate(&id);
            return OpenResult::Restored;
        }

        let position = descriptor
            .position
            .unwrap_or_else(|| self.next_cascade_position(descriptor.size));
        let win = Window::new(descriptor, position);
        let is_minimized = win.is_minimized;
        debug!(
            "opening {id} ({}) as {:?} at {position:?}",
            win.kind,
            win.state()
        );
        self.windows.insert(win);

        if is_minimized {
            self.raise(&id);
        } else {
            self.activate(&id);
        }
        OpenResult::Created
    }

    /// Closes a window, dropping its record.
    ///
    /// If it was focused, nothing is focused afterwards.
    pub fn close(&mut self, id: &WindowId) -> bool {
        if self.windows.remove(id).is_none() {
            trace!("close: unknown window {id}");
            return false;
        }

        debug!("closed {id}");
        self.unfocus(id);
        true
    }

    /// Minimizes a window, ending any drag or momentum.
    ///
    /// A maximized window loses its maximized state. If it was focused, nothing is focused
    /// afterwards.
    pub fn minimize(&mut self, id: &WindowId) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("minimize: unknown window {id}");
            return false;
        };

        debug!("minimizing {id}");
        win.is_minimized = true;
        win.is_maximized = false;
        win.cancel_interaction();
        self.unfocus(id);
        true
    }

    /// Maximizes a window and focuses it, ending any drag or momentum.
    ///
    /// The window keeps its position for when it's restored.
    pub fn maximize(&mut self, id: &WindowId) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("maximize: unknown window {id}");
            return false;
        };

        debug!("maximizing {id}");
        win.is_minimized = false;
        win.is_maximized = true;
        win.cancel_interaction();
        self.activate(id)
    }

    /// Returns a minimized or maximized window to its normal state and focuses it.
    pub fn restore(&mut self, id: &WindowId) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("restore: unknown window {id}");
            return false;
        };

        if win.state() != LifecycleState::Normal {
            debug!("restoring {id} from {:?}", win.state());
        }
        win.is_minimized = false;
        win.is_maximized = false;
        self.activate(id)
    }

    /// Changes some descriptive fields of a window.
    ///
    /// Position and size changes are applied as is; follow up with
    /// [`constrain_to_bounds`](Self::constrain_to_bounds) to keep the window inside the
    /// container.
    pub fn update_window(&mut self, id: &WindowId, update: WindowUpdate<R::Payload>) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("update_window: unknown window {id}");
            return false;
        };

        let WindowUpdate {
            title,
            kind,
            position,
            size,
            payload,
        } = update;

        if let Some(title) = title {
            win.title = title;
        }
        if let Some(kind) = kind {
            win.kind = kind;
        }
        if let Some(position) = position {
            win.position = position;
            // An explicit move stops the window where it was put.
            win.velocity = None;
            win.snap_guides.clear();
        }
        if let Some(size) = size {
            win.size = size;
        }
        if let Some(payload) = payload {
            win.payload = payload;
        }
        true
    }
}
