//! Sessions surviving a reload.
//!
//! A [`Session`] keeps the descriptive state of every window in registry order. Interaction
//! state (drags, momentum, snap guides, focus, stacking) is never persisted: a hydrated session
//! starts at rest with nothing focused, stacked in registry order.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::repository::WindowRepository;
use super::window::{Window, WindowId};
use super::WindowManager;
use crate::utils::geometry::{Point, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedWindow<P> {
    pub id: WindowId,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    pub position: Point,
    pub size: Size,
    #[serde(default = "default_true")]
    pub is_open: bool,
    #[serde(default)]
    pub is_minimized: bool,
    #[serde(default)]
    pub is_maximized: bool,
    pub payload: P,
}

fn default_true() -> bool {
    true
}

/// Saved windows, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session<P> {
    pub windows: Vec<PersistedWindow<P>>,
}

impl<P> Default for Session<P> {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
        }
    }
}

impl<P: Clone> PersistedWindow<P> {
    fn from_window(win: &Window<P>) -> Self {
        Self {
            id: win.id.clone(),
            kind: win.kind.clone(),
            title: win.title.clone(),
            position: win.position,
            size: win.size,
            is_open: win.is_open,
            is_minimized: win.is_minimized,
            is_maximized: win.is_maximized,
            payload: win.payload.clone(),
        }
    }
}

impl<P> PersistedWindow<P> {
    fn into_window(self, z_index: u64) -> Window<P> {
        Window {
            id: self.id,
            kind: self.kind,
            title: self.title,
            is_open: true,
            is_minimized: self.is_minimized,
            // Minimized wins over maximized.
            is_maximized: self.is_maximized && !self.is_minimized,
            position: self.position,
            size: self.size,
            z_index,
            last_focused_at: Duration::ZERO,
            velocity: None,
            is_dragging: false,
            release_velocity: None,
            snap_guides: Vec::new(),
            payload: self.payload,
        }
    }
}

impl<R> WindowManager<R>
where
    R: WindowRepository,
    R::Payload: Clone,
{
    /// Captures the windows in registry order.
    pub fn persist(&self) -> Session<R::Payload> {
        let windows = self.windows().map(PersistedWindow::from_window).collect();
        Session { windows }
    }
}

impl<R: WindowRepository> WindowManager<R> {
    /// Replaces every window with the ones from a session.
    ///
    /// Z-indices are re-derived from the session order. Closed entries are dropped, and only
    /// the first entry of a repeated id is kept. Nothing is focused afterwards.
    pub fn hydrate(&mut self, session: Session<R::Payload>) {
        let _span = tracy_client::span!("WindowManager::hydrate");

        self.windows.clear();
        self.focused = None;

        let mut seen = HashSet::new();
        let mut z_index = 0;
        for persisted in session.windows {
            if !persisted.is_open {
                continue;
            }
            if !seen.insert(persisted.id.clone()) {
                warn!("skipping repeated window {} in session", persisted.id);
                continue;
            }

            z_index += 1;
            self.windows.insert(persisted.into_window(z_index));
        }

        debug!("hydrated {} windows", self.windows.len());
    }
}
