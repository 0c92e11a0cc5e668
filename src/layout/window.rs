//! Window records and the descriptors used to create and update them.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::snap::SnapGuide;
use crate::utils::geometry::{Point, Rectangle, Size};

/// Unique id of a window.
///
/// Opening a window with an id that's already registered restores the existing window instead
/// of creating a second one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state, derived from the open/minimized/maximized flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Not in the registry.
    Closed,
    #[default]
    Normal,
    Minimized,
    Maximized,
}

impl LifecycleState {
    pub fn from_flags(is_open: bool, is_minimized: bool, is_maximized: bool) -> Self {
        match (is_open, is_minimized, is_maximized) {
            (false, _, _) => LifecycleState::Closed,
            (true, true, _) => LifecycleState::Minimized,
            (true, false, true) => LifecycleState::Maximized,
            (true, false, false) => LifecycleState::Normal,
        }
    }
}

/// Everything needed to open a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescriptor<P> {
    pub id: WindowId,
    pub kind: String,
    pub title: String,
    /// Top-left position. Cascaded automatically when `None`.
    pub position: Option<Point>,
    pub size: Size,
    /// State of a newly created window. `Closed` is treated as `Normal`.
    pub initial_state: LifecycleState,
    pub payload: P,
}

impl<P> WindowDescriptor<P> {
    pub fn new(id: impl Into<WindowId>, size: Size, payload: P) -> Self {
        Self {
            id: id.into(),
            kind: String::new(),
            title: String::new(),
            position: None,
            size,
            initial_state: LifecycleState::Normal,
            payload,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_initial_state(mut self, state: LifecycleState) -> Self {
        self.initial_state = state;
        self
    }
}

/// Partial update of a window's descriptive fields.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowUpdate<P> {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub payload: Option<P>,
}

impl<P> Default for WindowUpdate<P> {
    fn default() -> Self {
        Self {
            title: None,
            kind: None,
            position: None,
            size: None,
            payload: None,
        }
    }
}

/// A floating window tracked by the engine.
///
/// Fields are only mutated through the [`WindowManager`](super::WindowManager), so that the
/// focus, z-order and drag invariants hold across all windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<P> {
    pub(crate) id: WindowId,
    pub(crate) kind: String,
    pub(crate) title: String,

    pub(crate) is_open: bool,
    pub(crate) is_minimized: bool,
    pub(crate) is_maximized: bool,

    /// Top-left position. While maximized, this is where the window goes on restore.
    pub(crate) position: Point,
    pub(crate) size: Size,

    pub(crate) z_index: u64,
    pub(crate) last_focused_at: Duration,

    /// Momentum being integrated after a drag release.
    ///
    /// Never set while `is_dragging`.
    pub(crate) velocity: Option<Point>,
    pub(crate) is_dragging: bool,
    /// Latest velocity sample of the ongoing drag, turned into momentum on release.
    pub(crate) release_velocity: Option<Point>,

    pub(crate) snap_guides: Vec<SnapGuide>,

    pub(crate) payload: P,
}

impl<P> Window<P> {
    pub(crate) fn new(descriptor: WindowDescriptor<P>, position: Point) -> Self {
        let (is_minimized, is_maximized) = match descriptor.initial_state {
            LifecycleState::Minimized => (true, false),
            LifecycleState::Maximized => (false, true),
            LifecycleState::Normal | LifecycleState::Closed => (false, false),
        };

        Self {
            id: descriptor.id,
            kind: descriptor.kind,
            title: descriptor.title,
            is_open: true,
            is_minimized,
            is_maximized,
            position,
            size: descriptor.size,
            z_index: 0,
            last_focused_at: Duration::ZERO,
            velocity: None,
            is_dragging: false,
            release_velocity: None,
            snap_guides: Vec::new(),
            payload: descriptor.payload,
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_minimized(&self) -> bool {
        self.is_minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_flags(self.is_open, self.is_minimized, self.is_maximized)
    }

    /// Whether the window takes part in focus, bounds and snapping.
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.is_minimized
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::new(self.position, self.size)
    }

    /// Rectangle the window occupies on screen inside `container`.
    ///
    /// Maximized windows cover the whole container; minimized windows occupy nothing.
    pub fn visual_rect(&self, container: Size) -> Option<Rectangle> {
        if !self.is_visible() {
            None
        } else if self.is_maximized {
            Some(Rectangle::from_size(container))
        } else {
            Some(self.rect())
        }
    }

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    pub fn last_focused_at(&self) -> Duration {
        self.last_focused_at
    }

    pub fn velocity(&self) -> Option<Point> {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn snap_guides(&self) -> &[SnapGuide] {
        &self.snap_guides
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Drops the drag session and any momentum.
    pub(crate) fn cancel_interaction(&mut self) {
        self.is_dragging = false;
        self.release_velocity = None;
        self.velocity = None;
        self.snap_guides.clear();
    }
}
