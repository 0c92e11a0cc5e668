//! Window management engine.
//!
//! The engine owns every floating window of a desktop session: their lifecycle, geometry,
//! stacking order, drag sessions, release momentum and snap alignment. Consumers open windows by
//! id and render into the rectangles the engine hands back.
//!
//! All state lives in a single [`WindowRepository`] owned by the [`WindowManager`]. Operations
//! referring to an unknown window are no-ops that return `false`; the engine never fails at
//! runtime. The only errors are invalid configuration values, rejected when building
//! [`Options`].
//!
//! Nothing here caches the container size. Every operation that needs it (bounds, snapping,
//! momentum) takes it as an argument, so a host can resize the container at any time and follow
//! up with [`WindowManager::constrain_all`].
//!
//! ## Module Structure
//!
//! ```text
//! layout/
//! ├── mod.rs              - WindowManager, Options, queries
//! ├── window.rs           - window records, descriptors and partial updates
//! ├── repository.rs       - WindowRepository trait and the in-memory repository
//! ├── lifecycle.rs        - open/close/minimize/maximize/restore
//! ├── focus.rs            - z-order and focus
//! ├── placement.rs        - cascade placement of new windows
//! ├── bounds.rs           - keeping windows inside the container
//! ├── snap.rs             - snap guides
//! ├── interactive_move.rs - drag sessions
//! ├── momentum.rs         - release momentum
//! └── persistence.rs      - sessions surviving a reload
//! ```

use casement_config::{Config, ConfigError};
use serde_json::Value;

use crate::clock::Clock;

pub mod bounds;
pub mod focus;
pub mod interactive_move;
pub mod lifecycle;
pub mod momentum;
pub mod persistence;
pub mod placement;
pub mod repository;
pub mod snap;
pub mod window;

#[cfg(test)]
mod tests;

pub use self::lifecycle::OpenResult;
pub use self::persistence::{PersistedWindow, Session};
pub use self::repository::{InMemoryRepository, WindowRepository};
pub use self::snap::{Axis, GuideSource, SnapGuide};
pub use self::window::{LifecycleState, Window, WindowDescriptor, WindowId, WindowUpdate};

/// Tunables of the engine, built from a validated [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Gap between windows, and between windows and container edges.
    pub(crate) window_spacing: f64,
    pub(crate) snapping: bool,
    pub(crate) grid_size: f64,
    pub(crate) snap_threshold: f64,
    pub(crate) momentum: bool,
    /// Per-tick velocity multiplier, in `(0, 1)`.
    pub(crate) friction: f64,
    pub(crate) rest_velocity: f64,
    pub(crate) cascade_step: f64,
    /// Never zero.
    pub(crate) cascade_limit: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self::from_valid_config(&Config::default())
    }
}

impl Options {
    /// Builds options from a config, rejecting values that would break the engine.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &Config) -> Self {
        Self {
            window_spacing: config.window_spacing.0,
            snapping: !config.snapping.off,
            grid_size: config.snapping.grid_size.0,
            snap_threshold: config.snapping.threshold.0,
            momentum: !config.momentum.off,
            friction: config.momentum.friction.0,
            rest_velocity: config.momentum.rest_velocity.0,
            cascade_step: config.placement.cascade_step.0,
            cascade_limit: config.placement.cascade_limit,
        }
    }

    pub fn window_spacing(&self) -> f64 {
        self.window_spacing
    }

    pub fn is_snapping_enabled(&self) -> bool {
        self.snapping
    }

    pub fn is_momentum_enabled(&self) -> bool {
        self.momentum
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }
}

/// The window management engine.
#[derive(Debug)]
pub struct WindowManager<R: WindowRepository = InMemoryRepository<Value>> {
    /// All windows, open or minimized.
    pub(crate) windows: R,

    /// Id of the focused window.
    ///
    /// When set, this window is visible and has the highest z-index among visible windows.
    /// Closing or minimizing it clears focus; no other window is promoted automatically.
    pub(crate) focused: Option<WindowId>,

    /// Clock for focus timestamps.
    pub(crate) clock: Clock,

    /// Configurable properties of the engine.
    pub(crate) options: Options,
}

impl<R: WindowRepository> WindowManager<R> {
    /// Creates an empty engine on top of `windows`.
    pub fn with_repository(windows: R, clock: Clock, options: Options) -> Self {
        Self {
            windows,
            focused: None,
            clock,
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replaces the options, e.g. after a config reload.
    ///
    /// Ongoing momentum is dropped if the new options disable it.
    pub fn update_options(&mut self, options: Options) {
        if !options.momentum {
            for win in self.windows.iter_mut() {
                win.velocity = None;
            }
        }
        if !options.snapping {
            for win in self.windows.iter_mut() {
                win.snap_guides.clear();
            }
        }

        self.options = options;
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn repository(&self) -> &R {
        &self.windows
    }

    /// Windows in registry order.
    pub fn windows(&self) -> impl Iterator<Item = &Window<R::Payload>> + '_ {
        self.windows.iter()
    }

    pub fn window(&self, id: &WindowId) -> Option<&Window<R::Payload>> {
        self.windows.get(id)
    }

    pub fn has_window(&self, id: &WindowId) -> bool {
        self.windows.contains(id)
    }

    /// Lifecycle state of a window; `Closed` for unknown ids.
    pub fn state(&self, id: &WindowId) -> LifecycleState {
        self.windows
            .get(id)
            .map_or(LifecycleState::Closed, Window::state)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Windows that take part in focus, bounds and snapping.
    pub(crate) fn visible_windows(&self) -> impl Iterator<Item = &Window<R::Payload>> + '_ {
        self.windows.iter().filter(|win| win.is_visible())
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        use std::collections::HashSet;

        let opts = &self.options;
        assert!(opts.friction > 0. && opts.friction < 1.);
        assert!(opts.rest_velocity > 0.);
        assert!(opts.grid_size > 0.);
        assert!(opts.cascade_limit > 0);

        let mut ids = HashSet::new();
        let mut z_indices = HashSet::new();
        for win in self.windows.iter() {
            assert!(ids.insert(win.id.clone()), "window ids must be unique");
            assert!(win.is_open, "closed windows must be removed");
            assert!(
                z_indices.insert(win.z_index),
                "z-indices must be unique ({} is repeated)",
                win.z_index
            );
            assert!(
                !(win.is_dragging && win.velocity.is_some()),
                "a dragged window can't have momentum"
            );
            assert!(
                win.is_dragging || win.release_velocity.is_none(),
                "release velocity only exists during a drag"
            );
            if win.is_minimized {
                assert!(!win.is_dragging, "minimized windows can't be dragged");
                assert!(win.velocity.is_none(), "minimized windows can't move");
                assert!(!win.is_maximized, "minimizing clears maximized");
            }
            if win.is_maximized {
                assert!(win.velocity.is_none(), "maximized windows can't move");
            }
            if !opts.momentum {
                assert!(win.velocity.is_none());
            }
            if let Some(velocity) = win.velocity {
                assert!(
                    velocity.x.abs() >= opts.rest_velocity
                        || velocity.y.abs() >= opts.rest_velocity,
                    "windows at rest must have their velocity cleared"
                );
            }
        }

        if let Some(id) = &self.focused {
            let focused = self
                .windows
                .get(id)
                .expect("focused window must be present");
            assert!(!focused.is_minimized, "minimized windows can't be focused");
            for win in self.visible_windows() {
                if win.id != *id {
                    assert!(
                        win.z_index < focused.z_index,
                        "focused window must be above every other visible window"
                    );
                }
            }
        }
    }
}
