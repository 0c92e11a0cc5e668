//! Drag sessions.
//!
//! A drag starts with [`WindowManager::start_drag`], feeds pointer positions through
//! [`WindowManager::update_position`] and ends with [`WindowManager::stop_drag`]. During the
//! drag the window follows the pointer, clamped into the container, and snapping stays off. On
//! release the last velocity sample turns into momentum, or the window settles in place.
//!
//! Several windows may be dragged at once; the engine doesn't enforce a single drag.

use tracing::{debug, trace};

use super::bounds::clamp_to_container;
use super::repository::WindowRepository;
use super::window::WindowId;
use super::WindowManager;
use crate::utils::geometry::{Point, Size};

/// Whether a velocity is fast enough to be worth integrating.
pub(crate) fn is_moving(velocity: Point, rest_velocity: f64) -> bool {
    velocity.x.abs() >= rest_velocity || velocity.y.abs() >= rest_velocity
}

impl<R: WindowRepository> WindowManager<R> {
    /// Starts dragging a window, stopping any momentum and bringing it to the front.
    ///
    /// Minimized and maximized windows can't be dragged.
    pub fn start_drag(&mut self, id: &WindowId) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("start_drag: unknown window {id}");
            return false;
        };
        if win.is_minimized || win.is_maximized {
            trace!("start_drag: {id} is {:?}", win.state());
            return false;
        }

        debug!("starting drag of {id}");
        win.is_dragging = true;
        win.release_velocity = None;
        win.velocity = None;
        win.snap_guides.clear();
        self.activate(id)
    }

    /// Moves a window.
    ///
    /// During a drag, the position is clamped into the container and `velocity`, when given and
    /// finite, replaces the sample used on release. Otherwise the window is placed at rest:
    /// momentum is dropped, the position is constrained and snapped.
    ///
    /// Minimized windows don't move.
    pub fn update_position(
        &mut self,
        id: &WindowId,
        position: Point,
        velocity: Option<Point>,
        container: Size,
    ) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("update_position: unknown window {id}");
            return false;
        };
        if win.is_minimized {
            trace!("update_position: {id} is minimized");
            return false;
        }

        if win.is_dragging {
            win.position = clamp_to_container(position, win.size, container);
            match velocity {
                Some(velocity) if velocity.is_finite() => win.release_velocity = Some(velocity),
                Some(velocity) => {
                    trace!("update_position: ignoring velocity {velocity:?} of {id}");
                }
                None => (),
            }
            return true;
        }

        win.position = position;
        win.velocity = None;
        self.settle(id, container);
        true
    }

    /// Ends a drag.
    ///
    /// With momentum enabled, a release velocity above the rest threshold keeps the window
    /// moving; [`apply_physics_tick`](Self::apply_physics_tick) then carries it. Otherwise the
    /// window settles where it was dropped.
    pub fn stop_drag(&mut self, id: &WindowId, container: Size) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("stop_drag: unknown window {id}");
            return false;
        };
        if !win.is_dragging {
            trace!("stop_drag: {id} is not being dragged");
            return false;
        }

        win.is_dragging = false;
        let release_velocity = win
            .release_velocity
            .take()
            .filter(|_| self.options.momentum)
            .filter(|v| is_moving(*v, self.options.rest_velocity));

        match release_velocity {
            Some(velocity) => {
                debug!("released {id} with velocity {velocity:?}");
                win.velocity = Some(velocity);
            }
            None => {
                debug!("dropped {id} at {:?}", win.position);
                self.settle(id, container);
            }
        }
        true
    }

    /// Whether any window is being dragged.
    pub fn is_dragging_any(&self) -> bool {
        self.windows.iter().any(|win| win.is_dragging)
    }
}
