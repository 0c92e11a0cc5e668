//! Release momentum.
//!
//! After a drag is released with some velocity, the window keeps gliding. Every tick the
//! velocity is multiplied by the friction, and the window moves by the decayed velocity. Once
//! both components drop below the rest velocity the window stops and settles.
//!
//! The decay is per tick rather than per unit of time, so the host decides the cadence by how
//! often it ticks. The distance travelled only depends on the release velocity and the friction.

use tracing::{debug, trace};

use super::bounds::constrain_to_container;
use super::interactive_move::is_moving;
use super::repository::WindowRepository;
use super::window::WindowId;
use super::{Options, WindowManager};
use crate::utils::geometry::{Point, Size};

/// Decays a velocity by one tick of friction.
///
/// Returns `None` once the window should come to rest.
pub fn decay(velocity: Point, options: &Options) -> Option<Point> {
    let velocity = velocity.upscale(options.friction);
    is_moving(velocity, options.rest_velocity).then_some(velocity)
}

impl<R: WindowRepository> WindowManager<R> {
    /// Advances the momentum of one window by a tick.
    ///
    /// Returns whether the window is still moving afterwards. Windows without momentum are left
    /// alone.
    pub fn apply_physics_tick(&mut self, id: &WindowId, container: Size) -> bool {
        let Some(win) = self.windows.get_mut(id) else {
            trace!("apply_physics_tick: unknown window {id}");
            return false;
        };
        if win.is_dragging {
            return false;
        }
        let Some(velocity) = win.velocity else {
            return false;
        };

        match decay(velocity, &self.options) {
            Some(velocity) => {
                let pos = win.position + velocity;
                win.position = constrain_to_container(pos, win.size, container);
                win.velocity = Some(velocity);
                trace!("{id} moved to {:?}, velocity {velocity:?}", win.position);
                true
            }
            None => {
                debug!("{id} came to rest at {:?}", win.position);
                win.velocity = None;
                self.settle(id, container);
                false
            }
        }
    }

    /// Advances the momentum of every moving window by a tick.
    ///
    /// Returns whether any window is still moving.
    pub fn advance_momentum(&mut self, container: Size) -> bool {
        let _span = tracy_client::span!("WindowManager::advance_momentum");

        let moving: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|win| win.velocity.is_some())
            .map(|win| win.id.clone())
            .collect();

        let mut ongoing = false;
        for id in &moving {
            ongoing |= self.apply_physics_tick(id, container);
        }
        ongoing
    }

    pub fn are_momentum_animations_ongoing(&self) -> bool {
        self.windows.iter().any(|win| win.velocity.is_some())
    }
}
