//! Snap guides.
//!
//! When a window settles somewhere outside of an active drag, nearby alignment lines capture
//! it. Guides come from three sources, checked in a fixed order: the snap grid, the container
//! edges, then the edges of other visible windows. On each axis, the first guide within the
//! threshold wins.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::bounds::constrain_to_container;
use super::repository::WindowRepository;
use super::window::WindowId;
use super::{Options, WindowManager};
use crate::utils::geometry::{Point, Rectangle, Size};

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// A vertical line at some x, aligning the window's left edge.
    Vertical,
    /// A horizontal line at some y, aligning the window's top edge.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuideSource {
    Grid,
    Edge,
    /// Next to another window, keeping the window spacing between the two.
    Window(WindowId),
}

/// Candidate position for a window's top-left corner on one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub axis: Axis,
    pub value: f64,
    pub source: GuideSource,
}

impl SnapGuide {
    fn distance(&self, pos: Point) -> f64 {
        let current = match self.axis {
            Axis::Vertical => pos.x,
            Axis::Horizontal => pos.y,
        };
        (current - self.value).abs()
    }
}

fn nearest_multiple(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Computes the guides within the snap threshold of a window at `pos`.
///
/// `neighbors` are the rectangles of the other windows to align with. Guides are returned in
/// priority order: grid, container edges, neighbors.
pub fn compute_guides<'a>(
    pos: Point,
    size: Size,
    container: Size,
    neighbors: impl IntoIterator<Item = (&'a WindowId, Rectangle)>,
    options: &Options,
) -> Vec<SnapGuide> {
    let spacing = options.window_spacing;
    let mut guides = Vec::new();

    let mut push = |axis, value, source| {
        let guide = SnapGuide {
            axis,
            value,
            source,
        };
        if guide.distance(pos) < options.snap_threshold {
            guides.push(guide);
        }
    };

    let grid = options.grid_size;
    push(Axis::Vertical, nearest_multiple(pos.x, grid), GuideSource::Grid);
    push(Axis::Horizontal, nearest_multiple(pos.y, grid), GuideSource::Grid);

    push(Axis::Vertical, spacing, GuideSource::Edge);
    push(Axis::Vertical, container.w - size.w - spacing, GuideSource::Edge);
    push(Axis::Horizontal, spacing, GuideSource::Edge);
    push(Axis::Horizontal, container.h - size.h - spacing, GuideSource::Edge);

    for (id, rect) in neighbors {
        // To the left, to the right, above and below the neighbor.
        let source = || GuideSource::Window(id.clone());
        push(Axis::Vertical, rect.loc.x - size.w - spacing, source());
        push(Axis::Vertical, rect.right() + spacing, source());
        push(Axis::Horizontal, rect.loc.y - size.h - spacing, source());
        push(Axis::Horizontal, rect.bottom() + spacing, source());
    }

    guides
}

/// Moves `pos` onto the first guide within `threshold` on each axis.
pub fn apply_guides(pos: Point, guides: &[SnapGuide], threshold: f64) -> Point {
    let snap = |axis: Axis, current: f64| {
        guides
            .iter()
            .filter(|guide| guide.axis == axis)
            .find(|guide| (current - guide.value).abs() < threshold)
            .map_or(current, |guide| guide.value)
    };

    Point::new(
        snap(Axis::Vertical, pos.x),
        snap(Axis::Horizontal, pos.y),
    )
}

impl<R: WindowRepository> WindowManager<R> {
    /// Computes the guides near a window's current position without moving it.
    ///
    /// Returns nothing for unknown, minimized or maximized windows.
    pub fn snap_guides_for(&self, id: &WindowId, container: Size) -> Vec<SnapGuide> {
        let Some(win) = self.windows.get(id) else {
            return Vec::new();
        };
        if !win.is_visible() || win.is_maximized {
            return Vec::new();
        }

        let neighbors = self
            .visible_windows()
            .filter(|other| other.id != *id && !other.is_maximized)
            .map(|other| (&other.id, other.rect()));
        compute_guides(win.position, win.size, container, neighbors, &self.options)
    }

    /// Settles a window at rest: constrains it and, if enabled, snaps it to nearby guides.
    ///
    /// The snapped position is constrained again, since neighbor guides can lie outside the
    /// container.
    pub(crate) fn settle(&mut self, id: &WindowId, container: Size) {
        if !self.constrain_to_bounds(id, container) {
            return;
        }

        let guides = if self.options.snapping {
            self.snap_guides_for(id, container)
        } else {
            Vec::new()
        };
        let threshold = self.options.snap_threshold;

        let Some(win) = self.windows.get_mut(id) else {
            return;
        };
        if !guides.is_empty() {
            let snapped = apply_guides(win.position, &guides, threshold);
            trace!("snapping {id} from {:?} to {snapped:?}", win.position);
            win.position = constrain_to_container(snapped, win.size, container);
        }
        win.snap_guides = guides;
    }
}
