//! Types for driving the casement window engine from a host.
//!
//! A host sends one [`Request`] per line, JSON-encoded, and receives one [`Reply`] per request,
//! also JSON-encoded on a single line.
//!
//! Geometry travels as `(f64, f64)` tuples: `(x, y)` for positions and velocities,
//! `(width, height)` for sizes. All values are logical pixels in container space.
//!
//! ```
//! use casement_ipc::Request;
//!
//! let request: Request = serde_json::from_str(r#"{"Close":{"id":"chat"}}"#).unwrap();
//! assert_eq!(request, Request::Close { id: String::from("chat") });
//! ```
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply from the host to a request.
///
/// Requests that fail to decode produce an `Err` with the decode error message.
pub type Reply = Result<Response, String>;

/// Request to the window engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Request {
    /// Open a window, or restore and focus it if the id is already open.
    Open(OpenWindow),
    /// Close a window and drop its record.
    Close {
        /// Id of the window.
        id: String,
    },
    /// Minimize a window.
    Minimize {
        /// Id of the window.
        id: String,
    },
    /// Maximize a window.
    Maximize {
        /// Id of the window.
        id: String,
    },
    /// Return a minimized or maximized window to its normal state.
    Restore {
        /// Id of the window.
        id: String,
    },
    /// Raise and focus a window.
    BringToFront {
        /// Id of the window.
        id: String,
    },
    /// Change some descriptive fields of a window.
    UpdateWindow {
        /// Id of the window.
        id: String,
        /// New title.
        #[serde(default)]
        title: Option<String>,
        /// New content kind.
        #[serde(default)]
        kind: Option<String>,
        /// New position. The host constrains it to the container afterwards.
        #[serde(default)]
        position: Option<(f64, f64)>,
        /// New size.
        #[serde(default)]
        size: Option<(f64, f64)>,
        /// New payload.
        #[serde(default)]
        payload: Option<Value>,
    },
    /// Begin dragging a window.
    StartDrag {
        /// Id of the window.
        id: String,
    },
    /// Move a window, with an optional explicit velocity sample.
    UpdatePosition {
        /// Id of the window.
        id: String,
        /// New top-left position.
        position: (f64, f64),
        /// Velocity in logical pixels per tick.
        #[serde(default)]
        velocity: Option<(f64, f64)>,
    },
    /// Move a dragged window from a raw pointer sample.
    ///
    /// The host derives the velocity sample from the recent pointer history.
    PointerMotion {
        /// Id of the window.
        id: String,
        /// New top-left position.
        position: (f64, f64),
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// End dragging a window.
    StopDrag {
        /// Id of the window.
        id: String,
    },
    /// Run one momentum step for a single window.
    ApplyPhysicsTick {
        /// Id of the window.
        id: String,
    },
    /// Clamp a window into the current container.
    ConstrainToBounds {
        /// Id of the window.
        id: String,
    },
    /// Change the container size.
    ///
    /// Every window is constrained to the new size.
    SetContainer {
        /// Container width.
        width: f64,
        /// Container height.
        height: f64,
    },
    /// Advance the frame clock, running one momentum pass per frame.
    Tick {
        /// Number of frames to run.
        frames: u32,
    },
    /// Request the windows in stacking order, back to front.
    Windows,
    /// Request the windows in most-recently-focused order.
    RecentWindows,
    /// Request the focused window.
    FocusedWindow,
    /// Request a persistable session of the current windows.
    Persist,
    /// Replace all windows with a previously persisted session.
    Hydrate(Value),
}

/// Window to open.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OpenWindow {
    /// Unique id, also used to recognize re-opens.
    pub id: String,
    /// Content kind, opaque to the engine.
    #[serde(default)]
    pub kind: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Top-left position; cascaded automatically when missing.
    #[serde(default)]
    pub position: Option<(f64, f64)>,
    /// Size.
    pub size: (f64, f64),
    /// Initial state for a new window.
    #[serde(default)]
    pub state: WindowState,
    /// Consumer data attached to the window.
    #[serde(default)]
    pub payload: Value,
}

/// Successful response to a request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Response {
    /// The request referred to a known window and was applied.
    Handled,
    /// The request referred to an unknown window and did nothing.
    Ignored,
    /// Result of a [`Request::Tick`].
    Ticked {
        /// Whether any window still has momentum.
        moving: bool,
    },
    /// Windows, in the order the request asked for.
    Windows(Vec<Window>),
    /// The focused window, if any.
    FocusedWindow(Option<Window>),
    /// A persisted session, suitable for [`Request::Hydrate`].
    Session(Value),
}

/// Lifecycle state of an open window.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Regular floating window.
    #[default]
    Normal,
    /// Hidden, kept in the taskbar.
    Minimized,
    /// Covering the whole container.
    Maximized,
}

/// Snapshot of a window as seen by the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Window {
    /// Unique id.
    pub id: String,
    /// Content kind.
    pub kind: String,
    /// Title.
    pub title: String,
    /// Lifecycle state.
    pub state: WindowState,
    /// Top-left position. For maximized windows, the position to restore to.
    pub position: (f64, f64),
    /// Size.
    pub size: (f64, f64),
    /// Rectangle to render into as `(x, y, width, height)`, `None` when minimized.
    ///
    /// Maximized windows cover the whole container.
    pub rect: Option<(f64, f64, f64, f64)>,
    /// Stacking order, higher is above.
    pub z_index: u64,
    /// Whether this window is focused.
    pub is_focused: bool,
    /// Whether this window is being dragged.
    pub is_dragging: bool,
    /// Remaining momentum, in logical pixels per tick.
    pub velocity: Option<(f64, f64)>,
    /// Alignment guides computed for the last settled position.
    pub snap_guides: Vec<SnapGuide>,
    /// Consumer data.
    pub payload: Value,
}

/// Alignment line near a window.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapGuide {
    /// Orientation of the line.
    pub axis: SnapAxis,
    /// Coordinate of the line: x for vertical lines, y for horizontal ones.
    pub value: f64,
    /// Where the line comes from.
    pub source: SnapSource,
}

/// Orientation of a snap guide.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapAxis {
    /// A vertical line, aligning the x coordinate.
    Vertical,
    /// A horizontal line, aligning the y coordinate.
    Horizontal,
}

/// Origin of a snap guide.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SnapSource {
    /// The snap grid.
    Grid,
    /// A container edge.
    Edge,
    /// An edge of another window.
    Window(String),
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn open_defaults() {
        let request: Request =
            serde_json::from_str(r#"{"Open":{"id":"chat","size":[800,600]}}"#).unwrap();
        assert_eq!(
            request,
            Request::Open(OpenWindow {
                id: String::from("chat"),
                kind: String::new(),
                title: String::new(),
                position: None,
                size: (800., 600.),
                state: WindowState::Normal,
                payload: Value::Null,
            })
        );
    }

    #[test]
    fn unit_requests_are_bare_strings() {
        let request: Request = serde_json::from_str(r#""Windows""#).unwrap();
        assert_eq!(request, Request::Windows);
    }

    #[test]
    fn update_position_without_velocity() {
        let request: Request =
            serde_json::from_str(r#"{"UpdatePosition":{"id":"a","position":[10,20]}}"#).unwrap();
        assert_eq!(
            request,
            Request::UpdatePosition {
                id: String::from("a"),
                position: (10., 20.),
                velocity: None,
            }
        );
    }

    #[test]
    fn reply_encoding() {
        let reply: Reply = Ok(Response::Ticked { moving: false });
        assert_snapshot!(
            serde_json::to_string(&reply).unwrap(),
            @r#"{"Ok":{"Ticked":{"moving":false}}}"#
        );

        let reply: Reply = Err(String::from("unknown variant"));
        assert_snapshot!(serde_json::to_string(&reply).unwrap(), @r#"{"Err":"unknown variant"}"#);
    }
}
