//! Headless host driving the engine from JSON-lines requests.
//!
//! The host owns what a desktop shell would own around the engine: the container size, the
//! frame clock and the pointer history of ongoing drags. Frames only advance on
//! [`Request::Tick`], so a script replays the same way every time.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use casement_ipc::{self as ipc, Reply, Request, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::input::drag_tracker::{DragTracker, FRAME_DURATION};
use crate::layout::{
    Axis, GuideSource, InMemoryRepository, LifecycleState, Options, Session, SnapGuide, Window,
    WindowDescriptor, WindowId, WindowManager, WindowUpdate,
};
use crate::utils::geometry::{Point, Size};

/// Container size used until a host sets one.
pub const DEFAULT_CONTAINER: Size = Size::new(1280., 720.);

pub struct Host {
    wm: WindowManager,
    container: Size,
    /// Pointer history of windows being dragged through [`Request::PointerMotion`].
    trackers: HashMap<WindowId, DragTracker>,
}

impl Host {
    pub fn new(options: Options, container: Size) -> Self {
        let clock = Clock::with_time(Duration::ZERO);
        Self {
            wm: WindowManager::with_repository(InMemoryRepository::new(), clock, options),
            container,
            trackers: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &WindowManager {
        &self.wm
    }

    pub fn container(&self) -> Size {
        self.container
    }

    /// Reads requests line by line and writes one reply line per request.
    ///
    /// Blank lines and lines starting with `#` are skipped. A request that fails to decode gets
    /// an error reply and doesn't stop the run.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
        let _span = tracy_client::span!("Host::run");

        for (index, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("error reading line {}", index + 1))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let reply = self.handle_line(line);
            if let Err(err) = &reply {
                warn!("line {}: {err}", index + 1);
            }

            let mut buf = serde_json::to_string(&reply).context("error encoding reply")?;
            buf.push('\n');
            output
                .write_all(buf.as_bytes())
                .context("error writing reply")?;
        }

        output.flush().context("error flushing output")?;
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        let request: Request =
            serde_json::from_str(line).map_err(|err| format!("error parsing request: {err}"))?;
        self.handle(request)
    }

    pub fn handle(&mut self, request: Request) -> Reply {
        debug!("handling {request:?}");
        let container = self.container;

        let response = match request {
            Request::Open(open) => {
                self.wm.open(descriptor_from_ipc(open));
                Response::Handled
            }
            Request::Close { id } => {
                let id = WindowId::from(id);
                self.trackers.remove(&id);
                handled(self.wm.close(&id))
            }
            Request::Minimize { id } => {
                let id = WindowId::from(id);
                self.trackers.remove(&id);
                handled(self.wm.minimize(&id))
            }
            Request::Maximize { id } => {
                let id = WindowId::from(id);
                self.trackers.remove(&id);
                handled(self.wm.maximize(&id))
            }
            Request::Restore { id } => handled(self.wm.restore(&WindowId::from(id))),
            Request::BringToFront { id } => handled(self.wm.bring_to_front(&WindowId::from(id))),
            Request::UpdateWindow {
                id,
                title,
                kind,
                position,
                size,
                payload,
            } => {
                let id = WindowId::from(id);
                let moves = position.is_some() || size.is_some();
                let update = WindowUpdate {
                    title,
                    kind,
                    position: position.map(Point::from),
                    size: size.map(Size::from),
                    payload,
                };
                let known = self.wm.update_window(&id, update);
                if known && moves {
                    self.wm.constrain_to_bounds(&id, container);
                }
                handled(known)
            }
            Request::StartDrag { id } => {
                let id = WindowId::from(id);
                let started = self.wm.start_drag(&id);
                if started {
                    self.trackers.insert(id, DragTracker::new());
                }
                handled(started)
            }
            Request::UpdatePosition {
                id,
                position,
                velocity,
            } => {
                let id = WindowId::from(id);
                let velocity = velocity.map(Point::from);
                handled(
                    self.wm
                        .update_position(&id, position.into(), velocity, container),
                )
            }
            Request::PointerMotion {
                id,
                position,
                time_ms,
            } => {
                let id = WindowId::from(id);
                let position = Point::from(position);
                let dragging = self.wm.window(&id).is_some_and(Window::is_dragging);
                let velocity = dragging.then(|| {
                    let tracker = self.trackers.entry(id.clone()).or_default();
                    tracker.push(position, Duration::from_millis(time_ms));
                    tracker.velocity()
                });
                handled(self.wm.update_position(&id, position, velocity, container))
            }
            Request::StopDrag { id } => {
                let id = WindowId::from(id);
                self.trackers.remove(&id);
                handled(self.wm.stop_drag(&id, container))
            }
            Request::ApplyPhysicsTick { id } => {
                let id = WindowId::from(id);
                if self.wm.has_window(&id) {
                    let moving = self.wm.apply_physics_tick(&id, container);
                    Response::Ticked { moving }
                } else {
                    Response::Ignored
                }
            }
            Request::ConstrainToBounds { id } => {
                handled(self.wm.constrain_to_bounds(&WindowId::from(id), container))
            }
            Request::SetContainer { width, height } => {
                if !(width > 0. && height > 0. && width.is_finite() && height.is_finite()) {
                    return Err(format!(
                        "container size must be positive, got {width}x{height}"
                    ));
                }
                self.container = Size::new(width, height);
                self.wm.constrain_all(self.container);
                Response::Handled
            }
            Request::Tick { frames } => {
                let _span = tracy_client::span!("Host::tick");
                for frame in 0..frames {
                    self.wm.clock().advance(FRAME_DURATION);
                    if !self.wm.advance_momentum(container) {
                        // Everything is at rest, the remaining frames only move the clock.
                        let idle = frames - frame - 1;
                        self.wm.clock().advance(FRAME_DURATION * idle);
                        break;
                    }
                }
                Response::Ticked {
                    moving: self.wm.are_momentum_animations_ongoing(),
                }
            }
            Request::Windows => Response::Windows(self.windows_to_ipc(self.wm.windows_by_z())),
            Request::RecentWindows => {
                Response::Windows(self.windows_to_ipc(self.wm.windows_by_recency()))
            }
            Request::FocusedWindow => {
                let window = self
                    .wm
                    .focused_window()
                    .map(|win| window_to_ipc(win, true, self.container));
                Response::FocusedWindow(window)
            }
            Request::Persist => {
                let session = serde_json::to_value(self.wm.persist())
                    .map_err(|err| format!("error encoding session: {err}"))?;
                Response::Session(session)
            }
            Request::Hydrate(session) => {
                let session: Session<Value> = serde_json::from_value(session)
                    .map_err(|err| format!("error parsing session: {err}"))?;
                self.trackers.clear();
                self.wm.hydrate(session);
                Response::Handled
            }
        };

        Ok(response)
    }

    fn windows_to_ipc(&self, windows: Vec<&Window<Value>>) -> Vec<ipc::Window> {
        windows
            .into_iter()
            .map(|win| window_to_ipc(win, self.wm.is_focused(win.id()), self.container))
            .collect()
    }
}

fn handled(known: bool) -> Response {
    if known {
        Response::Handled
    } else {
        Response::Ignored
    }
}

fn descriptor_from_ipc(open: ipc::OpenWindow) -> WindowDescriptor<Value> {
    let ipc::OpenWindow {
        id,
        kind,
        title,
        position,
        size,
        state,
        payload,
    } = open;

    let state = match state {
        ipc::WindowState::Normal => LifecycleState::Normal,
        ipc::WindowState::Minimized => LifecycleState::Minimized,
        ipc::WindowState::Maximized => LifecycleState::Maximized,
    };

    let mut descriptor = WindowDescriptor::new(id, Size::from(size), payload)
        .with_kind(kind)
        .with_title(title)
        .with_initial_state(state);
    descriptor.position = position.map(Point::from);
    descriptor
}

fn window_to_ipc(win: &Window<Value>, is_focused: bool, container: Size) -> ipc::Window {
    let state = match win.state() {
        LifecycleState::Minimized => ipc::WindowState::Minimized,
        LifecycleState::Maximized => ipc::WindowState::Maximized,
        // Closed windows are never in the registry.
        LifecycleState::Normal | LifecycleState::Closed => ipc::WindowState::Normal,
    };

    ipc::Window {
        id: win.id().to_string(),
        kind: win.kind().to_owned(),
        title: win.title().to_owned(),
        state,
        position: win.position().into(),
        size: win.size().into(),
        rect: win
            .visual_rect(container)
            .map(|rect| (rect.loc.x, rect.loc.y, rect.size.w, rect.size.h)),
        z_index: win.z_index(),
        is_focused,
        is_dragging: win.is_dragging(),
        velocity: win.velocity().map(Into::into),
        snap_guides: win.snap_guides().iter().map(guide_to_ipc).collect(),
        payload: win.payload().clone(),
    }
}

fn guide_to_ipc(guide: &SnapGuide) -> ipc::SnapGuide {
    ipc::SnapGuide {
        axis: match guide.axis {
            Axis::Vertical => ipc::SnapAxis::Vertical,
            Axis::Horizontal => ipc::SnapAxis::Horizontal,
        },
        value: guide.value,
        source: match &guide.source {
            GuideSource::Grid => ipc::SnapSource::Grid,
            GuideSource::Edge => ipc::SnapSource::Edge,
            GuideSource::Window(id) => ipc::SnapSource::Window(id.to_string()),
        },
    }
}
