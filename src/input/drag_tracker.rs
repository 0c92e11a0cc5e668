use std::collections::VecDeque;
use std::time::Duration;

use tracing::trace;

use crate::utils::geometry::Point;

/// Pointer samples older than this, relative to the latest one, don't count towards velocity.
const HISTORY_LIMIT: Duration = Duration::from_millis(150);

/// Duration of one momentum tick, assuming the host ticks at 60 Hz.
pub const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);

/// Tracks pointer positions during a drag to estimate the release velocity.
#[derive(Debug, Default)]
pub struct DragTracker {
    history: VecDeque<Event>,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    position: Point,
    timestamp: Duration,
}

impl DragTracker {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
        }
    }

    /// Pushes a new pointer position into the tracker.
    pub fn push(&mut self, position: Point, timestamp: Duration) {
        // Timestamps of pointer motion should always increase monotonically.
        if let Some(last) = self.history.back() {
            if timestamp < last.timestamp {
                trace!(
                    "ignoring event with timestamp {timestamp:?} earlier than last {:?}",
                    last.timestamp
                );
                return;
            }
        }

        self.history.push_back(Event {
            position,
            timestamp,
        });
        self.trim_history();
    }

    /// Latest pointer position.
    pub fn position(&self) -> Option<Point> {
        self.history.back().map(|event| event.position)
    }

    /// Current velocity, in pixels per momentum tick.
    pub fn velocity(&self) -> Point {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return Point::default();
        };

        let total_time = (last.timestamp - first.timestamp).as_secs_f64();
        if total_time == 0. {
            return Point::default();
        }

        let displacement = last.position - first.position;
        displacement.upscale(FRAME_DURATION.as_secs_f64() / total_time)
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    fn trim_history(&mut self) {
        let _span = tracy_client::span!("DragTracker::trim_history");

        let Some(&last) = self.history.back() else {
            return;
        };

        while let Some(first) = self.history.front() {
            if last.timestamp <= first.timestamp + HISTORY_LIMIT {
                break;
            }

            let _ = self.history.pop_front();
        }
    }
}
