//! Pointer input helpers.

pub mod drag_tracker;
