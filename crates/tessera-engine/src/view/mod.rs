//! Per-viewport pan/zoom state and the controller that drives it from input.

mod controller;
mod state;

pub use controller::{ViewConfig, ViewUpdate, ViewportController};
pub use state::{ViewState, ZoomLimits};
