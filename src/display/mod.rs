//!
//! Legacy display layer.
//!
//! This module maps a single-window, three-mode display API onto a backend
//! that only knows "windowed" and "occupying a monitor".
//!
//! # Architecture
//!
//! - `mode`: display modes and the derived window mode
//! - `planner`: pure window-mode decision and window placement
//! - `gamma`: gamma snapshot, restore, and legacy gamma ramps
//! - `controller`: the window state machine tying the above together
//!

pub mod controller;
pub mod gamma;
pub mod mode;
pub mod planner;

pub use controller::DisplayController;
pub use gamma::{GammaRamp, GammaState};
pub use mode::{DisplayMode, WindowMode};
pub use planner::{WindowGeometryPlan, WindowGeometryPlanner};
