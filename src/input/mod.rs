//! Input event translation.
//!
//! This module turns backend input events into the buffered, peek/advance
//! event streams legacy callers poll.
//!
//! # Architecture
//!
//! - `ring_queue`: growable ring buffer of record-framed integers
//! - `keycodes`: legacy key codes and backend key translation
//! - `keyboard`: key events with their typed characters
//! - `mouse`: button, motion, and wheel events plus cursor state
//! - `cursor`: native cursor images
//! - `controllers`: analog controllers with dead zones and calibration

pub mod controllers;
pub mod cursor;
pub mod keyboard;
pub mod keycodes;
pub mod mouse;
pub mod ring_queue;

pub use controllers::{ControlKind, Controller, Controllers, DEFAULT_DEAD_ZONE};
pub use cursor::Cursor;
pub use keyboard::{Keyboard, CHAR_NONE};
pub use mouse::Mouse;
pub use ring_queue::RingEventQueue;
