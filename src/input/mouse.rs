//! Mouse event translation and cursor state.
//!
//! Every button, motion, and wheel event becomes one queued record, so a
//! caller draining the queue sees each movement rather than only the latest
//! position. Positions are stored in backend coordinates (top-left origin)
//! and flipped to the legacy bottom-left origin when read, using whatever the
//! display height is at that moment.

use crate::backend::{CursorHandle, CursorMode, KeyAction};
use crate::input::ring_queue::RingEventQueue;

/// Button ids tracked for direct state queries.
pub const BUTTON_COUNT: usize = 8;

/// Wheel units per scroll notch.
pub const WHEEL_DELTA: f64 = 120.0;

/// Fields per queued record: button, action, x, y, wheel.
const RECORD_LEN: usize = 5;

/// Records the queue holds before its first growth.
const INITIAL_RECORDS: usize = 32;

/// Button and action value of records that are not button events.
const NOT_A_BUTTON: i32 = -1;

/// Buffered mouse with a peek/advance event cursor.
#[derive(Debug)]
pub struct Mouse {
    queue: RingEventQueue,
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
    dwheel: i32,
    buttons: [bool; BUTTON_COUNT],

    event_button: i32,
    event_action: i32,
    event_x: i32,
    event_y: i32,
    event_dwheel: i32,

    grabbed: bool,
    captured_by_display: bool,
    aiming: bool,
    native_cursor: Option<CursorHandle>,
    applied_cursor_mode: Option<CursorMode>,
}

impl Default for Mouse {
    fn default() -> Self {
        Self::new()
    }
}

impl Mouse {
    pub fn new() -> Self {
        Self {
            queue: RingEventQueue::new(INITIAL_RECORDS * RECORD_LEN),
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            dwheel: 0,
            buttons: [false; BUTTON_COUNT],
            event_button: NOT_A_BUTTON,
            event_action: NOT_A_BUTTON,
            event_x: 0,
            event_y: 0,
            event_dwheel: 0,
            grabbed: false,
            captured_by_display: false,
            aiming: false,
            native_cursor: None,
            applied_cursor_mode: None,
        }
    }

    // BACKEND EVENTS

    pub fn register_button_event(&mut self, button: i32, action: KeyAction) {
        if let Some(slot) = usize::try_from(button)
            .ok()
            .and_then(|index| self.buttons.get_mut(index))
        {
            *slot = action != KeyAction::Release;
        }
        self.enqueue(button, action.to_int(), 0);
    }

    /// Record an absolute cursor position, top-left origin.
    pub fn register_cursor_position_event(&mut self, x: f64, y: f64) {
        self.dx += x - self.x;
        // Legacy y grows upward.
        self.dy -= y - self.y;
        self.x = x;
        self.y = y;
        self.enqueue(NOT_A_BUTTON, NOT_A_BUTTON, 0);
    }

    /// Record a vertical scroll of `dy` notches.
    pub fn register_scroll_event(&mut self, dy: f64) {
        let wheel = (dy * WHEEL_DELTA) as i32;
        self.dwheel += wheel;
        self.enqueue(NOT_A_BUTTON, NOT_A_BUTTON, wheel);
    }

    // EVENT CURSOR

    /// Advance to the next queued event. Returns `false` if there is none.
    pub fn next(&mut self) -> bool {
        let mut record = [0; RECORD_LEN];
        if !self.queue.pop_record(&mut record) {
            return false;
        }
        let [button, action, x, y, wheel] = record;
        self.event_button = button;
        self.event_action = action;
        self.event_x = x;
        self.event_y = y;
        self.event_dwheel = wheel;
        true
    }

    /// Events are collected by the session's message pump.
    pub fn poll(&mut self) {}

    /// Button of the current event, or -1 for motion and wheel events.
    #[must_use]
    pub fn event_button(&self) -> i32 {
        self.event_button
    }

    /// Whether the current event's button went down.
    #[must_use]
    pub fn event_button_state(&self) -> bool {
        self.event_action == KeyAction::Press.to_int()
    }

    #[must_use]
    pub fn event_x(&self) -> i32 {
        self.event_x
    }

    /// Vertical position of the current event, bottom-left origin.
    #[must_use]
    pub fn event_y(&self, display_height: i32) -> i32 {
        display_height - self.event_y
    }

    #[must_use]
    pub fn event_dwheel(&self) -> i32 {
        self.event_dwheel
    }

    // DIRECT STATE

    #[must_use]
    pub fn is_button_down(&self, button: i32) -> bool {
        usize::try_from(button)
            .ok()
            .and_then(|index| self.buttons.get(index))
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn button_count(&self) -> usize {
        BUTTON_COUNT
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x as i32
    }

    /// Last known vertical position, bottom-left origin.
    #[must_use]
    pub fn y(&self, display_height: i32) -> i32 {
        display_height - self.y as i32
    }

    /// Horizontal movement since the last call.
    pub fn dx(&mut self) -> i32 {
        let dx = self.dx as i32;
        self.dx = 0.0;
        dx
    }

    /// Vertical movement since the last call, upward positive.
    pub fn dy(&mut self) -> i32 {
        let dy = self.dy as i32;
        self.dy = 0.0;
        dy
    }

    /// Wheel movement since the last call.
    pub fn dwheel(&mut self) -> i32 {
        std::mem::take(&mut self.dwheel)
    }

    // CURSOR STATE

    #[must_use]
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    pub fn set_grabbed(&mut self, grabbed: bool) {
        self.grabbed = grabbed;
    }

    /// Keep the cursor inside the window while the display is exclusive.
    pub fn set_captured_by_display(&mut self, captured: bool) {
        self.captured_by_display = captured;
    }

    /// Record the native cursor now shown. A custom cursor is only set while
    /// the user aims with the mouse, so it also confines the pointer.
    pub fn set_native_cursor(&mut self, cursor: Option<CursorHandle>) {
        self.aiming = cursor.is_some();
        self.native_cursor = cursor;
    }

    #[must_use]
    pub fn native_cursor(&self) -> Option<CursorHandle> {
        self.native_cursor
    }

    /// Cursor mode the current flags call for.
    #[must_use]
    pub fn cursor_mode(&self) -> CursorMode {
        if self.grabbed {
            CursorMode::Disabled
        } else if self.captured_by_display || self.aiming {
            CursorMode::Captured
        } else {
            CursorMode::Normal
        }
    }

    /// The cursor mode to hand to the backend, if it differs from the last
    /// one handed over. Marks it as applied.
    pub fn take_cursor_mode_change(&mut self) -> Option<CursorMode> {
        let mode = self.cursor_mode();
        if self.applied_cursor_mode == Some(mode) {
            return None;
        }
        self.applied_cursor_mode = Some(mode);
        Some(mode)
    }

    /// Forget what the backend was told, e.g. after its window went away.
    pub fn forget_cursor_mode(&mut self) {
        self.applied_cursor_mode = None;
    }

    fn enqueue(&mut self, button: i32, action: i32, wheel: i32) {
        self.queue
            .push_record(&[button, action, self.x as i32, self.y as i32, wheel]);
    }
}
