//! Keyboard event translation.
//!
//! Backends report key transitions and text input as separate events. Legacy
//! callers expect one queued event per key transition carrying the character
//! it typed, if any. A press (or an enabled repeat) therefore stays *pending*
//! until the next key event or the next read, so that the first character
//! reported after it can be attached. Releases never carry a character.

use crate::backend::KeyAction;
use crate::input::keycodes::{self, KEYBOARD_SIZE};
use crate::input::ring_queue::RingEventQueue;

/// Character reported for events that typed nothing.
pub const CHAR_NONE: char = '\0';

/// Fields per queued record: key, action, character.
const RECORD_LEN: usize = 3;

/// Records the queue holds before its first growth.
const INITIAL_RECORDS: usize = 32;

#[derive(Debug, Clone, Copy)]
struct PendingKey {
    key: i32,
    action: KeyAction,
    character: Option<u32>,
}

/// Buffered keyboard with a peek/advance event cursor.
#[derive(Debug)]
pub struct Keyboard {
    queue: RingEventQueue,
    pending: Option<PendingKey>,
    key_down: [bool; KEYBOARD_SIZE],
    repeat_enabled: bool,

    event_key: i32,
    event_action: KeyAction,
    event_character: char,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            queue: RingEventQueue::new(INITIAL_RECORDS * RECORD_LEN),
            pending: None,
            key_down: [false; KEYBOARD_SIZE],
            repeat_enabled: false,
            event_key: keycodes::KEY_NONE,
            event_action: KeyAction::Release,
            event_character: CHAR_NONE,
        }
    }

    /// Feed a key transition; `usage` is the backend's HID usage id.
    pub fn register_key_event(&mut self, usage: u32, action: KeyAction) {
        self.flush_pending();

        let key = keycodes::from_hid_usage(usage);
        match action {
            KeyAction::Release => {
                self.set_key_down(key, false);
                self.enqueue(key, action, None);
            }
            KeyAction::Press => {
                self.set_key_down(key, true);
                self.open_pending(key, action);
            }
            KeyAction::Repeat => {
                if self.repeat_enabled {
                    self.open_pending(key, action);
                }
            }
        }
    }

    /// Feed a typed character. It attaches to the pending key event if that
    /// has none yet; otherwise it is dropped.
    pub fn register_char_event(&mut self, codepoint: u32) {
        match &mut self.pending {
            Some(pending) if pending.character.is_none() => pending.character = Some(codepoint),
            _ => log::trace!("Dropping character U+{:04X} with no key event", codepoint),
        }
    }

    /// Advance to the next queued event. Returns `false` if there is none.
    pub fn next(&mut self) -> bool {
        self.flush_pending();
        let mut record = [0; RECORD_LEN];
        if !self.queue.pop_record(&mut record) {
            return false;
        }
        self.event_key = record[0];
        self.event_action = KeyAction::from_int(record[1]);
        self.event_character = u32::try_from(record[2])
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(CHAR_NONE);
        true
    }

    /// Events still queued, including one pending key event.
    #[must_use]
    pub fn number_of_key_events(&self) -> usize {
        self.queue.len() / RECORD_LEN + usize::from(self.pending.is_some())
    }

    /// Events are collected by the session's message pump.
    pub fn poll(&mut self) {}

    #[must_use]
    pub fn event_key(&self) -> i32 {
        self.event_key
    }

    #[must_use]
    pub fn event_character(&self) -> char {
        self.event_character
    }

    /// `true` for presses and repeats.
    #[must_use]
    pub fn event_key_state(&self) -> bool {
        self.event_action != KeyAction::Release
    }

    #[must_use]
    pub fn is_repeat_event(&self) -> bool {
        self.event_action == KeyAction::Repeat
    }

    #[must_use]
    pub fn is_key_down(&self, key: i32) -> bool {
        usize::try_from(key)
            .ok()
            .and_then(|index| self.key_down.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn enable_repeat_events(&mut self, enabled: bool) {
        self.repeat_enabled = enabled;
    }

    #[must_use]
    pub fn are_repeat_events_enabled(&self) -> bool {
        self.repeat_enabled
    }

    /// Drop queued events and key state.
    pub fn reset(&mut self) {
        *self = Self {
            repeat_enabled: self.repeat_enabled,
            ..Self::new()
        };
    }

    fn open_pending(&mut self, key: i32, action: KeyAction) {
        self.pending = Some(PendingKey {
            key,
            action,
            character: None,
        });
    }

    fn flush_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.enqueue(pending.key, pending.action, pending.character);
        }
    }

    fn enqueue(&mut self, key: i32, action: KeyAction, character: Option<u32>) {
        let character = character.map_or(0, |c| c as i32);
        self.queue.push_record(&[key, action.to_int(), character]);
    }

    fn set_key_down(&mut self, key: i32, down: bool) {
        if let Some(slot) = usize::try_from(key)
            .ok()
            .and_then(|index| self.key_down.get_mut(index))
        {
            *slot = down;
        }
    }
}
