//! Analog controllers (joysticks and gamepads).
//!
//! Each controller keeps direct state for its buttons, axes, and
//! point-of-view hats. Axis values pass through two dead zones (a per-axis
//! one the caller can tune, and the one the device reports) and are then
//! scaled by the largest magnitude seen so far on that axis, so a stick that
//! never quite reaches its end still reads 1.0 once it has been pushed all
//! the way. Every change is also queued as an event.

use crate::backend::{BackendEvent, ControllerInfo, PovPosition};
use crate::input::ring_queue::RingEventQueue;

/// Dead zone applied to every axis until changed.
pub const DEFAULT_DEAD_ZONE: f32 = 0.05;

/// Fields per queued record: controller index, control kind, control index.
const RECORD_LEN: usize = 3;

/// Records the queue holds before its first growth.
const INITIAL_RECORDS: usize = 32;

/// What kind of control produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Button,
    Axis,
    Pov,
}

impl ControlKind {
    const fn to_int(self) -> i32 {
        match self {
            Self::Button => 0,
            Self::Axis => 1,
            Self::Pov => 2,
        }
    }

    const fn from_int(value: i32) -> Self {
        match value {
            0 => Self::Button,
            1 => Self::Axis,
            _ => Self::Pov,
        }
    }
}

/// One connected controller.
#[derive(Debug, Clone)]
pub struct Controller {
    id: u32,
    index: usize,
    name: String,
    axis_names: Vec<String>,
    axis_values: Vec<f32>,
    axis_max: Vec<f32>,
    dead_zones: Vec<f32>,
    device_dead_zone: f32,
    buttons: Vec<bool>,
    povs: Vec<PovPosition>,
    x_axis: Option<usize>,
    y_axis: Option<usize>,
}

impl Controller {
    fn new(index: usize, info: &ControllerInfo, dead_zone: f32) -> Self {
        let axis_count = info.axis_names.len();
        let find_axis = |wanted: &str| {
            info.axis_names
                .iter()
                .position(|name| name.eq_ignore_ascii_case(wanted))
        };
        Self {
            id: info.id,
            index,
            name: info.name.clone(),
            axis_names: info.axis_names.clone(),
            axis_values: vec![0.0; axis_count],
            axis_max: vec![1.0; axis_count],
            dead_zones: vec![dead_zone; axis_count],
            device_dead_zone: info.device_dead_zone,
            buttons: vec![false; info.button_count],
            povs: vec![PovPosition::Centered; info.pov_count],
            x_axis: find_axis("X"),
            y_axis: find_axis("Y"),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position among the enumerated controllers.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: usize) -> bool {
        self.buttons.get(button).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axis_names.len()
    }

    #[must_use]
    pub fn axis_name(&self, axis: usize) -> Option<&str> {
        self.axis_names.get(axis).map(String::as_str)
    }

    /// Calibrated value of `axis` in -1.0..=1.0 (0.0 for unknown axes).
    #[must_use]
    pub fn axis_value(&self, axis: usize) -> f32 {
        self.axis_values.get(axis).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn dead_zone(&self, axis: usize) -> f32 {
        self.dead_zones.get(axis).copied().unwrap_or(0.0)
    }

    pub fn set_dead_zone(&mut self, axis: usize, zone: f32) {
        if let Some(slot) = self.dead_zones.get_mut(axis) {
            *slot = zone;
        }
    }

    #[must_use]
    pub fn x_axis_value(&self) -> f32 {
        self.x_axis.map_or(0.0, |axis| self.axis_value(axis))
    }

    #[must_use]
    pub fn y_axis_value(&self) -> f32 {
        self.y_axis.map_or(0.0, |axis| self.axis_value(axis))
    }

    /// Horizontal direction of the first hat: -1 left, 1 right, 0 otherwise.
    #[must_use]
    pub fn pov_x(&self) -> f32 {
        match self.povs.first() {
            Some(PovPosition::Left | PovPosition::UpLeft | PovPosition::DownLeft) => -1.0,
            Some(PovPosition::Right | PovPosition::UpRight | PovPosition::DownRight) => 1.0,
            _ => 0.0,
        }
    }

    /// Vertical direction of the first hat: -1 up, 1 down, 0 otherwise.
    #[must_use]
    pub fn pov_y(&self) -> f32 {
        match self.povs.first() {
            Some(PovPosition::Up | PovPosition::UpLeft | PovPosition::UpRight) => -1.0,
            Some(PovPosition::Down | PovPosition::DownLeft | PovPosition::DownRight) => 1.0,
            _ => 0.0,
        }
    }

    fn update_axis(&mut self, axis: usize, raw: f32) -> bool {
        if axis >= self.axis_values.len() {
            return false;
        }
        let mut value = raw;
        if value.abs() < self.dead_zones[axis] {
            value = 0.0;
        }
        if value.abs() < self.device_dead_zone {
            value = 0.0;
        }
        if value.abs() > self.axis_max[axis] {
            self.axis_max[axis] = value.abs();
        }
        self.axis_values[axis] = value / self.axis_max[axis];
        true
    }

    fn update_button(&mut self, button: usize, pressed: bool) -> bool {
        match self.buttons.get_mut(button) {
            Some(slot) => {
                *slot = pressed;
                true
            }
            None => false,
        }
    }

    fn update_pov(&mut self, pov: PovPosition) -> bool {
        match self.povs.first_mut() {
            Some(slot) => {
                *slot = pov;
                true
            }
            None => false,
        }
    }
}

/// Every enumerated controller plus a shared event queue.
#[derive(Debug)]
pub struct Controllers {
    controllers: Vec<Controller>,
    queue: RingEventQueue,
    created: bool,

    event_controller: Option<usize>,
    event_kind: ControlKind,
    event_index: usize,
}

impl Default for Controllers {
    fn default() -> Self {
        Self::new()
    }
}

impl Controllers {
    pub fn new() -> Self {
        Self {
            controllers: Vec::new(),
            queue: RingEventQueue::new(INITIAL_RECORDS * RECORD_LEN),
            created: false,
            event_controller: None,
            event_kind: ControlKind::Button,
            event_index: 0,
        }
    }

    /// Adopt the enumerated controllers, replacing any previous set.
    pub fn create(&mut self, infos: &[ControllerInfo], dead_zone: f32) {
        self.controllers = infos
            .iter()
            .enumerate()
            .map(|(index, info)| Controller::new(index, info, dead_zone))
            .collect();
        for controller in &self.controllers {
            log::info!(
                "Controller {}: {} ({} axes, {} buttons, {} hats)",
                controller.index,
                controller.name,
                controller.axis_count(),
                controller.button_count(),
                controller.povs.len()
            );
        }
        self.created = true;
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Forget all controllers and queued events.
    pub fn destroy(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn controller(&self, index: usize) -> Option<&Controller> {
        self.controllers.get(index)
    }

    pub fn controller_mut(&mut self, index: usize) -> Option<&mut Controller> {
        self.controllers.get_mut(index)
    }

    /// Apply a controller event from the backend. Other events are ignored.
    pub fn handle_event(&mut self, event: &BackendEvent) {
        let (id, kind, control) = match *event {
            BackendEvent::ControllerAxis { controller, axis, .. } => {
                (controller, ControlKind::Axis, axis as usize)
            }
            BackendEvent::ControllerButton { controller, button, .. } => {
                (controller, ControlKind::Button, button as usize)
            }
            BackendEvent::ControllerPov { controller, .. } => (controller, ControlKind::Pov, 0),
            _ => return,
        };
        let Some(index) = self.controllers.iter().position(|c| c.id == id) else {
            log::debug!("Event for unknown controller {}", id);
            return;
        };

        let target = &mut self.controllers[index];
        let updated = match *event {
            BackendEvent::ControllerAxis { value, .. } => target.update_axis(control, value),
            BackendEvent::ControllerButton { pressed, .. } => {
                target.update_button(control, pressed)
            }
            BackendEvent::ControllerPov { pov, .. } => target.update_pov(pov),
            _ => false,
        };
        if updated {
            self.queue
                .push_record(&[index as i32, kind.to_int(), control as i32]);
        }
    }

    /// Advance to the next queued event. Returns `false` if there is none.
    pub fn next(&mut self) -> bool {
        let mut record = [0; RECORD_LEN];
        if !self.queue.pop_record(&mut record) {
            return false;
        }
        self.event_controller = usize::try_from(record[0]).ok();
        self.event_kind = ControlKind::from_int(record[1]);
        self.event_index = usize::try_from(record[2]).unwrap_or(0);
        true
    }

    /// Events are collected by the session's message pump.
    pub fn poll(&mut self) {}

    /// Controller that produced the current event.
    #[must_use]
    pub fn event_source(&self) -> Option<&Controller> {
        self.event_controller
            .and_then(|index| self.controllers.get(index))
    }

    #[must_use]
    pub fn event_control_index(&self) -> usize {
        self.event_index
    }

    #[must_use]
    pub fn is_event_button(&self) -> bool {
        self.event_kind == ControlKind::Button
    }

    #[must_use]
    pub fn is_event_axis(&self) -> bool {
        self.event_kind == ControlKind::Axis
    }

    #[must_use]
    pub fn is_event_pov(&self) -> bool {
        self.event_kind == ControlKind::Pov
    }
}
