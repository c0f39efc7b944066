//! One display plus its input devices, driven by a single message pump.

use crate::backend::{Backend, BackendEvent, DisplayResult};
use crate::config::Options;
use crate::display::{DisplayController, DisplayMode, WindowMode};
use crate::input::{Controllers, Cursor, Keyboard, Mouse};

/// The display controller and the keyboard, mouse, and controller
/// translators fed from its backend.
pub struct Session<B: Backend> {
    display: DisplayController<B>,
    keyboard: Keyboard,
    mouse: Mouse,
    controllers: Controllers,
    dead_zone: f32,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, options: &Options) -> DisplayResult<Self> {
        let display = DisplayController::init(backend, options)?;
        let mut keyboard = Keyboard::new();
        keyboard.enable_repeat_events(options.repeat_events);
        Ok(Self {
            display,
            keyboard,
            mouse: Mouse::new(),
            controllers: Controllers::new(),
            dead_zone: options.controller_dead_zone,
        })
    }

    // LIFECYCLE

    /// Create the window and enumerate controllers.
    pub fn create(&mut self) -> DisplayResult<()> {
        self.display.create()?;
        if !self.controllers.is_created() {
            let infos = self.display.backend_mut().controllers();
            self.controllers.create(&infos, self.dead_zone);
        }
        if let (Some(window), Some(cursor)) = (self.display.window(), self.mouse.native_cursor()) {
            self.display.backend_mut().set_cursor(window, Some(cursor));
        }
        self.sync_cursor_mode();
        Ok(())
    }

    /// Destroy the window. Controllers are forgotten along with it, since the
    /// backend releases them.
    pub fn destroy(&mut self) {
        self.display.destroy();
        if !self.display.window_is_created() {
            self.mouse.forget_cursor_mode();
            self.controllers.destroy();
        }
    }

    /// Legacy creation query; see [`DisplayController::is_created`].
    pub fn is_created(&mut self) -> bool {
        self.display.is_created()
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) -> DisplayResult<()> {
        self.display.set_display_mode(mode)?;
        self.sync_cursor_mode();
        Ok(())
    }

    /// Swap buffers, then pump messages.
    pub fn update(&mut self) -> DisplayResult<()> {
        self.display.swap_buffers()?;
        self.process_messages();
        Ok(())
    }

    /// Drain backend events and route each to the device it belongs to.
    pub fn process_messages(&mut self) {
        for event in self.display.process_messages() {
            match event {
                BackendEvent::Key { key, action } => self.keyboard.register_key_event(key, action),
                BackendEvent::Char(codepoint) => self.keyboard.register_char_event(codepoint),
                BackendEvent::MouseButton { button, action } => {
                    self.mouse.register_button_event(button, action)
                }
                BackendEvent::CursorPos { x, y } => self.mouse.register_cursor_position_event(x, y),
                BackendEvent::Scroll { dy } => self.mouse.register_scroll_event(dy),
                BackendEvent::ControllerAxis { .. }
                | BackendEvent::ControllerButton { .. }
                | BackendEvent::ControllerPov { .. } => self.controllers.handle_event(&event),
                BackendEvent::Focus(_)
                | BackendEvent::Iconify(_)
                | BackendEvent::CloseRequested => {
                    log::trace!("Unrouted window event {:?}", event)
                }
            }
        }
    }

    // POINTER

    /// Hide and lock the pointer for relative motion.
    pub fn set_grabbed(&mut self, grabbed: bool) {
        self.mouse.set_grabbed(grabbed);
        self.sync_cursor_mode();
    }

    /// Warp the pointer, bottom-left origin.
    pub fn set_cursor_position(&mut self, x: i32, y: i32) {
        let flipped = self.display.display_height() - y;
        self.mouse
            .register_cursor_position_event(f64::from(x), f64::from(flipped));
        if let Some(window) = self.display.window() {
            self.display
                .backend_mut()
                .set_cursor_position(window, f64::from(x), f64::from(flipped));
        }
    }

    /// Build a native cursor from RGBA frames.
    pub fn create_cursor(
        &mut self,
        width: u32,
        height: u32,
        x_hotspot: u32,
        y_hotspot: u32,
        image_count: usize,
        rgba: &[u8],
    ) -> DisplayResult<Cursor> {
        Cursor::new(
            self.display.backend_mut(),
            width,
            height,
            x_hotspot,
            y_hotspot,
            image_count,
            rgba,
        )
    }

    /// Show `cursor`, or the system cursor for `None`.
    pub fn set_native_cursor(&mut self, cursor: Option<&Cursor>) {
        let handle = cursor.map(Cursor::handle);
        self.mouse.set_native_cursor(handle);
        if let Some(window) = self.display.window() {
            self.display.backend_mut().set_cursor(window, handle);
        }
        self.sync_cursor_mode();
    }

    /// Release a cursor. If it is the one shown, the system cursor is
    /// restored first.
    pub fn destroy_cursor(&mut self, cursor: Cursor) {
        if self.mouse.native_cursor() == Some(cursor.handle()) {
            self.set_native_cursor(None);
        }
        cursor.destroy(self.display.backend_mut());
    }

    // ACCESSORS

    #[must_use]
    pub fn display(&self) -> &DisplayController<B> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayController<B> {
        &mut self.display
    }

    #[must_use]
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    #[must_use]
    pub fn mouse(&self) -> &Mouse {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut Mouse {
        &mut self.mouse
    }

    #[must_use]
    pub fn controllers(&self) -> &Controllers {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut Controllers {
        &mut self.controllers
    }

    /// Height used to flip mouse coordinates.
    #[must_use]
    pub fn display_height(&self) -> i32 {
        self.display.display_height()
    }

    fn sync_cursor_mode(&mut self) {
        let exclusive = self.display.window_mode() == Some(WindowMode::ExclusiveFullscreen);
        self.mouse.set_captured_by_display(exclusive);
        let Some(window) = self.display.window() else {
            return;
        };
        if let Some(mode) = self.mouse.take_cursor_mode_change() {
            log::debug!("Cursor mode {:?}", mode);
            self.display.backend_mut().set_cursor_mode(window, mode);
        }
    }
}
