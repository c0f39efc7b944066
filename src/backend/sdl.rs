//!
//! SDL2/OpenGL windowing backend.
//!
//! **Supported:**
//! - One OpenGL window, reconfigured in place between windowed, borderless
//!   desktop-sized, and exclusive fullscreen layouts
//! - Gamma ramps on the primary display
//! - Keyboard (scancodes, which are HID usages), text input, mouse, and wheel
//! - Joysticks with axes, buttons, and hats
//! - Color cursors and cursor confinement
//!
//! **NOT Supported:**
//! - Monitors other than the primary one
//! - More than one window icon (the largest is used)
//!
//! SDL must be driven from the thread that created the backend.
//!

use std::collections::HashMap;

use sdl2::{
    event::{Event, WindowEvent},
    joystick::{HatState, Joystick},
    mouse::{MouseButton, MouseWheelDirection, SystemCursor},
    pixels::PixelFormatEnum,
    surface::Surface,
    video::{FullscreenType, GLContext, SwapInterval, Window, WindowPos},
    EventPump, JoystickSubsystem, Sdl, VideoSubsystem,
};

use crate::backend::common::{
    Backend, BackendEvent, ControllerInfo, CursorHandle, CursorImage, CursorMode, DisplayError,
    DisplayResult, Icon, KeyAction, MonitorHandle, PovPosition, WindowHandle,
};
use crate::display::gamma::GammaRamp;
use crate::display::mode::DisplayMode;
use crate::display::planner::WindowGeometryPlan;

/// Byte order of RGBA8 pixel data as an SDL packed format.
#[cfg(target_endian = "big")]
const RGBA_FORMAT: PixelFormatEnum = PixelFormatEnum::RGBA8888;

#[cfg(target_endian = "little")]
const RGBA_FORMAT: PixelFormatEnum = PixelFormatEnum::ABGR8888;

/// SDL only reports the primary display as index 0.
const PRIMARY_DISPLAY: i32 = 0;

/// Entries per gamma channel SDL accepts.
const GAMMA_RAMP_SIZE: usize = 256;

const MINIMIZE_ON_FOCUS_LOSS_HINT: &str = "SDL_VIDEO_MINIMIZE_ON_FOCUS_LOSS";

/// Conventional names for joystick axes, in SDL order.
const AXIS_NAMES: [&str; 6] = ["X", "Y", "Z", "RX", "RY", "RZ"];

/// SDL2 backend with an OpenGL context.
pub struct SdlBackend {
    sdl_context: Sdl,
    video_subsystem: VideoSubsystem,
    joystick_subsystem: Option<JoystickSubsystem>,
    event_pump: EventPump,
    /// Dropped before `window`.
    gl_context: Option<GLContext>,
    window: Option<Window>,
    joysticks: Vec<Joystick>,
    cursors: HashMap<CursorHandle, sdl2::mouse::Cursor>,
    default_cursor: Option<sdl2::mouse::Cursor>,
    next_cursor: u32,
    /// Virtual pointer position while relative mouse mode is on.
    pointer: (f64, f64),
    relative_mouse: bool,
    /// Target of the last warp; its motion echo is dropped.
    pending_warp: Option<(i32, i32)>,
}

impl SdlBackend {
    /// Initialize SDL video and, if available, joystick support.
    pub fn new() -> DisplayResult<Self> {
        log::info!("Initializing SDL2");

        let sdl_context =
            sdl2::init().map_err(|e| DisplayError::BackendInit(format!("SDL2 init: {}", e)))?;
        let video_subsystem = sdl_context
            .video()
            .map_err(|e| DisplayError::BackendInit(format!("video subsystem: {}", e)))?;
        log::info!(
            "SDL2 video driver: {}",
            video_subsystem.current_video_driver()
        );

        let joystick_subsystem = match sdl_context.joystick() {
            Ok(subsystem) => Some(subsystem),
            Err(e) => {
                log::warn!("Joystick support unavailable: {}", e);
                None
            }
        };

        let event_pump = sdl_context
            .event_pump()
            .map_err(|e| DisplayError::BackendInit(format!("event pump: {}", e)))?;

        Ok(Self {
            sdl_context,
            video_subsystem,
            joystick_subsystem,
            event_pump,
            gl_context: None,
            window: None,
            joysticks: Vec::new(),
            cursors: HashMap::new(),
            default_cursor: None,
            next_cursor: 1,
            pointer: (0.0, 0.0),
            relative_mouse: false,
            pending_warp: None,
        })
    }

    fn window_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        match self.window.as_mut() {
            Some(window) if window.id() == handle.0 => Some(window),
            _ => {
                log::warn!("No live window with id {}", handle.0);
                None
            }
        }
    }

    /// Move, resize, and switch fullscreen state of `window` per `plan`.
    fn apply_plan(
        video: &VideoSubsystem,
        window: &mut Window,
        plan: &WindowGeometryPlan,
    ) -> Result<(), String> {
        sdl2::hint::set(
            MINIMIZE_ON_FOCUS_LOSS_HINT,
            if plan.iconify { "1" } else { "0" },
        );

        if plan.monitor.is_some() {
            let wanted = sdl2::video::DisplayMode::new(
                PixelFormatEnum::Unknown,
                plan.width,
                plan.height,
                plan.refresh_rate,
            );
            let mode = video.closest_display_mode(PRIMARY_DISPLAY, &wanted)?;
            window.set_display_mode(Some(mode))?;
            window.set_fullscreen(FullscreenType::True)?;
        } else {
            window.set_fullscreen(FullscreenType::Off)?;
            window.set_bordered(plan.decorated);
            window
                .set_size(plan.width as u32, plan.height as u32)
                .map_err(|e| e.to_string())?;
            window.set_position(WindowPos::Positioned(plan.x), WindowPos::Positioned(plan.y));
        }
        Ok(())
    }

    fn translate_event(&mut self, event: Event) -> Option<BackendEvent> {
        let translated = match event {
            Event::Quit { .. } => BackendEvent::CloseRequested,
            Event::Window { win_event, .. } => match win_event {
                WindowEvent::Close => BackendEvent::CloseRequested,
                WindowEvent::FocusGained => BackendEvent::Focus(true),
                WindowEvent::FocusLost => BackendEvent::Focus(false),
                WindowEvent::Minimized => BackendEvent::Iconify(true),
                WindowEvent::Restored => BackendEvent::Iconify(false),
                _ => return None,
            },
            Event::KeyDown {
                scancode: Some(scancode),
                repeat,
                ..
            } => BackendEvent::Key {
                key: scancode as i32 as u32,
                action: if repeat {
                    KeyAction::Repeat
                } else {
                    KeyAction::Press
                },
            },
            Event::KeyUp {
                scancode: Some(scancode),
                ..
            } => BackendEvent::Key {
                key: scancode as i32 as u32,
                action: KeyAction::Release,
            },
            Event::MouseButtonDown { mouse_btn, .. } => BackendEvent::MouseButton {
                button: mouse_button_index(mouse_btn)?,
                action: KeyAction::Press,
            },
            Event::MouseButtonUp { mouse_btn, .. } => BackendEvent::MouseButton {
                button: mouse_button_index(mouse_btn)?,
                action: KeyAction::Release,
            },
            Event::MouseMotion {
                x, y, xrel, yrel, ..
            } => {
                if take_warp_echo(&mut self.pending_warp, x, y) {
                    return None;
                }
                if self.relative_mouse {
                    self.pointer.0 += f64::from(xrel);
                    self.pointer.1 += f64::from(yrel);
                } else {
                    self.pointer = (f64::from(x), f64::from(y));
                }
                BackendEvent::CursorPos {
                    x: self.pointer.0,
                    y: self.pointer.1,
                }
            }
            Event::MouseWheel { y, direction, .. } => {
                let dy = f64::from(y);
                BackendEvent::Scroll {
                    dy: if direction == MouseWheelDirection::Flipped {
                        -dy
                    } else {
                        dy
                    },
                }
            }
            Event::JoyAxisMotion {
                which,
                axis_idx,
                value,
                ..
            } => BackendEvent::ControllerAxis {
                controller: which,
                axis: u32::from(axis_idx),
                value: normalize_axis(value),
            },
            Event::JoyButtonDown {
                which, button_idx, ..
            } => BackendEvent::ControllerButton {
                controller: which,
                button: u32::from(button_idx),
                pressed: true,
            },
            Event::JoyButtonUp {
                which, button_idx, ..
            } => BackendEvent::ControllerButton {
                controller: which,
                button: u32::from(button_idx),
                pressed: false,
            },
            Event::JoyHatMotion { which, state, .. } => BackendEvent::ControllerPov {
                controller: which,
                pov: hat_to_pov(state),
            },
            _ => return None,
        };
        Some(translated)
    }
}

impl Backend for SdlBackend {
    fn primary_monitor(&mut self) -> DisplayResult<MonitorHandle> {
        let count = self
            .video_subsystem
            .num_video_displays()
            .map_err(DisplayError::MonitorQuery)?;
        if count < 1 {
            return Err(DisplayError::MonitorQuery("no displays".to_string()));
        }
        Ok(MonitorHandle(PRIMARY_DISPLAY as u32))
    }

    fn desktop_mode(&mut self, monitor: MonitorHandle) -> DisplayResult<DisplayMode> {
        self.video_subsystem
            .desktop_display_mode(monitor.0 as i32)
            .map(|mode| to_display_mode(&mode))
            .map_err(DisplayError::MonitorQuery)
    }

    fn video_modes(&mut self, monitor: MonitorHandle) -> DisplayResult<Vec<DisplayMode>> {
        let display = monitor.0 as i32;
        let count = self
            .video_subsystem
            .num_display_modes(display)
            .map_err(DisplayError::ModeQuery)?;
        (0..count)
            .map(|index| {
                self.video_subsystem
                    .display_mode(display, index)
                    .map(|mode| to_display_mode(&mode))
                    .map_err(DisplayError::ModeQuery)
            })
            .collect()
    }

    fn gamma_ramp(&mut self, _monitor: MonitorHandle) -> Option<GammaRamp> {
        // SDL reads gamma through a window; borrow a hidden one if needed.
        let probe;
        let window = match &self.window {
            Some(window) => window,
            None => {
                probe = self
                    .video_subsystem
                    .window("gamma probe", 1, 1)
                    .hidden()
                    .build()
                    .map_err(|e| log::warn!("Cannot create gamma probe window: {}", e))
                    .ok()?;
                &probe
            }
        };
        match window.gamma_ramp() {
            Ok((red, green, blue)) => GammaRamp::new(red, green, blue),
            Err(e) => {
                log::warn!("Gamma ramp unavailable: {}", e);
                None
            }
        }
    }

    fn set_gamma_ramp(&mut self, _monitor: MonitorHandle, ramp: &GammaRamp) {
        let Some(window) = self.window.as_mut() else {
            log::debug!("Skipping gamma ramp without a window");
            return;
        };
        let channels = (
            <&[u16; GAMMA_RAMP_SIZE]>::try_from(ramp.red()),
            <&[u16; GAMMA_RAMP_SIZE]>::try_from(ramp.green()),
            <&[u16; GAMMA_RAMP_SIZE]>::try_from(ramp.blue()),
        );
        let (Ok(red), Ok(green), Ok(blue)) = channels else {
            log::warn!("Gamma ramp of size {} not supported", ramp.size());
            return;
        };
        if let Err(e) = window.set_gamma_ramp(red, green, blue) {
            log::warn!("Failed to set gamma ramp: {}", e);
        }
    }

    fn create_window(
        &mut self,
        title: &str,
        plan: &WindowGeometryPlan,
    ) -> DisplayResult<WindowHandle> {
        log::info!("Creating window: {}x{}", plan.width, plan.height);

        let mut window_builder =
            self.video_subsystem
                .window(title, plan.width as u32, plan.height as u32);
        window_builder.position(plan.x, plan.y).opengl().hidden();
        if !plan.decorated {
            window_builder.borderless();
        }
        let mut window = window_builder
            .build()
            .map_err(|e| DisplayError::WindowCreation(e.to_string()))?;

        if plan.monitor.is_some() {
            Self::apply_plan(&self.video_subsystem, &mut window, plan)
                .map_err(DisplayError::WindowCreation)?;
        } else {
            sdl2::hint::set(MINIMIZE_ON_FOCUS_LOSS_HINT, "0");
        }

        let gl_context = window
            .gl_create_context()
            .map_err(|e| DisplayError::WindowCreation(format!("GL context: {}", e)))?;
        let video_subsystem = &self.video_subsystem;
        gl::load_with(|s| video_subsystem.gl_get_proc_address(s) as *const _);

        self.video_subsystem.text_input().start();

        let handle = WindowHandle(window.id());
        self.gl_context = Some(gl_context);
        self.window = Some(window);
        Ok(handle)
    }

    fn update_window(
        &mut self,
        window: WindowHandle,
        plan: &WindowGeometryPlan,
    ) -> DisplayResult<()> {
        let video_subsystem = &self.video_subsystem;
        let window = match self.window.as_mut() {
            Some(live) if live.id() == window.0 => live,
            _ => return Err(DisplayError::NotCreated),
        };
        Self::apply_plan(video_subsystem, window, plan).map_err(DisplayError::WindowUpdate)
    }

    fn destroy_window(&mut self, window: WindowHandle) {
        if self.window.as_ref().map(Window::id) != Some(window.0) {
            log::warn!("Destroying unknown window {}", window.0);
        }
        self.video_subsystem.text_input().stop();
        self.gl_context = None;
        self.window = None;
    }

    fn set_floating(&mut self, window: WindowHandle, floating: bool) {
        let Some(window) = self.window_mut(window) else {
            return;
        };
        let on_top = if floating {
            sdl2::sys::SDL_bool::SDL_TRUE
        } else {
            sdl2::sys::SDL_bool::SDL_FALSE
        };
        // SAFETY: the raw pointer belongs to a live window owned by self.
        unsafe { sdl2::sys::SDL_SetWindowAlwaysOnTop(window.raw(), on_top) };
    }

    fn set_title(&mut self, window: WindowHandle, title: &str) {
        if let Some(window) = self.window_mut(window) {
            if let Err(e) = window.set_title(title) {
                log::warn!("Invalid window title: {}", e);
            }
        }
    }

    fn set_icons(&mut self, window: WindowHandle, icons: &[Icon]) {
        let Some(icon) = icons.iter().max_by_key(|icon| icon.size) else {
            return;
        };
        let Some(window) = self.window_mut(window) else {
            return;
        };
        let mut pixels = icon.rgba.clone();
        match Surface::from_data(&mut pixels, icon.size, icon.size, icon.size * 4, RGBA_FORMAT) {
            Ok(surface) => window.set_icon(surface),
            Err(e) => log::warn!("Failed to build icon surface: {}", e),
        }
    }

    fn set_position(&mut self, window: WindowHandle, x: i32, y: i32) {
        if let Some(window) = self.window_mut(window) {
            window.set_position(WindowPos::Positioned(x), WindowPos::Positioned(y));
        }
    }

    fn make_context_current(&mut self, window: WindowHandle) -> DisplayResult<()> {
        let (Some(live), Some(context)) = (self.window.as_ref(), self.gl_context.as_ref()) else {
            return Err(DisplayError::NotCreated);
        };
        if live.id() != window.0 {
            return Err(DisplayError::NotCreated);
        }
        live.gl_make_current(context)
            .map_err(|e| DisplayError::WindowCreation(format!("make current: {}", e)))
    }

    fn set_swap_interval(&mut self, vsync: bool) {
        let interval = if vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(e) = self.video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("Failed to set swap interval: {}", e);
        }
    }

    fn show_window(&mut self, window: WindowHandle) {
        if let Some(window) = self.window_mut(window) {
            window.show();
        }
    }

    fn swap_buffers(&mut self, window: WindowHandle) -> DisplayResult<()> {
        match self.window.as_ref() {
            Some(live) if live.id() == window.0 => {
                live.gl_swap_window();
                Ok(())
            }
            _ => Err(DisplayError::NotCreated),
        }
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        let raw: Vec<Event> = self.event_pump.poll_iter().collect();
        raw.into_iter()
            .filter_map(|event| self.translate_event(event))
            .collect()
    }

    fn set_cursor_position(&mut self, window: WindowHandle, x: f64, y: f64) {
        self.pointer = (x, y);
        let target = (x as i32, y as i32);
        let mouse = self.sdl_context.mouse();
        if let Some(window) = self.window_mut(window) {
            mouse.warp_mouse_in_window(window, target.0, target.1);
        } else {
            return;
        }
        // Relative mode warps without a motion event.
        self.pending_warp = (!self.relative_mouse).then_some(target);
    }

    fn create_cursor(&mut self, image: &CursorImage) -> DisplayResult<CursorHandle> {
        let mut pixels = image.rgba.clone();
        let surface = Surface::from_data(
            &mut pixels,
            image.width,
            image.height,
            image.width * 4,
            RGBA_FORMAT,
        )
        .map_err(DisplayError::CursorCreation)?;
        let cursor = sdl2::mouse::Cursor::from_surface(
            surface,
            image.x_hotspot as i32,
            image.y_hotspot as i32,
        )
        .map_err(DisplayError::CursorCreation)?;

        let handle = CursorHandle(self.next_cursor);
        self.next_cursor += 1;
        self.cursors.insert(handle, cursor);
        Ok(handle)
    }

    fn destroy_cursor(&mut self, cursor: CursorHandle) {
        if self.cursors.remove(&cursor).is_none() {
            log::warn!("Destroying unknown cursor {}", cursor.0);
        }
    }

    fn set_cursor(&mut self, _window: WindowHandle, cursor: Option<CursorHandle>) {
        match cursor {
            Some(handle) => match self.cursors.get(&handle) {
                Some(cursor) => cursor.set(),
                None => log::warn!("Showing unknown cursor {}", handle.0),
            },
            None => {
                if self.default_cursor.is_none() {
                    match sdl2::mouse::Cursor::from_system(SystemCursor::Arrow) {
                        Ok(cursor) => self.default_cursor = Some(cursor),
                        Err(e) => log::warn!("System cursor unavailable: {}", e),
                    }
                }
                if let Some(cursor) = &self.default_cursor {
                    cursor.set();
                }
            }
        }
    }

    fn set_cursor_mode(&mut self, window: WindowHandle, mode: CursorMode) {
        let mouse = self.sdl_context.mouse();
        let Some(window) = self.window_mut(window) else {
            return;
        };
        match mode {
            CursorMode::Normal => {
                mouse.set_relative_mouse_mode(false);
                window.set_grab(false);
                mouse.show_cursor(true);
            }
            CursorMode::Captured => {
                mouse.set_relative_mouse_mode(false);
                window.set_grab(true);
                mouse.show_cursor(true);
            }
            CursorMode::Disabled => {
                window.set_grab(true);
                mouse.show_cursor(false);
                mouse.set_relative_mouse_mode(true);
            }
        }
        self.relative_mouse = mode == CursorMode::Disabled;
    }

    fn controllers(&mut self) -> Vec<ControllerInfo> {
        let Some(subsystem) = &self.joystick_subsystem else {
            return Vec::new();
        };
        let count = match subsystem.num_joysticks() {
            Ok(count) => count,
            Err(e) => {
                log::warn!("Cannot enumerate joysticks: {}", e);
                return Vec::new();
            }
        };

        self.joysticks.clear();
        for index in 0..count {
            match subsystem.open(index) {
                Ok(joystick) => self.joysticks.push(joystick),
                Err(e) => log::warn!("Cannot open joystick {}: {}", index, e),
            }
        }
        self.joysticks
            .iter()
            .map(|joystick| ControllerInfo {
                id: joystick.instance_id(),
                name: joystick.name(),
                axis_names: (0..joystick.num_axes() as usize).map(axis_name).collect(),
                button_count: joystick.num_buttons() as usize,
                pov_count: joystick.num_hats() as usize,
                device_dead_zone: 0.0,
            })
            .collect()
    }

    fn release(&mut self) {
        log::debug!(
            "Releasing {} cursor(s) and {} joystick(s)",
            self.cursors.len(),
            self.joysticks.len()
        );
        self.cursors.clear();
        self.default_cursor = None;
        self.joysticks.clear();
        self.relative_mouse = false;
    }
}

impl Drop for SdlBackend {
    fn drop(&mut self) {
        if self.window.is_some() {
            log::debug!("SdlBackend dropping with a live window");
            self.gl_context = None;
            self.window = None;
        }
    }
}

fn to_display_mode(mode: &sdl2::video::DisplayMode) -> DisplayMode {
    let bits_per_pixel = mode
        .format
        .into_masks()
        .map_or(0, |masks| i32::from(masks.bpp));
    DisplayMode::native(mode.w, mode.h, bits_per_pixel, mode.refresh_rate)
}

/// Legacy button numbering: left, right, middle, then extra buttons.
fn mouse_button_index(button: MouseButton) -> Option<i32> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::X1 => Some(3),
        MouseButton::X2 => Some(4),
        MouseButton::Unknown => None,
    }
}

/// Whether a motion to `(x, y)` is the echo of the pending warp. The first
/// motion after a warp always clears it.
fn take_warp_echo(pending: &mut Option<(i32, i32)>, x: i32, y: i32) -> bool {
    pending.take() == Some((x, y))
}

fn normalize_axis(value: i16) -> f32 {
    (f32::from(value) / f32::from(i16::MAX)).clamp(-1.0, 1.0)
}

fn axis_name(index: usize) -> String {
    AXIS_NAMES
        .get(index)
        .map_or_else(|| format!("Axis {}", index), |name| (*name).to_string())
}

fn hat_to_pov(state: HatState) -> PovPosition {
    match state {
        HatState::Centered => PovPosition::Centered,
        HatState::Up => PovPosition::Up,
        HatState::RightUp => PovPosition::UpRight,
        HatState::Right => PovPosition::Right,
        HatState::RightDown => PovPosition::DownRight,
        HatState::Down => PovPosition::Down,
        HatState::LeftDown => PovPosition::DownLeft,
        HatState::Left => PovPosition::Left,
        HatState::LeftUp => PovPosition::UpLeft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_button_index() {
        assert_eq!(mouse_button_index(MouseButton::Left), Some(0));
        assert_eq!(mouse_button_index(MouseButton::Right), Some(1));
        assert_eq!(mouse_button_index(MouseButton::Middle), Some(2));
        assert_eq!(mouse_button_index(MouseButton::Unknown), None);
    }

    #[test]
    fn test_normalize_axis() {
        assert_eq!(normalize_axis(0), 0.0);
        assert_eq!(normalize_axis(i16::MAX), 1.0);
        assert_eq!(normalize_axis(i16::MIN), -1.0);
    }

    #[test]
    fn test_warp_echo_dropped_once() {
        let mut pending = Some((10, 500));
        assert!(take_warp_echo(&mut pending, 10, 500));
        assert!(!take_warp_echo(&mut pending, 10, 500));

        let mut pending = Some((10, 500));
        assert!(!take_warp_echo(&mut pending, 11, 500));
        assert_eq!(pending, None);
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(axis_name(0), "X");
        assert_eq!(axis_name(1), "Y");
        assert_eq!(axis_name(7), "Axis 7");
    }

    #[test]
    fn test_hat_mapping() {
        assert_eq!(hat_to_pov(HatState::Centered), PovPosition::Centered);
        assert_eq!(hat_to_pov(HatState::LeftUp), PovPosition::UpLeft);
        assert_eq!(hat_to_pov(HatState::RightDown), PovPosition::DownRight);
    }

    #[test]
    fn test_sdl_mode_conversion() {
        let mode = sdl2::video::DisplayMode::new(PixelFormatEnum::RGB888, 1024, 768, 75);
        let converted = to_display_mode(&mode);
        assert_eq!(converted.width(), 1024);
        assert_eq!(converted.height(), 768);
        assert_eq!(converted.frequency(), 75);
        assert!(converted.supports_fullscreen());
    }
}
