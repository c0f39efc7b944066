//!
//! Common types, traits, and errors for windowing backends.
//!
//! This module holds the contract between the legacy display/input layer and
//! whatever windowing system actually owns the window: the `Backend` trait,
//! the opaque handles it hands out, the events it reports, and the shared
//! error type.
//!

use crate::display::gamma::GammaRamp;
use crate::display::mode::DisplayMode;
use crate::display::planner::WindowGeometryPlan;

/// Error types for display, window, and cursor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    /// Backend initialization failed.
    #[error("Backend initialization failed: {0}")]
    BackendInit(String),
    /// Primary monitor or desktop mode could not be queried.
    #[error("Monitor query failed: {0}")]
    MonitorQuery(String),
    /// Available display modes could not be queried.
    #[error("Failed to get available display modes: {0}")]
    ModeQuery(String),
    /// Window creation failed.
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    /// Reconfiguring an existing window failed.
    #[error("Window update failed: {0}")]
    WindowUpdate(String),
    /// Native cursor creation failed.
    #[error("Cursor creation failed: {0}")]
    CursorCreation(String),
    /// Icon data is not a square RGBA image.
    #[error("Invalid icon: {0}")]
    InvalidIcon(String),
    /// The operation needs a live window.
    #[error("Display not created")]
    NotCreated,
}

/// Result type for display operations.
pub type DisplayResult<T> = Result<T, DisplayError>;

/// Opaque identifier of a live backend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u32);

/// Opaque identifier of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorHandle(pub u32);

/// Opaque identifier of a backend cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorHandle(pub u32);

/// Key or button transition reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Release,
    Press,
    Repeat,
}

impl KeyAction {
    /// Integer encoding used in queued event records.
    #[must_use]
    pub const fn to_int(self) -> i32 {
        match self {
            Self::Release => 0,
            Self::Press => 1,
            Self::Repeat => 2,
        }
    }

    /// Decode a record value; unknown values read as a release.
    #[must_use]
    pub const fn from_int(value: i32) -> Self {
        match value {
            1 => Self::Press,
            2 => Self::Repeat,
            _ => Self::Release,
        }
    }
}

/// How the backend should treat the pointer for the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorMode {
    /// Visible and free to leave the window.
    Normal,
    /// Visible but confined to the window.
    Captured,
    /// Hidden and locked; only relative motion is meaningful.
    Disabled,
}

/// Point-of-view hat position, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PovPosition {
    #[default]
    Centered,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

/// Events drained from the backend in one message-pump pass.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Window gained or lost input focus.
    Focus(bool),
    /// Window was minimized or restored.
    Iconify(bool),
    /// The user asked to close the window.
    CloseRequested,
    /// Key transition; `key` is a USB HID keyboard usage id.
    Key { key: u32, action: KeyAction },
    /// Unicode character produced by text input.
    Char(u32),
    /// Mouse button transition (0 = left, 1 = right, 2 = middle).
    MouseButton { button: i32, action: KeyAction },
    /// Absolute cursor position, top-left origin.
    CursorPos { x: f64, y: f64 },
    /// Vertical scroll offset in notches.
    Scroll { dy: f64 },
    /// Analog axis moved; `value` is normalized to -1.0..=1.0.
    ControllerAxis { controller: u32, axis: u32, value: f32 },
    /// Controller button transition.
    ControllerButton { controller: u32, button: u32, pressed: bool },
    /// Controller point-of-view hat moved.
    ControllerPov { controller: u32, pov: PovPosition },
}

/// Description of a controller found during enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerInfo {
    /// Backend id used in controller events.
    pub id: u32,
    /// Human-readable device name.
    pub name: String,
    /// Names of the analog axes, in backend order.
    pub axis_names: Vec<String>,
    /// Number of buttons.
    pub button_count: usize,
    /// Number of point-of-view hats.
    pub pov_count: usize,
    /// Dead zone reported by the device itself (0.0 if unknown).
    pub device_dead_zone: f32,
}

/// A square RGBA window icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    /// Edge length in pixels.
    pub size: u32,
    /// RGBA8 pixels, row-major, `size * size * 4` bytes.
    pub rgba: Vec<u8>,
}

impl Icon {
    /// Build an icon from raw RGBA bytes; the edge length is derived from the
    /// byte count, so the data must describe a square image.
    pub fn from_rgba(rgba: Vec<u8>) -> DisplayResult<Self> {
        let pixels = rgba.len() / 4;
        let size = (pixels as f64).sqrt() as u32;
        if rgba.len() % 4 != 0 || (size as usize) * (size as usize) != pixels || size == 0 {
            return Err(DisplayError::InvalidIcon(format!(
                "{} bytes is not a square RGBA image",
                rgba.len()
            )));
        }
        Ok(Self { size, rgba })
    }

    /// Build an icon from a decoded image.
    pub fn from_image(image: &image::RgbaImage) -> DisplayResult<Self> {
        if image.width() != image.height() {
            return Err(DisplayError::InvalidIcon(format!(
                "icon must be square, got {}x{}",
                image.width(),
                image.height()
            )));
        }
        Self::from_rgba(image.as_raw().clone())
    }
}

/// A single RGBA cursor image with its hotspot (top-left origin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorImage {
    pub width: u32,
    pub height: u32,
    pub x_hotspot: u32,
    pub y_hotspot: u32,
    /// RGBA8 pixels, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Trait for windowing backends.
///
/// Every method runs on the thread that owns the window. Window-scoped
/// methods take the handle returned by `create_window`; backends may assume
/// it is the live one.
pub trait Backend {
    /// The monitor legacy callers treat as "the display".
    fn primary_monitor(&mut self) -> DisplayResult<MonitorHandle>;

    /// Current video mode of `monitor`.
    fn desktop_mode(&mut self, monitor: MonitorHandle) -> DisplayResult<DisplayMode>;

    /// All video modes `monitor` supports.
    fn video_modes(&mut self, monitor: MonitorHandle) -> DisplayResult<Vec<DisplayMode>>;

    /// Current gamma ramp of `monitor`, or `None` if gamma is unsupported.
    fn gamma_ramp(&mut self, monitor: MonitorHandle) -> Option<GammaRamp>;

    /// Apply a gamma ramp to `monitor`.
    fn set_gamma_ramp(&mut self, monitor: MonitorHandle, ramp: &GammaRamp);

    /// Create a hidden window laid out per `plan`, with a rendering context.
    fn create_window(&mut self, title: &str, plan: &WindowGeometryPlan)
        -> DisplayResult<WindowHandle>;

    /// Reconfigure an existing window in place.
    fn update_window(&mut self, window: WindowHandle, plan: &WindowGeometryPlan)
        -> DisplayResult<()>;

    /// Destroy the window and its rendering context.
    fn destroy_window(&mut self, window: WindowHandle);

    /// Keep the window above all others.
    fn set_floating(&mut self, window: WindowHandle, floating: bool);

    fn set_title(&mut self, window: WindowHandle, title: &str);

    fn set_icons(&mut self, window: WindowHandle, icons: &[Icon]);

    fn set_position(&mut self, window: WindowHandle, x: i32, y: i32);

    /// Make the window's rendering context current on this thread.
    fn make_context_current(&mut self, window: WindowHandle) -> DisplayResult<()>;

    /// Set the swap interval of the current context.
    fn set_swap_interval(&mut self, vsync: bool);

    fn show_window(&mut self, window: WindowHandle);

    fn swap_buffers(&mut self, window: WindowHandle) -> DisplayResult<()>;

    /// Drain all pending events without blocking.
    fn poll_events(&mut self) -> Vec<BackendEvent>;

    /// Warp the cursor, top-left origin. The warp itself must not come back
    /// from `poll_events` as a `CursorPos` event.
    fn set_cursor_position(&mut self, window: WindowHandle, x: f64, y: f64);

    fn create_cursor(&mut self, image: &CursorImage) -> DisplayResult<CursorHandle>;

    fn destroy_cursor(&mut self, cursor: CursorHandle);

    /// Show `cursor` over the window, or the system default for `None`.
    fn set_cursor(&mut self, window: WindowHandle, cursor: Option<CursorHandle>);

    fn set_cursor_mode(&mut self, window: WindowHandle, mode: CursorMode);

    /// Open and describe every connected controller.
    fn controllers(&mut self) -> Vec<ControllerInfo>;

    /// Release everything the backend still holds. Failures are logged, not
    /// reported.
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_action_encoding() {
        for action in [KeyAction::Release, KeyAction::Press, KeyAction::Repeat] {
            assert_eq!(KeyAction::from_int(action.to_int()), action);
        }
        assert_eq!(KeyAction::from_int(-1), KeyAction::Release);
    }

    #[test]
    fn test_icon_from_rgba_square() {
        let icon = Icon::from_rgba(vec![0u8; 16 * 16 * 4]).unwrap();
        assert_eq!(icon.size, 16);
    }

    #[test]
    fn test_icon_from_rgba_rejects_non_square() {
        assert!(Icon::from_rgba(vec![0u8; 16 * 8 * 4]).is_err());
        assert!(Icon::from_rgba(vec![0u8; 7]).is_err());
        assert!(Icon::from_rgba(Vec::new()).is_err());
    }

    #[test]
    fn test_icon_from_image() {
        let image = image::RgbaImage::new(32, 32);
        let icon = Icon::from_image(&image).unwrap();
        assert_eq!(icon.size, 32);
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);

        let wide = image::RgbaImage::new(32, 16);
        assert!(Icon::from_image(&wide).is_err());
    }

    #[test]
    fn test_display_error_messages() {
        assert_eq!(DisplayError::NotCreated.to_string(), "Display not created");
        assert_eq!(
            DisplayError::WindowCreation("boom".to_string()).to_string(),
            "Window creation failed: boom"
        );
    }
}
