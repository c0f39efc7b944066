//! Display modes and the derived window mode.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A video mode: size, color depth, and refresh rate.
///
/// Modes reported by the backend's monitor query are *native* and may be used
/// for exclusive fullscreen; modes built by the caller with [`DisplayMode::new`]
/// never are. The native flag takes no part in equality or hashing.
#[derive(Debug, Clone, Copy)]
pub struct DisplayMode {
    width: i32,
    height: i32,
    bits_per_pixel: i32,
    frequency: i32,
    native: bool,
}

impl DisplayMode {
    /// A caller-built mode of the given size, with unknown depth and rate.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 0,
            frequency: 0,
            native: false,
        }
    }

    /// A mode as reported by the monitor query.
    #[must_use]
    pub const fn native(width: i32, height: i32, bits_per_pixel: i32, frequency: i32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
            frequency,
            native: true,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub const fn bits_per_pixel(&self) -> i32 {
        self.bits_per_pixel
    }

    /// Refresh rate in Hz (0 if unknown).
    #[must_use]
    pub const fn frequency(&self) -> i32 {
        self.frequency
    }

    /// Whether this mode came from the monitor query and can back an
    /// exclusive fullscreen window.
    #[must_use]
    pub const fn supports_fullscreen(&self) -> bool {
        self.native
    }

    #[must_use]
    pub const fn same_size_as(&self, other: &DisplayMode) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl PartialEq for DisplayMode {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.bits_per_pixel == other.bits_per_pixel
            && self.frequency == other.frequency
    }
}

impl Eq for DisplayMode {}

impl Hash for DisplayMode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.height.hash(state);
        self.bits_per_pixel.hash(state);
        self.frequency.hash(state);
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} x {} @{}Hz",
            self.width, self.height, self.bits_per_pixel, self.frequency
        )
    }
}

/// How the single window occupies the screen.
///
/// The backend has one notion of "fullscreen"; these are the conventional
/// names for the three legacy behaviors built on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowMode {
    /// The window owns the monitor and may change its video mode.
    ExclusiveFullscreen,
    /// An undecorated window the size of the monitor, on top while focused.
    WindowedFullscreen,
    /// A regular window centered on the desktop.
    Windowed,
}

impl WindowMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ExclusiveFullscreen => "exclusive fullscreen",
            Self::WindowedFullscreen => "windowed fullscreen",
            Self::Windowed => "windowed",
        }
    }
}
