//!
//! Windowing backends.
//!
//! - `common`: the `Backend` trait, handles, events, and `DisplayError`
//! - `mock`: scripted backend that records every call, for tests and headless use
//! - `sdl`: SDL2/OpenGL backend (cargo feature `sdl`)
//!

pub mod common;
pub mod mock;
#[cfg(feature = "sdl")]
pub mod sdl;

pub use common::{
    Backend, BackendEvent, ControllerInfo, CursorHandle, CursorImage, CursorMode, DisplayError,
    DisplayResult, Icon, KeyAction, MonitorHandle, PovPosition, WindowHandle,
};
pub use mock::{MockBackend, MockCall};
#[cfg(feature = "sdl")]
pub use sdl::SdlBackend;
