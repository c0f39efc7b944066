// Legacy display layer
// Polling window/input API over an event-driven windowing backend

pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod input;
pub mod logging;
pub mod session;

pub use backend::{Backend, BackendEvent, DisplayError, DisplayResult, MockBackend};
#[cfg(feature = "sdl")]
pub use backend::SdlBackend;
pub use cli::Cli;
pub use config::Options;
pub use display::{DisplayController, DisplayMode, WindowMode};
pub use input::{Controllers, Cursor, Keyboard, Mouse};
pub use logging::LogLevel;
pub use session::Session;
