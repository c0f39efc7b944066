//! Native mouse cursors.
//!
//! A legacy cursor may carry several animation frames. Each frame becomes a
//! backend cursor, but only the first is ever shown.

use crate::backend::{Backend, CursorHandle, CursorImage, DisplayError, DisplayResult};

/// Capability bit: cursors may use one-bit transparency.
pub const CURSOR_ONE_BIT_TRANSPARENCY: i32 = 1;
/// Capability bit: cursors may use eight-bit alpha.
pub const CURSOR_8_BIT_ALPHA: i32 = 2;
/// Capability bit: cursors may be animated.
pub const CURSOR_ANIMATION: i32 = 4;

const MIN_CURSOR_SIZE: u32 = 1;
const MAX_CURSOR_SIZE: u32 = 512;

/// Backend cursors built from one or more RGBA frames.
#[derive(Debug)]
pub struct Cursor {
    frames: Vec<CursorHandle>,
}

impl Cursor {
    /// Build a cursor from `image_count` frames of `width` x `height` RGBA8
    /// pixels laid out back to back in `rgba`. The hotspot uses a top-left
    /// origin.
    pub fn new<B: Backend>(
        backend: &mut B,
        width: u32,
        height: u32,
        x_hotspot: u32,
        y_hotspot: u32,
        image_count: usize,
        rgba: &[u8],
    ) -> DisplayResult<Self> {
        let frame_len = width as usize * height as usize * 4;
        if image_count == 0 {
            return Err(DisplayError::CursorCreation("cursor has no images".to_string()));
        }
        if !(MIN_CURSOR_SIZE..=MAX_CURSOR_SIZE).contains(&width)
            || !(MIN_CURSOR_SIZE..=MAX_CURSOR_SIZE).contains(&height)
        {
            return Err(DisplayError::CursorCreation(format!(
                "unsupported cursor size {}x{}",
                width, height
            )));
        }
        if rgba.len() != frame_len * image_count {
            return Err(DisplayError::CursorCreation(format!(
                "expected {} bytes for {} images, got {}",
                frame_len * image_count,
                image_count,
                rgba.len()
            )));
        }

        let mut frames = Vec::with_capacity(image_count);
        for pixels in rgba.chunks_exact(frame_len) {
            let image = CursorImage {
                width,
                height,
                x_hotspot,
                y_hotspot,
                rgba: pixels.to_vec(),
            };
            match backend.create_cursor(&image) {
                Ok(handle) => frames.push(handle),
                Err(e) => {
                    for handle in frames {
                        backend.destroy_cursor(handle);
                    }
                    return Err(e);
                }
            }
        }
        log::debug!("Created {}x{} cursor with {} frame(s)", width, height, image_count);
        Ok(Self { frames })
    }

    /// The backend cursor that is displayed.
    #[must_use]
    pub fn handle(&self) -> CursorHandle {
        self.frames[0]
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Release every frame. The cursor must not be the one currently shown.
    pub fn destroy<B: Backend>(self, backend: &mut B) {
        for handle in self.frames {
            backend.destroy_cursor(handle);
        }
    }

    /// Supported cursor features as capability bits.
    #[must_use]
    pub fn capabilities() -> i32 {
        CURSOR_ONE_BIT_TRANSPARENCY
    }

    #[must_use]
    pub fn min_cursor_size() -> u32 {
        MIN_CURSOR_SIZE
    }

    #[must_use]
    pub fn max_cursor_size() -> u32 {
        MAX_CURSOR_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, MockCall};

    #[test]
    fn test_first_frame_is_shown() {
        let mut backend = MockBackend::new();
        let cursor = Cursor::new(&mut backend, 2, 2, 1, 1, 2, &[0; 32]).unwrap();
        assert_eq!(cursor.frame_count(), 2);
        assert_eq!(cursor.handle(), CursorHandle(1));
    }

    #[test]
    fn test_destroy_releases_all_frames() {
        let mut backend = MockBackend::new();
        let cursor = Cursor::new(&mut backend, 1, 1, 0, 0, 3, &[0; 12]).unwrap();
        cursor.destroy(&mut backend);
        for id in 1..=3 {
            assert_eq!(backend.count(&MockCall::DestroyCursor(CursorHandle(id))), 1);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut backend = MockBackend::new();
        assert!(Cursor::new(&mut backend, 2, 2, 0, 0, 1, &[0; 15]).is_err());
        assert!(Cursor::new(&mut backend, 2, 2, 0, 0, 0, &[]).is_err());
        assert!(Cursor::new(&mut backend, 0, 2, 0, 0, 1, &[]).is_err());
        assert!(Cursor::new(&mut backend, 513, 1, 0, 0, 1, &vec![0; 513 * 4]).is_err());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_backend_failure_propagates() {
        let mut backend = MockBackend::new().failing_cursor_creation();
        let result = Cursor::new(&mut backend, 1, 1, 0, 0, 1, &[0; 4]);
        assert!(matches!(result, Err(DisplayError::CursorCreation(_))));
    }

    #[test]
    fn test_capabilities() {
        assert_eq!(Cursor::capabilities() & CURSOR_ONE_BIT_TRANSPARENCY, 1);
        assert_eq!(Cursor::capabilities() & CURSOR_ANIMATION, 0);
        assert_eq!(Cursor::min_cursor_size(), 1);
        assert_eq!(Cursor::max_cursor_size(), 512);
    }
}
