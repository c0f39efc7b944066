//! Window geometry planning.
//!
//! Maps the caller's wishes (a display mode and whether exclusive fullscreen
//! is desired) onto a window mode and a concrete placement the backend can
//! realize. Nothing here touches the backend.

use crate::backend::MonitorHandle;
use crate::display::mode::{DisplayMode, WindowMode};

/// Where and how the window should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometryPlan {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Set only for exclusive fullscreen.
    pub monitor: Option<MonitorHandle>,
    pub refresh_rate: i32,
    /// Minimize when focus is lost.
    pub iconify: bool,
    pub decorated: bool,
}

/// Planner bound to the desktop of one monitor.
#[derive(Debug, Clone, Copy)]
pub struct WindowGeometryPlanner {
    monitor: MonitorHandle,
    desktop: DisplayMode,
    prefer_windowed_fullscreen: bool,
    decorations_enabled: bool,
}

impl WindowGeometryPlanner {
    #[must_use]
    pub const fn new(
        monitor: MonitorHandle,
        desktop: DisplayMode,
        prefer_windowed_fullscreen: bool,
        decorations_enabled: bool,
    ) -> Self {
        Self {
            monitor,
            desktop,
            prefer_windowed_fullscreen,
            decorations_enabled,
        }
    }

    #[must_use]
    pub const fn desktop(&self) -> DisplayMode {
        self.desktop
    }

    /// The window mode the caller asked for, ignoring preferences.
    ///
    /// This is what "is the display fullscreen?" must report, and what gamma
    /// handling follows.
    #[must_use]
    pub fn evaluate(&self, exclusive_desired: bool, mode: &DisplayMode) -> WindowMode {
        if exclusive_desired && mode.supports_fullscreen() {
            WindowMode::ExclusiveFullscreen
        } else if mode.same_size_as(&self.desktop) {
            WindowMode::WindowedFullscreen
        } else {
            WindowMode::Windowed
        }
    }

    /// The window mode actually realized: an exclusive request at desktop size
    /// becomes windowed fullscreen when that is preferred.
    #[must_use]
    pub fn realize(&self, exclusive_desired: bool, mode: &DisplayMode) -> WindowMode {
        let requested = self.evaluate(exclusive_desired, mode);
        if self.prefer_windowed_fullscreen
            && requested == WindowMode::ExclusiveFullscreen
            && mode.same_size_as(&self.desktop)
        {
            WindowMode::WindowedFullscreen
        } else {
            requested
        }
    }

    /// Placement for `mode` shown in `window_mode`.
    #[must_use]
    pub fn plan(&self, window_mode: WindowMode, mode: &DisplayMode) -> WindowGeometryPlan {
        let exclusive = window_mode == WindowMode::ExclusiveFullscreen;
        let (x, y) = if window_mode == WindowMode::Windowed {
            (
                (self.desktop.width() - mode.width()) / 2,
                (self.desktop.height() - mode.height()) / 2,
            )
        } else {
            (0, 0)
        };
        WindowGeometryPlan {
            x,
            y,
            width: mode.width(),
            height: mode.height(),
            monitor: exclusive.then_some(self.monitor),
            refresh_rate: mode.frequency(),
            iconify: exclusive,
            decorated: window_mode != WindowMode::WindowedFullscreen && self.decorations_enabled,
        }
    }

    /// Realize and plan in one step.
    #[must_use]
    pub fn plan_for(
        &self,
        exclusive_desired: bool,
        mode: &DisplayMode,
    ) -> (WindowMode, WindowGeometryPlan) {
        let window_mode = self.realize(exclusive_desired, mode);
        (window_mode, self.plan(window_mode, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MONITOR: MonitorHandle = MonitorHandle(7);
    const DESKTOP: DisplayMode = DisplayMode::native(1920, 1080, 24, 60);

    fn planner(prefer_windowed_fullscreen: bool) -> WindowGeometryPlanner {
        WindowGeometryPlanner::new(MONITOR, DESKTOP, prefer_windowed_fullscreen, true)
    }

    #[rstest]
    #[case(true, DisplayMode::native(1920, 1080, 24, 60), WindowMode::ExclusiveFullscreen)]
    #[case(true, DisplayMode::native(1280, 720, 24, 60), WindowMode::ExclusiveFullscreen)]
    #[case(false, DisplayMode::native(1920, 1080, 24, 60), WindowMode::WindowedFullscreen)]
    #[case(false, DisplayMode::new(1920, 1080), WindowMode::WindowedFullscreen)]
    #[case(true, DisplayMode::new(1920, 1080), WindowMode::WindowedFullscreen)]
    #[case(true, DisplayMode::new(1280, 720), WindowMode::Windowed)]
    #[case(false, DisplayMode::native(1280, 720, 24, 60), WindowMode::Windowed)]
    fn test_evaluate(
        #[case] exclusive: bool,
        #[case] mode: DisplayMode,
        #[case] expected: WindowMode,
    ) {
        assert_eq!(planner(false).evaluate(exclusive, &mode), expected);
    }

    #[test]
    fn test_preference_downgrades_only_same_size_exclusive() {
        let p = planner(true);
        assert_eq!(p.realize(true, &DESKTOP), WindowMode::WindowedFullscreen);
        assert_eq!(p.evaluate(true, &DESKTOP), WindowMode::ExclusiveFullscreen);

        let smaller = DisplayMode::native(1280, 720, 24, 60);
        assert_eq!(p.realize(true, &smaller), WindowMode::ExclusiveFullscreen);
    }

    #[test]
    fn test_exclusive_plan_attaches_monitor() {
        let (window_mode, plan) = planner(false).plan_for(true, &DESKTOP);
        assert_eq!(window_mode, WindowMode::ExclusiveFullscreen);
        assert_eq!(plan.monitor, Some(MONITOR));
        assert!(plan.iconify);
        assert!(plan.decorated);
        assert_eq!((plan.x, plan.y), (0, 0));
        assert_eq!((plan.width, plan.height, plan.refresh_rate), (1920, 1080, 60));
    }

    #[test]
    fn test_windowed_fullscreen_plan_is_undecorated() {
        let (window_mode, plan) = planner(false).plan_for(false, &DESKTOP);
        assert_eq!(window_mode, WindowMode::WindowedFullscreen);
        assert_eq!(plan.monitor, None);
        assert!(!plan.decorated);
        assert!(!plan.iconify);
        assert_eq!((plan.x, plan.y), (0, 0));
    }

    #[test]
    fn test_windowed_plan_is_centered() {
        let (window_mode, plan) = planner(false).plan_for(false, &DisplayMode::new(1280, 720));
        assert_eq!(window_mode, WindowMode::Windowed);
        assert_eq!((plan.x, plan.y), (320, 180));
        assert_eq!(plan.monitor, None);
        assert!(plan.decorated);
        assert_eq!(plan.refresh_rate, 0);
    }

    #[test]
    fn test_centering_truncates_odd_margins() {
        let plan = planner(false).plan(WindowMode::Windowed, &DisplayMode::new(1001, 601));
        assert_eq!((plan.x, plan.y), (459, 239));
    }

    #[test]
    fn test_caller_built_mode_never_exclusive() {
        let (window_mode, plan) = planner(false).plan_for(true, &DisplayMode::new(800, 600));
        assert_eq!(window_mode, WindowMode::Windowed);
        assert_eq!(plan.monitor, None);
    }

    #[test]
    fn test_decorations_disabled() {
        let p = WindowGeometryPlanner::new(MONITOR, DESKTOP, false, false);
        let plan = p.plan(WindowMode::Windowed, &DisplayMode::new(800, 600));
        assert!(!plan.decorated);
    }
}
