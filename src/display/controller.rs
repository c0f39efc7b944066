//! The single-window display state machine.
//!
//! `DisplayController` owns the only window handle, decides which of the
//! three legacy window modes the caller's settings map to, and keeps the
//! floating attribute and gamma ramp in step with mode and focus changes.
//! Everything is explicit state on one value; nothing is global.

use crate::backend::{
    Backend, BackendEvent, DisplayError, DisplayResult, Icon, MonitorHandle, WindowHandle,
};
use crate::config::Options;
use crate::display::gamma::GammaState;
use crate::display::mode::{DisplayMode, WindowMode};
use crate::display::planner::WindowGeometryPlanner;

/// Window lifecycle, configuration, and capability queries over a backend.
pub struct DisplayController<B: Backend> {
    backend: B,
    monitor: MonitorHandle,
    planner: WindowGeometryPlanner,
    gamma: GammaState,

    window: Option<WindowHandle>,
    /// Armed by `is_created`, consumed by the next `destroy`.
    recreate_pending: bool,

    // Settings that may arrive before the window exists.
    display_mode: Option<DisplayMode>,
    window_mode: Option<WindowMode>,
    exclusive_desired: bool,
    vsync: Option<bool>,
    title: String,
    icons: Option<Vec<Icon>>,

    // Window callback state.
    iconified: bool,
    focused: bool,
    close_requested: bool,
}

impl<B: Backend> DisplayController<B> {
    /// Bind to the backend's primary monitor and snapshot its gamma ramp.
    ///
    /// The desktop mode read here is cached for the life of the controller.
    pub fn init(mut backend: B, options: &Options) -> DisplayResult<Self> {
        let monitor = backend.primary_monitor()?;
        let desktop = backend.desktop_mode(monitor)?;
        log::info!("Desktop display mode: {}", desktop);

        let gamma = GammaState::capture(&mut backend, monitor);
        let planner = WindowGeometryPlanner::new(
            monitor,
            desktop,
            options.prefer_windowed_fullscreen,
            !options.undecorated,
        );

        Ok(Self {
            backend,
            monitor,
            planner,
            gamma,
            window: None,
            recreate_pending: false,
            display_mode: None,
            window_mode: None,
            exclusive_desired: false,
            vsync: None,
            title: String::new(),
            icons: None,
            iconified: false,
            focused: false,
            close_requested: false,
        })
    }

    // CREATION

    /// Create and show the window with every pending setting applied.
    /// Does nothing if a window already exists.
    pub fn create(&mut self) -> DisplayResult<()> {
        if self.window.is_some() {
            return Ok(());
        }

        let mode = self.current_mode();
        let (window_mode, plan) = self.planner.plan_for(self.exclusive_desired, &mode);
        self.window_mode = Some(window_mode);

        log::info!(
            "Creating {}x{} window ({})",
            plan.width,
            plan.height,
            window_mode.name()
        );
        let window = self.backend.create_window(&self.title, &plan)?;
        self.window = Some(window);

        if let Some(icons) = &self.icons {
            self.backend.set_icons(window, icons);
        }
        self.update_after_mode_change();
        if let Err(e) = self.backend.make_context_current(window) {
            log::error!("Failed to make the GL context current: {}", e);
            self.window = None;
            self.gamma.restore(&mut self.backend);
            self.backend.destroy_window(window);
            return Err(e);
        }
        if let Some(vsync) = self.vsync {
            self.backend.set_swap_interval(vsync);
        }
        self.backend.show_window(window);
        self.focused = true;
        Ok(())
    }

    /// Destroy the window and release what the backend still holds.
    ///
    /// If `is_created` armed the recreate accommodation, this call is
    /// swallowed once and the window survives.
    pub fn destroy(&mut self) {
        if self.recreate_pending {
            self.recreate_pending = false;
            log::debug!("Ignoring destroy that precedes an in-place mode change");
            return;
        }
        if let Some(window) = self.window.take() {
            self.gamma.restore(&mut self.backend);
            self.backend.destroy_window(window);
            log::info!("Window destroyed");
        }
        self.iconified = false;
        self.focused = false;
        self.close_requested = false;
        self.backend.release();
    }

    /// Legacy "is the display created?" query.
    ///
    /// Callers use this immediately before an unconditional `destroy` when
    /// they mean to recreate the window for a mode change. Answering `true`
    /// therefore arms a one-shot flag that makes the next `destroy` a no-op,
    /// so the mode change is applied in place instead. Use
    /// [`DisplayController::window_is_created`] for a query without that side
    /// effect.
    pub fn is_created(&mut self) -> bool {
        let created = self.window_is_created();
        if created {
            self.arm_destroy_suppression();
        }
        created
    }

    /// Arm the one-shot destroy suppression used by `is_created`.
    pub fn arm_destroy_suppression(&mut self) {
        if self.recreate_pending {
            log::warn!(
                "Unexpected display interfacing: display creation was queried twice without a destroy in between"
            );
        }
        self.recreate_pending = true;
    }

    /// Whether a window exists. No side effects.
    #[must_use]
    pub fn window_is_created(&self) -> bool {
        self.window.is_some()
    }

    // WINDOW CONFIGURATION

    pub fn set_title(&mut self, title: &str) {
        if title == self.title {
            return;
        }
        self.title = title.to_string();
        if let Some(window) = self.window {
            self.backend.set_title(window, title);
        }
    }

    /// Replace the window icons. Identical icon sets are ignored.
    pub fn set_icons(&mut self, icons: Vec<Icon>) {
        if self.icons.as_ref() == Some(&icons) {
            return;
        }
        if let Some(window) = self.window {
            self.backend.set_icons(window, &icons);
        }
        self.icons = Some(icons);
    }

    pub fn set_location(&mut self, x: i32, y: i32) -> DisplayResult<()> {
        let window = self.window.ok_or(DisplayError::NotCreated)?;
        self.backend.set_position(window, x, y);
        Ok(())
    }

    // DISPLAY MODE

    /// Store the desired mode and re-derive the window mode.
    ///
    /// An existing window is reconfigured in place when either changed. The
    /// exclusivity flag must already be set: `set_fullscreen` defers to this
    /// call.
    pub fn set_display_mode(&mut self, mode: DisplayMode) -> DisplayResult<()> {
        let old_display_mode = self.display_mode.replace(mode);
        let old_window_mode = self.window_mode;
        let window_mode = self.planner.realize(self.exclusive_desired, &mode);
        self.window_mode = Some(window_mode);

        let changed = old_display_mode != Some(mode) || old_window_mode != Some(window_mode);
        let Some(window) = self.window else {
            return Ok(());
        };
        if !changed {
            return Ok(());
        }

        log::info!("Switching to {} ({})", mode, window_mode.name());
        let plan = self.planner.plan(window_mode, &mode);
        self.backend.update_window(window, &plan)?;
        // Icons only stick to a title bar that exists, so reapply once windowed.
        if window_mode == WindowMode::Windowed {
            if let Some(icons) = &self.icons {
                self.backend.set_icons(window, icons);
            }
        }
        self.update_after_mode_change();
        Ok(())
    }

    /// Record whether exclusive fullscreen is wanted. Takes effect on the next
    /// `set_display_mode`.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.exclusive_desired = fullscreen;
    }

    pub fn set_vsync_enabled(&mut self, vsync: bool) {
        if self.vsync == Some(vsync) {
            return;
        }
        self.vsync = Some(vsync);
        if self.window.is_some() {
            self.backend.set_swap_interval(vsync);
        }
    }

    /// Set the legacy gamma exponent. Brightness and contrast are accepted
    /// and ignored.
    pub fn set_display_configuration(&mut self, gamma: f32, _brightness: f32, _contrast: f32) {
        if self.gamma.set_gamma(gamma) {
            self.update_gamma();
        }
    }

    // QUERIES

    #[must_use]
    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.display_mode
    }

    /// The realized window mode, once a display mode is known.
    #[must_use]
    pub fn window_mode(&self) -> Option<WindowMode> {
        self.window_mode
    }

    #[must_use]
    pub fn desktop_display_mode(&self) -> DisplayMode {
        self.planner.desktop()
    }

    pub fn available_display_modes(&mut self) -> DisplayResult<Vec<DisplayMode>> {
        self.backend
            .video_modes(self.monitor)
            .map_err(|e| DisplayError::ModeQuery(e.to_string()))
    }

    /// Whether the caller's own settings amount to exclusive fullscreen.
    ///
    /// This ignores the windowed-fullscreen preference, so it can differ from
    /// the realized [`DisplayController::window_mode`].
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.caller_window_mode() == Some(WindowMode::ExclusiveFullscreen)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.iconified
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    #[must_use]
    pub fn window(&self) -> Option<WindowHandle> {
        self.window
    }

    /// Height used to flip pointer coordinates to a bottom-left origin.
    #[must_use]
    pub fn display_height(&self) -> i32 {
        self.current_mode().height()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // STATE

    pub fn swap_buffers(&mut self) -> DisplayResult<()> {
        let window = self.window.ok_or(DisplayError::NotCreated)?;
        self.backend.swap_buffers(window)
    }

    /// Drain backend events, apply the window-level ones, and hand back the
    /// rest for the input devices.
    pub fn process_messages(&mut self) -> Vec<BackendEvent> {
        let events = self.backend.poll_events();
        let mut remaining = Vec::with_capacity(events.len());
        for event in events {
            match event {
                BackendEvent::Focus(focused) => self.set_focused(focused),
                BackendEvent::Iconify(iconified) => self.iconified = iconified,
                BackendEvent::CloseRequested => self.close_requested = true,
                other => remaining.push(other),
            }
        }
        remaining
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.update_floating();
        self.update_gamma();
    }

    fn update_after_mode_change(&mut self) {
        self.update_floating();
        self.update_gamma();
    }

    fn update_floating(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let floating = self.window_mode == Some(WindowMode::WindowedFullscreen) && self.focused;
        self.backend.set_floating(window, floating);
    }

    fn update_gamma(&mut self) {
        let exclusive = self.is_fullscreen();
        self.gamma.apply(&mut self.backend, exclusive, self.focused);
    }

    fn current_mode(&self) -> DisplayMode {
        self.display_mode.unwrap_or_else(|| self.planner.desktop())
    }

    fn caller_window_mode(&self) -> Option<WindowMode> {
        self.display_mode
            .map(|mode| self.planner.evaluate(self.exclusive_desired, &mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, MockCall};
    use crate::display::gamma::GammaRamp;

    const DESKTOP: DisplayMode = DisplayMode::native(1920, 1080, 24, 60);

    fn controller() -> DisplayController<MockBackend> {
        controller_with(Options::default())
    }

    fn controller_with(options: Options) -> DisplayController<MockBackend> {
        let backend = MockBackend::new().with_desktop_mode(DESKTOP);
        DisplayController::init(backend, &options).unwrap()
    }

    fn last_floating(display: &DisplayController<MockBackend>) -> Option<bool> {
        display.backend().calls().iter().rev().find_map(|call| match call {
            MockCall::SetFloating(floating) => Some(*floating),
            _ => None,
        })
    }

    fn last_gamma(display: &DisplayController<MockBackend>) -> Option<GammaRamp> {
        display.backend().calls().iter().rev().find_map(|call| match call {
            MockCall::SetGammaRamp(ramp) => Some(ramp.clone()),
            _ => None,
        })
    }

    #[test]
    fn test_init_fails_without_monitor() {
        let backend = MockBackend::new().failing_monitor_query();
        let result = DisplayController::init(backend, &Options::default());
        assert!(matches!(result, Err(DisplayError::MonitorQuery(_))));
    }

    #[test]
    fn test_create_defaults_to_desktop_mode() {
        let mut display = controller();
        display.create().unwrap();
        assert!(display.window_is_created());
        assert!(display.is_active());
        assert_eq!(display.window_mode(), Some(WindowMode::WindowedFullscreen));

        let plan = display.backend().created_plans()[0];
        assert_eq!((plan.width, plan.height), (1920, 1080));
        assert!(!plan.decorated);
    }

    #[test]
    fn test_create_applies_pending_settings_in_order() {
        let mut display = controller();
        display.set_title("Legacy");
        display.set_vsync_enabled(true);
        display.set_icons(vec![Icon::from_rgba(vec![0; 64]).unwrap()]);
        display.set_display_mode(DisplayMode::new(800, 600)).unwrap();
        display.create().unwrap();

        let calls = display.backend().calls();
        let index = |wanted: &MockCall| calls.iter().position(|c| c == wanted).unwrap();
        let created = calls
            .iter()
            .position(|c| matches!(c, MockCall::CreateWindow { .. }))
            .unwrap();
        assert!(created < index(&MockCall::SetIcons(1)));
        assert!(index(&MockCall::SetIcons(1)) < index(&MockCall::MakeContextCurrent));
        assert!(index(&MockCall::MakeContextCurrent) < index(&MockCall::SetSwapInterval(true)));
        assert!(index(&MockCall::SetSwapInterval(true)) < index(&MockCall::ShowWindow));
        assert!(matches!(
            &calls[created],
            MockCall::CreateWindow { title, .. } if title == "Legacy"
        ));
    }

    #[test]
    fn test_create_twice_is_noop() {
        let mut display = controller();
        display.create().unwrap();
        display.create().unwrap();
        assert_eq!(display.backend().created_plans().len(), 1);
    }

    #[test]
    fn test_create_failure_propagates() {
        let backend = MockBackend::new().failing_window_creation();
        let mut display = DisplayController::init(backend, &Options::default()).unwrap();
        assert!(matches!(display.create(), Err(DisplayError::WindowCreation(_))));
        assert!(!display.window_is_created());
    }

    #[test]
    fn test_is_created_swallows_next_destroy_once() {
        let mut display = controller();
        display.create().unwrap();
        assert!(display.is_created());

        display.destroy();
        assert!(display.window_is_created());

        display.destroy();
        assert!(!display.window_is_created());
    }

    #[test]
    fn test_context_failure_tears_down_window() {
        let backend = MockBackend::new().failing_context();
        let mut display = DisplayController::init(backend, &Options::default()).unwrap();
        assert!(matches!(display.create(), Err(DisplayError::WindowCreation(_))));
        assert!(!display.window_is_created());
        assert!(!display.is_active());
        assert_eq!(display.backend().count(&MockCall::DestroyWindow), 1);
        assert_eq!(display.backend().count(&MockCall::ShowWindow), 0);

        display.backend_mut().set_failing_context(false);
        display.create().unwrap();
        assert!(display.window_is_created());
        assert_eq!(display.backend().created_plans().len(), 2);
        assert_eq!(display.backend().count(&MockCall::ShowWindow), 1);
    }

    #[test]
    fn test_double_is_created_swallows_only_one_destroy() {
        let mut display = controller();
        display.create().unwrap();
        assert!(display.is_created());
        assert!(display.is_created());

        display.destroy();
        assert!(display.window_is_created());
        assert_eq!(display.backend().count(&MockCall::DestroyWindow), 0);

        display.destroy();
        assert!(!display.window_is_created());
        assert_eq!(display.backend().count(&MockCall::DestroyWindow), 1);
    }

    #[test]
    fn test_is_created_without_window_arms_nothing() {
        let mut display = controller();
        assert!(!display.is_created());
        display.create().unwrap();
        display.destroy();
        assert!(!display.window_is_created());
    }

    #[test]
    fn test_destroy_restores_gamma_and_releases() {
        let mut display = controller();
        display.set_fullscreen(true);
        display.set_display_mode(DESKTOP).unwrap();
        display.create().unwrap();
        display.set_display_configuration(2.0, 0.0, 1.0);
        let original = MockBackend::default_gamma_ramp();
        assert_ne!(last_gamma(&display), Some(original.clone()));

        display.destroy();
        assert_eq!(last_gamma(&display), Some(original));
        assert_eq!(display.backend().calls().last(), Some(&MockCall::Release));
    }

    #[test]
    fn test_set_display_mode_reconfigures_in_place() {
        let mut display = controller();
        display.set_display_mode(DisplayMode::new(800, 600)).unwrap();
        display.create().unwrap();

        display.set_display_mode(DESKTOP).unwrap();
        assert_eq!(display.window_mode(), Some(WindowMode::WindowedFullscreen));
        assert_eq!(display.backend().created_plans().len(), 1);
        let update = display.backend().updated_plans()[0];
        assert_eq!((update.x, update.y), (0, 0));
        assert!(!update.decorated);
        assert_eq!(last_floating(&display), Some(true));
    }

    #[test]
    fn test_unchanged_display_mode_does_nothing() {
        let mut display = controller();
        display.set_display_mode(DisplayMode::new(800, 600)).unwrap();
        display.create().unwrap();
        display.set_display_mode(DisplayMode::new(800, 600)).unwrap();
        assert!(display.backend().updated_plans().is_empty());
    }

    #[test]
    fn test_icons_reapplied_when_returning_to_windowed() {
        let mut display = controller();
        display.set_icons(vec![Icon::from_rgba(vec![0; 16]).unwrap()]);
        display.set_display_mode(DESKTOP).unwrap();
        display.create().unwrap();
        let before = display.backend().count(&MockCall::SetIcons(1));

        display.set_display_mode(DisplayMode::new(1024, 768)).unwrap();
        assert_eq!(display.window_mode(), Some(WindowMode::Windowed));
        assert_eq!(display.backend().count(&MockCall::SetIcons(1)), before + 1);
    }

    #[test]
    fn test_same_icons_ignored() {
        let mut display = controller();
        display.create().unwrap();
        let icons = vec![Icon::from_rgba(vec![0; 16]).unwrap()];
        display.set_icons(icons.clone());
        display.set_icons(icons);
        assert_eq!(display.backend().count(&MockCall::SetIcons(1)), 1);
    }

    #[test]
    fn test_fullscreen_intent_deferred_to_display_mode() {
        let mut display = controller();
        display.set_display_mode(DESKTOP).unwrap();
        display.create().unwrap();
        display.set_fullscreen(true);
        assert_eq!(display.window_mode(), Some(WindowMode::WindowedFullscreen));
        assert!(display.backend().updated_plans().is_empty());

        display.set_display_mode(DESKTOP).unwrap();
        assert_eq!(display.window_mode(), Some(WindowMode::ExclusiveFullscreen));
        let update = display.backend().updated_plans()[0];
        assert!(update.monitor.is_some());
        assert!(update.iconify);
    }

    #[test]
    fn test_preference_realizes_windowed_but_reports_fullscreen() {
        let options = Options {
            prefer_windowed_fullscreen: true,
            ..Options::default()
        };
        let mut display = controller_with(options);
        display.set_fullscreen(true);
        display.set_display_mode(DESKTOP).unwrap();
        display.create().unwrap();

        assert_eq!(display.window_mode(), Some(WindowMode::WindowedFullscreen));
        assert!(display.is_fullscreen());
        assert_eq!(display.backend().created_plans()[0].monitor, None);
    }

    #[test]
    fn test_gamma_follows_caller_view_and_focus() {
        let options = Options {
            prefer_windowed_fullscreen: true,
            ..Options::default()
        };
        let mut display = controller_with(options);
        display.set_fullscreen(true);
        display.set_display_mode(DESKTOP).unwrap();
        display.create().unwrap();
        display.set_display_configuration(0.5, 0.0, 1.0);
        let size = MockBackend::default_gamma_ramp().size();
        assert_eq!(last_gamma(&display), Some(GammaRamp::from_legacy_gamma(size, 0.5)));

        display.backend_mut().push_event(BackendEvent::Focus(false));
        display.process_messages();
        assert_eq!(last_gamma(&display), Some(MockBackend::default_gamma_ramp()));
        assert!(!display.is_active());
    }

    #[test]
    fn test_unchanged_gamma_is_noop() {
        let mut display = controller();
        display.set_fullscreen(true);
        display.set_display_mode(DESKTOP).unwrap();
        display.create().unwrap();
        display.set_display_configuration(1.5, 0.0, 1.0);
        let calls = display.backend().calls().len();
        display.set_display_configuration(1.5, 0.0, 1.0);
        assert_eq!(display.backend().calls().len(), calls);
    }

    #[test]
    fn test_focus_toggles_floating_in_windowed_fullscreen() {
        let mut display = controller();
        display.set_display_mode(DisplayMode::new(800, 600)).unwrap();
        display.create().unwrap();
        assert_eq!(last_floating(&display), Some(false));

        display.set_display_mode(DESKTOP).unwrap();
        assert_eq!(last_floating(&display), Some(true));

        display.backend_mut().push_event(BackendEvent::Focus(false));
        display.process_messages();
        assert_eq!(last_floating(&display), Some(false));

        display.backend_mut().push_event(BackendEvent::Focus(true));
        display.process_messages();
        assert_eq!(last_floating(&display), Some(true));
    }

    #[test]
    fn test_window_events_consumed_others_forwarded() {
        let mut display = controller();
        display.create().unwrap();
        let backend = display.backend_mut();
        backend.push_event(BackendEvent::Iconify(true));
        backend.push_event(BackendEvent::Char('a' as u32));
        backend.push_event(BackendEvent::CloseRequested);

        let rest = display.process_messages();
        assert_eq!(rest, vec![BackendEvent::Char('a' as u32)]);
        assert!(!display.is_visible());
        assert!(display.is_close_requested());
    }

    #[test]
    fn test_set_location_requires_window() {
        let mut display = controller();
        assert_eq!(display.set_location(10, 20), Err(DisplayError::NotCreated));
        display.create().unwrap();
        display.set_location(10, 20).unwrap();
        assert!(display
            .backend()
            .calls()
            .contains(&MockCall::SetPosition(10, 20)));
    }

    #[test]
    fn test_vsync_applied_once() {
        let mut display = controller();
        display.create().unwrap();
        display.set_vsync_enabled(false);
        display.set_vsync_enabled(false);
        assert_eq!(display.backend().count(&MockCall::SetSwapInterval(false)), 1);
    }

    #[test]
    fn test_available_modes_error_is_mode_query() {
        let backend = MockBackend::new().failing_mode_query();
        let mut display = DisplayController::init(backend, &Options::default()).unwrap();
        assert!(matches!(
            display.available_display_modes(),
            Err(DisplayError::ModeQuery(_))
        ));
    }

    #[test]
    fn test_available_modes_come_from_monitor() {
        let modes = vec![DisplayMode::native(640, 480, 16, 60), DESKTOP];
        let backend = MockBackend::new()
            .with_desktop_mode(DESKTOP)
            .with_video_modes(modes.clone());
        let mut display = DisplayController::init(backend, &Options::default()).unwrap();
        let available = display.available_display_modes().unwrap();
        assert_eq!(available, modes);
        assert!(available.iter().all(DisplayMode::supports_fullscreen));
    }

    #[test]
    fn test_repeated_mode_is_ignored() {
        let mut display = controller();
        display.set_display_mode(DESKTOP).unwrap();
        display.create().unwrap();
        display.backend_mut().clear_calls();
        display.set_display_mode(DisplayMode::new(1920, 1080)).unwrap();
        // Same size and realized mode, but bpp and rate differ.
        assert_eq!(display.backend().updated_plans().len(), 1);
        display.backend_mut().clear_calls();
        display.set_display_mode(DisplayMode::new(1920, 1080)).unwrap();
        assert!(display.backend().calls().is_empty());
    }

    #[test]
    fn test_display_height_tracks_mode() {
        let mut display = controller();
        assert_eq!(display.display_height(), 1080);
        display.set_display_mode(DisplayMode::new(640, 480)).unwrap();
        assert_eq!(display.display_height(), 480);
    }
}
