//! Scripted backend that records every call.
//!
//! Events are queued with [`MockBackend::push_event`] and handed out by the
//! next `poll_events`. Every trait call is appended to a log that tests can
//! inspect.

use crate::backend::common::{
    Backend, BackendEvent, ControllerInfo, CursorHandle, CursorImage, CursorMode, DisplayError,
    DisplayResult, Icon, MonitorHandle, WindowHandle,
};
use crate::display::gamma::GammaRamp;
use crate::display::mode::DisplayMode;
use crate::display::planner::WindowGeometryPlan;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CreateWindow {
        title: String,
        plan: WindowGeometryPlan,
    },
    UpdateWindow(WindowGeometryPlan),
    DestroyWindow,
    SetFloating(bool),
    SetTitle(String),
    /// Number of icons passed.
    SetIcons(usize),
    SetPosition(i32, i32),
    MakeContextCurrent,
    SetSwapInterval(bool),
    ShowWindow,
    SwapBuffers,
    SetGammaRamp(GammaRamp),
    SetCursorPosition(f64, f64),
    CreateCursor(CursorHandle),
    DestroyCursor(CursorHandle),
    SetCursor(Option<CursorHandle>),
    SetCursorMode(CursorMode),
    Release,
}

pub struct MockBackend {
    desktop: DisplayMode,
    modes: Vec<DisplayMode>,
    gamma: Option<GammaRamp>,
    controllers: Vec<ControllerInfo>,
    events: Vec<BackendEvent>,
    calls: Vec<MockCall>,
    next_window: u32,
    next_cursor: u32,
    fail_monitor_query: bool,
    fail_mode_query: bool,
    fail_window_creation: bool,
    fail_context: bool,
    fail_cursor_creation: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        let desktop = DisplayMode::native(1920, 1080, 24, 60);
        Self {
            desktop,
            modes: vec![
                DisplayMode::native(800, 600, 24, 60),
                DisplayMode::native(1280, 720, 24, 60),
                desktop,
            ],
            gamma: Some(Self::default_gamma_ramp()),
            controllers: Vec::new(),
            events: Vec::new(),
            calls: Vec::new(),
            next_window: 1,
            next_cursor: 1,
            fail_monitor_query: false,
            fail_mode_query: false,
            fail_window_creation: false,
            fail_context: false,
            fail_cursor_creation: false,
        }
    }

    /// The linear 256-sample ramp the mock monitor starts with.
    pub fn default_gamma_ramp() -> GammaRamp {
        GammaRamp::from_legacy_gamma(256, 1.0)
    }

    pub fn with_desktop_mode(mut self, desktop: DisplayMode) -> Self {
        self.desktop = desktop;
        self
    }

    pub fn with_video_modes(mut self, modes: Vec<DisplayMode>) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_gamma_ramp(mut self, gamma: Option<GammaRamp>) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_controllers(mut self, controllers: Vec<ControllerInfo>) -> Self {
        self.controllers = controllers;
        self
    }

    pub fn failing_monitor_query(mut self) -> Self {
        self.fail_monitor_query = true;
        self
    }

    pub fn failing_mode_query(mut self) -> Self {
        self.fail_mode_query = true;
        self
    }

    pub fn failing_window_creation(mut self) -> Self {
        self.fail_window_creation = true;
        self
    }

    pub fn failing_context(mut self) -> Self {
        self.fail_context = true;
        self
    }

    /// Toggle context failures on an existing mock.
    pub fn set_failing_context(&mut self, failing: bool) {
        self.fail_context = failing;
    }

    pub fn failing_cursor_creation(mut self) -> Self {
        self.fail_cursor_creation = true;
        self
    }

    /// Queue an event for the next `poll_events`.
    pub fn push_event(&mut self, event: BackendEvent) {
        self.events.push(event);
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// How many times `call` was recorded.
    pub fn count(&self, call: &MockCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn created_plans(&self) -> Vec<WindowGeometryPlan> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MockCall::CreateWindow { plan, .. } => Some(*plan),
                _ => None,
            })
            .collect()
    }

    pub fn updated_plans(&self) -> Vec<WindowGeometryPlan> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MockCall::UpdateWindow(plan) => Some(*plan),
                _ => None,
            })
            .collect()
    }

    /// Cursor modes in the order they were set.
    pub fn cursor_modes(&self) -> Vec<CursorMode> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MockCall::SetCursorMode(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MockBackend {
    fn primary_monitor(&mut self) -> DisplayResult<MonitorHandle> {
        if self.fail_monitor_query {
            return Err(DisplayError::MonitorQuery("no monitor".to_string()));
        }
        Ok(MonitorHandle(0))
    }

    fn desktop_mode(&mut self, _monitor: MonitorHandle) -> DisplayResult<DisplayMode> {
        Ok(self.desktop)
    }

    fn video_modes(&mut self, _monitor: MonitorHandle) -> DisplayResult<Vec<DisplayMode>> {
        if self.fail_mode_query {
            return Err(DisplayError::ModeQuery("mode list unavailable".to_string()));
        }
        Ok(self.modes.clone())
    }

    fn gamma_ramp(&mut self, _monitor: MonitorHandle) -> Option<GammaRamp> {
        self.gamma.clone()
    }

    fn set_gamma_ramp(&mut self, _monitor: MonitorHandle, ramp: &GammaRamp) {
        self.calls.push(MockCall::SetGammaRamp(ramp.clone()));
    }

    fn create_window(
        &mut self,
        title: &str,
        plan: &WindowGeometryPlan,
    ) -> DisplayResult<WindowHandle> {
        if self.fail_window_creation {
            return Err(DisplayError::WindowCreation("mock refused".to_string()));
        }
        self.calls.push(MockCall::CreateWindow {
            title: title.to_string(),
            plan: *plan,
        });
        let handle = WindowHandle(self.next_window);
        self.next_window += 1;
        Ok(handle)
    }

    fn update_window(
        &mut self,
        _window: WindowHandle,
        plan: &WindowGeometryPlan,
    ) -> DisplayResult<()> {
        self.calls.push(MockCall::UpdateWindow(*plan));
        Ok(())
    }

    fn destroy_window(&mut self, _window: WindowHandle) {
        self.calls.push(MockCall::DestroyWindow);
    }

    fn set_floating(&mut self, _window: WindowHandle, floating: bool) {
        self.calls.push(MockCall::SetFloating(floating));
    }

    fn set_title(&mut self, _window: WindowHandle, title: &str) {
        self.calls.push(MockCall::SetTitle(title.to_string()));
    }

    fn set_icons(&mut self, _window: WindowHandle, icons: &[Icon]) {
        self.calls.push(MockCall::SetIcons(icons.len()));
    }

    fn set_position(&mut self, _window: WindowHandle, x: i32, y: i32) {
        self.calls.push(MockCall::SetPosition(x, y));
    }

    fn make_context_current(&mut self, _window: WindowHandle) -> DisplayResult<()> {
        if self.fail_context {
            return Err(DisplayError::WindowCreation("no GL context".to_string()));
        }
        self.calls.push(MockCall::MakeContextCurrent);
        Ok(())
    }

    fn set_swap_interval(&mut self, vsync: bool) {
        self.calls.push(MockCall::SetSwapInterval(vsync));
    }

    fn show_window(&mut self, _window: WindowHandle) {
        self.calls.push(MockCall::ShowWindow);
    }

    fn swap_buffers(&mut self, _window: WindowHandle) -> DisplayResult<()> {
        self.calls.push(MockCall::SwapBuffers);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        self.events.drain(..).collect()
    }

    fn set_cursor_position(&mut self, _window: WindowHandle, x: f64, y: f64) {
        self.calls.push(MockCall::SetCursorPosition(x, y));
    }

    fn create_cursor(&mut self, image: &CursorImage) -> DisplayResult<CursorHandle> {
        if self.fail_cursor_creation {
            return Err(DisplayError::CursorCreation(format!(
                "mock refused {}x{} cursor",
                image.width, image.height
            )));
        }
        let handle = CursorHandle(self.next_cursor);
        self.next_cursor += 1;
        self.calls.push(MockCall::CreateCursor(handle));
        Ok(handle)
    }

    fn destroy_cursor(&mut self, cursor: CursorHandle) {
        self.calls.push(MockCall::DestroyCursor(cursor));
    }

    fn set_cursor(&mut self, _window: WindowHandle, cursor: Option<CursorHandle>) {
        self.calls.push(MockCall::SetCursor(cursor));
    }

    fn set_cursor_mode(&mut self, _window: WindowHandle, mode: CursorMode) {
        self.calls.push(MockCall::SetCursorMode(mode));
    }

    fn controllers(&mut self) -> Vec<ControllerInfo> {
        self.controllers.clone()
    }

    fn release(&mut self) {
        self.calls.push(MockCall::Release);
    }
}
