//! Gamma ramp capture, restore, and legacy gamma conversion.
//!
//! The monitor's ramp is captured once at startup, before anything touches it,
//! and becomes the restore target whenever gamma correction must be off. If
//! the capture fails, gamma correction is a no-op for the life of the process.

use crate::backend::{Backend, MonitorHandle};

/// Largest sample value of a gamma channel.
const RAMP_MAX: f32 = 0xFFFF as f32;

/// Per-channel lookup table from linear intensity to output level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaRamp {
    red: Vec<u16>,
    green: Vec<u16>,
    blue: Vec<u16>,
}

impl GammaRamp {
    /// Build a ramp from three channels. Returns `None` if their lengths
    /// differ.
    #[must_use]
    pub fn new(red: Vec<u16>, green: Vec<u16>, blue: Vec<u16>) -> Option<Self> {
        if red.len() != green.len() || red.len() != blue.len() {
            return None;
        }
        Some(Self { red, green, blue })
    }

    /// A ramp of `size` samples realizing a legacy gamma value.
    ///
    /// Legacy gamma is the exponent applied to linear intensity, so values
    /// above 1.0 darken. Each sample is scaled to the full 16-bit range,
    /// rounded half up, and clamped at both ends. All channels are equal.
    #[must_use]
    pub fn from_legacy_gamma(size: usize, gamma: f32) -> Self {
        let last = size as f32 - 1.0;
        let values: Vec<u16> = (0..size)
            .map(|i| {
                let intensity = i as f32 / last;
                // The power is taken in double precision, then narrowed.
                let curve = f64::from(intensity).powf(f64::from(gamma)) as f32;
                let mut value = curve * RAMP_MAX + 0.5;
                if value > RAMP_MAX {
                    value = RAMP_MAX;
                } else if value < 0.0 {
                    value = 0.0;
                }
                value as u16
            })
            .collect();
        Self {
            red: values.clone(),
            green: values.clone(),
            blue: values,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.red.len()
    }

    #[must_use]
    pub fn red(&self) -> &[u16] {
        &self.red
    }

    #[must_use]
    pub fn green(&self) -> &[u16] {
        &self.green
    }

    #[must_use]
    pub fn blue(&self) -> &[u16] {
        &self.blue
    }
}

/// Owns the startup snapshot and the caller's gamma value.
#[derive(Debug)]
pub struct GammaState {
    monitor: MonitorHandle,
    original: Option<GammaRamp>,
    gamma: Option<f32>,
}

impl GammaState {
    /// Capture the monitor's current ramp. Must run before anything else
    /// changes it.
    pub fn capture<B: Backend>(backend: &mut B, monitor: MonitorHandle) -> Self {
        let original = backend.gamma_ramp(monitor);
        match &original {
            Some(ramp) => log::debug!("Captured gamma ramp with {} samples", ramp.size()),
            None => log::warn!("Gamma ramp unavailable; gamma correction disabled"),
        }
        Self {
            monitor,
            original,
            gamma: None,
        }
    }

    /// Whether gamma correction can have any effect.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.original.is_some()
    }

    #[must_use]
    pub fn original(&self) -> Option<&GammaRamp> {
        self.original.as_ref()
    }

    #[must_use]
    pub fn gamma(&self) -> Option<f32> {
        self.gamma
    }

    /// Store a new gamma value. Returns `false` if it equals the current one.
    pub fn set_gamma(&mut self, gamma: f32) -> bool {
        if self.gamma == Some(gamma) {
            return false;
        }
        self.gamma = Some(gamma);
        true
    }

    /// Push the ramp matching the current state to the monitor.
    ///
    /// The caller's gamma is shown only while the window is focused and the
    /// caller believes it is in exclusive fullscreen; otherwise the original
    /// ramp is restored.
    pub fn apply<B: Backend>(&self, backend: &mut B, caller_sees_exclusive: bool, focused: bool) {
        let (Some(original), Some(gamma)) = (&self.original, self.gamma) else {
            return;
        };
        if focused && caller_sees_exclusive {
            let ramp = GammaRamp::from_legacy_gamma(original.size(), gamma);
            backend.set_gamma_ramp(self.monitor, &ramp);
        } else {
            backend.set_gamma_ramp(self.monitor, original);
        }
    }

    /// Put the original ramp back, whatever the current state.
    pub fn restore<B: Backend>(&self, backend: &mut B) {
        if let Some(original) = &self.original {
            backend.set_gamma_ramp(self.monitor, original);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, MockCall};

    fn linear_ramp(size: usize) -> GammaRamp {
        let values: Vec<u16> = (0..size)
            .map(|i| ((i as f32 / (size - 1) as f32) * 65535.0 + 0.5) as u16)
            .collect();
        GammaRamp::new(values.clone(), values.clone(), values).unwrap()
    }

    fn last_ramp(backend: &MockBackend) -> Option<GammaRamp> {
        backend.calls().iter().rev().find_map(|call| match call {
            MockCall::SetGammaRamp(ramp) => Some(ramp.clone()),
            _ => None,
        })
    }

    #[test]
    fn test_mismatched_channels_rejected() {
        assert!(GammaRamp::new(vec![0; 4], vec![0; 4], vec![0; 3]).is_none());
    }

    #[test]
    fn test_unit_gamma_is_linear() {
        let ramp = GammaRamp::from_legacy_gamma(256, 1.0);
        assert_eq!(ramp, linear_ramp(256));
        assert_eq!(ramp.red()[0], 0);
        assert_eq!(ramp.red()[255], 0xFFFF);
    }

    /// Single-precision intensity, double-precision power, single-precision
    /// scaling, as legacy callers computed it.
    fn legacy_sample(i: usize, size: usize, gamma: f32) -> u16 {
        let intensity = i as f32 / (size - 1) as f32;
        let curve = f64::from(intensity).powf(f64::from(gamma)) as f32;
        (curve * 65535.0 + 0.5).clamp(0.0, 65535.0) as u16
    }

    #[test]
    fn test_curve_matches_double_precision_power() {
        for size in [256, 1024, 2048] {
            for step in 5..=500 {
                let gamma = step as f32 / 100.0;
                let ramp = GammaRamp::from_legacy_gamma(size, gamma);
                for (i, &sample) in ramp.red().iter().enumerate() {
                    assert_eq!(
                        sample,
                        legacy_sample(i, size, gamma),
                        "size {size}, gamma {gamma}, sample {i}"
                    );
                }
            }
        }
        // Single-precision pow rounds this sample down to 36669.
        assert_eq!(GammaRamp::from_legacy_gamma(2048, 0.769_999_56).red()[963], 36670);
    }

    #[test]
    fn test_gamma_exponent_and_rounding() {
        let ramp = GammaRamp::from_legacy_gamma(3, 2.0);
        // 0.5^2 * 65535 + 0.5 = 16384.25
        assert_eq!(ramp.red(), &[0, 16384, 65535]);
        assert_eq!(ramp.green(), ramp.red());
        assert_eq!(ramp.blue(), ramp.red());
    }

    #[test]
    fn test_gamma_rounds_half_up() {
        // 0.5^1 * 65535 = 32767.5, plus 0.5 is exactly 32768
        let ramp = GammaRamp::from_legacy_gamma(3, 1.0);
        assert_eq!(ramp.red()[1], 32768);
    }

    #[test]
    fn test_gamma_clamps_top() {
        let ramp = GammaRamp::from_legacy_gamma(2, 0.5);
        assert_eq!(ramp.red(), &[0, 0xFFFF]);
    }

    #[test]
    fn test_single_sample_ramp_reads_zero() {
        // 0/0 is NaN, and NaN converts to 0
        assert_eq!(GammaRamp::from_legacy_gamma(1, 1.0).red(), &[0]);
        assert_eq!(GammaRamp::from_legacy_gamma(0, 1.0).size(), 0);
    }

    #[test]
    fn test_capture_then_restore_is_bit_exact() {
        let original = GammaRamp::new(vec![1, 700, 65000], vec![2, 800, 64000], vec![3, 900, 63000])
            .unwrap();
        let mut backend = MockBackend::new().with_gamma_ramp(Some(original.clone()));
        let state = GammaState::capture(&mut backend, MonitorHandle(0));
        state.restore(&mut backend);
        assert_eq!(last_ramp(&backend), Some(original));
    }

    #[test]
    fn test_apply_without_gamma_is_noop() {
        let mut backend = MockBackend::new();
        let state = GammaState::capture(&mut backend, MonitorHandle(0));
        state.apply(&mut backend, true, true);
        assert_eq!(last_ramp(&backend), None);
    }

    #[test]
    fn test_apply_without_snapshot_is_noop() {
        let mut backend = MockBackend::new().with_gamma_ramp(None);
        let mut state = GammaState::capture(&mut backend, MonitorHandle(0));
        assert!(!state.is_supported());
        state.set_gamma(2.0);
        state.apply(&mut backend, true, true);
        state.restore(&mut backend);
        assert_eq!(last_ramp(&backend), None);
    }

    #[test]
    fn test_apply_selects_regime() {
        let mut backend = MockBackend::new();
        let mut state = GammaState::capture(&mut backend, MonitorHandle(0));
        let original = state.original().cloned().unwrap();
        assert!(state.set_gamma(2.0));
        assert!(!state.set_gamma(2.0));

        state.apply(&mut backend, true, true);
        assert_eq!(
            last_ramp(&backend),
            Some(GammaRamp::from_legacy_gamma(original.size(), 2.0))
        );

        state.apply(&mut backend, true, false);
        assert_eq!(last_ramp(&backend), Some(original.clone()));

        state.apply(&mut backend, true, true);
        state.apply(&mut backend, false, true);
        assert_eq!(last_ramp(&backend), Some(original));
    }
}
