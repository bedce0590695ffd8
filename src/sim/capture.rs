//! Swing capture: tempo, path and attack-angle oscillators
//!
//! Each axis is an `OscillatingCapture` that runs Idle -> Hold -> Locked.
//! While held, its value follows a sine sweep across the axis range; release
//! freezes the current value until an explicit reset.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::clamp01;
use crate::tuning::{OscillatorTuning, Tuning, WindowTuning};

/// Falloff sharpness outside a sweet window
pub const WINDOW_FALLOFF_K: f32 = 6.0;

pub const TEMPO_WEIGHT: f32 = 0.45;
pub const PATH_WEIGHT: f32 = 0.35;
pub const ATTACK_WEIGHT: f32 = 0.20;

/// Attack angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Degrees(pub f32);

impl From<Degrees> for f32 {
    fn from(d: Degrees) -> f32 {
        d.0
    }
}

/// Target sub-range of an axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweetWindow {
    pub center: f32,
    pub half_width: f32,
}

impl From<WindowTuning> for SweetWindow {
    fn from(w: WindowTuning) -> Self {
        Self {
            center: w.center,
            half_width: w.half_width.abs().max(f32::EPSILON),
        }
    }
}

impl SweetWindow {
    pub fn contains(&self, value: f32) -> bool {
        (value - self.center).abs() <= self.half_width
    }

    /// 1.0 inside the window, `exp(-K (d - 1)^2)` outside, where `d` is the
    /// distance from the centre in half-widths
    pub fn score(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return 0.0;
        }
        let d = (value - self.center).abs() / self.half_width;
        if d <= 1.0 {
            1.0
        } else {
            clamp01((-WINDOW_FALLOFF_K * (d - 1.0).powi(2)).exp())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureState<T> {
    Idle,
    Hold {
        started_ms: f64,
        /// Integrated oscillator phase (radians)
        phase: f32,
        value: T,
    },
    Locked(T),
}

/// One oscillating input axis
#[derive(Debug, Clone)]
pub struct OscillatingCapture<T> {
    state: CaptureState<T>,
    osc: OscillatorTuning,
    window: SweetWindow,
    /// Axis range swept by the sine
    lo: f32,
    hi: f32,
    /// Wraps a raw axis value into `T`
    make: fn(f32) -> T,
    speed_factor: f32,
}

impl<T: Copy + Into<f32>> OscillatingCapture<T> {
    pub fn new(lo: f32, hi: f32, make: fn(f32) -> T, osc: OscillatorTuning, window: SweetWindow) -> Self {
        Self {
            state: CaptureState::Idle,
            osc,
            window,
            lo,
            hi,
            make,
            speed_factor: 1.0,
        }
    }

    fn value_at(&self, phase: f32) -> T {
        // Start each hold at the low end of the range
        let pos = 0.5 + 0.5 * (phase - FRAC_PI_2).sin();
        (self.make)(self.lo + (self.hi - self.lo) * pos)
    }

    /// Start oscillating. Rejected unless idle.
    pub fn begin_hold(&mut self, now_ms: f64, fatigue01: f32) -> bool {
        if !matches!(self.state, CaptureState::Idle) {
            return false;
        }
        self.speed_factor = 1.0 + self.osc.fatigue_gain * clamp01(fatigue01);
        self.state = CaptureState::Hold {
            started_ms: now_ms,
            phase: 0.0,
            value: self.value_at(0.0),
        };
        true
    }

    /// Advance the sweep; returns the live value while held
    pub fn update(&mut self, now_ms: f64, dt: f32) -> Option<T> {
        let CaptureState::Hold { started_ms, phase, .. } = self.state else {
            return None;
        };
        let elapsed = ((now_ms - started_ms) / 1000.0).max(0.0) as f32;
        let wobble = 1.0 + self.osc.jitter * (elapsed * 0.9).sin();
        let phase = phase + dt.max(0.0) * self.osc.speed * self.speed_factor * wobble;
        let value = self.value_at(phase);
        self.state = CaptureState::Hold { started_ms, phase, value };
        Some(value)
    }

    /// Freeze the current value. Idempotent once locked; `None` when idle.
    pub fn lock(&mut self) -> Option<T> {
        match self.state {
            CaptureState::Idle => None,
            CaptureState::Hold { value, .. } => {
                self.state = CaptureState::Locked(value);
                Some(value)
            }
            CaptureState::Locked(value) => Some(value),
        }
    }

    pub fn reset(&mut self) {
        self.state = CaptureState::Idle;
        self.speed_factor = 1.0;
    }

    pub fn state(&self) -> CaptureState<T> {
        self.state
    }

    /// Live value while held, frozen value once locked
    pub fn value(&self) -> Option<T> {
        match self.state {
            CaptureState::Idle => None,
            CaptureState::Hold { value, .. } | CaptureState::Locked(value) => Some(value),
        }
    }

    pub fn locked_value(&self) -> Option<T> {
        match self.state {
            CaptureState::Locked(value) => Some(value),
            _ => None,
        }
    }

    pub fn window(&self) -> SweetWindow {
        self.window
    }

    /// Score of the locked value
    pub fn score(&self) -> Option<f32> {
        self.locked_value().map(|v| self.window.score(v.into()))
    }

    pub fn hit(&self) -> bool {
        self.locked_value()
            .is_some_and(|v| self.window.contains(v.into()))
    }
}

/// Scores of a locked swing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingQuality {
    pub tempo_pos01: f32,
    pub path_pos01: f32,
    pub attack_angle_deg: f32,
    pub tempo_score: f32,
    pub path_score: f32,
    pub attack_score: f32,
    pub tempo_hit: bool,
    pub path_hit: bool,
    pub attack_hit: bool,
    /// Weighted composite in [0, 1]
    pub composite: f32,
    /// 1.0 tempo and path both hit, 0.6 one of them, 0.2 neither
    pub match_score: f32,
}

impl SwingQuality {
    pub fn windows_hit(&self) -> u8 {
        self.tempo_hit as u8 + self.path_hit as u8
    }
}

/// Weighted composite of the three axis scores
pub fn composite_score(tempo: f32, path: f32, attack: f32) -> f32 {
    clamp01(TEMPO_WEIGHT * clamp01(tempo) + PATH_WEIGHT * clamp01(path) + ATTACK_WEIGHT * clamp01(attack))
}

/// Growth-matching score from the two timing windows
pub fn match_score(tempo_hit: bool, path_hit: bool) -> f32 {
    match (tempo_hit, path_hit) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.6,
        (false, false) => 0.2,
    }
}

/// Live values of the three axes (for rendering)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaptureReadout {
    pub tempo_pos01: Option<f32>,
    pub path_pos01: Option<f32>,
    pub attack_angle_deg: Option<f32>,
    pub locked: bool,
}

/// The three swing inputs sampled together
#[derive(Debug, Clone)]
pub struct SwingCapture {
    pub tempo: OscillatingCapture<f32>,
    pub path: OscillatingCapture<f32>,
    pub attack: OscillatingCapture<Degrees>,
}

fn identity(v: f32) -> f32 {
    v
}

impl SwingCapture {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tempo: OscillatingCapture::new(0.0, 1.0, identity, tuning.tempo_osc, tuning.tempo_window.into()),
            path: OscillatingCapture::new(0.0, 1.0, identity, tuning.path_osc, tuning.path_window.into()),
            attack: OscillatingCapture::new(
                tuning.attack_min_deg,
                tuning.attack_max_deg,
                Degrees,
                tuning.attack_osc,
                tuning.attack_window.into(),
            ),
        }
    }

    /// Start all three oscillators; fatigue speeds them up
    pub fn begin_hold(&mut self, now_ms: f64, fatigue01: f32) -> bool {
        if self.tempo.value().is_some() || self.path.value().is_some() || self.attack.value().is_some() {
            return false;
        }
        self.tempo.begin_hold(now_ms, fatigue01);
        self.path.begin_hold(now_ms, fatigue01);
        self.attack.begin_hold(now_ms, fatigue01);
        true
    }

    pub fn update(&mut self, now_ms: f64, dt: f32) {
        self.tempo.update(now_ms, dt);
        self.path.update(now_ms, dt);
        self.attack.update(now_ms, dt);
    }

    /// Lock all axes and score the swing; `None` unless all were held
    pub fn lock(&mut self) -> Option<SwingQuality> {
        let tempo = self.tempo.lock()?;
        let path = self.path.lock()?;
        let attack = self.attack.lock()?;

        let tempo_score = self.tempo.window().score(tempo);
        let path_score = self.path.window().score(path);
        let attack_score = self.attack.window().score(attack.0);
        let tempo_hit = self.tempo.hit();
        let path_hit = self.path.hit();

        Some(SwingQuality {
            tempo_pos01: tempo,
            path_pos01: path,
            attack_angle_deg: attack.0,
            tempo_score,
            path_score,
            attack_score,
            tempo_hit,
            path_hit,
            attack_hit: self.attack.hit(),
            composite: composite_score(tempo_score, path_score, attack_score),
            match_score: match_score(tempo_hit, path_hit),
        })
    }

    pub fn reset(&mut self) {
        self.tempo.reset();
        self.path.reset();
        self.attack.reset();
    }

    pub fn readout(&self) -> CaptureReadout {
        CaptureReadout {
            tempo_pos01: self.tempo.value(),
            path_pos01: self.path.value(),
            attack_angle_deg: self.attack.value().map(f32::from),
            locked: self.tempo.locked_value().is_some(),
        }
    }
}
