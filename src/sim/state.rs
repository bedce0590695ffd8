//! Round data model
//!
//! One `RoundState` per session, reused across rounds. It owns the round's
//! wind and swing capture; player mental state and profile live outside it.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::capture::{CaptureReadout, SwingCapture, SwingQuality};
use super::landing::Landing;
use super::setup::ShotSetup;
use super::wind::{WindSample, WindState};
use crate::settings::RiskMode;
use crate::tuning::{ModeTuning, Tuning};

/// Round phase. Moves forward only; `reset` is the one way back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round
    #[default]
    Idle,
    /// Hold in progress, oscillators running
    Arming,
    /// Swing released, flight starts on the next tick
    Swing,
    /// Multiplier growing, crash risk active
    Flight,
    /// Outcome recorded
    End,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "IDLE",
            RoundPhase::Arming => "ARMING",
            RoundPhase::Swing => "SWING",
            RoundPhase::Flight => "FLIGHT",
            RoundPhase::End => "END",
        }
    }

    /// A new hold may start from here
    pub fn accepts_hold(&self) -> bool {
        matches!(self, RoundPhase::Idle | RoundPhase::End)
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Landed, cashed out or auto cashed out
    Stopped,
    Crashed,
}

impl RoundOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundOutcome::Stopped => "STOP",
            RoundOutcome::Crashed => "CRASH",
        }
    }
}

/// Multiplier window that counts as a perfect finish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweetSpot {
    pub center: f32,
    pub width: f32,
    /// Width at arm time; the live width never exceeds it
    pub base_width: f32,
}

/// Minimum sweet-spot width
pub const SWEET_SPOT_MIN_WIDTH: f32 = 0.18;
/// Multiplier range the sweet spot must stay inside
pub const SWEET_SPOT_RANGE: (f32, f32) = (1.0, 5.0);
const SWEET_SPOT_DRIFT: f32 = 0.15;

impl SweetSpot {
    pub fn for_mode(mode: &ModeTuning) -> Self {
        let base_width = mode.sweet_spot_width.max(SWEET_SPOT_MIN_WIDTH);
        let mut spot = Self {
            center: mode.sweet_spot_center,
            width: base_width,
            base_width,
        };
        spot.keep_in_range();
        spot
    }

    pub fn min_x(&self) -> f32 {
        self.center - self.width / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.center + self.width / 2.0
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Narrow with stability, wind and fatigue; drift with the signed wind
    pub fn update(&mut self, dt: f32, stability01: f32, wind_factor: f32, wind_signed: f32, fatigue01: f32) {
        let shrink = (1.0 - 0.45 * stability01) * (1.0 - 0.25 * wind_factor) * (1.0 - 0.25 * fatigue01);
        self.width = (self.base_width * shrink).clamp(SWEET_SPOT_MIN_WIDTH, self.base_width);
        self.center += dt * wind_signed * wind_factor * SWEET_SPOT_DRIFT;
        self.keep_in_range();
    }

    fn keep_in_range(&mut self) {
        let half = self.width / 2.0;
        let (lo, hi) = SWEET_SPOT_RANGE;
        self.center = self.center.clamp(lo + half, (hi - half).max(lo + half));
    }
}

/// Final distance compared with the player's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCall {
    OnLine,
    Short(u32),
    Long(u32),
}

/// Yards either side of the target that still count as on line
pub const ON_LINE_TOLERANCE_YD: i64 = 5;

impl TargetCall {
    pub fn evaluate(distance_yards: u32, target_yards: u32) -> Self {
        let delta = distance_yards as i64 - target_yards as i64;
        if delta.abs() <= ON_LINE_TOLERANCE_YD {
            TargetCall::OnLine
        } else if delta < 0 {
            TargetCall::Short(delta.unsigned_abs() as u32)
        } else {
            TargetCall::Long(delta as u32)
        }
    }
}

impl fmt::Display for TargetCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetCall::OnLine => f.write_str("ON LINE"),
            TargetCall::Short(yd) => write!(f, "SHORT {yd} yd"),
            TargetCall::Long(yd) => write!(f, "LONG {yd} yd"),
        }
    }
}

/// Outcome payload emitted once per round at END
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub crashed: bool,
    pub final_distance_yards: u32,
    pub multiplier_at_end: f32,
    pub max_multiplier: f32,
    pub landing_target: f32,
    pub power01: f32,
    pub quality: SwingQuality,
    /// End multiplier inside the final sweet spot (never for a crash)
    pub perfect: bool,
    pub sweet_spot: SweetSpot,
    pub target: TargetCall,
    pub setup: ShotSetup,
    pub elapsed_ms: f64,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub phase: RoundPhase,
    pub risk_mode: RiskMode,
    pub current_multiplier: f32,
    pub max_multiplier: f32,
    pub distance_yards: u32,
    pub elapsed_ms: f64,
    pub wind: WindSample,
    /// Unit vector the wind blows toward (+x east, +y north)
    pub wind_arrow: Vec2,
    pub capture: CaptureReadout,
    pub quality: Option<SwingQuality>,
    pub stability: f32,
    pub sweet_spot: SweetSpot,
    pub outcome: Option<RoundOutcome>,
}

/// The single active round
#[derive(Debug, Clone)]
pub struct RoundState {
    pub phase: RoundPhase,
    /// Mode locked in when the hold began
    pub risk_mode: RiskMode,
    pub current_multiplier: f32,
    pub max_multiplier: f32,
    pub landing_target: f32,
    pub start_ms: f64,
    pub elapsed_ms: f64,
    pub distance_yards: u32,
    pub setup: Option<ShotSetup>,
    pub wind: Option<WindState>,
    pub last_wind: WindSample,
    pub capture: SwingCapture,
    pub quality: Option<SwingQuality>,
    /// Growth scale derived from the match score
    pub match_scale: f32,
    pub power01: f32,
    /// Fatigue after the attempt, fixed for the flight
    pub fatigue01: f32,
    pub landing: Option<Landing>,
    pub stability: f32,
    pub sweet_spot: SweetSpot,
    pub outcome: Option<RoundOutcome>,
    pub report: Option<RoundReport>,
}

impl RoundState {
    pub fn new(tuning: &Tuning, risk_mode: RiskMode) -> Self {
        Self {
            phase: RoundPhase::Idle,
            risk_mode,
            current_multiplier: 1.0,
            max_multiplier: tuning.mode(risk_mode).max_multiplier_base,
            landing_target: 1.0,
            start_ms: 0.0,
            elapsed_ms: 0.0,
            distance_yards: 0,
            setup: None,
            wind: None,
            last_wind: WindSample::calm(),
            capture: SwingCapture::new(tuning),
            quality: None,
            match_scale: 1.0,
            power01: 0.0,
            fatigue01: 0.0,
            landing: None,
            stability: 0.0,
            sweet_spot: SweetSpot::for_mode(tuning.mode(risk_mode)),
            outcome: None,
            report: None,
        }
    }

    /// Round in progress (hold, swing or flight)
    pub fn is_active(&self) -> bool {
        matches!(self.phase, RoundPhase::Arming | RoundPhase::Swing | RoundPhase::Flight)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase,
            risk_mode: self.risk_mode,
            current_multiplier: self.current_multiplier,
            max_multiplier: self.max_multiplier,
            distance_yards: self.distance_yards,
            elapsed_ms: self.elapsed_ms,
            wind: self.last_wind,
            wind_arrow: self.last_wind.direction.unit_vector(),
            capture: self.capture.readout(),
            quality: self.quality,
            stability: self.stability,
            sweet_spot: self.sweet_spot,
            outcome: self.outcome,
        }
    }
}
