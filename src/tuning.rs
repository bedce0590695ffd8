//! Data-driven game balance
//!
//! Every number here is a balance knob, not a structural constant. Missing
//! fields in a JSON override fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::settings::RiskMode;

/// Per-risk-mode balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeTuning {
    /// Exponential growth rate of the multiplier (per second)
    pub growth_rate: f32,
    /// Ceiling base before the swing quality factor is applied
    pub max_multiplier_base: f32,
    /// Stability accumulated per second of flight (before modifiers)
    pub stability_per_sec: f32,
    /// Multiplier sweet-spot centre at arm time
    pub sweet_spot_center: f32,
    /// Multiplier sweet-spot width at arm time
    pub sweet_spot_width: f32,
}

/// A target sub-range of one capture axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowTuning {
    pub center: f32,
    pub half_width: f32,
}

/// Oscillator speed for one capture axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorTuning {
    /// Base angular speed (radians per second)
    pub speed: f32,
    /// Extra speed per unit of fatigue (fraction of `speed`)
    pub fatigue_gain: f32,
    /// Amplitude of the slow speed wobble (0 = pure sine)
    pub jitter: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub calm: ModeTuning,
    pub aggressive: ModeTuning,

    /// Crash hazard scale K in `K * x^P`
    pub crash_k: f32,
    /// Crash hazard exponent P
    pub crash_power: f32,
    /// Upper bound on the crash hazard rate (per second)
    pub crash_rate_cap: f32,
    pub crash_wind_weight: f32,
    pub crash_fatigue_weight: f32,
    /// Crash hazard scales with `(stability_offset - stability)`
    pub crash_stability_offset: f32,

    /// Growth slowdown per unit of wind factor
    pub wind_slowdown: f32,
    /// Growth boost per unit of signed wind bias
    pub wind_signed_boost: f32,
    pub slowdown_min: f32,
    pub slowdown_max: f32,

    /// Match-score to growth scale mapping (`lerp(lo, hi, match)`)
    pub match_scale_lo: f32,
    pub match_scale_hi: f32,

    /// Max-multiplier factors: both windows hit, one hit, none
    pub quality_both: f32,
    pub quality_one: f32,
    pub quality_none: f32,

    /// Impact-quality distance scaling (`lerp(lo, hi, quality)`)
    pub impact_lo: f32,
    pub impact_hi: f32,

    pub tempo_window: WindowTuning,
    pub path_window: WindowTuning,
    pub attack_window: WindowTuning,
    pub tempo_osc: OscillatorTuning,
    pub path_osc: OscillatorTuning,
    pub attack_osc: OscillatorTuning,
    /// Attack angle oscillation range (degrees)
    pub attack_min_deg: f32,
    pub attack_max_deg: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            calm: ModeTuning {
                growth_rate: 0.56,
                max_multiplier_base: 6.5,
                stability_per_sec: 0.10,
                sweet_spot_center: 2.7,
                sweet_spot_width: 0.55,
            },
            aggressive: ModeTuning {
                growth_rate: 0.74,
                max_multiplier_base: 8.5,
                stability_per_sec: 0.16,
                sweet_spot_center: 3.05,
                sweet_spot_width: 0.40,
            },

            crash_k: 0.010,
            crash_power: 2.2,
            crash_rate_cap: 0.65,
            crash_wind_weight: 0.8,
            crash_fatigue_weight: 0.6,
            crash_stability_offset: 1.20,

            wind_slowdown: 0.22,
            wind_signed_boost: 0.06,
            slowdown_min: 0.68,
            slowdown_max: 1.03,

            match_scale_lo: 0.85,
            match_scale_hi: 1.10,

            quality_both: 1.12,
            quality_one: 1.04,
            quality_none: 1.00,

            impact_lo: 0.94,
            impact_hi: 1.08,

            tempo_window: WindowTuning { center: 0.70, half_width: 0.10 },
            path_window: WindowTuning { center: 0.50, half_width: 0.036 },
            attack_window: WindowTuning { center: 3.0, half_width: 1.0 },
            tempo_osc: OscillatorTuning {
                speed: std::f32::consts::TAU / 1.8,
                fatigue_gain: 0.25,
                jitter: 0.04,
            },
            path_osc: OscillatorTuning {
                speed: std::f32::consts::TAU / 2.4,
                fatigue_gain: 0.20,
                jitter: 0.0,
            },
            attack_osc: OscillatorTuning {
                speed: 1.4,
                fatigue_gain: 0.25,
                jitter: 0.0,
            },
            attack_min_deg: -5.0,
            attack_max_deg: 5.0,
        }
    }
}

impl Tuning {
    /// Balance for the given risk mode
    pub fn mode(&self, mode: RiskMode) -> &ModeTuning {
        match mode {
            RiskMode::Calm => &self.calm,
            RiskMode::Aggressive => &self.aggressive,
        }
    }

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
