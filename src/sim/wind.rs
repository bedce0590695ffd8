//! Wind model: constant base speed per round with randomly scheduled gusts
//!
//! A gust fires 2.5-5.5 s after the previous one ends, lasts 0.6-1.4 s and
//! pushes the speed by up to ±6 mph along a smoothstep envelope.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::unit;
use crate::{clamp01, smoothstep};

/// Base speed range for a round (mph)
pub const MAX_BASE_SPEED_MPH: f32 = 18.0;
/// Speed range including gusts (mph)
pub const MAX_GUST_SPEED_MPH: f32 = 22.0;
/// Speed that maps to a wind factor of 1.0
pub const FACTOR_DIVISOR_MPH: f32 = 18.0;

const GUST_DELAY_MIN_MS: f64 = 2500.0;
const GUST_DELAY_RANGE_MS: f64 = 3000.0;
const GUST_DURATION_MIN_MS: f64 = 600.0;
const GUST_DURATION_RANGE_MS: f64 = 800.0;
const GUST_DELTA_MPH: f32 = 6.0;

/// Compass direction the wind blows toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WindDirection {
    N,
    NE,
    #[default]
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WindDirection {
    pub const ALL: [WindDirection; 8] = [
        WindDirection::N,
        WindDirection::NE,
        WindDirection::E,
        WindDirection::SE,
        WindDirection::S,
        WindDirection::SW,
        WindDirection::W,
        WindDirection::NW,
    ];

    /// Down-range effect: positive helps the drive, negative hurts it
    pub fn signed_bias(&self) -> f32 {
        match self {
            WindDirection::E => 0.35,
            WindDirection::W => -0.35,
            WindDirection::NE | WindDirection::SE => 0.25,
            WindDirection::NW | WindDirection::SW => -0.25,
            WindDirection::N | WindDirection::S => 0.0,
        }
    }

    /// Compass bearing in degrees (N = 0, clockwise)
    pub fn degrees(&self) -> f32 {
        match self {
            WindDirection::N => 0.0,
            WindDirection::NE => 45.0,
            WindDirection::E => 90.0,
            WindDirection::SE => 135.0,
            WindDirection::S => 180.0,
            WindDirection::SW => 225.0,
            WindDirection::W => 270.0,
            WindDirection::NW => 315.0,
        }
    }

    /// Unit vector for the wind arrow (+x = E, +y = N)
    pub fn unit_vector(&self) -> Vec2 {
        let rad = self.degrees().to_radians();
        Vec2::new(rad.sin(), rad.cos())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::N => "N",
            WindDirection::NE => "NE",
            WindDirection::E => "E",
            WindDirection::SE => "SE",
            WindDirection::S => "S",
            WindDirection::SW => "SW",
            WindDirection::W => "W",
            WindDirection::NW => "NW",
        }
    }
}

/// Per-round wind state. Mutated by every `sample` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindState {
    /// Whole-mph base speed, fixed for the round
    pub base_speed_mph: f32,
    pub direction: WindDirection,
    pub gust_active: bool,
    pub gust_start_ms: f64,
    pub gust_end_ms: f64,
    /// Gust peak in [-1, 1], scaled by the gust delta
    pub gust_peak_signed: f32,
    pub next_gust_at_ms: f64,
}

/// One wind reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSample {
    pub speed_mph: f32,
    pub factor01: f32,
    pub signed_bias: f32,
    pub is_gust: bool,
    pub direction: WindDirection,
}

impl WindSample {
    /// A dead-calm reading
    pub fn calm() -> Self {
        Self {
            speed_mph: 0.0,
            factor01: 0.0,
            signed_bias: 0.0,
            is_gust: false,
            direction: WindDirection::default(),
        }
    }
}

fn gust_delay<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    GUST_DELAY_MIN_MS + unit(rng) as f64 * GUST_DELAY_RANGE_MS
}

/// Create the wind for a round; the first gust is scheduled from `now_ms`
pub fn init_wind<R: Rng + ?Sized>(
    base_speed_mph: f32,
    direction: WindDirection,
    now_ms: f64,
    rng: &mut R,
) -> WindState {
    let base = if base_speed_mph.is_finite() {
        base_speed_mph.round().clamp(0.0, MAX_BASE_SPEED_MPH)
    } else {
        0.0
    };
    WindState {
        base_speed_mph: base,
        direction,
        gust_active: false,
        gust_start_ms: 0.0,
        gust_end_ms: 0.0,
        gust_peak_signed: 0.0,
        next_gust_at_ms: now_ms + gust_delay(rng),
    }
}

impl WindState {
    /// Advance the gust scheduler to `now_ms` and read the wind.
    ///
    /// Sampling twice at the same instant yields the same reading.
    pub fn sample<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> WindSample {
        if !self.gust_active && now_ms >= self.next_gust_at_ms {
            self.gust_active = true;
            self.gust_start_ms = now_ms;
            self.gust_end_ms =
                now_ms + GUST_DURATION_MIN_MS + unit(rng) as f64 * GUST_DURATION_RANGE_MS;
            self.gust_peak_signed = -1.0 + unit(rng) * 2.0;
            log::debug!("Gust start (peak {:+.2})", self.gust_peak_signed);
        }

        if self.gust_active && now_ms > self.gust_end_ms {
            self.gust_active = false;
            self.gust_peak_signed = 0.0;
            self.next_gust_at_ms = now_ms + gust_delay(rng);
            log::debug!("Gust end");
        }

        self.reading(now_ms)
    }

    /// Read the wind at `now_ms` without advancing the scheduler
    pub fn reading(&self, now_ms: f64) -> WindSample {
        let gust_delta = if self.gust_active {
            let span = (self.gust_end_ms - self.gust_start_ms).max(1.0);
            let u = ((now_ms - self.gust_start_ms) / span) as f32;
            self.gust_peak_signed * smoothstep(u) * GUST_DELTA_MPH
        } else {
            0.0
        };

        let speed_mph = (self.base_speed_mph + gust_delta).clamp(0.0, MAX_GUST_SPEED_MPH);
        WindSample {
            speed_mph,
            factor01: clamp01(speed_mph / FACTOR_DIVISOR_MPH),
            signed_bias: self.direction.signed_bias(),
            is_gust: self.gust_active,
            direction: self.direction,
        }
    }
}
