//! Per-round shot conditions, rolled before the swing

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::{int_inclusive, pick_weighted};
use super::wind::{FACTOR_DIVISOR_MPH, MAX_BASE_SPEED_MPH, WindDirection};

/// Chance the ball sits on the fairway
pub const FAIRWAY_PROBABILITY: f32 = 0.65;

/// Where the ball sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Lie {
    #[default]
    Fairway,
    Rough,
}

impl Lie {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lie::Fairway => "FAIRWAY",
            Lie::Rough => "ROUGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotSetup {
    pub lie: Lie,
    /// Whole-mph base wind speed in [0, 18]
    pub wind_speed_mph: f32,
    pub wind_direction: WindDirection,
    /// `wind_speed / 18`
    pub wind_factor: f32,
}

/// Roll lie and wind for a new round
pub fn create_shot_setup<R: Rng + ?Sized>(rng: &mut R) -> ShotSetup {
    let lies = [
        (Lie::Fairway, FAIRWAY_PROBABILITY),
        (Lie::Rough, 1.0 - FAIRWAY_PROBABILITY),
    ];
    let lie = pick_weighted(rng, &lies).copied().unwrap_or_default();

    let wind_speed_mph = int_inclusive(rng, 0, MAX_BASE_SPEED_MPH as i32) as f32;
    let dir_index = int_inclusive(rng, 0, WindDirection::ALL.len() as i32 - 1) as usize;
    let wind_direction = WindDirection::ALL[dir_index];

    ShotSetup {
        lie,
        wind_speed_mph,
        wind_direction,
        wind_factor: wind_speed_mph / FACTOR_DIVISOR_MPH,
    }
}
