//! Player mental state: fatigue and pressure
//!
//! Both rise with hard swings, fall a little after each round and decay
//! with real elapsed time between sessions. All transitions are pure; the
//! session persists the result after every mutation.

use serde::{Deserialize, Serialize};

use crate::clamp01;
use crate::persistence::{self, Storage};

const FATIGUE_DECAY_PER_SEC: f32 = 0.015;
const PRESSURE_DECAY_PER_SEC: f32 = 0.010;

/// Power at or above which a swing counts toward the max-power streak
pub const MAX_POWER: f32 = 0.92;
/// Power at or above which a swing is heavy on the body
pub const HEAVY_POWER: f32 = 0.85;

const FATIGUE_BASE: f32 = 0.03;
const FATIGUE_HEAVY: f32 = 0.10;
const FATIGUE_NORMAL: f32 = 0.02;
const FATIGUE_PER_POWER: f32 = 0.04;

const PRESSURE_MAX_POWER: f32 = 0.10;
const PRESSURE_NORMAL: f32 = 0.02;
const PRESSURE_STREAK_CAP: f32 = 0.18;
const PRESSURE_STREAK_SCALE: f32 = 0.04;

const RECOVERY_FATIGUE: f32 = 0.08;
const RECOVERY_PRESSURE: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerMental {
    pub fatigue: f32,
    pub pressure: f32,
    pub max_power_streak: u32,
    /// Wall-clock ms of the last mutation
    pub last_update_ms: f64,
}

impl PlayerMental {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "long_drive_mental";

    /// A rested player
    pub fn fresh(now_ms: f64) -> Self {
        Self {
            fatigue: 0.0,
            pressure: 0.0,
            max_power_streak: 0,
            last_update_ms: if now_ms.is_finite() { now_ms } else { 0.0 },
        }
    }

    /// Apply wall-clock recovery up to `now_ms`. A non-finite `now_ms`
    /// leaves the state as it was.
    pub fn decayed(&self, now_ms: f64) -> Self {
        if !now_ms.is_finite() {
            log::warn!("Ignoring non-finite mental timestamp {now_ms}");
            return *self;
        }
        let last = if self.last_update_ms.is_finite() {
            self.last_update_ms
        } else {
            now_ms
        };
        let dt_sec = ((now_ms - last) / 1000.0).max(0.0) as f32;
        Self {
            fatigue: clamp01(self.fatigue - dt_sec * FATIGUE_DECAY_PER_SEC),
            pressure: clamp01(self.pressure - dt_sec * PRESSURE_DECAY_PER_SEC),
            max_power_streak: self.max_power_streak,
            last_update_ms: now_ms,
        }
    }

    /// Account for a swing released at `power01`
    pub fn after_attempt(&self, power01: f32, now_ms: f64) -> Self {
        let power = clamp01(power01);
        let mut next = self.decayed(now_ms);
        let is_max = power >= MAX_POWER;
        let is_heavy = power >= HEAVY_POWER;

        next.max_power_streak = if is_max {
            next.max_power_streak.saturating_add(1)
        } else {
            next.max_power_streak.saturating_sub(1)
        };

        let heavy = if is_heavy { FATIGUE_HEAVY } else { FATIGUE_NORMAL };
        next.fatigue = clamp01(next.fatigue + FATIGUE_BASE + heavy + power * FATIGUE_PER_POWER);

        let streak = next.max_power_streak as f32;
        let base = if is_max { PRESSURE_MAX_POWER } else { PRESSURE_NORMAL };
        let streak_term = (PRESSURE_STREAK_SCALE * streak * streak).min(PRESSURE_STREAK_CAP);
        next.pressure = clamp01(next.pressure + base + streak_term);

        next
    }

    /// Passive recovery when a round ends, whatever the outcome
    pub fn after_round(&self, now_ms: f64) -> Self {
        let mut next = self.decayed(now_ms);
        next.fatigue = (next.fatigue - RECOVERY_FATIGUE).max(0.0);
        next.pressure = (next.pressure - RECOVERY_PRESSURE).max(0.0);
        next
    }

    /// Load from storage and apply decay since the last session
    pub fn load(storage: &dyn Storage, now_ms: f64) -> Self {
        match persistence::load_json::<PlayerMental>(storage, Self::STORAGE_KEY) {
            Some(stored) => stored.decayed(now_ms),
            None => Self::fresh(now_ms),
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        persistence::save_json(storage, Self::STORAGE_KEY, self);
    }
}
