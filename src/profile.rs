//! Player profile: attempt history, personal best and handicap
//!
//! Derived metrics are recomputed from the attempt list after every change,
//! never maintained incrementally.

use serde::{Deserialize, Serialize};

use crate::clamp01;
use crate::persistence::{self, Storage};
use crate::sim::RoundReport;

/// Attempts kept in the rolling window
pub const MAX_ATTEMPTS: usize = 100;
/// Most recent attempts considered for the best-3 average
pub const WINDOW_N: usize = 20;
/// Distance that plays to a zero handicap
pub const REFERENCE_YARDS: f32 = 280.0;
pub const MAX_HANDICAP: u32 = 54;
/// Flights shown in the recent list
pub const RECENT_FLIGHTS: usize = 3;
pub const MAX_NAME_LEN: usize = 16;
pub const GUEST_NAME: &str = "Guest";

const MS_PER_DAY: f64 = 86_400_000.0;

/// A single recorded drive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub distance_yards: u32,
    pub crashed: bool,
    /// Unix timestamp (ms)
    pub timestamp_ms: f64,
}

/// Summary of a finished flight for the recent list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub distance_yards: u32,
    pub multiplier: f32,
    pub crashed: bool,
    pub perfect: bool,
}

/// Best non-crashed distance of one UTC day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBest {
    pub day: i64,
    pub best_yards: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProfileMetrics {
    pub personal_best: u32,
    /// Mean of the best three recent drives, one decimal
    pub best3_average: f32,
    pub handicap: u32,
}

/// Days since the Unix epoch (UTC)
pub fn day_index(timestamp_ms: f64) -> i64 {
    if timestamp_ms.is_finite() {
        (timestamp_ms / MS_PER_DAY).floor() as i64
    } else {
        0
    }
}

/// `round((280 - avg) / 10)` clamped to [0, 54]
pub fn handicap_for(best3_average: f32) -> u32 {
    ((REFERENCE_YARDS - best3_average) / 10.0)
        .round()
        .clamp(0.0, MAX_HANDICAP as f32) as u32
}

/// Recompute all derived metrics from the attempt list
pub fn compute_metrics(attempts: &[Attempt]) -> ProfileMetrics {
    if attempts.is_empty() {
        return ProfileMetrics::default();
    }

    let personal_best = attempts.iter().map(|a| a.distance_yards).max().unwrap_or(0);

    let pool: Vec<u32> = if attempts.len() < 3 {
        attempts.iter().map(|a| a.distance_yards).collect()
    } else {
        let start = attempts.len().saturating_sub(WINDOW_N);
        let mut recent: Vec<u32> = attempts[start..].iter().map(|a| a.distance_yards).collect();
        recent.sort_unstable_by(|a, b| b.cmp(a));
        recent.truncate(3);
        recent
    };
    let avg = pool.iter().map(|&d| d as f32).sum::<f32>() / pool.len() as f32;
    let best3_average = (avg * 10.0).round() / 10.0;

    ProfileMetrics {
        personal_best,
        best3_average,
        handicap: handicap_for(best3_average),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    name: String,
    attempts: Vec<Attempt>,
    /// Newest first
    recent: Vec<FlightSummary>,
    day_best: Option<DayBest>,
    #[serde(skip)]
    metrics: ProfileMetrics,
}

impl PlayerProfile {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "long_drive_profile";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load the profile, falling back to an empty one
    pub fn load(storage: &dyn Storage) -> Self {
        let mut profile = persistence::load_json::<PlayerProfile>(storage, Self::STORAGE_KEY).unwrap_or_default();
        profile.normalize();
        log::info!(
            "Loaded profile '{}' ({} attempts, PB {} yd)",
            profile.display_name(),
            profile.attempts.len(),
            profile.metrics.personal_best
        );
        profile
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        persistence::save_json(storage, Self::STORAGE_KEY, self);
    }

    /// Enforce caps after deserializing and refresh metrics
    fn normalize(&mut self) {
        if self.attempts.len() > MAX_ATTEMPTS {
            let excess = self.attempts.len() - MAX_ATTEMPTS;
            self.attempts.drain(..excess);
        }
        self.recent.truncate(RECENT_FLIGHTS);
        self.name = sanitize_name(&self.name);
        self.metrics = compute_metrics(&self.attempts);
    }

    /// Append an attempt. Returns true if it set a new personal best.
    pub fn record_attempt(&mut self, distance_yards: u32, crashed: bool, timestamp_ms: f64) -> bool {
        let timestamp_ms = self.finite_timestamp(timestamp_ms);
        let previous_best = self.metrics.personal_best;
        self.attempts.push(Attempt {
            distance_yards,
            crashed,
            timestamp_ms,
        });
        if self.attempts.len() > MAX_ATTEMPTS {
            self.attempts.remove(0);
        }
        self.metrics = compute_metrics(&self.attempts);

        let improved = self.metrics.personal_best > previous_best;
        if improved {
            log::info!("New personal best: {} yd", self.metrics.personal_best);
        }
        improved
    }

    /// `timestamp_ms`, or the latest stored one when it is not finite
    fn finite_timestamp(&self, timestamp_ms: f64) -> f64 {
        if timestamp_ms.is_finite() {
            return timestamp_ms;
        }
        log::warn!("Non-finite attempt timestamp {timestamp_ms}");
        self.attempts.last().map_or(0.0, |a| a.timestamp_ms)
    }

    /// Record a finished round: attempt, recent list and day best
    pub fn record_round(&mut self, report: &RoundReport, timestamp_ms: f64) -> bool {
        let improved = self.record_attempt(report.final_distance_yards, report.crashed, timestamp_ms);

        self.recent.insert(
            0,
            FlightSummary {
                distance_yards: report.final_distance_yards,
                multiplier: report.multiplier_at_end,
                crashed: report.crashed,
                perfect: report.perfect,
            },
        );
        self.recent.truncate(RECENT_FLIGHTS);

        if !report.crashed && timestamp_ms.is_finite() {
            let day = day_index(timestamp_ms);
            let best = self.longest_today(timestamp_ms);
            if report.final_distance_yards > best {
                self.day_best = Some(DayBest {
                    day,
                    best_yards: report.final_distance_yards,
                });
            }
        }
        improved
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored name, or "Guest" when blank
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { GUEST_NAME } else { &self.name }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = sanitize_name(name);
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn recent_flights(&self) -> &[FlightSummary] {
        &self.recent
    }

    pub fn metrics(&self) -> ProfileMetrics {
        self.metrics
    }

    pub fn personal_best(&self) -> u32 {
        self.metrics.personal_best
    }

    pub fn best3_average(&self) -> f32 {
        self.metrics.best3_average
    }

    pub fn handicap(&self) -> u32 {
        self.metrics.handicap
    }

    /// Best non-crashed distance on the UTC day of `now_ms`
    pub fn longest_today(&self, now_ms: f64) -> u32 {
        match self.day_best {
            Some(best) if best.day == day_index(now_ms) => best.best_yards,
            _ => 0,
        }
    }

    /// Landing-engine skill derived from the handicap
    pub fn skill01(&self) -> f32 {
        clamp01(1.0 - self.metrics.handicap as f32 / MAX_HANDICAP as f32)
    }
}

/// Trim, cap at 16 chars; "Guest" is stored as blank
fn sanitize_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if trimmed == GUEST_NAME { String::new() } else { trimmed }
}
