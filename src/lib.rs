//! Long Drive - A crash-style long drive golf game
//!
//! Core modules:
//! - `sim`: Round simulation (swing capture, wind, landing, crash loop)
//! - `session`: Game session controller owning the round and player state
//! - `profile`: Attempt history, personal best and handicap
//! - `persistence`: Key-value storage backends with JSON helpers
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{RenderError, StorageError, TickError};
pub use profile::PlayerProfile;
pub use session::{GameSession, Renderer};
pub use settings::{RiskMode, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep (60 Hz animation frames)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest dt a single frame may advance (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Smallest dt a single frame may advance
    pub const MIN_FRAME_DT: f32 = 0.001;

    /// Hard ceiling for the live multiplier
    pub const MULTIPLIER_CAP: f32 = 9.99;
    /// Lowest multiplier a round may be capped or land at
    pub const MULTIPLIER_FLOOR: f32 = 1.05;

    /// Yards gained per 1.0x of multiplier
    pub const YARDS_PER_X: f32 = 100.0;
    /// Distance display range
    pub const MIN_YARDS: u32 = 0;
    pub const MAX_YARDS: u32 = 500;
}

/// Clamp to [0, 1]; non-finite input collapses to 0
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep over [0, 1]
#[inline]
pub fn smoothstep(u: f32) -> f32 {
    let x = clamp01(u);
    x * x * (3.0 - 2.0 * x)
}

/// Convert a multiplier to whole yards: `round(x * 100)` clamped to the display range
#[inline]
pub fn yards_from_multiplier(x: f32) -> u32 {
    use consts::*;
    let x = if x.is_finite() { x } else { 0.0 };
    let yards = (x * YARDS_PER_X).round();
    yards.clamp(MIN_YARDS as f32, MAX_YARDS as f32) as u32
}
