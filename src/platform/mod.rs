//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (mental-state decay, attempt timestamps)
//! - Frame timestamps
//! - Default storage backend

use crate::persistence::Storage;

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Seed for a fresh session when none is given
pub fn entropy_seed() -> u64 {
    let ms = now_ms();
    (ms as u64) ^ ((ms.fract() * 1e6) as u64).rotate_left(32)
}

/// Default storage for this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Box<dyn Storage> {
    let dir = std::env::var_os("LONG_DRIVE_DATA_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("long_drive"));
    log::info!("Using file storage at {}", dir.display());
    Box::new(crate::persistence::FileStorage::new(dir))
}

#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Box<dyn Storage> {
    Box::new(crate::persistence::LocalStorage)
}
