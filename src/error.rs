//! Error taxonomy
//!
//! Nothing here is fatal: storage errors fall back to defaults, tick errors
//! skip a frame, render errors are logged and dropped.

use thiserror::Error;

use crate::sim::RoundPhase;

/// Key-value storage failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether retrying the same operation later could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            StorageError::Unavailable => true,
            StorageError::Io(_) => true,
            StorageError::Json(_) => false,
        }
    }
}

/// A single frame could not be computed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickError {
    #[error("non-finite frame timestamp {now_ms}")]
    NonFiniteTime { now_ms: f64 },

    #[error("non-finite {what} during {phase:?}")]
    NonFinite { phase: RoundPhase, what: &'static str },
}

/// Renderer-side failure; never fed back into the simulation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);
