//! Round simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Randomness only through an injected `Rng`
//! - Time only through timestamps passed in by the caller
//! - No rendering, storage or platform dependencies

pub mod capture;
pub mod landing;
pub mod mental;
pub mod rng;
pub mod setup;
pub mod state;
pub mod tick;
pub mod wind;

pub use capture::{CaptureReadout, Degrees, OscillatingCapture, SweetWindow, SwingCapture, SwingQuality};
pub use landing::{Landing, LandingInput, compute_landing_x};
pub use mental::PlayerMental;
pub use rng::{GameRng, seeded};
pub use setup::{Lie, ShotSetup, create_shot_setup};
pub use state::{FrameSnapshot, RoundOutcome, RoundPhase, RoundReport, RoundState, SweetSpot, TargetCall};
pub use tick::{ReleaseContext, RoundConfig, TickEvent, begin_hold, cash_out, release_swing, tick};
pub use wind::{WindDirection, WindSample, WindState, init_wind};
