//! Game session controller
//!
//! Owns the single round, the seeded RNG, player mental state, profile,
//! settings and storage. Input events and animation frames come in here;
//! snapshots go out to a `Renderer`.

use crate::consts::{FRAME_DT, MAX_YARDS, MIN_YARDS};
use crate::error::RenderError;
use crate::persistence::Storage;
use crate::profile::PlayerProfile;
use crate::settings::{RiskMode, Settings};
use crate::sim::rng::{GameRng, seeded};
use crate::sim::tick::{self, ReleaseContext, RoundConfig, TickEvent};
use crate::sim::{FrameSnapshot, PlayerMental, RoundPhase, RoundReport, RoundState};
use crate::tuning::Tuning;

/// One-way consumer of frame snapshots
pub trait Renderer {
    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError>;

    /// Called once when a round ends, after the final frame
    fn round_finished(&mut self, _report: &RoundReport) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &FrameSnapshot) -> Result<(), RenderError> {
        Ok(())
    }
}

pub struct GameSession {
    settings: Settings,
    tuning: Tuning,
    seed: u64,
    rng: GameRng,
    round: RoundState,
    mental: PlayerMental,
    profile: PlayerProfile,
    storage: Box<dyn Storage>,
    last_frame_ms: Option<f64>,
    skipped_frames: u64,
}

impl GameSession {
    /// Build a session, loading settings, mental state and profile from `storage`
    pub fn new(mut storage: Box<dyn Storage>, tuning: Tuning, seed: u64, now_ms: f64) -> Self {
        let settings = Settings::load(storage.as_ref());
        let mental = PlayerMental::load(storage.as_ref(), now_ms);
        mental.save(storage.as_mut());
        let profile = PlayerProfile::load(storage.as_ref());
        let round = RoundState::new(&tuning, settings.risk_mode);
        log::info!("Session started with seed {seed}");
        Self {
            settings,
            tuning,
            seed,
            rng: seeded(seed),
            round,
            mental,
            profile,
            storage,
            last_frame_ms: None,
            skipped_frames: 0,
        }
    }

    /// Start arming. Returns false unless the round is IDLE or END.
    pub fn begin_hold(&mut self, now_ms: f64) -> bool {
        let config = RoundConfig::new(&self.tuning, &self.settings);
        let fatigue = self.mental.decayed(now_ms).fatigue;
        let started = tick::begin_hold(&mut self.round, &config, &mut self.rng, now_ms, fatigue);
        if started {
            self.last_frame_ms = Some(now_ms);
        }
        started
    }

    /// Release the swing at `power01`. Returns false unless ARMING.
    pub fn release_swing(&mut self, now_ms: f64, power01: f32) -> bool {
        if self.round.phase != RoundPhase::Arming || !now_ms.is_finite() {
            log::debug!("release_swing ignored in {}", self.round.phase);
            return false;
        }

        self.mental = self.mental.after_attempt(power01, now_ms);
        self.mental.save(self.storage.as_mut());

        let player = ReleaseContext {
            skill01: self.profile.skill01(),
            fatigue01: self.mental.fatigue,
            pressure01: self.mental.pressure,
        };
        let config = RoundConfig::new(&self.tuning, &self.settings);
        tick::release_swing(&mut self.round, &config, &mut self.rng, now_ms, power01, player)
    }

    /// Stop the flight at the current multiplier. Returns false unless FLIGHT.
    pub fn cash_out(&mut self, now_ms: f64) -> bool {
        let config = RoundConfig::new(&self.tuning, &self.settings);
        if !tick::cash_out(&mut self.round, &config, now_ms) {
            return false;
        }
        self.on_round_end(now_ms);
        true
    }

    /// Advance one animation frame and hand the snapshot to `renderer`.
    ///
    /// The tick runs on a scratch copy of the round and RNG; a failed tick
    /// is logged and the frame skipped with the round untouched.
    pub fn frame(&mut self, now_ms: f64, renderer: &mut dyn Renderer) -> TickEvent {
        let dt = match self.last_frame_ms {
            Some(last) if now_ms.is_finite() => ((now_ms - last) / 1000.0) as f32,
            _ => FRAME_DT,
        };
        if now_ms.is_finite() {
            self.last_frame_ms = Some(now_ms);
        }

        let config = RoundConfig::new(&self.tuning, &self.settings);
        let mut scratch = self.round.clone();
        let mut rng = self.rng.clone();
        let event = match tick::tick(&mut scratch, &config, &mut rng, now_ms, dt) {
            Ok(event) => {
                self.round = scratch;
                self.rng = rng;
                event
            }
            Err(e) => {
                self.skipped_frames += 1;
                log::error!("Frame skipped in {}: {e}", self.round.phase);
                TickEvent::None
            }
        };

        if let Err(e) = renderer.render(&self.round.snapshot()) {
            log::warn!("{e}");
        }
        if let TickEvent::Ended(_) = event {
            self.on_round_end(now_ms);
            if let Some(report) = self.round.report.as_ref() {
                if let Err(e) = renderer.round_finished(report) {
                    log::warn!("{e}");
                }
            }
        }
        event
    }

    /// Mental recovery, attempt record and persistence after END
    fn on_round_end(&mut self, now_ms: f64) {
        let Some(report) = self.round.report else {
            return;
        };
        self.mental = self.mental.after_round(now_ms);
        self.mental.save(self.storage.as_mut());
        self.profile.record_round(&report, now_ms);
        self.profile.save(self.storage.as_mut());
    }

    /// Drop the current round and return to IDLE. An in-flight round is
    /// abandoned without an outcome.
    pub fn reset(&mut self) {
        if self.round.is_active() {
            log::info!("Round abandoned in {}", self.round.phase);
        }
        self.round = RoundState::new(&self.tuning, self.settings.risk_mode);
        self.last_frame_ms = None;
    }

    /// Change risk mode; only accepted while no round is active
    pub fn set_risk_mode(&mut self, mode: RiskMode) -> bool {
        if self.round.is_active() {
            log::debug!("Risk mode change ignored in {}", self.round.phase);
            return false;
        }
        self.settings.risk_mode = mode;
        if self.round.phase == RoundPhase::Idle {
            self.round = RoundState::new(&self.tuning, mode);
        }
        self.settings.save(self.storage.as_mut());
        true
    }

    pub fn set_auto_cashout(&mut self, target: Option<f32>) {
        self.settings.auto_cashout = target.filter(|x| x.is_finite());
        self.settings.save(self.storage.as_mut());
    }

    pub fn set_target_yards(&mut self, yards: u32) {
        self.settings.target_yards = yards.clamp(MIN_YARDS, MAX_YARDS);
        self.settings.save(self.storage.as_mut());
    }

    pub fn set_impact_scaling(&mut self, enabled: bool) {
        self.settings.impact_scaling = enabled;
        self.settings.save(self.storage.as_mut());
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.profile.set_name(name);
        self.profile.save(self.storage.as_mut());
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.round.snapshot()
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn last_report(&self) -> Option<&RoundReport> {
        self.round.report.as_ref()
    }

    pub fn mental(&self) -> &PlayerMental {
        &self.mental
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Frames dropped by the tick supervisor
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }
}
