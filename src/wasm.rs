//! Browser bindings
//!
//! A JS renderer owns a `LongDrive` handle, forwards input events and calls
//! `frame` from `requestAnimationFrame`. Snapshots and round reports cross the
//! boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::error::RenderError;
use crate::platform;
use crate::session::{GameSession, Renderer};
use crate::settings::RiskMode;
use crate::sim::{FrameSnapshot, RoundReport};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Long Drive core loaded");
}

/// Keeps the latest frame and report as JSON for the JS side to pick up
#[derive(Default)]
struct JsonBuffer {
    frame: String,
    report: Option<String>,
}

impl Renderer for JsonBuffer {
    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
        self.frame = serde_json::to_string(frame).map_err(|e| RenderError(e.to_string()))?;
        Ok(())
    }

    fn round_finished(&mut self, report: &RoundReport) -> Result<(), RenderError> {
        self.report = Some(serde_json::to_string(report).map_err(|e| RenderError(e.to_string()))?);
        Ok(())
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct LongDrive {
    session: GameSession,
    buffer: JsonBuffer,
}

#[wasm_bindgen]
impl LongDrive {
    /// `seed` picks a deterministic session; `tuning_json` overrides balance
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>, tuning_json: Option<String>) -> Result<LongDrive, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let seed = seed
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s as u64)
            .unwrap_or_else(platform::entropy_seed);
        let session = GameSession::new(platform::default_storage(), tuning, seed, platform::now_ms());
        Ok(Self {
            session,
            buffer: JsonBuffer::default(),
        })
    }

    #[wasm_bindgen(js_name = beginHold)]
    pub fn begin_hold(&mut self, ts: f64) -> bool {
        self.session.begin_hold(ts)
    }

    #[wasm_bindgen(js_name = releaseSwing)]
    pub fn release_swing(&mut self, ts: f64, power: f32) -> bool {
        self.session.release_swing(ts, power)
    }

    #[wasm_bindgen(js_name = cashOut)]
    pub fn cash_out(&mut self, ts: f64) -> bool {
        self.session.cash_out(ts)
    }

    /// Advance one animation frame; returns the snapshot JSON
    pub fn frame(&mut self, ts: f64) -> String {
        self.session.frame(ts, &mut self.buffer);
        self.buffer.frame.clone()
    }

    /// Outcome payload of the round that just ended, once
    #[wasm_bindgen(js_name = takeReport)]
    pub fn take_report(&mut self) -> Option<String> {
        self.buffer.report.take()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[wasm_bindgen(js_name = setRiskMode)]
    pub fn set_risk_mode(&mut self, mode: &str) -> bool {
        match RiskMode::from_str(mode) {
            Some(mode) => self.session.set_risk_mode(mode),
            None => {
                log::warn!("Unknown risk mode '{mode}'");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = setAutoCashout)]
    pub fn set_auto_cashout(&mut self, target: Option<f32>) {
        self.session.set_auto_cashout(target);
    }

    #[wasm_bindgen(js_name = setTargetYards)]
    pub fn set_target_yards(&mut self, yards: u32) {
        self.session.set_target_yards(yards);
    }

    #[wasm_bindgen(js_name = setImpactScaling)]
    pub fn set_impact_scaling(&mut self, enabled: bool) {
        self.session.set_impact_scaling(enabled);
    }

    #[wasm_bindgen(js_name = setPlayerName)]
    pub fn set_player_name(&mut self, name: &str) {
        self.session.set_player_name(name);
    }

    /// Profile with derived metrics as JSON
    #[wasm_bindgen(js_name = profileJson)]
    pub fn profile_json(&self) -> Result<String, JsValue> {
        let profile = self.session.profile();
        let now = platform::now_ms();
        let view = serde_json::json!({
            "name": profile.display_name(),
            "metrics": profile.metrics(),
            "recent": profile.recent_flights(),
            "longest_today": profile.longest_today(now),
        });
        serde_json::to_string(&view).map_err(to_js)
    }
}
