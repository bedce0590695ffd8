//! Round state machine
//!
//! Input events (`begin_hold`, `release_swing`, `cash_out`) and the per-frame
//! `tick` that drives multiplier growth, crash risk and round resolution.
//! Invalid events are ignored and reported with `false`; they never mutate
//! the round.

use rand::Rng;

use super::capture::SwingQuality;
use super::landing::{LandingInput, compute_landing_x};
use super::rng::unit;
use super::setup::create_shot_setup;
use super::state::{RoundOutcome, RoundPhase, RoundReport, RoundState, TargetCall};
use super::wind::{WindSample, init_wind};
use crate::consts::*;
use crate::error::TickError;
use crate::settings::{RiskMode, Settings};
use crate::tuning::Tuning;
use crate::{clamp01, lerp, yards_from_multiplier};

/// Per-round configuration drawn from tuning and settings
#[derive(Debug, Clone, Copy)]
pub struct RoundConfig<'a> {
    pub tuning: &'a Tuning,
    pub risk_mode: RiskMode,
    /// Already clamped to the playable range
    pub auto_cashout: Option<f32>,
    pub impact_scaling: bool,
    pub target_yards: u32,
}

impl<'a> RoundConfig<'a> {
    pub fn new(tuning: &'a Tuning, settings: &Settings) -> Self {
        Self {
            tuning,
            risk_mode: settings.risk_mode,
            auto_cashout: settings.effective_auto_cashout(),
            impact_scaling: settings.impact_scaling,
            target_yards: settings.target_yards,
        }
    }
}

/// Player state that feeds the landing draw
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReleaseContext {
    pub skill01: f32,
    /// Fatigue after the attempt has been applied
    pub fatigue01: f32,
    pub pressure01: f32,
}

/// What a tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    None,
    /// SWING became FLIGHT
    Launched,
    /// The round ended this tick
    Ended(RoundOutcome),
}

/// Start arming a new round. Rejected unless IDLE or END.
pub fn begin_hold<R: Rng + ?Sized>(
    round: &mut RoundState,
    config: &RoundConfig<'_>,
    rng: &mut R,
    now_ms: f64,
    fatigue01: f32,
) -> bool {
    if !round.phase.accepts_hold() {
        log::debug!("begin_hold ignored in {}", round.phase);
        return false;
    }
    if !now_ms.is_finite() {
        log::warn!("begin_hold ignored: non-finite timestamp");
        return false;
    }

    *round = RoundState::new(config.tuning, config.risk_mode);
    let setup = create_shot_setup(rng);
    let mut wind = init_wind(setup.wind_speed_mph, setup.wind_direction, now_ms, rng);
    round.last_wind = wind.sample(now_ms, rng);
    round.wind = Some(wind);
    round.setup = Some(setup);
    round.start_ms = now_ms;
    round.capture.begin_hold(now_ms, fatigue01);
    round.phase = RoundPhase::Arming;
    true
}

/// Max-multiplier factor from the number of timing windows hit
pub fn quality_factor(tuning: &Tuning, quality: &SwingQuality) -> f32 {
    match quality.windows_hit() {
        2 => tuning.quality_both,
        1 => tuning.quality_one,
        _ => tuning.quality_none,
    }
}

/// Lock the swing and launch the round. Rejected unless ARMING.
pub fn release_swing<R: Rng + ?Sized>(
    round: &mut RoundState,
    config: &RoundConfig<'_>,
    rng: &mut R,
    now_ms: f64,
    power01: f32,
    player: ReleaseContext,
) -> bool {
    if round.phase != RoundPhase::Arming {
        log::debug!("release_swing ignored in {}", round.phase);
        return false;
    }
    if !now_ms.is_finite() {
        log::warn!("release_swing ignored: non-finite timestamp");
        return false;
    }
    if !power01.is_finite() {
        log::warn!("Non-finite swing power, treating as 0");
    }
    let power = clamp01(power01);

    let Some(quality) = round.capture.lock() else {
        log::debug!("release_swing ignored: capture not held");
        return false;
    };

    let tuning = config.tuning;
    let mode = tuning.mode(round.risk_mode);
    let max_multiplier =
        (mode.max_multiplier_base * quality_factor(tuning, &quality)).clamp(MULTIPLIER_FLOOR, MULTIPLIER_CAP);

    let wind = match round.wind.as_mut() {
        Some(wind) => wind.sample(now_ms, rng),
        None => WindSample::calm(),
    };
    let setup = round.setup.unwrap_or_else(|| create_shot_setup(rng));
    let landing = compute_landing_x(
        &LandingInput {
            power01: power,
            lie: setup.lie,
            wind_factor: wind.factor01,
            wind_speed_mph: wind.speed_mph,
            wind_signed: wind.signed_bias,
            skill01: player.skill01,
            fatigue01: player.fatigue01,
            pressure01: player.pressure01,
        },
        rng,
    );

    round.setup = Some(setup);
    round.last_wind = wind;
    round.quality = Some(quality);
    round.match_scale = lerp(tuning.match_scale_lo, tuning.match_scale_hi, quality.match_score);
    round.max_multiplier = max_multiplier;
    round.landing_target = landing.landing_x.min(max_multiplier);
    round.landing = Some(landing);
    round.power01 = power;
    round.fatigue01 = clamp01(player.fatigue01);
    round.current_multiplier = 1.0;
    round.distance_yards = distance_yards(1.0, Some(&quality), config);
    round.stability = 0.0;
    round.start_ms = now_ms;
    round.elapsed_ms = 0.0;
    round.phase = RoundPhase::Swing;

    log::info!(
        "Round start: power {:.2}, {} wind {:.0} mph {}, quality {:.2}, max {:.2}x, target {:.2}x",
        power,
        setup.lie.as_str(),
        wind.speed_mph,
        wind.direction.as_str(),
        quality.composite,
        max_multiplier,
        round.landing_target
    );
    true
}

/// Player stop during FLIGHT
pub fn cash_out(round: &mut RoundState, config: &RoundConfig<'_>, now_ms: f64) -> bool {
    if round.phase != RoundPhase::Flight || !now_ms.is_finite() {
        log::debug!("cash_out ignored in {}", round.phase);
        return false;
    }
    round.elapsed_ms = (now_ms - round.start_ms).max(0.0);
    finish(round, config, RoundOutcome::Stopped);
    true
}

/// Live distance for a multiplier, optionally scaled by impact quality
pub fn distance_yards(multiplier: f32, quality: Option<&SwingQuality>, config: &RoundConfig<'_>) -> u32 {
    let scale = match quality {
        Some(q) if config.impact_scaling => lerp(config.tuning.impact_lo, config.tuning.impact_hi, q.composite),
        _ => 1.0,
    };
    yards_from_multiplier(multiplier * scale)
}

/// Growth modulation from the wind, clamped to the tuning range
pub fn wind_slowdown(tuning: &Tuning, wind: &WindSample) -> f32 {
    (1.0 - tuning.wind_slowdown * wind.factor01 + tuning.wind_signed_boost * wind.signed_bias)
        .clamp(tuning.slowdown_min, tuning.slowdown_max)
}

/// Crash hazard per second at multiplier `x`
pub fn crash_rate(tuning: &Tuning, x: f32, wind_factor: f32, fatigue01: f32, stability01: f32) -> f32 {
    let load = 1.0 + tuning.crash_wind_weight * wind_factor + tuning.crash_fatigue_weight * fatigue01;
    let rate = tuning.crash_k * x.max(1.0).powf(tuning.crash_power) * load
        * (tuning.crash_stability_offset - stability01);
    if rate.is_finite() {
        rate.clamp(0.0, tuning.crash_rate_cap)
    } else {
        0.0
    }
}

/// Chance of a crash within `dt` seconds at a constant hazard `rate`
pub fn crash_probability(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Stability gained over `dt` of flight
pub fn stability_gain(per_sec: f32, dt: f32, x: f32, wind_factor: f32, fatigue01: f32) -> f32 {
    dt * per_sec * (0.45 + 0.75 * clamp01((x - 1.0) / 4.0) + 0.35 * wind_factor + 0.35 * fatigue01)
}

/// Advance the round by one frame
pub fn tick<R: Rng + ?Sized>(
    round: &mut RoundState,
    config: &RoundConfig<'_>,
    rng: &mut R,
    now_ms: f64,
    dt: f32,
) -> Result<TickEvent, TickError> {
    if !now_ms.is_finite() {
        return Err(TickError::NonFiniteTime { now_ms });
    }
    let dt = if dt.is_finite() {
        dt.clamp(MIN_FRAME_DT, MAX_FRAME_DT)
    } else {
        FRAME_DT
    };

    match round.phase {
        RoundPhase::Idle | RoundPhase::End => Ok(TickEvent::None),
        RoundPhase::Arming => {
            round.capture.update(now_ms, dt);
            if let Some(wind) = round.wind.as_mut() {
                round.last_wind = wind.sample(now_ms, rng);
            }
            Ok(TickEvent::None)
        }
        RoundPhase::Swing => {
            round.phase = RoundPhase::Flight;
            match update_flight(round, config, rng, now_ms, dt)? {
                TickEvent::None => Ok(TickEvent::Launched),
                event => Ok(event),
            }
        }
        RoundPhase::Flight => update_flight(round, config, rng, now_ms, dt),
    }
}

fn non_finite(phase: RoundPhase, what: &'static str) -> TickError {
    TickError::NonFinite { phase, what }
}

fn update_flight<R: Rng + ?Sized>(
    round: &mut RoundState,
    config: &RoundConfig<'_>,
    rng: &mut R,
    now_ms: f64,
    dt: f32,
) -> Result<TickEvent, TickError> {
    let tuning = config.tuning;
    let phase = round.phase;
    round.elapsed_ms = (now_ms - round.start_ms).max(0.0);

    let wind = match round.wind.as_mut() {
        Some(wind) => wind.sample(now_ms, rng),
        None => WindSample::calm(),
    };
    round.last_wind = wind;

    // Never grow past the nearest stop point, so the round ends exactly on it
    let ceiling = round.max_multiplier.min(MULTIPLIER_CAP);
    let mut stop_at = round.landing_target.min(ceiling);
    if let Some(auto) = config.auto_cashout {
        stop_at = stop_at.min(auto);
    }

    let x = round.current_multiplier;
    let growth = x * tuning.mode(round.risk_mode).growth_rate * round.match_scale * dt * wind_slowdown(tuning, &wind);
    let next = (x + growth).min(stop_at).max(x);
    if !next.is_finite() {
        return Err(non_finite(phase, "multiplier"));
    }
    round.current_multiplier = next;
    round.distance_yards = distance_yards(next, round.quality.as_ref(), config);

    let per_sec = tuning.mode(round.risk_mode).stability_per_sec;
    let stability = round.stability + stability_gain(per_sec, dt, next, wind.factor01, round.fatigue01);
    if !stability.is_finite() {
        return Err(non_finite(phase, "stability"));
    }
    round.stability = clamp01(stability);
    round
        .sweet_spot
        .update(dt, round.stability, wind.factor01, wind.signed_bias, round.fatigue01);

    let rate = crash_rate(tuning, next, wind.factor01, round.fatigue01, round.stability);
    if unit(rng) < crash_probability(rate, dt) {
        finish(round, config, RoundOutcome::Crashed);
        return Ok(TickEvent::Ended(RoundOutcome::Crashed));
    }

    if next >= stop_at {
        finish(round, config, RoundOutcome::Stopped);
        return Ok(TickEvent::Ended(RoundOutcome::Stopped));
    }

    Ok(TickEvent::None)
}

/// Terminal transition; the outcome is never overwritten
fn finish(round: &mut RoundState, config: &RoundConfig<'_>, outcome: RoundOutcome) {
    if round.outcome.is_some() {
        return;
    }
    round.outcome = Some(outcome);
    round.phase = RoundPhase::End;

    let crashed = outcome == RoundOutcome::Crashed;
    let perfect = !crashed && round.sweet_spot.contains(round.current_multiplier);
    round.report = round.quality.zip(round.setup).map(|(quality, setup)| RoundReport {
        outcome,
        crashed,
        final_distance_yards: round.distance_yards,
        multiplier_at_end: round.current_multiplier,
        max_multiplier: round.max_multiplier,
        landing_target: round.landing_target,
        power01: round.power01,
        quality,
        perfect,
        sweet_spot: round.sweet_spot,
        target: TargetCall::evaluate(round.distance_yards, config.target_yards),
        setup,
        elapsed_ms: round.elapsed_ms,
    });

    log::info!(
        "Round end: {} at {:.2}x, {} yd{}",
        outcome.as_str(),
        round.current_multiplier,
        round.distance_yards,
        if perfect { " (perfect)" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;
    use crate::sim::wind::WindDirection;

    const T0: f64 = 10_000.0;

    fn calm_settings() -> Settings {
        Settings::default()
    }

    /// Arm and release a round, returning the timestamp after release
    fn launch(round: &mut RoundState, config: &RoundConfig<'_>, rng: &mut crate::sim::rng::GameRng, power: f32) -> f64 {
        assert!(begin_hold(round, config, rng, T0, 0.0));
        let mut now = T0;
        for _ in 0..30 {
            now += 1000.0 / 60.0;
            tick(round, config, rng, now, FRAME_DT).unwrap();
        }
        assert!(release_swing(round, config, rng, now, power, ReleaseContext::default()));
        now
    }

    /// A FLIGHT round with no wind and a neutral growth scale
    fn still_air_flight(tuning: &Tuning) -> RoundState {
        let mut rng = seeded(0);
        let mut round = RoundState::new(tuning, RiskMode::Calm);
        let mut wind = init_wind(0.0, WindDirection::N, 0.0, &mut rng);
        wind.next_gust_at_ms = f64::INFINITY;
        round.wind = Some(wind);
        round.phase = RoundPhase::Flight;
        round.max_multiplier = 6.5;
        round.landing_target = 6.5;
        round.match_scale = 1.0;
        round.start_ms = 0.0;
        round
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let tuning = Tuning::default();
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(1);
        let mut round = RoundState::new(&tuning, RiskMode::Calm);
        assert_eq!(tick(&mut round, &config, &mut rng, T0, FRAME_DT), Ok(TickEvent::None));
        assert_eq!(round.phase, RoundPhase::Idle);
        assert_eq!(round.current_multiplier, 1.0);
    }

    #[test]
    fn test_round_lifecycle() {
        let tuning = Tuning::default();
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(12345);
        let mut round = RoundState::new(&tuning, RiskMode::Calm);

        let mut now = launch(&mut round, &config, &mut rng, 0.8);
        assert_eq!(round.phase, RoundPhase::Swing);
        assert!(round.quality.is_some());
        assert!(round.max_multiplier >= MULTIPLIER_FLOOR && round.max_multiplier <= MULTIPLIER_CAP);
        assert!(round.landing_target <= round.max_multiplier);

        now += 1000.0 / 60.0;
        let first = tick(&mut round, &config, &mut rng, now, FRAME_DT).unwrap();
        assert!(matches!(first, TickEvent::Launched | TickEvent::Ended(_)));

        let mut frames = 0;
        while round.phase == RoundPhase::Flight && frames < 10_000 {
            now += 1000.0 / 60.0;
            tick(&mut round, &config, &mut rng, now, FRAME_DT).unwrap();
            frames += 1;
        }
        assert_eq!(round.phase, RoundPhase::End);
        let report = round.report.unwrap();
        assert_eq!(Some(report.outcome), round.outcome);
        assert_eq!(report.final_distance_yards, round.distance_yards);
        if report.outcome == RoundOutcome::Stopped {
            assert!((report.multiplier_at_end - round.landing_target).abs() < 1e-6);
        }
    }

    #[test]
    fn test_exponential_growth_one_second() {
        let tuning = Tuning {
            crash_k: 0.0,
            ..Tuning::default()
        };
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(7);
        let mut round = still_air_flight(&tuning);

        let mut now = 0.0;
        for _ in 0..60 {
            now += 1000.0 / 60.0;
            assert_eq!(tick(&mut round, &config, &mut rng, now, FRAME_DT), Ok(TickEvent::None));
        }
        let expected = 0.56f32.exp();
        assert!(
            (round.current_multiplier - expected).abs() < 0.02,
            "multiplier {} vs {expected}",
            round.current_multiplier
        );
        assert_eq!(round.phase, RoundPhase::Flight);
        assert!(round.stability > 0.0);
    }

    #[test]
    fn test_stops_exactly_at_landing_target() {
        let tuning = Tuning {
            crash_k: 0.0,
            ..Tuning::default()
        };
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(3);
        let mut round = still_air_flight(&tuning);
        round.landing_target = 1.3;
        round.quality = Some(test_quality());
        round.setup = Some(create_shot_setup(&mut rng));

        let mut now = 0.0;
        let mut event = TickEvent::None;
        while event == TickEvent::None {
            now += 1000.0 / 60.0;
            event = tick(&mut round, &config, &mut rng, now, FRAME_DT).unwrap();
        }
        assert_eq!(event, TickEvent::Ended(RoundOutcome::Stopped));
        assert_eq!(round.current_multiplier, 1.3);
        assert_eq!(round.distance_yards, 130);

        // Terminal: further ticks change nothing
        let before = round.current_multiplier;
        assert_eq!(tick(&mut round, &config, &mut rng, now + 100.0, FRAME_DT), Ok(TickEvent::None));
        assert_eq!(round.current_multiplier, before);
        assert_eq!(round.outcome, Some(RoundOutcome::Stopped));
    }

    fn test_quality() -> SwingQuality {
        SwingQuality {
            tempo_pos01: 0.7,
            path_pos01: 0.5,
            attack_angle_deg: 3.0,
            tempo_score: 1.0,
            path_score: 1.0,
            attack_score: 1.0,
            tempo_hit: true,
            path_hit: true,
            attack_hit: true,
            composite: 1.0,
            match_score: 1.0,
        }
    }

    #[test]
    fn test_auto_cashout_stops_first() {
        let tuning = Tuning {
            crash_k: 0.0,
            ..Tuning::default()
        };
        let settings = Settings {
            auto_cashout: Some(1.5),
            ..Settings::default()
        };
        let config = RoundConfig::new(&tuning, &settings);
        let mut rng = seeded(3);
        let mut round = still_air_flight(&tuning);
        round.quality = Some(test_quality());
        round.setup = Some(create_shot_setup(&mut rng));

        let mut now = 0.0;
        while round.phase == RoundPhase::Flight {
            now += 1000.0 / 60.0;
            tick(&mut round, &config, &mut rng, now, FRAME_DT).unwrap();
        }
        assert_eq!(round.outcome, Some(RoundOutcome::Stopped));
        assert_eq!(round.current_multiplier, 1.5);
        let report = round.report.unwrap();
        assert_eq!(report.final_distance_yards, 150);
        assert_eq!(report.target, TargetCall::Short(150));
    }

    #[test]
    fn test_certain_crash() {
        let tuning = Tuning {
            crash_k: 1000.0,
            crash_rate_cap: 1e9,
            ..Tuning::default()
        };
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(11);
        let mut round = still_air_flight(&tuning);
        round.quality = Some(test_quality());
        round.setup = Some(create_shot_setup(&mut rng));

        let event = tick(&mut round, &config, &mut rng, 16.0, FRAME_DT).unwrap();
        assert_eq!(event, TickEvent::Ended(RoundOutcome::Crashed));
        let report = round.report.unwrap();
        assert!(report.crashed);
        assert!(!report.perfect);
        // Crash keeps the distance reached
        assert_eq!(report.final_distance_yards, yards_from_multiplier(round.current_multiplier));
    }

    #[test]
    fn test_cash_out_only_in_flight() {
        let tuning = Tuning {
            crash_k: 0.0,
            ..Tuning::default()
        };
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(5);
        let mut round = RoundState::new(&tuning, RiskMode::Calm);
        assert!(!cash_out(&mut round, &config, T0));

        let now = launch(&mut round, &config, &mut rng, 0.9);
        assert!(!cash_out(&mut round, &config, now));
        // Keep the stop well above the first flight frame
        round.max_multiplier = 3.0;
        round.landing_target = 3.0;
        tick(&mut round, &config, &mut rng, now + 16.0, FRAME_DT).unwrap();
        assert_eq!(round.phase, RoundPhase::Flight);
        assert!(round.landing_target > round.current_multiplier);

        let x = round.current_multiplier;
        assert!(!cash_out(&mut round, &config, f64::NAN));
        assert_eq!(round.phase, RoundPhase::Flight);
        assert!(cash_out(&mut round, &config, now + 20.0));
        assert_eq!(round.outcome, Some(RoundOutcome::Stopped));
        assert_eq!(round.current_multiplier, x);
        assert!(!cash_out(&mut round, &config, now + 30.0));
    }

    #[test]
    fn test_begin_hold_rejected_while_arming() {
        let tuning = Tuning::default();
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(2);
        let mut round = RoundState::new(&tuning, RiskMode::Calm);
        assert!(begin_hold(&mut round, &config, &mut rng, T0, 0.0));
        let setup = round.setup;
        let wind = round.wind.clone();
        assert!(!begin_hold(&mut round, &config, &mut rng, T0 + 50.0, 0.0));
        assert_eq!(round.phase, RoundPhase::Arming);
        assert_eq!(round.setup, setup);
        assert_eq!(round.wind, wind);
    }

    #[test]
    fn test_release_requires_arming() {
        let tuning = Tuning::default();
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(2);
        let mut round = RoundState::new(&tuning, RiskMode::Calm);
        assert!(!release_swing(&mut round, &config, &mut rng, T0, 0.5, ReleaseContext::default()));
        assert_eq!(round.phase, RoundPhase::Idle);
    }

    #[test]
    fn test_non_finite_inputs() {
        let tuning = Tuning::default();
        let config = RoundConfig::new(&tuning, &calm_settings());
        let mut rng = seeded(2);
        let mut round = RoundState::new(&tuning, RiskMode::Calm);
        let result = tick(&mut round, &config, &mut rng, f64::NAN, FRAME_DT);
        assert!(matches!(result, Err(TickError::NonFiniteTime { .. })));

        // Bad dt falls back to the nominal frame
        let now = launch(&mut round, &config, &mut rng, f32::NAN);
        assert_eq!(round.power01, 0.0);
        assert!(tick(&mut round, &config, &mut rng, now + 16.0, f32::INFINITY).is_ok());
        assert!(round.current_multiplier.is_finite());
    }

    #[test]
    fn test_max_multiplier_from_quality() {
        let tuning = Tuning::default();
        let mut q = test_quality();
        assert_eq!(quality_factor(&tuning, &q), 1.12);
        q.path_hit = false;
        assert_eq!(quality_factor(&tuning, &q), 1.04);
        q.tempo_hit = false;
        assert_eq!(quality_factor(&tuning, &q), 1.00);
        assert!((tuning.aggressive.max_multiplier_base * 1.12).clamp(1.05, 9.99) <= 9.99);
    }

    #[test]
    fn test_wind_slowdown_clamped() {
        let tuning = Tuning::default();
        let mut wind = WindSample::calm();
        assert_eq!(wind_slowdown(&tuning, &wind), 1.0);
        wind.factor01 = 1.0;
        wind.signed_bias = -0.35;
        assert!((wind_slowdown(&tuning, &wind) - 0.759).abs() < 1e-5);
        wind.factor01 = 0.0;
        wind.signed_bias = 1.0;
        assert_eq!(wind_slowdown(&tuning, &wind), 1.03);
    }

    #[test]
    fn test_crash_rate_bounds() {
        let tuning = Tuning::default();
        assert!(crash_rate(&tuning, 1.0, 0.0, 0.0, 0.0) > 0.0);
        assert_eq!(crash_rate(&tuning, 9.99, 1.0, 1.0, 0.0), 0.65);
        assert!(crash_rate(&tuning, 3.0, 0.0, 0.0, 1.0) < crash_rate(&tuning, 3.0, 0.0, 0.0, 0.0));
        assert_eq!(crash_probability(0.0, FRAME_DT), 0.0);
        assert!(crash_probability(0.65, FRAME_DT) < 0.011);
    }

    #[test]
    fn test_distance_conversion() {
        let tuning = Tuning::default();
        let config = RoundConfig::new(&tuning, &calm_settings());
        assert_eq!(distance_yards(3.0, None, &config), 300);
        assert_eq!(distance_yards(9.99, None, &config), 500);

        let scaled = RoundConfig {
            impact_scaling: true,
            ..config
        };
        assert_eq!(distance_yards(3.0, Some(&test_quality()), &scaled), 324);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let config = RoundConfig::new(&tuning, &calm_settings());
        let run = |seed| {
            let mut rng = seeded(seed);
            let mut round = RoundState::new(&tuning, RiskMode::Calm);
            let mut now = launch(&mut round, &config, &mut rng, 0.75);
            while round.phase != RoundPhase::End {
                now += 1000.0 / 60.0;
                tick(&mut round, &config, &mut rng, now, FRAME_DT).unwrap();
            }
            round.report.unwrap()
        };
        assert_eq!(run(99_999), run(99_999));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Multiplier stays in [1, max] and never decreases; the outcome is final
            #[test]
            fn prop_flight_invariants(
                seed in any::<u64>(),
                power in 0.0f32..=1.0,
                aggressive in any::<bool>(),
                frame_ms in 8.0f64..120.0,
            ) {
                let tuning = Tuning::default();
                let settings = Settings {
                    risk_mode: if aggressive { RiskMode::Aggressive } else { RiskMode::Calm },
                    ..Settings::default()
                };
                let config = RoundConfig::new(&tuning, &settings);
                let mut rng = seeded(seed);
                let mut round = RoundState::new(&tuning, settings.risk_mode);
                let mut now = launch(&mut round, &config, &mut rng, power);

                prop_assert!(round.max_multiplier <= MULTIPLIER_CAP);
                let mut prev = round.current_multiplier;
                let mut outcome = None;
                for _ in 0..2000 {
                    now += frame_ms;
                    tick(&mut round, &config, &mut rng, now, (frame_ms / 1000.0) as f32).unwrap();
                    prop_assert!(round.current_multiplier >= 1.0);
                    prop_assert!(round.current_multiplier <= round.max_multiplier);
                    prop_assert!(round.current_multiplier >= prev);
                    prop_assert!(round.distance_yards <= MAX_YARDS);
                    prop_assert!(round.last_wind.speed_mph <= 22.0);
                    if outcome.is_some() {
                        prop_assert_eq!(round.outcome, outcome);
                        prop_assert_eq!(round.phase, RoundPhase::End);
                    }
                    outcome = round.outcome;
                    prev = round.current_multiplier;
                }
                prop_assert_eq!(round.phase, RoundPhase::End);
            }
        }
    }
}
