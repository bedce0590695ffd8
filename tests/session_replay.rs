//! Whole-session replays against in-memory storage

use long_drive::consts::MULTIPLIER_CAP;
use long_drive::persistence::MemoryStorage;
use long_drive::session::{GameSession, NullRenderer, Renderer};
use long_drive::sim::{FrameSnapshot, RoundOutcome, RoundPhase, RoundReport};
use long_drive::{RenderError, RiskMode, Tuning, yards_from_multiplier};

const T0: f64 = 1_700_000_000_000.0;
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Default)]
struct Trace {
    frames: Vec<FrameSnapshot>,
    reports: Vec<RoundReport>,
}

impl Renderer for Trace {
    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
        self.frames.push(*frame);
        Ok(())
    }

    fn round_finished(&mut self, report: &RoundReport) -> Result<(), RenderError> {
        self.reports.push(*report);
        Ok(())
    }
}

/// Play `rounds` scripted rounds and return the trace
fn replay(seed: u64, rounds: u32, mode: RiskMode) -> (GameSession, Trace) {
    let mut session = GameSession::new(Box::new(MemoryStorage::new()), Tuning::default(), seed, T0);
    assert!(session.set_risk_mode(mode));
    let mut trace = Trace::default();
    let mut now = T0;

    for i in 0..rounds {
        assert!(session.begin_hold(now));
        for _ in 0..(20 + i * 3) {
            now += FRAME_MS;
            session.frame(now, &mut trace);
        }
        assert!(session.release_swing(now, 0.55 + 0.1 * (i % 5) as f32));
        while session.round().phase != RoundPhase::End {
            now += FRAME_MS;
            session.frame(now, &mut trace);
        }
        now += 1500.0;
    }
    (session, trace)
}

#[test]
fn test_same_seed_replays_identically() {
    let (a, trace_a) = replay(2024, 8, RiskMode::Calm);
    let (b, trace_b) = replay(2024, 8, RiskMode::Calm);
    assert_eq!(trace_a.reports, trace_b.reports);
    assert_eq!(trace_a.frames, trace_b.frames);
    assert_eq!(a.profile(), b.profile());
    assert_eq!(a.mental(), b.mental());
}

#[test]
fn test_different_seeds_diverge() {
    let (_, a) = replay(1, 6, RiskMode::Aggressive);
    let (_, b) = replay(2, 6, RiskMode::Aggressive);
    assert_ne!(a.reports, b.reports);
}

#[test]
fn test_frame_invariants_hold_across_session() {
    let (session, trace) = replay(77, 12, RiskMode::Aggressive);
    assert_eq!(trace.reports.len(), 12);
    assert_eq!(session.profile().attempts().len(), 12);

    let mut prev: Option<FrameSnapshot> = None;
    for frame in &trace.frames {
        assert!(frame.current_multiplier >= 1.0);
        assert!(frame.current_multiplier <= frame.max_multiplier);
        assert!(frame.max_multiplier <= MULTIPLIER_CAP);
        assert!(frame.wind.speed_mph >= 0.0 && frame.wind.speed_mph <= 22.0);
        assert!((0.0..=1.0).contains(&frame.wind.factor01));
        if let Some(p) = prev {
            if p.phase == RoundPhase::Flight && frame.phase == RoundPhase::Flight {
                assert!(frame.current_multiplier >= p.current_multiplier);
            }
            if p.phase == RoundPhase::End && frame.phase == RoundPhase::End {
                assert_eq!(frame.outcome, p.outcome);
                assert_eq!(frame.current_multiplier, p.current_multiplier);
            }
        }
        prev = Some(*frame);
    }

    for report in &trace.reports {
        assert_eq!(report.crashed, report.outcome == RoundOutcome::Crashed);
        assert!(report.multiplier_at_end <= report.max_multiplier);
        if report.crashed {
            assert!(!report.perfect);
        }
        assert_eq!(report.final_distance_yards, yards_from_multiplier(report.multiplier_at_end));
    }

    let best = trace.reports.iter().map(|r| r.final_distance_yards).max().unwrap();
    assert_eq!(session.profile().personal_best(), best);
    assert_eq!(session.profile().recent_flights().len(), 3);
}

#[test]
fn test_begin_hold_twice_is_rejected() {
    let mut session = GameSession::new(Box::new(MemoryStorage::new()), Tuning::default(), 5, T0);
    assert!(session.begin_hold(T0));
    let snapshot = session.snapshot();
    assert!(!session.begin_hold(T0 + 5.0));
    assert_eq!(session.snapshot(), snapshot);
    assert_eq!(session.round().phase, RoundPhase::Arming);
}

#[test]
fn test_distance_conversion() {
    assert_eq!(yards_from_multiplier(3.0), 300);
    assert_eq!(yards_from_multiplier(1.0), 100);
    assert_eq!(yards_from_multiplier(9.99), 500);
}

#[test]
fn test_reset_abandons_round() {
    let mut session = GameSession::new(
        Box::new(MemoryStorage::new()),
        Tuning {
            crash_k: 0.0,
            ..Tuning::default()
        },
        11,
        T0,
    );
    assert!(session.begin_hold(T0));
    assert!(session.release_swing(T0 + 400.0, 1.0));
    assert_eq!(session.round().phase, RoundPhase::Swing);
    session.reset();
    assert_eq!(session.round().phase, RoundPhase::Idle);
    assert!(session.last_report().is_none());
    assert!(session.profile().attempts().is_empty());
    // A stale frame after reset is a no-op
    session.frame(T0 + 432.0, &mut NullRenderer);
    assert_eq!(session.round().current_multiplier, 1.0);
    assert!(session.begin_hold(T0 + 500.0));
}
