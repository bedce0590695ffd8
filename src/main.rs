//! Long Drive - headless native driver
//!
//! Plays scripted rounds at 60 Hz against the real session and logs each
//! outcome. The browser build drives the library through `wasm::LongDrive`.
//!
//! Usage: `long-drive [rounds] [seed]`
//! Environment:
//! - `LONG_DRIVE_TUNING`: path to a JSON balance override
//! - `LONG_DRIVE_DATA_DIR`: where profile/mental/settings are stored
//! - `RUST_LOG`: log filter (env_logger)

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use long_drive::consts::FRAME_DT;
    use long_drive::session::{GameSession, Renderer};
    use long_drive::sim::{FrameSnapshot, RoundPhase, RoundReport};
    use long_drive::{RenderError, Tuning, platform};

    const FRAME_MS: f64 = FRAME_DT as f64 * 1000.0;
    /// Safety stop for a single round (five minutes of frames)
    const MAX_FRAMES_PER_ROUND: u32 = 60 * 300;

    /// Logs a line per displayed yard milestone and collects reports
    #[derive(Default)]
    struct ConsoleRenderer {
        last_yards: u32,
        reports: Vec<RoundReport>,
    }

    impl Renderer for ConsoleRenderer {
        fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
            if frame.phase == RoundPhase::Flight && frame.distance_yards / 50 > self.last_yards / 50 {
                log::debug!(
                    "{:>3} yd  {:.2}x  wind {:.1} mph{}  stability {:.2}",
                    frame.distance_yards,
                    frame.current_multiplier,
                    frame.wind.speed_mph,
                    if frame.wind.is_gust { " (gust)" } else { "" },
                    frame.stability
                );
            }
            self.last_yards = frame.distance_yards;
            Ok(())
        }

        fn round_finished(&mut self, report: &RoundReport) -> Result<(), RenderError> {
            self.reports.push(*report);
            Ok(())
        }
    }

    fn load_tuning() -> Tuning {
        let Some(path) = std::env::var_os("LONG_DRIVE_TUNING") else {
            return Tuning::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.to_string_lossy());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override {}: {}", path.to_string_lossy(), e);
                Tuning::default()
            }
        }
    }

    /// Power and hold length for round `i`
    fn script(i: u32) -> (f32, u32) {
        let power = [0.72, 0.95, 0.6, 0.88, 1.0][i as usize % 5];
        let hold_frames = 24 + (i * 7) % 40;
        (power, hold_frames)
    }

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let rounds: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(5);
        let seed: u64 = args
            .next()
            .and_then(|a| a.parse().ok())
            .unwrap_or_else(platform::entropy_seed);

        log::info!("Long Drive (native) starting: {rounds} rounds, seed {seed}");
        let mut now = platform::now_ms();
        let mut session = GameSession::new(platform::default_storage(), load_tuning(), seed, now);
        let mut renderer = ConsoleRenderer::default();

        for i in 0..rounds {
            let (power, hold_frames) = script(i);
            if !session.begin_hold(now) {
                session.reset();
                session.begin_hold(now);
            }
            for _ in 0..hold_frames {
                now += FRAME_MS;
                session.frame(now, &mut renderer);
            }
            session.release_swing(now, power);

            let mut frames = 0;
            while session.round().phase != RoundPhase::End && frames < MAX_FRAMES_PER_ROUND {
                now += FRAME_MS;
                session.frame(now, &mut renderer);
                frames += 1;
            }
            if session.round().phase != RoundPhase::End {
                log::warn!("Round {} did not finish, cashing out", i + 1);
                session.cash_out(now);
            }
            renderer.last_yards = 0;
            // Breather between rounds
            now += 2000.0;
        }

        for (i, r) in renderer.reports.iter().enumerate() {
            println!(
                "#{:<3} {:<5} {:>3} yd  {:.2}x / max {:.2}x  quality {:.2}  {}{}",
                i + 1,
                r.outcome.as_str(),
                r.final_distance_yards,
                r.multiplier_at_end,
                r.max_multiplier,
                r.quality.composite,
                r.target,
                if r.perfect { "  PERFECT" } else { "" }
            );
        }

        let profile = session.profile();
        let metrics = profile.metrics();
        println!(
            "{}: PB {} yd, best-3 avg {:.1} yd, handicap {}, longest today {} yd",
            profile.display_name(),
            metrics.personal_best,
            metrics.best3_average,
            metrics.handicap,
            profile.longest_today(now)
        );
        if session.skipped_frames() > 0 {
            log::warn!("{} frames skipped", session.skipped_frames());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `long_drive::wasm::start`
}
