//! Gesture Invaders - headless driver
//!
//! Runs the simulation at 60 Hz with a scripted autopilot standing in for the
//! hand tracker, then prints the leaderboard.
//!
//! Usage: gesture-invaders [settings.json] [--fast] [--ticks N]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use gesture_invaders::audio::{AudioManager, LogAudio};
    use gesture_invaders::consts::*;
    use gesture_invaders::highscores::format_clock;
    use gesture_invaders::persistence::FileScoreLog;
    use gesture_invaders::platform::{ManualClock, SystemClock, TimeSource};
    use gesture_invaders::sim::{BulletOwner, GamePhase, Snapshot};
    use gesture_invaders::{GameLoop, GestureSignal, Settings};

    /// Nominal duration of one tick
    const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);
    /// Ten minutes of play
    const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10;
    /// Horizontal distance at which the autopilot takes the shot
    const AIM_TOLERANCE: f32 = 14.0;

    struct Args {
        settings_path: PathBuf,
        fast: bool,
        max_ticks: u64,
    }

    fn parse_args() -> Args {
        let mut args = Args {
            settings_path: PathBuf::from("settings.json"),
            fast: false,
            max_ticks: DEFAULT_MAX_TICKS,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--fast" => args.fast = true,
                "--ticks" => match iter.next().and_then(|n| n.parse().ok()) {
                    Some(n) => args.max_ticks = n,
                    None => log::warn!("--ticks needs a number, keeping {}", args.max_ticks),
                },
                path => args.settings_path = PathBuf::from(path),
            }
        }
        args
    }

    /// Steer under the lowest alien and flick two fingers open when lined up
    fn autopilot(snapshot: Option<&Snapshot>) -> Option<GestureSignal> {
        let snap = snapshot?;
        let target = snap
            .aliens
            .iter()
            .max_by(|a, b| a.rect.bottom().total_cmp(&b.rect.bottom()))?;
        let target_x = target.rect.center_x();
        let cannon_x = snap.cannon.rect.center_x();
        let bullet_in_flight = snap.bullets.iter().any(|b| b.owner == BulletOwner::Player);
        let lined_up = (target_x - cannon_x).abs() < AIM_TOLERANCE;
        let open = lined_up && !bullet_in_flight;

        Some(GestureSignal {
            lateral_target: Some(target_x / SCREEN_WIDTH),
            index_open: open,
            middle_open: open,
        })
    }

    /// Tick until the run ends or the tick budget runs out
    fn drive<T: TimeSource>(
        game: &mut GameLoop<T>,
        max_ticks: u64,
        mut wait_for_tick: impl FnMut(u64),
    ) -> Option<Snapshot> {
        let mut last = game.snapshot();
        for n in 1..=max_ticks {
            wait_for_tick(n);
            let gesture = autopilot(last.as_ref());
            last = game.step(gesture);
            if last.as_ref().is_some_and(|s| s.phase.is_terminal()) {
                break;
            }
        }
        last
    }

    fn report<T: TimeSource>(game: &GameLoop<T>, last: Option<Snapshot>) {
        if let Some(snap) = last {
            let outcome = match snap.phase {
                GamePhase::GameOver => "Game over",
                GamePhase::Quit => "Quit",
                _ => "Stopped",
            };
            println!(
                "{}: score {}  level {}  lives {}  time {}",
                outcome, snap.hud.score, snap.hud.level, snap.hud.lives, snap.hud.clock_label
            );
        }

        let board = game.leaderboard();
        let highlight = game.last_rank();
        println!("\nTop {}", game.settings().leaderboard_size);
        if board.is_empty() {
            println!("  (no scores yet)");
        }
        for (i, entry) in board.entries.iter().enumerate() {
            let marker = if highlight == Some(i + 1) { ">" } else { " " };
            println!(
                "{} {}. {:<12} {:>6}  L{:<3} {}",
                marker,
                i + 1,
                entry.player_name,
                entry.score,
                entry.level,
                format_clock(entry.played_seconds)
            );
        }
    }

    pub fn run() {
        env_logger::init();
        let args = parse_args();
        let settings = Settings::load_from(&args.settings_path);
        log::info!(
            "Gesture Invaders (headless) starting for {}",
            settings.display_name()
        );

        let audio = AudioManager::new(Box::new(LogAudio));
        let sink = Box::new(FileScoreLog::new(settings.score_file.clone()));

        if args.fast {
            let clock = ManualClock::new(SystemClock::new().unix_seconds());
            let mut game = GameLoop::new(settings, clock.clone(), audio, sink);
            game.start_run();
            let last = drive(&mut game, args.max_ticks, |n| {
                clock.set(n * 1000 / TICK_RATE as u64);
            });
            report(&game, last);
        } else {
            let mut game = GameLoop::new(settings, SystemClock::new(), audio, sink);
            game.start_run();
            let mut next_tick_time = Instant::now();
            let last = drive(&mut game, args.max_ticks, |_| {
                next_tick_time += TICK_DURATION;
                let now = Instant::now();
                if next_tick_time > now {
                    std::thread::sleep(next_tick_time - now);
                } else {
                    // Fell behind; don't try to catch up
                    next_tick_time = now;
                }
            });
            report(&game, last);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The headless driver is native only
}
