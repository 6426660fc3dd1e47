//! Fixed-tick orchestration around the simulation
//!
//! The loop owns everything outside the pure core: input fusion, audio,
//! the score sink and the time source. External UI requests (start, pause,
//! resume, quit) are queued and applied at the next tick boundary.

use crate::audio::AudioManager;
use crate::consts::*;
use crate::highscores::{HighScores, ScoreRecord};
use crate::input::{ControlFrame, GestureSignal, InputUnifier, Key, KeyEvent};
use crate::persistence::PersistenceSink;
use crate::platform::TimeSource;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, build_snapshot, tick};

/// Longest frame gap fed to the accumulator
const MAX_FRAME_MS: u64 = 100;

/// Requests waiting for the next tick
#[derive(Debug, Clone, Copy, Default)]
struct PendingCommands {
    pause: bool,
    resume: bool,
    quit: bool,
}

impl PendingCommands {
    fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Drives one run at a time at `TICK_RATE`
pub struct GameLoop<T: TimeSource> {
    settings: Settings,
    clock: T,
    input: InputUnifier,
    audio: AudioManager,
    sink: Box<dyn PersistenceSink>,
    state: Option<GameState>,
    pending: PendingCommands,
    accumulator_ms: f64,
    last_frame_ms: Option<u64>,
    /// Record written for the most recent finished run
    last_record: Option<ScoreRecord>,
    runs_started: u64,
}

impl<T: TimeSource> GameLoop<T> {
    pub fn new(
        settings: Settings,
        clock: T,
        mut audio: AudioManager,
        sink: Box<dyn PersistenceSink>,
    ) -> Self {
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        Self {
            settings,
            clock,
            input: InputUnifier::new(SCREEN_WIDTH),
            audio,
            sink,
            state: None,
            pending: PendingCommands::default(),
            accumulator_ms: 0.0,
            last_frame_ms: None,
            last_record: None,
            runs_started: 0,
        }
    }

    /// Begin a fresh run, replacing any current one. Returns its seed.
    pub fn start_run(&mut self) -> u64 {
        let seed = match self.settings.seed {
            Some(seed) => seed.wrapping_add(self.runs_started),
            None => self
                .clock
                .unix_seconds()
                .wrapping_mul(6364136223846793005)
                .wrapping_add(self.clock.now_ms()),
        };
        if self.state.as_ref().is_some_and(|s| !s.phase.is_terminal()) {
            log::info!("Abandoning the current run for a restart");
        }

        self.runs_started += 1;
        self.state = Some(GameState::new(seed, self.clock.now_ms()));
        self.input.reset();
        self.pending = PendingCommands::default();
        self.accumulator_ms = 0.0;
        self.last_frame_ms = None;
        self.last_record = None;
        seed
    }

    pub fn pause(&mut self) {
        self.pending.pause = true;
    }

    pub fn resume(&mut self) {
        self.pending.resume = true;
    }

    /// Confirm quitting; honored only while paused
    pub fn quit(&mut self) {
        self.pending.quit = true;
    }

    /// Feed a keyboard event
    pub fn handle_key(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(Key::Mute) => {
                self.settings.muted = self.audio.toggle_mute();
            }
            KeyEvent::Down(Key::Pause) => match self.phase() {
                Some(GamePhase::Running) => self.pause(),
                Some(GamePhase::Paused) => self.resume(),
                _ => {}
            },
            KeyEvent::Down(_) => {
                if self.sampling_input() {
                    self.input.push_key(event);
                }
            }
            KeyEvent::Up(_) => self.input.push_key(event),
        }
    }

    /// Input is only sampled while running with no pause queued
    fn sampling_input(&self) -> bool {
        self.phase() == Some(GamePhase::Running) && !self.pending.pause
    }

    /// Advance exactly one tick at the current time
    pub fn step(&mut self, gesture: Option<GestureSignal>) -> Option<Snapshot> {
        let now_ms = self.clock.now_ms();
        let control = if self.sampling_input() {
            self.input.sample(gesture)
        } else {
            ControlFrame::default()
        };
        let commands = self.pending.take();

        let state = self.state.as_mut()?;
        let was_paused = state.phase == GamePhase::Paused;
        let input = TickInput {
            control,
            now_ms,
            pause: commands.pause,
            resume: commands.resume,
            quit: commands.quit,
        };
        tick(state, &input);
        let paused_now = !was_paused && state.phase == GamePhase::Paused;
        let events = state.drain_events();

        if paused_now {
            self.input.reset();
        }
        for event in &events {
            self.handle_event(event);
        }

        self.state.as_ref().map(|s| build_snapshot(s, now_ms))
    }

    /// Run as many ticks as the elapsed wall time calls for
    pub fn frame(&mut self, gesture: Option<GestureSignal>) -> Option<Snapshot> {
        let now_ms = self.clock.now_ms();
        let elapsed = self
            .last_frame_ms
            .map(|last| now_ms.saturating_sub(last))
            .unwrap_or(0)
            .min(MAX_FRAME_MS);
        self.last_frame_ms = Some(now_ms);
        self.accumulator_ms += elapsed as f64;

        let mut snapshot = None;
        let mut substeps = 0;
        while self.accumulator_ms >= TICK_MS && substeps < MAX_SUBSTEPS {
            snapshot = self.step(gesture);
            self.accumulator_ms -= TICK_MS;
            substeps += 1;
        }

        snapshot.or_else(|| self.snapshot())
    }

    /// Current view without advancing
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state
            .as_ref()
            .map(|s| build_snapshot(s, self.clock.now_ms()))
    }

    fn handle_event(&mut self, event: &GameEvent) {
        self.audio.notify(event);
        match event {
            GameEvent::RunEnded(summary) => {
                let record = ScoreRecord::new(
                    self.clock.unix_seconds(),
                    &self.settings.player_name,
                    summary.score,
                    summary.level,
                    summary.played_seconds,
                );
                if let Err(e) = self.sink.append(&record) {
                    log::warn!("Could not record score: {}", e);
                }
                self.last_record = Some(record);
            }
            GameEvent::RunQuit => {
                log::info!("Run quit without a score record");
            }
            _ => {}
        }
    }

    /// Top entries of the score log
    pub fn leaderboard(&self) -> HighScores {
        match self.sink.top(self.settings.leaderboard_size) {
            Ok(board) => board,
            Err(e) => {
                log::warn!("Could not read scores: {}", e);
                HighScores::new()
            }
        }
    }

    /// 1-indexed leaderboard rank of the last finished run
    pub fn last_rank(&self) -> Option<usize> {
        let record = self.last_record.as_ref()?;
        self.leaderboard().position_of(record)
    }

    pub fn last_record(&self) -> Option<&ScoreRecord> {
        self.last_record.as_ref()
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.state.as_ref().map(|s| s.phase)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }
}
