//! Run clock with pause exclusion
//!
//! Played time = wall time since start - accumulated pause time. All values
//! are wall-clock milliseconds supplied by the caller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    started_ms: u64,
    /// Set while a pause is in progress
    paused_since: Option<u64>,
    /// Sum of all completed pauses
    paused_total_ms: u64,
    /// Set once the run ends; freezes played time
    ended_ms: Option<u64>,
}

impl GameClock {
    pub fn start(now_ms: u64) -> Self {
        Self {
            started_ms: now_ms,
            paused_since: None,
            paused_total_ms: 0,
            ended_ms: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.ended_ms.is_some()
    }

    /// Begin a pause. Returns false if already paused or stopped.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.is_paused() || self.is_stopped() {
            return false;
        }
        self.paused_since = Some(now_ms);
        true
    }

    /// End the current pause, folding its length into the offset
    pub fn resume(&mut self, now_ms: u64) -> bool {
        match self.paused_since.take() {
            Some(since) => {
                self.paused_total_ms += now_ms.saturating_sub(since);
                true
            }
            None => false,
        }
    }

    /// Freeze the clock at `now_ms`. An open pause is closed first.
    pub fn stop(&mut self, now_ms: u64) {
        if self.is_stopped() {
            return;
        }
        self.resume(now_ms);
        self.ended_ms = Some(now_ms);
    }

    pub fn paused_total_ms(&self) -> u64 {
        self.paused_total_ms
    }

    /// Played milliseconds, excluding completed and in-progress pauses
    pub fn played_ms(&self, now_ms: u64) -> u64 {
        let end = self.ended_ms.unwrap_or(now_ms);
        let open_pause = self
            .paused_since
            .map(|since| end.saturating_sub(since))
            .unwrap_or(0);
        end.saturating_sub(self.started_ms)
            .saturating_sub(self.paused_total_ms)
            .saturating_sub(open_pause)
    }

    /// Whole played seconds (truncated)
    pub fn played_seconds(&self, now_ms: u64) -> u64 {
        self.played_ms(now_ms) / 1000
    }
}
