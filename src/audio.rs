//! Fire-and-forget sound cues
//!
//! The game loop maps simulation events to cues and hands them to an
//! `AudioNotifier` backend. Backend failures are logged and dropped; they
//! never reach the simulation.

use thiserror::Error;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player bullet fired
    Shot,
    /// Alien destroyed
    Explosion,
    /// Cannon lost a life
    Hit,
    /// Power-up collected
    PowerUp,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired => Some(SoundEffect::Shot),
            GameEvent::AlienDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::CannonHit { .. } => Some(SoundEffect::Hit),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable")]
    Unavailable,
    #[error("failed to play {0:?}: {1}")]
    Playback(SoundEffect, String),
}

/// A sound output device
pub trait AudioNotifier {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioNotifier for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::debug!("cue {:?} at {:.2}", effect, volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioNotifier>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioNotifier>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// No backend: every cue is dropped
    pub fn silent() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip the mute flag, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(e) = backend.play(effect, vol) {
            log::debug!("Dropped cue: {}", e);
        }
    }

    /// Play the cue for `event`, if any
    pub fn notify(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioNotifier for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
            self.0.borrow_mut().push((effect, volume));
            Ok(())
        }
    }

    struct Broken;

    impl AudioNotifier for Broken {
        fn play(&mut self, _: SoundEffect, _: f32) -> Result<(), AudioError> {
            Err(AudioError::Unavailable)
        }
    }

    #[test]
    fn test_mute_suppresses_cues() {
        let rec = Recorder::default();
        let mut audio = AudioManager::new(Box::new(rec.clone()));
        audio.play(SoundEffect::Shot);
        assert!(audio.toggle_mute());
        audio.play(SoundEffect::Shot);
        assert!(!audio.toggle_mute());
        audio.play(SoundEffect::Hit);

        let played: Vec<_> = rec.0.borrow().iter().map(|(e, _)| *e).collect();
        assert_eq!(played, vec![SoundEffect::Shot, SoundEffect::Hit]);
    }

    #[test]
    fn test_volume_scales() {
        let rec = Recorder::default();
        let mut audio = AudioManager::new(Box::new(rec.clone()));
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        audio.play(SoundEffect::PowerUp);
        assert_eq!(rec.0.borrow()[0].1, 0.25);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let mut audio = AudioManager::new(Box::new(Broken));
        audio.play(SoundEffect::Explosion);
        AudioManager::silent().play(SoundEffect::Explosion);
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(&GameEvent::ShotFired), Some(SoundEffect::Shot));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::CannonHit { lives_left: 1 }),
            Some(SoundEffect::Hit)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::ShieldAbsorbed), None);
    }
}
