//! Keyboard and hand-gesture fusion
//!
//! Two stages run once per tick: `sample_raw` drains whatever the keyboard
//! delivered since the last tick together with the latest gesture frame, and
//! `synthesize` turns that sample into a `ControlFrame`. Gesture fire is
//! edge-triggered through a latch that survives across ticks.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Fire,
    Mute,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// One frame from the hand tracker
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureSignal {
    /// Horizontal index-fingertip position, normalized to [0, 1]
    pub lateral_target: Option<f32>,
    pub index_open: bool,
    pub middle_open: bool,
}

impl GestureSignal {
    /// Both fire fingers extended
    pub fn fire_pose(&self) -> bool {
        self.index_open && self.middle_open
    }

    /// Neither fire finger extended
    pub fn closed(&self) -> bool {
        !self.index_open && !self.middle_open
    }
}

/// Lateral movement requested for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LateralIntent {
    /// Keyboard displacement in pixels
    pub key_dx: f32,
    /// Gesture target for the cannon center in screen pixels
    pub target_x: Option<f32>,
}

/// Unified control output for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlFrame {
    pub lateral: LateralIntent,
    /// At most one fire attempt per tick
    pub fire: bool,
}

/// Stage one output: raw device state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawSample {
    pub key_dx: f32,
    /// Fire key presses since the previous sample
    pub fire_presses: u32,
    pub gesture: Option<GestureSignal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

/// Held-key bookkeeping between ticks
#[derive(Debug, Clone, Default)]
struct KeyboardState {
    left_held: bool,
    right_held: bool,
    /// Most recently pressed direction; wins while both are held
    last_direction: Option<Direction>,
    pending_fire: u32,
}

impl KeyboardState {
    fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(Key::Left) => {
                self.left_held = true;
                self.last_direction = Some(Direction::Left);
            }
            KeyEvent::Down(Key::Right) => {
                self.right_held = true;
                self.last_direction = Some(Direction::Right);
            }
            KeyEvent::Down(Key::Fire) => self.pending_fire += 1,
            KeyEvent::Up(Key::Left) => self.left_held = false,
            KeyEvent::Up(Key::Right) => self.right_held = false,
            _ => {}
        }
    }

    fn direction(&self) -> Option<Direction> {
        match (self.left_held, self.right_held) {
            (true, true) => self.last_direction,
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            (false, false) => None,
        }
    }

    fn key_dx(&self) -> f32 {
        match self.direction() {
            Some(Direction::Left) => -CANNON_KEY_SPEED,
            Some(Direction::Right) => CANNON_KEY_SPEED,
            None => 0.0,
        }
    }
}

/// Fuses keyboard and gesture input into per-tick control frames
#[derive(Debug, Clone)]
pub struct InputUnifier {
    screen_width: f32,
    keyboard: KeyboardState,
    /// Set when the fire pose is entered; cleared once both fingers close
    shot_locked: bool,
}

impl Default for InputUnifier {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH)
    }
}

impl InputUnifier {
    pub fn new(screen_width: f32) -> Self {
        Self {
            screen_width,
            keyboard: KeyboardState::default(),
            shot_locked: false,
        }
    }

    /// Queue a keyboard event for the next sample
    pub fn push_key(&mut self, event: KeyEvent) {
        self.keyboard.apply(event);
    }

    /// Stage one: drain pending presses and capture the gesture frame
    pub fn sample_raw(&mut self, gesture: Option<GestureSignal>) -> RawSample {
        RawSample {
            key_dx: self.keyboard.key_dx(),
            fire_presses: std::mem::take(&mut self.keyboard.pending_fire),
            gesture,
        }
    }

    /// Stage two: build the control frame and advance the fire latch
    pub fn synthesize(&mut self, raw: RawSample) -> ControlFrame {
        // No tracker frame reads as a closed hand
        let gesture = raw.gesture.unwrap_or_default();

        let mut gesture_fire = false;
        if gesture.fire_pose() && !self.shot_locked {
            gesture_fire = true;
            self.shot_locked = true;
        }
        if gesture.closed() {
            self.shot_locked = false;
        }

        let target_x = gesture
            .lateral_target
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0) * self.screen_width);

        ControlFrame {
            lateral: LateralIntent {
                key_dx: raw.key_dx,
                target_x,
            },
            fire: raw.fire_presses > 0 || gesture_fire,
        }
    }

    /// Both stages in one call
    pub fn sample(&mut self, gesture: Option<GestureSignal>) -> ControlFrame {
        let raw = self.sample_raw(gesture);
        self.synthesize(raw)
    }

    /// Forget held keys and queued presses. The gesture latch is kept so an
    /// open hand at resume does not fire.
    pub fn reset(&mut self) {
        self.keyboard = KeyboardState::default();
    }

    pub fn shot_locked(&self) -> bool {
        self.shot_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(target: Option<f32>, index_open: bool, middle_open: bool) -> Option<GestureSignal> {
        Some(GestureSignal {
            lateral_target: target,
            index_open,
            middle_open,
        })
    }

    #[test]
    fn test_last_pressed_direction_wins() {
        let mut input = InputUnifier::default();
        input.push_key(KeyEvent::Down(Key::Left));
        assert_eq!(input.sample(None).lateral.key_dx, -CANNON_KEY_SPEED);

        input.push_key(KeyEvent::Down(Key::Right));
        assert_eq!(input.sample(None).lateral.key_dx, CANNON_KEY_SPEED);

        input.push_key(KeyEvent::Up(Key::Right));
        assert_eq!(input.sample(None).lateral.key_dx, -CANNON_KEY_SPEED);

        input.push_key(KeyEvent::Up(Key::Left));
        assert_eq!(input.sample(None).lateral.key_dx, 0.0);
    }

    #[test]
    fn test_fire_key_is_one_attempt_per_press() {
        let mut input = InputUnifier::default();
        input.push_key(KeyEvent::Down(Key::Fire));
        assert!(input.sample(None).fire);
        // Holding the key does not refire
        assert!(!input.sample(None).fire);
        input.push_key(KeyEvent::Up(Key::Fire));
        assert!(!input.sample(None).fire);
    }

    #[test]
    fn test_gesture_fire_edge_and_latch() {
        let mut input = InputUnifier::default();
        assert!(input.sample(hand(None, true, true)).fire);
        assert!(input.shot_locked());
        // Still open: no refire
        assert!(!input.sample(hand(None, true, true)).fire);
        // One finger down keeps the latch
        assert!(!input.sample(hand(None, true, false)).fire);
        assert!(!input.sample(hand(None, true, true)).fire);
        // Both closed releases it
        assert!(!input.sample(hand(None, false, false)).fire);
        assert!(!input.shot_locked());
        assert!(input.sample(hand(None, true, true)).fire);
    }

    #[test]
    fn test_missing_gesture_releases_latch() {
        let mut input = InputUnifier::default();
        input.sample(hand(None, true, true));
        let frame = input.sample(None);
        assert!(!frame.fire);
        assert_eq!(frame.lateral.target_x, None);
        assert!(!input.shot_locked());
    }

    #[test]
    fn test_gesture_target_scaled_and_clamped() {
        let mut input = InputUnifier::default();
        let frame = input.sample(hand(Some(0.5), false, false));
        assert_eq!(frame.lateral.target_x, Some(SCREEN_WIDTH / 2.0));

        let frame = input.sample(hand(Some(1.7), false, false));
        assert_eq!(frame.lateral.target_x, Some(SCREEN_WIDTH));

        let frame = input.sample(hand(Some(f32::NAN), false, false));
        assert_eq!(frame.lateral.target_x, None);
    }

    #[test]
    fn test_keyboard_and_gesture_combine() {
        let mut input = InputUnifier::default();
        input.push_key(KeyEvent::Down(Key::Right));
        input.push_key(KeyEvent::Down(Key::Fire));
        let frame = input.sample(hand(Some(0.25), true, true));
        assert_eq!(frame.lateral.key_dx, CANNON_KEY_SPEED);
        assert_eq!(frame.lateral.target_x, Some(SCREEN_WIDTH * 0.25));
        assert!(frame.fire);
    }

    #[test]
    fn test_reset_clears_keyboard_only() {
        let mut input = InputUnifier::default();
        input.sample(hand(None, true, true));
        input.push_key(KeyEvent::Down(Key::Left));
        input.push_key(KeyEvent::Down(Key::Fire));
        input.reset();

        let frame = input.sample(hand(None, true, true));
        assert_eq!(frame.lateral.key_dx, 0.0);
        assert!(!frame.fire);
    }
}
