//! Keyboard → paddle movement, plus the random-chance AI for paddle 2.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind};
use rand::Rng;

use crate::entities::{GameState, Side};
use crate::settings::Settings;

/// The AI only reacts on frames where its roll exceeds this.
pub const AI_REACTION_THRESHOLD: f32 = 0.6;

/// A key counts as held if its last press/repeat event arrived within this
/// many frames.  Only matters on terminals that don't emit key-release
/// events.  Once OS key-repeat is running (≥ 15 Hz) the 8-frame window
/// (≈133 ms at 60 FPS) is refreshed before it expires, but the initial
/// repeat delay (typically 250–600 ms) is longer: a held key moves on the
/// first press, stops, then resumes when repeats start.
pub const HOLD_WINDOW: u64 = 8;

// ── Held-key snapshot ─────────────────────────────────────────────────────────

/// The four movement keys that matter this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub p1_up: bool,
    pub p1_down: bool,
    pub p2_up: bool,
    pub p2_down: bool,
}

/// Turns a stream of key events into "currently held" state.
///
/// Records the frame on which each key was last pressed or repeated.
/// Terminals with keyboard enhancement send `Release` and the key is dropped
/// at once; classic terminals only send repeated `Press` events and the key
/// expires after `HOLD_WINDOW` frames of silence.
#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind, frame: u64) {
        let code = normalize(code);
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(code, frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
            }
        }
    }

    pub fn is_held(&self, code: KeyCode, frame: u64) -> bool {
        self.last_seen
            .get(&normalize(code))
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn held(&self, frame: u64) -> HeldKeys {
        HeldKeys {
            p1_up: self.is_held(KeyCode::Char('w'), frame),
            p1_down: self.is_held(KeyCode::Char('s'), frame),
            p2_up: self.is_held(KeyCode::Up, frame),
            p2_down: self.is_held(KeyCode::Down, frame),
        }
    }
}

/// Letter keys match regardless of shift/caps-lock.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

// ── Per-frame input step ──────────────────────────────────────────────────────

/// One uniform sample in `[0, 1)` for the AI's decision this frame.
pub fn ai_chance_roll(rng: &mut impl Rng) -> f32 {
    rng.gen::<f32>()
}

/// Move paddles for one frame.
///
/// Each held key contributes `max_speed_y * dt` in its direction; opposite
/// keys simply cancel.  With AI on, paddle 2 ignores the keyboard and follows
/// `ai_step` instead.  Positions are not clamped, so a paddle can be driven
/// off-screen.
pub fn handle_input(
    state: &mut GameState,
    keys: HeldKeys,
    dt: f32,
    settings: &Settings,
    chance_roll: f32,
) {
    let step = settings.paddle.max_speed_y * dt;

    steer(state, Side::Left, keys.p1_up, keys.p1_down, step);

    if settings.ai.on {
        ai_step(state, step, chance_roll);
    } else {
        steer(state, Side::Right, keys.p2_up, keys.p2_down, step);
    }
}

fn steer(state: &mut GameState, side: Side, up: bool, down: bool, step: f32) {
    let paddle = state.paddle_mut(side);
    if up {
        paddle.position.y -= step;
    }
    if down {
        paddle.position.y += step;
    }
}

/// Chase the ball vertically, but only on frames where `chance_roll` beats
/// `AI_REACTION_THRESHOLD` (about 40% of them), so the AI lags and can be
/// beaten.
pub fn ai_step(state: &mut GameState, step: f32, chance_roll: f32) {
    if chance_roll <= AI_REACTION_THRESHOLD {
        return;
    }
    let ball_y = state.ball.position.y;
    let paddle = &mut state.right;
    if paddle.position.y > ball_y {
        paddle.position.y -= step;
    } else if paddle.position.y < ball_y {
        paddle.position.y += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_held_within_window() {
        let mut keys = KeyTracker::new();
        keys.record(KeyCode::Char('w'), KeyEventKind::Press, 10);
        assert!(keys.is_held(KeyCode::Char('w'), 10));
        assert!(keys.is_held(KeyCode::Char('w'), 10 + HOLD_WINDOW));
        assert!(!keys.is_held(KeyCode::Char('w'), 11 + HOLD_WINDOW));
    }

    #[test]
    fn repeat_refreshes_and_release_drops() {
        let mut keys = KeyTracker::new();
        keys.record(KeyCode::Up, KeyEventKind::Press, 1);
        keys.record(KeyCode::Up, KeyEventKind::Repeat, 20);
        assert!(keys.is_held(KeyCode::Up, 25));
        keys.record(KeyCode::Up, KeyEventKind::Release, 26);
        assert!(!keys.is_held(KeyCode::Up, 26));
    }

    #[test]
    fn gap_before_first_repeat_drops_the_key() {
        // Classic terminal at 60 FPS: press on frame 0, OS repeat delay of
        // ~500 ms puts the first repeat on frame 30.
        let mut keys = KeyTracker::new();
        keys.record(KeyCode::Down, KeyEventKind::Press, 0);
        assert!(keys.is_held(KeyCode::Down, HOLD_WINDOW));
        assert!(!keys.is_held(KeyCode::Down, 20));
        keys.record(KeyCode::Down, KeyEventKind::Repeat, 30);
        assert!(keys.is_held(KeyCode::Down, 30));
        keys.record(KeyCode::Down, KeyEventKind::Repeat, 34);
        assert!(keys.is_held(KeyCode::Down, 34 + HOLD_WINDOW));
    }

    #[test]
    fn uppercase_letters_count_as_lowercase() {
        let mut keys = KeyTracker::new();
        keys.record(KeyCode::Char('S'), KeyEventKind::Press, 3);
        let held = keys.held(3);
        assert!(held.p1_down);
        assert!(!held.p1_up && !held.p2_up && !held.p2_down);
    }

    #[test]
    fn never_pressed_is_not_held() {
        assert_eq!(KeyTracker::new().held(0), HeldKeys::default());
    }
}
