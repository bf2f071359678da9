//! All game entity types — pure data, no logic.

use glam::Vec2;

// ── Sides ─────────────────────────────────────────────────────────────────────

/// Which paddle an input or collision refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Paddle 1, left edge, always human-controlled.
    Left,
    /// Paddle 2, right edge, human or AI.
    Right,
}

// ── Loop state ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal state, entered once a quit signal is observed.
    Stopped,
}

// ── Paddle & ball ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Paddle {
    /// Center point in world units.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    /// Center point in world units.
    pub position: Vec2,
    /// World units per second.
    pub velocity: Vec2,
    pub side_length: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything that changes from frame to frame.  Owned by the main loop and
/// handed to input, update and render by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    pub width: f32,
    pub height: f32,
}

impl GameState {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
