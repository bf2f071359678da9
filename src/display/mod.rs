//! Rendering layer.
//!
//! `compose` turns the game state into a `Frame`: a background color plus
//! filled rectangles in world units.  It performs no game logic and no I/O.
//! The `terminal` submodule rasterizes frames onto the terminal.

pub mod terminal;

use crossterm::style::Color;

use crate::compute::Rect;
use crate::entities::GameState;
use crate::settings::Settings;

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Black;

// ── Frame description ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilledRect {
    pub bounds: Rect,
    pub color: Color,
}

/// One frame's worth of drawing, in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub background: Color,
    pub world_width: f32,
    pub world_height: f32,
    /// Painted in order: left paddle, right paddle, ball.
    pub rects: Vec<FilledRect>,
}

/// Describe the current state as a frame.
pub fn compose(state: &GameState, settings: &Settings) -> Frame {
    Frame {
        background: C_BACKGROUND,
        world_width: state.width,
        world_height: state.height,
        rects: vec![
            FilledRect {
                bounds: state.left.bounds(),
                color: settings.paddle.color,
            },
            FilledRect {
                bounds: state.right.bounds(),
                color: settings.paddle.color,
            },
            FilledRect {
                bounds: state.ball.bounds(),
                color: settings.ball.color,
            },
        ],
    }
}
