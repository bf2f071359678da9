//! Game-logic functions: initial layout, collision geometry, and the
//! per-frame physics step.
//!
//! All randomness comes through an injected `impl Rng` so callers control
//! determinism (tests pass a seeded `StdRng`).

use glam::Vec2;
use rand::Rng;

use crate::entities::{Ball, GameState, Paddle, Side};
use crate::settings::Settings;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, stored as its edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Box of `width` × `height` centered on `center`.
    pub fn around(center: Vec2, width: f32, height: f32) -> Self {
        Rect {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    /// Inclusive on all four edges: touching boxes overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

impl Paddle {
    pub fn bounds(&self) -> Rect {
        Rect::around(self.position, self.width, self.height)
    }
}

impl Ball {
    pub fn bounds(&self) -> Rect {
        Rect::around(self.position, self.side_length, self.side_length)
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Both axes drawn independently from `[-max_speed, max_speed]`.  A zero
/// component is legal.
pub fn random_ball_velocity(max_speed: f32, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(-max_speed..=max_speed),
        rng.gen_range(-max_speed..=max_speed),
    )
}

/// Paddles sit one paddle-width in from each side edge, vertically centered;
/// the ball starts at the screen center.
pub fn init_state(settings: &Settings, rng: &mut impl Rng) -> GameState {
    let width = settings.screen.width;
    let height = settings.screen.height;
    let offset = settings.paddle.width;

    let paddle_at = |x: f32| Paddle {
        position: Vec2::new(x, height / 2.0),
        width: settings.paddle.width,
        height: settings.paddle.height,
    };

    GameState {
        left: paddle_at(offset),
        right: paddle_at(width - offset),
        ball: Ball {
            position: Vec2::new(width / 2.0, height / 2.0),
            velocity: random_ball_velocity(settings.ball.max_speed, rng),
            side_length: settings.ball.size,
        },
        width,
        height,
    }
}

// ── Per-frame update ──────────────────────────────────────────────────────────

/// What the update step did to the ball this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Advanced without touching anything.
    Moved,
    /// Left the screen sideways and was re-served from the center.
    Missed,
    /// Hit the top or bottom edge.
    WallBounce,
    /// Hit a paddle.
    PaddleBounce(Side),
}

/// Advance the ball by one frame.
///
/// After moving, the checks below run as a priority chain and only the first
/// match fires:
///
/// 1. off the left/right edge → re-serve from the center
/// 2. on or past the top/bottom edge → flip `velocity.y`
/// 3. overlapping the left paddle → flip `velocity.x`
/// 4. overlapping the right paddle → flip `velocity.x`
///
/// A ball that touches a wall and a paddle in the same frame only bounces
/// off the wall, so the occasional paddle hit near a corner is missed.
/// There is no position correction after a bounce.  Paddles are never moved
/// here.
pub fn update(
    state: &mut GameState,
    dt: f32,
    settings: &Settings,
    rng: &mut impl Rng,
) -> UpdateOutcome {
    let center = state.center();
    let ball = &mut state.ball;
    ball.position += ball.velocity * dt;

    let Vec2 { x, y } = ball.position;
    if x <= 0.0 || x >= state.width {
        ball.position = center;
        ball.velocity = random_ball_velocity(settings.ball.max_speed, rng);
        UpdateOutcome::Missed
    } else if y <= 0.0 || y >= state.height {
        ball.velocity.y = -ball.velocity.y;
        UpdateOutcome::WallBounce
    } else if ball.bounds().overlaps(&state.left.bounds()) {
        ball.velocity.x = -ball.velocity.x;
        UpdateOutcome::PaddleBounce(Side::Left)
    } else if ball.bounds().overlaps(&state.right.bounds()) {
        ball.velocity.x = -ball.velocity.x;
        UpdateOutcome::PaddleBounce(Side::Right)
    } else {
        UpdateOutcome::Moved
    }
}
