//! The main loop: input → update → render → wait, once per frame, until a
//! quit signal arrives.

use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::compute::{update, UpdateOutcome};
use crate::display::{compose, Frame};
use crate::entities::{GameState, LoopState};
use crate::error::RuntimeError;
use crate::input::{ai_chance_roll, handle_input, HeldKeys};
use crate::settings::Settings;

/// What the loop needs from the outside world.
///
/// The terminal implements this for real play; tests substitute a recorder.
pub trait Platform {
    /// Drain every pending event.  Returns `true` if one of them asked to
    /// quit.
    fn poll_quit(&mut self, frame: u64) -> Result<bool, RuntimeError>;

    /// Movement keys currently held down.
    fn held_keys(&self, frame: u64) -> HeldKeys;

    /// Draw one complete frame.
    fn present(&mut self, frame: &Frame) -> Result<(), RuntimeError>;
}

// ── Frame timing ──────────────────────────────────────────────────────────────

/// Caps the loop at the target frame rate and measures delta time.
#[derive(Debug)]
pub struct FrameClock {
    budget: Duration,
    last_tick: Instant,
}

impl FrameClock {
    pub fn new(budget: Duration) -> Self {
        FrameClock {
            budget,
            last_tick: Instant::now(),
        }
    }

    /// Sleep out whatever is left of the frame budget, then return the
    /// seconds actually elapsed since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last_tick.elapsed();
        if elapsed < self.budget {
            thread::sleep(self.budget - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        dt
    }
}

// ── Loop ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopReport {
    pub frames: u64,
    pub misses: u64,
}

/// Run until the platform reports a quit.
///
/// The frame on which the quit is seen still completes (one more render)
/// before the loop stops.  The first frame runs with a delta of zero.
pub fn run<P: Platform>(
    platform: &mut P,
    state: &mut GameState,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Result<LoopReport, RuntimeError> {
    tracing::info!("Game has started");

    let mut clock = FrameClock::new(settings.frame_budget());
    let mut loop_state = LoopState::Running;
    let mut dt = 0.0_f32;
    let mut report = LoopReport { frames: 0, misses: 0 };

    while loop_state == LoopState::Running {
        let frame = report.frames;

        if platform.poll_quit(frame)? {
            tracing::info!(frame, "Quit requested");
            loop_state = LoopState::Stopped;
        }

        let keys = platform.held_keys(frame);
        let roll = ai_chance_roll(rng);
        handle_input(state, keys, dt, settings, roll);

        match update(state, dt, settings, rng) {
            UpdateOutcome::Missed => {
                report.misses += 1;
                tracing::info!(
                    frame,
                    vx = state.ball.velocity.x,
                    vy = state.ball.velocity.y,
                    "Ball missed, re-served from center"
                );
            }
            UpdateOutcome::WallBounce => tracing::debug!(frame, "Wall bounce"),
            UpdateOutcome::PaddleBounce(side) => tracing::debug!(frame, ?side, "Paddle bounce"),
            UpdateOutcome::Moved => {}
        }

        platform.present(&compose(state, settings))?;
        report.frames += 1;

        dt = clock.tick();
    }

    tracing::info!(frames = report.frames, misses = report.misses, "Game has ended");
    Ok(report)
}
