use glam::Vec2;
use pong::compute::init_state;
use pong::display::Frame;
use pong::error::RuntimeError;
use pong::game::{run, FrameClock, Platform};
use pong::input::HeldKeys;
use pong::settings::Settings;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

fn settings() -> Settings {
    Settings::from_toml_str(
        r#"
[Screen]
width = 800
height = 600
fps = 200

[Paddle]
width = 10
height = 80
max_speed_y = 400
color = "white"

[Ball]
size = 8
max_speed = 200
color = "white"

[AI]
on = false
"#,
    )
    .unwrap()
}

/// Scripted stand-in for the terminal.  Counts calls and asks to quit after
/// `quit_after_polls` polls.
struct MockPlatform {
    quit_after_polls: u64,
    polls: u64,
    keys: HeldKeys,
    frames: Vec<Frame>,
    fail_present: bool,
    releases: Rc<Cell<u32>>,
}

impl MockPlatform {
    fn new(quit_after_polls: u64) -> Self {
        MockPlatform {
            quit_after_polls,
            polls: 0,
            keys: HeldKeys::default(),
            frames: Vec::new(),
            fail_present: false,
            releases: Rc::new(Cell::new(0)),
        }
    }
}

impl Platform for MockPlatform {
    fn poll_quit(&mut self, _frame: u64) -> Result<bool, RuntimeError> {
        self.polls += 1;
        Ok(self.polls >= self.quit_after_polls)
    }

    fn held_keys(&self, _frame: u64) -> HeldKeys {
        self.keys
    }

    fn present(&mut self, frame: &Frame) -> Result<(), RuntimeError> {
        if self.fail_present {
            return Err(RuntimeError::Display(std::io::Error::other("display lost")));
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}

impl Drop for MockPlatform {
    fn drop(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

#[test]
fn quit_on_first_poll_renders_exactly_once() {
    let cfg = settings();
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = init_state(&cfg, &mut rng);
    let mut platform = MockPlatform::new(1);

    let report = run(&mut platform, &mut state, &cfg, &mut rng).unwrap();

    assert_eq!(report.frames, 1);
    assert_eq!(platform.polls, 1);
    assert_eq!(platform.frames.len(), 1);
}

#[test]
fn first_frame_runs_with_zero_delta() {
    let cfg = settings();
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = init_state(&cfg, &mut rng);
    let start = state.clone();
    let mut platform = MockPlatform::new(1);
    platform.keys = HeldKeys { p1_up: true, ..Default::default() };

    run(&mut platform, &mut state, &cfg, &mut rng).unwrap();

    assert_eq!(state.ball.position, start.ball.position);
    assert_eq!(state.left.position, start.left.position);
}

#[test]
fn loop_runs_until_quit_and_moves_things() {
    let cfg = settings();
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = init_state(&cfg, &mut rng);
    state.ball.velocity = Vec2::new(50.0, 20.0);
    let mut platform = MockPlatform::new(5);
    platform.keys = HeldKeys { p2_down: true, ..Default::default() };

    let report = run(&mut platform, &mut state, &cfg, &mut rng).unwrap();

    assert_eq!(report.frames, 5);
    assert_eq!(report.misses, 0);
    assert_eq!(platform.frames.len(), 5);
    assert!(state.ball.position.x > 400.0);
    assert!(state.right.position.y > 300.0);
    assert_eq!(state.left.position.y, 300.0);
}

#[test]
fn rendered_frame_matches_state() {
    let cfg = settings();
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = init_state(&cfg, &mut rng);
    let mut platform = MockPlatform::new(1);

    run(&mut platform, &mut state, &cfg, &mut rng).unwrap();

    let frame = &platform.frames[0];
    assert_eq!(frame.rects.len(), 3);
    assert_eq!(frame.rects[0].bounds, state.left.bounds());
    assert_eq!(frame.rects[1].bounds, state.right.bounds());
    assert_eq!(frame.rects[2].bounds, state.ball.bounds());
}

#[test]
fn display_failure_aborts_the_loop() {
    let cfg = settings();
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = init_state(&cfg, &mut rng);
    let mut platform = MockPlatform::new(u64::MAX);
    platform.fail_present = true;

    let err = run(&mut platform, &mut state, &cfg, &mut rng).unwrap_err();

    assert!(matches!(err, RuntimeError::Display(_)));
    assert_eq!(platform.polls, 1);
}

#[test]
fn platform_is_released_once_on_every_exit_path() {
    let cfg = settings();
    let mut rng = StdRng::seed_from_u64(3);
    let releases = Rc::new(Cell::new(0));

    for fail_present in [false, true] {
        let mut state = init_state(&cfg, &mut rng);
        let before = releases.get();
        {
            let mut platform = MockPlatform::new(2);
            platform.fail_present = fail_present;
            platform.releases = Rc::clone(&releases);
            let outcome = run(&mut platform, &mut state, &cfg, &mut rng);
            assert_eq!(outcome.is_err(), fail_present);
        }
        assert_eq!(releases.get(), before + 1);
    }
}

// ── FrameClock ────────────────────────────────────────────────────────────────

#[test]
fn frame_clock_waits_out_the_budget() {
    let mut clock = FrameClock::new(Duration::from_millis(20));
    let dt = clock.tick();
    assert!(dt >= 0.020, "dt = {dt}");
    let dt = clock.tick();
    assert!(dt >= 0.020, "dt = {dt}");
}

#[test]
fn frame_clock_reports_overrun_time() {
    let mut clock = FrameClock::new(Duration::from_millis(1));
    std::thread::sleep(Duration::from_millis(15));
    let dt = clock.tick();
    assert!(dt >= 0.015, "dt = {dt}");
}
