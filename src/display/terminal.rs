//! Terminal backend — all crossterm I/O lives here.
//!
//! `TerminalSurface` owns the terminal for the lifetime of a game: acquiring
//! it switches to raw mode and the alternate screen, and dropping it restores
//! the terminal on every exit path, including an error returned from the
//! loop or a panic unwinding through it.

use std::io::{stdout, BufWriter, Stdout, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use super::{FilledRect, Frame};
use crate::error::RuntimeError;
use crate::game::Platform;
use crate::input::{HeldKeys, KeyTracker};

pub const WINDOW_TITLE: &str = "pong";

/// Half-open range of terminal cells covered by a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub cols: u16,
    pub rows: u16,
}

/// Scale a world-space rectangle onto a `cols` × `rows` cell grid.
///
/// Anything visible covers at least one cell so a small ball never vanishes.
/// Returns `None` when the rectangle lies entirely off-screen.
pub fn to_cells(
    rect: &FilledRect,
    world_width: f32,
    world_height: f32,
    cols: u16,
    rows: u16,
) -> Option<CellRect> {
    let (col, width) = span(rect.bounds.left, rect.bounds.right, world_width, cols)?;
    let (row, height) = span(rect.bounds.top, rect.bounds.bottom, world_height, rows)?;
    Some(CellRect {
        col,
        row,
        cols: width,
        rows: height,
    })
}

fn span(start: f32, end: f32, world: f32, cells: u16) -> Option<(u16, u16)> {
    let cells_f = cells as f32;
    let first = (start * cells_f / world).floor();
    let last = (end * cells_f / world).ceil().max(first + 1.0);
    let first = first.max(0.0);
    let last = last.min(cells_f);
    if first >= last {
        return None;
    }
    Some((first as u16, (last - first) as u16))
}

// ── Surface ───────────────────────────────────────────────────────────────────

pub struct TerminalSurface {
    out: BufWriter<Stdout>,
    events: mpsc::Receiver<Event>,
    keys: KeyTracker,
    keyboard_enhanced: bool,
}

impl TerminalSurface {
    /// Take over the terminal and start the input reader thread.
    pub fn acquire() -> Result<Self, RuntimeError> {
        terminal::enable_raw_mode()?;
        // From here on, `surface`'s Drop restores the terminal if a later
        // step fails.
        let (tx, rx) = mpsc::channel::<Event>();
        let mut surface = TerminalSurface {
            out: BufWriter::new(stdout()),
            events: rx,
            keys: KeyTracker::new(),
            keyboard_enhanced: false,
        };
        surface.out.execute(terminal::EnterAlternateScreen)?;
        surface.out.execute(cursor::Hide)?;
        surface.out.execute(terminal::SetTitle(WINDOW_TITLE))?;

        // Request key-release events.  Kitty-protocol terminals support this;
        // others fall back to the hold window in `KeyTracker`.  The query
        // reads stdin, so it runs before the reader thread exists.
        if keyboard_enhancement_available(terminal::supports_keyboard_enhancement()) {
            surface.keyboard_enhanced = surface
                .out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        }

        // Blocking reads happen on their own thread so the game loop only
        // ever drains the channel.
        thread::spawn(move || {
            while let Ok(ev) = event::read() {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        let (cols, rows) = terminal::size()?;
        tracing::info!(
            cols,
            rows,
            keyboard_enhanced = surface.keyboard_enhanced,
            "Terminal acquired"
        );
        Ok(surface)
    }

    fn draw_rect(&mut self, rect: &FilledRect, frame: &Frame, cols: u16, rows: u16) -> std::io::Result<()> {
        let Some(cells) = to_cells(rect, frame.world_width, frame.world_height, cols, rows) else {
            return Ok(());
        };
        let fill = " ".repeat(cells.cols as usize);
        self.out.queue(style::SetBackgroundColor(rect.color))?;
        for row in cells.row..cells.row + cells.rows {
            self.out.queue(cursor::MoveTo(cells.col, row))?;
            self.out.queue(Print(&fill))?;
        }
        Ok(())
    }
}

/// A failed capability query counts as "not supported".
fn keyboard_enhancement_available(query: std::io::Result<bool>) -> bool {
    matches!(query, Ok(true))
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl Platform for TerminalSurface {
    fn poll_quit(&mut self, frame: u64) -> Result<bool, RuntimeError> {
        let mut quit = false;
        loop {
            match self.events.try_recv() {
                Ok(Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                })) => {
                    if kind == KeyEventKind::Press && is_quit(code, modifiers) {
                        quit = true;
                    }
                    self.keys.record(code, kind, frame);
                }
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(RuntimeError::InputChannelClosed),
            }
        }
        Ok(quit)
    }

    fn held_keys(&self, frame: u64) -> HeldKeys {
        self.keys.held(frame)
    }

    fn present(&mut self, frame: &Frame) -> Result<(), RuntimeError> {
        let (cols, rows) = terminal::size()?;

        self.out.queue(style::SetBackgroundColor(frame.background))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        for rect in &frame.rects {
            self.draw_rect(rect, frame, cols, rows)?;
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(style::ResetColor);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        tracing::info!("Terminal released");
    }
}

/// Best-effort restore for the panic hook, where no surface is reachable.
pub fn restore_terminal() {
    let mut out = stdout();
    let _ = out.execute(PopKeyboardEnhancementFlags);
    let _ = out.execute(style::ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}
