//! Two-paddle Pong in the terminal.
//!
//! The library holds the game itself: settings, state, input, physics,
//! rendering and the main loop.  `main.rs` only wires up the CLI, logging
//! and the terminal.

pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod settings;
