//! CLI module for timekeeper.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `prompt`: Terminal answer to the completion question
//! - `session`: Interactive loops driving each tool

pub mod commands;
pub mod display;
pub mod prompt;
pub mod session;

pub use commands::{Cli, Commands, CountdownArgs, PomodoroArgs, StopwatchArgs};
pub use display::Display;
pub use prompt::{SharedInput, TerminalPrompt};
pub use session::{parse_input, run_countdown, run_pomodoro, run_stopwatch, Input};
