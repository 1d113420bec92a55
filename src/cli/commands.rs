//! Command definitions for the timekeeper CLI.
//!
//! Uses clap derive macro for argument parsing. Durations are never
//! rejected here: out-of-range values are clamped by the config types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{AppConfig, CountdownConfig, PomodoroConfig, TickConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// Stopwatch, countdown and Pomodoro timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "timekeeper",
    version,
    about = "Stopwatch, countdown and Pomodoro timer for the terminal",
    long_about = "Three interactive timers sharing one drift-free engine.\n\
                  Type a command letter and press Enter while a timer runs; `h` lists them.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable the completion alarm sound
    #[arg(long, global = true)]
    pub no_sound: bool,

    /// Sound file played on completion instead of the generated tone
    #[arg(long, global = true, value_name = "PATH")]
    pub alarm: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long, global = true)]
    pub print_config: bool,
}

impl Cli {
    /// Builds the application configuration from the parsed arguments.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        let mut config = AppConfig {
            sound_enabled: !self.no_sound,
            alarm_path: self.alarm.clone(),
            ..AppConfig::default()
        };

        match &self.command {
            Some(Commands::Stopwatch(args)) => {
                config.ticks.stopwatch_ms = args.tick_ms;
            }
            Some(Commands::Countdown(args)) => {
                config.countdown = args.countdown_config();
                config.ticks.countdown_ms = args.tick_ms;
            }
            Some(Commands::Pomodoro(args)) => {
                config.pomodoro = args.pomodoro_config();
                config.ticks.pomodoro_ms = args.tick_ms;
            }
            Some(Commands::Completions { .. }) | None => {}
        }

        config
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the stopwatch (laps, play/pause, reset)
    Stopwatch(StopwatchArgs),

    /// Run a countdown that sounds an alarm at zero
    Countdown(CountdownArgs),

    /// Run the focus/break Pomodoro cycle
    Pomodoro(PomodoroArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Tool Arguments
// ============================================================================

/// Arguments for the stopwatch command
#[derive(Args, Debug, Clone)]
pub struct StopwatchArgs {
    /// Display refresh period in milliseconds
    #[arg(long, default_value_t = TickConfig::default().stopwatch_ms)]
    pub tick_ms: u64,

    /// Start counting immediately
    #[arg(long)]
    pub start: bool,
}

/// Arguments for the countdown command
#[derive(Args, Debug, Clone)]
pub struct CountdownArgs {
    /// Hours (0-23)
    #[arg(short = 'H', long, default_value = "0")]
    pub hours: u32,

    /// Minutes (0-59)
    #[arg(short, long, default_value = "0")]
    pub minutes: u32,

    /// Seconds (0-59)
    #[arg(short, long, default_value = "0")]
    pub seconds: u32,

    /// Display refresh period in milliseconds
    #[arg(long, default_value_t = TickConfig::default().countdown_ms)]
    pub tick_ms: u64,

    /// Start counting down immediately
    #[arg(long)]
    pub start: bool,
}

impl CountdownArgs {
    /// The entered duration, clamped to the dial ranges.
    #[must_use]
    pub fn countdown_config(&self) -> CountdownConfig {
        CountdownConfig::new(self.hours, self.minutes, self.seconds)
    }
}

/// Arguments for the pomodoro command
#[derive(Args, Debug, Clone)]
pub struct PomodoroArgs {
    /// Focus duration in minutes (5-60, multiples of 5)
    #[arg(short, long, default_value = "25")]
    pub focus: u32,

    /// Break duration in minutes (1-30)
    #[arg(short, long = "break", default_value = "5")]
    pub break_minutes: u32,

    /// Display refresh period in milliseconds
    #[arg(long, default_value_t = TickConfig::default().pomodoro_ms)]
    pub tick_ms: u64,

    /// Start the first focus session immediately
    #[arg(long)]
    pub start: bool,
}

impl PomodoroArgs {
    /// The entered durations, clamped and snapped to their steps.
    #[must_use]
    pub fn pomodoro_config(&self) -> PomodoroConfig {
        PomodoroConfig::new(self.focus, self.break_minutes)
    }
}

// ============================================================================
// Tests
// ============================================================================
