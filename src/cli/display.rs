//! Display utilities for the timekeeper CLI.
//!
//! This module provides formatted output for:
//! - The live timer line (redrawn in place)
//! - Laps
//! - Completion prompts
//! - Help and error messages

use std::io::{self, Write};

use crate::notifier::PromptContent;
use crate::types::{LapRecord, Sample, TimeFormat, TimerMode, TimerStatus};

/// ANSI: return to column 0 and clear the line.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Redraws the live timer line in place.
    pub fn show_sample(sample: &Sample) {
        let mut stdout = io::stdout().lock();
        // a closed stdout only loses the redraw
        let _ = write!(stdout, "{}{}", CLEAR_LINE, Self::format_sample(sample));
        let _ = stdout.flush();
    }

    /// Shows a newly recorded lap.
    pub fn show_lap(lap: &LapRecord) {
        println!("{}{}", CLEAR_LINE, Self::format_lap(lap));
    }

    /// Shows every lap, newest first.
    pub fn show_laps<'a>(laps: impl IntoIterator<Item = &'a LapRecord>) {
        print!("{}", CLEAR_LINE);
        let mut any = false;
        for lap in laps {
            println!("{}", Self::format_lap(lap));
            any = true;
        }
        if !any {
            println!("No laps yet");
        }
    }

    /// Shows the continue/stop question.
    pub fn show_prompt(content: &PromptContent) {
        println!("{}", CLEAR_LINE);
        println!("🔔 {}", content.title);
        println!("   {}", content.description);
        println!(
            "   [c] {}   [s] {}",
            content.continue_label, content.stop_label
        );
    }

    /// Reminds the user which answers the prompt accepts.
    pub fn show_prompt_hint(content: &PromptContent) {
        println!(
            "Type `c` to {} or `s` to {}",
            content.continue_label.to_lowercase(),
            content.stop_label.to_lowercase()
        );
    }

    /// Shows the commands available for `mode`.
    pub fn show_help(mode: TimerMode) {
        println!("{}", CLEAR_LINE);
        for (keys, action) in Self::help_entries(mode) {
            println!("  {:<12} {}", keys, action);
        }
    }

    /// Shows a pretty-printed configuration.
    pub fn show_config(json: &str) {
        println!("{}", json);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats the live timer line.
    pub fn format_sample(sample: &Sample) -> String {
        let format = TimeFormat::for_mode(sample.mode);
        let time = match sample.remaining {
            Some(remaining) => format.format_remaining(remaining),
            None => format.format(sample.elapsed),
        };
        format!(
            "{} {:<9} {}  {}",
            Self::status_icon(sample.status),
            sample.mode.as_str(),
            time,
            sample.status.as_str()
        )
    }

    /// Formats one lap line.
    pub fn format_lap(lap: &LapRecord) -> String {
        format!(
            "  #{:<3} {}  {}",
            lap.ordinal,
            TimeFormat::Centiseconds.format(lap.elapsed),
            lap.label
        )
    }

    fn status_icon(status: TimerStatus) -> &'static str {
        match status {
            TimerStatus::Idle => "[]",
            TimerStatus::Running => "> ",
            TimerStatus::Paused => "||",
            TimerStatus::Completed => "**",
        }
    }

    fn help_entries(mode: TimerMode) -> Vec<(&'static str, &'static str)> {
        let mut entries = vec![
            ("<Enter>", "play / pause"),
            ("start", "start or resume"),
            ("pause", "pause"),
            ("r", "reset"),
        ];
        match mode {
            TimerMode::Stopwatch => {
                entries.push(("l [label]", "record a lap"));
                entries.push(("laps", "list laps"));
            }
            TimerMode::Countdown => {
                entries.push(("set H:M:S", "set the duration"));
            }
            TimerMode::Focus | TimerMode::Break => {
                entries.push(("f / b", "switch to focus / break"));
                entries.push(("f+ / f-", "focus length +/- 5 min"));
                entries.push(("b+ / b-", "break length +/- 1 min"));
                entries.push(("focus N", "set focus length"));
                entries.push(("break N", "set break length"));
            }
        }
        entries.push(("h", "show this help"));
        entries.push(("q", "quit"));
        entries
    }
}

// ============================================================================
// Tests
// ============================================================================
