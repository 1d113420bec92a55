//! Core data types shared by the engine, the tools and the front-end.
//!
//! This module defines:
//! - Timer modes and statuses
//! - The user's decision after a completion
//! - Engine samples and lap records
//! - Display formats for elapsed and remaining time

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerMode
// ============================================================================

/// Which tool (or Pomodoro phase) a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Open-ended stopwatch with laps
    Stopwatch,
    /// Single countdown
    Countdown,
    /// Pomodoro focus phase
    Focus,
    /// Pomodoro break phase
    Break,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Stopwatch => "stopwatch",
            TimerMode::Countdown => "countdown",
            TimerMode::Focus => "focus",
            TimerMode::Break => "break",
        }
    }

    /// Returns true if sessions of this mode run towards a target.
    pub fn is_bounded(&self) -> bool {
        !matches!(self, TimerMode::Stopwatch)
    }

    /// Returns the Pomodoro phase that follows this one.
    ///
    /// Stopwatch and countdown have no successor and map to themselves.
    pub fn next_phase(&self) -> TimerMode {
        match self {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
            other => *other,
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Not started, or reset
    #[default]
    Idle,
    /// Counting
    Running,
    /// Halted with elapsed time banked
    Paused,
    /// Bounded session reached its target
    Completed,
}

impl TimerStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Decision
// ============================================================================

/// The user's answer to a completion notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Move on (next Pomodoro phase, or restart the countdown)
    Continue,
    /// Silence the alarm and stay put
    Stop,
}

// ============================================================================
// Sample
// ============================================================================

/// A point-in-time reading of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sample {
    /// Session mode
    pub mode: TimerMode,
    /// Session status at the time of the reading
    pub status: TimerStatus,
    /// Elapsed time, net of pauses
    pub elapsed: Duration,
    /// Target duration (None for the stopwatch)
    pub target: Option<Duration>,
    /// Remaining time, floored at zero (None for the stopwatch)
    pub remaining: Option<Duration>,
}

impl Sample {
    /// Returns true if a bounded session has nothing left to run.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_some_and(|r| r.is_zero())
    }

    /// Returns the duration shown to the user: remaining for bounded
    /// sessions, elapsed otherwise.
    pub fn display_duration(&self) -> Duration {
        self.remaining.unwrap_or(self.elapsed)
    }
}

// ============================================================================
// LapRecord
// ============================================================================

/// A labeled stopwatch checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapRecord {
    /// 1-based creation order
    pub ordinal: u32,
    /// Stopwatch elapsed time when the lap was taken
    pub elapsed: Duration,
    /// User label, or `"Lap {ordinal}"`
    pub label: String,
}

impl LapRecord {
    /// Creates a lap, falling back to the default label when `label` is blank.
    pub fn new(ordinal: u32, elapsed: Duration, label: Option<&str>) -> Self {
        let label = match label.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("Lap {}", ordinal),
        };
        Self {
            ordinal,
            elapsed,
            label,
        }
    }
}

// ============================================================================
// TimeFormat
// ============================================================================

/// Display formats used by the three tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `MM:SS.cc` (stopwatch)
    Centiseconds,
    /// `HH:MM:SS` (countdown)
    HoursMinutesSeconds,
    /// `MM:SS` (pomodoro)
    MinutesSeconds,
}

impl TimeFormat {
    /// Returns the format a tool in `mode` displays.
    pub fn for_mode(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Stopwatch => TimeFormat::Centiseconds,
            TimerMode::Countdown => TimeFormat::HoursMinutesSeconds,
            TimerMode::Focus | TimerMode::Break => TimeFormat::MinutesSeconds,
        }
    }

    /// Formats an elapsed duration, truncating sub-unit precision.
    pub fn format(&self, duration: Duration) -> String {
        match self {
            TimeFormat::Centiseconds => {
                let millis = duration.as_millis();
                let minutes = millis / 60_000;
                let seconds = (millis % 60_000) / 1000;
                let centis = (millis % 1000) / 10;
                format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
            }
            TimeFormat::HoursMinutesSeconds => {
                let total = duration.as_secs();
                format!(
                    "{:02}:{:02}:{:02}",
                    total / 3600,
                    (total % 3600) / 60,
                    total % 60
                )
            }
            TimeFormat::MinutesSeconds => {
                let total = duration.as_secs();
                format!("{:02}:{:02}", total / 60, total % 60)
            }
        }
    }

    /// Formats a remaining duration.
    ///
    /// Whole-second formats round up, so a countdown shows `00:01` until the
    /// very end instead of `00:00` for most of the last second.
    pub fn format_remaining(&self, remaining: Duration) -> String {
        match self {
            TimeFormat::Centiseconds => self.format(remaining),
            _ => self.format(ceil_to_secs(remaining)),
        }
    }
}

/// Rounds a duration up to the next whole second.
pub fn ceil_to_secs(duration: Duration) -> Duration {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        Duration::from_secs(secs + 1)
    } else {
        Duration::from_secs(secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
