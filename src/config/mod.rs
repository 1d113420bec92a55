//! Configuration for the three tools.
//!
//! Out-of-range values are never rejected: every setter clamps to the
//! nearest allowed value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Focus duration bounds in minutes.
pub const FOCUS_MINUTES_MIN: u32 = 5;
pub const FOCUS_MINUTES_MAX: u32 = 60;
pub const FOCUS_MINUTES_STEP: u32 = 5;

/// Break duration bounds in minutes.
pub const BREAK_MINUTES_MIN: u32 = 1;
pub const BREAK_MINUTES_MAX: u32 = 30;
pub const BREAK_MINUTES_STEP: u32 = 1;

fn default_focus_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

/// Focus and break durations for the Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    /// Focus duration in minutes (5-60, multiples of 5)
    #[serde(default = "default_focus_minutes")]
    focus_minutes: u32,
    /// Break duration in minutes (1-30)
    #[serde(default = "default_break_minutes")]
    break_minutes: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl PomodoroConfig {
    /// Creates a configuration, clamping both values.
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        Self {
            focus_minutes: clamp_focus(focus_minutes),
            break_minutes: clamp_break(break_minutes),
        }
    }

    /// Returns the focus duration in minutes.
    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    /// Returns the break duration in minutes.
    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Returns the focus duration.
    pub fn focus_duration(&self) -> Duration {
        minutes(self.focus_minutes)
    }

    /// Returns the break duration.
    pub fn break_duration(&self) -> Duration {
        minutes(self.break_minutes)
    }

    /// Sets the focus duration, returning the clamped value actually stored.
    pub fn set_focus_minutes(&mut self, value: u32) -> u32 {
        self.focus_minutes = clamp_focus(value);
        self.focus_minutes
    }

    /// Sets the break duration, returning the clamped value actually stored.
    pub fn set_break_minutes(&mut self, value: u32) -> u32 {
        self.break_minutes = clamp_break(value);
        self.break_minutes
    }

    /// Moves the focus duration by `steps` steps of 5 minutes.
    pub fn step_focus(&mut self, steps: i32) -> u32 {
        let value = offset(self.focus_minutes, steps, FOCUS_MINUTES_STEP);
        self.set_focus_minutes(value)
    }

    /// Moves the break duration by `steps` minutes.
    pub fn step_break(&mut self, steps: i32) -> u32 {
        let value = offset(self.break_minutes, steps, BREAK_MINUTES_STEP);
        self.set_break_minutes(value)
    }

    /// Returns a copy with all values re-clamped (used after deserializing).
    pub fn normalized(self) -> Self {
        Self::new(self.focus_minutes, self.break_minutes)
    }
}

fn clamp_focus(value: u32) -> u32 {
    snap(value, FOCUS_MINUTES_MIN, FOCUS_MINUTES_MAX, FOCUS_MINUTES_STEP)
}

fn clamp_break(value: u32) -> u32 {
    snap(value, BREAK_MINUTES_MIN, BREAK_MINUTES_MAX, BREAK_MINUTES_STEP)
}

/// Clamps to `[min, max]` and rounds to the nearest multiple of `step`
/// counted from `min` (ties round up).
fn snap(value: u32, min: u32, max: u32, step: u32) -> u32 {
    let clamped = value.clamp(min, max);
    let steps = (clamped - min + step / 2) / step;
    (min + steps * step).min(max)
}

fn offset(value: u32, steps: i32, step: u32) -> u32 {
    let delta = i64::from(steps) * i64::from(step);
    (i64::from(value) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

fn minutes(value: u32) -> Duration {
    Duration::from_secs(u64::from(value) * 60)
}

// ============================================================================
// CountdownConfig
// ============================================================================

pub const COUNTDOWN_HOURS_MAX: u32 = 23;
pub const COUNTDOWN_MINUTES_MAX: u32 = 59;
pub const COUNTDOWN_SECONDS_MAX: u32 = 59;

/// Hours/minutes/seconds entered for the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default)]
    hours: u32,
    #[serde(default)]
    minutes: u32,
    #[serde(default)]
    seconds: u32,
}

impl CountdownConfig {
    /// Creates a configuration, clamping each field to its dial range.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours: hours.min(COUNTDOWN_HOURS_MAX),
            minutes: minutes.min(COUNTDOWN_MINUTES_MAX),
            seconds: seconds.min(COUNTDOWN_SECONDS_MAX),
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Total duration of the countdown.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(
            u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds),
        )
    }

    /// Returns true if the configuration amounts to zero time.
    pub fn is_zero(&self) -> bool {
        self.duration().is_zero()
    }

    /// Returns a copy with all values re-clamped (used after deserializing).
    pub fn normalized(self) -> Self {
        Self::new(self.hours, self.minutes, self.seconds)
    }
}

// ============================================================================
// TickConfig
// ============================================================================

fn default_stopwatch_tick_ms() -> u64 {
    10
}

fn default_countdown_tick_ms() -> u64 {
    1000
}

fn default_pomodoro_tick_ms() -> u64 {
    1000
}

/// Sampling periods for each tool.
///
/// The stopwatch shows centiseconds and samples finely; the countdown and
/// Pomodoro show whole seconds and sample coarsely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickConfig {
    #[serde(default = "default_stopwatch_tick_ms")]
    pub stopwatch_ms: u64,
    #[serde(default = "default_countdown_tick_ms")]
    pub countdown_ms: u64,
    #[serde(default = "default_pomodoro_tick_ms")]
    pub pomodoro_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            stopwatch_ms: default_stopwatch_tick_ms(),
            countdown_ms: default_countdown_tick_ms(),
            pomodoro_ms: default_pomodoro_tick_ms(),
        }
    }
}

impl TickConfig {
    pub fn stopwatch_period(&self) -> Duration {
        period(self.stopwatch_ms)
    }

    pub fn countdown_period(&self) -> Duration {
        period(self.countdown_ms)
    }

    pub fn pomodoro_period(&self) -> Duration {
        period(self.pomodoro_ms)
    }
}

// tokio's interval panics on a zero period
fn period(ms: u64) -> Duration {
    Duration::from_millis(ms.max(1))
}

// ============================================================================
// AppConfig
// ============================================================================

fn default_sound_enabled() -> bool {
    true
}

/// Everything the front-end needs to build the tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub ticks: TickConfig,
    /// Whether the completion alarm makes a sound
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Optional sound file played instead of the generated tone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_path: Option<std::path::PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pomodoro: PomodoroConfig::default(),
            countdown: CountdownConfig::default(),
            ticks: TickConfig::default(),
            sound_enabled: default_sound_enabled(),
            alarm_path: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
