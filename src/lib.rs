//! Timekeeper Library
//!
//! Three time-measurement tools sharing one timer engine:
//! - Stopwatch with labeled laps
//! - Countdown with an alarm and restart/stop decision
//! - Pomodoro focus/break cycle
//!
//! It includes:
//! - A drift-free timer engine driven by an injectable clock
//! - A cancellable tick source built on tokio
//! - Completion notification with alarm playback and a decision prompt
//! - Configuration types with clamped durations
//! - CLI command parsing, display utilities and interactive sessions

pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod notifier;
pub mod sound;
pub mod tools;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, CountdownConfig, PomodoroConfig, TickConfig};
pub use engine::{EngineError, LapRecorder, Tick, Ticker, TimerEngine, TimerEvent};
pub use types::{Decision, LapRecord, Sample, TimeFormat, TimerMode, TimerStatus};

// Re-export notifier types
pub use notifier::{
    AlarmNotifier, CompletionNotifier, DecisionPrompt, MockNotifier, PromptContent,
    ScriptedPrompt,
};

// Re-export sound types
pub use sound::{
    MockSoundPlayer, Playback, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource,
};

// Re-export tools
pub use tools::{Countdown, PomodoroCycle, PomodoroPhase, Stopwatch};
