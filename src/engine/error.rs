//! Engine error types.
//!
//! Every variant is an invalid transition: a command issued in a state that
//! does not support it. The engine leaves its state untouched when it returns
//! one of these, and the tools only log them.

use thiserror::Error;

use crate::types::{TimerMode, TimerStatus};

/// A command that was rejected because it does not apply in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `start` while already counting.
    #[error("timer is already running")]
    AlreadyRunning,

    /// `pause` while not counting.
    #[error("timer is not running (status: {0})")]
    NotRunning(TimerStatus),

    /// `start` on a session that completed and has not been acknowledged.
    #[error("timer has completed and is waiting for a decision")]
    AlreadyCompleted,

    /// `start` on a bounded session with no time left.
    #[error("nothing to run: remaining time is zero")]
    NothingToRun,

    /// `acknowledge` on a session that has not completed.
    #[error("timer has not completed (status: {0})")]
    NotCompleted(TimerStatus),

    /// `add_lap` at zero elapsed time.
    #[error("cannot record a lap at zero elapsed time")]
    ZeroElapsed,

    /// `add_lap` on a session that is not a stopwatch.
    #[error("laps are only recorded for the stopwatch, not {0}")]
    LapsUnsupported(TimerMode),

    /// Changing the duration of the mode that is currently running.
    #[error("cannot change the {0} duration while it is running")]
    ModeRunning(TimerMode),
}

impl EngineError {
    /// Returns true if the rejected command was a redundant repeat of the
    /// current state (e.g. pausing a paused timer).
    #[must_use]
    pub fn is_redundant(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRunning | Self::NotRunning(TimerStatus::Paused | TimerStatus::Idle)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::NotRunning(TimerStatus::Paused);
        assert!(err.to_string().contains("paused"));

        let err = EngineError::ModeRunning(TimerMode::Focus);
        assert!(err.to_string().contains("focus"));

        let err = EngineError::LapsUnsupported(TimerMode::Countdown);
        assert!(err.to_string().contains("countdown"));
    }

    #[test]
    fn test_is_redundant() {
        assert!(EngineError::AlreadyRunning.is_redundant());
        assert!(EngineError::NotRunning(TimerStatus::Paused).is_redundant());
        assert!(EngineError::NotRunning(TimerStatus::Idle).is_redundant());
        assert!(!EngineError::NotRunning(TimerStatus::Completed).is_redundant());
        assert!(!EngineError::NothingToRun.is_redundant());
        assert!(!EngineError::ZeroElapsed.is_redundant());
    }
}
