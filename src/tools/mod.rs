//! The three time-measurement tools.
//!
//! Each tool owns one [`TimerEngine`](crate::engine::TimerEngine) and one
//! [`Ticker`](crate::engine::Ticker):
//! - `stopwatch`: open-ended elapsed time with laps
//! - `countdown`: one bounded timer that remembers its last configuration
//! - `pomodoro`: the focus/break cycle
//!
//! Commands return `Result<_, EngineError>`; front-ends pass the result
//! through [`log_rejection`] so a rejected command never reaches the user.

pub mod countdown;
pub mod pomodoro;
pub mod stopwatch;

use tracing::{debug, trace};

use crate::engine::EngineError;

pub use countdown::Countdown;
pub use pomodoro::{PomodoroCycle, PomodoroPhase};
pub use stopwatch::Stopwatch;

/// Logs a rejected command and reports whether it was applied.
///
/// Redundant repeats (pausing a paused timer) are logged at trace level.
pub fn log_rejection<T>(command: &str, result: Result<T, EngineError>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) if e.is_redundant() => {
            trace!(command, "ignored: {}", e);
            false
        }
        Err(e) => {
            debug!(command, "rejected: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerStatus;

    #[test]
    fn test_log_rejection() {
        assert!(log_rejection("start", Ok(())));
        assert!(!log_rejection::<()>("start", Err(EngineError::AlreadyRunning)));
        assert!(!log_rejection::<()>(
            "pause",
            Err(EngineError::NotRunning(TimerStatus::Completed))
        ));
    }
}
