//! Timer engine shared by the stopwatch, the countdown and the Pomodoro cycle.
//!
//! The engine tracks one session:
//! - State transitions (Idle → Running ⇄ Paused → Completed)
//! - Elapsed time derived from an anchor instant, never accumulated per tick
//! - Remaining time for bounded sessions, floored at zero
//! - A completion event fired exactly once per crossing of the target
//!
//! Sampling is a pure function of the anchor and the clock, so irregular or
//! missed ticks neither lose nor gain time.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::types::{Sample, TimerMode, TimerStatus};

use super::error::EngineError;

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine on every successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Session started or resumed
    Started {
        /// Session mode
        mode: TimerMode,
        /// Elapsed time carried into the new running period
        elapsed: Duration,
    },
    /// Session paused
    Paused {
        /// Session mode
        mode: TimerMode,
        /// Elapsed time banked by the pause
        elapsed: Duration,
    },
    /// Session reset to Idle
    Reset {
        /// Session mode
        mode: TimerMode,
        /// New target (None for the stopwatch)
        target: Option<Duration>,
    },
    /// Bounded session reached its target
    Completed {
        /// Session mode
        mode: TimerMode,
    },
    /// Completion acknowledged without continuing
    Acknowledged {
        /// Session mode
        mode: TimerMode,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Drift-free timer for one session.
pub struct TimerEngine<C: Clock> {
    /// Time source
    clock: C,
    /// Session mode
    mode: TimerMode,
    /// Current status
    status: TimerStatus,
    /// Target for bounded sessions
    target: Option<Duration>,
    /// `now - accumulated` at the moment the current running period began.
    /// Some exactly while Running.
    anchor: Option<Instant>,
    /// Elapsed time banked from previous running periods
    accumulated: Duration,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl<C: Clock> TimerEngine<C> {
    /// Creates an Idle engine.
    ///
    /// Bounded modes get `target` (zero if None); the stopwatch ignores it.
    pub fn new(
        mode: TimerMode,
        target: Option<Duration>,
        clock: C,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let target = mode.is_bounded().then(|| target.unwrap_or_default());
        Self {
            clock,
            mode,
            status: TimerStatus::Idle,
            target,
            anchor: None,
            accumulated: Duration::ZERO,
            event_tx,
        }
    }

    /// Creates an Idle stopwatch engine.
    pub fn stopwatch(clock: C, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self::new(TimerMode::Stopwatch, None, clock, event_tx)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn target(&self) -> Option<Duration> {
        self.target
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Returns the elapsed time right now.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(self.clock.now())
    }

    /// Returns the remaining time right now (None for the stopwatch).
    pub fn remaining(&self) -> Option<Duration> {
        let elapsed = self.elapsed();
        self.target.map(|target| target.saturating_sub(elapsed))
    }

    /// Reads the session without mutating it.
    ///
    /// A running session past its target reports zero remaining but stays
    /// Running until [`check_completion`](Self::check_completion) observes it.
    pub fn sample(&self) -> Sample {
        let elapsed = self.elapsed();
        Sample {
            mode: self.mode,
            status: self.status,
            elapsed,
            target: self.target,
            remaining: self.target.map(|target| target.saturating_sub(elapsed)),
        }
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        match self.anchor {
            Some(anchor) => now.saturating_duration_since(anchor),
            None => self.accumulated,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Starts or resumes the session.
    ///
    /// # Errors
    ///
    /// Rejected while Running or Completed, and for a bounded session with
    /// no remaining time.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.status {
            TimerStatus::Running => return Err(EngineError::AlreadyRunning),
            TimerStatus::Completed => return Err(EngineError::AlreadyCompleted),
            TimerStatus::Idle | TimerStatus::Paused => {}
        }

        if let Some(target) = self.target {
            if self.accumulated >= target {
                return Err(EngineError::NothingToRun);
            }
        }

        let now = self.clock.now();
        // accumulated never exceeds time already observed on this clock
        let anchor = now.checked_sub(self.accumulated).unwrap_or(now);

        self.anchor = Some(anchor);
        self.status = TimerStatus::Running;
        debug!(mode = %self.mode, elapsed = ?self.accumulated, "timer started");

        self.emit(TimerEvent::Started {
            mode: self.mode,
            elapsed: self.accumulated,
        });
        Ok(())
    }

    /// Pauses the session, banking the elapsed time.
    ///
    /// If the target was crossed since the last check the session completes
    /// instead, and the pause is reported as rejected.
    ///
    /// # Errors
    ///
    /// Rejected unless Running.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        if self.status != TimerStatus::Running {
            return Err(EngineError::NotRunning(self.status));
        }

        if self.check_completion() {
            return Err(EngineError::AlreadyCompleted);
        }

        let elapsed = self.elapsed_at(self.clock.now());
        self.accumulated = elapsed;
        self.anchor = None;
        self.status = TimerStatus::Paused;
        debug!(mode = %self.mode, ?elapsed, "timer paused");

        self.emit(TimerEvent::Paused {
            mode: self.mode,
            elapsed,
        });
        Ok(())
    }

    /// Starts when not running, pauses when running.
    ///
    /// # Errors
    ///
    /// Propagates the rejection of the underlying command.
    pub fn toggle(&mut self) -> Result<(), EngineError> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Returns the session to Idle with zero elapsed time.
    ///
    /// Valid from any state. For bounded sessions `target` replaces the
    /// current target; None keeps it.
    pub fn reset(&mut self, target: Option<Duration>) {
        if self.mode.is_bounded() {
            if let Some(target) = target {
                self.target = Some(target);
            }
        }
        self.accumulated = Duration::ZERO;
        self.anchor = None;
        self.status = TimerStatus::Idle;
        debug!(mode = %self.mode, target = ?self.target, "timer reset");

        self.emit(TimerEvent::Reset {
            mode: self.mode,
            target: self.target,
        });
    }

    /// Replaces the session with a fresh Idle one in `mode`.
    ///
    /// `target` applies to bounded modes only. Emits `Reset` for the new mode.
    pub fn switch_mode(&mut self, mode: TimerMode, target: Option<Duration>) {
        self.mode = mode;
        self.target = mode.is_bounded().then(|| target.unwrap_or_default());
        self.reset(None);
    }

    /// Periodic completion check.
    ///
    /// Returns true only on the call that moves a running bounded session
    /// into Completed. Later calls return false until the session runs again.
    pub fn check_completion(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };
        if self.elapsed_at(self.clock.now()) < target {
            return false;
        }

        self.accumulated = target;
        self.anchor = None;
        self.status = TimerStatus::Completed;
        debug!(mode = %self.mode, "timer completed");

        self.emit(TimerEvent::Completed { mode: self.mode });
        true
    }

    /// Leaves Completed for Idle while keeping the remaining time at zero.
    ///
    /// # Errors
    ///
    /// Rejected unless Completed.
    pub fn acknowledge(&mut self) -> Result<(), EngineError> {
        if self.status != TimerStatus::Completed {
            return Err(EngineError::NotCompleted(self.status));
        }
        self.status = TimerStatus::Idle;
        debug!(mode = %self.mode, "completion acknowledged");

        self.emit(TimerEvent::Acknowledged { mode: self.mode });
        Ok(())
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            trace!("timer event receiver dropped");
        }
    }
}

impl<C: Clock> std::fmt::Debug for TimerEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("mode", &self.mode)
            .field("status", &self.status)
            .field("target", &self.target)
            .field("accumulated", &self.accumulated)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
