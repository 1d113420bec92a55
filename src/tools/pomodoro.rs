//! Pomodoro cycle: alternating focus and break sessions over one engine.
//!
//! ```text
//!            start/pause                  Continue
//!   ┌──────┐ ─────────▶ ┌─────────┐ zero ┌────────────┐ ─────▶ next phase, Running
//!   │ Idle │            │ Running │ ───▶ │ notify     │
//!   └──────┘ ◀───────── └─────────┘      │ (awaiting) │ ─────▶ same phase, Idle, 00:00
//!             reset/switch_mode          └────────────┘  Stop
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::PomodoroConfig;
use crate::engine::{EngineError, Tick, Ticker, TimerEngine, TimerEvent};
use crate::notifier::CompletionNotifier;
use crate::types::{Decision, Sample, TimerMode, TimerStatus};

use super::log_rejection;

/// Which half of the cycle is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    #[default]
    Focus,
    Break,
}

impl PomodoroPhase {
    /// The phase that follows this one.
    pub fn next(&self) -> Self {
        match self {
            PomodoroPhase::Focus => PomodoroPhase::Break,
            PomodoroPhase::Break => PomodoroPhase::Focus,
        }
    }
}

impl From<PomodoroPhase> for TimerMode {
    fn from(phase: PomodoroPhase) -> Self {
        match phase {
            PomodoroPhase::Focus => TimerMode::Focus,
            PomodoroPhase::Break => TimerMode::Break,
        }
    }
}

impl fmt::Display for PomodoroPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&TimerMode::from(*self), f)
    }
}

/// The focus/break cycle.
#[derive(Debug)]
pub struct PomodoroCycle<C: Clock, N: CompletionNotifier> {
    engine: TimerEngine<C>,
    notifier: N,
    ticker: Ticker,
    period: Duration,
    config: PomodoroConfig,
}

impl<C: Clock, N: CompletionNotifier> PomodoroCycle<C, N> {
    /// Creates an Idle cycle in the focus phase.
    pub fn new(
        clock: C,
        config: PomodoroConfig,
        period: Duration,
        notifier: N,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let config = config.normalized();
        let (ticker, tick_rx) = Ticker::new();
        let cycle = Self {
            engine: TimerEngine::new(
                TimerMode::Focus,
                Some(config.focus_duration()),
                clock,
                event_tx,
            ),
            notifier,
            ticker,
            period,
            config,
        };
        (cycle, tick_rx)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PomodoroPhase {
        match self.engine.mode() {
            TimerMode::Break => PomodoroPhase::Break,
            _ => PomodoroPhase::Focus,
        }
    }

    pub fn sample(&self) -> Sample {
        self.engine.sample()
    }

    pub fn config(&self) -> PomodoroConfig {
        self.config
    }

    /// Configured length of `phase`.
    pub fn duration_of(&self, phase: PomodoroPhase) -> Duration {
        match phase {
            PomodoroPhase::Focus => self.config.focus_duration(),
            PomodoroPhase::Break => self.config.break_duration(),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Returns true while the tick source is active.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switches to `phase` at its full configured duration, Idle.
    ///
    /// Always allowed, even while running.
    pub fn switch_mode(&mut self, phase: PomodoroPhase) {
        self.ticker.cancel();
        self.notifier.cancel_playback();
        let duration = self.duration_of(phase);
        self.engine.switch_mode(phase.into(), Some(duration));
        debug!(%phase, "pomodoro phase switched");
    }

    /// Starts or resumes the current phase.
    ///
    /// A phase stopped at zero is reloaded to its full duration first.
    ///
    /// # Errors
    ///
    /// Rejected while running.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let sample = self.engine.sample();
        if sample.status == TimerStatus::Idle && sample.is_exhausted() {
            let duration = self.duration_of(self.phase());
            self.engine.reset(Some(duration));
        }
        self.engine.start()?;
        self.ticker.start(self.period);
        Ok(())
    }

    /// Pauses the current phase.
    ///
    /// # Errors
    ///
    /// Rejected unless running. A phase that crossed zero since the last
    /// check completes instead; resolve it with [`poll`](Self::poll).
    pub fn pause(&mut self) -> Result<(), EngineError> {
        self.ticker.cancel();
        self.engine.pause()
    }

    /// The play/pause button.
    ///
    /// # Errors
    ///
    /// Propagates the rejection of the underlying command.
    pub fn toggle(&mut self) -> Result<(), EngineError> {
        if self.engine.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to the full configured duration of the current phase, Idle.
    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.notifier.cancel_playback();
        let duration = self.duration_of(self.phase());
        self.engine.reset(Some(duration));
    }

    /// Sets the focus length in minutes, returning the clamped value.
    ///
    /// # Errors
    ///
    /// Rejected while a focus session is running.
    pub fn set_focus_duration(&mut self, minutes: u32) -> Result<u32, EngineError> {
        self.update_config(PomodoroPhase::Focus, |config| {
            config.set_focus_minutes(minutes)
        })
    }

    /// Sets the break length in minutes, returning the clamped value.
    ///
    /// # Errors
    ///
    /// Rejected while a break is running.
    pub fn set_break_duration(&mut self, minutes: u32) -> Result<u32, EngineError> {
        self.update_config(PomodoroPhase::Break, |config| {
            config.set_break_minutes(minutes)
        })
    }

    /// Moves the focus length by `steps` increments of five minutes.
    ///
    /// # Errors
    ///
    /// Rejected while a focus session is running.
    pub fn step_focus(&mut self, steps: i32) -> Result<u32, EngineError> {
        self.update_config(PomodoroPhase::Focus, |config| config.step_focus(steps))
    }

    /// Moves the break length by `steps` minutes.
    ///
    /// # Errors
    ///
    /// Rejected while a break is running.
    pub fn step_break(&mut self, steps: i32) -> Result<u32, EngineError> {
        self.update_config(PomodoroPhase::Break, |config| config.step_break(steps))
    }

    /// Handles one tick: completion check, then a fresh sample.
    ///
    /// Returns None for a stale tick.
    pub async fn handle_tick(&mut self, tick: Tick) -> Option<Sample> {
        if !self.ticker.accept(tick) {
            return None;
        }
        self.poll().await;
        Some(self.engine.sample())
    }

    /// Checks for completion and, when it happened, asks the notifier and
    /// applies the decision.
    ///
    /// Returns the decision if a completion was resolved.
    pub async fn poll(&mut self) -> Option<Decision> {
        if !self.engine.check_completion() && self.engine.status() != TimerStatus::Completed {
            return None;
        }
        self.ticker.cancel();

        let completed = self.phase();
        let decision = self.notifier.notify(completed.into()).await;
        info!(phase = %completed, ?decision, "pomodoro completion resolved");

        match decision {
            Decision::Continue => {
                let next = completed.next();
                let duration = self.duration_of(next);
                self.engine.switch_mode(next.into(), Some(duration));
                if log_rejection("continue", self.engine.start()) {
                    self.ticker.start(self.period);
                }
            }
            Decision::Stop => {
                log_rejection("stop", self.engine.acknowledge());
            }
        }
        Some(decision)
    }

    fn update_config(
        &mut self,
        phase: PomodoroPhase,
        apply: impl FnOnce(&mut PomodoroConfig) -> u32,
    ) -> Result<u32, EngineError> {
        if self.phase() == phase && self.engine.is_running() {
            return Err(EngineError::ModeRunning(phase.into()));
        }

        let minutes = apply(&mut self.config);
        debug!(%phase, minutes, "pomodoro duration set");

        if self.phase() == phase && self.engine.status() == TimerStatus::Idle {
            let duration = self.duration_of(phase);
            self.engine.reset(Some(duration));
        }
        Ok(minutes)
    }
}
