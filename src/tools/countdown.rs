//! Countdown tool.
//!
//! The countdown remembers the last duration the user entered. Reset and
//! "Restart" on completion go back to it; "Stop" on completion clears it.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::CountdownConfig;
use crate::engine::{EngineError, Tick, Ticker, TimerEngine, TimerEvent};
use crate::notifier::CompletionNotifier;
use crate::types::{Decision, Sample, TimerMode, TimerStatus};

use super::log_rejection;

/// A single bounded timer with an alarm on completion.
#[derive(Debug)]
pub struct Countdown<C: Clock, N: CompletionNotifier> {
    engine: TimerEngine<C>,
    notifier: N,
    ticker: Ticker,
    period: Duration,
    /// Duration loaded into the current session
    config: CountdownConfig,
    /// Duration restored by reset and restart
    last_config: CountdownConfig,
}

impl<C: Clock, N: CompletionNotifier> Countdown<C, N> {
    /// Creates an Idle countdown loaded with `config`.
    pub fn new(
        clock: C,
        config: CountdownConfig,
        period: Duration,
        notifier: N,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let config = config.normalized();
        let (ticker, tick_rx) = Ticker::new();
        let countdown = Self {
            engine: TimerEngine::new(
                TimerMode::Countdown,
                Some(config.duration()),
                clock,
                event_tx,
            ),
            notifier,
            ticker,
            period,
            config,
            last_config: config,
        };
        (countdown, tick_rx)
    }

    /// Loads a new duration, which also becomes the last configuration.
    ///
    /// # Errors
    ///
    /// Rejected while the countdown is running.
    pub fn set_duration(&mut self, config: CountdownConfig) -> Result<(), EngineError> {
        if self.engine.is_running() {
            return Err(EngineError::ModeRunning(TimerMode::Countdown));
        }
        let config = config.normalized();
        debug!(?config, "countdown duration set");

        self.ticker.cancel();
        self.notifier.cancel_playback();
        self.config = config;
        self.last_config = config;
        self.engine.reset(Some(config.duration()));
        Ok(())
    }

    /// Starts or resumes the countdown.
    ///
    /// With no time left, the last configuration is reloaded first.
    ///
    /// # Errors
    ///
    /// Rejected while running, or when there is nothing to reload.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let sample = self.engine.sample();
        if sample.status == TimerStatus::Idle && sample.is_exhausted() {
            if self.last_config.is_zero() {
                return Err(EngineError::NothingToRun);
            }
            self.reload_last();
        }
        self.engine.start()?;
        self.ticker.start(self.period);
        Ok(())
    }

    /// Pauses the countdown.
    ///
    /// # Errors
    ///
    /// Rejected unless running. A countdown that crossed zero since the last
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

    /// Reloads the last configuration, Idle.
    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.notifier.cancel_playback();
        self.reload_last();
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

        let decision = self.notifier.notify(TimerMode::Countdown).await;
        info!(?decision, "countdown completion resolved");

        match decision {
            Decision::Continue => {
                self.reload_last();
                if log_rejection("restart", self.engine.start()) {
                    self.ticker.start(self.period);
                }
            }
            Decision::Stop => {
                self.config = CountdownConfig::default();
                self.last_config = CountdownConfig::default();
                self.engine.reset(Some(Duration::ZERO));
            }
        }
        Some(decision)
    }

    pub fn sample(&self) -> Sample {
        self.engine.sample()
    }

    /// The duration loaded into the current session.
    pub fn config(&self) -> CountdownConfig {
        self.config
    }

    /// The duration reset and restart go back to.
    pub fn last_config(&self) -> CountdownConfig {
        self.last_config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Returns true while the tick source is active.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    fn reload_last(&mut self) {
        self.config = self.last_config;
        self.engine.reset(Some(self.last_config.duration()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notifier::MockNotifier;

    type TestCountdown = Countdown<ManualClock, MockNotifier>;

    fn create_countdown(
        config: CountdownConfig,
        decisions: &[Decision],
    ) -> (TestCountdown, ManualClock, mpsc::UnboundedReceiver<Tick>) {
        let clock = ManualClock::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let (countdown, ticks) = Countdown::new(
            clock.clone(),
            config,
            Duration::from_secs(1),
            MockNotifier::new(decisions.iter().copied()),
            tx,
        );
        (countdown, clock, ticks)
    }

    mod command_tests {
        use super::*;

        #[tokio::test]
        async fn test_start_at_zero_rejected() {
            let (mut countdown, _clock, _ticks) =
                create_countdown(CountdownConfig::default(), &[]);

            assert_eq!(countdown.start().unwrap_err(), EngineError::NothingToRun);
            assert!(!countdown.is_ticking());
        }

        #[tokio::test]
        async fn test_set_duration_loads_session() {
            let (mut countdown, _clock, _ticks) =
                create_countdown(CountdownConfig::default(), &[]);

            countdown.set_duration(CountdownConfig::new(0, 1, 30)).unwrap();

            assert_eq!(countdown.sample().remaining, Some(Duration::from_secs(90)));
            assert_eq!(countdown.last_config(), CountdownConfig::new(0, 1, 30));
        }

        #[tokio::test]
        async fn test_set_duration_clamps() {
            let (mut countdown, _clock, _ticks) =
                create_countdown(CountdownConfig::default(), &[]);

            countdown.set_duration(CountdownConfig::new(99, 99, 99)).unwrap();

            assert_eq!(
                countdown.sample().remaining,
                Some(Duration::from_secs(23 * 3600 + 59 * 60 + 59))
            );
        }

        #[tokio::test]
        async fn test_set_duration_while_running_rejected() {
            let (mut countdown, _clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 5, 0), &[]);
            countdown.start().unwrap();

            assert_eq!(
                countdown.set_duration(CountdownConfig::new(0, 1, 0)).unwrap_err(),
                EngineError::ModeRunning(TimerMode::Countdown)
            );
            assert_eq!(countdown.config(), CountdownConfig::new(0, 5, 0));
        }

        #[tokio::test]
        async fn test_set_duration_while_paused_reloads() {
            let (mut countdown, clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 5, 0), &[]);
            countdown.start().unwrap();
            clock.advance_secs(30);
            countdown.pause().unwrap();

            countdown.set_duration(CountdownConfig::new(0, 2, 0)).unwrap();

            let sample = countdown.sample();
            assert_eq!(sample.status, TimerStatus::Idle);
            assert_eq!(sample.remaining, Some(Duration::from_secs(120)));
        }

        #[tokio::test]
        async fn test_reset_reloads_last_config() {
            let (mut countdown, clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 0, 45), &[]);
            countdown.start().unwrap();
            clock.advance_secs(20);

            countdown.reset();

            let sample = countdown.sample();
            assert_eq!(sample.status, TimerStatus::Idle);
            assert_eq!(sample.remaining, Some(Duration::from_secs(45)));
            assert!(!countdown.is_ticking());
            assert_eq!(countdown.notifier().cancel_count(), 1);
        }

        #[tokio::test]
        async fn test_pause_and_resume_keep_remaining() {
            let (mut countdown, clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 1, 0), &[]);
            countdown.toggle().unwrap();
            clock.advance_secs(15);
            countdown.toggle().unwrap();
            clock.advance_secs(100);
            countdown.toggle().unwrap();
            clock.advance_secs(5);

            assert_eq!(countdown.sample().remaining, Some(Duration::from_secs(40)));
        }
    }

    mod completion_tests {
        use super::*;

        #[tokio::test]
        async fn test_restart_on_continue() {
            let (mut countdown, clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 0, 10), &[Decision::Continue]);
            countdown.start().unwrap();
            clock.advance_secs(12);

            let decision = countdown.poll().await;

            assert_eq!(decision, Some(Decision::Continue));
            let sample = countdown.sample();
            assert_eq!(sample.status, TimerStatus::Running);
            assert_eq!(sample.remaining, Some(Duration::from_secs(10)));
            assert!(countdown.is_ticking());
            assert_eq!(countdown.notifier().notified(), &[TimerMode::Countdown]);
        }

        #[tokio::test]
        async fn test_stop_clears_duration() {
            let (mut countdown, clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 0, 10), &[Decision::Stop]);
            countdown.start().unwrap();
            clock.advance_secs(10);

            assert_eq!(countdown.poll().await, Some(Decision::Stop));

            let sample = countdown.sample();
            assert_eq!(sample.status, TimerStatus::Idle);
            assert_eq!(sample.remaining, Some(Duration::ZERO));
            assert!(countdown.last_config().is_zero());
            assert!(!countdown.is_ticking());
            assert_eq!(countdown.start().unwrap_err(), EngineError::NothingToRun);
        }

        #[tokio::test]
        async fn test_poll_before_zero_does_nothing() {
            let (mut countdown, clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 0, 10), &[]);
            countdown.start().unwrap();
            clock.advance_secs(9);

            assert_eq!(countdown.poll().await, None);
            assert_eq!(countdown.notifier().notification_count(), 0);
        }

        #[tokio::test]
        async fn test_pause_after_zero_completes_on_poll() {
            let (mut countdown, clock, _ticks) =
                create_countdown(CountdownConfig::new(0, 0, 10), &[Decision::Stop]);
            countdown.start().unwrap();
            clock.advance_secs(11);

            assert_eq!(
                countdown.pause().unwrap_err(),
                EngineError::AlreadyCompleted
            );
            assert_eq!(countdown.poll().await, Some(Decision::Stop));
            assert_eq!(countdown.notifier().notification_count(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_completion_through_ticks() {
            let (mut countdown, clock, mut ticks) =
                create_countdown(CountdownConfig::new(0, 0, 3), &[]);
            countdown.start().unwrap();

            let mut completions = 0;
            for _ in 0..3 {
                let tick = ticks.recv().await.unwrap();
                clock.advance_secs(1);
                countdown.handle_tick(tick).await;
                completions = countdown.notifier().notification_count();
            }

            assert_eq!(completions, 1);
            assert!(!countdown.is_ticking());
        }
    }
}
