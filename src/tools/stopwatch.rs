//! Stopwatch tool: elapsed time with laps.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::clock::Clock;
use crate::engine::{EngineError, LapRecorder, Tick, Ticker, TimerEngine, TimerEvent};
use crate::types::{LapRecord, Sample};

/// Open-ended timer with labeled laps, sampled on a fine tick.
#[derive(Debug)]
pub struct Stopwatch<C: Clock> {
    engine: TimerEngine<C>,
    laps: LapRecorder,
    ticker: Ticker,
    period: Duration,
}

impl<C: Clock> Stopwatch<C> {
    /// Creates an Idle stopwatch and the receiver its ticks arrive on.
    pub fn new(
        clock: C,
        period: Duration,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (ticker, tick_rx) = Ticker::new();
        let stopwatch = Self {
            engine: TimerEngine::stopwatch(clock, event_tx),
            laps: LapRecorder::new(),
            ticker,
            period,
        };
        (stopwatch, tick_rx)
    }

    /// Starts or resumes counting.
    ///
    /// # Errors
    ///
    /// Rejected while already running.
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.engine.start()?;
        self.ticker.start(self.period);
        Ok(())
    }

    /// Pauses counting.
    ///
    /// # Errors
    ///
    /// Rejected unless running.
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

    /// Zeroes the stopwatch and drops every lap.
    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.engine.reset(None);
        self.laps.clear();
    }

    /// Records a lap at the current elapsed time.
    ///
    /// # Errors
    ///
    /// Rejected at zero elapsed time.
    pub fn add_lap(&mut self, label: Option<&str>) -> Result<LapRecord, EngineError> {
        let lap = self.laps.add_lap(&self.engine, label)?;
        Ok(lap.clone())
    }

    /// Returns a fresh sample for a tick from the current source.
    pub fn handle_tick(&mut self, tick: Tick) -> Option<Sample> {
        if !self.ticker.accept(tick) {
            debug!(generation = tick.generation, "stale tick dropped");
            return None;
        }
        Some(self.engine.sample())
    }

    pub fn sample(&self) -> Sample {
        self.engine.sample()
    }

    /// Laps, newest first.
    pub fn laps(&self) -> &LapRecorder {
        &self.laps
    }

    /// Returns true while the tick source is active.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::TimerStatus;

    fn create_stopwatch() -> (
        Stopwatch<ManualClock>,
        ManualClock,
        mpsc::UnboundedReceiver<Tick>,
    ) {
        let clock = ManualClock::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let (stopwatch, ticks) = Stopwatch::new(clock.clone(), Duration::from_millis(10), tx);
        (stopwatch, clock, ticks)
    }

    #[tokio::test]
    async fn test_start_pause_cycle() {
        let (mut stopwatch, clock, _ticks) = create_stopwatch();

        stopwatch.start().unwrap();
        assert!(stopwatch.is_ticking());
        clock.advance_millis(1500);
        stopwatch.pause().unwrap();
        clock.advance_secs(10);

        let sample = stopwatch.sample();
        assert_eq!(sample.status, TimerStatus::Paused);
        assert_eq!(sample.elapsed, Duration::from_millis(1500));
        assert!(!stopwatch.is_ticking());
    }

    #[tokio::test]
    async fn test_toggle() {
        let (mut stopwatch, _clock, _ticks) = create_stopwatch();

        stopwatch.toggle().unwrap();
        assert_eq!(stopwatch.sample().status, TimerStatus::Running);

        stopwatch.toggle().unwrap();
        assert_eq!(stopwatch.sample().status, TimerStatus::Paused);
    }

    #[tokio::test]
    async fn test_redundant_commands_rejected() {
        let (mut stopwatch, _clock, _ticks) = create_stopwatch();

        assert!(stopwatch.pause().unwrap_err().is_redundant());
        stopwatch.start().unwrap();
        assert_eq!(stopwatch.start().unwrap_err(), EngineError::AlreadyRunning);
    }

    #[tokio::test]
    async fn test_reset_clears_laps() {
        let (mut stopwatch, clock, _ticks) = create_stopwatch();
        stopwatch.start().unwrap();
        clock.advance_secs(3);
        stopwatch.add_lap(Some("first")).unwrap();

        stopwatch.reset();

        assert!(stopwatch.laps().is_empty());
        assert_eq!(stopwatch.sample().elapsed, Duration::ZERO);
        assert_eq!(stopwatch.sample().status, TimerStatus::Idle);
        assert!(!stopwatch.is_ticking());
    }

    #[tokio::test]
    async fn test_add_lap_at_zero_rejected() {
        let (mut stopwatch, _clock, _ticks) = create_stopwatch();

        assert_eq!(
            stopwatch.add_lap(None).unwrap_err(),
            EngineError::ZeroElapsed
        );
    }

    #[tokio::test]
    async fn test_lap_returns_record() {
        let (mut stopwatch, clock, _ticks) = create_stopwatch();
        stopwatch.start().unwrap();
        clock.advance_secs(7);

        let lap = stopwatch.add_lap(None).unwrap();

        assert_eq!(lap.ordinal, 1);
        assert_eq!(lap.label, "Lap 1");
        assert_eq!(lap.elapsed, Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_tick_after_pause_is_dropped() {
        let (mut stopwatch, _clock, mut ticks) = create_stopwatch();
        stopwatch.start().unwrap();
        let tick = ticks.recv().await.unwrap();
        assert!(stopwatch.handle_tick(tick).is_some());

        tokio::time::sleep(Duration::from_millis(25)).await;
        stopwatch.pause().unwrap();

        while let Ok(tick) = ticks.try_recv() {
            assert!(stopwatch.handle_tick(tick).is_none());
        }
    }
}
