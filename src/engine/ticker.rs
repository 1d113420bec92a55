//! Periodic tick source.
//!
//! A [`Ticker`] owns at most one tokio task driving an interval. Each tick
//! carries the generation it was produced under; cancelling or restarting
//! bumps the generation, so ticks already queued in the channel are
//! recognised as stale and dropped by [`Ticker::accept`].

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::trace;

/// One tick from the interval task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Generation of the tick source that produced this tick
    pub generation: u64,
}

/// Cancellable, restartable tick source.
#[derive(Debug)]
pub struct Ticker {
    /// Running interval task, if any
    handle: Option<JoinHandle<()>>,
    /// Generation of the current source
    generation: u64,
    /// Sender cloned into every task
    tick_tx: mpsc::UnboundedSender<Tick>,
}

impl Ticker {
    /// Creates an inactive ticker and the receiver its ticks arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        (
            Self {
                handle: None,
                generation: 0,
                tick_tx,
            },
            tick_rx,
        )
    }

    /// Starts ticking every `period`, cancelling any previous source first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, period: Duration) {
        self.cancel();

        let generation = self.generation;
        let tick_tx = self.tick_tx.clone();
        trace!(generation, ?period, "tick source started");

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick of an interval completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tick_tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stops the current source. Ticks it already queued become stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            trace!(generation = self.generation, "tick source cancelled");
        }
        self.generation += 1;
    }

    /// Returns true if a source is active.
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns true if `tick` came from the current, still active source.
    pub fn accept(&self, tick: Tick) -> bool {
        self.is_active() && tick.generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_arrive_at_period() {
        let (mut ticker, mut rx) = Ticker::new();
        ticker.start(Duration::from_millis(100));

        let tick = rx.recv().await.unwrap();

        assert!(ticker.accept(tick));
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactive_ticker_sends_nothing() {
        let (ticker, mut rx) = Ticker::new();

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(!ticker.is_active());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_makes_queued_ticks_stale() {
        let (mut ticker, mut rx) = Ticker::new();
        ticker.start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(35)).await;

        ticker.cancel();

        let mut received = 0;
        while let Ok(tick) = rx.try_recv() {
            received += 1;
            assert!(!ticker.accept(tick));
        }
        assert!(received >= 1);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_source() {
        let (mut ticker, mut rx) = Ticker::new();
        ticker.start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(25)).await;

        ticker.start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(25)).await;

        let mut current = 0;
        let mut stale = 0;
        while let Ok(tick) = rx.try_recv() {
            if ticker.accept(tick) {
                current += 1;
            } else {
                stale += 1;
            }
        }
        assert!(stale >= 1);
        assert!(current >= 1);
        // one source at a time: never more current ticks than periods elapsed
        assert!(current <= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_source_stops_sending() {
        let (mut ticker, mut rx) = Ticker::new();
        ticker.start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(15)).await;
        ticker.cancel();
        while rx.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(rx.try_recv().is_err());
    }
}
