//! Lap bookkeeping for the stopwatch.

use std::collections::VecDeque;

use tracing::debug;

use crate::clock::Clock;
use crate::types::{LapRecord, TimerMode};

use super::error::EngineError;
use super::timer::TimerEngine;

/// Ordered laps, newest first.
///
/// Ordinals follow creation order and restart at 1 only after [`clear`].
///
/// [`clear`]: LapRecorder::clear
#[derive(Debug, Default)]
pub struct LapRecorder {
    laps: VecDeque<LapRecord>,
    next_ordinal: u32,
}

impl LapRecorder {
    pub fn new() -> Self {
        Self {
            laps: VecDeque::new(),
            next_ordinal: 1,
        }
    }

    /// Records the stopwatch's current elapsed time as a new lap.
    ///
    /// # Errors
    ///
    /// Rejected at zero elapsed time, or for an engine that is not a
    /// stopwatch. The recorder is unchanged on rejection.
    pub fn add_lap<C: Clock>(
        &mut self,
        engine: &TimerEngine<C>,
        label: Option<&str>,
    ) -> Result<&LapRecord, EngineError> {
        if engine.mode() != TimerMode::Stopwatch {
            return Err(EngineError::LapsUnsupported(engine.mode()));
        }

        let elapsed = engine.elapsed();
        if elapsed.is_zero() {
            return Err(EngineError::ZeroElapsed);
        }

        // Default::default() leaves the counter at 0
        let ordinal = self.next_ordinal.max(1);
        self.next_ordinal = ordinal + 1;

        let lap = LapRecord::new(ordinal, elapsed, label);
        debug!(ordinal, ?elapsed, label = %lap.label, "lap recorded");
        self.laps.push_front(lap);

        Ok(&self.laps[0])
    }

    /// Drops all laps and restarts numbering at 1.
    pub fn clear(&mut self) {
        self.laps.clear();
        self.next_ordinal = 1;
    }

    /// Iterates laps in display order (newest first).
    pub fn iter(&self) -> impl Iterator<Item = &LapRecord> {
        self.laps.iter()
    }

    /// Returns the most recent lap.
    pub fn latest(&self) -> Option<&LapRecord> {
        self.laps.front()
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    /// Copies the laps out in display order.
    pub fn to_vec(&self) -> Vec<LapRecord> {
        self.laps.iter().cloned().collect()
    }
}
