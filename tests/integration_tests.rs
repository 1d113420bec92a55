//! Integration tests for the timer engine and lap recorder.
//!
//! These tests drive the engine through its public API with a hand-driven
//! clock and check the timing properties every tool relies on:
//! - elapsed time is rebuilt from the anchor, never accumulated per sample
//! - remaining time is floored at zero
//! - completion fires once per running period that crosses the target
//! - laps are numbered in creation order and listed newest first

use std::time::Duration;

use tokio::sync::mpsc;

use timekeeper::clock::ManualClock;
use timekeeper::engine::{EngineError, LapRecorder, TimerEngine, TimerEvent};
use timekeeper::types::{LapRecord, TimeFormat, TimerMode, TimerStatus};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_engine(
    mode: TimerMode,
    target: Option<Duration>,
) -> (
    TimerEngine<ManualClock>,
    ManualClock,
    mpsc::UnboundedReceiver<TimerEvent>,
) {
    let clock = ManualClock::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(mode, target, clock.clone(), tx);
    (engine, clock, rx)
}

fn count_completions(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> usize {
    let mut completions = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, TimerEvent::Completed { .. }) {
            completions += 1;
        }
    }
    completions
}

// ============================================================================
// Drift
// ============================================================================

mod drift_integration {
    use super::*;

    /// Irregular gaps between samples, in milliseconds.
    const GAPS_MS: [u64; 8] = [3, 997, 10, 1503, 1, 250, 4000, 17];

    #[test]
    fn elapsed_equals_sum_of_running_periods() {
        let (mut engine, clock, _rx) = create_engine(TimerMode::Stopwatch, None);
        let mut expected = Duration::ZERO;

        for (round, gap) in GAPS_MS.iter().enumerate() {
            engine.start().unwrap();
            // sample an uneven number of times inside each running period
            for _ in 0..=round {
                clock.advance_millis(*gap);
                expected += Duration::from_millis(*gap);
                let _ = engine.sample();
            }
            engine.pause().unwrap();

            // paused time never counts
            clock.advance_millis(gap * 7);
        }

        assert_eq!(engine.sample().elapsed, expected);
    }

    #[test]
    fn elapsed_independent_of_sampling() {
        let (mut sampled, clock_a, _rx_a) = create_engine(TimerMode::Stopwatch, None);
        let (mut unsampled, clock_b, _rx_b) = create_engine(TimerMode::Stopwatch, None);

        sampled.start().unwrap();
        unsampled.start().unwrap();
        for gap in GAPS_MS {
            clock_a.advance_millis(gap);
            clock_b.advance_millis(gap);
            let _ = sampled.sample();
        }

        assert_eq!(sampled.elapsed(), unsampled.elapsed());
    }

    #[test]
    fn countdown_remaining_tracks_wall_time() {
        let (mut engine, clock, _rx) =
            create_engine(TimerMode::Countdown, Some(Duration::from_secs(60)));
        engine.start().unwrap();

        // one slow tick of 2.5 s instead of the expected 1 s
        clock.advance_millis(2500);
        let _ = engine.check_completion();

        assert_eq!(
            engine.sample().remaining,
            Some(Duration::from_millis(57_500))
        );
    }
}

// ============================================================================
// Remaining / completion
// ============================================================================

mod completion_integration {
    use super::*;

    #[test]
    fn remaining_floors_at_zero() {
        let (mut engine, clock, _rx) =
            create_engine(TimerMode::Focus, Some(Duration::from_secs(10)));
        engine.start().unwrap();

        clock.advance_secs(9);
        assert_eq!(engine.sample().remaining, Some(Duration::from_secs(1)));

        clock.advance_secs(100);
        assert_eq!(engine.sample().remaining, Some(Duration::ZERO));
    }

    #[test]
    fn completion_fires_once_under_repeated_sampling() {
        let (mut engine, clock, mut rx) =
            create_engine(TimerMode::Break, Some(Duration::from_secs(5)));
        engine.start().unwrap();
        clock.advance_secs(5);

        let fired: Vec<bool> = (0..10)
            .map(|_| {
                clock.advance_millis(100);
                engine.check_completion()
            })
            .collect();

        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert_eq!(count_completions(&mut rx), 1);
        assert_eq!(engine.status(), TimerStatus::Completed);
        assert_eq!(engine.sample().remaining, Some(Duration::ZERO));
    }

    #[test]
    fn completion_fires_again_for_a_new_running_period() {
        let (mut engine, clock, mut rx) =
            create_engine(TimerMode::Countdown, Some(Duration::from_secs(3)));

        for _ in 0..2 {
            engine.start().unwrap();
            clock.advance_secs(4);
            assert!(engine.check_completion());
            assert!(!engine.check_completion());
            engine.reset(None);
        }

        assert_eq!(count_completions(&mut rx), 2);
    }

    #[test]
    fn acknowledged_session_cannot_restart_without_reset() {
        let (mut engine, clock, _rx) =
            create_engine(TimerMode::Focus, Some(Duration::from_secs(3)));
        engine.start().unwrap();
        clock.advance_secs(3);
        engine.check_completion();
        engine.acknowledge().unwrap();

        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.start().unwrap_err(), EngineError::NothingToRun);
    }
}

// ============================================================================
// Laps
// ============================================================================

mod lap_integration {
    use super::*;

    #[test]
    fn laps_listed_newest_first() {
        let (mut engine, clock, _rx) = create_engine(TimerMode::Stopwatch, None);
        let mut laps = LapRecorder::new();
        engine.start().unwrap();

        clock.advance_secs(10);
        laps.add_lap(&engine, None).unwrap();
        clock.advance_secs(15);
        laps.add_lap(&engine, None).unwrap();

        let listed: Vec<(u32, String, String)> = laps
            .iter()
            .map(|lap| {
                (
                    lap.ordinal,
                    lap.label.clone(),
                    TimeFormat::Centiseconds.format(lap.elapsed),
                )
            })
            .collect();

        assert_eq!(
            listed,
            vec![
                (2, "Lap 2".to_string(), "00:25.00".to_string()),
                (1, "Lap 1".to_string(), "00:10.00".to_string()),
            ]
        );
    }

    #[test]
    fn lap_at_zero_leaves_sequence_unchanged() {
        let (mut engine, clock, _rx) = create_engine(TimerMode::Stopwatch, None);
        let mut laps = LapRecorder::new();
        engine.start().unwrap();
        clock.advance_secs(1);
        laps.add_lap(&engine, Some("warmup")).unwrap();
        engine.reset(None);

        assert_eq!(
            laps.add_lap(&engine, None).unwrap_err(),
            EngineError::ZeroElapsed
        );
        assert_eq!(
            laps.to_vec(),
            vec![LapRecord::new(1, Duration::from_secs(1), Some("warmup"))]
        );
    }
}
