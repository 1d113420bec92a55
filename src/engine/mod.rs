//! Timer engine module.
//!
//! This module contains the timing core shared by every tool:
//! - `timer`: anchor-based session tracking and completion detection
//! - `laps`: lap bookkeeping for the stopwatch
//! - `ticker`: cancellable periodic tick source
//! - `error`: rejected transitions

pub mod error;
pub mod laps;
pub mod ticker;
pub mod timer;

pub use error::EngineError;
pub use laps::LapRecorder;
pub use ticker::{Tick, Ticker};
pub use timer::{TimerEngine, TimerEvent};
