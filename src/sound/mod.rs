//! Alarm playback.
//!
//! The alarm is a scoped resource: every successful [`SoundPlayer::play`]
//! returns a [`Playback`] handle, and the sound stops when the handle is
//! stopped or dropped.
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────┐
//! │   SoundPlayer    │─────▶│     Playback     │ ← stop / drop releases
//! └────────┬─────────┘      └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐      ┌──────────────────┐
//! │   SoundSource    │─────▶│  Sound file      │
//! │                  │      ├──────────────────┤
//! │                  │─────▶│  Generated tone  │ ← fallback
//! └──────────────────┘      └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use timekeeper::sound::{default_alarm, RodioSoundPlayer};
//!
//! let player = RodioSoundPlayer::new().expect("audio init");
//! let playback = player.play(&default_alarm()).expect("playback failed");
//!
//! // ... later
//! playback.stop();
//! ```

mod error;
mod playback;
mod player;
mod source;

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub use error::SoundError;
pub use playback::Playback;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{alarm_source, default_alarm, SoundSource, DEFAULT_TONE_HZ, DEFAULT_TONE_MS};

/// Trait for alarm playback implementations.
///
/// This trait abstracts the playback backend, allowing for different
/// implementations (rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Starts playing a sound from the given source.
    ///
    /// This method is non-blocking; the sound plays in the background until
    /// the returned handle is stopped or dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot be started.
    fn play(&self, source: &SoundSource) -> Result<Playback, SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<Playback, SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Rc<P> {
    fn play(&self, source: &SoundSource) -> Result<Playback, SoundError> {
        (**self).play(source)
    }
}

/// Mock sound player for testing.
///
/// Tracks every sound started and how many playbacks are still alive.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    active: Arc<AtomicUsize>,
    stopped: Arc<AtomicUsize>,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            active: Arc::new(AtomicUsize::new(0)),
            stopped: Arc::new(AtomicUsize::new(0)),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of sounds started.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    /// Number of playbacks started and not yet released.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Number of playbacks released.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.calls().clone()
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<SoundSource>> {
        self.play_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<Playback, SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.calls().push(source.clone());
        self.active.fetch_add(1, Ordering::SeqCst);

        let active = Arc::clone(&self.active);
        let stopped = Arc::clone(&self.stopped);
        Ok(Playback::new(source.name(), move || {
            active.fetch_sub(1, Ordering::SeqCst);
            stopped.fetch_add(1, Ordering::SeqCst);
        }))
    }
}
