//! Scoped handle for a playing alarm.

use std::fmt;

use tracing::debug;

/// A playing sound that is stopped and released exactly once: on
/// [`stop`](Playback::stop) or on drop, whichever comes first.
pub struct Playback {
    name: String,
    release: Option<Box<dyn FnOnce()>>,
}

impl Playback {
    /// Wraps a playing sound and the action that stops it.
    pub fn new(name: impl Into<String>, release: impl FnOnce() + 'static) -> Self {
        Self {
            name: name.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Returns true until the sound has been released.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Stops the sound and releases the audio resource.
    pub fn stop(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
            debug!("Alarm '{}' released", self.name);
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback")
            .field("name", &self.name)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn counting_playback() -> (Playback, Rc<Cell<u32>>) {
        let releases = Rc::new(Cell::new(0));
        let counter = Rc::clone(&releases);
        let playback = Playback::new("alarm", move || counter.set(counter.get() + 1));
        (playback, releases)
    }

    #[test]
    fn test_stop_releases_once() {
        let (playback, releases) = counting_playback();
        assert!(playback.is_active());

        playback.stop();

        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let (playback, releases) = counting_playback();

        drop(playback);

        assert_eq!(releases.get(), 1);
    }
}
