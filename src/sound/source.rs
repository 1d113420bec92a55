//! Alarm sound sources.

use std::path::{Path, PathBuf};

/// Default alarm tone pitch.
pub const DEFAULT_TONE_HZ: u32 = 880;

/// Default alarm tone length.
pub const DEFAULT_TONE_MS: u64 = 1500;

/// What the alarm plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A generated sine tone.
    Tone {
        /// Pitch in hertz
        frequency_hz: u32,
        /// Length in milliseconds
        duration_ms: u64,
    },
    /// An audio file on disk.
    File {
        /// Display name (the file stem)
        name: String,
        /// Full path to the file
        path: PathBuf,
    },
}

impl SoundSource {
    /// Creates a tone source.
    #[must_use]
    pub fn tone(frequency_hz: u32, duration_ms: u64) -> Self {
        Self::Tone {
            frequency_hz,
            duration_ms,
        }
    }

    /// Creates a file source named after the file stem.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "alarm".to_string());
        Self::File { name, path }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tone { .. } => "tone",
            Self::File { name, .. } => name,
        }
    }
}

/// Returns the alarm for the given optional file path.
#[must_use]
pub fn alarm_source(path: Option<&Path>) -> SoundSource {
    match path {
        Some(path) => SoundSource::file(path),
        None => default_alarm(),
    }
}

/// Returns the built-in alarm tone.
#[must_use]
pub fn default_alarm() -> SoundSource {
    SoundSource::tone(DEFAULT_TONE_HZ, DEFAULT_TONE_MS)
}
