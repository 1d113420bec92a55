//! Sound player implementation using rodio.
//!
//! Unlike a fire-and-forget notification sound, the alarm is a scoped
//! resource: [`RodioSoundPlayer::play`] hands back a [`Playback`] that owns
//! the rodio `Sink`, and dropping or stopping it silences the alarm.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::playback::Playback;
use super::source::{SoundSource, DEFAULT_TONE_HZ, DEFAULT_TONE_MS};

/// Volume applied to the generated tone.
const TONE_AMPLITUDE: f32 = 0.2;

/// A sound player that uses rodio for audio playback.
///
/// The output stream is not `Send`, so the player stays on the thread that
/// created it.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Starts playing `source` and returns the handle that stops it.
    ///
    /// A file that cannot be opened or decoded falls back to the
    /// generated tone.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created on the output stream.
    pub fn play(&self, source: &SoundSource) -> Result<Playback, SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        match source {
            SoundSource::File { name, path } => match open_decoder(path) {
                Ok(decoder) => {
                    debug!("Playing alarm file: {}", name);
                    sink.append(decoder);
                }
                Err(e) if e.should_fallback_to_tone() => {
                    warn!("Failed to load alarm '{}': {}, falling back to tone", name, e);
                    append_tone(&sink, DEFAULT_TONE_HZ, DEFAULT_TONE_MS);
                }
                Err(e) => return Err(e),
            },
            SoundSource::Tone {
                frequency_hz,
                duration_ms,
            } => {
                debug!("Playing alarm tone: {} Hz for {} ms", frequency_hz, duration_ms);
                append_tone(&sink, *frequency_hz, *duration_ms);
            }
        }

        Ok(Playback::new(source.name(), move || sink.stop()))
    }
}

fn open_decoder(path: &std::path::Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

fn append_tone(sink: &Sink, frequency_hz: u32, duration_ms: u64) {
    let tone = SineWave::new(frequency_hz as f32)
        .take_duration(Duration::from_millis(duration_ms))
        .amplify(TONE_AMPLITUDE);
    sink.append(tone);
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, alarm will be silent: {}", e);
            None
        }
    }
}
