//! Completion notification.
//!
//! When a bounded session finishes, the owning tool hands the completed mode
//! to a [`CompletionNotifier`] and waits for the user's [`Decision`]. The
//! production notifier plays the alarm and asks through a
//! [`DecisionPrompt`]; the alarm stops as soon as the prompt is answered, or
//! as soon as the pending notification is dropped.

mod content;
mod prompt;

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::sound::{Playback, SoundPlayer, SoundSource};
use crate::types::{Decision, TimerMode};

pub use self::content::PromptContent;
pub use self::prompt::{DecisionPrompt, ScriptedPrompt};

#[allow(async_fn_in_trait)]
pub trait CompletionNotifier {
    /// Announces the completion of a `completed` session and waits for the
    /// user's decision.
    async fn notify(&mut self, completed: TimerMode) -> Decision;

    /// Stops any alarm still sounding.
    fn cancel_playback(&mut self);
}

// ============================================================================
// AlarmNotifier
// ============================================================================

/// Plays the alarm and asks the continue/stop question.
pub struct AlarmNotifier<P: SoundPlayer, Q: DecisionPrompt> {
    /// None when no audio device is available
    player: Option<P>,
    prompt: Q,
    source: SoundSource,
    /// The alarm currently sounding
    playback: Option<Playback>,
}

impl<P: SoundPlayer, Q: DecisionPrompt> AlarmNotifier<P, Q> {
    #[must_use]
    pub fn new(player: Option<P>, prompt: Q, source: SoundSource) -> Self {
        Self {
            player,
            prompt,
            source,
            playback: None,
        }
    }

    pub fn prompt(&self) -> &Q {
        &self.prompt
    }

    /// Returns true while an alarm is sounding.
    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(Playback::is_active)
    }

    fn start_alarm(&self) -> Option<Playback> {
        let player = self.player.as_ref()?;
        match player.play(&self.source) {
            Ok(playback) => Some(playback),
            Err(e) => {
                warn!("Failed to play alarm: {} ({})", e, e.suggestion());
                None
            }
        }
    }
}

impl<P: SoundPlayer, Q: DecisionPrompt> CompletionNotifier for AlarmNotifier<P, Q> {
    async fn notify(&mut self, completed: TimerMode) -> Decision {
        self.cancel_playback();

        let content = PromptContent::for_mode(completed);
        info!(mode = %completed, "{}", content.title);

        self.playback = self.start_alarm();
        let alarm = ReleaseOnDrop(&mut self.playback);

        let decision = self.prompt.ask(&content).await;

        drop(alarm);
        debug!(mode = %completed, ?decision, "completion answered");
        decision
    }

    fn cancel_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.stop();
        }
    }
}

impl<P: SoundPlayer, Q: DecisionPrompt> std::fmt::Debug for AlarmNotifier<P, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmNotifier")
            .field("source", &self.source)
            .field("audio", &self.player.is_some())
            .field("playing", &self.is_playing())
            .finish_non_exhaustive()
    }
}

/// Releases the alarm when the pending notification finishes or is dropped.
struct ReleaseOnDrop<'a>(&'a mut Option<Playback>);

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(playback) = self.0.take() {
            playback.stop();
        }
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Notifier that records completions and answers from a script.
///
/// Answers `Stop` once the script runs out.
#[derive(Debug, Default)]
pub struct MockNotifier {
    notified: Vec<TimerMode>,
    decisions: VecDeque<Decision>,
    cancel_count: usize,
}

impl MockNotifier {
    #[must_use]
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Modes notified so far, oldest first.
    #[must_use]
    pub fn notified(&self) -> &[TimerMode] {
        &self.notified
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notified.len()
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.cancel_count
    }
}

impl CompletionNotifier for MockNotifier {
    async fn notify(&mut self, completed: TimerMode) -> Decision {
        self.notified.push(completed);
        self.decisions.pop_front().unwrap_or(Decision::Stop)
    }

    fn cancel_playback(&mut self) {
        self.cancel_count += 1;
    }
}
