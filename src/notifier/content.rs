//! Completion prompt wording.

use crate::types::TimerMode;

/// What the completion prompt shows for one finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContent {
    pub title: &'static str,
    pub description: &'static str,
    /// Label of the answer that moves on
    pub continue_label: &'static str,
    /// Label of the answer that silences the alarm and stays put
    pub stop_label: &'static str,
}

impl PromptContent {
    /// Builds the prompt for a session of `completed` mode that just finished.
    pub fn for_mode(completed: TimerMode) -> Self {
        match completed {
            TimerMode::Focus => Self {
                title: "Focus session complete!",
                description: "You finished your focus session. Take a break?",
                continue_label: "Start break",
                stop_label: "Stop",
            },
            TimerMode::Break => Self {
                title: "Break complete!",
                description: "Your break is over. Ready to focus again?",
                continue_label: "Start focus",
                stop_label: "Stop",
            },
            TimerMode::Countdown | TimerMode::Stopwatch => Self {
                title: "Timer finished!",
                description: "The countdown reached zero.",
                continue_label: "Restart",
                stop_label: "Stop",
            },
        }
    }
}
