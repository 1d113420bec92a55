//! Terminal implementation of the completion question.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::notifier::{DecisionPrompt, PromptContent};
use crate::types::Decision;

use super::display::Display;

/// Lines typed by the user, shared by the session loop and the prompt.
pub type SharedInput = Arc<Mutex<mpsc::UnboundedReceiver<String>>>;

/// Reads the next line, or None once input is closed.
pub async fn next_line(input: &SharedInput) -> Option<String> {
    input.lock().await.recv().await
}

/// Parses an answer to the completion question.
pub fn parse_decision(line: &str) -> Option<Decision> {
    match line.trim().to_lowercase().as_str() {
        "c" | "continue" | "y" | "yes" => Some(Decision::Continue),
        "s" | "stop" | "n" | "no" => Some(Decision::Stop),
        _ => None,
    }
}

/// Asks on the terminal and waits for a typed answer.
///
/// Closed input counts as `Stop`.
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    input: SharedInput,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new(input: SharedInput) -> Self {
        Self { input }
    }
}

impl DecisionPrompt for TerminalPrompt {
    async fn ask(&mut self, content: &PromptContent) -> Decision {
        Display::show_prompt(content);
        loop {
            let Some(line) = next_line(&self.input).await else {
                debug!("input closed while prompting");
                return Decision::Stop;
            };
            match parse_decision(&line) {
                Some(decision) => return decision,
                None => Display::show_prompt_hint(content),
            }
        }
    }
}
