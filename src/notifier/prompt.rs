//! The continue/stop question asked on completion.

use std::collections::VecDeque;

use crate::types::Decision;

use super::content::PromptContent;

/// Asks the user whether to continue after a completion.
///
/// Implementations may wait indefinitely; the caller owns cancellation by
/// dropping the returned future.
#[allow(async_fn_in_trait)]
pub trait DecisionPrompt {
    async fn ask(&mut self, content: &PromptContent) -> Decision;
}

/// Prompt answering from a queue of decisions.
///
/// Answers `Stop` once the queue is empty, or never answers at all when
/// built with [`pending`](ScriptedPrompt::pending).
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    decisions: VecDeque<Decision>,
    asked: Vec<PromptContent>,
    pending: bool,
}

impl ScriptedPrompt {
    #[must_use]
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            asked: Vec::new(),
            pending: false,
        }
    }

    /// A prompt the user never answers.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            pending: true,
            ..Self::default()
        }
    }

    /// Prompts shown so far, oldest first.
    #[must_use]
    pub fn asked(&self) -> &[PromptContent] {
        &self.asked
    }
}

impl DecisionPrompt for ScriptedPrompt {
    async fn ask(&mut self, content: &PromptContent) -> Decision {
        self.asked.push(content.clone());
        if self.pending {
            std::future::pending::<()>().await;
        }
        self.decisions.pop_front().unwrap_or(Decision::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerMode;

    #[tokio::test]
    async fn test_scripted_decisions_in_order() {
        let mut prompt = ScriptedPrompt::new([Decision::Continue, Decision::Stop]);
        let content = PromptContent::for_mode(TimerMode::Focus);

        assert_eq!(prompt.ask(&content).await, Decision::Continue);
        assert_eq!(prompt.ask(&content).await, Decision::Stop);
        assert_eq!(prompt.asked().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_script_stops() {
        let mut prompt = ScriptedPrompt::default();
        let content = PromptContent::for_mode(TimerMode::Break);

        assert_eq!(prompt.ask(&content).await, Decision::Stop);
    }
}
