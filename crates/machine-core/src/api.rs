//! Host-facing collaborator ports.
//!
//! The interpreter reaches the outside world through exactly one port:
//! [`InputPort`], consulted by the `InputOperand` instruction. Drivers may
//! additionally report stage transitions through a [`ProgressSink`]; the
//! core itself never consumes progress reports. Keeping both behind traits
//! lets the machine run headless, with scripted input, in tests and
//! embeddings.

use std::collections::VecDeque;

/// Synchronous "prompt for text" capability used by `InputOperand`.
pub trait InputPort {
    /// Asks the collaborator for one line of text.
    ///
    /// `None` means the prompt was cancelled; the instruction leaves its
    /// register unchanged.
    fn prompt(&mut self, message: &str) -> Option<String>;
}

/// Input port that cancels every prompt.
///
/// The default collaborator for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelledInput;

impl InputPort for CancelledInput {
    fn prompt(&mut self, _message: &str) -> Option<String> {
        None
    }
}

/// Scripted input source for headless execution and tests.
///
/// Answers are handed out in order; `None` entries and an exhausted script
/// both read as cancellation. Received prompts are recorded for assertion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    answers: VecDeque<Option<String>>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    /// Creates a script from explicit answer-or-cancel entries.
    #[must_use]
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Creates a script in which every prompt is answered.
    #[must_use]
    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(answers.into_iter().map(|answer| Some(answer.into())))
    }

    /// Prompts received so far, in order.
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputPort for ScriptedInput {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.prompts.push(message.to_owned());
        self.answers.pop_front().flatten()
    }
}

/// "Report progress string" sink used by drivers around each stage.
pub trait ProgressSink {
    /// Records one stage-transition message.
    fn report(&mut self, stage: &str);
}

/// Progress sink that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardProgress;

impl ProgressSink for DiscardProgress {
    fn report(&mut self, _stage: &str) {}
}

#[cfg(test)]
mod tests {
    use super::{CancelledInput, DiscardProgress, InputPort, ProgressSink, ScriptedInput};

    #[test]
    fn cancelled_input_always_cancels() {
        let mut port = CancelledInput;
        assert_eq!(port.prompt("anything"), None);
    }

    #[test]
    fn scripted_input_hands_out_answers_in_order() {
        let mut port = ScriptedInput::new([Some("first".to_owned()), None]);
        assert_eq!(port.prompt("p1"), Some("first".to_owned()));
        assert_eq!(port.prompt("p2"), None);
        assert_eq!(port.prompt("p3"), None, "exhausted script cancels");
        assert_eq!(port.prompts(), ["p1", "p2", "p3"]);
    }

    #[test]
    fn answering_wraps_every_entry() {
        let mut port = ScriptedInput::answering(["42", "7"]);
        assert_eq!(port.prompt("a"), Some("42".to_owned()));
        assert_eq!(port.prompt("b"), Some("7".to_owned()));
    }

    #[test]
    fn discard_progress_accepts_reports() {
        let mut sink = DiscardProgress;
        sink.report("Compiling...");
        sink.report("Executing...");
    }
}
