//! Confirmation gate: the three-mode state machine in front of mutation.
//!
//! The transition function is pure; reading operator input lives behind
//! the `Prompt` trait so the machine is testable with scripted answers.

use crate::plan::RemediationItem;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Run-level confirmation mode, selected once before any mutation.
///
/// `ConfirmEach -> ApplyAll` (on a yes-to-all answer) is the only
/// transition after selection, and it is one-way for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmMode {
    ApplyAll,
    ConfirmEach,
    Abort,
}

impl ConfirmMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplyAll => "apply-all",
            Self::ConfirmEach => "confirm-each",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for ConfirmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed mode selection. Callers re-prompt; nothing defaults silently.
#[derive(Debug, thiserror::Error)]
#[error("invalid confirmation mode `{0}`; expected apply-all, confirm-each, or abort")]
pub struct ModeParseError(pub String);

impl FromStr for ConfirmMode {
    type Err = ModeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "apply-all" | "all" | "a" => Ok(Self::ApplyAll),
            "confirm-each" | "each" | "c" => Ok(Self::ConfirmEach),
            "abort" | "b" => Ok(Self::Abort),
            _ => Err(ModeParseError(input.trim().to_string())),
        }
    }
}

/// Operator answer to one item prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAnswer {
    Proceed,
    Skip,
    /// Proceed with this and every remaining item without further prompts.
    AllRemaining,
}

/// Parse one interactive answer line. `None` means re-prompt.
pub fn parse_answer(input: &str) -> Option<ItemAnswer> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(ItemAnswer::Proceed),
        "n" | "no" | "s" | "skip" => Some(ItemAnswer::Skip),
        "a" | "all" => Some(ItemAnswer::AllRemaining),
        _ => None,
    }
}

/// What the gate decided for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDecision {
    Proceed,
    Skip,
}

/// Pure transition: current mode + answer -> next mode + decision.
pub fn apply_answer(mode: ConfirmMode, answer: ItemAnswer) -> (ConfirmMode, ItemDecision) {
    match mode {
        ConfirmMode::ApplyAll => (ConfirmMode::ApplyAll, ItemDecision::Proceed),
        ConfirmMode::Abort => (ConfirmMode::Abort, ItemDecision::Skip),
        ConfirmMode::ConfirmEach => match answer {
            ItemAnswer::Proceed => (ConfirmMode::ConfirmEach, ItemDecision::Proceed),
            ItemAnswer::Skip => (ConfirmMode::ConfirmEach, ItemDecision::Skip),
            ItemAnswer::AllRemaining => (ConfirmMode::ApplyAll, ItemDecision::Proceed),
        },
    }
}

/// The input-reading side effect, separated from the state machine.
pub trait Prompt {
    /// Ask the operator about one item. Implementations re-prompt on
    /// malformed input and only error when input is genuinely
    /// unavailable (e.g. stdin closed).
    fn ask(&mut self, item: &RemediationItem) -> Result<ItemAnswer, PromptError>;
}

/// Operator input became unavailable mid-run.
#[derive(Debug, thiserror::Error)]
#[error("operator input unavailable: {0}")]
pub struct PromptError(pub String);

/// Scripted prompt for tests and rehearsals: answers in order, then error.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<ItemAnswer>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = ItemAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, _item: &RemediationItem) -> Result<ItemAnswer, PromptError> {
        self.answers
            .pop_front()
            .ok_or_else(|| PromptError("scripted answers exhausted".to_string()))
    }
}
