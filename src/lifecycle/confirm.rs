//! Confirmation Gates
//!
//! Yes/no decision points. The default for empty input is chosen by each
//! call site and passed explicitly.

use std::collections::VecDeque;

use dialoguer::Input;
use log::info;

use crate::error::Result;

/// Asks the user to confirm a step.
pub trait Confirmer {
    /// Returns `true` when the step should go ahead.
    ///
    /// `default` is the answer assumed for empty input.
    fn ask(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// Maps a raw answer onto a decision.
///
/// Empty input takes `default`; otherwise only `yes` or `y` (any case)
/// accepts, and everything else declines.
pub fn interpret_answer(answer: &str, default: bool) -> bool {
    let answer = answer.trim();
    if answer.is_empty() {
        return default;
    }
    answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y")
}

/// Hint shown after the question, capitalising the default.
pub fn answer_hint(default: bool) -> &'static str {
    if default {
        "[Y/n]"
    } else {
        "[y/N]"
    }
}

/// Prompts on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn ask(&mut self, question: &str, default: bool) -> Result<bool> {
        let answer = Input::<String>::new()
            .with_prompt(format!("{} {}", question, answer_hint(default)))
            .allow_empty(true)
            .interact_text()?;
        Ok(interpret_answer(&answer, default))
    }
}

/// Accepts every gate without prompting.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn ask(&mut self, question: &str, _default: bool) -> Result<bool> {
        info!("{} yes (assumed)", question);
        Ok(true)
    }
}

/// Replays prepared answers in order, as if typed by a user.
///
/// Once the script runs out every further question receives empty input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConfirmer {
    answers: VecDeque<String>,
    asked: Vec<(String, bool)>,
}

impl ScriptedConfirmer {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, with the default each was asked with.
    pub fn asked(&self) -> &[(String, bool)] {
        &self.asked
    }
}

impl Confirmer for ScriptedConfirmer {
    fn ask(&mut self, question: &str, default: bool) -> Result<bool> {
        self.asked.push((question.to_string(), default));
        let answer = self.answers.pop_front().unwrap_or_default();
        Ok(interpret_answer(&answer, default))
    }
}
