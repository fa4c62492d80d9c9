use std::fmt;

use inquire::{InquireError, Select, Text};

use crate::error::{GitProfError, Result};

/// Interactive input used by the create and select flows.
///
/// `Ok(None)` means the user gave no answer (Esc or Ctrl-C); flows stop
/// without side effects. `Err` means no prompt could be shown at all.
pub trait Prompter {
    fn text(&mut self, message: &str) -> Result<Option<String>>;

    /// Pick one of `options`, returning its index
    fn select(&mut self, message: &str, options: &[String]) -> Result<Option<usize>>;
}

/// Terminal prompts backed by `inquire`
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn text(&mut self, message: &str) -> Result<Option<String>> {
        no_answer_on_cancel(Text::new(message).prompt())
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<Option<usize>> {
        let choices: Vec<Choice> = options
            .iter()
            .enumerate()
            .map(|(index, text)| Choice {
                index,
                text: text.as_str(),
            })
            .collect();
        let choice = no_answer_on_cancel(Select::new(message, choices).prompt())?;
        Ok(choice.map(|choice| choice.index))
    }
}

/// A menu entry that remembers its position, so equal labels stay distinct
struct Choice<'a> {
    index: usize,
    text: &'a str,
}

impl fmt::Display for Choice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

fn no_answer_on_cancel<T>(answer: std::result::Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(GitProfError::Prompt(e.to_string())),
    }
}
