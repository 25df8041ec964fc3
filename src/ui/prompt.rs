//! Operator prompts
//!
//! The release pipeline asks three kinds of questions: pick from a list, yes/no, and
//! free text. [`Prompter`] is the seam; [`TermPrompter`] answers them on the terminal
//! with `dialoguer`. Escape/`q` on a list or yes/no question reads as "cancelled".

use crate::core::error::ReleaseResult;
use dialoguer::{Confirm, Input, Select};

pub trait Prompter {
  /// Pick one item; `None` when the operator cancels
  fn select(&self, prompt: &str, items: &[String]) -> ReleaseResult<Option<usize>>;

  /// Yes/no question; cancelling counts as "no"
  fn confirm(&self, prompt: &str) -> ReleaseResult<bool>;

  /// Free-text answer pre-filled with `initial`; `None` when left empty
  fn input(&self, prompt: &str, initial: &str) -> ReleaseResult<Option<String>>;
}

/// Interactive prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TermPrompter;

impl Prompter for TermPrompter {
  fn select(&self, prompt: &str, items: &[String]) -> ReleaseResult<Option<usize>> {
    let selection = Select::new()
      .with_prompt(prompt)
      .items(items)
      .default(0)
      .interact_opt()?;
    Ok(selection)
  }

  fn confirm(&self, prompt: &str) -> ReleaseResult<bool> {
    let answer = Confirm::new().with_prompt(prompt).default(false).interact_opt()?;
    Ok(answer.unwrap_or(false))
  }

  fn input(&self, prompt: &str, initial: &str) -> ReleaseResult<Option<String>> {
    let text: String = Input::new()
      .with_prompt(prompt)
      .with_initial_text(initial)
      .allow_empty(true)
      .interact_text()?;
    let text = text.trim().to_string();
    Ok(if text.is_empty() { None } else { Some(text) })
  }
}
