//! Package linting before a release
//!
//! Linting never blocks on its own: the release flow prints every message and
//! lets the operator decide whether to continue.

pub mod command;
pub mod manifest;

pub use command::CommandLinter;
pub use manifest::ManifestLinter;

use crate::core::config::LintConfig;
use crate::core::error::ReleaseResult;
use crate::core::exec::Executor;
use crate::package::Package;
use std::fmt;

/// Severity level for lint messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
  Suggestion,
  Warning,
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Suggestion => write!(f, "SUGGESTION"),
      Severity::Warning => write!(f, "WARNING"),
      Severity::Error => write!(f, "ERROR"),
    }
  }
}

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintMessage {
  pub severity: Severity,
  pub code: String,
  pub message: String,
  /// JSON path of the offending field (`exports["./cli"]`), if any
  pub path: Option<String>,
}

impl LintMessage {
  pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      severity,
      code: code.into(),
      message: message.into(),
      path: None,
    }
  }

  pub fn at(mut self, path: impl Into<String>) -> Self {
    self.path = Some(path.into());
    self
  }
}

impl fmt::Display for LintMessage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}: {}", self.severity, self.code, self.message)?;
    if let Some(path) = &self.path {
      write!(f, " (at {})", path)?;
    }
    Ok(())
  }
}

/// Pre-release check over a package
pub trait PackageLinter {
  fn lint(&self, package: &Package) -> ReleaseResult<Vec<LintMessage>>;
}

/// Every configured linter, run in order
///
/// Empty when linting is disabled.
#[derive(Default)]
pub struct LintSet<'a> {
  linters: Vec<Box<dyn PackageLinter + 'a>>,
}

impl<'a> LintSet<'a> {
  /// Built-in manifest checks, plus the external command when one is configured
  pub fn from_config(exec: &'a Executor<'a>, config: &LintConfig) -> Self {
    let mut set = Self::default();
    if !config.enabled {
      return set;
    }
    set.push(ManifestLinter);
    if let Some(command) = &config.command {
      set.push(CommandLinter::new(exec, command.clone()));
    }
    set
  }

  pub fn push(&mut self, linter: impl PackageLinter + 'a) {
    self.linters.push(Box::new(linter));
  }

  pub fn is_empty(&self) -> bool {
    self.linters.is_empty()
  }
}

impl PackageLinter for LintSet<'_> {
  fn lint(&self, package: &Package) -> ReleaseResult<Vec<LintMessage>> {
    let mut messages = Vec::new();
    for linter in &self.linters {
      messages.extend(linter.lint(package)?);
    }
    Ok(messages)
  }
}
