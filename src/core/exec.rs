//! Subprocess execution with a dry-run gate
//!
//! Every external program pkg-release starts goes through an [`Executor`].
//! The executor splits calls into two kinds:
//!
//! - **mutating** ([`Executor::run`]): commit, tag, push, publish. In dry-run mode
//!   these are replaced by a `[dryrun]` log line and return immediately.
//! - **read-only** ([`Executor::query`]): diff, tag listing, registry lookups. These
//!   always execute, so a dry run can still describe what would happen.
//!
//! The actual process spawning sits behind [`CommandRunner`] so orchestrators can be
//! tested with a recording runner.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::ui::style;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
}

impl Cmd {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }
}

impl fmt::Display for Cmd {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Captured result of a read-only command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
  pub success: bool,
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

/// Process spawning seam
pub trait CommandRunner {
  /// Run with inherited stdio and return the exit code (None if killed by a signal)
  fn status(&self, cmd: &Cmd) -> ReleaseResult<Option<i32>>;

  /// Run with captured stdout/stderr
  fn output(&self, cmd: &Cmd) -> ReleaseResult<CmdOutput>;
}

/// Runs commands with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
  fn command(cmd: &Cmd) -> Command {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);
    if let Some(cwd) = &cmd.cwd {
      command.current_dir(cwd);
    }
    command
  }
}

impl CommandRunner for SystemRunner {
  fn status(&self, cmd: &Cmd) -> ReleaseResult<Option<i32>> {
    let status = Self::command(cmd)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .with_context(|| format!("Failed to execute {}", cmd.program))?;
    Ok(status.code())
  }

  fn output(&self, cmd: &Cmd) -> ReleaseResult<CmdOutput> {
    let output = Self::command(cmd)
      .stdin(Stdio::null())
      .output()
      .with_context(|| format!("Failed to execute {}", cmd.program))?;

    Ok(CmdOutput {
      success: output.status.success(),
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }
}

/// Dry-run aware executor
///
/// The flag is fixed at construction; nothing flips it mid-run.
pub struct Executor<'a> {
  runner: &'a dyn CommandRunner,
  dry_run: bool,
}

impl<'a> Executor<'a> {
  pub fn new(runner: &'a dyn CommandRunner, dry_run: bool) -> Self {
    Self { runner, dry_run }
  }

  /// Run a mutating command, or log it when in dry-run mode
  pub fn run(&self, cmd: &Cmd) -> ReleaseResult<()> {
    if self.dry_run {
      match &cmd.cwd {
        Some(cwd) => println!("{}", style::dry(&format!("[dryrun] {} (cwd: {})", cmd, cwd.display()))),
        None => println!("{}", style::dry(&format!("[dryrun] {}", cmd))),
      }
      tracing::debug!(command = %cmd, "skipped in dry-run mode");
      return Ok(());
    }
    self.run_tool(cmd)
  }

  /// Run a command for real with inherited stdio, regardless of dry-run mode
  ///
  /// Used for tools whose effects stay in the working tree (changelog generation)
  /// or that only print (git log).
  pub fn run_tool(&self, cmd: &Cmd) -> ReleaseResult<()> {
    tracing::debug!(command = %cmd, cwd = ?cmd.cwd, "running");
    match self.runner.status(cmd)? {
      Some(0) => Ok(()),
      status => Err(ReleaseError::CommandFailed {
        command: cmd.to_string(),
        status,
      }),
    }
  }

  /// Run a read-only command and capture its output
  ///
  /// Never gated; the caller inspects `success`.
  pub fn query(&self, cmd: &Cmd) -> ReleaseResult<CmdOutput> {
    tracing::debug!(command = %cmd, cwd = ?cmd.cwd, "querying");
    let output = self.runner.output(cmd)?;
    tracing::trace!(success = output.success, stdout = %output.stdout.trim_end(), "query finished");
    Ok(output)
  }
}
