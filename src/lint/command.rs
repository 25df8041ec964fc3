//! External linter (publint, eslint-plugin-package-json, ...)

use super::{LintMessage, PackageLinter, Severity};
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::exec::{Cmd, Executor};
use crate::package::Package;
use crate::utils::expand_placeholders;

/// Runs a configured command in the package directory
///
/// Every non-empty line on stdout becomes a warning. `{name}` and `{dir}` in the
/// arguments are replaced with the package name and directory.
pub struct CommandLinter<'a> {
  exec: &'a Executor<'a>,
  command: Vec<String>,
}

impl<'a> CommandLinter<'a> {
  pub fn new(exec: &'a Executor<'a>, command: Vec<String>) -> Self {
    Self { exec, command }
  }
}

impl PackageLinter for CommandLinter<'_> {
  fn lint(&self, package: &Package) -> ReleaseResult<Vec<LintMessage>> {
    let Some((program, args)) = self.command.split_first() else {
      return Ok(Vec::new());
    };

    let dir = package.dir.to_string_lossy();
    let vars = [("name", package.name()), ("dir", dir.as_ref())];
    let cmd = Cmd::new(program)
      .args(args.iter().map(|arg| expand_placeholders(arg, &vars)))
      .current_dir(&package.dir);

    let output = self.exec.query(&cmd)?;
    let messages: Vec<LintMessage> = output
      .stdout
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(|line| LintMessage::new(Severity::Warning, "EXTERNAL", line))
      .collect();

    // A failing linter that printed nothing is broken, not reporting findings
    if !output.success && messages.is_empty() {
      tracing::debug!(stderr = %output.stderr.trim_end(), "linter failed without output");
      return Err(ReleaseError::CommandFailed {
        command: cmd.to_string(),
        status: output.code,
      });
    }

    Ok(messages)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::exec::testing::RecordingRunner;
  use crate::package::PackageLayout;
  use std::fs;
  use tempfile::TempDir;

  fn package(tmp: &TempDir) -> Package {
    let dir = tmp.path().join("packages/core");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.json"), r#"{"name": "core", "version": "1.0.0"}"#).unwrap();
    Package::load("core", &PackageLayout::new(tmp.path(), PackageLayout::DEFAULT_TEMPLATE)).unwrap()
  }

  #[test]
  fn test_lines_become_warnings() {
    let tmp = TempDir::new().unwrap();
    let pkg = package(&tmp);
    let runner = RecordingRunner::new();
    runner.reply(
      "npx publint",
      RecordingRunner::ok("pkg.main is ./index.js but the file does not exist.\n\n  pkg.types should be set\n"),
    );
    let exec = Executor::new(&runner, true);

    let linter = CommandLinter::new(&exec, vec!["npx".into(), "publint".into(), "{dir}".into()]);
    let messages = linter.lint(&pkg).unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].message, "pkg.types should be set");
    assert!(messages.iter().all(|m| m.severity == Severity::Warning));

    let calls = runner.calls.borrow();
    assert_eq!(calls[0].args[1], pkg.dir.to_string_lossy());
    assert_eq!(calls[0].cwd.as_deref(), Some(pkg.dir.as_path()));
  }

  #[test]
  fn test_failure_with_findings_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let pkg = package(&tmp);
    let runner = RecordingRunner::new();
    runner.reply(
      "publint",
      crate::core::exec::CmdOutput {
        success: false,
        code: Some(1),
        stdout: "Error: pkg.exports is invalid\n".to_string(),
        stderr: String::new(),
      },
    );
    let exec = Executor::new(&runner, false);

    let messages = CommandLinter::new(&exec, vec!["publint".into()]).lint(&pkg).unwrap();
    assert_eq!(messages.len(), 1);
  }

  #[test]
  fn test_silent_failure_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let pkg = package(&tmp);
    let runner = RecordingRunner::new();
    runner.reply("publint", RecordingRunner::fail("command not found"));
    let exec = Executor::new(&runner, false);

    let err = CommandLinter::new(&exec, vec!["publint".into()]).lint(&pkg).unwrap_err();
    assert!(matches!(err, ReleaseError::CommandFailed { status: Some(1), .. }));
  }

  #[test]
  fn test_empty_command_reports_nothing() {
    let tmp = TempDir::new().unwrap();
    let pkg = package(&tmp);
    let runner = RecordingRunner::new();
    let exec = Executor::new(&runner, false);

    assert!(CommandLinter::new(&exec, Vec::new()).lint(&pkg).unwrap().is_empty());
    assert!(runner.calls.borrow().is_empty());
  }
}
