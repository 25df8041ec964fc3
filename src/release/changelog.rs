//! Changelog generation and recent-commit display
//!
//! pkg-release does not parse commits itself. It hands the package directory to
//! `conventional-changelog` (or a configured replacement) and lets it prepend
//! to CHANGELOG.md.

use crate::core::error::ReleaseResult;
use crate::core::exec::{Cmd, Executor};
use crate::core::vcs::SystemGit;
use crate::package::Package;
use crate::release::tag::TagFormat;
use crate::ui::style;
use crate::utils::expand_placeholders;
use std::path::Path;

pub trait ChangelogWriter {
  /// Print the commits under `dir` since the latest release tag of `name`
  fn log_recent(&self, name: &str, dir: &Path) -> ReleaseResult<()>;

  /// Update the package's changelog for `version` (working tree only)
  fn generate(&self, package: &Package, version: &str) -> ReleaseResult<()>;
}

/// conventional-changelog driven writer
pub struct ConventionalChangelog<'a> {
  exec: &'a Executor<'a>,
  git: &'a SystemGit<'a>,
  tags: TagFormat,
  /// Custom command; `None` uses conventional-changelog with the angular preset
  command: Option<Vec<String>>,
}

impl<'a> ConventionalChangelog<'a> {
  pub fn new(exec: &'a Executor<'a>, git: &'a SystemGit<'a>, tags: TagFormat, command: Option<Vec<String>>) -> Self {
    Self {
      exec,
      git,
      tags,
      command,
    }
  }

  fn command_for(&self, package: &Package, version: &str) -> Option<Cmd> {
    let cmd = match &self.command {
      Some(command) => {
        let (program, args) = command.split_first()?;
        let vars = [("name", package.name()), ("version", version)];
        Cmd::new(program).args(args.iter().map(|arg| expand_placeholders(arg, &vars)))
      }
      None => {
        let mut cmd = Cmd::new("npx").args([
          "conventional-changelog",
          "-p",
          "angular",
          "-i",
          "CHANGELOG.md",
          "-s",
          "--commit-path",
          ".",
        ]);
        // Non-root packages are tagged name@version, which is lerna's scheme
        if self.tags.prefix(package.name()) != "v" {
          cmd = cmd.args(["--lerna-package", package.name()]);
        }
        cmd
      }
    };
    Some(cmd.current_dir(&package.dir))
  }
}

impl ChangelogWriter for ConventionalChangelog<'_> {
  fn log_recent(&self, name: &str, dir: &Path) -> ReleaseResult<()> {
    let tags = self.git.tags()?;
    let Some(tag) = self.tags.latest(name, &tags) else {
      tracing::debug!(package = name, "no previous release tag");
      return Ok(());
    };

    let sha = self.git.rev_parse_commit(tag)?;
    let short = sha.get(..5).unwrap_or(&sha);
    println!(
      "{} Commits of {} since {} {}",
      style::highlight("i"),
      style::success(name),
      style::success(tag),
      style::dim(&format!("({})", short))
    );

    let dir = dir.strip_prefix(self.git.work_tree()).unwrap_or(dir);
    self.git.print_log(&format!("{}..HEAD", sha), dir)
  }

  fn generate(&self, package: &Package, version: &str) -> ReleaseResult<()> {
    match self.command_for(package, version) {
      Some(cmd) => self.exec.run_tool(&cmd),
      None => Ok(()),
    }
  }
}

/// Writer used when changelogs are disabled in config
pub struct NoChangelog;

impl ChangelogWriter for NoChangelog {
  fn log_recent(&self, _name: &str, _dir: &Path) -> ReleaseResult<()> {
    Ok(())
  }

  fn generate(&self, _package: &Package, _version: &str) -> ReleaseResult<()> {
    Ok(())
  }
}
