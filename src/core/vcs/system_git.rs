//! System git backend
//!
//! Every call is a `git -C <root> ...` subprocess routed through the [`Executor`]:
//! `add`, `commit`, `tag` and `push` are gated by dry-run mode, while `diff`,
//! `tag --list`, `rev-list` and `log` always run.

use crate::core::error::{GitError, ReleaseError, ReleaseResult};
use crate::core::exec::{Cmd, CmdOutput, Executor};
use crate::utils::path_to_git_format;
use std::path::{Path, PathBuf};

/// Git backend using the system `git` binary
pub struct SystemGit<'a> {
  exec: &'a Executor<'a>,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl<'a> SystemGit<'a> {
  /// Open a git repository rooted at (or containing) `path`
  ///
  /// This performs ONE subprocess call to resolve the work tree.
  pub fn open(exec: &'a Executor<'a>, path: &Path) -> ReleaseResult<Self> {
    let output = exec.query(&Cmd::new("git").arg("-C").arg(path.to_string_lossy()).args(["rev-parse", "--show-toplevel"]))?;

    if !output.success {
      if output.stderr.contains("not a git repository") {
        return Err(ReleaseError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ReleaseError::message(format!(
        "Failed to open git repository: {}",
        output.stderr.trim()
      )));
    }

    Ok(Self {
      exec,
      work_tree: PathBuf::from(output.stdout.trim()),
    })
  }

  /// Backend for a known work tree, without resolving it through git
  #[cfg(test)]
  pub(crate) fn at(exec: &'a Executor<'a>, work_tree: &Path) -> Self {
    Self {
      exec,
      work_tree: work_tree.to_path_buf(),
    }
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Unstaged working-tree diff (empty string when clean)
  pub fn diff(&self) -> ReleaseResult<String> {
    let output = self.checked_query(&["diff"])?;
    Ok(output.stdout)
  }

  /// Stage everything (`git add -A`)
  pub fn add_all(&self) -> ReleaseResult<()> {
    self.exec.run(&self.git_cmd(&["add", "-A"]))
  }

  pub fn commit(&self, message: &str) -> ReleaseResult<()> {
    self.exec.run(&self.git_cmd(&["commit", "-m", message]))
  }

  /// Create a lightweight tag at HEAD
  pub fn tag(&self, name: &str) -> ReleaseResult<()> {
    self.exec.run(&self.git_cmd(&["tag", name]))
  }

  /// Push a single ref (`git push <remote> <ref>`)
  pub fn push_ref(&self, remote: &str, refspec: &str) -> ReleaseResult<()> {
    self.exec.run(&self.git_cmd(&["push", remote, refspec]))
  }

  /// Push the current branch to its upstream
  pub fn push(&self) -> ReleaseResult<()> {
    self.exec.run(&self.git_cmd(&["push"]))
  }

  /// All tag names in the repository
  pub fn tags(&self) -> ReleaseResult<Vec<String>> {
    let output = self.checked_query(&["tag", "--list"])?;
    Ok(
      output
        .stdout
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }

  /// Commit SHA a revision (tag, branch) points at
  pub fn rev_parse_commit(&self, rev: &str) -> ReleaseResult<String> {
    let output = self.checked_query(&["rev-list", "-n", "1", rev])?;
    Ok(output.stdout.trim().to_string())
  }

  /// Print `git log <range> --oneline -- <path>` straight to the terminal
  pub fn print_log(&self, range: &str, path: &Path) -> ReleaseResult<()> {
    let path = path_to_git_format(path);
    let cmd = Cmd::new("git")
      .arg("-C")
      .arg(self.work_tree.to_string_lossy())
      .args(["--no-pager", "log", range, "--oneline", "--"])
      .arg(path);
    self.exec.run_tool(&cmd)
  }

  fn checked_query(&self, args: &[&str]) -> ReleaseResult<CmdOutput> {
    let output = self.exec.query(&self.git_cmd(args))?;
    if !output.success {
      return Err(ReleaseError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: output.stderr,
      }));
    }
    Ok(output)
  }

  /// Build a git command scoped to the work tree
  pub(crate) fn git_cmd(&self, args: &[&str]) -> Cmd {
    Cmd::new("git")
      .arg("-C")
      .arg(self.work_tree.to_string_lossy())
      .args(args.iter().copied())
  }
}
