//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A JavaScript monorepo with git history and a bare `origin` remote
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
  pub remote: PathBuf,
}

impl TestWorkspace {
  /// Create a new test workspace with one commit pushed to `origin/main`
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("repo");
    let remote = root.path().join("origin.git");
    std::fs::create_dir_all(&path)?;

    git(root.path(), &["init", "--bare", "--initial-branch=main", "origin.git"])?;

    // Initialize git repo with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "tag.gpgsign", "false"])?;

    std::fs::write(
      path.join("package.json"),
      r#"{
  "name": "monorepo",
  "private": true,
  "workspaces": ["packages/*"]
}
"#,
    )?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial workspace setup"])?;
    git(&path, &["remote", "add", "origin", &remote.to_string_lossy()])?;
    git(&path, &["push", "-u", "origin", "main"])?;

    Ok(Self { _root: root, path, remote })
  }

  /// Add a publishable package under packages/<name> that passes the built-in lint rules
  ///
  /// The manifest is already in the layout pkg-release writes, so rewriting the
  /// same version produces no diff.
  pub fn add_package(&self, name: &str, version: &str) -> Result<PathBuf> {
    let manifest = format!(
      r#"{{
  "name": "{}",
  "version": "{}",
  "license": "MIT",
  "repository": "github:acme/tools",
  "files": [
    "index.js"
  ],
  "main": "./index.js"
}}
"#,
      name, version
    );
    self.add_package_with(name, &manifest)
  }

  /// Add a package with an arbitrary package.json
  pub fn add_package_with(&self, name: &str, manifest: &str) -> Result<PathBuf> {
    let dir = self.path.join("packages").join(name);
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("package.json"), manifest)?;
    std::fs::write(dir.join("index.js"), format!("module.exports = '{}';\n", name))?;
    Ok(dir)
  }

  /// Write release.toml at the workspace root
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("release.toml"), content)?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Commit and push to origin
  pub fn commit_and_push(&self, message: &str) -> Result<String> {
    let sha = self.commit(message)?;
    git(&self.path, &["push"])?;
    Ok(sha)
  }

  /// Get git log
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(lines(&output))
  }

  /// Tags in the local repository
  pub fn tags(&self) -> Result<Vec<String>> {
    Ok(lines(&git(&self.path, &["tag", "--list"])?))
  }

  /// Tags that reached the bare remote
  pub fn remote_tags(&self) -> Result<Vec<String>> {
    Ok(lines(&git(&self.remote, &["tag", "--list"])?))
  }

  /// Version field of packages/<name>/package.json
  pub fn package_version(&self, name: &str) -> Result<String> {
    let content = self.read_file(&format!("packages/{}/package.json", name))?;
    let doc: serde_json::Value = serde_json::from_str(&content)?;
    doc["version"]
      .as_str()
      .map(String::from)
      .context("package.json has no version")
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

fn lines(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout)
    .lines()
    .map(|l| l.trim().to_string())
    .filter(|l| !l.is_empty())
    .collect()
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

fn command(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_pkg-release"));
  cmd.current_dir(cwd).args(args).env("NO_COLOR", "1").env_remove("RUST_LOG");
  cmd
}

/// Run pkg-release and require success
pub fn run_pkg_release(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = command(cwd, args).output().context("Failed to run pkg-release")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "pkg-release command failed: pkg-release {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run pkg-release and return the output whatever the exit status
pub fn run_pkg_release_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  command(cwd, args).output().context("Failed to run pkg-release")
}

/// Run pkg-release with `dir` prepended to PATH (for fake npm/pnpm binaries)
pub fn run_pkg_release_with_path(cwd: &Path, dir: &Path, args: &[&str]) -> Result<Output> {
  let path = std::env::var_os("PATH").unwrap_or_default();
  let mut paths = vec![dir.to_path_buf()];
  paths.extend(std::env::split_paths(&path));
  let joined = std::env::join_paths(paths)?;

  command(cwd, args).env("PATH", joined).output().context("Failed to run pkg-release")
}

/// Write an executable shell script named `name` into `dir`
#[cfg(unix)]
pub fn fake_binary(dir: &Path, name: &str, script: &str) -> Result<PathBuf> {
  use std::os::unix::fs::PermissionsExt;

  std::fs::create_dir_all(dir)?;
  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{}\n", script))?;
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
  Ok(path)
}
