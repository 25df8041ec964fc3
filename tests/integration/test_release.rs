//! Integration tests for `pkg-release release`

use crate::helpers::{TestWorkspace, run_pkg_release, run_pkg_release_raw};
use anyhow::Result;

const NO_CHANGELOG: &str = r#"
[changelog]
enabled = false
"#;

#[test]
fn test_dry_run_writes_manifest_only() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "1.0.0")?;
  ws.write_config(NO_CHANGELOG)?;
  ws.commit_and_push("feat: add core")?;

  let output = run_pkg_release(&ws.path, &["--dry", "release", "core", "--version", "1.1.0", "--yes"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("DRY RUN"));
  assert!(stdout.contains("[dryrun] git -C"));
  assert!(stdout.contains("commit -m release: core@1.1.0"));
  assert!(stdout.contains("push origin refs/tags/core@1.1.0"));
  assert!(stdout.contains("Dry run finished - run git diff to see package changes."));

  // The version bump is left in the working tree for inspection
  assert_eq!(ws.package_version("core")?, "1.1.0");
  assert!(ws.tags()?.is_empty());
  assert_eq!(ws.git_log(1)?, vec!["feat: add core"]);

  Ok(())
}

#[test]
fn test_release_commits_tags_and_pushes() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "1.0.0")?;
  ws.write_config(NO_CHANGELOG)?;
  ws.commit_and_push("feat: add core")?;

  run_pkg_release(&ws.path, &["release", "--version", "1.1.0", "--yes"])?;

  assert_eq!(ws.package_version("core")?, "1.1.0");
  assert_eq!(ws.git_log(1)?, vec!["release: core@1.1.0"]);
  assert_eq!(ws.tags()?, vec!["core@1.1.0"]);
  assert_eq!(ws.remote_tags()?, vec!["core@1.1.0"]);

  Ok(())
}

#[test]
fn test_root_package_uses_v_tags() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "2.0.0")?;
  ws.add_package("cli", "0.1.0")?;
  ws.write_config(
    r#"
root_package = "core"

[changelog]
enabled = false
"#,
  )?;
  ws.commit_and_push("feat: add packages")?;

  let output = run_pkg_release(&ws.path, &["release", "core", "--version", "2.1.0-beta.0", "--yes"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert_eq!(ws.tags()?, vec!["v2.1.0-beta.0"]);
  assert!(stdout.contains("'beta' dist-tag"));
  assert_eq!(ws.package_version("cli")?, "0.1.0");

  Ok(())
}

#[test]
fn test_unchanged_version_has_nothing_to_commit() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "1.0.0")?;
  ws.write_config(NO_CHANGELOG)?;
  ws.commit_and_push("feat: add core")?;

  let output = run_pkg_release(&ws.path, &["release", "--version", "1.0.0", "--yes"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("No changes to commit."));
  assert!(ws.tags()?.is_empty());
  assert_eq!(ws.git_log(1)?, vec!["feat: add core"]);

  Ok(())
}

#[test]
fn test_private_package_is_refused() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package_with("internal", r#"{"name": "internal", "version": "1.0.0", "private": true}"#)?;
  ws.write_config(
    r#"
packages = ["internal"]

[changelog]
enabled = false
"#,
  )?;
  ws.commit_and_push("chore: add internal")?;

  let output = run_pkg_release_raw(&ws.path, &["release", "--version", "1.0.1", "--yes"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr.contains("Package internal is private"));
  assert_eq!(ws.package_version("internal")?, "1.0.0");

  Ok(())
}

#[test]
fn test_invalid_version_is_refused() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "1.0.0")?;
  ws.write_config(NO_CHANGELOG)?;
  ws.commit_and_push("feat: add core")?;

  let output = run_pkg_release_raw(&ws.path, &["release", "--version", "1.2", "--yes"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("invalid target version: 1.2"));
  assert_eq!(ws.package_version("core")?, "1.0.0");

  Ok(())
}

#[test]
fn test_lint_messages_accepted_with_yes() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package_with("bare", "{\n  \"name\": \"bare\",\n  \"version\": \"0.1.0\"\n}\n")?;
  ws.write_config(NO_CHANGELOG)?;
  ws.commit_and_push("feat: add bare")?;

  let output = run_pkg_release(&ws.path, &["--dry", "release", "--version", "0.2.0", "--yes"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("WARNING MISSING_LICENSE"));
  assert!(stdout.contains("SUGGESTION MISSING_REPOSITORY"));
  assert_eq!(ws.package_version("bare")?, "0.2.0");

  Ok(())
}
