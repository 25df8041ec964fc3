//! Integration tests for `pkg-release publish`

use crate::helpers::{TestWorkspace, run_pkg_release_raw};
use anyhow::Result;

const CONFIG: &str = r#"
default_package = "core"
"#;

#[test]
fn test_version_mismatch() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "3.2.0")?;
  ws.write_config(CONFIG)?;

  let output = run_pkg_release_raw(&ws.path, &["publish", "v3.2.1"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("Package version from tag \"3.2.1\" mismatches with current version \"3.2.0\""));

  Ok(())
}

#[test]
fn test_missing_tag() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "1.0.0")?;
  ws.write_config(CONFIG)?;

  let output = run_pkg_release_raw(&ws.path, &["publish"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("No tag specified"));

  Ok(())
}

#[test]
fn test_private_package() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package_with("core", r#"{"name": "core", "version": "1.0.0", "private": true}"#)?;
  ws.write_config(CONFIG)?;

  let output = run_pkg_release_raw(&ws.path, &["publish", "core@1.0.0"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Package core is private"));

  Ok(())
}

#[cfg(unix)]
mod fake_registry {
  use crate::helpers::{TestWorkspace, fake_binary, run_pkg_release_with_path};
  use anyhow::Result;

  /// npm stand-in: `info` answers with `active` (or E404), everything else is logged
  fn fake_npm(ws: &TestWorkspace, active: Option<&str>) -> Result<std::path::PathBuf> {
    let bin = ws.path.join(".bin");
    let log = ws.path.join("npm.log");
    let info = match active {
      Some(version) => format!("echo {}", version),
      None => "echo 'npm error code E404' >&2; exit 1".to_string(),
    };
    fake_binary(
      &bin,
      "npm",
      &format!(
        "case \"$1\" in\n  info) {} ;;\n  *) echo \"$(basename \"$PWD\") $*\" >> '{}' ;;\nesac",
        info,
        log.display()
      ),
    )?;
    Ok(bin)
  }

  #[test]
  fn test_publish_beta_channel() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.add_package("core", "1.0.0-beta.1")?;
    ws.write_config("default_package = \"core\"\n")?;
    let bin = fake_npm(&ws, None)?;

    let output = run_pkg_release_with_path(&ws.path, &bin, &["publish", "v1.0.0-beta.1"])?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let log = ws.read_file("npm.log")?;
    assert_eq!(log.trim(), "core publish --access public --tag beta");

    Ok(())
  }

  #[test]
  fn test_publish_previous_channel_with_provenance() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.add_package("cli", "1.0.0")?;
    ws.write_config("provenance = true\n")?;
    let bin = fake_npm(&ws, Some("2.0.0"))?;

    let output = run_pkg_release_with_path(&ws.path, &bin, &["publish", "cli@1.0.0"])?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let log = ws.read_file("npm.log")?;
    assert_eq!(log.trim(), "cli publish --access public --tag previous --provenance");

    Ok(())
  }

  #[test]
  fn test_dry_run_does_not_publish() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.add_package("core", "1.0.0")?;
    ws.write_config("default_package = \"core\"\n")?;
    let bin = fake_npm(&ws, None)?;

    let output = run_pkg_release_with_path(&ws.path, &bin, &["publish", "1.0.0", "--dry-run"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("[dryrun] npm publish --access public"));
    assert!(!ws.path.join("npm.log").exists());

    Ok(())
  }
}
