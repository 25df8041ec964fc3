//! Integration tests for `pkg-release plan`

use crate::helpers::{TestWorkspace, run_pkg_release};
use anyhow::Result;

#[test]
fn test_plan_text_output() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "2.1.0")?;

  let output = run_pkg_release(&ws.path, &["plan", "core"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("core (2.1.0)"));
  assert!(stdout.contains("next (2.1.1)"));
  assert!(stdout.contains("beta-minor (2.2.0-beta.0)"));
  assert!(stdout.contains("major (3.0.0)"));

  Ok(())
}

#[test]
fn test_plan_json_covers_every_package() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "1.0.0")?;
  ws.add_package("create-app", "1.0.0-alpha.3")?;
  ws.add_package_with("playground", r#"{"name": "playground", "version": "0.0.0", "private": true}"#)?;

  let output = run_pkg_release(&ws.path, &["plan", "--json"])?;
  let plans: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let plans = plans.as_array().expect("plan output is an array");

  assert_eq!(plans.len(), 2);
  assert_eq!(plans[0]["package"], "core");
  assert_eq!(plans[0]["choices"].as_array().map(|c| c.len()), Some(8));
  assert_eq!(plans[1]["package"], "create-app");
  assert_eq!(plans[1]["next_tag"], "create-app@1.0.0-alpha.4");
  assert_eq!(plans[1]["choices"][1]["value"], "1.0.0-beta.0");

  Ok(())
}
