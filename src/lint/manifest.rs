//! Built-in package.json checks
//!
//! A small subset of what publint reports: entry points that point at missing
//! files, an invalid version, and metadata the registry page relies on.

use super::{LintMessage, PackageLinter, Severity};
use crate::core::error::ReleaseResult;
use crate::package::Package;
use serde_json::Value;
use std::path::Path;

pub struct ManifestLinter;

impl PackageLinter for ManifestLinter {
  fn lint(&self, package: &Package) -> ReleaseResult<Vec<LintMessage>> {
    let mut messages = Vec::new();
    let manifest = &package.manifest;

    if semver::Version::parse(&manifest.version).is_err() {
      messages.push(
        LintMessage::new(
          Severity::Error,
          "INVALID_VERSION",
          format!("\"{}\" is not a valid semver version", manifest.version),
        )
        .at("version"),
      );
    }

    for field in ["main", "module", "types", "typings"] {
      if let Some(Value::String(target)) = manifest.field(field) {
        check_file(&package.dir, target, field, &mut messages);
      }
    }

    match manifest.field("bin") {
      Some(Value::String(target)) => check_file(&package.dir, target, "bin", &mut messages),
      Some(Value::Object(bins)) => {
        for (name, target) in bins {
          if let Value::String(target) = target {
            check_file(&package.dir, target, &format!("bin[\"{}\"]", name), &mut messages);
          }
        }
      }
      _ => {}
    }

    if let Some(exports) = manifest.field("exports") {
      walk_exports(&package.dir, exports, "exports", &mut messages);
    }

    if manifest.field("license").is_none() {
      messages.push(LintMessage::new(
        Severity::Warning,
        "MISSING_LICENSE",
        "package.json has no \"license\" field",
      ));
    }

    if manifest.field("repository").is_none() {
      messages.push(LintMessage::new(
        Severity::Suggestion,
        "MISSING_REPOSITORY",
        "add a \"repository\" field so the registry can link to the source",
      ));
    }

    if manifest.field("files").is_none() && !package.dir.join(".npmignore").exists() {
      messages.push(LintMessage::new(
        Severity::Suggestion,
        "MISSING_FILES",
        "no \"files\" field or .npmignore; every file in the directory will be published",
      ));
    }

    Ok(messages)
  }
}

/// Recurse through conditional/subpath exports, checking every concrete file
fn walk_exports(dir: &Path, value: &Value, path: &str, messages: &mut Vec<LintMessage>) {
  match value {
    Value::String(target) => {
      if target.contains('*') {
        return;
      }
      if !target.starts_with("./") {
        messages.push(
          LintMessage::new(
            Severity::Error,
            "EXPORTS_VALUE_INVALID",
            format!("\"{}\" must start with \"./\"", target),
          )
          .at(path),
        );
        return;
      }
      check_file(dir, target, path, messages);
    }
    Value::Object(entries) => {
      for (key, nested) in entries {
        walk_exports(dir, nested, &format!("{}[\"{}\"]", path, key), messages);
      }
    }
    Value::Array(fallbacks) => {
      for (i, nested) in fallbacks.iter().enumerate() {
        walk_exports(dir, nested, &format!("{}[{}]", path, i), messages);
      }
    }
    _ => {}
  }
}

fn check_file(dir: &Path, target: &str, field: &str, messages: &mut Vec<LintMessage>) {
  let base = dir.join(target);
  let js = dir.join(format!("{}.js", target.trim_end_matches('/')));
  if base.is_file() || js.is_file() || base.join("index.js").is_file() {
    return;
  }
  messages.push(
    LintMessage::new(
      Severity::Error,
      "FILE_DOES_NOT_EXIST",
      format!("{} is referenced but does not exist", target),
    )
    .at(field),
  );
}
