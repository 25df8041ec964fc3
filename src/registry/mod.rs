//! npm registry collaborator
//!
//! Lookups always go through `npm info` (every package manager reads the same
//! registry); publishing uses the configured package manager's CLI.

use crate::core::error::{RegistryError, ReleaseError, ReleaseResult};
use crate::core::exec::{Cmd, Executor};
use crate::release::channel::DistributionChannel;
use clap::ValueEnum;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// CLI used for `publish`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
  #[default]
  Npm,
  /// Refuses to publish from a dirty or non-default branch unless told otherwise
  Pnpm,
}

impl PackageManager {
  pub fn binary(&self) -> &'static str {
    match self {
      PackageManager::Npm => "npm",
      PackageManager::Pnpm => "pnpm",
    }
  }
}

impl fmt::Display for PackageManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.binary())
  }
}

/// Options for a single publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
  pub channel: DistributionChannel,
  pub provenance: bool,
  pub package_manager: PackageManager,
}

impl PublishOptions {
  /// Arguments after the package manager binary
  pub fn args(&self) -> Vec<String> {
    let mut args = vec!["publish".to_string(), "--access".to_string(), "public".to_string()];

    if let Some(tag) = self.channel.as_tag() {
      args.push("--tag".to_string());
      args.push(tag.to_string());
    }

    if self.provenance {
      args.push("--provenance".to_string());
    }

    // CI checks out a detached tag; pnpm would refuse to publish from there
    if self.package_manager == PackageManager::Pnpm {
      args.push("--no-git-checks".to_string());
    }

    args
  }
}

pub struct Registry<'a> {
  exec: &'a Executor<'a>,
}

impl<'a> Registry<'a> {
  pub fn new(exec: &'a Executor<'a>) -> Self {
    Self { exec }
  }

  /// Version currently behind the `latest` dist-tag, or `None` if the package was never published
  pub fn active_version(&self, name: &str) -> ReleaseResult<Option<Version>> {
    let output = self.exec.query(&Cmd::new("npm").args(["info", name, "version"]))?;

    if !output.success {
      if is_not_found(&output.stderr) {
        tracing::debug!(package = name, "not found on registry");
        return Ok(None);
      }
      return Err(ReleaseError::Registry(RegistryError::LookupFailed {
        package: name.to_string(),
        stderr: output.stderr,
      }));
    }

    let raw = output.stdout.trim();
    if raw.is_empty() {
      return Ok(None);
    }

    Version::parse(raw).map(Some).map_err(|_| {
      ReleaseError::Registry(RegistryError::LookupFailed {
        package: name.to_string(),
        stderr: format!("unexpected version from registry: {}", raw),
      })
    })
  }

  /// Publish the package in `dir` (gated by dry-run mode)
  pub fn publish(&self, dir: &Path, options: &PublishOptions) -> ReleaseResult<()> {
    let cmd = Cmd::new(options.package_manager.binary())
      .args(options.args())
      .current_dir(dir);
    self.exec.run(&cmd)
  }
}

/// `npm ERR! code E404` (npm <= 8) / `npm error code E404` (npm >= 9)
fn is_not_found(stderr: &str) -> bool {
  stderr.contains("code E404") || stderr.contains("404 Not Found")
}
