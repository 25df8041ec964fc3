//! release.toml parsing
//!
//! Every key is optional. A repository without a config file releases the
//! packages found under `packages/*` with npm and no provenance.

use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use crate::package::{MANIFEST_FILE, PackageLayout};
use crate::registry::PackageManager;
use crate::release::tag::TagFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for pkg-release
/// Searched in order: release.toml, .release.toml, .config/release.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseConfig {
  /// GitHub `owner/repo`, used for the CI link printed after pushing
  #[serde(default)]
  pub repository: Option<String>,

  /// Releasable packages; empty means "every public package in the layout"
  #[serde(default)]
  pub packages: Vec<String>,

  /// Package a bare publish identifier (`1.2.3`, `v1.2.3`) refers to
  #[serde(default)]
  pub default_package: Option<String>,

  /// Flagship package, tagged `v<version>` instead of `<name>@<version>`
  #[serde(default)]
  pub root_package: Option<String>,

  /// Package directory template, relative to the workspace root
  #[serde(default = "default_package_dir")]
  pub package_dir: String,

  #[serde(default)]
  pub package_manager: PackageManager,

  #[serde(default)]
  pub provenance: Provenance,

  /// Remote that release tags are pushed to
  #[serde(default = "default_remote")]
  pub remote: String,

  #[serde(default)]
  pub changelog: ChangelogConfig,

  #[serde(default)]
  pub lint: LintConfig,
}

fn default_package_dir() -> String {
  PackageLayout::DEFAULT_TEMPLATE.to_string()
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_true() -> bool {
  true
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      repository: None,
      packages: Vec::new(),
      default_package: None,
      root_package: None,
      package_dir: default_package_dir(),
      package_manager: PackageManager::default(),
      provenance: Provenance::default(),
      remote: default_remote(),
      changelog: ChangelogConfig::default(),
      lint: LintConfig::default(),
    }
  }
}

/// When to pass `--provenance` to publish
///
/// Written as `provenance = true | false | "unqualified"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawProvenance")]
pub enum Provenance {
  #[default]
  Off,
  Always,
  /// Only for bare identifiers (`v1.2.3`), not `name@1.2.3`
  Unqualified,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProvenance {
  Flag(bool),
  Mode(String),
}

impl TryFrom<RawProvenance> for Provenance {
  type Error = String;

  fn try_from(raw: RawProvenance) -> Result<Self, Self::Error> {
    match raw {
      RawProvenance::Flag(true) => Ok(Provenance::Always),
      RawProvenance::Flag(false) => Ok(Provenance::Off),
      RawProvenance::Mode(mode) if mode == "unqualified" => Ok(Provenance::Unqualified),
      RawProvenance::Mode(mode) => Err(format!(
        "provenance must be true, false or \"unqualified\" (got \"{}\")",
        mode
      )),
    }
  }
}

impl Provenance {
  /// Whether a publish for an identifier of the given form gets provenance
  pub fn applies(&self, qualified: bool) -> bool {
    match self {
      Provenance::Off => false,
      Provenance::Always => true,
      Provenance::Unqualified => !qualified,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,

  /// Replacement for the conventional-changelog invocation (`{name}`, `{version}` expanded)
  #[serde(default)]
  pub command: Option<Vec<String>>,
}

impl Default for ChangelogConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      command: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LintConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,

  /// External linter run in the package directory (`{name}`, `{dir}` expanded)
  #[serde(default)]
  pub command: Option<Vec<String>>,
}

impl Default for LintConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      command: None,
    }
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("release.toml"),
      root.join(".release.toml"),
      root.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the config for `root`, falling back to defaults when there is no file
  pub fn load(root: &Path) -> ReleaseResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      tracing::debug!(root = %root.display(), "no release.toml, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content).map_err(|e| {
      ReleaseError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.message().to_string(),
      })
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  pub fn layout(&self, root: &Path) -> PackageLayout {
    PackageLayout::new(root, self.package_dir.clone())
  }

  pub fn tag_format(&self) -> TagFormat {
    TagFormat::new(self.root_package.clone())
  }

  /// Packages the release command may pick from
  ///
  /// Without an explicit list, every directory matched by a `<parent>/{name}`
  /// layout that holds a non-private package.json, sorted by name.
  pub fn releasable_packages(&self, root: &Path) -> ReleaseResult<Vec<String>> {
    if !self.packages.is_empty() {
      return Ok(self.packages.clone());
    }

    let Some(parent) = self.package_dir.strip_suffix("{name}") else {
      return Ok(Vec::new());
    };
    let parent = root.join(parent);
    if !parent.is_dir() {
      return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&parent).with_context(|| format!("Failed to list {}", parent.display()))? {
      let entry = entry?;
      let manifest = entry.path().join(MANIFEST_FILE);
      if !manifest.is_file() {
        continue;
      }
      let content = fs::read_to_string(&manifest)?;
      let private = serde_json::from_str::<serde_json::Value>(&content)
        .ok()
        .and_then(|doc| doc.get("private").and_then(|p| p.as_bool()))
        .unwrap_or(false);
      if !private {
        names.push(entry.file_name().to_string_lossy().into_owned());
      }
    }
    names.sort();
    Ok(names)
  }

  /// Package used for bare publish identifiers
  pub fn default_package(&self) -> ReleaseResult<&str> {
    if let Some(name) = self.default_package.as_deref().or(self.root_package.as_deref()) {
      return Ok(name);
    }
    match self.packages.as_slice() {
      [only] => Ok(only.as_str()),
      _ => Err(ReleaseError::Config(ConfigError::MissingField {
        field: "default_package".to_string(),
      })),
    }
  }

  /// CI workflow page to watch after pushing a release tag
  pub fn ci_url(&self) -> Option<String> {
    self
      .repository
      .as_ref()
      .map(|repo| format!("https://github.com/{}/actions/workflows/publish.yml", repo))
  }
}
