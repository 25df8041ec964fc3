//! Release tags and publish identifiers
//!
//! The flagship ("root") package is tagged `v<version>`, every other package
//! `<name>@<version>`. Publishing reverses this: it accepts the tag that
//! triggered CI and works out which package and version it names.

use crate::core::error::{ReleaseError, ReleaseResult, VersionError};

/// Tag naming scheme for a repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFormat {
  root_package: Option<String>,
}

impl TagFormat {
  pub fn new(root_package: Option<String>) -> Self {
    Self { root_package }
  }

  fn is_root(&self, package: &str) -> bool {
    self.root_package.as_deref() == Some(package)
  }

  /// Prefix shared by every tag of `package`
  pub fn prefix(&self, package: &str) -> String {
    if self.is_root(package) {
      "v".to_string()
    } else {
      format!("{}@", package)
    }
  }

  /// Tag for releasing `version` of `package`
  pub fn format(&self, package: &str, version: &str) -> String {
    format!("{}{}", self.prefix(package), version)
  }

  /// Highest semver tag of `package` among `tags`
  pub fn latest<'t>(&self, package: &str, tags: &'t [String]) -> Option<&'t str> {
    let prefix = self.prefix(package);
    tags
      .iter()
      .filter_map(|tag| {
        let version = tag.strip_prefix(prefix.as_str())?;
        semver::Version::parse(version).ok().map(|v| (v, tag.as_str()))
      })
      .max_by(|(a, _), (b, _)| a.cmp(b))
      .map(|(_, tag)| tag)
  }
}

/// Package and version named by a publish identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseId {
  pub package: String,
  pub version: String,
  /// Whether the identifier named the package explicitly (`name@version`)
  pub qualified: bool,
}

impl ReleaseId {
  /// Parse `<version>`, `v<version>` or `<package>@<version>`
  ///
  /// The split happens at the last `@`, so scoped names (`@scope/pkg@1.0.0`) work.
  /// A bare version applies to `default_package`.
  pub fn parse(raw: Option<&str>, default_package: &str) -> ReleaseResult<Self> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let raw = raw.ok_or(ReleaseError::Version(VersionError::MissingTag))?;

    let (package, version, qualified) = match raw.rsplit_once('@') {
      Some((package, version)) if !package.is_empty() => (package.to_string(), version, true),
      _ => (default_package.to_string(), raw, false),
    };

    let version = version.strip_prefix('v').unwrap_or(version);
    if version.is_empty() {
      return Err(ReleaseError::Version(VersionError::MissingTag));
    }

    Ok(Self {
      package,
      version: version.to_string(),
      qualified,
    })
  }
}
