//! Registry distribution channels (npm dist-tags)

use semver::Version;
use std::fmt;

/// dist-tag a publish targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionChannel {
  /// No `--tag` argument; the registry moves `latest`
  Default,
  Beta,
  Alpha,
  /// Version is older than the active one (maintenance release on an old line)
  Previous,
  /// Operator-supplied dist-tag
  Named(String),
}

impl DistributionChannel {
  /// Parse an operator override; empty means "no override"
  pub fn from_override(tag: Option<&str>) -> Option<Self> {
    let tag = tag.map(str::trim).filter(|t| !t.is_empty())?;
    Some(match tag {
      "beta" => DistributionChannel::Beta,
      "alpha" => DistributionChannel::Alpha,
      "previous" => DistributionChannel::Previous,
      "latest" => DistributionChannel::Default,
      other => DistributionChannel::Named(other.to_string()),
    })
  }

  /// Channel implied by the version string alone (`beta` wins over `alpha`)
  pub fn for_prerelease(version: &str) -> Option<Self> {
    if version.contains("beta") {
      Some(DistributionChannel::Beta)
    } else if version.contains("alpha") {
      Some(DistributionChannel::Alpha)
    } else {
      None
    }
  }

  /// Channel for publishing `version` when `active` is the registry's current version
  pub fn resolve(version: &str, active: Option<&Version>) -> Self {
    if let Some(channel) = Self::for_prerelease(version) {
      return channel;
    }
    match (Version::parse(version), active) {
      (Ok(target), Some(active)) if target < *active => DistributionChannel::Previous,
      _ => DistributionChannel::Default,
    }
  }

  /// Value for `--tag`, or `None` for the default channel
  pub fn as_tag(&self) -> Option<&str> {
    match self {
      DistributionChannel::Default => None,
      DistributionChannel::Beta => Some("beta"),
      DistributionChannel::Alpha => Some("alpha"),
      DistributionChannel::Previous => Some("previous"),
      DistributionChannel::Named(tag) => Some(tag),
    }
  }
}

impl fmt::Display for DistributionChannel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_tag().unwrap_or("latest"))
  }
}
