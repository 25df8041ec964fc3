//! Version menu: candidate next versions for a release
//!
//! Increments follow the npm `semver.inc` rules so the menu matches what the
//! JavaScript ecosystem expects, in particular for prereleases:
//!
//! - `patch` on `1.0.0-beta.2` yields `1.0.0` (the release the beta was leading to)
//! - `prerelease` on `1.0.0-alpha.3` yields `1.0.0-alpha.4`
//! - `preminor` on `2.1.0` with `beta` yields `2.2.0-beta.0`

use crate::core::error::{ReleaseError, ReleaseResult, VersionError};
use semver::{BuildMetadata, Prerelease, Version};
use serde::Serialize;
use std::fmt;

/// Increment kinds, named after their npm counterparts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
  Major,
  Minor,
  Patch,
  PreMajor,
  PreMinor,
  Prerelease,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Ident {
  Num(u64),
  Str(String),
}

impl fmt::Display for Ident {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Ident::Num(n) => write!(f, "{}", n),
      Ident::Str(s) => write!(f, "{}", s),
    }
  }
}

fn split_prerelease(pre: &Prerelease) -> Vec<Ident> {
  if pre.is_empty() {
    return Vec::new();
  }
  pre
    .as_str()
    .split('.')
    .map(|part| match part.parse::<u64>() {
      Ok(n) if part.chars().all(|c| c.is_ascii_digit()) => Ident::Num(n),
      _ => Ident::Str(part.to_string()),
    })
    .collect()
}

/// `n + 1`, or an invalid-version error for `version` when it would overflow
fn bump(n: u64, version: &str) -> ReleaseResult<u64> {
  n.checked_add(1).ok_or_else(|| {
    ReleaseError::Version(VersionError::Invalid {
      version: version.to_string(),
    })
  })
}

/// Bump the prerelease part and re-label it with `id`
fn bump_prerelease(parts: &mut Vec<Ident>, id: &str, version: &str) -> ReleaseResult<()> {
  if parts.is_empty() {
    parts.push(Ident::Num(0));
  } else if let Some(Ident::Num(n)) = parts.iter_mut().rev().find(|p| matches!(p, Ident::Num(_))) {
    *n = bump(*n, version)?;
  } else {
    parts.push(Ident::Num(0));
  }

  let relabel = match parts.first() {
    Some(Ident::Str(first)) if first == id => !matches!(parts.get(1), Some(Ident::Num(_))),
    _ => true,
  };
  if relabel {
    *parts = vec![Ident::Str(id.to_string()), Ident::Num(0)];
  }
  Ok(())
}

pub fn parse_version(version: &str) -> ReleaseResult<Version> {
  Version::parse(version.trim()).map_err(|_| {
    ReleaseError::Version(VersionError::Invalid {
      version: version.to_string(),
    })
  })
}

/// Increment `version` the way `semver.inc(version, release, id)` does
///
/// `id` is only used by the pre* kinds.
pub fn increment(version: &str, release: ReleaseType, id: &str) -> ReleaseResult<String> {
  let v = parse_version(version)?;
  let (mut major, mut minor, mut patch) = (v.major, v.minor, v.patch);
  let mut pre = split_prerelease(&v.pre);

  match release {
    ReleaseType::Major => {
      if minor != 0 || patch != 0 || pre.is_empty() {
        major = bump(major, version)?;
      }
      minor = 0;
      patch = 0;
      pre.clear();
    }
    ReleaseType::Minor => {
      if patch != 0 || pre.is_empty() {
        minor = bump(minor, version)?;
      }
      patch = 0;
      pre.clear();
    }
    ReleaseType::Patch => {
      if pre.is_empty() {
        patch = bump(patch, version)?;
      }
      pre.clear();
    }
    ReleaseType::PreMajor => {
      major = bump(major, version)?;
      minor = 0;
      patch = 0;
      pre.clear();
      bump_prerelease(&mut pre, id, version)?;
    }
    ReleaseType::PreMinor => {
      minor = bump(minor, version)?;
      patch = 0;
      pre.clear();
      bump_prerelease(&mut pre, id, version)?;
    }
    ReleaseType::Prerelease => {
      if pre.is_empty() {
        patch = bump(patch, version)?;
      }
      bump_prerelease(&mut pre, id, version)?;
    }
  }

  let pre = if pre.is_empty() {
    Prerelease::EMPTY
  } else {
    let joined = pre.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(".");
    Prerelease::new(&joined).map_err(|_| {
      ReleaseError::Version(VersionError::Invalid {
        version: format!("{}.{}.{}-{}", major, minor, patch, joined),
      })
    })?
  };

  let next = Version {
    major,
    minor,
    patch,
    pre,
    build: BuildMetadata::EMPTY,
  };
  Ok(next.to_string())
}

/// Value of a menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ChoiceValue {
  /// A concrete next version
  Version(String),
  /// Ask the operator to type a version
  Custom,
}

impl fmt::Display for ChoiceValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChoiceValue::Version(v) => write!(f, "{}", v),
      ChoiceValue::Custom => write!(f, "custom"),
    }
  }
}

impl From<ChoiceValue> for String {
  fn from(value: ChoiceValue) -> Self {
    value.to_string()
  }
}

/// One entry of the release menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionChoice {
  pub title: &'static str,
  pub label: String,
  pub value: ChoiceValue,
}

impl VersionChoice {
  fn new(title: &'static str, value: ChoiceValue) -> Self {
    let label = format!("{} ({})", title, value);
    Self { title, label, value }
  }

  fn version(title: &'static str, version: String) -> Self {
    Self::new(title, ChoiceValue::Version(version))
  }
}

/// True when the version string is a beta or alpha prerelease
///
/// Other prerelease labels (`rc`, `next`) count as stable lines here.
pub fn is_prerelease(version: &str) -> bool {
  version.contains("beta") || version.contains("alpha")
}

/// Build the ordered release menu for `current`
///
/// Stable versions get eight entries (next, beta/alpha pre-minor and pre-major,
/// minor, major, custom). Alpha versions get next, a first beta, and custom.
/// Beta versions get next, the stable release, and custom.
pub fn plan_versions(current: &str) -> ReleaseResult<Vec<VersionChoice>> {
  let current_alpha = current.contains("alpha");
  let is_stable = !is_prerelease(current);
  let label = if current_alpha { "alpha" } else { "beta" };
  let inc = |release: ReleaseType, id: &str| increment(current, release, id);

  let mut choices = vec![VersionChoice::version(
    "next",
    inc(
      if is_stable {
        ReleaseType::Patch
      } else {
        ReleaseType::Prerelease
      },
      label,
    )?,
  )];

  if is_stable {
    choices.push(VersionChoice::version("beta-minor", inc(ReleaseType::PreMinor, "beta")?));
    choices.push(VersionChoice::version("beta-major", inc(ReleaseType::PreMajor, "beta")?));
    choices.push(VersionChoice::version("alpha-minor", inc(ReleaseType::PreMinor, "alpha")?));
    choices.push(VersionChoice::version("alpha-major", inc(ReleaseType::PreMajor, "alpha")?));
    choices.push(VersionChoice::version("minor", inc(ReleaseType::Minor, label)?));
    choices.push(VersionChoice::version("major", inc(ReleaseType::Major, label)?));
  } else if current_alpha {
    choices.push(VersionChoice::version(
      "beta",
      format!("{}-beta.0", inc(ReleaseType::Patch, label)?),
    ));
  } else {
    choices.push(VersionChoice::version("stable", inc(ReleaseType::Patch, label)?));
  }

  choices.push(VersionChoice::new("custom", ChoiceValue::Custom));

  Ok(choices)
}
