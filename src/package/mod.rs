//! package.json loading and version rewriting
//!
//! A [`Package`] is read once at the start of a run. Only its `version` field is
//! ever written back, through [`Package::write_version`], which re-reads the file
//! right before writing so edits made to other fields in the meantime survive.
//! The remaining race window is the time between that re-read and the rename.
//! pkg-release is a single-operator tool and accepts it.

use crate::core::error::{PackageError, ReleaseError, ReleaseResult, ResultExt, VersionError};
use crate::utils::expand_placeholders;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";

/// Maps a package name to its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
  root: PathBuf,
  template: String,
}

impl PackageLayout {
  pub const DEFAULT_TEMPLATE: &'static str = "packages/{name}";

  /// `template` is relative to `root` and may contain `{name}`
  pub fn new(root: impl Into<PathBuf>, template: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      template: template.into(),
    }
  }

  /// Directory of `name`, relative to the workspace root
  pub fn relative_dir(&self, name: &str) -> PathBuf {
    PathBuf::from(expand_placeholders(&self.template, &[("name", name)]))
  }

  /// Absolute directory of `name`
  pub fn dir(&self, name: &str) -> PathBuf {
    self.root.join(self.relative_dir(name))
  }
}

/// Fields of package.json the release flow reads
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
  pub name: String,
  pub version: String,
  #[serde(default)]
  pub private: bool,

  /// Everything else, in file order
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl PackageManifest {
  pub fn field(&self, key: &str) -> Option<&Value> {
    self.extra.get(key)
  }
}

/// A loaded, publishable package
#[derive(Debug, Clone)]
pub struct Package {
  pub manifest: PackageManifest,
  /// Path to package.json
  pub path: PathBuf,
  /// Package directory
  pub dir: PathBuf,
}

impl Package {
  /// Load `name` from its layout directory
  ///
  /// Fails with [`PackageError::Private`] when the manifest is marked private.
  pub fn load(name: &str, layout: &PackageLayout) -> ReleaseResult<Self> {
    let dir = layout.dir(name);
    let package = Self::load_dir(&dir)?;

    if package.manifest.private {
      return Err(ReleaseError::Package(PackageError::Private { name: name.to_string() }));
    }

    tracing::debug!(package = name, version = %package.manifest.version, dir = %dir.display(), "loaded package");
    Ok(package)
  }

  fn load_dir(dir: &Path) -> ReleaseResult<Self> {
    let path = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).map_err(|_| ReleaseError::Package(PackageError::NotFound { path: path.clone() }))?;
    let manifest: PackageManifest = serde_json::from_str(&content).map_err(|e| {
      ReleaseError::Package(PackageError::InvalidManifest {
        path: path.clone(),
        reason: e.to_string(),
      })
    })?;

    Ok(Self {
      manifest,
      path,
      dir: dir.to_path_buf(),
    })
  }

  pub fn name(&self) -> &str {
    &self.manifest.name
  }

  pub fn version(&self) -> &str {
    &self.manifest.version
  }

  /// Set `version` in the manifest at `path`, leaving every other field as found on disk
  ///
  /// The file is re-read here rather than reusing the loaded manifest, then written
  /// with 2-space indentation and a trailing newline via tempfile + rename.
  pub fn write_version(path: &Path, version: &str) -> ReleaseResult<()> {
    if semver::Version::parse(version).is_err() {
      return Err(ReleaseError::Version(VersionError::Invalid {
        version: version.to_string(),
      }));
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut doc: Value = serde_json::from_str(&content).map_err(|e| {
      ReleaseError::Package(PackageError::InvalidManifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
      })
    })?;

    let object = doc.as_object_mut().ok_or_else(|| {
      ReleaseError::Package(PackageError::InvalidManifest {
        path: path.to_path_buf(),
        reason: "top-level value is not an object".to_string(),
      })
    })?;
    object.insert("version".to_string(), Value::String(version.to_string()));

    let mut rendered = serde_json::to_string_pretty(&doc)?;
    rendered.push('\n');
    write_atomic(path, rendered.as_bytes())?;

    tracing::debug!(path = %path.display(), version, "wrote package version");
    Ok(())
  }
}

/// Write `content` to `path` via a temp file in the same directory
///
/// An existing file keeps its permissions.
fn write_atomic(path: &Path, content: &[u8]) -> ReleaseResult<()> {
  let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
  let mut tmp = tempfile::NamedTempFile::new_in(dir).with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
  tmp.write_all(content)?;
  if let Ok(metadata) = fs::metadata(path) {
    tmp
      .as_file()
      .set_permissions(metadata.permissions())
      .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
  }
  tmp.as_file().sync_all()?;
  tmp.persist(path)?;
  Ok(())
}
