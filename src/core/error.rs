//! Error types for pkg-release with contextual messages and exit codes
//!
//! Every failure of a release or publish run ends up as a [`ReleaseError`].
//! Errors are categorized so `main` can pick an exit code, and most carry a
//! help message pointing the operator at the fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for pkg-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, wrong version, declined prompt)
  User = 1,
  /// System error (git, npm, I/O)
  System = 2,
  /// Validation failure (private package, malformed manifest)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for pkg-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// package.json loading errors
  Package(PackageError),

  /// Version parsing and matching errors
  Version(VersionError),

  /// Registry (npm) errors
  Registry(RegistryError),

  /// Git operation errors
  Git(GitError),

  /// A non-git subprocess exited unsuccessfully
  CommandFailed { command: String, status: Option<i32> },

  /// Operator declined to continue past lint messages
  LintDeclined { count: usize },

  /// Terminal prompt failed (no tty, interrupted)
  Prompt(String),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message { message: String, context: Option<String> },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
      },
      ReleaseError::Io(e) => ReleaseError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Package(PackageError::Private { .. }) => ExitCode::Validation,
      ReleaseError::Package(PackageError::InvalidManifest { .. }) => ExitCode::Validation,
      ReleaseError::Package(PackageError::NotFound { .. }) => ExitCode::User,
      ReleaseError::Version(_) => ExitCode::User,
      ReleaseError::Registry(_) => ExitCode::System,
      ReleaseError::Git(_) => ExitCode::System,
      ReleaseError::CommandFailed { .. } => ExitCode::System,
      ReleaseError::LintDeclined { .. } => ExitCode::User,
      ReleaseError::Prompt(_) => ExitCode::User,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Package(e) => e.help_message(),
      ReleaseError::Version(e) => e.help_message(),
      ReleaseError::Registry(e) => e.help_message(),
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::LintDeclined { .. } => Some("Fix the reported issues and run the release again.".to_string()),
      ReleaseError::Prompt(_) => {
        Some("Run from an interactive terminal, or pass --version and --yes to skip prompts.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Package(e) => write!(f, "{}", e),
      ReleaseError::Version(e) => write!(f, "{}", e),
      ReleaseError::Registry(e) => write!(f, "{}", e),
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::CommandFailed { command, status } => match status {
        Some(code) => write!(f, "Command failed with exit code {}: {}", code, command),
        None => write!(f, "Command terminated by signal: {}", command),
      },
      ReleaseError::LintDeclined { count } => {
        write!(f, "Release aborted after {} lint message(s)", count)
      }
      ReleaseError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<tempfile::PersistError> for ReleaseError {
  fn from(err: tempfile::PersistError) -> Self {
    ReleaseError::Io(err.error)
  }
}

impl From<dialoguer::Error> for ReleaseError {
  fn from(err: dialoguer::Error) -> Self {
    ReleaseError::Prompt(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// release.toml exists but is not valid
  Invalid { path: PathBuf, reason: String },

  /// Missing required field
  MissingField { field: String },

  /// Package not listed as releasable
  UnknownPackage { name: String, available: Vec<String> },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => Some("Known keys: repository, packages, default_package, root_package, package_dir, package_manager, provenance, remote, [changelog], [lint].".to_string()),
      ConfigError::MissingField { field } => Some(format!("Add `{}` to release.toml.", field)),
      ConfigError::UnknownPackage { available, .. } => {
        if available.is_empty() {
          Some("Add `packages = [\"<name>\"]` to release.toml.".to_string())
        } else {
          Some(format!("Releasable packages: {}", available.join(", ")))
        }
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::UnknownPackage { name, .. } => {
        write!(f, "Package '{}' is not configured for release", name)
      }
    }
  }
}

/// package.json errors
#[derive(Debug)]
pub enum PackageError {
  /// Package is flagged `"private": true`
  Private { name: String },

  /// package.json could not be read
  NotFound { path: PathBuf },

  /// package.json is not a valid manifest
  InvalidManifest { path: PathBuf, reason: String },
}

impl PackageError {
  fn help_message(&self) -> Option<String> {
    match self {
      PackageError::Private { .. } => {
        Some("Private packages are never released or published. Remove \"private\" from package.json if this is intended.".to_string())
      }
      PackageError::NotFound { .. } => Some("Check `package_dir` in release.toml (default: packages/{name}).".to_string()),
      PackageError::InvalidManifest { .. } => None,
    }
  }
}

impl fmt::Display for PackageError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PackageError::Private { name } => write!(f, "Package {} is private", name),
      PackageError::NotFound { path } => write!(f, "package.json not found at: {}", path.display()),
      PackageError::InvalidManifest { path, reason } => {
        write!(f, "Invalid package.json at {}: {}", path.display(), reason)
      }
    }
  }
}

/// Version errors
#[derive(Debug)]
pub enum VersionError {
  /// Not a valid semantic version
  Invalid { version: String },

  /// Tag version differs from package.json
  Mismatch { tag_version: String, manifest_version: String },

  /// Publish invoked without a version
  MissingTag,
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::Invalid { .. } => Some("Versions must follow semver, e.g. 1.2.3 or 2.0.0-beta.1".to_string()),
      VersionError::Mismatch { .. } => {
        Some("Check out the commit that was tagged for this release before publishing.".to_string())
      }
      VersionError::MissingTag => Some("Usage: pkg-release publish <version> | <package>@<version>".to_string()),
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::Invalid { version } => write!(f, "invalid target version: {}", version),
      VersionError::Mismatch {
        tag_version,
        manifest_version,
      } => write!(
        f,
        "Package version from tag \"{}\" mismatches with current version \"{}\"",
        tag_version, manifest_version
      ),
      VersionError::MissingTag => write!(f, "No tag specified"),
    }
  }
}

/// Registry errors
#[derive(Debug)]
pub enum RegistryError {
  /// `npm info` failed for a reason other than not-found
  LookupFailed { package: String, stderr: String },
}

impl RegistryError {
  fn help_message(&self) -> Option<String> {
    match self {
      RegistryError::LookupFailed { .. } => Some("Check network access and your npm registry configuration.".to_string()),
    }
  }
}

impl fmt::Display for RegistryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegistryError::LookupFailed { package, stderr } => {
        write!(f, "Registry lookup failed for {}:\n{}", package, stderr.trim_end())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull and re-run the release.".to_string())
        } else if stderr.contains("already exists") {
          Some("A tag with this name already exists. Pick another version.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run pkg-release from inside a git repository (or pass -C): {}",
        path.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for pkg-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
