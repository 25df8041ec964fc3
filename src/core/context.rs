//! Per-run context, built once in main.rs and passed to every command
//!
//! ```text
//! main.rs:
//!   RunContext::build(root, dry_run, tag) -> &RunContext
//!   |
//!   v
//! commands/release.rs, publish.rs, plan.rs:
//!   fn run_*(ctx: &RunContext, ...)
//! ```

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use crate::package::PackageLayout;
use crate::release::channel::DistributionChannel;
use crate::release::tag::TagFormat;
use std::path::{Path, PathBuf};

/// Everything a run needs to know up front
///
/// Nothing in here changes once the run has started.
#[derive(Debug, Clone)]
pub struct RunContext {
  /// Workspace root directory (absolute path)
  pub root: PathBuf,

  /// release.toml, or defaults
  pub config: ReleaseConfig,

  /// Skip every mutating command
  pub dry_run: bool,

  /// Operator-supplied dist-tag (`--tag`)
  pub channel_override: Option<DistributionChannel>,
}

impl RunContext {
  pub fn build(workspace_root: &Path, dry_run: bool, tag: Option<&str>) -> ReleaseResult<Self> {
    let root = workspace_root.to_path_buf();
    let config = ReleaseConfig::load(&root)?;

    Ok(Self {
      root,
      config,
      dry_run,
      channel_override: DistributionChannel::from_override(tag),
    })
  }

  pub fn layout(&self) -> PackageLayout {
    self.config.layout(&self.root)
  }

  pub fn tag_format(&self) -> TagFormat {
    self.config.tag_format()
  }
}
