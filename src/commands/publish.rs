//! Publish command implementation
//!
//! Runs in CI on the tag pushed by `release`. The tag names the package and
//! version; the manifest must already carry that version.

use crate::core::context::RunContext;
use crate::core::error::{ReleaseError, ReleaseResult, VersionError};
use crate::core::exec::{Executor, SystemRunner};
use crate::package::Package;
use crate::registry::{PackageManager, PublishOptions, Registry};
use crate::release::channel::DistributionChannel;
use crate::release::tag::ReleaseId;
use crate::ui::style;

/// Options from the command line
#[derive(Debug, Clone, Default)]
pub struct PublishArgs {
  /// `<version>`, `v<version>` or `<name>@<version>`
  pub id: Option<String>,
  /// Overrides the configured provenance mode
  pub provenance: Option<bool>,
  /// Overrides the configured package manager
  pub package_manager: Option<PackageManager>,
}

/// What was (or in dry-run mode, would have been) published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
  pub package: String,
  pub version: String,
  pub options: PublishOptions,
}

pub struct PublishOrchestrator<'a> {
  ctx: &'a RunContext,
  registry: &'a Registry<'a>,
}

impl<'a> PublishOrchestrator<'a> {
  pub fn new(ctx: &'a RunContext, registry: &'a Registry<'a>) -> Self {
    Self { ctx, registry }
  }

  pub fn run(&self, args: &PublishArgs) -> ReleaseResult<PublishReport> {
    let default_package = self.ctx.config.default_package().ok();
    let mut id = ReleaseId::parse(args.id.as_deref(), default_package.unwrap_or_default())?;
    if !id.qualified {
      // Only bare versions need a default package
      id.package = self.ctx.config.default_package()?.to_string();
    }

    let package = Package::load(&id.package, &self.ctx.layout())?;
    if package.version() != id.version {
      return Err(ReleaseError::Version(VersionError::Mismatch {
        tag_version: id.version,
        manifest_version: package.version().to_string(),
      }));
    }

    let active = self.registry.active_version(package.name())?;

    style::step("Publishing package...");
    let channel = match &self.ctx.channel_override {
      Some(channel) => channel.clone(),
      None => DistributionChannel::resolve(&id.version, active.as_ref()),
    };
    tracing::debug!(package = package.name(), active = ?active, %channel, "resolved channel");

    let options = PublishOptions {
      channel,
      provenance: args
        .provenance
        .unwrap_or_else(|| self.ctx.config.provenance.applies(id.qualified)),
      package_manager: args.package_manager.unwrap_or(self.ctx.config.package_manager),
    };
    self.registry.publish(&package.dir, &options)?;

    Ok(PublishReport {
      package: package.name().to_string(),
      version: id.version,
      options,
    })
  }
}

/// Run the publish command
pub fn run_publish(ctx: &RunContext, args: PublishArgs) -> ReleaseResult<()> {
  let runner = SystemRunner;
  let exec = Executor::new(&runner, ctx.dry_run);
  let registry = Registry::new(&exec);

  let report = PublishOrchestrator::new(ctx, &registry).run(&args)?;

  let verb = if ctx.dry_run { "Would publish" } else { "Published" };
  println!(
    "{}",
    style::success(&format!(
      "✅ {} {}@{} ({})",
      verb, report.package, report.version, report.options.channel
    ))
  );
  Ok(())
}
