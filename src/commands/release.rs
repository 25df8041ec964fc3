//! Release command implementation
//!
//! Interactive release of one package: pick the package and the next version,
//! bump package.json, regenerate the changelog, then commit, tag and push.
//! Publishing happens later, in CI, when the pushed tag triggers `pkg-release publish`.

use crate::core::config::ReleaseConfig;
use crate::core::context::RunContext;
use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, VersionError};
use crate::core::exec::{Executor, SystemRunner};
use crate::core::vcs::SystemGit;
use crate::lint::{LintSet, PackageLinter};
use crate::package::Package;
use crate::release::changelog::{ChangelogWriter, ConventionalChangelog, NoChangelog};
use crate::release::channel::DistributionChannel;
use crate::release::choices::{ChoiceValue, plan_versions};
use crate::ui::prompt::{Prompter, TermPrompter};
use crate::ui::style;

/// Options from the command line
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
  /// Package to release; prompts when several are releasable
  pub package: Option<String>,
  /// Target version; skips the version menu
  pub version: Option<String>,
  /// Answer every confirmation with yes
  pub yes: bool,
}

/// How a release run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
  /// The operator backed out before anything was written
  Cancelled,
  /// Version bump and changelog produced no diff
  NothingToCommit,
  Released {
    tag: String,
    version: String,
    /// dist-tag the publish step should use (`None` for the default channel)
    channel: Option<DistributionChannel>,
  },
}

/// Drives one release through its collaborators
pub struct ReleaseOrchestrator<'a> {
  ctx: &'a RunContext,
  git: &'a SystemGit<'a>,
  prompter: &'a dyn Prompter,
  linter: &'a dyn PackageLinter,
  changelog: &'a dyn ChangelogWriter,
}

impl<'a> ReleaseOrchestrator<'a> {
  pub fn new(
    ctx: &'a RunContext,
    git: &'a SystemGit<'a>,
    prompter: &'a dyn Prompter,
    linter: &'a dyn PackageLinter,
    changelog: &'a dyn ChangelogWriter,
  ) -> Self {
    Self {
      ctx,
      git,
      prompter,
      linter,
      changelog,
    }
  }

  pub fn run(&self, options: &ReleaseOptions) -> ReleaseResult<ReleaseOutcome> {
    let Some(name) = self.select_package(options.package.as_deref())? else {
      return Ok(ReleaseOutcome::Cancelled);
    };

    let layout = self.ctx.layout();
    self.changelog.log_recent(&name, &layout.dir(&name))?;
    let package = Package::load(&name, &layout)?;

    let messages = self.linter.lint(&package)?;
    if !messages.is_empty() {
      for message in &messages {
        println!("{}", message);
      }
      let prompt = format!("{} messages from lint. Continue anyway?", messages.len());
      if !self.confirm(options.yes, &prompt)? {
        return Err(ReleaseError::LintDeclined { count: messages.len() });
      }
    }

    let Some(version) = self.select_version(&package, options.version.as_deref())? else {
      return Ok(ReleaseOutcome::Cancelled);
    };
    if semver::Version::parse(&version).is_err() {
      return Err(ReleaseError::Version(VersionError::Invalid { version }));
    }

    let tag = self.ctx.tag_format().format(&name, &version);
    let channel = self
      .ctx
      .channel_override
      .clone()
      .or_else(|| DistributionChannel::for_prerelease(&version));

    if !self.confirm(options.yes, &format!("Releasing {} Confirm?", style::highlight(&tag)))? {
      return Ok(ReleaseOutcome::Cancelled);
    }

    style::step("\nUpdating package version...");
    Package::write_version(&package.path, &version)?;
    self.changelog.generate(&package, &version)?;

    if self.git.diff()?.is_empty() {
      println!("No changes to commit.");
      return Ok(ReleaseOutcome::NothingToCommit);
    }

    style::step("\nCommitting changes...");
    self.git.add_all()?;
    self.git.commit(&format!("release: {}", tag))?;
    self.git.tag(&tag)?;

    style::step("\nPushing to GitHub...");
    self.git.push_ref(&self.ctx.config.remote, &format!("refs/tags/{}", tag))?;
    self.git.push()?;

    tracing::debug!(%tag, %version, channel = ?channel, "release pushed");
    Ok(ReleaseOutcome::Released { tag, version, channel })
  }

  fn select_package(&self, requested: Option<&str>) -> ReleaseResult<Option<String>> {
    let available = self.ctx.config.releasable_packages(&self.ctx.root)?;

    if let Some(name) = requested {
      if !available.is_empty() && !available.iter().any(|p| p == name) {
        return Err(ReleaseError::Config(ConfigError::UnknownPackage {
          name: name.to_string(),
          available,
        }));
      }
      return Ok(Some(name.to_string()));
    }

    match available.as_slice() {
      [] => Err(ReleaseError::Config(ConfigError::MissingField {
        field: "packages".to_string(),
      })),
      [only] => Ok(Some(only.clone())),
      _ => {
        let choice = self.prompter.select("Select package", &available)?;
        Ok(choice.and_then(|i| available.get(i).cloned()))
      }
    }
  }

  /// Target version from the command line, the menu, or free text
  fn select_version(&self, package: &Package, preset: Option<&str>) -> ReleaseResult<Option<String>> {
    if let Some(version) = preset {
      return Ok(Some(version.trim().to_string()));
    }

    let choices = plan_versions(package.version())?;
    let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
    let Some(index) = self.prompter.select("Select release type", &labels)? else {
      return Ok(None);
    };

    match choices.get(index).map(|c| &c.value) {
      Some(ChoiceValue::Version(version)) => Ok(Some(version.clone())),
      Some(ChoiceValue::Custom) => {
        // Leaving the custom version empty fails validation rather than cancelling
        let custom = self.prompter.input("Input custom version", package.version())?;
        Ok(Some(custom.unwrap_or_default()))
      }
      None => Ok(None),
    }
  }

  fn confirm(&self, yes: bool, prompt: &str) -> ReleaseResult<bool> {
    if yes {
      return Ok(true);
    }
    self.prompter.confirm(prompt)
  }
}

/// Run the release command
pub fn run_release(ctx: &RunContext, options: ReleaseOptions) -> ReleaseResult<()> {
  let runner = SystemRunner;
  let exec = Executor::new(&runner, ctx.dry_run);
  let git = SystemGit::open(&exec, &ctx.root)?;
  let linter = LintSet::from_config(&exec, &ctx.config.lint);
  if linter.is_empty() {
    tracing::debug!("lint disabled");
  }

  let conventional;
  let changelog: &dyn ChangelogWriter = if ctx.config.changelog.enabled {
    conventional = ConventionalChangelog::new(&exec, &git, ctx.tag_format(), ctx.config.changelog.command.clone());
    &conventional
  } else {
    &NoChangelog
  };

  let outcome = ReleaseOrchestrator::new(ctx, &git, &TermPrompter, &linter, changelog).run(&options)?;
  print_outcome(&ctx.config, ctx.dry_run, &outcome);
  Ok(())
}

fn print_outcome(config: &ReleaseConfig, dry_run: bool, outcome: &ReleaseOutcome) {
  let ReleaseOutcome::Released { tag, version, channel } = outcome else {
    return;
  };

  if let Some(channel) = channel {
    println!("\n{} ({}) will be published under the '{}' dist-tag.", tag, version, channel);
  }

  if dry_run {
    println!("\nDry run finished - run git diff to see package changes.");
  } else {
    println!(
      "\n{}",
      style::success("✅ Pushed, publishing should start shortly on CI.")
    );
    if let Some(url) = config.ci_url() {
      println!("{}", style::success(&url));
    }
  }
  println!();
}
