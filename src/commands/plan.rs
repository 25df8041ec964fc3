//! Plan command implementation
//!
//! Shows the version menu `release` would offer, without prompting or touching
//! anything.

use crate::core::context::RunContext;
use crate::core::error::{ConfigError, ReleaseError, ReleaseResult};
use crate::package::Package;
use crate::release::choices::{ChoiceValue, VersionChoice, plan_versions};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PackagePlan {
  pub package: String,
  pub current: String,
  /// Tag `next` would produce
  pub next_tag: Option<String>,
  pub choices: Vec<VersionChoice>,
}

/// Build the plan for one package
pub fn plan_package(ctx: &RunContext, name: &str) -> ReleaseResult<PackagePlan> {
  let package = Package::load(name, &ctx.layout())?;
  let choices = plan_versions(package.version())?;
  let next_tag = choices.first().and_then(|choice| match &choice.value {
    ChoiceValue::Version(version) => Some(ctx.tag_format().format(name, version)),
    ChoiceValue::Custom => None,
  });

  Ok(PackagePlan {
    package: name.to_string(),
    current: package.version().to_string(),
    next_tag,
    choices,
  })
}

/// Run the plan command (every releasable package when none is named)
pub fn run_plan(ctx: &RunContext, package: Option<String>, json: bool) -> ReleaseResult<()> {
  let names = match package {
    Some(name) => vec![name],
    None => ctx.config.releasable_packages(&ctx.root)?,
  };

  if names.is_empty() {
    return Err(ReleaseError::Config(ConfigError::MissingField {
      field: "packages".to_string(),
    }));
  }

  let plans = names
    .iter()
    .map(|name| plan_package(ctx, name))
    .collect::<ReleaseResult<Vec<_>>>()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&plans)?);
  } else {
    print_plans(&plans);
  }

  Ok(())
}

fn print_plans(plans: &[PackagePlan]) {
  for plan in plans {
    println!("📦 {} ({})", plan.package, plan.current);
    for choice in &plan.choices {
      println!("   {}", choice.label);
    }
    println!();
  }
}
