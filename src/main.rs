mod commands;
mod core;
mod lint;
mod logging;
mod package;
mod registry;
mod release;
mod ui;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use core::context::RunContext;
use core::error::{ReleaseError, print_error};
use registry::PackageManager;
use std::path::PathBuf;

/// Version, tag, changelog and publish packages in a JavaScript monorepo
#[derive(Parser)]
#[command(name = "pkg-release")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Print mutating commands (commit, tag, push, publish) instead of running them
  #[arg(long, global = true, visible_alias = "dry-run")]
  dry: bool,

  /// More diagnostic output on stderr (-v debug, -vv trace)
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  /// Workspace root (default: current directory)
  #[arg(short = 'C', long = "root", global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Bump a package, update its changelog, then commit, tag and push
  Release {
    /// Package to release (prompts when several are releasable)
    package: Option<String>,
    /// dist-tag to publish under (default: derived from the version)
    #[arg(long)]
    tag: Option<String>,
    /// Release this version instead of choosing from the menu
    #[arg(long = "version", id = "target_version", value_name = "SEMVER")]
    target_version: Option<String>,
    /// Answer yes to every confirmation
    #[arg(short, long)]
    yes: bool,
  },

  /// Publish the package named by a release tag (run from CI)
  Publish {
    /// `<version>`, `v<version>` or `<package>@<version>`
    id: Option<String>,
    /// dist-tag to publish under (default: derived from the version)
    #[arg(long)]
    tag: Option<String>,
    /// Publish with provenance attestation
    #[arg(long, conflicts_with = "no_provenance")]
    provenance: bool,
    /// Publish without provenance, whatever the config says
    #[arg(long)]
    no_provenance: bool,
    /// Package manager to publish with
    #[arg(long, value_enum)]
    package_manager: Option<PackageManager>,
  },

  /// Show the version choices for a package without releasing
  Plan {
    /// Package to plan (default: every releasable package)
    package: Option<String>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init(cli.verbose);

  let workspace_root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(ReleaseError::from(e).context("Failed to get current directory")),
    },
  };

  let tag = match &cli.command {
    Commands::Release { tag, .. } | Commands::Publish { tag, .. } => tag.as_deref(),
    Commands::Plan { .. } => None,
  };

  // Config is loaded once; every command reads it from the context
  let ctx = match RunContext::build(&workspace_root, cli.dry, tag) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  if ctx.dry_run {
    ui::style::dry_run_banner();
  }

  let result = match cli.command {
    Commands::Release {
      package,
      target_version,
      yes,
      ..
    } => commands::run_release(
      &ctx,
      commands::ReleaseOptions {
        package,
        version: target_version,
        yes,
      },
    ),
    Commands::Publish {
      id,
      provenance,
      no_provenance,
      package_manager,
      ..
    } => commands::run_publish(
      &ctx,
      commands::PublishArgs {
        id,
        provenance: match (provenance, no_provenance) {
          (true, _) => Some(true),
          (_, true) => Some(false),
          _ => None,
        },
        package_manager,
      },
    ),
    Commands::Plan { package, json } => commands::run_plan(&ctx, package, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
