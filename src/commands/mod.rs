//! CLI commands for pkg-release
//!
//! - **release**: pick a package and version, bump, changelog, commit, tag, push
//! - **publish**: publish the package named by a release tag (run by CI)
//! - **plan**: print the version menu without releasing
//!
//! All commands accept `&RunContext`.

pub mod plan;
pub mod publish;
pub mod release;

pub use plan::run_plan;
pub use publish::{PublishArgs, run_publish};
pub use release::{ReleaseOptions, run_release};
