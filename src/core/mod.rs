//! Core building blocks shared by every command
//!
//! - **config**: release.toml parsing
//! - **context**: per-run context (root, config, dry-run flag, channel override)
//! - **error**: error types with contextual help messages and exit codes
//! - **exec**: subprocess execution behind the dry-run gate
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod vcs;
