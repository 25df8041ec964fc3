//! Release planning building blocks
//!
//! - **choices**: the version menu offered for a package's current version
//! - **tag**: release tag names and publish identifiers
//! - **channel**: npm dist-tag selection
//! - **changelog**: changelog generation and recent-commit display

pub mod changelog;
pub mod channel;
pub mod choices;
pub mod tag;
