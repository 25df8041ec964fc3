//! Diagnostic logging
//!
//! User-facing progress goes to stdout with `println!`. Everything logged
//! through `tracing` is diagnostic and goes to stderr, quiet by default.

use std::io;
use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Level for a `-v` count: 0 = warn, 1 = debug, 2+ = trace
pub fn level_for(verbose: u8) -> Level {
  match verbose {
    0 => Level::WARN,
    1 => Level::DEBUG,
    _ => Level::TRACE,
  }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `-v` when set.
pub fn init(verbose: u8) {
  let level = level_for(verbose);
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("pkg_release={}", level.as_str().to_lowercase())));

  let layer = tracing_subscriber::fmt::layer()
    .compact()
    .with_writer(io::stderr)
    .with_target(false)
    .without_time();

  // A second init (tests) is not an error worth reporting
  let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
