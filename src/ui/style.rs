//! Console styling for step output
//!
//! Colors are skipped when stdout is not a terminal or `NO_COLOR` is set.

use anstyle::{AnsiColor, Color, Style};
use std::io::IsTerminal;
use std::sync::OnceLock;

fn colors_enabled() -> bool {
  static ENABLED: OnceLock<bool> = OnceLock::new();
  *ENABLED.get_or_init(|| std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal())
}

fn fg(color: AnsiColor) -> Style {
  Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Wrap `text` in `style` when colors are enabled
pub fn paint(style: Style, text: &str) -> String {
  if colors_enabled() {
    format!("{}{}{}", style.render(), text, style.render_reset())
  } else {
    text.to_string()
  }
}

/// Print a pipeline step heading
pub fn step(msg: &str) {
  println!("{}", paint(fg(AnsiColor::Cyan), msg));
}

/// A skipped dry-run command line
pub fn dry(text: &str) -> String {
  paint(fg(AnsiColor::Blue), text)
}

pub fn highlight(text: &str) -> String {
  paint(fg(AnsiColor::Yellow), text)
}

pub fn success(text: &str) -> String {
  paint(fg(AnsiColor::Green), text)
}

pub fn dim(text: &str) -> String {
  paint(fg(AnsiColor::BrightBlack), text)
}

/// Banner shown once at startup in dry-run mode
pub fn dry_run_banner() {
  let style = fg(AnsiColor::Yellow).invert();
  println!("{}", paint(style, " DRY RUN "));
  println!();
}
