//! User-facing status lines and failure notices
//!
//! Everything here goes to stderr so stdout stays clean for cards, charts and
//! `--json` output. Diagnostics belong in `tracing`; these are for people.

use colored::*;

pub const RECOMMEND_FAILED: &str = "Failed to fetch recommendations. Is your backend running?";
pub const ANALYTICS_FAILED: &str = "Failed to load analytics data. Is your backend running?";

const PREFIX_WIDTH: usize = 5;

fn prefixed(label: &str, color: Color, message: &str) -> Vec<String> {
  let pad = PREFIX_WIDTH.saturating_sub(label.len());
  let prefix = format!("[{}]{:pad$}", label.color(color).bold(), "");
  message.lines().map(|line| format!("{prefix} {line}")).collect()
}

fn emit(lines: Vec<String>) {
  for line in lines {
    eprintln!("{line}");
  }
}

pub fn info(message: &str) {
  emit(prefixed("info", Color::Blue, message));
}

pub fn warn(message: &str) {
  emit(prefixed("warn", Color::Yellow, message));
}

pub fn error(message: &str) {
  emit(prefixed("error", Color::Red, message));
}

pub fn success(message: &str) {
  emit(prefixed("sccs", Color::Green, message));
}

pub fn banner_line(length: usize, fill: char) -> String {
  fill.to_string().repeat(length)
}

/// Somewhere to surface a failed request to the person at the terminal.
pub trait Notifier: Send + Sync {
  fn notify(&self, message: &str);
}

/// Prints a framed error notice before the page moves on
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
  fn notify(&self, message: &str) {
    let width = console::measure_text_width(message) + 8;
    let rule = banner_line(width.min(80), '!').red().bold().to_string();
    eprintln!("{rule}");
    error(message);
    eprintln!("{rule}");
  }
}
