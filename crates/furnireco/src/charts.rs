//! Terminal charts for the analytics page
//!
//! Charts never sort or aggregate: rows come out in series order, exactly as
//! the backend listed them.

use colored::*;
use serde::Serialize;

use crate::types::CountMap;

/// Cyclic palette; category slices beyond the fifth reuse colors.
pub const PALETTE: [&str; 5] = ["#8884d8", "#82ca9d", "#ffc658", "#d88484", "#8dd1e1"];

pub const BRAND_FILL: &str = PALETTE[0];
pub const PRICE_FILL: &str = PALETTE[1];

const BAR_WIDTH: usize = 40;
const BAR_GLYPH: &str = "█";
const SWATCH: &str = "●";

pub fn palette_color(index: usize) -> &'static str {
  PALETTE[index % PALETTE.len()]
}

/// Parse `#rrggbb`
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
  let digits = hex.strip_prefix('#')?;
  if digits.len() != 6 || !digits.is_ascii() {
    return None;
  }
  let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
  Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn paint(text: &str, hex: &str) -> String {
  match hex_to_rgb(hex) {
    Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
    None => text.to_string(),
  }
}

/// One positional `{label, count}` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeriesEntry {
  pub label: String,
  pub count: u64,
}

impl ChartSeriesEntry {
  pub fn new(label: impl Into<String>, count: u64) -> Self {
    Self { label: label.into(), count }
  }
}

pub fn series_from(map: &CountMap) -> Vec<ChartSeriesEntry> {
  map.iter().map(|(label, count)| ChartSeriesEntry::new(label, count)).collect()
}

/// A laid-out chart row, before any color is applied
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
  pub label: String,
  pub count: u64,
  pub bar_len: usize,
  pub color: &'static str,
  /// Share of the total, only for share charts
  pub percent: Option<f64>,
}

fn bar_length(count: u64, max: u64, width: usize) -> usize {
  if count == 0 || max == 0 {
    return 0;
  }
  let scaled = (count as f64 / max as f64 * width as f64).round() as usize;
  scaled.max(1)
}

fn pad_to(text: &str, width: usize) -> String {
  let used = console::measure_text_width(text);
  format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

fn render_rows(title: &str, rows: &[ChartRow], swatch: bool) -> Vec<String> {
  let mut out = vec![title.bold().underline().to_string()];
  if rows.is_empty() {
    out.push("  (no data)".dimmed().to_string());
    return out;
  }

  let label_width = rows.iter().map(|r| console::measure_text_width(&r.label)).max().unwrap_or(0);
  for row in rows {
    let mut line = String::from("  ");
    if swatch {
      line.push_str(&paint(SWATCH, row.color));
      line.push(' ');
    }
    line.push_str(&pad_to(&row.label, label_width));
    line.push_str(" │ ");
    line.push_str(&paint(&BAR_GLYPH.repeat(row.bar_len), row.color));
    line.push_str(&format!(" {}", row.count));
    if let Some(percent) = row.percent {
      line.push_str(&format!(" ({percent:.1}%)").dimmed().to_string());
    }
    out.push(line);
  }
  out
}

/// Single-color horizontal bar chart
pub struct BarChart<'a> {
  pub title: &'a str,
  pub entries: &'a [ChartSeriesEntry],
  pub fill: &'static str,
}

impl<'a> BarChart<'a> {
  pub fn new(title: &'a str, entries: &'a [ChartSeriesEntry], fill: &'static str) -> Self {
    Self { title, entries, fill }
  }

  pub fn rows(&self) -> Vec<ChartRow> {
    let max = self.entries.iter().map(|e| e.count).max().unwrap_or(0);
    self
      .entries
      .iter()
      .map(|entry| ChartRow {
        label: entry.label.clone(),
        count: entry.count,
        bar_len: bar_length(entry.count, max, BAR_WIDTH),
        color: self.fill,
        percent: None,
      })
      .collect()
  }

  pub fn render(&self) -> Vec<String> {
    render_rows(self.title, &self.rows(), false)
  }
}

/// Part-of-whole chart; the terminal stand-in for a pie. Each slice is
/// colored by its position in the palette.
pub struct ShareChart<'a> {
  pub title: &'a str,
  pub entries: &'a [ChartSeriesEntry],
}

impl<'a> ShareChart<'a> {
  pub fn new(title: &'a str, entries: &'a [ChartSeriesEntry]) -> Self {
    Self { title, entries }
  }

  pub fn rows(&self) -> Vec<ChartRow> {
    let total: u64 = self.entries.iter().map(|e| e.count).sum();
    self
      .entries
      .iter()
      .enumerate()
      .map(|(index, entry)| ChartRow {
        label: entry.label.clone(),
        count: entry.count,
        bar_len: bar_length(entry.count, total, BAR_WIDTH),
        color: palette_color(index),
        percent: Some(if total == 0 { 0.0 } else { entry.count as f64 * 100.0 / total as f64 }),
      })
      .collect()
  }

  pub fn render(&self) -> Vec<String> {
    render_rows(self.title, &self.rows(), true)
  }
}
