//! Product card rendering

use colored::*;
use serde_json::Value;
use std::fmt;

use crate::normalize::DisplayRecord;

/// Render a JSON field value the way a person would read it
pub fn display_text(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(text) => text.clone(),
    Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(", "),
    other => other.to_string(),
  }
}

/// Numeric reading of a score; `None` when it cannot be read as a number.
pub fn score_number(score: &Value) -> Option<f64> {
  match score {
    Value::Number(n) => n.as_f64(),
    Value::String(text) if text.trim().is_empty() => Some(0.0),
    Value::String(text) => text.trim().parse::<f64>().ok(),
    Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
    _ => None,
  }
}

/// Fixed three-decimal score text
pub fn format_score(score: &Value) -> String {
  match score_number(score) {
    Some(n) if n.is_finite() => format!("{n:.3}"),
    _ => "NaN".to_string(),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
  Title,
  Field,
  Score,
}

/// One line of a product card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLine {
  pub kind: LineKind,
  pub label: Option<&'static str>,
  pub value: String,
}

impl CardLine {
  fn title(value: String) -> Self {
    Self { kind: LineKind::Title, label: None, value }
  }

  fn field(label: &'static str, value: String) -> Self {
    Self { kind: LineKind::Field, label: Some(label), value }
  }

  /// Terminal rendering with colors
  pub fn styled(&self) -> String {
    match (self.kind, self.label) {
      (LineKind::Title, _) => self.value.bold().to_string(),
      (LineKind::Score, Some(label)) => format!("{label}: {}", self.value).dimmed().to_string(),
      (_, Some(label)) => format!("{} {}", format!("{label}:").bold(), self.value),
      (_, None) => self.value.clone(),
    }
  }
}

impl fmt::Display for CardLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.label {
      Some(label) => write!(f, "{label}: {}", self.value),
      None => write!(f, "{}", self.value),
    }
  }
}

/// Lay out a record as card lines. The description and score lines only
/// appear when there is something to show.
pub fn render_card(record: &DisplayRecord) -> Vec<CardLine> {
  let mut lines = vec![
    CardLine::title(display_text(&record.title)),
    CardLine::field("Brand", display_text(&record.brand)),
    CardLine::field("Material", display_text(&record.material)),
    CardLine::field("Color", display_text(&record.color)),
    CardLine::field("Category", display_text(&record.categories)),
    CardLine::field("Price", display_text(&record.price)),
  ];

  if record.has_description() {
    lines.push(CardLine::field("AI Description", display_text(&record.ai_description)));
  }

  if let Some(score) = &record.score {
    lines.push(CardLine { kind: LineKind::Score, label: Some("Score"), value: format_score(score) });
  }

  lines
}

/// Print a card to stdout, framed by a thin rule
pub fn display_card(record: &DisplayRecord) {
  let lines = render_card(record);
  let width = lines.iter().map(|l| console::measure_text_width(&l.to_string())).max().unwrap_or(0);
  let rule = "─".repeat(width.clamp(20, 80));

  println!("{}", rule.dimmed());
  for line in &lines {
    println!("{}", line.styled());
  }
  println!("{}", rule.dimmed());
}
