//! Field normalization for recommendation results
//!
//! Backend records arrive either flat (`{title, brand, ...}`) or with the
//! product fields nested under `metadata`. Every field is resolved through an
//! ordered chain of lookups; the first one that yields a non-null value wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const METADATA_KEY: &str = "metadata";
pub const UNTITLED: &str = "Untitled Product";
pub const NOT_SPECIFIED: &str = "Not specified";

/// One step in a field's fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
  /// `record.<field>`
  TopLevel,
  /// `record.<key>.<field>`
  Nested(&'static str),
  /// A fixed string, always defined
  Default(&'static str),
}

impl Lookup {
  fn resolve(&self, record: &Value, field: &str) -> Option<Value> {
    match self {
      Lookup::TopLevel => present(record.get(field)),
      Lookup::Nested(key) => present(record.get(key).and_then(|nested| nested.get(field))),
      Lookup::Default(text) => Some(Value::String(text.to_string())),
    }
  }
}

fn present(value: Option<&Value>) -> Option<Value> {
  value.filter(|v| !v.is_null()).cloned()
}

const TITLE_CHAIN: &[Lookup] =
  &[Lookup::TopLevel, Lookup::Nested(METADATA_KEY), Lookup::Default(UNTITLED)];
const DETAIL_CHAIN: &[Lookup] =
  &[Lookup::TopLevel, Lookup::Nested(METADATA_KEY), Lookup::Default(NOT_SPECIFIED)];
const DESCRIPTION_CHAIN: &[Lookup] =
  &[Lookup::TopLevel, Lookup::Nested(METADATA_KEY), Lookup::Default("")];
// No default: a missing score hides the score line.
const SCORE_CHAIN: &[Lookup] = &[Lookup::TopLevel, Lookup::Nested(METADATA_KEY)];

/// Evaluate `chain` left to right for `field`.
pub fn resolve(record: &Value, field: &str, chain: &[Lookup]) -> Option<Value> {
  chain.iter().find_map(|lookup| lookup.resolve(record, field))
}

fn resolve_text(record: &Value, field: &str, chain: &[Lookup]) -> Value {
  resolve(record, field, chain).unwrap_or_else(|| Value::String(String::new()))
}

/// A result with every display field filled in.
///
/// Values keep their JSON type; `price` may be a number and `categories` a
/// list, depending on how the backend indexed the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
  pub title: Value,
  pub brand: Value,
  pub material: Value,
  pub color: Value,
  pub categories: Value,
  pub price: Value,
  pub score: Option<Value>,
  pub ai_description: Value,
}

impl DisplayRecord {
  pub fn has_description(&self) -> bool {
    match &self.ai_description {
      Value::String(text) => !text.is_empty(),
      other => !other.is_null(),
    }
  }
}

impl From<&Value> for DisplayRecord {
  fn from(record: &Value) -> Self {
    normalize(record)
  }
}

/// Resolve every display field of a raw result. Total over any JSON value.
pub fn normalize(record: &Value) -> DisplayRecord {
  DisplayRecord {
    title: resolve_text(record, "title", TITLE_CHAIN),
    brand: resolve_text(record, "brand", DETAIL_CHAIN),
    material: resolve_text(record, "material", DETAIL_CHAIN),
    color: resolve_text(record, "color", DETAIL_CHAIN),
    categories: resolve_text(record, "categories", DETAIL_CHAIN),
    price: resolve_text(record, "price", DETAIL_CHAIN),
    score: resolve(record, "score", SCORE_CHAIN),
    ai_description: resolve_text(record, "ai_description", DESCRIPTION_CHAIN),
  }
}

pub fn normalize_all(records: &[Value]) -> Vec<DisplayRecord> {
  records.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  const FIELDS: [&str; 8] =
    ["title", "brand", "material", "color", "categories", "price", "score", "ai_description"];

  fn field(record: &DisplayRecord, name: &str) -> Option<Value> {
    let value = serde_json::to_value(record).unwrap();
    present(value.get(name))
  }

  #[test]
  fn test_top_level_wins_over_metadata() {
    let raw = json!({
      "title": "Oak Desk",
      "brand": "Woodline",
      "material": "Oak",
      "color": "Brown",
      "categories": ["Office", "Desks"],
      "price": 249.99,
      "score": 0.91234,
      "ai_description": "A sturdy desk.",
      "metadata": {
        "title": "Other", "brand": "Other", "material": "Other", "color": "Other",
        "categories": "Other", "price": "Other", "score": 0.1, "ai_description": "Other"
      }
    });

    let record = normalize(&raw);
    for name in FIELDS {
      assert_eq!(field(&record, name), raw.get(name).cloned(), "field {name}");
    }
  }

  #[test]
  fn test_metadata_used_when_top_level_missing_or_null() {
    let raw = json!({
      "title": null,
      "metadata": {
        "title": "Velvet Sofa", "brand": "Comfy", "material": "Velvet", "color": "Green",
        "categories": "Sofas", "price": "$899", "score": 0.5, "ai_description": "Soft."
      }
    });

    let record = normalize(&raw);
    for name in FIELDS {
      assert_eq!(field(&record, name), raw["metadata"].get(name).cloned(), "field {name}");
    }
  }

  #[test]
  fn test_empty_input_yields_defaults() {
    let record = normalize(&json!({}));
    assert_eq!(record.title, json!("Untitled Product"));
    for value in [&record.brand, &record.material, &record.color, &record.categories, &record.price]
    {
      assert_eq!(value, &json!("Not specified"));
    }
    assert_eq!(record.ai_description, json!(""));
    assert_eq!(record.score, None);
  }

  #[test]
  fn test_zero_score_is_not_missing() {
    let record = normalize(&json!({"score": 0}));
    assert_eq!(record.score, Some(json!(0)));
    assert_ne!(record.score, normalize(&json!({})).score);
  }

  #[test]
  fn test_mixed_sources() {
    let record = normalize(&json!({"title": "Chair", "metadata": {"brand": "Acme"}}));
    assert_eq!(
      record,
      DisplayRecord {
        title: json!("Chair"),
        brand: json!("Acme"),
        material: json!("Not specified"),
        color: json!("Not specified"),
        categories: json!("Not specified"),
        price: json!("Not specified"),
        score: None,
        ai_description: json!(""),
      }
    );
  }

  #[test]
  fn test_normalizing_a_normalized_record_is_identity() {
    let inputs = [
      json!({}),
      json!({"title": "Chair", "metadata": {"brand": "Acme", "score": 0.25}}),
      json!({"price": 120, "categories": ["Chairs"], "ai_description": "Nice"}),
    ];

    for raw in inputs {
      let once = normalize(&raw);
      let twice = normalize(&serde_json::to_value(&once).unwrap());
      assert_eq!(once, twice);
    }
  }

  #[test]
  fn test_non_object_inputs_are_total() {
    for raw in [json!(null), json!([1, 2]), json!("text"), json!(42), json!({"metadata": "x"})] {
      let record = normalize(&raw);
      assert_eq!(record.title, json!("Untitled Product"));
      assert_eq!(record.score, None);
    }
  }

  #[test]
  fn test_resolve_walks_chain_in_order() {
    let raw = json!({"metadata": {"color": "Red"}, "extra": {"color": "Blue"}});
    let chain = [Lookup::Nested("extra"), Lookup::Nested(METADATA_KEY)];
    assert_eq!(resolve(&raw, "color", &chain), Some(json!("Blue")));
    assert_eq!(resolve(&raw, "brand", &chain), None);
  }

  #[test]
  fn test_description_presence() {
    assert!(!normalize(&json!({})).has_description());
    assert!(normalize(&json!({"ai_description": "Lovely"})).has_description());
  }
}
