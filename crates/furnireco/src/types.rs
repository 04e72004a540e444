//! Request and response bodies exchanged with the recommendation backend

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Body of `POST /recommend`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendRequest {
  pub query: String,
  pub top_k: usize,
}

/// Body returned by `POST /recommend`.
///
/// Results stay as raw JSON: the backend has emitted both flat records and
/// records nested under `metadata`, and the normalizer deals with both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendResponse {
  pub results: Vec<Value>,
  #[serde(default)]
  pub query: Option<String>,
}

/// Body returned by `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusMessage {
  pub message: String,
}

/// Label to count mapping that remembers the order the backend sent it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap(Vec<(String, u64)>);

impl CountMap {
  pub fn new(entries: Vec<(String, u64)>) -> Self {
    Self(entries)
  }

  pub fn entries(&self) -> &[(String, u64)] {
    &self.0
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
    self.0.iter().map(|(label, count)| (label.as_str(), *count))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// A repeated key keeps its first position and takes the later count.
  fn insert(&mut self, label: String, count: u64) {
    match self.0.iter_mut().find(|(existing, _)| *existing == label) {
      Some(entry) => entry.1 = count,
      None => self.0.push((label, count)),
    }
  }
}

struct CountMapVisitor;

impl<'de> Visitor<'de> for CountMapVisitor {
  type Value = CountMap;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("a mapping of label to non-negative integer count")
  }

  fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
  where
    A: MapAccess<'de>,
  {
    let mut map = CountMap::default();
    while let Some((label, count)) = access.next_entry::<String, u64>()? {
      map.insert(label, count);
    }
    Ok(map)
  }

  fn visit_unit<E>(self) -> Result<Self::Value, E>
  where
    E: de::Error,
  {
    Ok(CountMap::default())
  }

  fn visit_none<E>(self) -> Result<Self::Value, E>
  where
    E: de::Error,
  {
    Ok(CountMap::default())
  }
}

impl<'de> Deserialize<'de> for CountMap {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_any(CountMapVisitor)
  }
}

/// Body returned by `GET /analytics`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalyticsAggregate {
  #[serde(default)]
  pub brand_counts: CountMap,
  #[serde(default)]
  pub price_bins: CountMap,
  #[serde(default)]
  pub category_counts: CountMap,
}
