//! Search page: one query box, one result list

use colored::*;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::card::display_card;
use crate::client::RecommendationBackend;
use crate::config::DEFAULT_TOP_K;
use crate::normalize::{normalize_all, DisplayRecord};
use crate::notice::{Notifier, RECOMMEND_FAILED};
use crate::types::RecommendRequest;

/// Snapshot of what the search page is showing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
  pub query: String,
  pub results: Vec<Value>,
  pub is_loading: bool,
}

/// How a call to [`SearchPage::search`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
  /// Blank query, nothing sent
  Skipped,
  /// Results replaced with this many records
  Updated(usize),
  /// A newer search was issued while this one was in flight; its reply was dropped
  Superseded,
  /// The request failed; results were left alone
  Failed,
}

#[derive(Debug, Default)]
struct Inner {
  state: SearchState,
  in_flight: usize,
  issued: u64,
}

/// Clears the loading flag on every exit path of a search.
struct LoadingGuard<'a> {
  inner: &'a Mutex<Inner>,
}

impl Drop for LoadingGuard<'_> {
  fn drop(&mut self) {
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.in_flight = inner.in_flight.saturating_sub(1);
    inner.state.is_loading = inner.in_flight > 0;
  }
}

pub struct SearchPage {
  backend: Arc<dyn RecommendationBackend>,
  notifier: Arc<dyn Notifier>,
  top_k: usize,
  inner: Mutex<Inner>,
}

impl SearchPage {
  pub fn new(backend: Arc<dyn RecommendationBackend>, notifier: Arc<dyn Notifier>) -> Self {
    Self { backend, notifier, top_k: DEFAULT_TOP_K, inner: Mutex::new(Inner::default()) }
  }

  pub fn with_top_k(mut self, top_k: usize) -> Self {
    self.top_k = top_k;
    self
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn state(&self) -> SearchState {
    self.lock().state.clone()
  }

  pub fn is_loading(&self) -> bool {
    self.lock().state.is_loading
  }

  /// Current results, normalized for display
  pub fn records(&self) -> Vec<DisplayRecord> {
    normalize_all(&self.lock().state.results)
  }

  /// Run one search against `/recommend`.
  ///
  /// Each call takes a ticket; only the most recently issued search may
  /// replace the results or raise a failure notice. Earlier searches that
  /// finish later are dropped, whether they succeeded or failed.
  pub async fn search(&self, query: &str) -> SearchOutcome {
    if query.trim().is_empty() {
      tracing::debug!("ignoring blank search query");
      return SearchOutcome::Skipped;
    }

    let ticket = {
      let mut inner = self.lock();
      inner.issued += 1;
      inner.in_flight += 1;
      inner.state.query = query.to_string();
      inner.state.is_loading = true;
      inner.issued
    };
    let _loading = LoadingGuard { inner: &self.inner };

    let request = RecommendRequest { query: query.to_string(), top_k: self.top_k };
    tracing::info!(query, top_k = self.top_k, ticket, "fetching recommendations");

    let reply = self.backend.recommend(&request).await;
    match reply {
      Ok(response) => {
        let mut inner = self.lock();
        if inner.issued != ticket {
          tracing::debug!(ticket, latest = inner.issued, "dropping superseded search response");
          return SearchOutcome::Superseded;
        }
        let count = response.results.len();
        inner.state.results = response.results;
        SearchOutcome::Updated(count)
      }
      Err(err) => {
        let latest = self.lock().issued;
        if latest != ticket {
          tracing::debug!(error = %err, ticket, latest, "dropping superseded search failure");
          return SearchOutcome::Superseded;
        }
        tracing::error!(error = %err, query, "Error fetching recommendations");
        self.notifier.notify(RECOMMEND_FAILED);
        SearchOutcome::Failed
      }
    }
  }

  /// Print the page: loading line while busy, then one card per result
  pub fn render(&self) {
    let state = self.state();

    if state.is_loading {
      println!("{}", "Loading recommendations...".italic());
    }

    if !state.query.is_empty() {
      println!("{} {}", "Results for".dimmed(), format!("\"{}\"", state.query).cyan());
    }

    if state.results.is_empty() {
      if !state.query.is_empty() && !state.is_loading {
        println!("{}", "No recommendations yet.".dimmed());
      }
      return;
    }

    for record in normalize_all(&state.results) {
      display_card(&record);
    }
  }
}
