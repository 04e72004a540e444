//! Analytics page: three charts over backend-computed counts

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::charts::{series_from, BarChart, ChartSeriesEntry, ShareChart, BRAND_FILL, PRICE_FILL};
use crate::client::RecommendationBackend;
use crate::notice::{Notifier, ANALYTICS_FAILED};
use crate::types::AnalyticsAggregate;

pub const BRANDS_TITLE: &str = "Top Brands";
pub const PRICES_TITLE: &str = "Price Distribution";
pub const CATEGORIES_TITLE: &str = "Category Breakdown";

/// The three chart series, in backend order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsState {
  pub brands: Vec<ChartSeriesEntry>,
  pub prices: Vec<ChartSeriesEntry>,
  pub categories: Vec<ChartSeriesEntry>,
}

impl AnalyticsState {
  pub fn from_aggregate(aggregate: &AnalyticsAggregate) -> Self {
    Self {
      brands: series_from(&aggregate.brand_counts),
      prices: series_from(&aggregate.price_bins),
      categories: series_from(&aggregate.category_counts),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.brands.is_empty() && self.prices.is_empty() && self.categories.is_empty()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  Loaded,
  Failed,
  /// `ensure_loaded` found a load already attempted for this visit
  AlreadyAttempted,
}

pub struct AnalyticsPage {
  backend: Arc<dyn RecommendationBackend>,
  notifier: Arc<dyn Notifier>,
  state: Mutex<AnalyticsState>,
  attempted: AtomicBool,
}

impl AnalyticsPage {
  pub fn new(backend: Arc<dyn RecommendationBackend>, notifier: Arc<dyn Notifier>) -> Self {
    Self {
      backend,
      notifier,
      state: Mutex::new(AnalyticsState::default()),
      attempted: AtomicBool::new(false),
    }
  }

  fn lock(&self) -> MutexGuard<'_, AnalyticsState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn state(&self) -> AnalyticsState {
    self.lock().clone()
  }

  /// Fetch `/analytics` and turn each count mapping into a chart series.
  /// On failure the series stay exactly as they were.
  pub async fn load_analytics(&self) -> LoadOutcome {
    self.attempted.store(true, Ordering::SeqCst);
    tracing::info!("fetching analytics");

    match self.backend.analytics().await {
      Ok(aggregate) => {
        let loaded = AnalyticsState::from_aggregate(&aggregate);
        tracing::debug!(
          brands = loaded.brands.len(),
          price_bins = loaded.prices.len(),
          categories = loaded.categories.len(),
          "analytics loaded"
        );
        *self.lock() = loaded;
        LoadOutcome::Loaded
      }
      Err(err) => {
        tracing::error!(error = %err, "Error fetching analytics");
        self.notifier.notify(ANALYTICS_FAILED);
        LoadOutcome::Failed
      }
    }
  }

  /// Load on first display only
  pub async fn ensure_loaded(&self) -> LoadOutcome {
    if self.attempted.swap(true, Ordering::SeqCst) {
      return LoadOutcome::AlreadyAttempted;
    }
    self.load_analytics().await
  }

  pub fn render_lines(&self) -> Vec<String> {
    let state = self.state();
    let mut lines = Vec::new();

    lines.extend(BarChart::new(BRANDS_TITLE, &state.brands, BRAND_FILL).render());
    lines.push(String::new());
    lines.extend(BarChart::new(PRICES_TITLE, &state.prices, PRICE_FILL).render());
    lines.push(String::new());
    lines.extend(ShareChart::new(CATEGORIES_TITLE, &state.categories).render());

    lines
  }

  pub fn render(&self) {
    for line in self.render_lines() {
      println!("{line}");
    }
  }
}
