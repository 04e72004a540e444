//! The two views. Each page owns its state; nothing is shared between them.

pub mod analytics;
pub mod search;

pub use analytics::{AnalyticsPage, AnalyticsState, LoadOutcome};
pub use search::{SearchOutcome, SearchPage, SearchState};
