//! FurniReco - terminal client for the furniture recommendation backend
//!
//! Ranking, filtering and aggregation all live on the server. This crate
//! normalizes what comes back and draws it: product cards for `/recommend`
//! and charts for `/analytics`.

pub mod card;
pub mod charts;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod notice;
pub mod pages;
pub mod shell;
pub mod types;

pub use client::{RecoClient, RecommendationBackend};
pub use config::ClientConfig;
pub use error::{ConfigError, RequestError};
pub use normalize::{normalize, DisplayRecord};
