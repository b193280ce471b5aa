//! # speakflow-core
//!
//! Core library for speakflow - presentation practice analysis.
//!
//! This library provides:
//! - Result normalization: analysis payloads of any historical shape into one
//!   canonical, fully-defaulted result
//! - Skill progress and dashboard statistics over presentation history
//! - A local JSON document store for presentations and projects
//! - An HTTP client for the analysis backend
//! - Configuration management and logging infrastructure
//!
//! ## Data flow
//!
//! - **Raw:** analysis payloads as the backend or the document store hand
//!   them over (`serde_json::Value`, no fixed shape)
//! - **Canonical:** [`CanonicalResult`], produced by [`normalize()`]; never fails
//! - **Derived:** [`ProgressMetrics`], [`SkillProgressSummary`] and
//!   [`UserStats`] folded from canonical results
//!
//! ## Example
//!
//! ```rust,no_run
//! use speakflow_core::{normalize, Config, DocumentStore, UserStats};
//!
//! let config = Config::load().expect("failed to load config");
//! let store = DocumentStore::open(&config.store);
//!
//! let history = store
//!     .list_presentations("user-1", config.progress.history_limit)
//!     .expect("failed to list presentations");
//! let stats = UserStats::from_history(&history, config.progress.window);
//! println!("average score: {}", stats.average_score);
//!
//! let result = normalize(&serde_json::json!({"scores": {"voice": 30}}));
//! assert_eq!(result.overall_score, 50);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{
    aggregate_metrics, aggregate_skill_progress, ProgressMetrics, SkillProgressSummary, UserStats,
};
pub use client::AnalysisClient;
pub use config::Config;
pub use error::{Error, Result};
pub use normalize::normalize;
pub use store::DocumentStore;
pub use types::*;

// Public modules
pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod normalize;
pub mod store;
pub mod types;
