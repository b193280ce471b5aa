//! Analytics over presentation history
//!
//! - [`progress`]: per-presentation progress samples and rolling skill progress
//! - [`dashboard`]: history-wide statistics for the dashboard header

pub mod dashboard;
pub mod progress;

pub use dashboard::UserStats;
pub use progress::{
    aggregate_metrics, aggregate_skill_progress, ProgressMetrics, SkillProgressSummary,
    DEFAULT_WINDOW, PACE_RANGE_WPM,
};
