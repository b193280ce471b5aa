//! Dashboard statistics for the history view header.

use serde::Serialize;

use super::progress::{aggregate_metrics, mean, SkillProgressSummary};
use crate::types::PresentationRecord;

/// Presentations in each half of the improvement comparison.
pub const IMPROVEMENT_WINDOW: usize = 5;

/// Aggregate statistics over a user's presentation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Number of presentations considered
    pub total_presentations: usize,
    /// Rounded mean overall score
    pub average_score: i64,
    /// Percent change of the 5 most recent mean score vs the 5 before them
    pub improvement: i64,
    pub skill_progress: SkillProgressSummary,
}

impl UserStats {
    /// Compute stats from history ordered newest first.
    ///
    /// Skill progress only looks at the most recent `window` presentations.
    pub fn from_history(history: &[PresentationRecord], window: usize) -> Self {
        if history.is_empty() {
            return Self::default();
        }

        let scores: Vec<i64> = history.iter().map(|p| p.result.overall_score).collect();
        let samples: Vec<_> = history.iter().take(window).map(|p| p.progress()).collect();

        Self {
            total_presentations: history.len(),
            average_score: mean(scores.iter().copied()),
            improvement: Self::calculate_improvement(&scores),
            skill_progress: aggregate_metrics(&samples, window),
        }
    }

    /// Percent change between the recent and the previous window of scores.
    ///
    /// Returns 0 when there is no previous window or its mean is 0.
    pub fn calculate_improvement(scores: &[i64]) -> i64 {
        let recent = &scores[..scores.len().min(IMPROVEMENT_WINDOW)];
        let older = scores
            .get(IMPROVEMENT_WINDOW..)
            .map(|rest| &rest[..rest.len().min(IMPROVEMENT_WINDOW)])
            .unwrap_or_default();

        if recent.is_empty() || older.is_empty() {
            return 0;
        }

        // Summed as f64: saturated scores must not overflow.
        let average = |values: &[i64]| {
            values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
        };
        let (recent_avg, older_avg) = (average(recent), average(older));
        if older_avg == 0.0 {
            return 0;
        }
        ((recent_avg - older_avg) / older_avg * 100.0).round() as i64
    }

    /// Improvement with an explicit sign (e.g., "+12%").
    pub fn format_improvement(&self) -> String {
        if self.improvement > 0 {
            format!("+{}%", self.improvement)
        } else {
            format!("{}%", self.improvement)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CanonicalResult;

    fn record(id: &str, overall_score: i64, wpm: i64) -> PresentationRecord {
        let mut result = CanonicalResult {
            overall_score,
            ..Default::default()
        };
        result.analysis.voice.wpm = wpm;
        PresentationRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            project_id: "p1".to_string(),
            project_name: "Pitch".to_string(),
            title: id.to_string(),
            created_at: None,
            updated_at: None,
            result,
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(UserStats::from_history(&[], 10), UserStats::default());
    }

    #[test]
    fn test_average_and_total() {
        let history = vec![record("a", 80, 150), record("b", 71, 120)];
        let stats = UserStats::from_history(&history, 10);
        assert_eq!(stats.total_presentations, 2);
        assert_eq!(stats.average_score, 76);
        // no older window yet
        assert_eq!(stats.improvement, 0);
        assert_eq!(stats.skill_progress.pace, 50);
    }

    #[test]
    fn test_improvement_with_saturated_scores() {
        let scores = [i64::MAX, i64::MAX, 1, 1, 1, 50];
        assert!(UserStats::calculate_improvement(&scores) > 1_000_000);

        let scores = [1, 1, 1, 1, 1, i64::MAX, i64::MAX];
        assert_eq!(UserStats::calculate_improvement(&scores), -100);

        let history = vec![record("a", i64::MAX, 150), record("b", i64::MAX, 150)];
        let stats = UserStats::from_history(&history, 10);
        assert_eq!(stats.total_presentations, 2);
        assert!(stats.average_score > 0);
    }

    #[test]
    fn test_improvement_recent_vs_previous() {
        let scores = [90, 90, 90, 90, 90, 60, 60, 60, 60, 60, 10];
        assert_eq!(UserStats::calculate_improvement(&scores), 50);
    }

    #[test]
    fn test_improvement_partial_older_window() {
        let scores = [70, 70, 70, 70, 70, 80];
        assert_eq!(UserStats::calculate_improvement(&scores), -13);
    }

    #[test]
    fn test_improvement_zero_baseline() {
        let scores = [70, 70, 70, 70, 70, 0, 0];
        assert_eq!(UserStats::calculate_improvement(&scores), 0);
    }

    #[test]
    fn test_skill_progress_uses_window() {
        let mut history: Vec<_> = (0..3).map(|i| record(&i.to_string(), 70, 150)).collect();
        history.extend((3..8).map(|i| record(&i.to_string(), 70, 100)));
        let stats = UserStats::from_history(&history, 3);
        assert_eq!(stats.total_presentations, 8);
        assert_eq!(stats.skill_progress.pace, 100);
    }

    #[test]
    fn test_format_improvement() {
        let mut stats = UserStats {
            improvement: 12,
            ..Default::default()
        };
        assert_eq!(stats.format_improvement(), "+12%");
        stats.improvement = -4;
        assert_eq!(stats.format_improvement(), "-4%");
        stats.improvement = 0;
        assert_eq!(stats.format_improvement(), "0%");
    }
}
