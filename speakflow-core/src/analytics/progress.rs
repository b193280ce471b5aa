//! Skill progress over recent presentations.
//!
//! Each stored presentation contributes a [`ProgressMetrics`] sample. The
//! dashboard folds the most recent samples into a [`SkillProgressSummary`]
//! of 0-100 percentages.

use std::ops::RangeInclusive;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::normalize::coerce;
use crate::types::CanonicalResult;

/// Recommended speaking pace in words per minute.
///
/// Both ends are inclusive: 140 and 160 count as in range, 139 and 161 do
/// not, so `[139, 140, 150, 160, 161]` scores a pace of 60.
pub const PACE_RANGE_WPM: RangeInclusive<i64> = 140..=160;

/// Number of most recent presentations folded into skill progress.
pub const DEFAULT_WINDOW: usize = 10;

/// Per-presentation progress sample. `None` means "not measured".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressMetrics {
    /// Script similarity, 0-100
    pub similarity: Option<i64>,
    /// Speaking pace in words per minute, only when positive
    pub pace_wpm: Option<i64>,
    /// Share of time looking at the center, 0-100
    pub gaze: Option<i64>,
    /// Posture stability, 0-100
    pub posture: Option<i64>,
}

impl ProgressMetrics {
    /// Extract progress metrics from a normalized result.
    pub fn from_result(result: &CanonicalResult) -> Self {
        let video = result.video();
        let wpm = result.voice().wpm;

        Self {
            similarity: result.logic().similarity.map(|s| s.clamp(0, 100)),
            pace_wpm: (wpm > 0).then_some(wpm),
            gaze: ratio(&video.gaze, &[&["center_ratio"], &["distribution", "center"]]),
            posture: ratio(&video.posture, &[&["stability"]]),
        }
    }

    /// Whether the pace falls in [`PACE_RANGE_WPM`]. `None` when unmeasured.
    pub fn pace_in_range(&self) -> Option<bool> {
        self.pace_wpm.map(|wpm| PACE_RANGE_WPM.contains(&wpm))
    }
}

/// First numeric value among `paths`, as a 0-100 percentage.
///
/// Fractions (<= 1) are scaled by 100; larger values are taken as
/// percentages already.
fn ratio(component: &Map<String, Value>, paths: &[&[&str]]) -> Option<i64> {
    paths.iter().find_map(|path| {
        let (first, rest) = path.split_first()?;
        let value = rest
            .iter()
            .try_fold(component.get(*first)?, |current, key| current.get(*key))?;
        coerce::to_number(value).map(percentage)
    })
}

fn percentage(value: f64) -> i64 {
    let scaled = if value <= 1.0 { value * 100.0 } else { value };
    coerce::round_to_i64(scaled).clamp(0, 100)
}

/// Rolling skill percentages shown on the dashboard.
///
/// Each field is 0 when no sample in the window measured it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkillProgressSummary {
    /// Mean script similarity
    pub similarity: i64,
    /// Percentage of measured presentations within [`PACE_RANGE_WPM`]
    pub pace: i64,
    /// Mean gaze center ratio
    pub gaze: i64,
    /// Mean posture stability
    pub posture: i64,
}

/// Fold the most recent `window` results (newest first) into skill progress.
pub fn aggregate_skill_progress(results: &[CanonicalResult], window: usize) -> SkillProgressSummary {
    let samples: Vec<ProgressMetrics> = results
        .iter()
        .take(window)
        .map(ProgressMetrics::from_result)
        .collect();
    aggregate_metrics(&samples, window)
}

/// Fold pre-extracted samples (newest first) into skill progress.
pub fn aggregate_metrics(samples: &[ProgressMetrics], window: usize) -> SkillProgressSummary {
    let recent = &samples[..samples.len().min(window)];

    let pace_flags: Vec<i64> = recent
        .iter()
        .filter_map(ProgressMetrics::pace_in_range)
        .map(i64::from)
        .collect();

    SkillProgressSummary {
        similarity: mean(recent.iter().filter_map(|s| s.similarity)),
        pace: mean(pace_flags.iter().map(|in_range| in_range * 100)),
        gaze: mean(recent.iter().filter_map(|s| s.gaze)),
        posture: mean(recent.iter().filter_map(|s| s.posture)),
    }
}

/// Rounded mean, 0 for an empty sequence.
pub(crate) fn mean(values: impl Iterator<Item = i64>) -> i64 {
    let (sum, count) = values.fold((0.0_f64, 0_u32), |(sum, count), v| {
        (sum + v as f64, count + 1)
    });
    if count == 0 {
        0
    } else {
        coerce::round_to_i64(sum / f64::from(count))
    }
}
