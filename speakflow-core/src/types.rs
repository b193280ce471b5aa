//! Core domain types for speakflow
//!
//! These types model the canonical, fully-defaulted view of one analyzed
//! presentation and the records built around it for the history dashboard.
//!
//! Raw analysis payloads have no fixed shape and are kept as
//! [`serde_json::Value`] ([`RawRecord`]) until [`crate::normalize`] turns them
//! into a [`CanonicalResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analytics::ProgressMetrics;

/// An unnormalized analysis payload of unknown shape.
///
/// `Value::Null` means "absent"; any other non-object value is treated as an
/// empty mapping.
pub type RawRecord = Value;

/// Default logic score when the backend reports none.
pub const DEFAULT_LOGIC_SCORE: i64 = 20;

/// Fallback video summary when no interpretation or preview is available.
pub const FEEDBACK_PREVIEW_PLACEHOLDER: &str = "No video analysis summary is available.";

// ============================================
// Canonical result
// ============================================

/// Per-category scores.
///
/// Every field defaults independently; `logic` is the only nonzero default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scores {
    pub voice: i64,
    pub logic: i64,
    /// Rolled-up video score (sum of the three sub-scores unless reported)
    pub video: i64,
    pub video_gaze: i64,
    pub video_posture: i64,
    pub video_gesture: i64,
}

impl Default for Scores {
    fn default() -> Self {
        Self {
            voice: 0,
            logic: DEFAULT_LOGIC_SCORE,
            video: 0,
            video_gaze: 0,
            video_posture: 0,
            video_gesture: 0,
        }
    }
}

impl Scores {
    /// Sum of the three video sub-scores.
    pub fn video_subtotal(&self) -> i64 {
        self.video_gaze
            .saturating_add(self.video_posture)
            .saturating_add(self.video_gesture)
    }

    /// `voice + video + logic`.
    pub fn total(&self) -> i64 {
        self.voice
            .saturating_add(self.video)
            .saturating_add(self.logic)
    }
}

/// Speech delivery metrics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceAnalysis {
    /// Words per minute, 0 when not measurable
    pub wpm: i64,
    /// Pauses at or above the backend's long-pause threshold
    pub long_pause_count: i64,
    /// Mean pause length in seconds
    pub avg_pause_duration: f64,
    /// Individual pause events as reported by the speech analyzer
    pub pause_events: Vec<Value>,
    pub hesitation_count: i64,
    pub filler_count: i64,
    pub hesitation_list: Vec<String>,
    pub filler_list: Vec<String>,
}

/// Script-vs-speech comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicAnalysis {
    /// Similarity percentage, `None` (serialized as `null`) when unknown.
    ///
    /// `Some(0)` means "measured, nothing matched" and must stay distinct.
    pub similarity: Option<i64>,
    pub similarity_analysis: Vec<String>,
}

/// Video behavior analysis.
///
/// Sub-components are passed through as-is; the presentation layer applies
/// its own defaults when rendering them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoAnalysis {
    /// Human-readable summary, never empty
    pub feedback_preview: String,
    pub metadata: Map<String, Value>,
    pub gaze: Map<String, Value>,
    pub posture: Map<String, Value>,
    pub gesture: Map<String, Value>,
    pub hand: Map<String, Value>,
    pub head: Map<String, Value>,
}

impl Default for VideoAnalysis {
    fn default() -> Self {
        Self {
            feedback_preview: FEEDBACK_PREVIEW_PLACEHOLDER.to_string(),
            metadata: Map::new(),
            gaze: Map::new(),
            posture: Map::new(),
            gesture: Map::new(),
            hand: Map::new(),
            head: Map::new(),
        }
    }
}

/// The three analysis sections of a result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSections {
    pub voice: VoiceAnalysis,
    pub logic: LogicAnalysis,
    pub video: VideoAnalysis,
}

/// Fully-defaulted result of one presentation analysis.
///
/// Serializes to the nested shape consumed by the results view:
/// `{ overallScore, scores, duration, analysis: { voice, logic, video },
/// final_report?, final_report_preview? }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalResult {
    #[serde(rename = "overallScore", default)]
    pub overall_score: i64,

    #[serde(default)]
    pub scores: Scores,

    /// Presentation length in whole seconds
    #[serde(default)]
    pub duration: i64,

    #[serde(default)]
    pub analysis: AnalysisSections,

    /// Full written report; `None` means no report has been generated yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_report: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_report_preview: Option<String>,
}

impl CanonicalResult {
    pub fn voice(&self) -> &VoiceAnalysis {
        &self.analysis.voice
    }

    pub fn logic(&self) -> &LogicAnalysis {
        &self.analysis.logic
    }

    pub fn video(&self) -> &VideoAnalysis {
        &self.analysis.video
    }

    /// Serialize back into the canonical wire shape.
    pub fn to_value(&self) -> Value {
        // Every field is a plain map, string or number, so this cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ============================================
// History
// ============================================

/// One stored presentation as listed in the history dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationRecord {
    /// Presentation (document) id
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    /// Project display name, falls back to the project id
    pub project_name: String,
    /// Display title, falls back to the presentation id
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Normalized analysis
    pub result: CanonicalResult,
}

impl PresentationRecord {
    /// Per-record progress metrics for the dashboard.
    pub fn progress(&self) -> ProgressMetrics {
        ProgressMetrics::from_result(&self.result)
    }
}
