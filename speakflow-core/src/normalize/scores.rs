//! Score aggregation.
//!
//! Explicit totals are trusted only when strictly positive; otherwise they are
//! derived from their parts. This keeps partial backend responses (sub-scores
//! only, or no overall score) rendering as a sensible dashboard.

use crate::types::{Scores, DEFAULT_LOGIC_SCORE};

use super::resolver::Sources;
use super::schema;

/// Scores and overall score resolved from one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary {
    pub scores: Scores,
    pub overall_score: i64,
}

/// Raw, independently optional score inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreInputs {
    pub voice: Option<i64>,
    pub logic: Option<i64>,
    pub video: Option<i64>,
    pub video_gaze: Option<i64>,
    pub video_posture: Option<i64>,
    pub video_gesture: Option<i64>,
    pub overall: Option<i64>,
    /// Whether the payload carried a score block at all
    pub reported: bool,
}

impl ScoreInputs {
    /// Read score inputs from located sub-records.
    pub fn resolve(sources: &Sources<'_>) -> Self {
        Self {
            voice: sources.first_integer(schema::SCORE_VOICE),
            logic: sources.first_integer(schema::SCORE_LOGIC),
            video: sources.first_integer(schema::SCORE_VIDEO),
            video_gaze: sources.first_integer(schema::SCORE_VIDEO_GAZE),
            video_posture: sources.first_integer(schema::SCORE_VIDEO_POSTURE),
            video_gesture: sources.first_integer(schema::SCORE_VIDEO_GESTURE),
            overall: sources.first_integer(schema::OVERALL_SCORE),
            reported: sources.get(super::resolver::Source::Scores).is_some(),
        }
    }
}

/// Apply defaults and derivation rules.
///
/// - voice, video sub-scores default to 0, logic to [`DEFAULT_LOGIC_SCORE`]
/// - `video` is kept when strictly positive, else the sum of its sub-scores
/// - the overall score is kept when strictly positive, else
///   `voice + video + logic` when a score block was reported, else 0
pub fn aggregate(inputs: &ScoreInputs) -> ScoreSummary {
    let mut scores = Scores {
        voice: inputs.voice.unwrap_or(0),
        logic: inputs.logic.unwrap_or(DEFAULT_LOGIC_SCORE),
        video: 0,
        video_gaze: inputs.video_gaze.unwrap_or(0),
        video_posture: inputs.video_posture.unwrap_or(0),
        video_gesture: inputs.video_gesture.unwrap_or(0),
    };

    scores.video = match inputs.video {
        Some(video) if video > 0 => video,
        _ => scores.video_subtotal(),
    };

    let overall_score = match inputs.overall {
        Some(overall) if overall > 0 => overall,
        _ if inputs.reported => scores.total(),
        _ => 0,
    };

    ScoreSummary {
        scores,
        overall_score,
    }
}
