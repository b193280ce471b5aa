//! Result normalization
//!
//! Turns analysis payloads of any known (or unknown) shape into a
//! [`CanonicalResult`]. Normalization is total: missing, malformed or absent
//! input always yields a fully-defaulted result, never an error.
//!
//! Payloads arrive from three places:
//! - the analysis backend's direct response (flat `stt_result`/`video_result`)
//! - stored presentation documents (`stt_analysis`/`vision_analysis`)
//! - the summary API, which is already mostly canonical and is normalized
//!   again on arrival
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use speakflow_core::normalize::normalize;
//!
//! let raw = json!({
//!     "scores": {"voice": 30, "video_gaze": 10, "video_posture": 5, "video_gesture": 5},
//!     "duration_sec": 125
//! });
//! let result = normalize(&raw);
//! assert_eq!(result.scores.video, 20);
//! assert_eq!(result.overall_score, 70);
//! assert_eq!(result.duration, 125);
//! ```

pub mod coerce;
pub mod resolver;
pub mod schema;
pub mod scores;

use serde_json::{json, Map, Value};

use crate::types::{
    AnalysisSections, CanonicalResult, LogicAnalysis, RawRecord, Scores, VideoAnalysis,
    VoiceAnalysis, FEEDBACK_PREVIEW_PLACEHOLDER,
};

use resolver::Sources;
use scores::ScoreInputs;

/// Separator between video interpretations in the feedback preview.
pub const PREVIEW_SEPARATOR: &str = " / ";

/// Normalize a raw payload into a canonical result.
///
/// 1. `null` yields [`sample_result`].
/// 2. A payload already in canonical shape (populated `analysis.voice`) is
///    kept, with only its rolled-up scores and preview filled in.
/// 3. Anything else is resolved field by field from the candidate tables in
///    [`schema`], with every unresolvable field taking its default.
///
/// `normalize(&normalize(x).to_value()) == normalize(x)` for every `x`.
pub fn normalize(raw: &RawRecord) -> CanonicalResult {
    if raw.is_null() {
        tracing::debug!("No analysis payload, using sample result");
        return sample_result();
    }

    if let Some(result) = from_canonical(raw) {
        tracing::debug!("Payload already canonical");
        return result;
    }

    let sources = Sources::locate(raw);
    let result = resolve(&sources);
    tracing::debug!(
        overall_score = result.overall_score,
        duration = result.duration,
        wpm = result.analysis.voice.wpm,
        "Normalized analysis payload"
    );
    result
}

/// Whether the payload has a populated `analysis.voice` section.
pub fn is_canonical(raw: &RawRecord) -> bool {
    raw.get("analysis")
        .and_then(|analysis| analysis.get("voice"))
        .and_then(Value::as_object)
        .is_some_and(|voice| !voice.is_empty())
}

/// Canonical short-circuit.
///
/// Returns `None` when the payload is not canonical, or claims to be but does
/// not deserialize cleanly; the caller then resolves it like any other shape.
///
/// The summary API pairs a canonical `analysis` with the backend's raw score
/// block, so non-positive video and overall scores are derived here too.
fn from_canonical(raw: &RawRecord) -> Option<CanonicalResult> {
    if !is_canonical(raw) {
        return None;
    }

    let mut result: CanonicalResult = match serde_json::from_value(raw.clone()) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(error = %e, "Canonical-looking payload did not deserialize, resolving");
            return None;
        }
    };

    fill_derived_scores(raw, &mut result);
    if result.analysis.video.feedback_preview.trim().is_empty() {
        result.analysis.video.feedback_preview = FEEDBACK_PREVIEW_PLACEHOLDER.to_string();
    }
    Some(result)
}

/// Same derivation rules as [`scores::aggregate`], applied to a deserialized
/// canonical result.
///
/// A score block still at its defaults is what a payload without any scores
/// normalizes to, so it does not count as reported and its overall score is
/// left alone.
fn fill_derived_scores(raw: &RawRecord, result: &mut CanonicalResult) {
    let scores = &mut result.scores;
    if scores.video <= 0 {
        scores.video = scores.video_subtotal();
    }

    let reported =
        raw.get("scores").is_some_and(Value::is_object) && *scores != Scores::default();
    if result.overall_score <= 0 && reported {
        result.overall_score = scores.total();
    }
}

fn resolve(sources: &Sources<'_>) -> CanonicalResult {
    let duration_secs = sources.first_number(schema::DURATION);
    let summary = scores::aggregate(&ScoreInputs::resolve(sources));

    CanonicalResult {
        overall_score: summary.overall_score,
        scores: summary.scores,
        duration: duration_secs.map(coerce::round_to_i64).unwrap_or(0),
        analysis: AnalysisSections {
            voice: resolve_voice(sources, duration_secs),
            logic: resolve_logic(sources),
            video: resolve_video(sources),
        },
        final_report: sources.first_string(schema::FINAL_REPORT).map(str::to_string),
        final_report_preview: sources
            .first_string(schema::FINAL_REPORT_PREVIEW)
            .map(str::to_string),
    }
}

fn resolve_voice(sources: &Sources<'_>, duration_secs: Option<f64>) -> VoiceAnalysis {
    let pause_events = sources
        .first_array(schema::PAUSE_EVENTS)
        .cloned()
        .unwrap_or_default();

    let long_pause_count = sources
        .first_integer(schema::LONG_PAUSE_COUNT)
        .unwrap_or_else(|| i64::try_from(pause_events.len()).unwrap_or(i64::MAX));

    VoiceAnalysis {
        wpm: resolve_wpm(sources, duration_secs),
        long_pause_count,
        avg_pause_duration: sources
            .first_number(schema::AVG_PAUSE_DURATION)
            .unwrap_or(0.0),
        pause_events,
        hesitation_count: sources.first_integer(schema::HESITATION_COUNT).unwrap_or(0),
        filler_count: sources.first_integer(schema::FILLER_COUNT).unwrap_or(0),
        hesitation_list: sources
            .first_string_list(schema::HESITATION_LIST)
            .unwrap_or_default(),
        filler_list: sources
            .first_string_list(schema::FILLER_LIST)
            .unwrap_or_default(),
    }
}

/// Words per minute: explicit value, else word count over duration, else the
/// length of the word timeline over duration.
fn resolve_wpm(sources: &Sources<'_>, duration_secs: Option<f64>) -> i64 {
    if let Some(wpm) = sources.first_integer(schema::WPM) {
        return wpm;
    }

    let Some(duration) = duration_secs.filter(|d| *d > 0.0) else {
        return 0;
    };

    let words = sources
        .first_number(schema::WORD_COUNT)
        .or_else(|| sources.first_array(schema::WORDS).map(|w| w.len() as f64));

    words
        .map(|count| coerce::round_to_i64(count / duration * 60.0))
        .unwrap_or(0)
}

fn resolve_logic(sources: &Sources<'_>) -> LogicAnalysis {
    LogicAnalysis {
        similarity: sources.first_integer(schema::SIMILARITY),
        similarity_analysis: sources
            .first_string_list(schema::SIMILARITY_ANALYSIS)
            .unwrap_or_default(),
    }
}

fn resolve_video(sources: &Sources<'_>) -> VideoAnalysis {
    let object = |candidates: &[resolver::Candidate]| {
        sources
            .first_object(candidates)
            .cloned()
            .unwrap_or_default()
    };

    let gaze = sources
        .first_object(schema::VIDEO_GAZE)
        .cloned()
        .or_else(|| lift_flat(sources, schema::FLAT_GAZE_CENTER_RATIO, "center_ratio"))
        .unwrap_or_default();
    let posture = sources
        .first_object(schema::VIDEO_POSTURE)
        .cloned()
        .or_else(|| lift_flat(sources, schema::FLAT_POSTURE_STABILITY, "stability"))
        .unwrap_or_default();

    let mut video = VideoAnalysis {
        feedback_preview: String::new(),
        metadata: object(schema::VIDEO_METADATA),
        gaze,
        posture,
        gesture: object(schema::VIDEO_GESTURE),
        hand: object(schema::VIDEO_HAND),
        head: object(schema::VIDEO_HEAD),
    };
    video.feedback_preview = feedback_preview(sources, &video);
    video
}

fn lift_flat(
    sources: &Sources<'_>,
    candidates: &[resolver::Candidate],
    key: &str,
) -> Option<Map<String, Value>> {
    let value = sources.first_number(candidates)?;
    let mut map = Map::new();
    map.insert(key.to_string(), json!(value));
    Some(map)
}

/// Interpretations joined in fixed order (gaze, posture, gesture, hand,
/// head), else an explicit preview, else the placeholder.
fn feedback_preview(sources: &Sources<'_>, video: &VideoAnalysis) -> String {
    let interpretations: Vec<&str> = [
        &video.gaze,
        &video.posture,
        &video.gesture,
        &video.hand,
        &video.head,
    ]
    .into_iter()
    .filter_map(|component| component.get("interpretation").and_then(Value::as_str))
    .filter(|text| !text.trim().is_empty())
    .collect();

    if !interpretations.is_empty() {
        return interpretations.join(PREVIEW_SEPARATOR);
    }

    sources
        .first_non_empty_string(schema::FEEDBACK_PREVIEW)
        .unwrap_or(FEEDBACK_PREVIEW_PLACEHOLDER)
        .to_string()
}

/// Neutral placeholder shown before any real analysis exists.
///
/// This is illustrative data, not a measurement.
pub fn sample_result() -> CanonicalResult {
    let object = |value: Value| match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    CanonicalResult {
        overall_score: 78,
        scores: Scores {
            voice: 30,
            logic: 25,
            video: 23,
            video_gaze: 9,
            video_posture: 8,
            video_gesture: 6,
        },
        duration: 185,
        analysis: AnalysisSections {
            voice: VoiceAnalysis {
                wpm: 148,
                long_pause_count: 2,
                avg_pause_duration: 0.8,
                pause_events: vec![
                    json!({"start_sec": 42.1, "end_sec": 44.6, "duration": 2.5}),
                    json!({"start_sec": 120.3, "end_sec": 122.5, "duration": 2.2}),
                ],
                hesitation_count: 3,
                filler_count: 5,
                hesitation_list: vec!["kind of".to_string(), "I guess".to_string()],
                filler_list: vec!["um".to_string(), "uh".to_string(), "like".to_string()],
            },
            logic: LogicAnalysis {
                similarity: Some(82),
                similarity_analysis: vec![
                    "Most key points from the script were delivered.".to_string(),
                    "The closing summary was shortened compared to the script.".to_string(),
                ],
            },
            video: VideoAnalysis {
                feedback_preview: [
                    "Eye contact stayed mostly on the camera",
                    "Posture was stable",
                ]
                .join(PREVIEW_SEPARATOR),
                metadata: object(json!({"duration_sec": 185, "fps": 30})),
                gaze: object(json!({
                    "center_ratio": 0.72,
                    "interpretation": "Eye contact stayed mostly on the camera"
                })),
                posture: object(json!({
                    "stability": 0.88,
                    "interpretation": "Posture was stable"
                })),
                gesture: Map::new(),
                hand: Map::new(),
                head: Map::new(),
            },
        },
        final_report: None,
        final_report_preview: Some(
            "Sample result. Record a presentation to see your own analysis.".to_string(),
        ),
    }
}
